// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod demo;
pub mod deployments;
pub mod error;
pub mod kubernetes;
pub mod prompt;
pub mod retry;
pub mod types;

#[cfg(test)]
pub mod test_utils;
