// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod deployment;

pub use deployment::{is_available, DeploymentSummary, DeploymentTemplate};
