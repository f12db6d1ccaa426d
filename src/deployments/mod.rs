// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment API calls: CRUD, rollout waiting and watching.

pub mod crud;
pub mod rollout;
pub mod watch;

pub use crud::{
    create_deployment, delete_deployment, describe_deployment, list_deployments,
    update_deployment,
};
pub use rollout::wait_for_available;
pub use watch::{watch_deployments, DeploymentEvent, EventKind};
