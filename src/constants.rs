// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Defaults for the demo deployment
pub mod defaults {
    pub const NAMESPACE: &str = "default";
    pub const DEPLOYMENT_NAME: &str = "demo-deployment";
    pub const IMAGE: &str = "nginx:1.12";
    pub const REPLICAS: i32 = 2;
    /// Label value placed under the `app` key on selector and pod template
    pub const APP_LABEL: &str = "demo";
    pub const CONTAINER_NAME: &str = "web";
    pub const PORT_NAME: &str = "http";
    pub const CONTAINER_PORT: i32 = 80;
}

/// Target state applied by the update step
pub mod update {
    pub const REPLICAS: i32 = 1;
    pub const IMAGE: &str = "nginx:1.13";
}

/// Label key shared by the selector and the pod template
pub const APP_LABEL_KEY: &str = "app";

/// Environment variables read by `Config::from_env`
pub mod env {
    pub const NAMESPACE: &str = "DEMO_NAMESPACE";
    pub const DEPLOYMENT_NAME: &str = "DEMO_DEPLOYMENT_NAME";
    pub const IMAGE: &str = "DEMO_IMAGE";
    pub const REPLICAS: &str = "DEMO_REPLICAS";
    pub const NON_INTERACTIVE: &str = "DEMO_NON_INTERACTIVE";
}

/// Conflict retry defaults
pub mod retry {
    pub const STEPS: u32 = 5;
    pub const INITIAL_MILLIS: u64 = 10;
    pub const FACTOR: f64 = 1.0;
    pub const JITTER: f64 = 0.1;
}

/// Rollout polling configuration
pub mod rollout {
    /// Initial polling interval in seconds
    pub const POLL_INTERVAL_SECS: u64 = 1;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 10;
}

/// The server rejects watch timeouts at or above this many seconds
pub const MAX_WATCH_TIMEOUT_SECS: u32 = 290;
