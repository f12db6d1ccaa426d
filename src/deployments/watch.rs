// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment watch stream consumption

use crate::constants::MAX_WATCH_TIMEOUT_SECS;
use crate::error::Result;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    api::{WatchEvent, WatchParams},
    Api, Client, ResourceExt,
};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

/// Resource version that asks the server to start from any cached state
const ANY_VERSION: &str = "0";
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Added => "added",
            EventKind::Modified => "modified",
            EventKind::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// A change to a deployment as reported by the watch stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEvent {
    pub kind: EventKind,
    pub namespace: String,
    pub name: String,
}

impl DeploymentEvent {
    /// Bookmarks and errors carry no deployment and map to `None`
    pub fn from_watch_event(event: &WatchEvent<Deployment>) -> Option<Self> {
        let (kind, deployment) = match event {
            WatchEvent::Added(d) => (EventKind::Added, d),
            WatchEvent::Modified(d) => (EventKind::Modified, d),
            WatchEvent::Deleted(d) => (EventKind::Deleted, d),
            WatchEvent::Bookmark(_) | WatchEvent::Error(_) => return None,
        };
        Some(Self {
            kind,
            namespace: deployment.namespace().unwrap_or_default(),
            name: deployment.name_any(),
        })
    }
}

impl fmt::Display for DeploymentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deployment {}/{} {}", self.namespace, self.name, self.kind)
    }
}

/// Watch deployments in a namespace and hand each change to `on_event`.
///
/// With a timeout the watch returns once it has elapsed, even if the server
/// holds the stream open; without one it follows forever, re-opening the
/// stream from the last seen resource version whenever it closes or the
/// connection drops. An API error status on the watch itself is returned.
#[instrument(skip(client, on_event))]
pub async fn watch_deployments<F>(
    client: &Client,
    namespace: &str,
    timeout: Option<Duration>,
    mut on_event: F,
) -> Result<()>
where
    F: FnMut(DeploymentEvent),
{
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deadline = timeout.map(|t| Instant::now() + t);
    let mut resource_version = ANY_VERSION.to_string();

    loop {
        let mut wp = WatchParams::default();
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now()).as_secs() as u32;
            if remaining == 0 {
                info!("Watch timeout reached");
                return Ok(());
            }
            wp = wp.timeout(remaining.min(MAX_WATCH_TIMEOUT_SECS));
        }

        let version = resource_version.clone();
        debug!("Opening watch at resourceVersion {}", version);
        let opened = match until_deadline(deadline, api.watch(&wp, &version)).await {
            Some(opened) => opened,
            None => {
                info!("Watch timeout reached");
                return Ok(());
            }
        };
        let mut stream = match opened {
            Ok(stream) => stream.boxed(),
            Err(kube::Error::Api(resp)) => return Err(kube::Error::Api(resp).into()),
            Err(e) => {
                warn!("Failed to open watch: {}", e);
                reconnect_pause(deadline).await;
                continue;
            }
        };

        loop {
            let next = match until_deadline(deadline, stream.try_next()).await {
                Some(next) => next,
                None => {
                    info!("Watch timeout reached");
                    return Ok(());
                }
            };
            let event = match next {
                Ok(Some(event)) => event,
                Ok(None) => {
                    debug!("Watch closed by server");
                    break;
                }
                // The server refused the watch itself, e.g. forbidden or unknown namespace
                Err(kube::Error::Api(resp)) => return Err(kube::Error::Api(resp).into()),
                Err(e) => {
                    warn!("Watch stream failed: {}", e);
                    break;
                }
            };

            match &event {
                WatchEvent::Added(d) | WatchEvent::Modified(d) | WatchEvent::Deleted(d) => {
                    if let Some(rv) = d.resource_version() {
                        resource_version = rv;
                    }
                }
                WatchEvent::Bookmark(bookmark) => {
                    resource_version = bookmark.metadata.resource_version.clone();
                }
                // 410 Gone: the resource version fell out of the server's window
                WatchEvent::Error(err) if err.code == 410 => {
                    warn!("Resource version {} expired, restarting watch", resource_version);
                    resource_version = ANY_VERSION.to_string();
                    break;
                }
                WatchEvent::Error(err) => {
                    warn!("Watch error {} ({}): {}", err.code, err.reason, err.message);
                    break;
                }
            }

            if let Some(change) = DeploymentEvent::from_watch_event(&event) {
                on_event(change);
            }
        }

        reconnect_pause(deadline).await;
    }
}

/// Await `fut`, or give up with `None` once the deadline passes
async fn until_deadline<Fut: Future>(deadline: Option<Instant>, fut: Fut) -> Option<Fut::Output> {
    match deadline {
        Some(deadline) => timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}

async fn reconnect_pause(deadline: Option<Instant>) {
    let wake = Instant::now() + RECONNECT_DELAY;
    sleep_until(deadline.map_or(wake, |d| d.min(wake))).await;
}
