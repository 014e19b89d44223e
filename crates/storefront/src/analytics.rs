//! Best-effort analytics beacon.
//!
//! Every event is logged. When an endpoint is configured, the event is also
//! POSTed as `{ "name", "payload", "ts" }` from a background task. Nothing is
//! retried or acknowledged, and failures never reach the caller.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};
use tokio::task::JoinSet;
use tracing::{debug, info};
use url::Url;

/// Event names emitted by the shop.
pub mod events {
    pub const SHOP_VIEW: &str = "shop_view";
    pub const ADD_TO_CART: &str = "add_to_cart";
    pub const PROMO_APPLIED: &str = "promo_applied";
    pub const CHECKOUT: &str = "checkout";
}

#[derive(Debug)]
struct Endpoint {
    url: Url,
    client: reqwest::Client,
}

/// Fire-and-forget event emitter.
#[derive(Debug, Default)]
pub struct AnalyticsBeacon {
    endpoint: Option<Endpoint>,
    in_flight: JoinSet<()>,
}

impl AnalyticsBeacon {
    /// A beacon that POSTs events to `url`.
    #[must_use]
    pub fn new(url: Url, client: reqwest::Client) -> Self {
        Self {
            endpoint: Some(Endpoint { url, client }),
            in_flight: JoinSet::new(),
        }
    }

    /// A beacon that only logs.
    #[must_use]
    pub fn log_only() -> Self {
        Self::default()
    }

    /// Record an event.
    ///
    /// Sending requires a Tokio runtime; outside one the event is only logged.
    pub fn track(&mut self, name: &str, payload: Value) {
        info!(event = name, payload = %payload, "analytics");

        while self.in_flight.try_join_next().is_some() {}

        let Some(endpoint) = &self.endpoint else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(event = name, "No runtime, analytics beacon not sent");
            return;
        };

        let body = json!({
            "name": name,
            "payload": payload,
            "ts": Utc::now().timestamp_millis(),
        });
        let request = endpoint.client.post(endpoint.url.clone()).json(&body);
        let event = name.to_string();

        self.in_flight.spawn_on(
            async move {
                match request.send().await {
                    Ok(response) => {
                        debug!(event = %event, status = %response.status(), "Analytics beacon sent");
                    }
                    Err(e) => debug!(event = %event, error = %e, "Analytics beacon failed"),
                }
            },
            &handle,
        );
    }

    /// Number of beacons still being sent.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait up to `timeout` for in-flight beacons, then abandon the rest.
    pub async fn flush(&mut self, timeout: Duration) {
        let drained = tokio::time::timeout(timeout, async {
            while self.in_flight.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            debug!(abandoned = self.in_flight.len(), "Abandoning analytics beacons");
            self.in_flight.abort_all();
        }
    }
}
