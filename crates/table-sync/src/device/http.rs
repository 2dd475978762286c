//! HTTP transport for the indicator device.
//!
//! `POST {base}/update` with `{"status": "<status>", "led": <code>}` to signal a status,
//! `GET {base}/status` to check the device is up. Any 2xx answer counts as acknowledged.

use super::DeviceNotifier;
use crate::config::DeviceSettings;
use crate::model::TableStatus;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
struct SignalPayload {
    status: TableStatus,
    led: u8,
}

#[derive(Debug, Clone)]
pub struct HttpDeviceNotifier {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl HttpDeviceNotifier {
    /// `address` is a host, a `host:port` pair or a full `http(s)://` URL.
    pub fn new(
        address: &str,
        timeout: Duration,
        health_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url(address),
            timeout,
            health_timeout,
        })
    }

    pub fn from_settings(settings: &DeviceSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            &settings.address,
            Duration::from_secs(settings.timeout_secs),
            Duration::from_secs(settings.health_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn base_url(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

#[async_trait]
impl DeviceNotifier for HttpDeviceNotifier {
    #[instrument(skip(self), fields(device = %self.base_url))]
    async fn notify(&self, status: TableStatus) -> bool {
        let payload = SignalPayload {
            status,
            led: status.signal_code(),
        };
        let result = self
            .client
            .post(format!("{}/update", self.base_url))
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(%status, led = payload.led, "Device acknowledged status");
                true
            }
            Ok(response) => {
                warn!(%status, code = response.status().as_u16(), "Device rejected status");
                false
            }
            Err(e) if e.is_timeout() => {
                warn!(%status, timeout = ?self.timeout, "Device did not answer in time");
                false
            }
            Err(e) => {
                warn!(%status, error = %e, "Device unreachable");
                false
            }
        }
    }

    #[instrument(skip(self), fields(device = %self.base_url))]
    async fn check_connection(&self) -> bool {
        match self
            .client
            .get(format!("{}/status", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "Device health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_address() {
        assert_eq!(base_url("192.168.4.1"), "http://192.168.4.1");
        assert_eq!(base_url("192.168.4.1:8080"), "http://192.168.4.1:8080");
        assert_eq!(base_url("http://device.local/"), "http://device.local");
        assert_eq!(base_url(" https://device.local "), "https://device.local");
    }

    #[test]
    fn test_notifier_keeps_normalized_url() {
        let notifier = HttpDeviceNotifier::new(
            "192.168.4.1:8080/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(notifier.base_url(), "http://192.168.4.1:8080");
    }

    #[test]
    fn test_payload_shape() {
        let payload = SignalPayload {
            status: TableStatus::Processing,
            led: TableStatus::Processing.signal_code(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"status": "processing", "led": 2})
        );
    }
}
