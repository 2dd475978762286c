//! # Device Notifier
//!
//! Best-effort signalling of status changes to the physical indicator. A notification is a
//! single bounded call whose outcome is a `bool`; it never fails the mutation that triggered
//! it, and the stored status does not depend on it.

pub mod http;

pub use http::HttpDeviceNotifier;

use crate::model::TableStatus;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait DeviceNotifier: Send + Sync {
    /// Sends `status` to the device. `true` only when the device acknowledged it.
    async fn notify(&self, status: TableStatus) -> bool;

    /// Whether the device answers at all.
    async fn check_connection(&self) -> bool;
}

/// Notifier for deployments without a device. Every call reports `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevice;

#[async_trait]
impl DeviceNotifier for NoDevice {
    async fn notify(&self, status: TableStatus) -> bool {
        debug!(%status, "No device configured, skipping notification");
        false
    }

    async fn check_connection(&self) -> bool {
        false
    }
}
