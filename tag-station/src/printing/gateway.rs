//! Device gateway
//!
//! The boundary between the dispatcher and whatever actually reaches the
//! printer. Two operations only: find the default device, send one raw
//! command stream to it.

use std::time::Duration;

use serde::Serialize;
use tag_printer::{NetworkPrinter, Printer};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The printing bridge/transport itself is not there
    #[error("Printer bridge not available: {0}")]
    DeviceUnavailable(String),

    /// The bridge works but no printer is registered
    #[error("No printer found: {0}")]
    NoDeviceFound(String),

    #[error("Print failed: {0}")]
    SendFailed(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// A resolved target printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub name: String,
    /// Transport address (e.g. `192.168.1.50:9100`)
    pub uid: String,
    pub connection: String,
}

/// Capability the dispatcher prints through.
///
/// Implementations own their transport; callers guarantee that only one
/// batch uses a gateway at a time.
#[allow(async_fn_in_trait)]
pub trait DeviceGateway {
    async fn resolve_default_device(&self) -> GatewayResult<Device>;

    async fn send(&self, device: &Device, commands: &str) -> GatewayResult<()>;
}

impl<G: DeviceGateway> DeviceGateway for &G {
    async fn resolve_default_device(&self) -> GatewayResult<Device> {
        (**self).resolve_default_device().await
    }

    async fn send(&self, device: &Device, commands: &str) -> GatewayResult<()> {
        (**self).send(device, commands).await
    }
}

/// Gateway over a raw TCP (port 9100) label printer
#[derive(Debug, Clone)]
pub struct NetworkGateway {
    name: String,
    addr: Option<String>,
    connect_timeout: Duration,
    probe_timeout: Duration,
}

impl NetworkGateway {
    pub fn new(name: impl Into<String>, addr: Option<String>) -> Self {
        Self {
            name: name.into(),
            addr,
            connect_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_millis(500),
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, probe: Duration) -> Self {
        self.connect_timeout = connect;
        self.probe_timeout = probe;
        self
    }

    fn printer(&self, addr: &str) -> Result<NetworkPrinter, tag_printer::PrintError> {
        Ok(NetworkPrinter::from_addr(addr)?
            .with_timeout(self.connect_timeout)
            .with_probe_timeout(self.probe_timeout))
    }
}

impl DeviceGateway for NetworkGateway {
    #[instrument(skip(self), fields(printer = %self.name))]
    async fn resolve_default_device(&self) -> GatewayResult<Device> {
        let addr = self.addr.as_deref().ok_or_else(|| {
            GatewayError::NoDeviceFound(
                "no printer address configured (set PRINTER_ADDR)".to_string(),
            )
        })?;

        let printer = self
            .printer(addr)
            .map_err(|e| GatewayError::NoDeviceFound(e.to_string()))?;

        if !printer.is_online().await {
            return Err(GatewayError::DeviceUnavailable(format!(
                "printer at {} is not reachable",
                printer.addr()
            )));
        }

        let device = Device {
            name: self.name.clone(),
            uid: printer.addr().to_string(),
            connection: "network".to_string(),
        };
        info!(uid = %device.uid, "Default printer resolved");
        Ok(device)
    }

    async fn send(&self, device: &Device, commands: &str) -> GatewayResult<()> {
        let printer = self
            .printer(&device.uid)
            .map_err(|e| GatewayError::SendFailed(e.to_string()))?;

        printer
            .print(commands.as_bytes())
            .await
            .map_err(|e| GatewayError::SendFailed(e.to_string()))
    }
}
