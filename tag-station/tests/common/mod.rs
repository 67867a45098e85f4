//! In-memory gateway shared by the integration tests
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Mutex;

use shared::{Decimal, QueuedLabel};
use tag_station::{Device, DeviceGateway, GatewayError};
use tag_station::printing::GatewayResult;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Records every send; can refuse resolution, fail on a label, or hold sends
#[derive(Default)]
pub struct FakeGateway {
    resolve_error: Option<GatewayError>,
    /// Fail any send whose command stream contains this text
    fail_on: Mutex<Option<String>>,
    /// Sends park until `release` is notified
    gated: bool,
    pub entered: Notify,
    pub release: Notify,
    sent: Mutex<Vec<(Instant, String)>>,
    resolves: Mutex<usize>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unresolvable(error: GatewayError) -> Self {
        Self {
            resolve_error: Some(error),
            ..Self::default()
        }
    }

    pub fn gated() -> Self {
        Self {
            gated: true,
            ..Self::default()
        }
    }

    pub fn fail_on(self, text: &str) -> Self {
        self.set_fail_on(Some(text));
        self
    }

    pub fn set_fail_on(&self, text: Option<&str>) {
        *self.fail_on.lock().unwrap() = text.map(str::to_string);
    }

    /// Command streams in the order they reached the gateway (failed ones included)
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, s)| s.clone()).collect()
    }

    pub fn sent_at(&self) -> Vec<Instant> {
        self.sent.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn resolves(&self) -> usize {
        *self.resolves.lock().unwrap()
    }
}

impl DeviceGateway for FakeGateway {
    async fn resolve_default_device(&self) -> GatewayResult<Device> {
        *self.resolves.lock().unwrap() += 1;
        match &self.resolve_error {
            Some(error) => Err(error.clone()),
            None => Ok(Device {
                name: "ZD421".to_string(),
                uid: "fake:0".to_string(),
                connection: "fake".to_string(),
            }),
        }
    }

    async fn send(&self, _device: &Device, commands: &str) -> GatewayResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((Instant::now(), commands.to_string()));

        if self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }

        let poisoned = self
            .fail_on
            .lock()
            .unwrap()
            .as_deref()
            .is_some_and(|text| commands.contains(text));
        if poisoned {
            return Err(GatewayError::SendFailed("paper out".to_string()));
        }
        Ok(())
    }
}

pub fn label(name: &str, price: &str) -> QueuedLabel {
    QueuedLabel::new(name, Decimal::from_str(price).unwrap(), Vec::new()).unwrap()
}
