//! Print job executor
//!
//! Sends a batch of labels to one device, strictly in order. A label is
//! only sent once the previous send has resolved; the first failure stops
//! the batch.

use shared::QueuedLabel;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use super::gateway::{Device, DeviceGateway, GatewayError, GatewayResult};
use super::renderer::PriceTagRenderer;
use super::types::{DispatchOptions, DispatchState, DispatchStatus, PrintOutcome};

/// Print job executor
///
/// Holds no lock: concurrent `print_all` calls on the same executor are the
/// caller's responsibility to prevent. There is no cancellation; a batch
/// runs to completion or to its first failure.
pub struct PrintExecutor<G> {
    gateway: G,
    renderer: PriceTagRenderer,
    options: DispatchOptions,
    status: watch::Sender<DispatchStatus>,
}

impl<G: DeviceGateway> PrintExecutor<G> {
    /// Create an executor with the standard layout and default pacing
    pub fn new(gateway: G) -> Self {
        let (status, _) = watch::channel(DispatchStatus::default());
        Self {
            gateway,
            renderer: PriceTagRenderer::default(),
            options: DispatchOptions::default(),
            status,
        }
    }

    pub fn with_renderer(mut self, renderer: PriceTagRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn renderer(&self) -> &PriceTagRenderer {
        &self.renderer
    }

    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    /// Watch state transitions and status lines
    pub fn subscribe(&self) -> watch::Receiver<DispatchStatus> {
        self.status.subscribe()
    }

    /// Current status snapshot
    pub fn status(&self) -> DispatchStatus {
        self.status.borrow().clone()
    }

    /// Encode one label exactly as it would be sent
    pub fn encode(&self, label: &QueuedLabel) -> String {
        self.renderer.render(label)
    }

    /// Print a batch in list order
    #[instrument(skip(self, labels), fields(total = labels.len()))]
    pub async fn print_all(&self, labels: &[QueuedLabel]) -> PrintOutcome {
        let outcome = self.dispatch(labels).await;
        let message = outcome.status_message();

        match &outcome {
            PrintOutcome::Succeeded { printed } => info!(printed, "Batch printed"),
            PrintOutcome::PartialFailure {
                printed,
                failed_index,
                failed_label,
                error,
                ..
            } => warn!(
                printed,
                failed_index,
                label_id = %failed_label,
                error = %error,
                "Batch stopped at failed label"
            ),
            PrintOutcome::FatalFailure { error } => {
                error!(error = %error, "Printer resolution failed, nothing sent")
            }
        }

        self.publish(DispatchState::from(&outcome), message.clone());
        self.publish(DispatchState::Idle, message);
        outcome
    }

    async fn dispatch(&self, labels: &[QueuedLabel]) -> PrintOutcome {
        let total = labels.len();
        if total == 0 {
            info!("No labels to print");
            return PrintOutcome::Succeeded { printed: 0 };
        }

        self.publish(DispatchState::ResolvingDevice, "Initializing printer...");
        let device = match self.gateway.resolve_default_device().await {
            Ok(device) => device,
            Err(error) => return PrintOutcome::FatalFailure { error },
        };
        info!(device = %device.name, uid = %device.uid, "Connected to printer");
        self.publish(
            DispatchState::ResolvingDevice,
            format!("Connected to {}", device.name),
        );

        for (index, label) in labels.iter().enumerate() {
            if index > 0 && !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }

            self.publish(
                DispatchState::Printing { index, total },
                format!("Printing {} label(s)...", total),
            );

            let commands = self.renderer.render(label);
            if let Err(error) = self.send(&device, &commands).await {
                return PrintOutcome::PartialFailure {
                    printed: index,
                    total,
                    failed_index: index,
                    failed_label: label.id(),
                    error,
                };
            }
            debug!(index, label_id = %label.id(), bytes = commands.len(), "Label sent");
        }

        PrintOutcome::Succeeded { printed: total }
    }

    async fn send(&self, device: &Device, commands: &str) -> GatewayResult<()> {
        match self.options.send_timeout {
            Some(limit) => tokio::time::timeout(limit, self.gateway.send(device, commands))
                .await
                .map_err(|_| {
                    GatewayError::SendFailed(format!("timed out after {} ms", limit.as_millis()))
                })?,
            None => self.gateway.send(device, commands).await,
        }
    }

    fn publish(&self, state: DispatchState, message: impl Into<String>) {
        self.status.send_replace(DispatchStatus {
            state,
            message: message.into(),
        });
    }
}
