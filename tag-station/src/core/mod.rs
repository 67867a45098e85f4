//! Configuration and station assembly

pub mod config;

pub use config::Config;

use crate::printing::{
    LabelPrintService, NetworkGateway, PriceTagRenderer, PrintExecutor, ServiceResult,
    renderer::LOGO_MAX_DOTS,
};
use crate::queue::{PendingQueue, QueueStorage};

/// Wire the network gateway, renderer and persistent queue from config
pub fn open_station(config: &Config) -> ServiceResult<LabelPrintService<NetworkGateway>> {
    let gateway = NetworkGateway::new(config.printer_name.clone(), config.printer_addr.clone())
        .with_timeouts(config.connect_timeout(), config.probe_timeout());

    let mut renderer = PriceTagRenderer::default();
    if let Some(path) = &config.logo_path {
        match tag_printer::process_logo(path, LOGO_MAX_DOTS) {
            Ok(logo) => renderer = renderer.with_logo(logo),
            Err(e) => tracing::warn!(error = %e, "Logo unavailable, using placeholder"),
        }
    }

    let executor = PrintExecutor::new(gateway)
        .with_renderer(renderer)
        .with_options(config.dispatch_options());

    let db_path = config.queue_db_path();
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!(path = %parent.display(), error = %e, "Failed to create queue directory");
    }
    let queue = PendingQueue::with_storage(QueueStorage::open(&db_path)?)?;
    tracing::debug!(path = %db_path.display(), pending = queue.len(), "Queue loaded");

    Ok(LabelPrintService::new(executor, queue))
}
