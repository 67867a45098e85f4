//! Tag Station - price label queue and printing for ZPL label printers
//!
//! # Module structure
//!
//! ```text
//! tag-station/src/
//! ├── core/          # configuration, station assembly
//! ├── common/        # logging
//! ├── printing/      # tier table, renderer, gateway, executor, service
//! └── queue/         # pending queue + redb persistence
//! ```
//!
//! The two caller-facing operations are [`printing::encode`] (label → ZPL)
//! and [`PrintExecutor::print_all`] (ordered batch dispatch).

pub mod common;
pub mod core;
pub mod printing;
pub mod queue;

// Re-exports
pub use common::logger::init_logger_with_file;
pub use core::{Config, open_station};
pub use printing::{
    Device, DeviceGateway, DispatchOptions, DispatchState, DispatchStatus, GatewayError,
    LabelPrintService, NetworkGateway, PriceTagRenderer, PrintExecutor, PrintOutcome,
    ServiceError, encode,
};
pub use queue::{PendingQueue, QueueStorage};
