//! Price Label Printing Module
//!
//! - `renderer`/`tier`: label fields → ZPL command stream
//! - `gateway`: the device boundary (resolve default printer, send)
//! - `executor`: ordered, paced, stop-at-first-failure batch dispatch
//! - `service`: queue-owning caller of the executor

pub mod executor;
pub mod gateway;
pub mod renderer;
pub mod service;
pub mod tier;
pub mod types;

pub use executor::PrintExecutor;
pub use gateway::{Device, DeviceGateway, GatewayError, GatewayResult, NetworkGateway};
pub use renderer::{PriceTagRenderer, encode, format_price};
pub use service::{LabelPrintService, ServiceError, ServiceResult};
pub use tier::{DigitBucket, PriceTier, STANDARD_TIERS, TierTable};
pub use types::*;
