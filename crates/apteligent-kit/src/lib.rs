//! Apteligent kit for Rust.
//!
//! Forwards host analytics events (breadcrumbs, commerce, screen views,
//! exceptions, network timings, user attributes, opt-out) to the Apteligent
//! crash and performance monitoring SDK, and hands one
//! [`ReportingMessage`] back to the host per forwarded call.
//!
//! The vendor binding is abstracted behind [`vendor::VendorSdk`]; the crate
//! ships [`vendor::RecordingSdk`] as an in-memory implementation.
//!
//! # Example
//!
//! ```rust
//! use apteligent_kit::vendor::RecordingSdk;
//! use apteligent_kit::{
//!     ApteligentKit, CommerceEvent, Environment, ProductAction, TransactionAttributes,
//! };
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), apteligent_kit::Error> {
//! let settings = HashMap::from([
//!     ("appid".to_string(), "crit_app".to_string()),
//!     ("service_monitoring_enabled".to_string(), "true".to_string()),
//! ]);
//! let mut kit = ApteligentKit::new(RecordingSdk::new(), &settings, Environment::Production)?;
//!
//! let purchase = CommerceEvent::new(ProductAction::Purchase)
//!     .with_transaction_attributes(TransactionAttributes::with_revenue(29.99));
//! let messages = kit.log_commerce_event(&purchase);
//! assert_eq!(messages.len(), 1);
//! # Ok(())
//! # }
//! ```

mod commerce;
mod config;
mod error;
mod kit;
mod types;
pub mod vendor;

pub use commerce::{CommerceEvent, Product, ProductAction, TransactionAttributes};
pub use config::{Environment, KitSettings, APP_ID_KEY, KIT_NAME, SERVICE_MONITORING_KEY};
pub use error::Error;
pub use kit::{sanitize_attribute_key, ApteligentKit};
pub use types::{
    Event, ExceptionEvent, IdentityType, KitEvent, MessageType, NetworkPerformance,
    ReportingMessage,
};
