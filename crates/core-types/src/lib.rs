//! # Agrotrack Core Types
//!
//! Layer 0 of the workspace: the plain data structures every other crate
//! speaks in. No I/O, no knowledge of storage or export formats.

pub mod date;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use date::{is_valid_format, DateValue, DEFAULT_DATE_FORMAT};
pub use enums::ProductionStatus;
pub use error::CoreError;
pub use structs::{NewProductionRecord, PRICE_LIMIT, QUANTITY_LIMIT, ProductionPatch, ProductionRecord, SearchFilter};
