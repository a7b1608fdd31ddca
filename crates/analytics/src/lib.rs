//! # Agrotrack Analytics Engine
//!
//! Turns raw production records into financial and agronomic figures.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   record store or of file formats. It depends only on `core-types` and the
//!   metric settings from `configuration`.
//! - **Stateless Calculation:** Every call recomputes from the full record
//!   snapshot it is given. Nothing is cached between calls.
//!
//! ## Public API
//!
//! - `MetricsCalculator`: per-record profit, ROI, efficiency, per-unit and growth figures.
//! - `ProductAggregator` / `MonthlyAggregator`: grouping into summary rows.
//! - `rank`: top-N selections over product summaries.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod monthly;
pub mod product;
pub mod rank;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsCalculator;
pub use error::AnalyticsError;
pub use monthly::MonthlyAggregator;
pub use product::ProductAggregator;
pub use report::{DerivedMetrics, MonthlySummary, ProductSummary};
