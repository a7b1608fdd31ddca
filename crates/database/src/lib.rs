//! # Agrotrack Database Crate
//!
//! The system's record store: everything that persists production records
//! sits behind the `RecordStore` trait.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** All SQL lives here. The rest of the application only
//!   sees `RecordStore` and the types from `core-types`.
//! - **Asynchronous & Pooled:** The PostgreSQL repository uses a `PgPool`.
//! - **Swappable:** `MemoryRepository` implements the same contract in process
//!   memory for tests and dry runs.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool creation and schema setup.
//! - `RecordStore`: the CRUD + search contract.
//! - `DbRepository`: PostgreSQL implementation.
//! - `MemoryRepository`: in-memory implementation.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::MemoryRepository;
pub use repository::DbRepository;
pub use store::RecordStore;
