//! Tax credit utilization analysis.
//!
//! ```text
//!  CSV text
//!     │
//!     ▼
//!  importer ──► full record set ──► filter ──► active subset
//!                                                 │
//!                              ┌──────────────────┴───────────┐
//!                              ▼                              ▼
//!                           reports                        export
//!                  (groupings, summary metrics)   (CSV text, summary report)
//! ```
//!
//! `session::Session` ties the pieces together for one loaded file.

pub mod cli;
pub mod error;
pub mod export;
pub mod filter;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod reports;
pub mod session;
pub mod settings;
