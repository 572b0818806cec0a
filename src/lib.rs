//! htnx - Hoosat BlockDAG Explorer
//!
//! Terminal client for the Hoosat explorer REST API. It shows live network
//! statistics and transaction details, polling the backend and projecting the
//! responses onto per-view state.
//!
//! ## Architecture
//!
//! - [`api`]: REST client behind the [`api::ExplorerApi`] trait
//! - [`source_stats`] and [`tx_tracker`]: background tasks that poll the API and
//!   emit [`types::AppEvent`]s
//! - [`views`] and [`scheduler`]: start and cancel the tasks behind each view
//! - [`app`] and [`ui`]: display state and ratatui rendering
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features native -- htnx://txs/<id>
//! ```

// Core modules
pub mod config;
pub mod constants;
pub mod types;
pub mod util_text;

// Domain logic (no IO)
pub mod confirm;
pub mod fee;
pub mod stats;

// Networking and background work
pub mod api;
pub mod scheduler;
pub mod source_stats;
pub mod tx_tracker;
pub mod views;

// Presentation
pub mod app;
pub mod router;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{App, InputMode, TxTab};
pub use config::Config;
pub use router::Route;
pub use types::{AppEvent, DagSnapshot, Transaction};
