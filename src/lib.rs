//! # Ticket Dashboard Library
//!
//! `ticketdash` turns spreadsheet exports of support-ticket records into two
//! per-day series, tickets logged and tickets resolved, and charts them in an
//! interactive desktop dashboard.
//!
//! ## Pipeline
//!
//! - Read a fixed sheet (`-` by default) from every uploaded `.xls`/`.xlsx` file
//! - Stack all rows and drop exact duplicates
//! - Keep, per ticket reference, only the rows with its highest-priority
//!   status (`CLOSED` > `RESOLVED` > `OPEN`); tickets with none of these vanish
//! - Count rows per calendar day of `Date/Time Logged` and `Date Resolved`
//! - Reuse parsed tables for upload sets seen before
//!
//! ## Example
//!
//! ```no_run
//! use ticketdash::config::DashboardConfig;
//! use ticketdash::pipeline::{read_path, run_pipeline, IngestCache};
//!
//! let config = DashboardConfig::default();
//! let mut cache = IngestCache::new(config.ingest_cache_capacity);
//! let files = vec![read_path("tickets.xlsx".as_ref())?];
//!
//! let data = run_pipeline(&files, &config, &mut cache)?;
//! for (date, count) in data.logged.points() {
//!     println!("{}: {}", date, count);
//! }
//! # Ok::<(), ticketdash::DashboardError>(())
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::App as TicketDashApp;
pub use error::DashboardError;
pub use types::{CountSeries, DashboardData, TicketTable, UploadFingerprint, UploadedFile};
