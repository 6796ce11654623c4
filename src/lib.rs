//! appshots: scripted simulator screenshots and store review artifacts
//!
//! Runs declarative automation plans against an iOS simulator through an
//! [`backend::AutomationBackend`], then pairs framed screenshots with their raw
//! captures into a review manifest, an HTML report, and an approval ledger.

pub mod backend;
pub mod cancel;
pub mod cli;
pub mod coalescer;
pub mod config;
pub mod error;
pub mod images;
pub mod logging;
pub mod plan;
pub mod review;
pub mod watch;

pub use error::ShotsError;
