//! Traffic-quality CSV analysis: cleaning, summary statistics, diagnostic
//! charts, and invalid-traffic (IVT) anomaly flagging.

pub mod clean;
pub mod detect;
pub mod ingest;
pub mod plot;
pub mod report;
pub mod stats;
