//! ProcWarden Engine - Process Trust Scoring & Anomaly Detection
//!
//! Converts raw per-process telemetry (name, publisher, CPU, memory, open
//! connections) into a ranked trust assessment.
//!
//! ## Scan pipeline
//! Collector -> Publisher Resolver -> Classifier -> Anomaly Detector ->
//! result assembly -> sort -> persist

pub mod anomaly;
pub mod classifier;
pub mod collector;
pub mod connections;
pub mod publisher;
pub mod report;
pub mod response;
pub mod scanner;
pub mod store;
pub mod types;

pub use scanner::ScanEngine;
pub use types::{ProcessSnapshot, RawProcessSample};
