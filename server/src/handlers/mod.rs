//! HTTP handlers

pub mod connections;
pub mod health;
pub mod processes;
pub mod reports;
pub mod scan;
