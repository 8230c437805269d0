pub mod accounts;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod telemetry;
