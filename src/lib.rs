pub mod app;
pub mod client;
pub mod config;
pub mod features;
pub mod logging;
pub mod persistence;
pub mod runtime;
pub mod shell;
