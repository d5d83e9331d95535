//! Script-driven host for the query controller: config, logging, input and rendering.
mod app;
mod config;
mod logging;
mod render;
mod script;

pub use app::run_app;
