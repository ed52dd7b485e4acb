//! Jobfeed CLI - Command-line interface for searching and saving vacancies
//!
//! This crate provides the CLI application that ties together all Jobfeed components.

pub mod config;
pub mod display;

pub use config::{Command, Config, DeleteArgs, SearchArgs};
pub use display::render_vacancies;
