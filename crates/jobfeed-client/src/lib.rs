//! Jobfeed Client - HTTP clients for job listing services
//!
//! This crate provides HTTP clients for interacting with:
//!
//! - [`hh`] - the HeadHunter (hh.ru) vacancy search API
//!
//! # Overview
//!
//! Clients implement [`jobfeed_core::JobBoard`] and handle request
//! building, paging, retries and mapping of HTTP failures onto
//! [`jobfeed_core::AppError`].

pub mod hh;

// Re-export main client types
pub use hh::HeadHunterClient;
