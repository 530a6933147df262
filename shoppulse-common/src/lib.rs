//! # ShopPulse Common Library
//!
//! Shared code for the ShopPulse workspace:
//! - The crate-wide error type and `Result` alias
//! - Root folder resolution and configuration loading
//! - Ledger database initialization
//! - The `SalesRecord` model

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
