//! Core library for the task lists application
//!
//! This crate contains the core business logic, including:
//! - The list and item model
//! - Sorting by priority and by deadline
//! - List storage

pub mod error;
pub mod list;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
