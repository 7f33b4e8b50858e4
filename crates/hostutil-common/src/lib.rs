//! # hostutil-common
//!
//! Shared types for the hostutil crates.
//!
//! This crate provides:
//! - The common error type and result alias
//! - The ordered batch failure aggregate used by multi-path operations
//! - Configuration defaults for mount-point creation and unmount policy

#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod error;

pub use batch::{BatchErrors, BatchFailure};
pub use config::MountConfig;
pub use error::{HostutilError, HostutilResult};
