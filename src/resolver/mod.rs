// src/resolver/mod.rs

//! Resolution and version reconciliation
//!
//! This module provides:
//! - Two-phase lookup with a fallback classifier for misses
//! - Lock groups that force related packages onto one version
//! - Detection of requested packages that never resolved

mod gap;
mod orchestrator;
mod reconcile;

pub use gap::find_missing;
pub use orchestrator::resolve;
pub use reconcile::{LockGroup, Modification, ReconciliationResult, reconcile};
