//! Domain model for the fact feed.
//!
//! # Responsibility
//! - Define the fact record, vote fields and the static category registry.
//!
//! # Invariants
//! - Every fact is identified by a store-assigned `FactId`.
//! - Derived properties (dispute status) are computed, never stored.

pub mod category;
pub mod fact;
pub mod submission;
