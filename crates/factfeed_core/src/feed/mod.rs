//! Feed synchronization: the filtered view and the controller that keeps it
//! consistent with the persistence gateway.
//!
//! # Responsibility
//! - Hold the current filtered view (`store`).
//! - Orchestrate fetches, submissions and votes (`controller`).
//! - Publish changes to the presentation layer (`observer`).

pub mod controller;
pub mod observer;
pub mod store;
