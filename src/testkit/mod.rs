//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`engine`] - `ScriptedEngine`, an in-memory container engine that
//!   records every call and fails on demand.
//! - [`directory`] - `MemoryDirectory`, an in-memory host inventory.
//! - [`fixtures`] - Canonical catalogs and orchestrators wired to the fakes.

pub mod directory;
pub mod engine;
pub mod fixtures;
