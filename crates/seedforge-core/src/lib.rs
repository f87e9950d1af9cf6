//! Core contracts and shared types for Seedforge.
//!
//! This crate defines the fixture entity model, the store contract consumed
//! by seeders, the error taxonomy, and the result/report types exchanged
//! between the batch factory, seeders, and the orchestrator.

pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod result;
pub mod store;

pub use config::SeedConfig;
pub use error::{SeedError, StoreError};
pub use memory::MemoryStore;
pub use model::{
    AccessLog, Department, License, LogAction, OrgTier, Organization, Permission, Role, User,
};
pub use result::{
    CleanOptions, GenerationOutcome, GenerationRequest, OrchestratorResult, RecordFailure,
    RunConfig, SeedCounts, SeedOptions, SeederResult, SeederRun,
};
pub use store::FixtureStore;
