//! Seeding engine for Seedforge: batch factory, seeder lifecycle, and the
//! orchestrator that runs registered seeders in dependency order.

pub mod batch;
pub mod orchestrator;
pub mod seeder;
pub mod seeders;

pub use batch::{BatchFactory, RecordFactory};
pub use orchestrator::{DEFAULT_ORDER, Orchestrator};
pub use seeder::{Seeder, SeederPhase};
