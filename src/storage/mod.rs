//! SQLite storage module for the horse store
//!
//! Holds the historical records the resolver matches race entries against.

pub mod repository;
pub mod schema;

pub use repository::{HorseRecord, HorseRepository};
