//! Domain layer for the weather ETL pipeline
//!
//! Contains the cities, readings and daily aggregates the pipeline moves
//! around, plus domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
