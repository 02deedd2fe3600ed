//! Infrastructure Layer
//!
//! PostgreSQL and in-memory stores, and the HTTP scoring client.

pub mod memory;
pub mod postgres;
pub mod prediction;

pub use memory::InMemoryClinicRepository;
pub use postgres::PgClinicRepository;
pub use prediction::HttpPredictionClient;
