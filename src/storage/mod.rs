//! Storage implementations for different backends

pub mod in_memory;
pub mod json_file;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod unavailable;

pub use in_memory::InMemoryOrderRepository;
pub use json_file::JsonFileOrderRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresOrderRepository;
pub use unavailable::UnavailableRepository;
