pub mod connection;
pub mod events;
pub mod metrics;
pub mod person;
