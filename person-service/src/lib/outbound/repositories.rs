pub mod cached_person;
pub mod connection;
pub mod person;

pub use cached_person::CachedPersonRepository;
pub use connection::PostgresConnectionRepository;
pub use person::PostgresPersonRepository;
