pub mod activities_repo;
pub mod connection;
pub mod participants_repo;
pub mod schema;
