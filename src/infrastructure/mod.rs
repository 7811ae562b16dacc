// Infrastructure layer module
// Contains the database pool, schema migrations, and repository adapters

pub mod database;
pub mod repositories;
pub mod seed;
