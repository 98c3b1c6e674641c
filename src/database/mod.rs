mod connection;
mod seed;

pub use connection::{check_health, create_pool, run_migrations};
pub use seed::{SeedReport, seed_if_empty};
