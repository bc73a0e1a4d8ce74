//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Vote transitions are decided by the domain; the adapter only
//!   locks, reads, and writes.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: every Diesel or pool failure is mapped to the
//!   calling port's error enum.
//!
//! # Example
//!
//! ```rust,no_run
//! use social_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/social")).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_example_data_seed_repository;
mod diesel_feed_repository;
mod diesel_subject_repository;
mod diesel_user_repository;
mod diesel_vote_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_example_data_seed_repository::DieselExampleDataSeedRepository;
pub use diesel_feed_repository::DieselFeedRepository;
pub use diesel_subject_repository::DieselSubjectRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vote_repository::DieselVoteRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
