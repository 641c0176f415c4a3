//! # academy-database
//!
//! Connection management, migrations, and one repository trait per entity.
//! Every trait has a PostgreSQL implementation (`Pg*Repository`) and is also
//! implemented by [`MemoryDatabase`] for tests and single-node runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use repositories::{Repositories, StoreHealth};
