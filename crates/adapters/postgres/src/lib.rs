//! wiki-adapter-postgres - PostgreSQL 适配器

mod connection;
mod gateway;
mod schema;
mod unit_of_work;

pub use connection::*;
pub use gateway::*;
pub use schema::*;
pub use unit_of_work::*;
