pub mod database;
pub mod error;
pub mod references;
pub mod schema;
pub mod state;
pub mod table;

pub use database::{Database, UnitOfWork};
pub use error::StoreError;
pub use references::StaffRef;
pub use schema::{Schema, Tables};
pub use state::AppState;
pub use table::{Record, Table};
