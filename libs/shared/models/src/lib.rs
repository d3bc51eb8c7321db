pub mod accounts;
pub mod auth;
pub mod dispatch;
pub mod error;
pub mod filters;
pub mod fleet;
pub mod pagination;
pub mod patch;
pub mod patients;
pub mod reports;

pub use error::AppError;
pub use pagination::Page;
