pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::dispatch_routes;
pub use services::{CallService, DispatchWorkflow, TripService};
