pub mod calls;
pub mod mirroring;
pub mod trips;
pub mod workflow;

pub use calls::CallService;
pub use trips::TripService;
pub use workflow::DispatchWorkflow;
