pub mod aggregator;
pub mod inspections;
pub mod maintenance;

pub use aggregator::ReportService;
pub use inspections::InspectionService;
pub use maintenance::MaintenanceService;
