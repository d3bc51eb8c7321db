pub mod ambulances;

pub use ambulances::AmbulanceService;
