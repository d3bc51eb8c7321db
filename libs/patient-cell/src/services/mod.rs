pub mod patients;

pub use patients::PatientService;
