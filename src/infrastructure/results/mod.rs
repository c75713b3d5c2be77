//! Results repository implementations

mod csv_repository;

pub use csv_repository::{CsvResultsRepository, RESULTS_HEADER};
