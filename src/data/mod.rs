//! Data module - enrollment tables and row extraction

mod dataset;
mod processor;

pub use dataset::{country_code, DatasetError, EnrollmentDataset};
pub use processor::{CountryRow, DataProcessor, ProcessorError};
