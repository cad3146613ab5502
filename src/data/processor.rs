//! Data Processor Module
//! Sorting and row extraction for the chart renderer.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: &'static str, row: usize },
}

/// One chart row: a country with its male/female enrollment shares.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country: String,
    pub code: Option<String>,
    pub male: f64,
    pub female: f64,
}

/// Prepares the enrollment table for rendering.
pub struct DataProcessor;

impl DataProcessor {
    /// Sort by female share ascending, so the lowest share lands on the
    /// bottom bar of the chart.
    pub fn sort_by_female(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let sorted = df
            .clone()
            .lazy()
            .sort(["female"], SortMultipleOptions::default())
            .collect()?;
        Ok(sorted)
    }

    /// Extract plain rows from the table. A null "code" cell means the row
    /// gets no flag annotation; null country names or percentages are errors.
    pub fn to_rows(df: &DataFrame) -> Result<Vec<CountryRow>, ProcessorError> {
        let country = df.column("country")?;
        let code = df.column("code")?;
        let male = df.column("male")?.cast(&DataType::Float64)?;
        let male = male.f64()?;
        let female = df.column("female")?.cast(&DataType::Float64)?;
        let female = female.f64()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let name = country.get(i)?;
            if name.is_null() {
                return Err(ProcessorError::MissingValue {
                    column: "country",
                    row: i,
                });
            }
            let code_val = code.get(i)?;
            let code_val = if code_val.is_null() {
                None
            } else {
                Some(code_val.to_string().trim_matches('"').to_string())
            };

            rows.push(CountryRow {
                country: name.to_string().trim_matches('"').to_string(),
                code: code_val,
                male: male.get(i).ok_or(ProcessorError::MissingValue {
                    column: "male",
                    row: i,
                })?,
                female: female.get(i).ok_or(ProcessorError::MissingValue {
                    column: "female",
                    row: i,
                })?,
            });
        }

        Ok(rows)
    }
}
