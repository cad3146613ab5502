//! Enrollment Dataset Module
//! Hard-coded enrollment tables materialized as Polars DataFrames.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to build dataset: {0}")]
    Polars(#[from] PolarsError),
    #[error("Invalid percentage {value} for '{country}'")]
    InvalidPercentage { country: String, value: f64 },
}

/// Eurostat 2022 tertiary-education enrollment shares by sex, in percent of
/// enrolled students per country: (country, male %, female %).
const EUROSTAT_2022: &[(&str, f64, f64)] = &[
    ("Iceland", 34.0, 66.0),
    ("Sweden", 39.4, 60.6),
    ("Bosnia and Herzegovina", 39.8, 60.2),
    ("Poland", 40.3, 59.7),
    ("Albania", 40.7, 59.3),
    ("Estonia", 40.8, 59.2),
    ("Cyprus", 40.9, 59.1),
    ("Slovakia", 41.2, 58.8),
    ("Norway", 41.4, 58.6),
    ("Lithuania", 41.6, 58.4),
    ("Malta", 41.9, 58.1),
    ("North Macedonia", 42.0, 58.0),
    ("Serbia", 42.0, 58.0),
    ("Latvia", 42.2, 57.8),
    ("Slovenia", 42.3, 57.7),
    ("Croatia", 42.4, 57.6),
    ("Denmark", 42.8, 57.2),
    ("Czechia", 42.9, 57.1),
    ("Belgium", 43.6, 56.4),
    ("Italy", 43.8, 56.2),
    ("Romania", 44.5, 55.5),
    ("France", 44.6, 55.4),
    ("Bulgaria", 44.6, 55.4),
    ("European Union - 27", 45.4, 54.6),
    ("Finland", 45.4, 54.6),
    ("Austria", 45.4, 54.6),
    ("Hungary", 45.4, 54.6),
    ("Spain", 45.6, 54.4),
    ("Ireland", 45.6, 54.4),
    ("Portugal", 46.4, 53.6),
    ("Luxembourg", 46.5, 53.5),
    ("Switzerland", 48.7, 51.3),
    ("Germany", 50.0, 50.0),
    ("Türkiye", 50.3, 49.7),
    ("Greece", 50.4, 49.6),
    ("Liechtenstein", 59.9, 40.1),
];

/// Three-row placeholder table used by the demo chart and tests.
const DUMMY: &[(&str, Option<&str>, f64, f64)] = &[
    ("Country1", Some("us"), 40.0, 60.0),
    ("Country2", Some("ca"), 50.0, 50.0),
    ("Country3", Some("mx"), 60.0, 40.0),
];

/// Map a country name to its two-letter code. The mapping intentionally
/// covers more countries than the 2022 table carries, so tables and codes
/// can evolve independently; `None` means "no flag annotation".
pub fn country_code(name: &str) -> Option<&'static str> {
    let code = match name {
        "Austria" => "at",
        "Belgium" => "be",
        "Bulgaria" => "bg",
        "Croatia" => "hr",
        "Cyprus" => "cy",
        "Czechia" => "cz",
        "Denmark" => "dk",
        "Estonia" => "ee",
        "Finland" => "fi",
        "France" => "fr",
        "Germany" => "de",
        "Greece" => "gr",
        "Hungary" => "hu",
        "Ireland" => "ie",
        "Italy" => "it",
        "Latvia" => "lv",
        "Lithuania" => "lt",
        "Luxembourg" => "lu",
        "Malta" => "mt",
        "Netherlands" => "nl",
        "Poland" => "pl",
        "Portugal" => "pt",
        "Romania" => "ro",
        "Slovakia" => "sk",
        "Slovenia" => "si",
        "Spain" => "es",
        "Sweden" => "se",
        "Norway" => "no",
        "Switzerland" => "ch",
        "Iceland" => "is",
        "Liechtenstein" => "li",
        "Bosnia and Herzegovina" => "ba",
        "Albania" => "al",
        "Serbia" => "rs",
        "North Macedonia" => "mk",
        "Türkiye" => "tr",
        "European Union - 27" => "eu",
        _ => return None,
    };
    Some(code)
}

/// Builds the in-memory enrollment tables.
///
/// Output columns: ["country", "code", "male", "female"]; "code" is nullable.
pub struct EnrollmentDataset;

impl EnrollmentDataset {
    /// The Eurostat 2022 table, 36 rows, codes resolved via [`country_code`].
    pub fn eurostat_2022() -> Result<DataFrame, DatasetError> {
        Self::build(
            EUROSTAT_2022
                .iter()
                .map(|&(country, male, female)| (country, country_code(country), male, female)),
        )
    }

    /// The dummy table for the demo chart.
    pub fn dummy() -> Result<DataFrame, DatasetError> {
        Self::build(DUMMY.iter().copied())
    }

    fn build(
        rows: impl Iterator<Item = (&'static str, Option<&'static str>, f64, f64)>,
    ) -> Result<DataFrame, DatasetError> {
        let mut countries: Vec<String> = Vec::new();
        let mut codes: Vec<Option<String>> = Vec::new();
        let mut males: Vec<f64> = Vec::new();
        let mut females: Vec<f64> = Vec::new();

        for (country, code, male, female) in rows {
            for value in [male, female] {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    return Err(DatasetError::InvalidPercentage {
                        country: country.to_string(),
                        value,
                    });
                }
            }
            countries.push(country.to_string());
            codes.push(code.map(str::to_string));
            males.push(male);
            females.push(female);
        }

        let df = DataFrame::new(vec![
            Column::new("country".into(), countries),
            Column::new("code".into(), codes),
            Column::new("male".into(), males),
            Column::new("female".into(), females),
        ])?;

        Ok(df)
    }
}
