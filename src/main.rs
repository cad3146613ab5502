//! Enrollchart - Tertiary Education Enrollment Infographic
//!
//! Renders the Eurostat 2022 gender-split infographic (36 countries, bars
//! sorted by female share) and writes it as a PNG to the working directory.

use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use enrollchart::charts::{InfographicRenderer, InfographicStyle};
use enrollchart::data::{DataProcessor, EnrollmentDataset};

const OUTPUT_PATH: &str = "tertiary_education_enrollment_infographic.png";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let df = EnrollmentDataset::eurostat_2022().context("building the enrollment dataset")?;
    let sorted = DataProcessor::sort_by_female(&df).context("sorting by female enrollment")?;
    let rows = DataProcessor::to_rows(&sorted).context("extracting chart rows")?;
    info!(countries = rows.len(), "dataset ready");

    InfographicRenderer::new(InfographicStyle::default())
        .render(&rows, Path::new(OUTPUT_PATH))
        .context("rendering the infographic")?;

    Ok(())
}
