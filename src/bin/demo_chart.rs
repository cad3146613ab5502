//! Demo chart: three dummy countries through the same rendering path as the
//! full infographic, with a reduced annotation set. Useful for checking the
//! bar/flag layout without the Eurostat dataset.

use std::path::{Path, PathBuf};

use anyhow::Context;
use plotters::style::RGBColor;
use tracing::info;
use tracing_subscriber::EnvFilter;

use enrollchart::charts::{InfographicRenderer, InfographicStyle};
use enrollchart::data::{DataProcessor, EnrollmentDataset};

const OUTPUT_PATH: &str = "enrollment_demo.png";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let df = EnrollmentDataset::dummy().context("building the dummy dataset")?;
    // Rows stay in insertion order here; only the full infographic sorts.
    let rows = DataProcessor::to_rows(&df).context("extracting chart rows")?;

    let style = InfographicStyle {
        width: 1000,
        height: 600,
        x_min: -20.0,
        male_color: RGBColor(0, 0, 255),
        female_color: RGBColor(255, 192, 203),
        title: Some("Enrollment by Country and Gender".to_string()),
        subtitle: None,
        x_label: Some("Enrollment (%)".to_string()),
        source_line: None,
        grid: false,
        midline: false,
        bar_labels: false,
        legend: false,
        logo: false,
        flag_dir: PathBuf::from("flags"),
        ..InfographicStyle::default()
    };

    InfographicRenderer::new(style)
        .render(&rows, Path::new(OUTPUT_PATH))
        .context("rendering the demo chart")?;
    info!("demo chart written to {OUTPUT_PATH}");

    Ok(())
}
