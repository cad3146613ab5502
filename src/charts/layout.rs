//! Chart Layout Module
//! Palette, geometry constants and label placement rules.

use plotters::style::RGBColor;
use std::path::PathBuf;

/// Bar colors: male blue, female orange.
pub const MALE_COLOR: RGBColor = RGBColor(0x1F, 0x77, 0xB4);
pub const FEMALE_COLOR: RGBColor = RGBColor(0xFF, 0x7F, 0x0E);

pub const GRID_COLOR: RGBColor = RGBColor(128, 128, 128);
pub const FOOTER_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Percentage axis tick spacing.
pub const X_TICK_STEP: f64 = 10.0;
/// The highlighted parity line.
pub const MIDLINE_PCT: f64 = 50.0;
/// Segments narrower than this get their label outside the bar.
pub const INSIDE_LABEL_MIN: f64 = 5.0;
/// Gap between a bar end and an outside label, in percent points.
pub const LABEL_GAP: f64 = 1.0;
/// Half the bar thickness in row units (rows are 1.0 apart).
pub const BAR_HALF: f64 = 0.4;

/// Horizontal spans of one stacked row: the male segment starts at zero, the
/// female segment is drawn end-to-end after it.
pub fn segments(male: f64, female: f64) -> ((f64, f64), (f64, f64)) {
    ((0.0, male), (male, male + female))
}

/// Where a percentage label goes, with its anchor x in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelPlacement {
    /// Centered inside the segment (white, bold).
    Inside(f64),
    /// Left-aligned just past the segment end (black).
    Outside(f64),
}

/// Placement rule for a segment starting at `start` and `width` wide.
pub fn label_anchor(start: f64, width: f64) -> LabelPlacement {
    if width > INSIDE_LABEL_MIN {
        LabelPlacement::Inside(start + width / 2.0)
    } else {
        LabelPlacement::Outside(start + width + LABEL_GAP)
    }
}

/// Horizontal center of the plot area in data coordinates. Distinct from
/// the 50% mark: the x-range extends left of zero for names and flags.
pub fn x_axis_center(x_min: f64, x_max: f64) -> f64 {
    (x_min + x_max) / 2.0
}

/// Tick positions from 0 to `max` inclusive.
pub fn x_ticks(max: f64) -> Vec<f64> {
    let mut ticks = Vec::new();
    let mut t = 0.0;
    while t <= max + 1e-9 {
        ticks.push(t);
        t += X_TICK_STEP;
    }
    ticks
}

/// Everything the renderer needs to know about one chart variant. The two
/// binaries and the tests drive the same renderer with different styles.
#[derive(Debug, Clone)]
pub struct InfographicStyle {
    pub width: u32,
    pub height: u32,
    /// Left edge of the x-range; the region left of 0 hosts names and flags.
    pub x_min: f64,
    pub x_max: f64,
    pub male_color: RGBColor,
    pub female_color: RGBColor,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub x_label: Option<String>,
    pub source_line: Option<String>,
    pub grid: bool,
    pub midline: bool,
    pub bar_labels: bool,
    pub row_labels: bool,
    pub tick_labels: bool,
    pub legend: bool,
    pub flags: bool,
    pub logo: bool,
    /// Directory holding `<code>.png` flags and the logo.
    pub flag_dir: PathBuf,
}

impl Default for InfographicStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1800,
            x_min: -15.0,
            x_max: 100.0,
            male_color: MALE_COLOR,
            female_color: FEMALE_COLOR,
            title: Some("Tertiary Education Enrollment by Sex".to_string()),
            subtitle: Some("in EU 27 and Other Countries".to_string()),
            x_label: Some("Enrollment Percentage (%)".to_string()),
            source_line: Some(
                "Source: Eurostat | Data: 2022 | \
                 https://ec.europa.eu/eurostat/databrowser/view/\
                 educ_uoe_enrt03__custom_13017565/default/table"
                    .to_string(),
            ),
            grid: true,
            midline: true,
            bar_labels: true,
            row_labels: true,
            tick_labels: true,
            legend: true,
            flags: true,
            logo: true,
            flag_dir: PathBuf::from("flags"),
        }
    }
}

impl InfographicStyle {
    /// A style with every textual and file-based annotation turned off.
    /// Draws bars, grid and the parity line only.
    pub fn bare(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: None,
            subtitle: None,
            x_label: None,
            source_line: None,
            bar_labels: false,
            row_labels: false,
            tick_labels: false,
            legend: false,
            flags: false,
            logo: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_stacked_end_to_end() {
        let ((m0, m1), (f0, f1)) = segments(40.3, 59.7);
        assert_eq!(m0, 0.0);
        assert_eq!(m1, 40.3);
        assert_eq!(f0, 40.3);
        assert!((f1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn wide_segment_labels_centered_inside() {
        assert_eq!(label_anchor(0.0, 40.0), LabelPlacement::Inside(20.0));
        assert_eq!(label_anchor(40.0, 60.0), LabelPlacement::Inside(70.0));
    }

    #[test]
    fn narrow_segment_labels_pushed_outside() {
        // At the 5-point threshold the label still goes outside.
        assert_eq!(label_anchor(0.0, 5.0), LabelPlacement::Outside(6.0));
        assert_eq!(label_anchor(95.0, 3.0), LabelPlacement::Outside(99.0));
    }

    #[test]
    fn axis_center_accounts_for_the_left_margin() {
        // Midpoint of -15..100, not the 50% parity mark.
        assert_eq!(x_axis_center(-15.0, 100.0), 42.5);
        assert_eq!(x_axis_center(-20.0, 100.0), 40.0);
    }

    #[test]
    fn ticks_cover_zero_to_max() {
        let ticks = x_ticks(100.0);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(*ticks.last().unwrap(), 100.0);
    }

    #[test]
    fn bare_style_has_no_annotations() {
        let style = InfographicStyle::bare(400, 300);
        assert!(style.title.is_none());
        assert!(!style.bar_labels && !style.row_labels && !style.tick_labels);
        assert!(!style.flags && !style.logo && !style.legend);
        assert!(style.grid && style.midline);
    }
}
