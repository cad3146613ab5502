//! Static Infographic Renderer
//! Draws the horizontal stacked-bar chart with plotters into an owned RGB
//! buffer, composites flag/logo overlays into it, then encodes a PNG.
//!
//! Layout:
//! 1. Bold two-line title, centered
//! 2. Plot area: x = enrollment percent, y = one row per country
//!    (row 0 at the bottom); the region left of x = 0 hosts country
//!    names and flags
//! 3. Dashed grid every 10 points, dotted guide at the 50% parity line
//! 4. Male/female segments drawn end-to-end with white edges and
//!    percentage labels (inside when the segment is wide enough)
//! 5. Tick labels above and below, axis label, lower-right legend,
//!    gray source footer, logo at the bottom-left

use std::iter;
use std::path::Path;

use image::{DynamicImage, RgbImage};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use thiserror::Error;
use tracing::{info, warn};

use crate::charts::annotations::{self, AnnotationError};
use crate::charts::layout::{self, InfographicStyle, LabelPlacement, BAR_HALF};
use crate::data::CountryRow;

const LOGO_HEIGHT: u32 = 36;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error("Pixel buffer does not match image dimensions")]
    Buffer,
    #[error("Failed to write PNG: {0}")]
    Encode(#[from] image::ImageError),
}

impl RenderError {
    fn draw<E: std::fmt::Display>(e: E) -> Self {
        RenderError::Draw(e.to_string())
    }
}

type PercentChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// An image to composite into the chart buffer, anchored at its top-left
/// pixel.
struct Overlay {
    x: i32,
    y: i32,
    image: DynamicImage,
}

/// Renders one stacked-bar infographic per [`InfographicStyle`].
pub struct InfographicRenderer {
    style: InfographicStyle,
}

impl InfographicRenderer {
    pub fn new(style: InfographicStyle) -> Self {
        Self { style }
    }

    /// Draw the chart for `rows` (bottom row first) and write a PNG to
    /// `out`.
    pub fn render(&self, rows: &[CountryRow], out: &Path) -> Result<(), RenderError> {
        let (width, height) = (self.style.width, self.style.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        let mut overlays: Vec<Overlay> = Vec::new();

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(RenderError::draw)?;
            self.draw_chart(&root, rows, &mut overlays)?;
            root.present().map_err(RenderError::draw)?;
        }

        for overlay in &overlays {
            blend_overlay(&mut buffer, width, height, overlay);
        }

        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        img.save(out)?;
        info!(path = %out.display(), bars = rows.len(), "wrote infographic");
        Ok(())
    }

    fn draw_chart(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        rows: &[CountryRow],
        overlays: &mut Vec<Overlay>,
    ) -> Result<(), RenderError> {
        let s = &self.style;
        let y_top = if rows.is_empty() {
            1.0 - BAR_HALF
        } else {
            rows.len() as f64 - 1.0 + BAR_HALF + 0.2
        };
        let y_bottom = -BAR_HALF - 0.2;

        let margin_top = if s.title.is_some() { 110 } else { 20 };
        let margin_bottom = if s.x_label.is_some() || s.source_line.is_some() || s.tick_labels {
            90
        } else {
            20
        };

        let mut chart = ChartBuilder::on(root)
            .margin_left(20)
            .margin_right(30)
            .margin_top(margin_top)
            .margin_bottom(margin_bottom)
            .build_cartesian_2d(s.x_min..s.x_max, y_bottom..y_top)
            .map_err(RenderError::draw)?;

        if s.grid {
            for tick in layout::x_ticks(s.x_max) {
                chart
                    .draw_series(DashedLineSeries::new(
                        [(tick, y_bottom), (tick, y_top)],
                        6,
                        4,
                        layout::GRID_COLOR.mix(0.7).stroke_width(1),
                    ))
                    .map_err(RenderError::draw)?;
            }
        }

        self.draw_bars(&mut chart, rows)?;

        // The parity guide goes on top of the bars; only the grid sits below.
        if s.midline {
            chart
                .draw_series(DashedLineSeries::new(
                    [(layout::MIDLINE_PCT, y_bottom), (layout::MIDLINE_PCT, y_top)],
                    2,
                    5,
                    BLACK.mix(0.8).stroke_width(2),
                ))
                .map_err(RenderError::draw)?;
        }

        if s.bar_labels {
            self.draw_bar_labels(&mut chart, rows)?;
        }

        if s.row_labels {
            self.draw_row_labels(&mut chart, rows)?;
        }

        if s.tick_labels {
            self.draw_tick_labels(root, &chart, y_bottom, y_top)?;
        }

        if let Some(x_label) = &s.x_label {
            let style = ("sans-serif", 26)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top));
            let (px, py) =
                chart.backend_coord(&(layout::x_axis_center(s.x_min, s.x_max), y_bottom));
            root.draw(&Text::new(x_label.clone(), (px, py + 32), style))
                .map_err(RenderError::draw)?;
        }

        if s.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .label_font(("sans-serif", 22))
                .draw()
                .map_err(RenderError::draw)?;
        }

        self.draw_titles(root)?;

        if let Some(source_line) = &s.source_line {
            let style = ("sans-serif", 16)
                .into_font()
                .color(&layout::FOOTER_COLOR)
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            root.draw(&Text::new(
                source_line.clone(),
                (s.width as i32 / 2, s.height as i32 - 8),
                style,
            ))
            .map_err(RenderError::draw)?;
        }

        if s.flags {
            self.collect_flags(&chart, rows, overlays)?;
        }

        if s.logo {
            if let Some(logo) = annotations::load_logo(&s.flag_dir, LOGO_HEIGHT)? {
                overlays.push(Overlay {
                    x: 12,
                    y: s.height as i32 - logo.height() as i32 - 12,
                    image: logo,
                });
            }
        }

        Ok(())
    }

    fn draw_bars(&self, chart: &mut PercentChart, rows: &[CountryRow]) -> Result<(), RenderError> {
        let s = &self.style;
        let male_color = s.male_color;
        let female_color = s.female_color;

        {
            let series = chart
                .draw_series(rows.iter().enumerate().map(|(i, row)| {
                    let ((x0, x1), _) = layout::segments(row.male, row.female);
                    let y = i as f64;
                    Rectangle::new([(x0, y - BAR_HALF), (x1, y + BAR_HALF)], male_color.filled())
                }))
                .map_err(RenderError::draw)?;
            if s.legend {
                series.label("Males").legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 12, y + 6)], male_color.filled())
                });
            }
        }

        {
            let series = chart
                .draw_series(rows.iter().enumerate().map(|(i, row)| {
                    let (_, (x0, x1)) = layout::segments(row.male, row.female);
                    let y = i as f64;
                    Rectangle::new(
                        [(x0, y - BAR_HALF), (x1, y + BAR_HALF)],
                        female_color.filled(),
                    )
                }))
                .map_err(RenderError::draw)?;
            if s.legend {
                series.label("Females").legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 12, y + 6)], female_color.filled())
                });
            }
        }

        // White edges over both segments so adjacent bars read separately.
        chart
            .draw_series(rows.iter().enumerate().flat_map(|(i, row)| {
                let (male_span, female_span) = layout::segments(row.male, row.female);
                let y = i as f64;
                [male_span, female_span].map(|(x0, x1)| {
                    Rectangle::new(
                        [(x0, y - BAR_HALF), (x1, y + BAR_HALF)],
                        WHITE.stroke_width(1),
                    )
                })
            }))
            .map_err(RenderError::draw)?;

        Ok(())
    }

    fn draw_bar_labels(
        &self,
        chart: &mut PercentChart,
        rows: &[CountryRow],
    ) -> Result<(), RenderError> {
        let inside_style = FontDesc::new(FontFamily::SansSerif, 20.0, FontStyle::Bold)
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let outside_style = ("sans-serif", 20)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for (i, row) in rows.iter().enumerate() {
            let y = i as f64;
            for (start, width) in [(0.0, row.male), (row.male, row.female)] {
                let text = format!("{:.1}%", width);
                let elem = match layout::label_anchor(start, width) {
                    LabelPlacement::Inside(x) => Text::new(text, (x, y), inside_style.clone()),
                    LabelPlacement::Outside(x) => Text::new(text, (x, y), outside_style.clone()),
                };
                chart
                    .draw_series(iter::once(elem))
                    .map_err(RenderError::draw)?;
            }
        }

        Ok(())
    }

    fn draw_row_labels(
        &self,
        chart: &mut PercentChart,
        rows: &[CountryRow],
    ) -> Result<(), RenderError> {
        let style = ("sans-serif", 22)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));

        for (i, row) in rows.iter().enumerate() {
            chart
                .draw_series(iter::once(Text::new(
                    row.country.clone(),
                    (-layout::LABEL_GAP, i as f64),
                    style.clone(),
                )))
                .map_err(RenderError::draw)?;
        }

        Ok(())
    }

    fn draw_tick_labels(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &PercentChart,
        y_bottom: f64,
        y_top: f64,
    ) -> Result<(), RenderError> {
        let below = ("sans-serif", 18)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let above = ("sans-serif", 18)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));

        for tick in layout::x_ticks(self.style.x_max) {
            let label = format!("{tick:.0}");
            let (px, py) = chart.backend_coord(&(tick, y_bottom));
            root.draw(&Text::new(label.clone(), (px, py + 6), below.clone()))
                .map_err(RenderError::draw)?;
            let (px, py) = chart.backend_coord(&(tick, y_top));
            root.draw(&Text::new(label, (px, py - 6), above.clone()))
                .map_err(RenderError::draw)?;
        }

        Ok(())
    }

    fn draw_titles(&self, root: &DrawingArea<BitMapBackend, Shift>) -> Result<(), RenderError> {
        let center_x = self.style.width as i32 / 2;

        if let Some(title) = &self.style.title {
            let style = FontDesc::new(FontFamily::SansSerif, 34.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top));
            root.draw(&Text::new(title.clone(), (center_x, 18), style))
                .map_err(RenderError::draw)?;
        }

        if let Some(subtitle) = &self.style.subtitle {
            let style = FontDesc::new(FontFamily::SansSerif, 28.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top));
            root.draw(&Text::new(subtitle.clone(), (center_x, 60), style))
                .map_err(RenderError::draw)?;
        }

        Ok(())
    }

    /// Resolve flag images for every row that has a country code and queue
    /// them for compositing, vertically centered in the left margin.
    fn collect_flags(
        &self,
        chart: &PercentChart,
        rows: &[CountryRow],
        overlays: &mut Vec<Overlay>,
    ) -> Result<(), RenderError> {
        let s = &self.style;
        let row_pitch = if rows.len() > 1 {
            let a = chart.backend_coord(&(s.x_min, 0.0)).1;
            let b = chart.backend_coord(&(s.x_min, 1.0)).1;
            (a - b).unsigned_abs()
        } else {
            40
        };
        let flag_height = ((row_pitch as f32 * 0.6) as u32).clamp(8, 40);

        for (i, row) in rows.iter().enumerate() {
            let Some(code) = &row.code else {
                warn!(country = %row.country, "no country code, skipping flag");
                continue;
            };
            if let Some(flag) = annotations::load_flag(&s.flag_dir, code, flag_height)? {
                let (px, py) = chart.backend_coord(&(s.x_min + 0.5, i as f64));
                overlays.push(Overlay {
                    x: px,
                    y: py - flag.height() as i32 / 2,
                    image: flag,
                });
            }
        }

        Ok(())
    }
}

/// Alpha-blend an RGBA overlay into the RGB chart buffer. Pixels falling
/// outside the buffer are dropped.
fn blend_overlay(buffer: &mut [u8], width: u32, height: u32, overlay: &Overlay) {
    let rgba = overlay.image.to_rgba8();
    for (dx, dy, pixel) in rgba.enumerate_pixels() {
        let tx = overlay.x + dx as i32;
        let ty = overlay.y + dy as i32;
        if tx < 0 || ty < 0 || tx >= width as i32 || ty >= height as i32 {
            continue;
        }
        let alpha = pixel[3] as u16;
        if alpha == 0 {
            continue;
        }
        let idx = (ty as usize * width as usize + tx as usize) * 3;
        for c in 0..3 {
            let bg = buffer[idx + c] as u16;
            buffer[idx + c] = ((pixel[c] as u16 * alpha + bg * (255 - alpha)) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn demo_rows() -> Vec<CountryRow> {
        vec![
            CountryRow {
                country: "Country1".into(),
                code: Some("us".into()),
                male: 40.0,
                female: 60.0,
            },
            CountryRow {
                country: "Country2".into(),
                code: None,
                male: 50.0,
                female: 50.0,
            },
        ]
    }

    fn count_near(img: &RgbImage, color: [u8; 3]) -> usize {
        img.pixels()
            .filter(|p| {
                p.0.iter()
                    .zip(color.iter())
                    .all(|(&a, &b)| a.abs_diff(b) <= 2)
            })
            .count()
    }

    #[test]
    fn opaque_overlay_replaces_pixels() {
        let mut buffer = vec![255u8; 4 * 4 * 3];
        let overlay = Overlay {
            x: 1,
            y: 1,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([200, 10, 30, 255]))),
        };
        blend_overlay(&mut buffer, 4, 4, &overlay);

        let idx = (1 * 4 + 1) * 3;
        assert_eq!(&buffer[idx..idx + 3], &[200, 10, 30]);
        // Outside the overlay the background is untouched.
        assert_eq!(&buffer[0..3], &[255, 255, 255]);
    }

    #[test]
    fn transparent_overlay_leaves_background() {
        let mut buffer = vec![100u8; 2 * 2 * 3];
        let overlay = Overlay {
            x: 0,
            y: 0,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]))),
        };
        blend_overlay(&mut buffer, 2, 2, &overlay);
        assert!(buffer.iter().all(|&b| b == 100));
    }

    #[test]
    fn half_alpha_overlay_blends() {
        let mut buffer = vec![0u8; 3];
        let overlay = Overlay {
            x: 0,
            y: 0,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]))),
        };
        blend_overlay(&mut buffer, 1, 1, &overlay);
        // 255 * 128 / 255 = 128.
        assert_eq!(&buffer[..], &[128, 128, 128]);
    }

    #[test]
    fn out_of_bounds_overlay_is_clipped() {
        let mut buffer = vec![0u8; 2 * 2 * 3];
        let overlay = Overlay {
            x: -1,
            y: 1,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]))),
        };
        blend_overlay(&mut buffer, 2, 2, &overlay);
        // Only the pixels landing inside the 2x2 buffer changed.
        assert_eq!(&buffer[0..3], &[0, 0, 0]);
        let idx = (1 * 2) * 3;
        assert_eq!(&buffer[idx..idx + 3], &[9, 9, 9]);
    }

    // The bare style draws no text, so the smoke tests run without any
    // system font installed.
    #[test]
    fn bare_render_paints_both_segments() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bars.png");

        let renderer = InfographicRenderer::new(InfographicStyle::bare(400, 300));
        renderer.render(&demo_rows(), &out).unwrap();

        let img = image::open(&out).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (400, 300));
        assert!(count_near(&img, [0x1F, 0x77, 0xB4]) > 100, "male segment missing");
        assert!(count_near(&img, [0xFF, 0x7F, 0x0E]) > 100, "female segment missing");
    }

    #[test]
    fn parity_guide_stays_visible_across_bars() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("guide.png");

        // One row whose male segment spans the 50% mark.
        let rows = vec![CountryRow {
            country: "Country1".into(),
            code: None,
            male: 60.0,
            female: 40.0,
        }];
        let renderer = InfographicRenderer::new(InfographicStyle::bare(400, 300));
        renderer.render(&rows, &out).unwrap();

        let img = image::open(&out).unwrap().to_rgb8();
        let near = |p: &image::Rgb<u8>, color: [u8; 3]| {
            p.0.iter()
                .zip(color.iter())
                .all(|(&a, &b)| a.abs_diff(b) <= 2)
        };
        let dark = |p: &image::Rgb<u8>| p.0.iter().all(|&c| c < 80);

        // A guide dash must land on the bar itself: some dark pixel with
        // male-colored fill on both sides of it.
        let crosses = img.enumerate_pixels().any(|(x, y, p)| {
            x >= 4
                && x + 4 < img.width()
                && dark(p)
                && near(img.get_pixel(x - 4, y), [0x1F, 0x77, 0xB4])
                && near(img.get_pixel(x + 4, y), [0x1F, 0x77, 0xB4])
        });
        assert!(crosses, "parity guide hidden behind the bars");
    }

    #[test]
    fn empty_dataset_renders_blank_chart() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.png");

        let renderer = InfographicRenderer::new(InfographicStyle::bare(200, 150));
        renderer.render(&[], &out).unwrap();

        let img = image::open(&out).unwrap().to_rgb8();
        assert_eq!(count_near(&img, [0x1F, 0x77, 0xB4]), 0);
    }

    #[test]
    fn flags_are_composited_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let flag = RgbaImage::from_pixel(30, 20, Rgba([0, 200, 0, 255]));
        flag.save(dir.path().join("us.png")).unwrap();

        let mut style = InfographicStyle::bare(400, 300);
        style.flags = true;
        style.flag_dir = dir.path().to_path_buf();

        let out = dir.path().join("flagged.png");
        InfographicRenderer::new(style).render(&demo_rows(), &out).unwrap();

        let img = image::open(&out).unwrap().to_rgb8();
        // Country1's flag is drawn; Country2 has no code and is skipped.
        assert!(count_near(&img, [0, 200, 0]) > 20, "flag overlay missing");
    }
}
