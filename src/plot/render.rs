use std::ops::Range;

use log::debug;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::axis::{day_range, year_label, year_ticks, TickAxis};
use super::boxplot::yearly_boxes;
use super::figure::{mean_legend, regression_legend, Figure, FigureKind};
use crate::analysis::{LinearFit, Summary};
use crate::color::YearColors;
use crate::data::model::{day_number, SstSeries};
use crate::error::{Result, SstError};

const FONT: &str = "sans-serif";
const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const LINE_COLOR: RGBColor = RGBColor(214, 39, 40);
const BOX_HALF_WIDTH: f64 = 0.3;

/// Upper bound on labelled x ticks; more years are thinned evenly.
const MAX_X_LABELS: usize = 20;
const LABEL_FONT_SIZE: u32 = 14;
const LABEL_ANGLE: f64 = std::f64::consts::FRAC_PI_4;
/// Gap between the bottom of the plot area and the end of a tick label.
const LABEL_OFFSET: i32 = 8;

type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<TickAxis, RangedCoordf64>>;

/// An x tick label to be drawn at 45° once the chart is finished.
#[derive(Debug, Clone, PartialEq)]
struct TickLabel {
    text: String,
    /// Backend pixel where the end of the text sits.
    anchor: (i32, i32),
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Render all four figures.
pub fn render_all(series: &SstSeries, summary: &Summary) -> Result<Vec<Figure>> {
    FigureKind::ALL
        .iter()
        .map(|&kind| render(kind, series, summary))
        .collect()
}

/// Render one figure into an RGB raster.
pub fn render(kind: FigureKind, series: &SstSeries, summary: &Summary) -> Result<Figure> {
    let (width, height) = kind.pixel_size();
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    let render_error = |message| SstError::Render {
        figure: kind.to_string(),
        message,
    };

    let drawn = {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw(kind, &root, series, summary)
    };
    let labels = drawn.map_err(render_error)?;
    for label in &labels {
        stamp_label(&mut pixels, (width, height), label).map_err(render_error)?;
    }

    debug!("rendered {kind} figure ({width}x{height})");
    Ok(Figure {
        kind,
        width,
        height,
        pixels,
    })
}

/// End points of the fitted line over the observed dates, in day numbers.
pub fn regression_segment(series: &SstSeries, fit: &LinearFit) -> ((f64, f64), (f64, f64)) {
    let days = series.day_numbers();
    let first = days.iter().copied().fold(f64::INFINITY, f64::min);
    let last = days.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ((first, fit.predict(first)), (last, fit.predict(last)))
}

// Plotters errors are generic over the backend; they are flattened to text.
fn draw(
    kind: FigureKind,
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    series: &SstSeries,
    summary: &Summary,
) -> std::result::Result<Vec<TickLabel>, String> {
    root.fill(&WHITE).map_err(|e| e.to_string())?;
    let y_range = kind.y_range().resolve(series);

    let labels = match kind {
        FigureKind::Scatter => {
            let (mut chart, labels) = date_chart(root, kind, series, y_range)?;
            draw_points(&mut chart, series)?;
            labels
        }
        FigureKind::Mean => {
            let (mut chart, labels) = date_chart(root, kind, series, y_range)?;
            draw_points(&mut chart, series)?;
            let x = day_range(series);
            let mean = summary.descriptive.mean_celsius;
            draw_line(&mut chart, (x.start, mean), (x.end, mean), mean_legend(mean))?;
            draw_legend(&mut chart)?;
            labels
        }
        FigureKind::Regression => {
            let (mut chart, labels) = date_chart(root, kind, series, y_range)?;
            draw_points(&mut chart, series)?;
            let fit = &summary.regression;
            let (from, to) = regression_segment(series, fit);
            draw_line(&mut chart, from, to, regression_legend(fit.slope, fit.intercept))?;
            draw_legend(&mut chart)?;
            labels
        }
        FigureKind::Boxplot => draw_boxplot(root, series, y_range)?,
    };

    root.present().map_err(|e| e.to_string())?;
    Ok(labels)
}

// ---------------------------------------------------------------------------
// Chart frame shared by all figures
// ---------------------------------------------------------------------------

/// Caption, mesh and axis titles. Plotters only turns text by quarter turns,
/// so its own x labels are transparent and the returned labels are stamped
/// at 45° afterwards.
fn framed_chart<'a, 'b: 'a>(
    root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    kind: FigureKind,
    x_axis: TickAxis,
    y_range: Range<f64>,
    label: impl Fn(f64) -> String,
) -> std::result::Result<(Chart<'a, 'b>, Vec<TickLabel>), String> {
    let ticks = x_axis.ticks(MAX_X_LABELS);
    let y_bottom = y_range.start;

    let mut chart = ChartBuilder::on(root)
        .caption(kind.title(), (FONT, 26))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d(x_axis, y_range)
        .map_err(|e| e.to_string())?;

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(MAX_X_LABELS)
        .x_label_style((FONT, LABEL_FONT_SIZE).into_font().color(&BLACK.mix(0.0)))
        .x_desc("Year")
        .y_desc("SST (°C)");
    if kind == FigureKind::Boxplot {
        mesh.disable_x_mesh();
    }
    mesh.draw().map_err(|e| e.to_string())?;

    let labels = ticks
        .into_iter()
        .map(|t| {
            let (x, y) = chart.backend_coord(&(t, y_bottom));
            TickLabel {
                text: label(t),
                anchor: (x, y + LABEL_OFFSET),
            }
        })
        .collect();
    Ok((chart, labels))
}

/// Figures 1–3: day-number x axis with year ticks at 1 January.
fn date_chart<'a, 'b: 'a>(
    root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    kind: FigureKind,
    series: &SstSeries,
    y_range: Range<f64>,
) -> std::result::Result<(Chart<'a, 'b>, Vec<TickLabel>), String> {
    let x_range = day_range(series);
    let ticks = year_ticks(&x_range);
    framed_chart(root, kind, TickAxis::new(x_range, ticks), y_range, year_label)
}

fn draw_points<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    series: &SstSeries,
) -> std::result::Result<(), String> {
    chart
        .draw_series(series.records.iter().map(|r| {
            Circle::new(
                (day_number(r.date), r.sst_celsius),
                2,
                POINT_COLOR.mix(0.6).filled(),
            )
        }))
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn draw_line<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    from: (f64, f64),
    to: (f64, f64),
    label: String,
) -> std::result::Result<(), String> {
    chart
        .draw_series(LineSeries::new(vec![from, to], LINE_COLOR.stroke_width(2)))
        .map_err(|e| e.to_string())?
        .label(label)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_COLOR.stroke_width(2)));
    Ok(())
}

fn draw_legend<'a, 'b: 'a>(chart: &mut Chart<'a, 'b>) -> std::result::Result<(), String> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 16))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Boxplot (figure 4)
// ---------------------------------------------------------------------------

fn draw_boxplot(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    series: &SstSeries,
    y_range: Range<f64>,
) -> std::result::Result<Vec<TickLabel>, String> {
    let boxes = yearly_boxes(series);
    let colors = YearColors::new(&series.years());
    let (first, last) = match (boxes.keys().next(), boxes.keys().next_back()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => (0, 0),
    };
    let years: Vec<f64> = boxes.keys().map(|&y| y as f64).collect();
    let x_axis = TickAxis::new((first as f64 - 0.5)..(last as f64 + 0.5), years);

    let (mut chart, labels) = framed_chart(root, FigureKind::Boxplot, x_axis, y_range, |x| {
        format!("{}", x.round() as i64)
    })?;

    for (&year, stats) in &boxes {
        let x = year as f64;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let cap = BOX_HALF_WIDTH / 2.0;
        let fill = colors.color_for(year);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, stats.q1), (right, stats.q3)],
                fill.filled(),
            )))
            .map_err(|e| e.to_string())?;

        let outline = BLACK.stroke_width(1);
        let segments = vec![
            vec![(left, stats.q1), (right, stats.q1), (right, stats.q3), (left, stats.q3), (left, stats.q1)],
            vec![(left, stats.median), (right, stats.median)],
            vec![(x, stats.q1), (x, stats.whisker_low)],
            vec![(x, stats.q3), (x, stats.whisker_high)],
            vec![(x - cap, stats.whisker_low), (x + cap, stats.whisker_low)],
            vec![(x - cap, stats.whisker_high), (x + cap, stats.whisker_high)],
        ];
        chart
            .draw_series(segments.into_iter().map(|points| PathElement::new(points, outline)))
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 3, BLACK.stroke_width(1))),
            )
            .map_err(|e| e.to_string())?;
    }

    Ok(labels)
}

// ---------------------------------------------------------------------------
// 45° tick labels
// ---------------------------------------------------------------------------

/// Draw `label` into the finished RGB raster, rotated 45° counter-clockwise
/// with the end of the text at its anchor. Glyphs are rendered upright into
/// a scratch raster and sampled back with nearest-neighbour lookup; the
/// darker channel wins so the background is left untouched.
fn stamp_label(
    pixels: &mut [u8],
    (width, height): (u32, u32),
    label: &TickLabel,
) -> std::result::Result<(), String> {
    let glyph_w = LABEL_FONT_SIZE * label.text.chars().count() as u32 + 4;
    let glyph_h = LABEL_FONT_SIZE + 6;
    let mut glyphs = vec![255u8; glyph_w as usize * glyph_h as usize * 3];
    {
        let scratch = BitMapBackend::with_buffer(&mut glyphs, (glyph_w, glyph_h)).into_drawing_area();
        let style = TextStyle::from((FONT, LABEL_FONT_SIZE).into_font());
        scratch
            .draw_text(&label.text, &style, (2, 2))
            .map_err(|e| e.to_string())?;
        scratch.present().map_err(|e| e.to_string())?;
    }

    let (cos, sin) = (LABEL_ANGLE.cos(), LABEL_ANGLE.sin());
    let (ax, ay) = label.anchor;
    let reach = (glyph_w + glyph_h) as i32;
    let (gw, gh) = (glyph_w as i32, glyph_h as i32);

    for dy in (ay - gh)..=(ay + reach) {
        for dx in (ax - reach)..=(ax + gh) {
            if dx < 0 || dy < 0 || dx >= width as i32 || dy >= height as i32 {
                continue;
            }
            let (u, v) = (f64::from(dx - ax), f64::from(dy - ay));
            let sx = (u * cos - v * sin).round() as i32 + gw;
            let sy = (u * sin + v * cos).round() as i32;
            if sx < 0 || sy < 0 || sx >= gw || sy >= gh {
                continue;
            }
            let src = (sy as usize * glyph_w as usize + sx as usize) * 3;
            let dst = (dy as usize * width as usize + dx as usize) * 3;
            for c in 0..3 {
                pixels[dst + c] = pixels[dst + c].min(glyphs[src + c]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::mann_kendall::DEFAULT_ALPHA;
    use crate::data::model::NormalizedRecord;
    use crate::pipeline::summarize;
    use chrono::NaiveDate;

    fn three_days() -> SstSeries {
        SstSeries::new(
            [283.15, 288.15, 293.15]
                .iter()
                .enumerate()
                .map(|(i, &k)| {
                    NormalizedRecord::from_kelvin(
                        NaiveDate::from_ymd_opt(2020, 1, 1 + i as u32).unwrap(),
                        k,
                    )
                })
                .collect(),
        )
    }

    fn pixel(fig: &Figure, x: u32, y: u32) -> (u8, u8, u8) {
        let i = (y as usize * fig.width as usize + x as usize) * 3;
        (fig.pixels[i], fig.pixels[i + 1], fig.pixels[i + 2])
    }

    fn is_point(p: (u8, u8, u8)) -> bool {
        p.2 > 150 && p.0 < 170 && p.2 > p.0 + 40
    }

    fn is_line(p: (u8, u8, u8)) -> bool {
        p.0 > 150 && p.1 < 120 && p.2 < 120
    }

    /// Pixel coordinates matching `pred`.
    fn matching(fig: &Figure, pred: impl Fn((u8, u8, u8)) -> bool) -> Vec<(u32, u32)> {
        let mut hits = Vec::new();
        for y in 0..fig.height {
            for x in 0..fig.width {
                if pred(pixel(fig, x, y)) {
                    hits.push((x, y));
                }
            }
        }
        hits
    }

    #[test]
    fn test_renders_all_four_figures() {
        let series = three_days();
        let summary = summarize(&series, DEFAULT_ALPHA).unwrap();
        let figures = render_all(&series, &summary).unwrap();

        assert_eq!(
            figures.iter().map(|f| f.kind).collect::<Vec<_>>(),
            FigureKind::ALL.to_vec()
        );
        for fig in &figures {
            assert_eq!((fig.width, fig.height), fig.kind.pixel_size());
            assert_eq!(fig.pixels.len(), (fig.width * fig.height * 3) as usize);

            // Plot area, away from caption and axis labels.
            let (w, h) = (fig.width, fig.height);
            let inked = (h / 5..h * 4 / 5)
                .flat_map(|y| (w / 5..w * 4 / 5).map(move |x| (x, y)))
                .filter(|&(x, y)| pixel(fig, x, y) != (255, 255, 255))
                .count();
            assert!(inked > 0, "{} figure has an empty plot area", fig.kind);
        }
        assert!(!matching(&figures[0], is_point).is_empty());
    }

    #[test]
    fn test_regression_line_shares_the_scatter_axis() {
        let series = three_days();
        let summary = summarize(&series, DEFAULT_ALPHA).unwrap();

        let (from, to) = regression_segment(&series, &summary.regression);
        assert_eq!(from.0, day_number(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
        assert_eq!(to.0, day_number(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap()));
        approx::assert_relative_eq!(from.1, 10.0, epsilon = 1e-6);
        approx::assert_relative_eq!(to.1, 20.0, epsilon = 1e-6);

        // The line passes through the leftmost and rightmost scatter points.
        let fig = render(FigureKind::Regression, &series, &summary).unwrap();
        let points = matching(&fig, is_point);
        let line = matching(&fig, is_line);
        assert!(!points.is_empty());
        let left = points.iter().map(|p| p.0).min().unwrap();
        let right = points.iter().map(|p| p.0).max().unwrap();
        for column in [left, right] {
            let rows: Vec<u32> = points.iter().filter(|p| p.0.abs_diff(column) <= 3).map(|p| p.1).collect();
            let (top, bottom) = (rows.iter().min().unwrap(), rows.iter().max().unwrap());
            assert!(
                line.iter().any(|&(x, y)| x.abs_diff(column) <= 4 && y + 6 >= *top && y <= bottom + 6),
                "no trend line pixels near scatter column {column}"
            );
        }
    }

    #[test]
    fn test_stamped_label_runs_down_left_of_anchor() {
        let (w, h) = (200u32, 200u32);
        let mut pixels = vec![255u8; (w * h * 3) as usize];
        let label = TickLabel {
            text: "2020".to_string(),
            anchor: (150, 50),
        };
        stamp_label(&mut pixels, (w, h), &label).unwrap();

        let dark: Vec<(i32, i32)> = (0..h as i32)
            .flat_map(|y| (0..w as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| pixels[((y * w as i32 + x) * 3) as usize] < 128)
            .collect();
        assert!(!dark.is_empty());
        let n = dark.len() as i32;
        let (cx, cy) = (
            dark.iter().map(|p| p.0).sum::<i32>() / n,
            dark.iter().map(|p| p.1).sum::<i32>() / n,
        );
        assert!(cx < 150 && cy > 50, "centroid ({cx}, {cy}) not down-left of anchor");
    }

    #[test]
    fn test_label_near_border_is_clipped() {
        let mut pixels = vec![255u8; 10 * 10 * 3];
        let label = TickLabel {
            text: "1999".to_string(),
            anchor: (2, 2),
        };
        stamp_label(&mut pixels, (10, 10), &label).unwrap();
        assert_eq!(pixels.len(), 300);
    }
}
