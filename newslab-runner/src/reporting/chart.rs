//! Two-panel sentiment chart.
//!
//! The upper panel takes two thirds of the plot height and shows close price
//! (left axis) and daily sentiment (right axis) against date. The lower panel
//! scatters sentiment against daily return and carries the correlation in its
//! title.

use std::path::Path;

use chrono::NaiveDate;
use image::RgbImage;
use newslab_core::domain::CombinedRow;

use super::canvas::{colors, interpolate_color, text_column_height, text_size, Canvas};
use super::font::GLYPH_HEIGHT;
use super::ReportError;
use crate::config::ChartConfig;

/// Correlation as printed in the scatter title: three decimals, or `N/A`.
pub fn correlation_label(correlation: Option<f64>) -> String {
    match correlation {
        Some(r) => format!("{r:.3}"),
        None => "N/A".to_string(),
    }
}

/// Render the chart for one ticker and write it as PNG to `path`.
pub fn render_chart(
    rows: &[CombinedRow],
    ticker: &str,
    correlation: Option<f64>,
    config: &ChartConfig,
    path: &Path,
) -> Result<(), ReportError> {
    let img = draw_chart(rows, ticker, correlation, config);
    img.save(path).map_err(|source| ReportError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(ticker, path = %path.display(), "chart written");
    Ok(())
}

/// Draw the chart in memory.
pub fn draw_chart(
    rows: &[CombinedRow],
    ticker: &str,
    correlation: Option<f64>,
    config: &ChartConfig,
) -> RgbImage {
    let (width, height) = config.pixel_size();
    let style = Style::for_size(width, height, config.dpi);
    let mut canvas = Canvas::new(width, height, colors::WHITE);
    let (top, bottom) = layout(width as i64, height as i64, &style);

    draw_time_panel(&mut canvas, top, rows, ticker, &style);
    draw_scatter_panel(&mut canvas, bottom, rows, correlation, &style);
    canvas.into_image()
}

// ─── Geometry ───────────────────────────────────────────────────────

/// Text scales and stroke widths derived from the canvas size.
struct Style {
    title: u32,
    label: u32,
    tick: u32,
    pad: i64,
    price_line: i64,
    sentiment_line: i64,
    marker: i64,
    frame: i64,
}

impl Style {
    fn for_size(width: u32, height: u32, dpi: u32) -> Self {
        let short = width.min(height) as f64;
        let scale = |div: f64| ((short / div).round() as u32).max(1);
        let pt = |points: f64| ((points * dpi as f64 / 72.0).round() as i64).max(1);
        Self {
            title: scale(300.0),
            label: scale(430.0),
            tick: scale(500.0),
            pad: ((short * 0.012).round() as i64).max(2),
            price_line: pt(2.5),
            sentiment_line: pt(2.0),
            marker: pt(3.5),
            frame: pt(0.8),
        }
    }

    fn glyph_h(scale: u32) -> i64 {
        GLYPH_HEIGHT as i64 * scale as i64
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: i64,
    y: i64,
    w: i64,
    h: i64,
}

impl Rect {
    fn right(&self) -> i64 {
        self.x + self.w - 1
    }

    fn bottom(&self) -> i64 {
        self.y + self.h - 1
    }

    fn center_x(&self) -> i64 {
        self.x + self.w / 2
    }
}

fn layout(w: i64, h: i64, st: &Style) -> (Rect, Rect) {
    let tick_w = text_size("-0000.00", st.tick).0;
    let side = 3 * st.pad + Style::glyph_h(st.label) + tick_w;

    let title_band = Style::glyph_h(st.title) + 2 * st.pad;
    let date_band = Style::glyph_h(st.tick) + 2 * st.pad;
    let subtitle_band = Style::glyph_h(st.label) + 2 * st.pad;
    let x_axis_band = Style::glyph_h(st.tick) + Style::glyph_h(st.label) + 3 * st.pad;

    let plot_w = (w - 2 * side).max(1);
    let avail = (h - 2 * st.pad - title_band - date_band - subtitle_band - x_axis_band).max(2);
    let top_h = (avail * 2 / 3).max(1);
    let bottom_h = (avail - top_h).max(1);

    let top = Rect {
        x: side,
        y: st.pad + title_band,
        w: plot_w,
        h: top_h,
    };
    let bottom = Rect {
        x: side,
        y: top.y + top_h + date_band + subtitle_band,
        w: plot_w,
        h: bottom_h,
    };
    (top, bottom)
}

/// Axis range padded 5% on each side; never degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    lo: f64,
    hi: f64,
}

impl Range {
    fn padded(values: impl Iterator<Item = f64>) -> Self {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values.filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !lo.is_finite() {
            return Self { lo: 0.0, hi: 1.0 };
        }
        let span = hi - lo;
        let margin = if span > 0.0 {
            span * 0.05
        } else {
            lo.abs().max(1.0) * 0.05
        };
        Self {
            lo: lo - margin,
            hi: hi + margin,
        }
    }

    fn frac(&self, v: f64) -> f64 {
        (v - self.lo) / (self.hi - self.lo)
    }
}

fn y_px(r: Rect, range: Range, v: f64) -> i64 {
    r.bottom() - (range.frac(v) * (r.h - 1) as f64).round() as i64
}

fn x_px(r: Rect, range: Range, v: f64) -> i64 {
    r.x + (range.frac(v) * (r.w - 1) as f64).round() as i64
}

/// Tick values on a 1/2/5 × 10^k step, plus the decimals needed to print them.
fn nice_ticks(range: Range, target: usize) -> (Vec<f64>, usize) {
    let raw = (range.hi - range.lo) / target.max(1) as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);
    let decimals = (-step.log10().floor()).max(0.0) as usize;

    let first = (range.lo / step).ceil();
    let ticks = (0..=4 * target)
        .map(|i| (first + i as f64) * step)
        .take_while(|v| *v <= range.hi + step * 1e-9)
        .map(|v| if v.abs() < step * 1e-9 { 0.0 } else { v })
        .collect();
    (ticks, decimals)
}

fn date_tick_indices(n: usize, max_ticks: usize) -> Vec<usize> {
    if n <= max_ticks {
        return (0..n).collect();
    }
    let mut idx: Vec<usize> = (0..max_ticks)
        .map(|i| i * (n - 1) / (max_ticks - 1))
        .collect();
    idx.dedup();
    idx
}

// ─── Panels ─────────────────────────────────────────────────────────

fn draw_time_panel(canvas: &mut Canvas, r: Rect, rows: &[CombinedRow], ticker: &str, st: &Style) {
    let title = format!("{ticker} - STOCK PRICE VS NEWS SENTIMENT");
    centered_text(canvas, r.center_x(), st.pad, &title, st.title, colors::BLACK);

    let price = Range::padded(rows.iter().map(|row| row.close));
    let sentiment = Range::padded(rows.iter().map(|row| row.sentiment));

    let first = rows.first().map(|row| row.date);
    let span_days = match (rows.first(), rows.last()) {
        (Some(a), Some(b)) => (b.date - a.date).num_days(),
        _ => 0,
    };
    let x_of = |date: NaiveDate| match first {
        Some(f) if span_days > 0 => {
            let frac = (date - f).num_days() as f64 / span_days as f64;
            r.x + (frac * (r.w - 1) as f64).round() as i64
        }
        _ => r.center_x(),
    };

    let (ticks, decimals) = nice_ticks(price, 5);
    for t in ticks {
        let y = y_px(r, price, t);
        canvas.hline(y, r.x, r.right(), st.frame, colors::GRID);
        let label = format!("{t:.decimals$}");
        let (tw, th) = text_size(&label, st.tick);
        canvas.text(r.x - st.pad - tw, y - th / 2, &label, st.tick, colors::PRICE_BLUE);
    }

    let (ticks, decimals) = nice_ticks(sentiment, 5);
    for t in ticks {
        let y = y_px(r, sentiment, t);
        canvas.hline(y, r.right(), r.right() + st.pad / 2, st.frame, colors::DARK_GRAY);
        let label = format!("{t:.decimals$}");
        let th = Style::glyph_h(st.tick);
        canvas.text(r.right() + st.pad, y - th / 2, &label, st.tick, colors::SENTIMENT_ORANGE);
    }

    for i in date_tick_indices(rows.len(), 6) {
        let x = x_of(rows[i].date);
        canvas.vline(x, r.y, r.bottom(), st.frame, colors::GRID);
        let label = rows[i].date.format("%Y-%m-%d").to_string();
        centered_text(canvas, x, r.bottom() + st.pad, &label, st.tick, colors::DARK_GRAY);
    }

    let price_pts: Vec<_> = rows
        .iter()
        .map(|row| (x_of(row.date), y_px(r, price, row.close)))
        .collect();
    let sentiment_pts: Vec<_> = rows
        .iter()
        .map(|row| (x_of(row.date), y_px(r, sentiment, row.sentiment)))
        .collect();
    canvas.polyline(&price_pts, st.price_line, colors::PRICE_BLUE);
    canvas.polyline(
        &sentiment_pts,
        st.sentiment_line,
        interpolate_color(colors::WHITE, colors::SENTIMENT_ORANGE, 0.85),
    );

    canvas.stroke_rect(r.x, r.y, r.w, r.h, st.frame, colors::DARK_GRAY);

    vertical_label(canvas, st.pad, r, "PRICE ($)", st.label, colors::PRICE_BLUE);
    let right_x = canvas.width() - st.pad - Style::glyph_h(st.label);
    vertical_label(
        canvas,
        right_x,
        r,
        "SENTIMENT SCORE (-1 TO +1)",
        st.label,
        colors::SENTIMENT_ORANGE,
    );

    legend(canvas, r.x + 2 * st.pad, r.y + 2 * st.pad, "CLOSE PRICE", colors::PRICE_BLUE, st);
    let right_legend = "NEWS SENTIMENT";
    let lx = r.right() - 2 * st.pad - legend_width(right_legend, st);
    legend(canvas, lx, r.y + 2 * st.pad, right_legend, colors::SENTIMENT_ORANGE, st);
}

fn draw_scatter_panel(
    canvas: &mut Canvas,
    r: Rect,
    rows: &[CombinedRow],
    correlation: Option<f64>,
    st: &Style,
) {
    let title = format!(
        "SENTIMENT VS DAILY RETURNS (CORRELATION = {})",
        correlation_label(correlation)
    );
    let title_y = r.y - st.pad - Style::glyph_h(st.label);
    centered_text(canvas, r.center_x(), title_y, &title, st.label, colors::BLACK);

    let xs = Range::padded(rows.iter().map(|row| row.sentiment));
    let ys = Range::padded(rows.iter().map(|row| row.daily_return));

    let (ticks, decimals) = nice_ticks(ys, 4);
    for t in ticks {
        let y = y_px(r, ys, t);
        canvas.hline(y, r.x, r.right(), st.frame, colors::GRID);
        let label = format!("{t:.decimals$}");
        let (tw, th) = text_size(&label, st.tick);
        canvas.text(r.x - st.pad - tw, y - th / 2, &label, st.tick, colors::DARK_GRAY);
    }

    let (ticks, decimals) = nice_ticks(xs, 6);
    for t in ticks {
        let x = x_px(r, xs, t);
        canvas.vline(x, r.y, r.bottom(), st.frame, colors::GRID);
        let label = format!("{t:.decimals$}");
        centered_text(canvas, x, r.bottom() + st.pad, &label, st.tick, colors::DARK_GRAY);
    }

    for row in rows {
        let x = x_px(r, xs, row.sentiment);
        let y = y_px(r, ys, row.daily_return);
        canvas.fill_circle(x, y, st.marker, colors::SCATTER_GREEN, 0.7);
    }

    canvas.stroke_rect(r.x, r.y, r.w, r.h, st.frame, colors::DARK_GRAY);

    let xlabel_y = r.bottom() + 2 * st.pad + Style::glyph_h(st.tick);
    centered_text(
        canvas,
        r.center_x(),
        xlabel_y,
        "DAILY AVERAGE SENTIMENT",
        st.label,
        colors::BLACK,
    );
    vertical_label(canvas, st.pad, r, "DAILY RETURN (%)", st.label, colors::BLACK);
}

// ─── Text helpers ───────────────────────────────────────────────────

fn centered_text(canvas: &mut Canvas, cx: i64, y: i64, text: &str, scale: u32, color: image::Rgb<u8>) {
    let (w, _) = text_size(text, scale);
    canvas.text(cx - w / 2, y, text, scale, color);
}

/// Vertical axis label centered on the panel, shrunk until it fits.
fn vertical_label(
    canvas: &mut Canvas,
    x: i64,
    panel: Rect,
    text: &str,
    scale: u32,
    color: image::Rgb<u8>,
) {
    let mut s = scale;
    while s > 1 && text_column_height(text, s) > panel.h {
        s -= 1;
    }
    let h = text_column_height(text, s);
    canvas.text_vertical(x, panel.y + (panel.h - h) / 2, text, s, color);
}

fn legend_width(text: &str, st: &Style) -> i64 {
    let swatch = 3 * Style::glyph_h(st.tick);
    swatch + 3 * st.pad + text_size(text, st.tick).0
}

fn legend(canvas: &mut Canvas, x: i64, y: i64, text: &str, color: image::Rgb<u8>, st: &Style) {
    let swatch = 3 * Style::glyph_h(st.tick);
    let (_, th) = text_size(text, st.tick);
    let w = legend_width(text, st);
    let h = th + 2 * st.pad;

    canvas.fill_rect(x, y, w, h, colors::WHITE);
    canvas.stroke_rect(x, y, w, h, 1, colors::GRID);
    canvas.hline(y + h / 2, x + st.pad, x + st.pad + swatch, st.price_line, color);
    canvas.text(x + 2 * st.pad + swatch, y + st.pad, text, st.tick, colors::BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn small() -> ChartConfig {
        ChartConfig {
            width_in: 4.0,
            height_in: 3.0,
            dpi: 50,
        }
    }

    fn rows(n: usize) -> Vec<CombinedRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        (0..n)
            .map(|i| CombinedRow {
                date: start + chrono::Duration::days(i as i64),
                close: 100.0 + (i % 4) as f64,
                daily_return: ((i % 5) as f64 - 2.0) * 0.7,
                sentiment: if i % 3 == 0 { 0.4 } else { 0.0 },
                ticker: "AAPL".into(),
            })
            .collect()
    }

    fn greenish(img: &RgbImage) -> usize {
        img.pixels()
            .filter(|Rgb([r, g, b])| *g as i32 > *r as i32 + 40 && *g as i32 > *b as i32 + 40)
            .count()
    }

    #[test]
    fn label_formats() {
        assert_eq!(correlation_label(Some(0.12345)), "0.123");
        assert_eq!(correlation_label(Some(-0.5)), "-0.500");
        assert_eq!(correlation_label(None), "N/A");
    }

    #[test]
    fn canvas_matches_inches_times_dpi() {
        let img = draw_chart(&rows(20), "AAPL", Some(0.2), &small());
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn scatter_points_are_drawn() {
        let with_rows = draw_chart(&rows(20), "AAPL", Some(0.2), &small());
        let empty = draw_chart(&[], "XYZ", None, &small());
        assert!(greenish(&with_rows) > 0);
        assert_eq!(greenish(&empty), 0);
    }

    #[test]
    fn price_line_uses_blue() {
        let img = draw_chart(&rows(20), "AAPL", None, &small());
        assert!(img.pixels().any(|p| *p == colors::PRICE_BLUE));
    }

    #[test]
    fn single_row_does_not_panic() {
        let img = draw_chart(&rows(1), "AAPL", None, &small());
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn padded_range_never_degenerate() {
        let r = Range::padded([5.0, 5.0].into_iter());
        assert!(r.lo < 5.0 && r.hi > 5.0);
        let r = Range::padded(std::iter::empty());
        assert_eq!(r, Range { lo: 0.0, hi: 1.0 });
    }

    #[test]
    fn ticks_use_round_steps() {
        let (ticks, decimals) = nice_ticks(Range { lo: -0.05, hi: 1.05 }, 5);
        assert_eq!(decimals, 1);
        assert_eq!(ticks, vec![0.0, 0.5, 1.0]);

        let (ticks, decimals) = nice_ticks(Range { lo: 96.0, hi: 104.0 }, 5);
        assert_eq!(decimals, 0);
        assert_eq!(ticks, vec![96.0, 98.0, 100.0, 102.0, 104.0]);
    }

    #[test]
    fn date_ticks_span_first_to_last() {
        assert_eq!(date_tick_indices(3, 6), vec![0, 1, 2]);
        let idx = date_tick_indices(100, 6);
        assert_eq!(idx.first(), Some(&0));
        assert_eq!(idx.last(), Some(&99));
        assert_eq!(idx.len(), 6);
    }

    #[test]
    fn render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL_sentiment_vs_returns.png");
        render_chart(&rows(12), "AAPL", Some(-0.31), &small(), &path).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (200, 150));
    }
}
