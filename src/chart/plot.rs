/// plotters-backed PNG renderer
use super::{BarChart, ChartRenderer};
use crate::error::Error;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use std::panic;
use std::path::Path;

/// 20 x 10 inches at 96 dpi.
pub const CANVAS_SIZE: (u32, u32) = (1920, 960);

pub const CAPTION: &str = "Bar chart";

/// Flat fill shared by every bar.
pub const BAR_COLOR: RGBColor = RGBColor(241, 90, 96);

/// Renders bar charts to PNG with the plotters bitmap backend.
///
/// Each image is drawn into a temporary file next to the target and renamed
/// into place once complete, so a failed render never leaves a truncated PNG
/// over an earlier one.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    size: (u32, u32),
}

impl PlottersRenderer {
    pub fn new() -> Self {
        Self { size: CANVAS_SIZE }
    }

    /// Renderer with a non-default canvas size (pixels).
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &BarChart<'_>, path: &Path) -> Result<(), Error> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".gffbars-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| Error::io(e, dir))?;

        {
            let backend = BitMapBackend::new(staging.path(), self.size);
            let root = TextSafeBackend::new(backend).into_drawing_area();
            draw_bar_chart(&root, chart).map_err(|e| Error::render(e, path))?;
        }

        staging
            .persist(path)
            .map_err(|e| Error::io(e.error, path))?;
        Ok(())
    }
}

/// Y-axis extent covering zero and every value, with a little headroom.
pub(crate) fn value_range(values: &[i64]) -> (f64, f64) {
    let lo = values.iter().copied().min().unwrap_or(0).min(0) as f64;
    let hi = values.iter().copied().max().unwrap_or(0).max(0) as f64;
    if hi == lo {
        return (lo, lo + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    let lo = if lo < 0.0 { lo - pad } else { lo };
    (lo, hi + pad)
}

fn draw_bar_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    chart: &BarChart<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    // bar i is centred on x = i
    let x_span = chart.values.len().max(1) as f64;
    let (y_min, y_max) = value_range(chart.values);

    let mut ctx = ChartBuilder::on(root)
        .caption(CAPTION, ("sans-serif", 32).into_font())
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(-0.5..(x_span - 0.5), y_min..y_max)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_desc(chart.label)
        .x_desc("record")
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    let (plot_width, _) = ctx.plotting_area().dim_in_pixel();
    let half = 0.5 * f64::from(chart.bar_width) * x_span / f64::from(plot_width.max(1));

    ctx.draw_series(chart.values.iter().enumerate().map(|(i, &value)| {
        let x = i as f64;
        Rectangle::new([(x - half, 0.0), (x + half, value as f64)], BAR_COLOR.filled())
    }))?
    .label(chart.label)
    .legend(|(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], BAR_COLOR.filled()));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Forwards everything to the wrapped backend except text.
///
/// Without a font backend compiled in (`fonts` feature) plotters can lay text
/// out but panics when asked to rasterise it. Text is then drawn from a small
/// built-in bitmap font instead, so captions, axis labels and legends are
/// always visible. With `fonts`, system fonts are used and the bitmap font is
/// only a fallback for hosts where none can be loaded.
struct TextSafeBackend<DB> {
    inner: DB,
}

impl<DB> TextSafeBackend<DB> {
    fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for TextSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        if cfg!(feature = "fonts") {
            let drawn = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                self.inner.draw_text(text, style, pos)
            }));
            if let Ok(Ok(())) = drawn {
                return Ok(());
            }
        }
        self.draw_bitmap_text(text, style, pos)
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        if cfg!(feature = "fonts") {
            self.inner.estimate_text_size(text, style)
        } else {
            Ok(bitmap_text_size(text, style.size()))
        }
    }
}

impl<DB: DrawingBackend> TextSafeBackend<DB> {
    fn draw_bitmap_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyph_scale(style.size());
        let (width, height) = bitmap_text_size(text, style.size());
        let (width, height) = (width as i32, height as i32);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            HPos::Left => 0,
            HPos::Center => -width / 2,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => 0,
            VPos::Center => -height / 2,
            VPos::Bottom => -height,
        };
        // offsets are laid out left to right, then rotated about `pos`
        let transform = style.transform();

        let mut cursor = dx;
        for ch in text.chars() {
            if let Some(rows) = glyph(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_COLS {
                        if (bits >> (GLYPH_COLS - 1 - col)) & 1 == 0 {
                            continue;
                        }
                        let x = cursor + col * scale;
                        let y = dy + row as i32 * scale;
                        for i in 0..scale {
                            for j in 0..scale {
                                let (tx, ty) = transform.transform(x + i, y + j);
                                self.inner.draw_pixel((pos.0 + tx, pos.1 + ty), color)?;
                            }
                        }
                    }
                }
            }
            cursor += (GLYPH_COLS + 1) * scale;
        }
        Ok(())
    }
}

const GLYPH_ROWS: usize = 7;
const GLYPH_COLS: i32 = 5;

/// 5x7 uppercase bitmap font. Each row holds five pixels, leftmost in the
/// high bit. Lowercase letters are drawn as uppercase.
const GLYPHS: &[(char, [u8; GLYPH_ROWS])] = &[
    ('A', [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11]),
    ('B', [0x1e, 0x11, 0x11, 0x1e, 0x11, 0x11, 0x1e]),
    ('C', [0x0e, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0e]),
    ('D', [0x1c, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1c]),
    ('E', [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f]),
    ('F', [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10]),
    ('G', [0x0e, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0f]),
    ('H', [0x11, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11]),
    ('I', [0x0e, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0c]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1f]),
    ('M', [0x11, 0x1b, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
    ('O', [0x0e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e]),
    ('P', [0x1e, 0x11, 0x11, 0x1e, 0x10, 0x10, 0x10]),
    ('Q', [0x0e, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0d]),
    ('R', [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11]),
    ('S', [0x0f, 0x10, 0x10, 0x0e, 0x01, 0x01, 0x1e]),
    ('T', [0x1f, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0a, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0a]),
    ('X', [0x11, 0x11, 0x0a, 0x04, 0x0a, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x11, 0x0a, 0x04, 0x04, 0x04]),
    ('Z', [0x1f, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1f]),
    ('0', [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e]),
    ('1', [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e]),
    ('2', [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f]),
    ('3', [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e]),
    ('4', [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02]),
    ('5', [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e]),
    ('6', [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e]),
    ('7', [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e]),
    ('9', [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c]),
    ('-', [0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x00]),
    ('_', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1f]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x0c]),
    (',', [0x00, 0x00, 0x00, 0x00, 0x0c, 0x04, 0x08]),
];

fn glyph(ch: char) -> Option<&'static [u8; GLYPH_ROWS]> {
    let ch = ch.to_ascii_uppercase();
    GLYPHS.iter().find(|(c, _)| *c == ch).map(|(_, rows)| rows)
}

/// Integer pixel scale for a font size in points.
fn glyph_scale(size: f64) -> i32 {
    ((size / 10.0).round() as i32).max(1)
}

/// Unrotated extent of `text` in the bitmap font.
fn bitmap_text_size(text: &str, size: f64) -> (u32, u32) {
    let scale = glyph_scale(size);
    let chars = text.chars().count() as i32;
    let width = (chars * (GLYPH_COLS + 1) - 1).max(0) * scale;
    (width as u32, (GLYPH_ROWS as i32 * scale) as u32)
}
