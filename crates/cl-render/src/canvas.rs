use cl_core::color::Rgb;
use cl_core::frame::FrameBuffer;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

/// Lower half block: fg paints the bottom half of the cell, bg the top.
pub const HALF_BLOCK: char = '▄';

fn color_at(fb: &FrameBuffer, x: u32, y: u32) -> Color {
    let (r, g, b, _) = fb.pixel(x, y);
    Color::Rgb(r, g, b)
}

/// Source pixel under virtual pixel `i` of `span` when stretching `len` pixels.
fn sample_index(i: u32, span: u32, len: u32) -> u32 {
    let last = len.saturating_sub(1);
    let index = (u64::from(i) * u64::from(len) / u64::from(span.max(1))).min(u64::from(last));
    u32::try_from(index).unwrap_or(last)
}

/// Écrit une `FrameBuffer` dans un `ratatui::Buffer`, deux pixels par cellule.
///
/// The raster is stretched (nearest neighbour) to `area.width` ×
/// `2 · area.height` virtual pixels. Pas de widget, écriture directe.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::frame::FrameBuffer;
/// use cl_render::canvas::render_frame;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use ratatui::style::Color;
///
/// let mut fb = FrameBuffer::new(1, 2);
/// fb.put(0, 0, Rgb::RED);
/// fb.put(0, 1, Rgb::BLUE);
/// let mut buf = Buffer::empty(Rect::new(0, 0, 1, 1));
/// render_frame(&mut buf, Rect::new(0, 0, 1, 1), &fb);
/// assert_eq!(buf[(0, 0)].bg, Color::Rgb(255, 0, 0));
/// assert_eq!(buf[(0, 0)].fg, Color::Rgb(0, 0, 255));
/// ```
pub fn render_frame(buf: &mut Buffer, area: Rect, fb: &FrameBuffer) {
    if area.is_empty() || fb.width == 0 || fb.height == 0 {
        return;
    }
    let rows = u32::from(area.height) * 2;
    let cols = u32::from(area.width);
    for cy in 0..area.height {
        let top = sample_index(u32::from(cy) * 2, rows, fb.height);
        let bottom = sample_index(u32::from(cy) * 2 + 1, rows, fb.height);
        for cx in 0..area.width {
            let sx = sample_index(u32::from(cx), cols, fb.width);
            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char(HALF_BLOCK)
                    .set_fg(color_at(fb, sx, bottom))
                    .set_bg(color_at(fb, sx, top));
            }
        }
    }
}

/// Vertical gradient, `colors[0]` at the bottom of `area`.
pub fn render_column(buf: &mut Buffer, area: Rect, colors: &[Rgb]) {
    if area.is_empty() || colors.is_empty() {
        return;
    }
    let rows = u32::from(area.height) * 2;
    let len = colors.len() as u32;
    let at = |virtual_row: u32| {
        // Row 0 is the top of the area, the last color.
        let i = sample_index(rows - 1 - virtual_row, rows, len);
        let (r, g, b) = colors[i as usize].to_u8();
        Color::Rgb(r, g, b)
    };
    for cy in 0..area.height {
        let (top, bottom) = (at(u32::from(cy) * 2), at(u32::from(cy) * 2 + 1));
        for cx in 0..area.width {
            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char(HALF_BLOCK).set_fg(bottom).set_bg(top);
            }
        }
    }
}

/// Terminal cell → pixel coordinates of a `width` × `height` raster drawn
/// by [`render_frame`] into `area`. `None` outside the area.
///
/// # Example
/// ```
/// use cl_render::canvas::cell_to_pixel;
/// use ratatui::layout::Rect;
/// let area = Rect::new(10, 5, 32, 16);
/// assert_eq!(cell_to_pixel(area, 64, 64, 10, 5), Some((1.0, 2.0)));
/// assert_eq!(cell_to_pixel(area, 64, 64, 9, 5), None);
/// ```
#[must_use]
pub fn cell_to_pixel(area: Rect, width: u32, height: u32, col: u16, row: u16) -> Option<(f64, f64)> {
    let inside = col >= area.x && col < area.right() && row >= area.y && row < area.bottom();
    if !inside {
        return None;
    }
    // Centre of the cell; vertically the boundary between its two halves.
    let fx = (f64::from(col - area.x) + 0.5) / f64::from(area.width);
    let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    Some((fx * f64::from(width), fy * f64::from(height)))
}

/// Pixel → terminal cell, the inverse of [`cell_to_pixel`].
#[must_use]
pub fn pixel_to_cell(area: Rect, width: u32, height: u32, x: f64, y: f64) -> Option<(u16, u16)> {
    if area.is_empty() || width == 0 || height == 0 {
        return None;
    }
    let fx = (x / f64::from(width)).clamp(0.0, 1.0);
    let fy = (y / f64::from(height)).clamp(0.0, 1.0);
    let col = ((fx * f64::from(area.width)) as u16).min(area.width - 1);
    let row = ((fy * f64::from(area.height)) as u16).min(area.height - 1);
    Some((area.x + col, area.y + row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                fb.put(x, y, if (x + y) % 2 == 0 { Rgb::WHITE } else { Rgb::BLACK });
            }
        }
        fb
    }

    #[test]
    fn sample_index_stays_in_range() {
        assert_eq!(sample_index(3, 4, 8), 6);
        assert_eq!(sample_index(9, 4, 8), 7);
        assert_eq!(sample_index(0, 0, 0), 0);
        assert_eq!(sample_index(u32::MAX, 1, u32::MAX), u32::MAX - 1);
    }

    #[test]
    fn one_pixel_per_half_cell() {
        let fb = checker(4, 4);
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        render_frame(&mut buf, area, &fb);
        for cy in 0..2u16 {
            for cx in 0..4u16 {
                let cell = &buf[(cx, cy)];
                assert_eq!(cell.symbol(), "▄");
                let top = fb.pixel(u32::from(cx), u32::from(cy) * 2);
                let bottom = fb.pixel(u32::from(cx), u32::from(cy) * 2 + 1);
                assert_eq!(cell.bg, Color::Rgb(top.0, top.1, top.2));
                assert_eq!(cell.fg, Color::Rgb(bottom.0, bottom.1, bottom.2));
            }
        }
    }

    #[test]
    fn offset_area_leaves_the_rest_untouched() {
        let fb = checker(8, 8);
        let full = Rect::new(0, 0, 10, 6);
        let mut buf = Buffer::empty(full);
        render_frame(&mut buf, Rect::new(2, 1, 4, 2), &fb);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(9, 5)].symbol(), " ");
        assert_eq!(buf[(2, 1)].symbol(), "▄");
        assert_eq!(buf[(5, 2)].symbol(), "▄");
        assert_eq!(buf[(6, 2)].symbol(), " ");
    }

    #[test]
    fn area_larger_than_buffer_is_clipped() {
        let fb = checker(4, 4);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 3));
        render_frame(&mut buf, Rect::new(0, 0, 20, 20), &fb);
        assert_eq!(buf[(2, 2)].symbol(), "▄");
    }

    #[test]
    fn column_has_first_color_at_the_bottom() {
        let colors = [Rgb::BLACK, Rgb::RED, Rgb::WHITE];
        let area = Rect::new(0, 0, 2, 3);
        let mut buf = Buffer::empty(area);
        render_column(&mut buf, area, &colors);
        assert_eq!(buf[(0, 2)].fg, Color::Rgb(0, 0, 0));
        assert_eq!(buf[(1, 0)].bg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn picking_round_trips_through_cells() {
        let area = Rect::new(3, 2, 16, 8);
        for (col, row) in [(3, 2), (10, 5), (18, 9)] {
            let (x, y) = cell_to_pixel(area, 64, 64, col, row).unwrap();
            assert_eq!(pixel_to_cell(area, 64, 64, x, y), Some((col, row)));
        }
        assert_eq!(cell_to_pixel(area, 64, 64, 19, 5), None);
        assert_eq!(pixel_to_cell(area, 64, 64, 500.0, -3.0), Some((18, 2)));
    }
}
