use crate::color::{Rgb, clamp01};
use crate::error::CoreError;

/// Largest accepted raster side, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Compositing operator for [`FrameBuffer::blend_pixel`], mirroring the
/// usual 2D-canvas operators. Channels are blended in encoded (sRGB) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Additive, saturating at white.
    Lighter,
    /// `1 - (1 - dst)(1 - src)`.
    Screen,
    /// `dst * src`.
    Multiply,
}

impl BlendMode {
    #[inline]
    fn apply(self, dst: f64, src: f64, alpha: f64) -> f64 {
        let target = match self {
            Self::Normal => src,
            Self::Lighter => return (dst + src * alpha).min(1.0),
            Self::Screen => 1.0 - (1.0 - dst) * (1.0 - src),
            Self::Multiply => dst * src,
        };
        dst + (target - dst) * alpha
    }
}

/// Buffer de pixels réutilisable. Pré-alloué, jamais redimensionné en hot path.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use cl_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué (transparent) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use cl_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Like [`FrameBuffer::new`] but rejects empty or oversized rasters.
    ///
    /// # Errors
    /// [`CoreError::InvalidDimensions`] when a side is 0 or above [`MAX_DIMENSION`].
    ///
    /// # Example
    /// ```
    /// use cl_core::frame::FrameBuffer;
    /// assert!(FrameBuffer::try_new(0, 10).is_err());
    /// assert!(FrameBuffer::try_new(4, 4).is_ok());
    /// ```
    pub fn try_new(width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self::new(width, height))
    }

    /// Bytes per row.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    /// Accès au pixel (x, y) → (r, g, b, a). Hors limites → transparent.
    ///
    /// # Example
    /// ```
    /// use cl_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// assert_eq!(fb.pixel(50, 50), (0, 0, 0, 0));
    /// ```
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        match self.index(x, y) {
            Some(i) => (self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]),
            None => (0, 0, 0, 0),
        }
    }

    /// Color of pixel (x, y), alpha ignored.
    #[inline]
    #[must_use]
    pub fn rgb_at(&self, x: u32, y: u32) -> Rgb {
        let (r, g, b, _) = self.pixel(x, y);
        Rgb::from_u8(r, g, b)
    }

    /// Overwrite pixel (x, y) with an opaque color. Out-of-bounds writes are ignored.
    #[inline]
    pub fn put(&mut self, x: u32, y: u32, color: Rgb) {
        let (r, g, b) = color.to_u8();
        self.set_pixel(x, y, (r, g, b, 255));
    }

    /// Overwrite pixel (x, y) with raw RGBA bytes.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: (u8, u8, u8, u8)) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&[rgba.0, rgba.1, rgba.2, rgba.3]);
        }
    }

    /// Composite `color` at coverage `alpha` onto pixel (x, y).
    ///
    /// # Example
    /// ```
    /// use cl_core::color::Rgb;
    /// use cl_core::frame::{BlendMode, FrameBuffer};
    /// let mut fb = FrameBuffer::new(1, 1);
    /// fb.fill(Rgb::new(1.0, 0.0, 0.0));
    /// fb.blend_pixel(0, 0, Rgb::new(0.0, 1.0, 0.0), 1.0, BlendMode::Lighter);
    /// assert_eq!(fb.rgb_at(0, 0).to_hex(), "#ffff00");
    /// ```
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgb, alpha: f64, mode: BlendMode) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let alpha = clamp01(alpha);
        let src = color.clamped();
        let px = &mut self.data[i..i + 4];
        for (c, s) in px.iter_mut().take(3).zip([src.r, src.g, src.b]) {
            let d = f64::from(*c) / 255.0;
            *c = (mode.apply(d, s, alpha) * 255.0).round() as u8;
        }
        let da = f64::from(px[3]) / 255.0;
        px[3] = ((alpha + da * (1.0 - alpha)) * 255.0).round() as u8;
    }

    /// Fill every pixel with an opaque color.
    pub fn fill(&mut self, color: Rgb) {
        let (r, g, b) = color.to_u8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Reset to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Filled disc centred on (cx, cy), clipped to the buffer.
    pub fn fill_disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64, mode: BlendMode) {
        if radius.is_nan() || radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = (cx + radius).ceil().min(f64::from(self.width) - 1.0);
        let y1 = (cy + radius).ceil().min(f64::from(self.height) - 1.0);
        if x1 < 0.0 || y1 < 0.0 {
            return;
        }
        let r2 = radius * radius;
        for y in y0..=y1 as u32 {
            for x in x0..=x1 as u32 {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color, alpha, mode);
                }
            }
        }
    }

    /// Thick polyline blended once per covered pixel, however many segments
    /// overlap it, so additive or multiplicative strokes do not build up at
    /// the joints.
    ///
    /// # Example
    /// ```
    /// use cl_core::color::Rgb;
    /// use cl_core::frame::{BlendMode, FrameBuffer};
    /// let mut fb = FrameBuffer::new(20, 20);
    /// fb.stroke_polyline(&[(2.0, 10.0), (10.0, 10.0), (18.0, 10.0)], 4.0, Rgb::RED, 0.5, BlendMode::Lighter);
    /// assert_eq!(fb.pixel(10, 10), (128, 0, 0, 128));
    /// assert_eq!(fb.pixel(10, 2), (0, 0, 0, 0));
    /// ```
    pub fn stroke_polyline(&mut self, points: &[(f64, f64)], thickness: f64, color: Rgb, alpha: f64, mode: BlendMode) {
        if thickness.is_nan() || thickness <= 0.0 {
            return;
        }
        let (w, h) = (self.width as usize, self.height as usize);
        let mut covered = vec![false; w * h];
        let radius = (thickness / 2.0).max(0.5);
        let r2 = radius * radius;
        let mut mark = |cx: f64, cy: f64| {
            let x0 = (cx - radius).floor().max(0.0) as usize;
            let y0 = (cy - radius).floor().max(0.0) as usize;
            let x1 = ((cx + radius).ceil().max(-1.0) as isize).min(w as isize - 1);
            let y1 = ((cy + radius).ceil().max(-1.0) as isize).min(h as isize - 1);
            if x1 < 0 || y1 < 0 {
                return;
            }
            for y in y0..=y1 as usize {
                for x in x0..=x1 as usize {
                    let dx = x as f64 + 0.5 - cx;
                    let dy = y as f64 + 0.5 - cy;
                    if dx * dx + dy * dy <= r2 {
                        covered[y * w + x] = true;
                    }
                }
            }
        };
        for pair in points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            let (dx, dy) = (x1 - x0, y1 - y0);
            if !x0.is_finite() || !y0.is_finite() || !dx.is_finite() || !dy.is_finite() {
                continue;
            }
            let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
            for i in 0..=steps {
                let t = f64::from(i) / f64::from(steps);
                mark(x0 + dx * t, y0 + dy * t);
            }
        }
        for (i, _) in covered.iter().enumerate().filter(|(_, c)| **c) {
            self.blend_pixel((i % w) as u32, (i / w) as u32, color, alpha, mode);
        }
    }

    /// Straight segment from `from` to `to` by uniform stepping.
    ///
    /// `thickness` above 1.5 stamps discs along the path instead of pixels.
    pub fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        thickness: f64,
        color: Rgb,
        alpha: f64,
        mode: BlendMode,
    ) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let (x, y) = (from.0 + dx * t, from.1 + dy * t);
            if thickness > 1.5 {
                self.fill_disc(x, y, thickness / 2.0, color, alpha, mode);
            } else if x >= 0.0 && y >= 0.0 {
                self.blend_pixel(x as u32, y as u32, color, alpha, mode);
            }
        }
    }
}
