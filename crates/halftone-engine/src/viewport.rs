//! Render-surface size tracking.
//!
//! Sizes are logical pixels; the physical surface is `logical * pixel_ratio`.
//! The pixel ratio is the device ratio capped at [`MAX_PIXEL_RATIO`].

/// Upper bound for the pixel ratio used by the render surface.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Resize notification from the host window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResizeEvent {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Device pixel ratio reported by the host (winit scale factor).
    pub device_ratio: f32,
}

impl ResizeEvent {
    #[inline]
    pub const fn new(width: f32, height: f32, device_ratio: f32) -> Self {
        Self { width, height, device_ratio }
    }

    /// Builds an event from a physical window size and scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            width: (width as f64 / scale) as f32,
            height: (height as f64 / scale) as f32,
            device_ratio: scale as f32,
        }
    }
}

/// Caps a device ratio at [`MAX_PIXEL_RATIO`].
///
/// Non-finite or negative ratios are treated as `1.0`.
#[inline]
pub fn clamp_pixel_ratio(device_ratio: f32) -> f32 {
    if !device_ratio.is_finite() || device_ratio < 0.0 {
        return 1.0;
    }
    device_ratio.min(MAX_PIXEL_RATIO)
}

/// Current render-surface size.
///
/// Invariants:
/// - `width >= 1`, `height >= 1`
/// - `pixel_ratio <= MAX_PIXEL_RATIO`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl ViewportState {
    pub fn new(event: ResizeEvent) -> Self {
        let mut state = Self { width: 1.0, height: 1.0, pixel_ratio: 1.0 };
        state.resize(event);
        state
    }

    /// Recomputes size and pixel ratio in place. Degenerate sizes clamp to 1.
    pub fn resize(&mut self, event: ResizeEvent) {
        self.width = clamp_extent(event.width);
        self.height = clamp_extent(event.height);
        self.pixel_ratio = clamp_pixel_ratio(event.device_ratio);
    }

    /// Width over height; never divides by zero.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Value of the resolution uniform: logical size times pixel ratio.
    #[inline]
    pub fn resolution(&self) -> [f32; 2] {
        [self.width * self.pixel_ratio, self.height * self.pixel_ratio]
    }

    /// Surface size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let [w, h] = self.resolution();
        ((w.round() as u32).max(1), (h.round() as u32).max(1))
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ResizeEvent::new(1280.0, 720.0, 1.0))
    }
}

#[inline]
fn clamp_extent(v: f32) -> f32 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}
