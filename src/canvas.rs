// Raster brush engine: circle stamps into the painting, clear, pointer mapping.
// Visual expectation: holding a mouse button leaves a trail of solid discs in the
// active color; erasing leaves discs of the background color.

use crate::config::GameConfig;
use crate::error::Error;
use crate::types::{BrushMode, BrushStroke, PixelBuffer, Rgba};

/// Pointer position relative to the center of the drawing rectangle, y up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalPoint {
    pub x: f32,
    pub y: f32,
}

impl LocalPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the on-screen rectangle the pointer moves over. Its center is the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Scale one axis: centered -> [0,len) -> nearest integer -> clamp.
#[inline]
fn map_axis(local: f32, extent: f32, len: usize) -> i32 {
    let v = ((local / extent + 0.5) * len as f32).round();
    let max = len.saturating_sub(1) as f32;
    if !v.is_finite() {
        return 0;
    }
    v.clamp(0.0, max) as i32
}

/// Convert a centered pointer position into integer buffer coordinates.
/// Always lands inside `[0,width-1] x [0,height-1]`.
pub fn map_pointer_to_buffer(local: LocalPoint, viewport: Viewport, width: usize, height: usize) -> (i32, i32) {
    (
        map_axis(local.x, viewport.width, width),
        map_axis(local.y, viewport.height, height),
    )
}

/// Write `color` to every in-bounds pixel with dx² + dy² <= r².
/// Offsets that fall outside the buffer are skipped.
pub fn stamp_circle(buf: &mut PixelBuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius < 0 {
        return;
    }
    let r2 = (radius as i64) * (radius as i64);
    let w = buf.width() as i32;
    let h = buf.height() as i32;

    // Only walk the part of the bounding box that overlaps the buffer.
    let y0 = cy.saturating_sub(radius).max(0);
    let y1 = cy.saturating_add(radius).min(h - 1);
    let x0 = cx.saturating_sub(radius).max(0);
    let x1 = cx.saturating_add(radius).min(w - 1);
    if x0 > x1 || y0 > y1 {
        return;
    }

    for y in y0..=y1 {
        let dy = y as i64 - cy as i64;
        for x in x0..=x1 {
            let dx = x as i64 - cx as i64;
            if dx * dx + dy * dy <= r2 {
                buf.put(x, y, color);
            }
        }
    }
}

/// Brush size, clamped into a configured range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brush {
    radius: i32,
    min: i32,
    max: i32,
}

impl Brush {
    pub fn new(initial: f32, (min, max): (u32, u32)) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        let (min, max) = (i32::try_from(min).unwrap_or(i32::MAX), i32::try_from(max).unwrap_or(i32::MAX));
        let mut brush = Self { radius: min, min, max };
        brush.set_radius(initial);
        brush
    }

    /// Slider values arrive as floats: round, then clamp. Never fails.
    pub fn set_radius(&mut self, new_radius: f32) {
        self.radius = if new_radius.is_finite() {
            (new_radius.round() as i64).clamp(self.min as i64, self.max as i64) as i32
        } else {
            self.min
        };
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }
}

/// Active paint color with the erase save/swap/restore rule.
///
/// While erasing, the active color *is* the background. Color picks that arrive
/// mid-erase go to the saved slot and show up once the erase ends.
#[derive(Debug, Clone)]
pub struct BrushTool {
    active: Rgba,
    saved: Option<Rgba>,
    background: Rgba,
}

impl BrushTool {
    pub fn new(color: Rgba, background: Rgba) -> Self {
        Self { active: color, saved: None, background }
    }

    pub fn is_erasing(&self) -> bool {
        self.saved.is_some()
    }

    /// Color the next stamp will use.
    pub fn active_color(&self) -> Rgba {
        self.active
    }

    /// Color the player has picked (the restore target while erasing).
    pub fn chosen_color(&self) -> Rgba {
        self.saved.unwrap_or(self.active)
    }

    pub fn mode(&self) -> BrushMode {
        if self.is_erasing() { BrushMode::Erase } else { BrushMode::Paint }
    }

    pub fn set_color(&mut self, color: Rgba) {
        match self.saved.as_mut() {
            Some(saved) => *saved = color,
            None => self.active = color,
        }
    }

    pub fn begin_erase(&mut self) {
        if self.saved.is_none() {
            self.saved = Some(self.active);
            self.active = self.background;
        }
    }

    pub fn end_erase(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.active = saved;
        }
    }
}

/// The painting plus the brush that paints into it.
pub struct Canvas {
    buffer: PixelBuffer,
    brush: Brush,
    background: Rgba,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgba, brush: Brush) -> Result<Self, Error> {
        Ok(Self { buffer: PixelBuffer::new(width, height, background)?, brush, background })
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, Error> {
        let brush = Brush::new(config.initial_brush_radius, config.brush_radius_range);
        Self::new(config.canvas_width, config.canvas_height, config.background_color, brush)
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_brush_radius(&mut self, new_radius: f32) {
        self.brush.set_radius(new_radius);
    }

    pub fn clear(&mut self, color: Rgba) {
        self.buffer.fill(color);
    }

    /// Reset to the configured background.
    pub fn clear_to_background(&mut self) {
        self.clear(self.background);
    }

    pub fn map_pointer(&self, local: LocalPoint, viewport: Viewport) -> (i32, i32) {
        map_pointer_to_buffer(local, viewport, self.buffer.width(), self.buffer.height())
    }

    /// Build the stroke the current brush state would leave at this pointer.
    pub fn stroke_at(&self, local: LocalPoint, viewport: Viewport, tool: &BrushTool) -> BrushStroke {
        let (x, y) = self.map_pointer(local, viewport);
        BrushStroke { x, y, radius: self.brush.radius(), color: tool.active_color(), mode: tool.mode() }
    }

    pub fn apply(&mut self, stroke: &BrushStroke) {
        stamp_circle(&mut self.buffer, stroke.x, stroke.y, stroke.radius, stroke.color);
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    const BG: Rgba = Rgba::WHITE;

    fn buffer(w: usize, h: usize) -> PixelBuffer {
        PixelBuffer::new(w, h, BG).unwrap()
    }

    #[rstest]
    #[case(16, 16, 8, 8, 3)]
    #[case(16, 16, 0, 0, 4)]
    #[case(16, 10, 15, 9, 5)]
    #[case(7, 9, 3, 4, 0)]
    #[case(20, 20, 10, 10, 12)]
    fn stamp_sets_exactly_the_disc(#[case] w: usize, #[case] h: usize, #[case] cx: i32, #[case] cy: i32, #[case] r: i32) {
        let mut buf = buffer(w, h);
        stamp_circle(&mut buf, cx, cy, r, Rgba::RED);

        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let (dx, dy) = (x - cx, y - cy);
                let expected = if dx * dx + dy * dy <= r * r { Rgba::RED } else { BG };
                assert_eq!(buf.get(x, y), Some(expected), "pixel ({x},{y})");
            }
        }
    }

    #[rstest]
    #[case(-50, 5)]
    #[case(5, -50)]
    #[case(100, 5)]
    #[case(5, 100)]
    #[case(i32::MAX, 3)]
    #[case(i32::MIN, 3)]
    #[case(3, i32::MAX)]
    #[case(i32::MIN, i32::MIN)]
    fn stamp_fully_outside_is_noop(#[case] cx: i32, #[case] cy: i32) {
        let mut buf = buffer(10, 10);
        stamp_circle(&mut buf, cx, cy, 4, Rgba::RED);
        assert!(buf.pixels().iter().all(|p| *p == BG));
    }

    #[test]
    fn clear_overwrites_every_pixel() {
        let mut buf = buffer(512, 512);
        stamp_circle(&mut buf, 100, 100, 40, Rgba::RED);
        let c = Rgba::rgb(0.2, 0.4, 0.6);
        buf.fill(c);
        for y in 0..512 {
            for x in 0..512 {
                assert_eq!(buf.get(x, y), Some(c));
            }
        }
    }

    #[rstest]
    #[case(0.0, 0.0, (50, 25))]
    #[case(-100.0, -50.0, (0, 0))]
    #[case(100.0, 50.0, (99, 49))]
    #[case(-100.0, 50.0, (0, 49))]
    #[case(100.0, -50.0, (99, 0))]
    #[case(-1000.0, 0.0, (0, 25))]
    #[case(0.0, 1000.0, (50, 49))]
    #[case(1000.0, -1000.0, (99, 0))]
    #[case(50.0, 25.0, (75, 38))]
    fn pointer_mapping_scales_and_clamps(#[case] x: f32, #[case] y: f32, #[case] expected: (i32, i32)) {
        let vp = Viewport::new(200.0, 100.0);
        let got = map_pointer_to_buffer(LocalPoint::new(x, y), vp, 100, 50);
        assert_eq!(got, expected);
        // same input, same answer
        assert_eq!(map_pointer_to_buffer(LocalPoint::new(x, y), vp, 100, 50), got);
    }

    #[test]
    fn pointer_mapping_survives_degenerate_viewport() {
        let got = map_pointer_to_buffer(LocalPoint::new(0.0, 0.0), Viewport::new(0.0, 0.0), 10, 10);
        assert_eq!(got, (0, 0));
    }

    #[rstest]
    #[case(0.0, 1)]
    #[case(-3.0, 1)]
    #[case(500.0, 100)]
    #[case(50.0, 50)]
    #[case(12.6, 13)]
    #[case(f32::NAN, 1)]
    fn brush_radius_clamps(#[case] input: f32, #[case] expected: i32) {
        let mut brush = Brush::new(10.0, (1, 100));
        brush.set_radius(input);
        assert_eq!(brush.radius(), expected);
    }

    #[test]
    fn huge_radius_range_saturates() {
        let mut brush = Brush::new(50.0, (1, u32::MAX));
        assert_eq!(brush.radius(), 50);
        brush.set_radius(f32::MAX);
        assert_eq!(brush.radius(), i32::MAX);
        let brush = Brush::new(5.0, (u32::MAX, 1));
        assert_eq!(brush.radius(), i32::MAX);
    }

    #[test]
    fn erase_swaps_and_restores_color() {
        let mut tool = BrushTool::new(Rgba::RED, BG);
        tool.begin_erase();
        assert_eq!(tool.active_color(), BG);
        assert_eq!(tool.mode(), BrushMode::Erase);
        tool.end_erase();
        assert_eq!(tool.active_color(), Rgba::RED);
        assert_eq!(tool.mode(), BrushMode::Paint);
    }

    #[test]
    fn color_change_during_erase_applies_after_restore() {
        let mut tool = BrushTool::new(Rgba::RED, BG);
        tool.begin_erase();
        tool.set_color(Rgba::BLUE);
        assert_eq!(tool.active_color(), BG);
        assert_eq!(tool.chosen_color(), Rgba::BLUE);
        // a second press must not save the background as the restore color
        tool.begin_erase();
        tool.end_erase();
        assert_eq!(tool.active_color(), Rgba::BLUE);
    }

    #[test]
    fn erase_stroke_paints_background() {
        let mut canvas = Canvas::new(32, 32, BG, Brush::new(4.0, (1, 100))).unwrap();
        let mut tool = BrushTool::new(Rgba::RED, BG);
        let vp = Viewport::new(32.0, 32.0);

        let stroke = canvas.stroke_at(LocalPoint::new(0.0, 0.0), vp, &tool);
        canvas.apply(&stroke);
        assert_eq!(canvas.buffer().get(16, 16), Some(Rgba::RED));

        tool.begin_erase();
        let stroke = canvas.stroke_at(LocalPoint::new(0.0, 0.0), vp, &tool);
        assert_eq!(stroke.mode, BrushMode::Erase);
        canvas.apply(&stroke);
        assert!(canvas.buffer().pixels().iter().all(|p| *p == BG));
    }
}
