// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the painting, the color wheel and the HUD.
// 2) Per-frame input edges (mouse buttons, keys) for the session.
// 3) A crosshair that follows your mouse.
// 4) A tiny 5x7 bitmap font to render HUD text.

use image::RgbaImage;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::canvas::{LocalPoint, Viewport};
use crate::error::Error;
use crate::types::{FrameBuffer, PixelBuffer};

/// Mouse state for one frame, with press/release edges worked out.
#[derive(Debug, Copy, Clone, Default)]
pub struct MouseFrame {
    pub pos: Option<(f32, f32)>,
    pub left_down: bool,
    pub left_pressed: bool,
    pub right_down: bool,
    pub right_pressed: bool,
    pub right_released: bool,
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    prev_left: bool,
    prev_right: bool,
}

const PALETTE_KEYS: [Key; 9] = [
    Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5,
    Key::Key6, Key::Key7, Key::Key8, Key::Key9,
];

impl Drawer {
    /// Create the game window.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, prev_left: false, prev_right: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we’ll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Read both buttons and compare against last frame.
    pub fn poll_mouse(&mut self) -> MouseFrame {
        let left = self.window.get_mouse_down(MouseButton::Left);
        let right = self.window.get_mouse_down(MouseButton::Right);
        let frame = MouseFrame {
            pos: self.window.get_mouse_pos(MouseMode::Clamp),
            left_down: left,
            left_pressed: left && !self.prev_left,
            right_down: right,
            right_pressed: right && !self.prev_right,
            right_released: !right && self.prev_right,
        };
        self.prev_left = left;
        self.prev_right = right;
        frame
    }

    /// Number keys 1..9 map to palette slots 0..8.
    pub fn palette_key_pressed(&self) -> Option<usize> {
        PALETTE_KEYS.iter().position(|k| self.window.is_key_pressed(*k, KeyRepeat::No))
    }

    pub fn submit_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
    }

    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    pub fn start_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Space, KeyRepeat::No)
    }

    /// `[` shrinks, `]` grows; held keys repeat.
    pub fn brush_step(&self) -> i32 {
        let mut step = 0;
        if self.window.is_key_pressed(Key::LeftBracket, KeyRepeat::Yes) { step -= 1; }
        if self.window.is_key_pressed(Key::RightBracket, KeyRepeat::Yes) { step += 1; }
        step
    }
}

/// Axis-aligned rectangle in window pixels.
#[derive(Debug, Copy, Clone)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl ScreenRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, (mx, my): (f32, f32)) -> bool {
        mx >= self.x as f32 && my >= self.y as f32
            && mx < (self.x + self.w) as f32 && my < (self.y + self.h) as f32
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.w as f32, self.h as f32)
    }

    /// Window pixel -> centered, y-up coordinates relative to this rectangle.
    pub fn local_point(&self, (mx, my): (f32, f32)) -> LocalPoint {
        let cx = self.x as f32 + self.w as f32 * 0.5;
        let cy = self.y as f32 + self.h as f32 * 0.5;
        LocalPoint::new(mx + 0.5 - cx, cy - (my + 0.5))
    }
}

/* ---------- Software drawing: pixels, rectangles, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

pub fn fill_rect(fb: &mut FrameBuffer, r: ScreenRect, color: u32) {
    for y in r.y..r.y + r.h {
        for x in r.x..r.x + r.w {
            put_pixel(fb, x, y, color);
        }
    }
}

pub fn outline_rect(fb: &mut FrameBuffer, r: ScreenRect, color: u32) {
    let (x1, y1) = (r.x + r.w - 1, r.y + r.h - 1);
    draw_line(fb, r.x, r.y, x1, r.y, color);
    draw_line(fb, r.x, y1, x1, y1, color);
    draw_line(fb, r.x, r.y, r.x, y1, color);
    draw_line(fb, x1, r.y, x1, y1, color);
}

/// Scale the painting into `dst` (nearest neighbour). The painting is stored
/// bottom-up, the screen top-down, so rows are flipped here.
pub fn blit_canvas(fb: &mut FrameBuffer, canvas: &PixelBuffer, dst: ScreenRect) {
    let (bw, bh) = (canvas.width() as i64, canvas.height() as i64);
    for sy in 0..dst.h {
        let by = (bh - 1) - (sy as i64 * bh / dst.h as i64);
        for sx in 0..dst.w {
            let bx = sx as i64 * bw / dst.w as i64;
            if let Some(c) = canvas.get(bx as i32, by as i32) {
                put_pixel(fb, dst.x + sx, dst.y + sy, c.to_u32());
            }
        }
    }
}

/// Copy an RGBA image at (x,y), skipping mostly transparent pixels.
pub fn blit_image(fb: &mut FrameBuffer, img: &RgbaImage, x: i32, y: i32) {
    for (ix, iy, px) in img.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        if a < 128 { continue; }
        put_pixel(fb, x + ix as i32, y + iy as i32, ((r as u32) << 16) | ((g as u32) << 8) | b as u32);
    }
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a small crosshair centered at (cx,cy).
/// Visual: a “+” shape (with a tiny gap at the center) follows your mouse.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (digits, A-Z, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase is drawn as uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '[' => g!(0b01110,0b01000,0b01000,0b01000,0b01000,0b01000,0b01110),
        ']' => g!(0b01110,0b00010,0b00010,0b00010,0b00010,0b00010,0b01110),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (dx, dy, c) in [(1, 1, 0x0000_0000), (0, 0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + dx, y + ry as i32 + dy, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn local_point_is_centered_and_y_up() {
        let r = ScreenRect::new(10, 20, 100, 50);
        assert_eq!(r.local_point((59.5, 44.5)), LocalPoint::new(0.0, 0.0));
        let top_left = r.local_point((10.0, 20.0));
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        assert!(r.contains((10.0, 20.0)));
        assert!(!r.contains((110.0, 20.0)));
    }

    #[test]
    fn canvas_blit_flips_rows() {
        let mut buf = PixelBuffer::new(2, 2, Rgba::WHITE).unwrap();
        buf.put(0, 0, Rgba::RED); // bottom-left in painting space
        let mut fb = FrameBuffer::new(4, 4);
        blit_canvas(&mut fb, &buf, ScreenRect::new(0, 0, 4, 4));
        // bottom-left quadrant on screen
        assert_eq!(fb.pixels[3 * 4], 0x00FF_0000);
        assert_eq!(fb.pixels[0], 0x00FF_FFFF);
    }

    #[test]
    fn text_skips_unknown_glyphs() {
        let mut fb = FrameBuffer::new(40, 10);
        draw_text_5x7(&mut fb, 0, 0, "a~", 0x00FF_FFFF);
        assert!(fb.pixels.iter().any(|p| *p == 0x00FF_FFFF));
        assert!(glyph5x7('~').is_none());
    }
}
