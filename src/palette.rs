// Where brush colors come from: a short list of swatches on the number keys,
// and a color wheel the player can click.

use image::{ImageBuffer, RgbaImage};

use crate::canvas::{LocalPoint, Viewport, map_pointer_to_buffer};
use crate::error::Error;
use crate::types::Rgba;

#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(vec![Rgba::RED, Rgba::BLUE, Rgba::GREEN, Rgba::YELLOW, Rgba::BLACK])
    }
}

impl Palette {
    pub fn new(colors: Vec<Rgba>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn select(&self, index: usize) -> Result<Rgba, Error> {
        self.colors
            .get(index)
            .copied()
            .ok_or(Error::PaletteSlotOutOfRange { index, len: self.colors.len() })
    }
}

/// HSV (all in [0,1]) to RGB bytes.
fn hsv_to_rgb8(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let q8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q8(r), q8(g), q8(b)]
}

/// Hue around the rim, saturation out from the center, transparent outside
/// the disc.
pub struct ColorWheel {
    image: RgbaImage,
}

impl ColorWheel {
    pub fn new(size: u32) -> Self {
        let size = size.max(1);
        let c = (size as f32 - 1.0) * 0.5;
        let radius = (size as f32 * 0.5).max(0.5);

        let image = ImageBuffer::from_fn(size, size, |x, y| {
            // image rows run top-down; flip so +y points up like the pointer
            let dx = x as f32 - c;
            let dy = c - y as f32;
            let r = (dx * dx + dy * dy).sqrt() / radius;
            if r > 1.0 {
                return image::Rgba([0, 0, 0, 0]);
            }
            let hue = dy.atan2(dx) / std::f32::consts::TAU;
            let [r8, g8, b8] = hsv_to_rgb8(hue, r, 1.0);
            image::Rgba([r8, g8, b8, 255])
        });
        Self { image }
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Color under the pointer, or None when the click lands on the transparent
    /// corners (alpha below one half).
    pub fn pick(&self, local: LocalPoint, viewport: Viewport) -> Option<Rgba> {
        let (w, h) = self.image.dimensions();
        let (x, y) = map_pointer_to_buffer(local, viewport, w as usize, h as usize);
        let row = h - 1 - y as u32;
        let color = Rgba::from_rgba8(self.image.get_pixel(x as u32, row).0);
        if color.a < 0.5 {
            return None;
        }
        log::debug!("picked color {color:?} at wheel pixel ({x},{row})");
        Some(color)
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;

    #[test]
    fn palette_defaults_and_bounds() {
        let p = Palette::default();
        assert_eq!(p.select(0).unwrap(), Rgba::RED);
        assert_eq!(p.select(4).unwrap(), Rgba::BLACK);
        assert!(matches!(p.select(5), Err(Error::PaletteSlotOutOfRange { index: 5, len: 5 })));
    }

    #[rstest]
    #[case(0.0, [255, 0, 0])]
    #[case(1.0 / 3.0, [0, 255, 0])]
    #[case(2.0 / 3.0, [0, 0, 255])]
    #[case(1.0, [255, 0, 0])]
    fn hue_wraps(#[case] h: f32, #[case] expected: [u8; 3]) {
        assert_eq!(hsv_to_rgb8(h, 1.0, 1.0), expected);
    }

    #[test]
    fn center_of_wheel_is_white() {
        let wheel = ColorWheel::new(65);
        let vp = Viewport::new(65.0, 65.0);
        let c = wheel.pick(LocalPoint::new(-0.5, -0.5), vp).unwrap();
        assert_eq!(c, Rgba::WHITE);
        let near = wheel.pick(LocalPoint::new(0.0, 0.0), vp).unwrap();
        assert!(near.r > 0.9 && near.g > 0.9 && near.b > 0.9, "{near:?}");
    }

    #[test]
    fn rim_right_is_red_and_top_is_not() {
        let wheel = ColorWheel::new(65);
        let vp = Viewport::new(65.0, 65.0);
        let right = wheel.pick(LocalPoint::new(31.0, 0.0), vp).unwrap();
        assert!(right.r > 0.95 && right.g < 0.1 && right.b < 0.1, "{right:?}");
        // quarter turn counter-clockwise lands in the yellow-green range
        let top = wheel.pick(LocalPoint::new(0.0, 31.0), vp).unwrap();
        assert!(top.g > 0.95 && top.b < 0.1, "{top:?}");
    }

    #[rstest]
    #[case(-32.0, -32.0)]
    #[case(32.0, 32.0)]
    #[case(-500.0, 500.0)]
    fn corners_are_misses(#[case] x: f32, #[case] y: f32) {
        let wheel = ColorWheel::new(65);
        assert_eq!(wheel.pick(LocalPoint::new(x, y), Viewport::new(65.0, 65.0)), None);
    }
}
