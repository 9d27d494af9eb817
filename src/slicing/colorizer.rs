//! Slice colors

/// Non-premultiplied, sRGB-encoded RGBA color with components in `[0, 1]`.
///
/// Written to a non-sRGB surface as is, so no conversion happens on output.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Rgba> for wgpu::Color {
    fn from(c: Rgba) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

/// Opaque color from hue, saturation and lightness, all in `[0, 1]`.
pub fn hsl(h: f64, s: f64, l: f64) -> Rgba {
    if s == 0.0 {
        let v = l as f32;
        return Rgba::new(v, v, v, 1.0);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Rgba::new(
        hue_to_channel(p, q, h + 1.0 / 3.0) as f32,
        hue_to_channel(p, q, h) as f32,
        hue_to_channel(p, q, h - 1.0 / 3.0) as f32,
        1.0,
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Maps a slice's normalized offset to its stroke color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceColorizer {
    pub saturation: f64,
    pub lightness: f64,
}

impl SliceColorizer {
    pub const SATURATION: f64 = 0.6;
    pub const LIGHTNESS: f64 = 0.6;

    /// Hue is the offset modulo 1, wrapped into `[0, 1)` for negative offsets.
    pub fn color_for(&self, offset: f64) -> Rgba {
        hsl(offset.rem_euclid(1.0), self.saturation, self.lightness)
    }
}

impl Default for SliceColorizer {
    fn default() -> Self {
        Self {
            saturation: Self::SATURATION,
            lightness: Self::LIGHTNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn close(a: Rgba, b: Rgba) -> bool {
        a.to_array()
            .iter()
            .zip(b.to_array())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl(0.0, 1.0, 0.5), Rgba::new(1.0, 0.0, 0.0, 1.0)));
        assert!(close(hsl(1.0 / 3.0, 1.0, 0.5), Rgba::new(0.0, 1.0, 0.0, 1.0)));
        assert!(close(hsl(2.0 / 3.0, 1.0, 0.5), Rgba::new(0.0, 0.0, 1.0, 1.0)));
        assert!(close(hsl(0.5, 0.0, 0.25), Rgba::new(0.25, 0.25, 0.25, 1.0)));
    }

    #[test]
    fn test_hue_zero_slice_color() {
        let color = SliceColorizer::default().color_for(0.0);
        assert!(close(color, Rgba::new(0.84, 0.36, 0.36, 1.0)));
    }

    #[test]
    fn test_negative_offsets_wrap() {
        let colorizer = SliceColorizer::default();
        assert!(close(colorizer.color_for(-1.0), colorizer.color_for(0.0)));
        assert!(close(colorizer.color_for(-0.25), colorizer.color_for(0.75)));
    }

    #[test]
    fn test_color_is_periodic_and_deterministic() {
        let colorizer = SliceColorizer::default();
        let mut rng = rand::rng();
        for _ in 0..200 {
            let s = rng.random_range(-1.0..1.0);
            assert_eq!(colorizer.color_for(s), colorizer.color_for(s));
            assert!(close(colorizer.color_for(s), colorizer.color_for(s + 1.0)));
        }
    }

    #[test]
    fn test_colors_are_opaque_and_in_range() {
        let colorizer = SliceColorizer::default();
        for i in 0..64 {
            let c = colorizer.color_for(i as f64 / 32.0 - 1.0);
            assert_eq!(c.a, 1.0);
            for v in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
