use crate::color::Color;
use crate::canvas::Canvas;
use crate::mesh::TexCoord;

/// An image mapped onto surfaces through texture coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Color>,
}

impl Texture {
    /// Creates a texture from row-major texels.
    ///
    /// Panics if `texels` doesn't hold exactly `width * height` colors.
    pub fn new(width: usize, height: usize, texels: Vec<Color>) -> Texture {
        assert_eq!(texels.len(), width * height);
        Texture { width, height, texels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples the texel nearest to a texture coordinate.
    ///
    /// Coordinates are clamped into `[0, 1]`; `(0, 0)` is the top-left texel
    /// and `(1, 1)` the bottom-right one. An empty texture samples as black.
    pub fn color_at(&self, t: TexCoord) -> Color {
        if self.texels.is_empty() {
            return Color::black();
        }

        let u = t.u.clamp(0.0, 1.0);
        let v = t.v.clamp(0.0, 1.0);
        let x = (u * (self.width - 1) as f64).round() as usize;
        let y = (v * (self.height - 1) as f64).round() as usize;

        self.texels[y * self.width + x]
    }
}

impl From<&Canvas> for Texture {
    fn from(canvas: &Canvas) -> Texture {
        let mut texels = Vec::with_capacity(canvas.width * canvas.height);
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let rgb = canvas.read_pixel(x, y).unwrap_or([0, 0, 0]);
                texels.push(Color::from_rgb8(rgb, 255));
            }
        }

        Texture { width: canvas.width, height: canvas.height, texels }
    }
}

#[cfg(test)]
fn checker() -> Texture {
    Texture::new(2, 2, vec![
        Color::white(), Color::black(),
        Color::black(), Color::white(),
    ])
}

#[test]
fn corners_map_to_corner_texels() {
    let t = checker();

    assert_eq!(t.color_at(TexCoord::new(0.0, 0.0)), Color::white());
    assert_eq!(t.color_at(TexCoord::new(1.0, 0.0)), Color::black());
    assert_eq!(t.color_at(TexCoord::new(0.0, 1.0)), Color::black());
    assert_eq!(t.color_at(TexCoord::new(1.0, 1.0)), Color::white());
}

#[test]
fn coordinates_are_clamped() {
    let t = checker();

    assert_eq!(t.color_at(TexCoord::new(-3.0, 0.1)), Color::white());
    assert_eq!(t.color_at(TexCoord::new(7.0, 0.2)), Color::black());
}

#[test]
fn texture_from_canvas() {
    let mut canvas = Canvas::new(2, 1);
    canvas.write_pixel(1, 0, &Color::rgb(1.0, 0.0, 0.0));

    let t = Texture::from(&canvas);
    assert_eq!(t.width(), 2);
    assert_eq!(t.height(), 1);
    assert_eq!(t.color_at(TexCoord::new(0.0, 0.5)), Color::black());
    assert_eq!(t.color_at(TexCoord::new(1.0, 0.5)), Color::rgb(1.0, 0.0, 0.0));
}
