use std::ops::{ Add, Sub, Mul };

use crate::feq;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Each value
/// ranges from 0.0 to 1.0 inclusive once clamped; intermediate sums may leave
/// that range until `clamp` is applied.
///
/// # Examples
///
/// Modulate a surface color by a light color:
///
/// ```
/// # use ray_tracer::color::Color;
/// let surface = Color::rgb(0.5, 1.0, 0.2);
/// let light = Color::rgb(1.0, 0.5, 0.0);
/// assert_eq!(surface * light, Color::rgb(0.5, 0.5, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Similar to the `PartialEq` implementation on `Tuple3D`, `Color`s are
/// compared component-wise, accounting for possible floating point error in
/// comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0
        }
    }

    /// Computes the Hadamard product of two colors.
    ///
    /// The hadamard product multiplies each component of the two colors, and
    /// yields a new color containing those products. This is how a light's
    /// color filters a surface's color.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        let r = c1.r * c2.r;
        let g = c1.g * c2.g;
        let b = c1.b * c2.b;

        Color { r, g, b }
    }

    /// Clamps every channel into `[0, 1]`.
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Converts a color to 8-bit channels.
    ///
    /// Channels are clamped first, then scaled to 255 and rounded.
    ///
    /// ```
    /// # use ray_tracer::color::Color;
    /// assert_eq!(Color::rgb(1.5, 0.5, -0.2).to_rgb8(), [255, 128, 0]);
    /// ```
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        ]
    }

    /// Converts 8-bit channels (with maximum value `max`) to a color.
    pub fn from_rgb8(rgb: [u8; 3], max: u8) -> Color {
        let max = f64::from(max.max(1));
        Color {
            r: f64::from(rgb[0]) / max,
            g: f64::from(rgb[1]) / max,
            b: f64::from(rgb[2]) / max,
        }
    }
}

/// Adds two colors together.
///
/// Components are added together individually.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Each component is multiplied by the scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 1.6, g: 0.7, b: 1.0 };

    assert_eq!(c1 + c2, c3);
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let c3 = Color { r: 0.2, g: 0.5, b: 0.5 };

    assert_eq!(c1 - c2, c3);
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);
    let c2 = Color { r: 0.4, g: 0.6, b: 0.8 };

    assert_eq!(c1 * 2.0, c2);
    assert_eq!(c1 * c2, Color::rgb(0.08, 0.18, 0.32));
}

#[test]
fn clamp_colors() {
    let c = Color::rgb(1.6, -0.2, 0.5);

    assert_eq!(c.clamp(), Color::rgb(1.0, 0.0, 0.5));
}

#[test]
fn rgb8_conversion() {
    assert_eq!(Color::black().to_rgb8(), [0, 0, 0]);
    assert_eq!(Color::white().to_rgb8(), [255, 255, 255]);
    assert_eq!(Color::from_rgb8([255, 0, 51], 255), Color::rgb(1.0, 0.0, 0.2));
}
