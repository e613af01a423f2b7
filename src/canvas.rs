use std::io::{ self, Write, BufWriter };
use std::fs::{ self, File };
use std::path::Path;

use crate::color::Color;
use crate::error::SceneError;

/// An 8-bit RGB pixel.
pub type Rgb8 = [u8; 3];

/// A canvas for drawing pixels.
///
/// The canvas receives the final color of every primary ray, converted to
/// 8-bit channels. Once rendering finishes, the `Canvas` can be saved as a PPM
/// image. PPM images can also be loaded into a canvas, which is how textures
/// are read.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened row-major vector.
    pixels: Vec<Rgb8>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![[0, 0, 0]; width * height]
        }
    }

    /// Saves a canvas to a plain (`P3`) PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes a canvas as a plain (`P3`) PPM image.
    ///
    /// Lines in the PPM file are clamped to 70 columns. If some channel would
    /// exceed the 70 column mark on a line, it is moved to the next line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        // Write channels, making sure that no line exceeds 70 columns
        let mut col = 0;
        for channel in self.pixels.iter().flat_map(|p| p.iter()) {
            let s = channel.to_string();

            if col == 0 {
                write!(out, "{}", s)?;
                col = s.len();
            } else if col + 1 + s.len() > 70 {
                write!(out, "\n{}", s)?;
                col = s.len();
            } else {
                write!(out, " {}", s)?;
                col += 1 + s.len();
            }
        }

        // Terminate the PPM file with a newline
        writeln!(out)
    }

    /// Loads a PPM image (plain `P3` or binary `P6`).
    pub fn load(path: &Path) -> Result<Canvas, SceneError> {
        let bytes = fs::read(path).map_err(|e| SceneError::io(path, e))?;
        Canvas::parse_ppm(&bytes)
    }

    /// Parses a PPM image held in memory.
    ///
    /// Comments (`#` to end of line) are allowed in the header, and in the
    /// body of plain images. Channels are rescaled to 255 if the image
    /// declares a different maximum value.
    pub fn parse_ppm(bytes: &[u8]) -> Result<Canvas, SceneError> {
        let mut reader = PpmReader { bytes, pos: 0 };

        let magic = reader.token()?;
        let binary = match magic.as_str() {
            "P3" => false,
            "P6" => true,
            other => return Err(SceneError::Ppm(
                format!("unsupported magic number {:?}", other)
            )),
        };

        let width = reader.number()?;
        let height = reader.number()?;
        let max = reader.number()?;
        if max == 0 || max > 255 {
            return Err(SceneError::Ppm(
                format!("unsupported maximum value {}", max)
            ));
        }

        // Every channel takes at least one byte, so a header claiming more
        // channels than there are bytes can't be honest.
        let channels = width.checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .filter(|&n| n <= bytes.len())
            .ok_or_else(|| SceneError::Ppm(
                format!("image size {}x{} exceeds the pixel data", width, height)
            ))?;

        let mut canvas = Canvas::new(width, height);
        if binary {
            // Exactly one whitespace byte separates the header and the data.
            let start = reader.pos + 1;
            let data = bytes.get(start..start + channels)
                .ok_or_else(|| SceneError::Ppm("truncated pixel data".into()))?;

            for (pixel, rgb) in canvas.pixels.iter_mut().zip(data.chunks(3)) {
                *pixel = rescale([rgb[0], rgb[1], rgb[2]], max);
            }
        } else {
            for pixel in canvas.pixels.iter_mut() {
                let mut rgb = [0u8; 3];
                for channel in rgb.iter_mut() {
                    let value = reader.number()?;
                    if value > max {
                        return Err(SceneError::Ppm(
                            format!("channel {} exceeds maximum {}", value, max)
                        ));
                    }
                    *channel = value as u8;
                }

                *pixel = rescale(rgb, max);
            }
        }

        Ok(canvas)
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed. The color is clamped and converted to
    /// 8-bit channels.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use ray_tracer::color::Color;
    /// # use ray_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), [255, 0, 255]);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel.to_rgb8();
    }

    /// Reads a pixel from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Rgb8> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Fills a whole row with already converted pixels.
    ///
    /// Used by the parallel renderer to assemble finished scanlines. Rows of
    /// the wrong length or outside the canvas are ignored.
    pub fn write_row(&mut self, y: usize, row: &[Rgb8]) {
        if y >= self.height || row.len() != self.width {
            return;
        }

        let start = y * self.width;
        self.pixels[start..start + self.width].copy_from_slice(row);
    }
}

fn rescale(rgb: Rgb8, max: usize) -> Rgb8 {
    if max == 255 {
        return rgb;
    }

    let scale = |c: u8| ((c as usize * 255 + max / 2) / max) as u8;
    [scale(rgb[0]), scale(rgb[1]), scale(rgb[2])]
}

/// Splits PPM text into whitespace separated tokens, skipping comments.
struct PpmReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PpmReader<'a> {
    fn token(&mut self) -> Result<String, SceneError> {
        // Skip whitespace and comments.
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    if c == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }

        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'#' {
                break;
            }
            self.pos += 1;
        }

        if start == self.pos {
            return Err(SceneError::Ppm("unexpected end of image".into()));
        }

        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    fn number(&mut self) -> Result<usize, SceneError> {
        let token = self.token()?;
        token.parse().map_err(|_| SceneError::Ppm(
            format!("expected a number, found {:?}", token)
        ))
    }
}

#[test]
fn ppm_header() {
    let canvas = Canvas::new(5, 3);
    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("5 3"));
    assert_eq!(lines.next(), Some("255"));
}

#[test]
fn ppm_lines_stay_under_70_columns() {
    let mut canvas = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            canvas.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.ends_with('\n'));
    assert!(text.lines().all(|l| l.len() <= 70));

    let channels: Vec<&str> = text.lines().skip(3)
        .flat_map(|l| l.split_whitespace())
        .collect();
    assert_eq!(channels.len(), 60);
    assert_eq!(&channels[..3], &["255", "204", "153"]);
}

#[test]
fn written_image_reads_back() {
    let mut canvas = Canvas::new(3, 2);
    canvas.write_pixel(0, 0, &Color::rgb(1.0, 0.0, 0.0));
    canvas.write_pixel(2, 1, &Color::rgb(0.0, 0.2, 1.0));

    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();

    assert_eq!(Canvas::parse_ppm(&out).unwrap(), canvas);
}

#[test]
fn parse_binary_ppm_with_comments() {
    let mut bytes = b"P6\n# a comment\n2 1\n255\n".to_vec();
    bytes.extend_from_slice(&[255, 0, 0, 0, 10, 20]);

    let canvas = Canvas::parse_ppm(&bytes).unwrap();
    assert_eq!(canvas.read_pixel(0, 0), Some([255, 0, 0]));
    assert_eq!(canvas.read_pixel(1, 0), Some([0, 10, 20]));
}

#[test]
fn parse_rescales_small_maximum() {
    let canvas = Canvas::parse_ppm(b"P3 1 1 15 15 0 5").unwrap();
    assert_eq!(canvas.read_pixel(0, 0), Some([255, 0, 85]));
}

#[test]
fn parse_rejects_malformed_images() {
    assert!(Canvas::parse_ppm(b"P5 1 1 255 0").is_err());
    assert!(Canvas::parse_ppm(b"P3 2 2 255 0 0 0").is_err());
    assert!(Canvas::parse_ppm(b"P3 1 1 255 300 0 0").is_err());

    // Sizes that overflow or that the data can't possibly hold.
    assert!(matches!(Canvas::parse_ppm(b"P6 4294967296 4294967296 255\n"),
        Err(SceneError::Ppm(_))));
    assert!(matches!(
        Canvas::parse_ppm(b"P6 18446744073709551615 2 255\n"),
        Err(SceneError::Ppm(_))));
    assert!(matches!(Canvas::parse_ppm(b"P3 100000 100000 255 0 0 0"),
        Err(SceneError::Ppm(_))));
}
