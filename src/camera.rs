use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;

use crate::consts::{ VIEW_DISTANCE, INITIAL_REFRACTION_INDEX };
use crate::ray::Ray3D;
use crate::tuple::Tuple3D;
use crate::world::World;
use crate::canvas::{ Canvas, Rgb8 };
use crate::error::{ TraceError, TraceResult };

/// A camera record for generating a canvas.
///
/// The camera sits at `eye`, looks along `view_dir`, and keeps `up_dir`
/// pointing (roughly) up in the image. Neither direction needs to be
/// normalized.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Tuple3D,
    pub view_dir: Tuple3D,
    pub up_dir: Tuple3D,

    /// The vertical field of view, in degrees.
    pub vfov: f64,

    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,
}

/// The rectangle in world space that primary rays pass through.
///
/// `origin` is the top-left corner of the rectangle; `du` steps one pixel to
/// the right and `dv` one pixel up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewingPlane {
    pub eye: Tuple3D,
    pub origin: Tuple3D,
    pub du: Tuple3D,
    pub dv: Tuple3D,
}

impl ViewingPlane {
    /// Creates the primary ray through the center of a pixel.
    ///
    /// Pixels are zero-indexed, with `(0, 0)` in the top-left corner.
    pub fn ray_for_pixel(&self, x: usize, y: usize) -> Ray3D {
        let target = self.origin
            + self.du * (x as f64 + 0.5)
            - self.dv * (y as f64 + 0.5);

        Ray3D::new(self.eye, (target - self.eye).normalize())
    }
}

impl Camera {
    pub fn new(eye: Tuple3D, view_dir: Tuple3D, up_dir: Tuple3D, vfov: f64,
        hsize: usize, vsize: usize) -> Camera {
        Camera { eye, view_dir, up_dir, vfov, hsize, vsize }
    }

    /// Builds the viewing plane at `VIEW_DISTANCE` in front of the eye.
    ///
    /// The horizontal axis is `view × up` and the vertical axis `u × view`, so
    /// an up direction that isn't perpendicular to the view is corrected.
    /// Zero or parallel directions leave no plane to project onto.
    pub fn viewing_plane(&self) -> TraceResult<ViewingPlane> {
        // Zero directions are parallel to everything.
        if self.view_dir.is_parallel(&self.up_dir) {
            return Err(TraceError::DegenerateView);
        }

        let u = self.view_dir.cross(&self.up_dir).normalize();
        let v = u.cross(&self.view_dir).normalize();
        let view = self.view_dir.normalize();

        let height = 2.0 * VIEW_DISTANCE * (self.vfov.to_radians() / 2.0).tan();
        let width = height * (self.hsize as f64 / self.vsize as f64);

        let origin = self.eye + view * VIEW_DISTANCE
            - u * (width / 2.0)
            + v * (height / 2.0);

        Ok(ViewingPlane {
            eye: self.eye,
            origin,
            du: u * (width / self.hsize as f64),
            dv: v * (height / self.vsize as f64),
        })
    }

    /// Renders a world into a canvas, one pixel at a time.
    ///
    /// Pixels are shaded in row-major order, top to bottom. The first error
    /// aborts the render.
    pub fn render(&self, w: &World) -> TraceResult<Canvas> {
        let start = Instant::now();
        let plane = self.viewing_plane()?;
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            for x in 0..self.hsize {
                let ray = plane.ray_for_pixel(x, y);
                let color = w.color_at(&ray, 0, INITIAL_REFRACTION_INDEX)?;
                image.write_pixel(x, y, &color);
            }
        }

        info!("Rendered {}x{} pixels in {:.2?}", self.hsize, self.vsize,
            start.elapsed());
        Ok(image)
    }

    /// Renders a world into a canvas, spreading rows over the rayon pool.
    ///
    /// Every pixel goes through exactly the same computation as in `render`,
    /// so both produce identical images.
    pub fn render_parallel(&self, w: &World) -> TraceResult<Canvas> {
        let start = Instant::now();
        let plane = self.viewing_plane()?;

        debug!("Rendering on {} threads", rayon::current_num_threads());

        let rows = (0..self.vsize)
            .into_par_iter()
            .map(|y| self.render_row(w, &plane, y))
            .collect::<TraceResult<Vec<Vec<Rgb8>>>>()?;

        let mut image = Canvas::new(self.hsize, self.vsize);
        for (y, row) in rows.iter().enumerate() {
            image.write_row(y, row);
        }

        info!("Rendered {}x{} pixels in {:.2?}", self.hsize, self.vsize,
            start.elapsed());
        Ok(image)
    }

    fn render_row(&self, w: &World, plane: &ViewingPlane, y: usize)
        -> TraceResult<Vec<Rgb8>> {
        (0..self.hsize)
            .map(|x| {
                let ray = plane.ray_for_pixel(x, y);
                w.color_at(&ray, 0, INITIAL_REFRACTION_INDEX)
                    .map(|c| c.to_rgb8())
            })
            .collect()
    }
}

#[cfg(test)]
fn looking_down_z(hsize: usize, vsize: usize) -> Camera {
    Camera::new(
        Tuple3D::zero(),
        Tuple3D::new(0.0, 0.0, -1.0),
        Tuple3D::new(0.0, 1.0, 0.0),
        90.0,
        hsize,
        vsize,
    )
}

#[cfg(test)]
fn sphere_world() -> World {
    use crate::color::Color;
    use crate::shape::Shape;
    use crate::light::{ Light, Material };

    let mut w = World::empty();
    let m = w.add_material(Material {
        diffuse_color: Color::rgb(0.8, 1.0, 0.6),
        diffuse: 0.7,
        specular: 0.2,
        ..Default::default()
    });
    w.shapes.push(Shape::sphere(Tuple3D::new(0.0, 0.0, -5.0), 1.0)
        .with_material(m));
    w.lights.push(Light::point(Tuple3D::new(-10.0, 10.0, 10.0),
        Color::white()));
    w.background = Color::rgb(0.1, 0.1, 0.3);
    w
}

#[test]
fn ray_through_center() {
    let plane = looking_down_z(201, 101).viewing_plane().unwrap();
    let r = plane.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple3D::zero());
    assert_eq!(r.direction, Tuple3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let plane = looking_down_z(2, 2).viewing_plane().unwrap();
    let r = plane.ray_for_pixel(0, 0);

    // A 2x2 image over a 2x2 plane: the top-left pixel center is (-0.5, 0.5).
    assert_eq!(r.direction, Tuple3D::new(-0.5, 0.5, -1.0).normalize());
}

#[test]
fn up_direction_is_corrected() {
    let mut c = looking_down_z(10, 10);
    c.up_dir = Tuple3D::new(0.0, 1.0, 1.0);

    assert_eq!(c.viewing_plane().unwrap(),
        looking_down_z(10, 10).viewing_plane().unwrap());
}

#[test]
fn degenerate_views_are_errors() {
    let mut c = looking_down_z(10, 10);
    c.up_dir = Tuple3D::new(0.0, 0.0, 2.0);
    assert!(matches!(c.viewing_plane(), Err(TraceError::DegenerateView)));

    c.up_dir = Tuple3D::zero();
    assert!(matches!(c.viewing_plane(), Err(TraceError::DegenerateView)));
}

#[test]
fn render_hits_sphere_and_background() {
    let w = sphere_world();
    let image = looking_down_z(11, 11).render(&w).unwrap();

    assert_eq!(image.read_pixel(0, 0), Some(w.background.to_rgb8()));
    assert_ne!(image.read_pixel(5, 5), Some(w.background.to_rgb8()));
}

#[test]
fn parallel_render_matches_serial() {
    let w = sphere_world();
    let c = looking_down_z(32, 24);

    let serial = c.render(&w).unwrap();
    assert_eq!(c.render_parallel(&w).unwrap(), serial);
    assert_eq!(c.render(&w).unwrap(), serial);
}

#[test]
fn render_propagates_errors() {
    use crate::shape::Shape;

    let mut w = sphere_world();
    w.shapes.push(Shape::sphere(Tuple3D::new(0.0, 0.0, -3.0), 0.0)
        .with_material(crate::light::MaterialId(0)));
    let c = looking_down_z(4, 4);

    assert!(matches!(c.render(&w), Err(TraceError::NonPositiveRadius(_))));
    assert!(matches!(c.render_parallel(&w),
        Err(TraceError::NonPositiveRadius(_))));
}
