use crate::consts::{ MAX_RECURSION_DEPTH, INITIAL_REFRACTION_INDEX };
use crate::ray::Ray3D;
use crate::color::Color;
use crate::tuple::Tuple3D;
use crate::world::World;
use crate::intersect::Collision;
use crate::error::TraceResult;

/// Reflectance at normal incidence for light passing from a medium with index
/// `n_i` into one with index `n_t`.
///
/// ```
/// # use ray_tracer::reflect::fresnel_f0;
/// // Air to glass reflects 4% head-on.
/// assert!((fresnel_f0(1.0, 1.5) - 0.04).abs() < 1e-9);
/// ```
pub fn fresnel_f0(n_i: f64, n_t: f64) -> f64 {
    ((n_t - n_i) / (n_t + n_i)).powi(2)
}

/// Schlick's approximation of the Fresnel reflectance.
///
/// `cos` is the cosine of the angle between the (facing) normal and the
/// incident vector.
pub fn schlick(f0: f64, cos: f64) -> f64 {
    f0 + (1.0 - f0) * (1.0 - cos).powi(5)
}

/// Refracts a unit direction through a surface using Snell's law.
///
/// `normal` must face against `direction`, and `ratio` is `n_i / n_t`.
/// Returns `None` on total internal reflection.
pub fn refract(direction: Tuple3D, normal: Tuple3D, ratio: f64)
    -> Option<Tuple3D> {
    let cos_i = -direction.dot(&normal);
    let sin2_t = ratio.powi(2) * (1.0 - cos_i.powi(2));
    if sin2_t > 1.0 {
        return None;
    }

    let cos_t = (1.0 - sin2_t).sqrt();
    Some((direction * ratio + normal * (ratio * cos_i - cos_t)).normalize())
}

impl World {
    /// Computes the light reaching a collision by reflection and refraction.
    ///
    /// The reflected ray is weighted by Schlick's reflectance `F`. For
    /// materials that aren't fully opaque, the transmitted ray is weighted by
    /// `(1 - F)(1 - opacity)`. Both are traced one level deeper, and a ray
    /// that leaves the scene contributes nothing. At `MAX_RECURSION_DEPTH`
    /// the result is black.
    ///
    /// `medium_index` is the refraction index of the medium the incident ray
    /// travelled through.
    pub fn reflect_refract(&self, c: &Collision, depth: usize,
        medium_index: f64) -> TraceResult<Color> {
        if depth >= MAX_RECURSION_DEPTH {
            return Ok(Color::black());
        }

        let m = self.material_of(c)?;
        let (normal, inside) = c.facing_normal();
        let cos = normal.dot(&c.incident).clamp(0.0, 1.0);

        // Leaving an object means returning to the surrounding medium.
        let transmitted_index = if inside {
            INITIAL_REFRACTION_INDEX
        } else {
            m.refraction_index
        };

        let f0 = if m.opacity >= 1.0 {
            fresnel_f0(INITIAL_REFRACTION_INDEX, m.refraction_index)
        } else {
            fresnel_f0(medium_index, transmitted_index)
        };
        let reflectance = schlick(f0, cos);

        let direction = -c.incident;
        let reflected = Ray3D::new(c.position, direction.reflect(&normal));
        let mut color =
            (self.trace_secondary(&reflected, depth + 1, medium_index)?
                * reflectance).clamp();

        if m.opacity < 1.0 {
            let ratio = medium_index / transmitted_index;

            if let Some(t) = refract(direction, normal, ratio) {
                let refracted = Ray3D::new(c.position, t);
                let weight = (1.0 - reflectance) * (1.0 - m.opacity);
                let transmitted = (self.trace_secondary(
                    &refracted, depth + 1, transmitted_index
                )? * weight).clamp();

                color = (color + transmitted).clamp();
            }
        }

        Ok(color)
    }

    /// Shades a secondary ray; misses are black rather than background.
    fn trace_secondary(&self, r: &Ray3D, depth: usize, medium_index: f64)
        -> TraceResult<Color> {
        match self.cast(r)? {
            Some(c) => self.shade(&c, depth, medium_index),
            None => Ok(Color::black()),
        }
    }
}

#[cfg(test)]
use crate::shape::Shape;
#[cfg(test)]
use crate::light::Material;
#[cfg(test)]
use crate::geometry::Plane3D;

#[test]
fn schlick_bounds() {
    let f0 = fresnel_f0(1.0, 1.5);

    assert_eq!(schlick(f0, 1.0), f0);
    assert!(crate::feq(schlick(f0, 0.0), 1.0));

    for i in 0..=10 {
        let f = schlick(f0, i as f64 / 10.0);
        assert!(f >= f0 && f <= 1.0);
    }
}

#[test]
fn refraction_at_normal_incidence_goes_straight() {
    let d = Tuple3D::new(0.0, -1.0, 0.0);
    let n = Tuple3D::new(0.0, 1.0, 0.0);

    assert_eq!(refract(d, n, 1.0 / 1.5), Some(d));
}

#[test]
fn refraction_bends_towards_normal() {
    let d = Tuple3D::new(1.0, -1.0, 0.0).normalize();
    let n = Tuple3D::new(0.0, 1.0, 0.0);
    let t = refract(d, n, 1.0 / 1.5).unwrap();

    // sin(θt) = sin(45°) / 1.5
    let sin_t = std::f64::consts::FRAC_1_SQRT_2 / 1.5;
    assert_eq!(t, Tuple3D::new(sin_t, -(1.0 - sin_t.powi(2)).sqrt(), 0.0));
}

#[test]
fn total_internal_reflection() {
    // Leaving glass at 60 degrees exceeds the critical angle (~41.8).
    let d = Tuple3D::new(60f64.to_radians().sin(), -60f64.to_radians().cos(),
        0.0);
    let n = Tuple3D::new(0.0, 1.0, 0.0);

    assert_eq!(refract(d, n, 1.5), None);
}

#[test]
fn black_at_maximum_depth() {
    let mut w = World::empty();
    let m = w.add_material(Material {
        refraction_index: 1e6,
        ..Default::default()
    });
    w.shapes.push(Shape::sphere(Tuple3D::zero(), 1.0).with_material(m));
    w.background = Color::white();

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = w.cast(&r).unwrap().unwrap();

    assert_eq!(w.reflect_refract(&c, MAX_RECURSION_DEPTH, 1.0).unwrap(),
        Color::black());
}

#[test]
fn transparent_sphere_shows_what_is_behind() {
    let mut w = World::empty();
    let glass = w.add_material(Material {
        ambient: 0.0,
        diffuse: 0.0,
        specular: 0.0,
        opacity: 0.0,
        refraction_index: 1.0,
        ..Default::default()
    });
    let wall = w.add_material(Material {
        diffuse_color: Color::rgb(0.2, 0.4, 0.6),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    });

    w.shapes.push(Shape::sphere(Tuple3D::zero(), 1.0).with_material(glass));
    w.shapes.push(Shape::plane(Plane3D::new(
        Tuple3D::new(0.0, 0.0, -5.0),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 1.0, 0.0),
    )).with_material(wall));

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
    let color = w.color_at(&r, 0, INITIAL_REFRACTION_INDEX).unwrap();

    assert_eq!(color, Color::rgb(0.2, 0.4, 0.6));
}

#[test]
fn mirror_floor_reflects_sphere() {
    let mut w = World::empty();
    let mirror = w.add_material(Material {
        ambient: 0.0,
        diffuse: 0.0,
        specular: 0.0,
        refraction_index: 1e6,
        ..Default::default()
    });
    let red = w.add_material(Material {
        diffuse_color: Color::rgb(1.0, 0.0, 0.0),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    });

    w.shapes.push(Shape::plane(Plane3D::new(
        Tuple3D::zero(),
        Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(1.0, 0.0, 0.0),
    )).with_material(mirror));
    w.shapes.push(Shape::sphere(Tuple3D::new(3.0, 3.0, 0.0), 1.0)
        .with_material(red));

    // Looking down at the origin from 45 degrees; the reflected ray heads
    // straight at the sphere.
    let r = Ray3D::new(Tuple3D::new(-3.0, 3.0, 0.0), Tuple3D::new(1.0, -1.0, 0.0));
    let color = w.color_at(&r, 0, INITIAL_REFRACTION_INDEX).unwrap();

    let f = schlick(fresnel_f0(1.0, 1e6), std::f64::consts::FRAC_1_SQRT_2);
    assert_eq!(color, Color::rgb(f, 0.0, 0.0));
}

#[test]
fn facing_mirrors_stop_at_maximum_depth() {
    let mut w = World::empty();
    let mirror = w.add_material(Material {
        ambient: 0.05,
        diffuse: 0.0,
        specular: 0.0,
        refraction_index: 1e6,
        ..Default::default()
    });

    for &z in [0.0, 10.0].iter() {
        w.shapes.push(Shape::plane(Plane3D::new(
            Tuple3D::new(0.0, 0.0, z),
            Tuple3D::new(1.0, 0.0, 0.0),
            Tuple3D::new(0.0, 1.0, 0.0),
        )).with_material(mirror));
    }

    // Bouncing straight between the mirrors, every level adds its ambient
    // light to the reflection of the next one. Levels 0 through
    // MAX_RECURSION_DEPTH are shaded and nothing deeper.
    let f = fresnel_f0(1.0, 1e6);
    let mut expected = 0.05;
    for _ in 0..MAX_RECURSION_DEPTH {
        expected = 0.05 + f * expected;
    }

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
    let color = w.color_at(&r, 0, INITIAL_REFRACTION_INDEX).unwrap();

    assert_eq!(color, Color::rgb(expected, expected, expected));

    // One level less of headroom removes exactly one bounce.
    let shallower = w.color_at(&r, 1, INITIAL_REFRACTION_INDEX).unwrap();
    let mut one_less = 0.05;
    for _ in 1..MAX_RECURSION_DEPTH {
        one_less = 0.05 + f * one_less;
    }
    assert_eq!(shallower, Color::rgb(one_less, one_less, one_less));
}
