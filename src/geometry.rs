use crate::consts::CONTAINMENT_SLACK;
use crate::tuple::Tuple3D;
use crate::error::{ TraceError, TraceResult };

/// An infinite plane through `origin`, spanned by `u` and `v`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane3D {
    pub origin: Tuple3D,
    pub u: Tuple3D,
    pub v: Tuple3D,
}

impl Plane3D {
    pub fn new(origin: Tuple3D, u: Tuple3D, v: Tuple3D) -> Plane3D {
        Plane3D { origin, u, v }
    }

    /// Creates the plane containing a triangle.
    ///
    /// The plane's basis runs along the triangle edges `p1 -> p2` and
    /// `p1 -> p3`, so its normal follows the winding order of the vertices.
    pub fn through(p1: Tuple3D, p2: Tuple3D, p3: Tuple3D) -> Plane3D {
        Plane3D { origin: p1, u: p2 - p1, v: p3 - p1 }
    }

    /// The unit normal `u × v`.
    ///
    /// Parallel (or zero) basis vectors don't span a plane; this is reported
    /// as an error.
    pub fn normal(&self) -> TraceResult<Tuple3D> {
        let normal = self.u.cross(&self.v).normalize();
        if normal.is_zero() {
            return Err(TraceError::DegeneratePlane);
        }

        Ok(normal)
    }
}

/// The area of the triangle `a`, `b`, `c`.
pub fn triangle_area(a: Tuple3D, b: Tuple3D, c: Tuple3D) -> f64 {
    (b - a).cross(&(c - a)).magnitude() / 2.0
}

/// Computes the barycentric weights of `p` with respect to triangle `a b c`.
///
/// Each weight is the area of the sub-triangle opposite its vertex, divided by
/// the area of the whole triangle. A point outside the triangle makes the
/// sub-areas add up to more than the total, so `None` is returned. Since the
/// sub-areas never sum *exactly* to the total under floating point, a slack of
/// `CONTAINMENT_SLACK` (relative to the triangle's area) is allowed.
///
/// The returned weights are normalized to sum to 1.
///
/// ```
/// # use ray_tracer::tuple::Tuple3D;
/// # use ray_tracer::geometry::barycentric;
/// let a = Tuple3D::new(0.0, 0.0, 0.0);
/// let b = Tuple3D::new(1.0, 0.0, 0.0);
/// let c = Tuple3D::new(0.0, 1.0, 0.0);
///
/// let (alpha, beta, gamma) =
///     barycentric(Tuple3D::new(0.25, 0.25, 0.0), a, b, c).unwrap();
/// assert!((alpha - 0.5).abs() < 1e-12);
/// assert!((beta - 0.25).abs() < 1e-12);
/// assert!((gamma - 0.25).abs() < 1e-12);
///
/// assert!(barycentric(Tuple3D::new(1.0, 1.0, 0.0), a, b, c).is_none());
/// ```
pub fn barycentric(p: Tuple3D, a: Tuple3D, b: Tuple3D, c: Tuple3D)
    -> Option<(f64, f64, f64)> {
    let total = triangle_area(a, b, c);
    if total <= 0.0 {
        return None;
    }

    let alpha = triangle_area(p, b, c) / total;
    let beta = triangle_area(p, c, a) / total;
    let gamma = triangle_area(p, a, b) / total;

    let sum = alpha + beta + gamma;
    if sum > 1.0 + CONTAINMENT_SLACK {
        return None;
    }

    Some((alpha / sum, beta / sum, gamma / sum))
}

#[test]
fn plane_normal_follows_basis() {
    let plane = Plane3D::new(
        Tuple3D::zero(),
        Tuple3D::new(2.0, 0.0, 0.0),
        Tuple3D::new(0.0, 3.0, 0.0),
    );

    assert_eq!(plane.normal().unwrap(), Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn parallel_basis_is_degenerate() {
    let plane = Plane3D::new(
        Tuple3D::zero(),
        Tuple3D::new(1.0, 1.0, 0.0),
        Tuple3D::new(-2.0, -2.0, 0.0),
    );

    assert!(matches!(plane.normal(), Err(TraceError::DegeneratePlane)));
}

#[test]
fn weights_inside_triangle_sum_to_one() {
    let a = Tuple3D::new(-1.0, 0.0, 2.0);
    let b = Tuple3D::new(3.0, 0.5, 2.0);
    let c = Tuple3D::new(0.0, 4.0, 1.0);

    let samples = [
        (0.2, 0.3, 0.5),
        (0.9, 0.05, 0.05),
        (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0),
        (0.0, 0.5, 0.5),
    ];

    for &(wa, wb, wc) in samples.iter() {
        let p = a * wa + b * wb + c * wc;
        let (alpha, beta, gamma) = barycentric(p, a, b, c)
            .expect("Point built from weights should be inside.");

        assert!((alpha + beta + gamma - 1.0).abs() < 1e-9);
        for w in [alpha, beta, gamma] {
            assert!((0.0..=1.0).contains(&w));
        }

        assert!((alpha - wa).abs() < 1e-6);
        assert!((beta - wb).abs() < 1e-6);
        assert!((gamma - wc).abs() < 1e-6);
    }
}

#[test]
fn point_outside_triangle_fails_containment() {
    let a = Tuple3D::new(0.0, 0.0, 0.0);
    let b = Tuple3D::new(1.0, 0.0, 0.0);
    let c = Tuple3D::new(0.0, 1.0, 0.0);

    assert!(barycentric(Tuple3D::new(0.6, 0.6, 0.0), a, b, c).is_none());
    assert!(barycentric(Tuple3D::new(-0.1, 0.5, 0.0), a, b, c).is_none());
    assert!(barycentric(Tuple3D::new(2.0, -1.0, 0.0), a, b, c).is_none());
}
