use std::ops::{ Add, AddAssign, Sub, SubAssign, Neg, Mul, MulAssign };

use crate::feq;

/// A three-component tuple.
///
/// Used interchangeably for points and directions. Equality is approximate:
/// components are compared with an absolute epsilon (see `feq`).
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple3D {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl PartialEq for Tuple3D {
    fn eq(&self, other: &Tuple3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Tuple3D {
    fn from(v: [f64; 3]) -> Tuple3D {
        Tuple3D { x: v[0], y: v[1], z: v[2] }
    }
}

impl Tuple3D {
    pub fn new(x: f64, y: f64, z: f64) -> Tuple3D {
        Tuple3D { x, y, z }
    }

    pub fn zero() -> Tuple3D {
        Tuple3D { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
        )
    }

    /// Scales a tuple to unit length.
    ///
    /// The zero vector has no direction and is returned unchanged.
    ///
    /// ```
    /// # use ray_tracer::tuple::Tuple3D;
    /// assert_eq!(Tuple3D::zero().normalize(), Tuple3D::zero());
    /// assert_eq!(Tuple3D::new(4.0, 0.0, 0.0).normalize(),
    ///     Tuple3D::new(1.0, 0.0, 0.0));
    /// ```
    pub fn normalize(&self) -> Tuple3D {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Tuple3D::zero();
        }

        Tuple3D {
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    pub fn dot(&self, other: &Tuple3D) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Multiplies two tuples component by component.
    pub fn hadamard(&self, other: &Tuple3D) -> Tuple3D {
        Tuple3D {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// The angle between two tuples in radians, in `[0, π]`.
    ///
    /// The cosine is clamped before `acos` so that rounding error on nearly
    /// parallel tuples never produces NaN.
    pub fn angle(&self, other: &Tuple3D) -> f64 {
        let cos = self.normalize().dot(&other.normalize());
        cos.clamp(-1.0, 1.0).acos()
    }

    pub fn is_zero(&self) -> bool {
        *self == Tuple3D::zero()
    }

    pub fn is_unit(&self) -> bool {
        feq(self.magnitude(), 1.0)
    }

    /// Checks whether two tuples point along the same line.
    ///
    /// The zero vector is parallel to everything.
    pub fn is_parallel(&self, other: &Tuple3D) -> bool {
        self.normalize().cross(&other.normalize()).is_zero()
    }

    pub fn is_orthogonal(&self, other: &Tuple3D) -> bool {
        feq(self.normalize().dot(&other.normalize()), 0.0)
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Tuple3D) -> Tuple3D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

impl Add for Tuple3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Tuple3D {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Tuple3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Tuple3D {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Tuple3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a 3D tuple.
///
/// ```
/// use ray_tracer::tuple::Tuple3D;
///
/// let t = Tuple3D::new(1.0, 2.0, 3.0);
///
/// // (notice how the scalar is on the right)
/// assert_eq!(t * 5.0, Tuple3D::new(5.0, 10.0, 15.0));
/// ```
impl Mul<f64> for Tuple3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

impl MulAssign<f64> for Tuple3D {
    fn mul_assign(&mut self, other: f64) {
        *self = *self * other;
    }
}

/// Implements scalar left-multiplication for a 3D tuple.
///
/// ```rust
/// use ray_tracer::tuple::Tuple3D;
///
/// let t = Tuple3D::new(1.0, 2.0, 3.0);
///
/// // (notice how the scalar is on the left)
/// assert_eq!(5.0 * t, Tuple3D::new(5.0, 10.0, 15.0));
/// ```
impl Mul<Tuple3D> for f64 {
    type Output = Tuple3D;

    fn mul(self, other: Tuple3D) -> Tuple3D {
        other * self
    }
}

/* Tests */

#[test]
fn add_tuples() {
    let a1 = Tuple3D::new(3.0, -2.0, 5.0);
    let a2 = Tuple3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Tuple3D::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_points() {
    let p1 = Tuple3D::new(3.0, 2.0, 1.0);
    let p2 = Tuple3D::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Tuple3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn in_place_ops_alias_their_input() {
    let mut a = Tuple3D::new(1.0, 2.0, 3.0);
    a += a;
    assert_eq!(a, Tuple3D::new(2.0, 4.0, 6.0));

    a -= a * 0.5;
    assert_eq!(a, Tuple3D::new(1.0, 2.0, 3.0));

    a *= -2.0;
    assert_eq!(a, Tuple3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_tuple() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Tuple3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_fraction() {
    let a = Tuple3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 0.5, Tuple3D::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Tuple3D::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Tuple3D::new(1.0, 2.0, 3.0);
    let e = Tuple3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
    assert!(v.normalize().is_unit());
}

#[test]
fn normalize_zero_is_zero() {
    let v = Tuple3D::zero().normalize();

    assert!(v.is_zero());
    assert!(!v.x.is_nan());
}

#[test]
fn dot_vectors() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Tuple3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple3D::new(1.0, -2.0, 1.0));
}

#[test]
fn angle_between() {
    let x = Tuple3D::new(1.0, 0.0, 0.0);
    let y = Tuple3D::new(0.0, 3.0, 0.0);

    assert!((x.angle(&y) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert_eq!(x.angle(&x), 0.0);
    assert!((x.angle(&-x) - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn parallel_and_orthogonal() {
    let a = Tuple3D::new(1.0, 2.0, 3.0);
    let b = Tuple3D::new(-2.0, -4.0, -6.0);
    let c = Tuple3D::new(3.0, 0.0, -1.0);

    assert!(a.is_parallel(&b));
    assert!(!a.is_parallel(&c));
    assert!(a.is_orthogonal(&c));
    assert!(!a.is_orthogonal(&b));
}

#[test]
fn reflect_45() {
    let v = Tuple3D::new(1.0, -1.0, 0.0);
    let n = Tuple3D::new(0.0, 1.0, 0.0);
    let r = v.reflect(&n);

    assert_eq!(r, Tuple3D::new(1.0, 1.0, 0.0));
}
