use crate::tuple::Tuple3D;
use crate::error::{ TraceError, TraceResult };

/// A ray, starting at `origin` and travelling along `direction`.
///
/// The direction does not have to be normalized; intersection code normalizes
/// it (see `unit_direction`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray3D {
    pub origin: Tuple3D,
    pub direction: Tuple3D,
}

impl Ray3D {
    pub fn new(origin: Tuple3D, direction: Tuple3D) -> Ray3D {
        Ray3D { origin, direction }
    }

    pub fn position(&self, t: f64) -> Tuple3D {
        self.origin + (t * self.direction)
    }

    /// Returns the normalized direction of the ray.
    ///
    /// A ray without a direction cannot hit anything meaningfully, so this is
    /// an error rather than a miss.
    pub fn unit_direction(&self) -> TraceResult<Tuple3D> {
        let direction = self.direction.normalize();
        if direction.is_zero() {
            return Err(TraceError::ZeroDirection);
        }

        Ok(direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray3D::new(
                Tuple3D::new(2.0, 3.0, 4.0),
                Tuple3D::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Tuple3D::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple3D::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple3D::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple3D::new(4.5, 3.0, 4.0));
}

#[test]
fn unit_direction_rejects_zero() {
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::zero());
    assert!(matches!(r.unit_direction(), Err(TraceError::ZeroDirection)));

    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -7.0));
    assert_eq!(r.unit_direction().unwrap(), Tuple3D::new(0.0, 0.0, -1.0));
}
