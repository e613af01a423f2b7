use crate::tuple::Tuple3D;
use crate::mesh::TexCoord;
use crate::light::MaterialId;

/// Where a ray started relative to the shape it collided with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    /// The ray started inside the shape (or, for planes, on it).
    Inside,

    /// The ray started outside the shape and hit its surface.
    Surface,
}

/// A record of a ray hitting a shape.
///
/// A ray that hits nothing produces no record at all (`None` from
/// `Shape::collide` and `World::cast`), so every field here is always
/// meaningful.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collision {
    pub kind: CollisionKind,

    /// The point where the intersection occurs.
    pub position: Tuple3D,

    /// The offset along the (normalized) ray where the intersection occurs.
    pub distance: f64,

    /// The unit surface normal at `position`. Not flipped towards the ray;
    /// see `facing_normal`.
    pub normal: Tuple3D,

    /// The unit vector from `position` back towards the ray origin.
    pub incident: Tuple3D,

    /// The material of the shape that was hit. Shapes may be unbound; the ray
    /// caster rejects such hits.
    pub material: Option<MaterialId>,

    /// The texture coordinate at `position`, if the shape provides one.
    pub texcoord: Option<TexCoord>,
}

impl Collision {
    /// Returns the surface normal, flipped to face the incident ray, and
    /// whether a flip was needed (the ray travels inside the shape).
    pub fn facing_normal(&self) -> (Tuple3D, bool) {
        if self.normal.dot(&self.incident) < 0.0 {
            (-self.normal, true)
        } else {
            (self.normal, false)
        }
    }
}

#[test]
fn facing_normal_flips_towards_eye() {
    let collision = Collision {
        kind: CollisionKind::Inside,
        position: Tuple3D::new(0.0, 0.0, 1.0),
        distance: 1.0,
        normal: Tuple3D::new(0.0, 0.0, 1.0),
        incident: Tuple3D::new(0.0, 0.0, -1.0),
        material: None,
        texcoord: None,
    };

    let (normal, flipped) = collision.facing_normal();
    assert!(flipped);
    assert_eq!(normal, Tuple3D::new(0.0, 0.0, -1.0));

    let outside = Collision {
        incident: Tuple3D::new(0.0, 0.0, 1.0),
        ..collision
    };
    assert_eq!(outside.facing_normal(), (Tuple3D::new(0.0, 0.0, 1.0), false));
}
