use std::f64::consts::PI;

use crate::feq;
use crate::tuple::Tuple3D;
use crate::ray::Ray3D;
use crate::mesh::{ Mesh, TexCoord };
use crate::light::MaterialId;
use crate::geometry::{ Plane3D, barycentric };
use crate::intersect::{ Collision, CollisionKind };
use crate::error::{ TraceError, TraceResult };

/// One corner of a face: one-based indices into the shared `Mesh`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceVertex {
    pub vertex: usize,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

impl FaceVertex {
    pub fn new(vertex: usize, normal: Option<usize>, texcoord: Option<usize>)
        -> FaceVertex {
        FaceVertex { vertex, normal, texcoord }
    }

    /// A corner with a position only.
    pub fn flat(vertex: usize) -> FaceVertex {
        FaceVertex { vertex, normal: None, texcoord: None }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeType {
    /// A sphere. Center and radius.
    Sphere { center: Tuple3D, radius: f64 },

    /// An axis-aligned ellipsoid. Center and the three semi-axis lengths.
    Ellipsoid { center: Tuple3D, axes: Tuple3D },

    /// An infinite plane.
    Plane(Plane3D),

    /// A triangle whose corners live in the scene's `Mesh`.
    Face([FaceVertex; 3]),
}

/// A primitive in the world, bound to a material from the world's pool.
///
/// Shapes don't own their materials; many shapes usually share one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub material: Option<MaterialId>,
}

impl Shape {
    /// Creates a sphere with no material.
    pub fn sphere(center: Tuple3D, radius: f64) -> Shape {
        Shape { ty: ShapeType::Sphere { center, radius }, material: None }
    }

    /// Creates an axis-aligned ellipsoid with no material.
    pub fn ellipsoid(center: Tuple3D, axes: Tuple3D) -> Shape {
        Shape { ty: ShapeType::Ellipsoid { center, axes }, material: None }
    }

    /// Creates an infinite plane with no material.
    pub fn plane(plane: Plane3D) -> Shape {
        Shape { ty: ShapeType::Plane(plane), material: None }
    }

    /// Creates a face with no material.
    pub fn face(v1: FaceVertex, v2: FaceVertex, v3: FaceVertex) -> Shape {
        Shape { ty: ShapeType::Face([v1, v2, v3]), material: None }
    }

    /// Binds a material to this shape.
    pub fn with_material(self, material: MaterialId) -> Shape {
        Shape { material: Some(material), ..self }
    }

    /// Intersects a ray with this shape.
    ///
    /// Returns the nearest collision in front of the ray origin (distance
    /// `>= 0`), or `None` if the ray misses. Degenerate input (a zero ray
    /// direction, a non-positive radius or axis, parallel plane basis vectors
    /// or an out-of-range mesh index) is an error, never a miss.
    ///
    /// Distances are measured along the normalized ray direction.
    pub fn collide(&self, ray: &Ray3D, mesh: &Mesh)
        -> TraceResult<Option<Collision>> {
        let direction = ray.unit_direction()?;

        let collision = match self.ty {
            ShapeType::Sphere { center, radius }
                => self.collide_sphere(ray.origin, direction, center, radius)?,
            ShapeType::Ellipsoid { center, axes }
                => self.collide_ellipsoid(ray.origin, direction, center, axes)?,
            ShapeType::Plane(ref plane)
                => self.collide_plane(ray.origin, direction, plane)?,
            ShapeType::Face(ref corners)
                => self.collide_face(ray.origin, direction, corners, mesh)?,
        };

        Ok(collision)
    }

    /// Creates a collision record at offset `t` along a (normalized) ray.
    fn collision(&self, kind: CollisionKind, origin: Tuple3D,
        direction: Tuple3D, t: f64, normal: Tuple3D) -> Collision {
        Collision {
            kind,
            position: origin + direction * t,
            distance: t,
            normal,
            incident: -direction,
            material: self.material,
            texcoord: None,
        }
    }

    /// Checks whether a ray intersects a sphere.
    ///
    /// With a normalized direction the quadratic's leading coefficient is 1,
    /// leaving `t² + b·t + c = 0`. The smaller non-negative root is the hit.
    fn collide_sphere(&self, origin: Tuple3D, direction: Tuple3D,
        center: Tuple3D, radius: f64) -> TraceResult<Option<Collision>> {
        if radius <= 0.0 {
            return Err(TraceError::NonPositiveRadius(radius));
        }

        let center_to_origin = origin - center;
        let b = 2.0 * direction.dot(&center_to_origin);
        let c = center_to_origin.dot(&center_to_origin) - radius.powi(2);

        let t = match nearest_root(1.0, b, c) {
            Some(t) => t,
            None => return Ok(None),
        };

        let kind = if center_to_origin.magnitude() < radius {
            CollisionKind::Inside
        } else {
            CollisionKind::Surface
        };

        let position = origin + direction * t;
        let normal = (position - center).normalize();

        Ok(Some(Collision {
            texcoord: Some(spherical_texcoord(normal)),
            ..self.collision(kind, origin, direction, t, normal)
        }))
    }

    /// Checks whether a ray intersects an ellipsoid.
    ///
    /// Same as a sphere, with each axis scaled by the reciprocal of its
    /// squared semi-axis. The normal is the gradient of the implicit surface.
    fn collide_ellipsoid(&self, origin: Tuple3D, direction: Tuple3D,
        center: Tuple3D, axes: Tuple3D) -> TraceResult<Option<Collision>> {
        if axes.x <= 0.0 || axes.y <= 0.0 || axes.z <= 0.0 {
            return Err(TraceError::NonPositiveAxis(axes));
        }

        let inv_sq = Tuple3D::new(
            1.0 / axes.x.powi(2),
            1.0 / axes.y.powi(2),
            1.0 / axes.z.powi(2),
        );

        let center_to_origin = origin - center;
        let a = direction.hadamard(&direction).dot(&inv_sq);
        let b = 2.0 * direction.hadamard(&center_to_origin).dot(&inv_sq);
        let c = center_to_origin.hadamard(&center_to_origin).dot(&inv_sq)
            - 1.0;

        let t = match nearest_root(a, b, c) {
            Some(t) => t,
            None => return Ok(None),
        };

        let kind = if c < 0.0 {
            CollisionKind::Inside
        } else {
            CollisionKind::Surface
        };

        let position = origin + direction * t;
        let offset = position - center;
        let normal = (offset.hadamard(&inv_sq) * 2.0).normalize();

        // Map onto the unit sphere before taking spherical coordinates.
        let on_unit_sphere = Tuple3D::new(
            offset.x / axes.x,
            offset.y / axes.y,
            offset.z / axes.z,
        ).normalize();

        Ok(Some(Collision {
            texcoord: Some(spherical_texcoord(on_unit_sphere)),
            ..self.collision(kind, origin, direction, t, normal)
        }))
    }

    /// Intersects a ray with a plane.
    ///
    /// A ray parallel to the plane misses, unless it lies in the plane, in
    /// which case it is considered inside the plane at distance 0.
    fn collide_plane(&self, origin: Tuple3D, direction: Tuple3D,
        plane: &Plane3D) -> TraceResult<Option<Collision>> {
        let normal = plane.normal()?;
        let denominator = normal.dot(&direction);
        let offset = (plane.origin - origin).dot(&normal);

        if feq(denominator, 0.0) {
            if feq(offset, 0.0) {
                return Ok(Some(self.collision(
                    CollisionKind::Inside, origin, direction, 0.0, normal
                )));
            }

            return Ok(None);
        }

        let t = offset / denominator;
        if t < 0.0 {
            return Ok(None);
        }

        Ok(Some(self.collision(
            CollisionKind::Surface, origin, direction, t, normal
        )))
    }

    /// Intersects a ray with a triangular face.
    ///
    /// The ray is intersected with the plane containing the face, and the hit
    /// is kept if its barycentric weights show it inside the triangle. Those
    /// weights then blend the per-vertex normals and texture coordinates, when
    /// all three corners provide them.
    fn collide_face(&self, origin: Tuple3D, direction: Tuple3D,
        corners: &[FaceVertex; 3], mesh: &Mesh)
        -> TraceResult<Option<Collision>> {
        let p1 = mesh.vertex(corners[0].vertex)?;
        let p2 = mesh.vertex(corners[1].vertex)?;
        let p3 = mesh.vertex(corners[2].vertex)?;

        // Resolve every index up front so a bad index is reported whether or
        // not this particular ray hits.
        let normals = resolve_all(corners, |c| c.normal, |i| mesh.normal(i))?;
        let texcoords =
            resolve_all(corners, |c| c.texcoord, |i| mesh.texcoord(i))?;

        let plane = Plane3D::through(p1, p2, p3);
        let mut collision =
            match self.collide_plane(origin, direction, &plane)? {
                Some(c) => c,
                None => return Ok(None),
            };

        let weights = match barycentric(collision.position, p1, p2, p3) {
            Some(w) => w,
            None => return Ok(None),
        };

        if let Some([n1, n2, n3]) = normals {
            let smooth = (n1 * weights.0 + n2 * weights.1 + n3 * weights.2)
                .normalize();

            // Opposing vertex normals can cancel out; keep the flat normal.
            if !smooth.is_zero() {
                collision.normal = smooth;
            }
        }

        collision.texcoord = texcoords.map(|t| TexCoord::blend(t, weights));
        Ok(Some(collision))
    }
}

/// Finds the smaller non-negative root of `a·t² + b·t + c = 0`.
fn nearest_root(a: f64, b: f64, c: f64) -> Option<f64> {
    let discriminant = b.powi(2) - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt = discriminant.sqrt();
    let t1 = (-b - sqrt) / (2.0 * a);
    let t2 = (-b + sqrt) / (2.0 * a);

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Looks up one attribute for all three corners of a face.
///
/// Returns `None` if any corner lacks the attribute. An out-of-range index on
/// any corner is an error either way.
fn resolve_all<T, I, L>(corners: &[FaceVertex; 3], index: I, lookup: L)
    -> TraceResult<Option<[T; 3]>>
where
    T: Copy,
    I: Fn(&FaceVertex) -> Option<usize>,
    L: Fn(usize) -> TraceResult<T>,
{
    // Every index present is checked, even when another corner lacks one.
    let mut resolved = [None; 3];
    for (slot, corner) in resolved.iter_mut().zip(corners.iter()) {
        if let Some(i) = index(corner) {
            *slot = Some(lookup(i)?);
        }
    }

    match resolved {
        [Some(a), Some(b), Some(c)] => Ok(Some([a, b, c])),
        _ => Ok(None),
    }
}

/// Maps a unit normal to spherical texture coordinates.
///
/// `u` follows the longitude around the Z axis, `v` the latitude from the
/// north pole (`v = 0`) to the south pole (`v = 1`).
fn spherical_texcoord(n: Tuple3D) -> TexCoord {
    let mut theta = n.y.atan2(n.x);
    if theta < 0.0 {
        theta += 2.0 * PI;
    }

    let phi = n.z.clamp(-1.0, 1.0).acos();
    TexCoord::new(theta / (2.0 * PI), phi / PI)
}

#[cfg(test)]
fn unit_sphere() -> Shape {
    Shape::sphere(Tuple3D::zero(), 1.0).with_material(MaterialId(0))
}

#[cfg(test)]
fn triangle_mesh() -> Mesh {
    Mesh {
        vertices: vec![
            Tuple3D::new(0.0, 0.0, 0.0),
            Tuple3D::new(2.0, 0.0, 0.0),
            Tuple3D::new(0.0, 2.0, 0.0),
        ],
        normals: vec![
            Tuple3D::new(0.0, 0.0, 1.0),
            Tuple3D::new(1.0, 0.0, 1.0).normalize(),
            Tuple3D::new(0.0, 1.0, 1.0).normalize(),
        ],
        texcoords: vec![
            TexCoord::new(0.0, 0.0),
            TexCoord::new(1.0, 0.0),
            TexCoord::new(0.0, 1.0),
        ],
    }
}

#[test]
fn ray_hits_unit_sphere() {
    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 4.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = unit_sphere().collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.kind, CollisionKind::Surface);
    assert_eq!(c.distance, 3.0);
    assert_eq!(c.position, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.normal, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.incident, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.material, Some(MaterialId(0)));
}

#[test]
fn distance_ignores_direction_length() {
    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 4.0), Tuple3D::new(0.0, 0.0, -8.0));
    let c = unit_sphere().collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.distance, 3.0);
}

#[test]
fn ray_inside_sphere() {
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, 1.0));
    let c = unit_sphere().collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.kind, CollisionKind::Inside);
    assert_eq!(c.distance, 1.0);
    assert_eq!(c.position, Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_misses_sphere() {
    let r = Ray3D::new(Tuple3D::new(0.0, 2.0, -5.0), Tuple3D::new(0.0, 0.0, 1.0));

    assert_eq!(unit_sphere().collide(&r, &Mesh::new()).unwrap(), None);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray3D::new(Tuple3D::new(0.0, 1.0, -5.0), Tuple3D::new(0.0, 0.0, 1.0));
    let c = unit_sphere().collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.distance, 5.0);
    assert_eq!(c.normal, Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn sphere_is_behind_ray() {
    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, 1.0));

    assert_eq!(unit_sphere().collide(&r, &Mesh::new()).unwrap(), None);
}

#[test]
fn degenerate_sphere_input_is_an_error() {
    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::zero());
    assert!(matches!(unit_sphere().collide(&r, &Mesh::new()),
        Err(TraceError::ZeroDirection)));

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
    let flat = Shape::sphere(Tuple3D::zero(), 0.0);
    assert!(matches!(flat.collide(&r, &Mesh::new()),
        Err(TraceError::NonPositiveRadius(_))));
}

#[test]
fn sphere_texcoords() {
    assert_eq!(spherical_texcoord(Tuple3D::new(1.0, 0.0, 0.0)),
        TexCoord::new(0.0, 0.5));
    assert_eq!(spherical_texcoord(Tuple3D::new(0.0, 1.0, 0.0)),
        TexCoord::new(0.25, 0.5));
    assert_eq!(spherical_texcoord(Tuple3D::new(0.0, 0.0, 1.0)).v, 0.0);
    assert_eq!(spherical_texcoord(Tuple3D::new(0.0, 0.0, -1.0)).v, 1.0);
}

#[test]
fn ray_hits_ellipsoid_along_axes() {
    let e = Shape::ellipsoid(Tuple3D::zero(), Tuple3D::new(2.0, 1.0, 1.0));

    let r = Ray3D::new(Tuple3D::new(5.0, 0.0, 0.0), Tuple3D::new(-1.0, 0.0, 0.0));
    let c = e.collide(&r, &Mesh::new()).unwrap().unwrap();
    assert_eq!(c.distance, 3.0);
    assert_eq!(c.position, Tuple3D::new(2.0, 0.0, 0.0));
    assert_eq!(c.normal, Tuple3D::new(1.0, 0.0, 0.0));

    let r = Ray3D::new(Tuple3D::new(0.0, 5.0, 0.0), Tuple3D::new(0.0, -1.0, 0.0));
    let c = e.collide(&r, &Mesh::new()).unwrap().unwrap();
    assert_eq!(c.distance, 4.0);
    assert_eq!(c.normal, Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn ellipsoid_normal_is_gradient() {
    let e = Shape::ellipsoid(Tuple3D::zero(), Tuple3D::new(2.0, 1.0, 1.0));
    let x = 2f64.sqrt();
    let r = Ray3D::new(Tuple3D::new(x, 5.0, 0.0), Tuple3D::new(0.0, -1.0, 0.0));
    let c = e.collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.position, Tuple3D::new(x, 0.5f64.sqrt(), 0.0));
    assert_eq!(c.normal, Tuple3D::new(1.0, 2.0, 0.0).normalize());
}

#[test]
fn ray_inside_ellipsoid() {
    let e = Shape::ellipsoid(Tuple3D::new(1.0, 1.0, 1.0),
        Tuple3D::new(1.0, 3.0, 1.0));
    let r = Ray3D::new(Tuple3D::new(1.0, 1.0, 1.0), Tuple3D::new(0.0, 1.0, 0.0));
    let c = e.collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.kind, CollisionKind::Inside);
    assert_eq!(c.distance, 3.0);
}

#[test]
fn non_positive_axis_is_an_error() {
    let e = Shape::ellipsoid(Tuple3D::zero(), Tuple3D::new(1.0, -1.0, 1.0));
    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));

    assert!(matches!(e.collide(&r, &Mesh::new()),
        Err(TraceError::NonPositiveAxis(_))));
}

#[cfg(test)]
fn floor() -> Shape {
    Shape::plane(Plane3D::new(
        Tuple3D::zero(),
        Tuple3D::new(0.0, 0.0, 1.0),
        Tuple3D::new(1.0, 0.0, 0.0),
    ))
}

#[test]
fn ray_hits_plane() {
    let r = Ray3D::new(Tuple3D::new(1.0, 3.0, 2.0), Tuple3D::new(0.0, -1.0, 0.0));
    let c = floor().collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.kind, CollisionKind::Surface);
    assert_eq!(c.distance, 3.0);
    assert_eq!(c.position, Tuple3D::new(1.0, 0.0, 2.0));
    assert_eq!(c.normal, Tuple3D::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_parallel_to_plane() {
    let r = Ray3D::new(Tuple3D::new(0.0, 10.0, 0.0), Tuple3D::new(0.0, 0.0, 1.0));

    assert_eq!(floor().collide(&r, &Mesh::new()).unwrap(), None);
}

#[test]
fn ray_within_plane() {
    let r = Ray3D::new(Tuple3D::new(3.0, 0.0, 1.0), Tuple3D::new(1.0, 0.0, 1.0));
    let c = floor().collide(&r, &Mesh::new()).unwrap().unwrap();

    assert_eq!(c.kind, CollisionKind::Inside);
    assert_eq!(c.distance, 0.0);
    assert_eq!(c.position, Tuple3D::new(3.0, 0.0, 1.0));
}

#[test]
fn plane_behind_ray() {
    let r = Ray3D::new(Tuple3D::new(0.0, 1.0, 0.0), Tuple3D::new(0.0, 1.0, 0.0));

    assert_eq!(floor().collide(&r, &Mesh::new()).unwrap(), None);
}

#[test]
fn ray_hits_flat_face() {
    let face = Shape::face(FaceVertex::flat(1), FaceVertex::flat(2),
        FaceVertex::flat(3));
    let r = Ray3D::new(Tuple3D::new(0.5, 0.5, 3.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = face.collide(&r, &triangle_mesh()).unwrap().unwrap();

    assert_eq!(c.distance, 3.0);
    assert_eq!(c.position, Tuple3D::new(0.5, 0.5, 0.0));
    assert_eq!(c.normal, Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(c.texcoord, None);
}

#[test]
fn ray_misses_face() {
    let face = Shape::face(FaceVertex::flat(1), FaceVertex::flat(2),
        FaceVertex::flat(3));
    let r = Ray3D::new(Tuple3D::new(1.5, 1.5, 3.0), Tuple3D::new(0.0, 0.0, -1.0));

    assert_eq!(face.collide(&r, &triangle_mesh()).unwrap(), None);
}

#[test]
fn face_interpolates_normals_and_texcoords() {
    let face = Shape::face(
        FaceVertex::new(1, Some(1), Some(1)),
        FaceVertex::new(2, Some(2), Some(2)),
        FaceVertex::new(3, Some(3), Some(3)),
    );
    let mesh = triangle_mesh();

    // At a vertex the normal is exactly that vertex's normal.
    let r = Ray3D::new(Tuple3D::new(2.0, 0.0, 3.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = face.collide(&r, &mesh).unwrap().unwrap();
    assert_eq!(c.normal, mesh.normals[1]);
    assert_eq!(c.texcoord, Some(TexCoord::new(1.0, 0.0)));

    // Inside, everything is blended by the barycentric weights.
    let r = Ray3D::new(Tuple3D::new(0.5, 0.5, 3.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = face.collide(&r, &mesh).unwrap().unwrap();
    let expected = (mesh.normals[0] * 0.5 + mesh.normals[1] * 0.25
        + mesh.normals[2] * 0.25).normalize();
    assert_eq!(c.normal, expected);
    assert!(c.normal.is_unit());

    let t = c.texcoord.unwrap();
    assert!((t.u - 0.25).abs() < 1e-9);
    assert!((t.v - 0.25).abs() < 1e-9);
}

#[test]
fn one_missing_texcoord_drops_texture() {
    let face = Shape::face(
        FaceVertex::new(1, None, Some(1)),
        FaceVertex::new(2, None, None),
        FaceVertex::new(3, None, Some(3)),
    );
    let r = Ray3D::new(Tuple3D::new(0.5, 0.5, 3.0), Tuple3D::new(0.0, 0.0, -1.0));
    let c = face.collide(&r, &triangle_mesh()).unwrap().unwrap();

    assert_eq!(c.texcoord, None);
    assert_eq!(c.normal, Tuple3D::new(0.0, 0.0, 1.0));
}

#[test]
fn bad_face_index_is_an_error() {
    let r = Ray3D::new(Tuple3D::new(0.5, 0.5, 3.0), Tuple3D::new(0.0, 0.0, -1.0));

    let face = Shape::face(FaceVertex::flat(1), FaceVertex::flat(2),
        FaceVertex::flat(4));
    assert!(matches!(face.collide(&r, &triangle_mesh()),
        Err(TraceError::IndexOutOfRange { kind: "vertex", index: 4, .. })));

    let face = Shape::face(
        FaceVertex::new(1, Some(1), None),
        FaceVertex::new(2, Some(9), None),
        FaceVertex::new(3, Some(3), None),
    );
    assert!(matches!(face.collide(&r, &triangle_mesh()),
        Err(TraceError::IndexOutOfRange { kind: "normal", index: 9, .. })));
}

#[test]
fn bad_index_on_partial_corners_is_an_error() {
    let r = Ray3D::new(Tuple3D::new(0.5, 0.5, 3.0), Tuple3D::new(0.0, 0.0, -1.0));

    // Only two corners carry a normal, so the face would be flat, but the
    // index that is given must still exist.
    let face = Shape::face(
        FaceVertex::new(1, Some(9), None),
        FaceVertex::new(2, None, None),
        FaceVertex::new(3, Some(1), None),
    );
    assert!(matches!(face.collide(&r, &triangle_mesh()),
        Err(TraceError::IndexOutOfRange { kind: "normal", index: 9, .. })));

    let face = Shape::face(
        FaceVertex::new(1, None, None),
        FaceVertex::new(2, None, Some(7)),
        FaceVertex::new(3, None, None),
    );
    assert!(matches!(face.collide(&r, &triangle_mesh()),
        Err(TraceError::IndexOutOfRange { kind: "texture coordinate",
            index: 7, .. })));
}
