use crate::tuple::Tuple3D;
use crate::error::{ TraceError, TraceResult };

/// A texture coordinate. `u` runs left to right, `v` top to bottom.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TexCoord {
    pub u: f64,
    pub v: f64,
}

impl TexCoord {
    pub fn new(u: f64, v: f64) -> TexCoord {
        TexCoord { u, v }
    }

    /// Blends three texture coordinates with barycentric weights.
    pub fn blend(t: [TexCoord; 3], w: (f64, f64, f64)) -> TexCoord {
        TexCoord {
            u: t[0].u * w.0 + t[1].u * w.1 + t[2].u * w.2,
            v: t[0].v * w.0 + t[1].v * w.1 + t[2].v * w.2,
        }
    }
}

/// Vertex data shared by every face in a scene.
///
/// Lookups are one-based, the way OBJ files and scene descriptions number
/// them. Index 0 is never valid; faces use `None` for an absent normal or
/// texture coordinate instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Tuple3D>,
    pub normals: Vec<Tuple3D>,
    pub texcoords: Vec<TexCoord>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Default::default()
    }

    pub fn vertex(&self, index: usize) -> TraceResult<Tuple3D> {
        lookup("vertex", &self.vertices, index)
    }

    pub fn normal(&self, index: usize) -> TraceResult<Tuple3D> {
        lookup("normal", &self.normals, index)
    }

    pub fn texcoord(&self, index: usize) -> TraceResult<TexCoord> {
        lookup("texture coordinate", &self.texcoords, index)
    }
}

fn lookup<T: Copy>(kind: &'static str, items: &[T], index: usize)
    -> TraceResult<T> {
    index.checked_sub(1)
        .and_then(|i| items.get(i))
        .copied()
        .ok_or(TraceError::IndexOutOfRange { kind, index, len: items.len() })
}

#[test]
fn lookups_are_one_based() {
    let mesh = Mesh {
        vertices: vec![Tuple3D::new(1.0, 0.0, 0.0), Tuple3D::new(0.0, 1.0, 0.0)],
        normals: vec![Tuple3D::new(0.0, 0.0, 1.0)],
        texcoords: vec![TexCoord::new(0.5, 0.25)],
    };

    assert_eq!(mesh.vertex(1).unwrap(), Tuple3D::new(1.0, 0.0, 0.0));
    assert_eq!(mesh.vertex(2).unwrap(), Tuple3D::new(0.0, 1.0, 0.0));
    assert_eq!(mesh.normal(1).unwrap(), Tuple3D::new(0.0, 0.0, 1.0));
    assert_eq!(mesh.texcoord(1).unwrap(), TexCoord::new(0.5, 0.25));
}

#[test]
fn out_of_range_lookups_fail() {
    let mesh = Mesh {
        vertices: vec![Tuple3D::zero()],
        ..Default::default()
    };

    assert!(matches!(mesh.vertex(0),
        Err(TraceError::IndexOutOfRange { kind: "vertex", index: 0, len: 1 })));
    assert!(matches!(mesh.vertex(2),
        Err(TraceError::IndexOutOfRange { index: 2, .. })));
    assert!(mesh.normal(1).is_err());
}
