use std::fs;
use std::path::PathBuf;

use log::{ debug, warn };

use crate::tuple::Tuple3D;
use crate::mesh::{ Mesh, TexCoord };
use crate::shape::{ Shape, FaceVertex };
use crate::light::MaterialId;
use crate::error::SceneError;

/// A triangle of an OBJ file, indexing the file's own (one-based) records.
pub type ObjFace = [FaceVertex; 3];

/// A parser for OBJ files.
///
/// Only geometry is read: vertices (`v`), vertex normals (`vn`), texture
/// coordinates (`vt`) and faces (`f`). Everything else (groups, materials,
/// smoothing) is skipped and counted in `ignored_lines`.
#[derive(Clone, Debug, Default)]
pub struct ObjParser {
    pub path: PathBuf,
    pub ignored_lines: usize,

    pub vertices: Vec<Tuple3D>,
    pub normals: Vec<Tuple3D>,
    pub texcoords: Vec<TexCoord>,
    pub faces: Vec<ObjFace>,
}

impl ObjParser {
    /// Creates a new `ObjParser` to parse the OBJ file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> ObjParser {
        ObjParser { path: path.into(), ..Default::default() }
    }

    /// Reads and parses the OBJ file.
    pub fn parse(&mut self) -> Result<(), SceneError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| SceneError::io(&self.path, e))?;

        self.parse_str(&text)
    }

    /// Parses OBJ text, adding its records to this parser.
    ///
    /// A sample OBJ file may look like the following:
    ///
    /// ```obj
    /// v -1 1 0
    /// v -1 0 0
    /// v 1 0 0
    /// v 1 1 0
    /// vt 0 1
    /// vn 0 0 1
    ///
    /// f 1 2 3
    /// f 1/1/1 3//1 4
    /// ```
    ///
    /// The first word of each line names a command, and the remaining words
    /// are its arguments. Face corners are written `v`, `v/vt`, `v//vn` or
    /// `v/vt/vn`, with one-based indices.
    ///
    /// Malformed numbers are errors. Faces referring to records that don't
    /// exist (yet) are skipped, as are unsupported commands.
    pub fn parse_str(&mut self, text: &str) -> Result<(), SceneError> {
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();

            // Ignore empty lines and comments.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if !self.handle_command(i + 1, line)? {
                debug!("{:?}:{}: ignoring {:?}", self.path, i + 1, line);
                self.ignored_lines += 1;
            }
        }

        if self.ignored_lines > 0 {
            warn!("Ignored {} unsupported lines in {:?}", self.ignored_lines,
                self.path);
        }

        Ok(())
    }

    /// Handles one command. Returns whether the line was used.
    fn handle_command(&mut self, line_no: usize, line: &str)
        -> Result<bool, SceneError> {
        let params: Vec<&str> = line.split_whitespace().collect();

        match params[0] {
            "v" | "vn" => {
                // Vertices and normals need all three coordinates.
                if params.len() < 4 {
                    return Ok(false);
                }

                let t = Tuple3D::new(
                    self.number(line_no, params[1])?,
                    self.number(line_no, params[2])?,
                    self.number(line_no, params[3])?,
                );

                if params[0] == "v" {
                    self.vertices.push(t);
                } else {
                    self.normals.push(t);
                }
            },

            "vt" => {
                if params.len() < 3 {
                    return Ok(false);
                }

                // OBJ puts v = 0 at the bottom of the image, textures at the
                // top.
                let u = self.number(line_no, params[1])?;
                let v = self.number(line_no, params[2])?;
                self.texcoords.push(TexCoord::new(u, 1.0 - v));
            },

            "f" => {
                let mut face = Vec::with_capacity(params.len() - 1);
                for corner in params.iter().skip(1) {
                    face.push(self.corner(line_no, corner)?);
                }

                if face.len() < 3 || !face.iter().all(|c| self.resolves(c)) {
                    return Ok(false);
                }

                self.faces.extend(fan_triangulation(&face));
            },

            _ => return Ok(false),
        }

        Ok(true)
    }

    /// Parses a face corner: `v`, `v/vt`, `v//vn` or `v/vt/vn`.
    fn corner(&self, line_no: usize, corner: &str)
        -> Result<FaceVertex, SceneError> {
        let attributes: Vec<&str> = corner.split('/').collect();
        if attributes.len() > 3 {
            return Err(self.error(line_no,
                format!("face corner {:?} has too many attributes", corner)));
        }

        let vertex = self.index(line_no, attributes[0])?;
        let texcoord = match attributes.get(1) {
            Some(s) if !s.is_empty() => Some(self.index(line_no, s)?),
            _ => None,
        };
        let normal = match attributes.get(2) {
            Some(s) if !s.is_empty() => Some(self.index(line_no, s)?),
            _ => None,
        };

        Ok(FaceVertex::new(vertex, normal, texcoord))
    }

    /// Checks that every index of a corner refers to a parsed record.
    fn resolves(&self, c: &FaceVertex) -> bool {
        c.vertex <= self.vertices.len()
            && c.normal.map_or(true, |n| n <= self.normals.len())
            && c.texcoord.map_or(true, |t| t <= self.texcoords.len())
    }

    fn number(&self, line_no: usize, s: &str) -> Result<f64, SceneError> {
        s.parse().map_err(|_| self.error(line_no,
            format!("expected a number, found {:?}", s)))
    }

    fn index(&self, line_no: usize, s: &str) -> Result<usize, SceneError> {
        match s.parse::<usize>() {
            Ok(i) if i > 0 => Ok(i),
            _ => Err(self.error(line_no,
                format!("expected a positive index, found {:?}", s))),
        }
    }

    fn error(&self, line: usize, reason: String) -> SceneError {
        SceneError::Obj { path: self.path.clone(), line, reason }
    }

    /// Appends the parsed records to a mesh and creates a face shape for every
    /// triangle.
    ///
    /// Indices are shifted past the records already in `mesh`, so several
    /// files can share one mesh.
    pub fn append_to(&self, mesh: &mut Mesh, material: Option<MaterialId>)
        -> Vec<Shape> {
        let vertex_offset = mesh.vertices.len();
        let normal_offset = mesh.normals.len();
        let texcoord_offset = mesh.texcoords.len();

        mesh.vertices.extend_from_slice(&self.vertices);
        mesh.normals.extend_from_slice(&self.normals);
        mesh.texcoords.extend_from_slice(&self.texcoords);

        let shift = |c: FaceVertex| FaceVertex::new(
            c.vertex + vertex_offset,
            c.normal.map(|n| n + normal_offset),
            c.texcoord.map(|t| t + texcoord_offset),
        );

        self.faces.iter()
            .map(|f| Shape {
                material,
                ..Shape::face(shift(f[0]), shift(f[1]), shift(f[2]))
            })
            .collect()
    }
}

/// Partitions a convex polygon into triangles.
///
/// In an OBJ file, faces can be specified like so:
///
/// ```obj
/// f 1 2 3 4 5
/// ```
///
/// Since the only polygon primitive is a triangle, the polygon is split into a
/// "fan" around its first corner:
///
/// ```text
///         B *
///          / \
///         /   \
///        /     \
///     A *       * C
///       |       |
///       |       |
///     E * ----- * D
/// ```
///
/// Starting at `A`, this creates triangles `A-B-C`, `A-C-D` and `A-D-E`.
fn fan_triangulation(face: &[FaceVertex]) -> Vec<ObjFace> {
    (1..face.len() - 1)
        .map(|i| [face[0], face[i], face[i + 1]])
        .collect()
}

#[test]
fn ignoring_unrecognized_lines() {
    let mut obj_parser = ObjParser::new("./models/gibberish.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.ignored_lines, 5);
    assert!(obj_parser.vertices.is_empty());
}

#[test]
fn vertex_records() {
    let mut obj_parser = ObjParser::new("./models/vertices.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.vertices, vec![
        Tuple3D::new(-1.0, 1.0, 0.0),
        Tuple3D::new(-1.0, 0.5, 0.0),
        Tuple3D::new( 1.0, 0.0, 0.0),
        Tuple3D::new( 1.0, 1.0, 0.0),
    ]);
}

#[test]
fn parsing_triangle_faces() {
    let mut obj_parser = ObjParser::new("./models/vertices-and-faces.obj");
    obj_parser.parse().unwrap();

    let flat = FaceVertex::flat;
    assert_eq!(obj_parser.faces, vec![
        [flat(1), flat(2), flat(3)],
        [flat(1), flat(3), flat(4)],
    ]);
}

#[test]
fn triangulating_polygons() {
    let mut obj_parser = ObjParser::new("./models/vertices-and-polygon.obj");
    obj_parser.parse().unwrap();

    let flat = FaceVertex::flat;
    assert_eq!(obj_parser.faces, vec![
        [flat(1), flat(2), flat(3)],
        [flat(1), flat(3), flat(4)],
        [flat(1), flat(4), flat(5)],
    ]);
}

#[test]
fn groups_are_ignored() {
    let mut obj_parser = ObjParser::new("./models/triangles-with-groups.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.faces.len(), 2);
    assert_eq!(obj_parser.ignored_lines, 2);
}

#[test]
fn faces_with_normals_and_texcoords() {
    let mut obj_parser = ObjParser::new("./models/faces-with-normals.obj");
    obj_parser.parse().unwrap();

    assert_eq!(obj_parser.normals[1], Tuple3D::new(0.707, 0.0, -0.707));
    assert_eq!(obj_parser.texcoords[0], TexCoord::new(0.0, 0.75));

    let corner = FaceVertex::new;
    assert_eq!(obj_parser.faces, vec![
        [corner(1, Some(3), None), corner(2, Some(1), None),
            corner(3, Some(2), None)],
        [corner(1, Some(3), Some(1)), corner(2, Some(1), Some(2)),
            corner(3, Some(2), Some(1))],
        [corner(1, None, Some(1)), corner(2, None, Some(2)),
            corner(3, None, Some(1))],
    ]);
}

#[test]
fn faces_with_missing_records_are_skipped() {
    let mut obj_parser = ObjParser::new("inline.obj");
    obj_parser.parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\nf 1//1 2 3\nf 1 2\n")
        .unwrap();

    assert!(obj_parser.faces.is_empty());
    assert_eq!(obj_parser.ignored_lines, 3);
}

#[test]
fn malformed_numbers_are_errors() {
    let mut obj_parser = ObjParser::new("inline.obj");
    let err = obj_parser.parse_str("v 0 0 0\nv 1 x 0\n").unwrap_err();
    assert!(matches!(err, SceneError::Obj { line: 2, .. }));

    let mut obj_parser = ObjParser::new("inline.obj");
    let err = obj_parser.parse_str("v 0 0 0\nf 1 -1 1\n").unwrap_err();
    assert!(matches!(err, SceneError::Obj { line: 2, .. }));
}

#[test]
fn appending_offsets_indices() {
    let mut mesh = Mesh::new();
    mesh.vertices.push(Tuple3D::new(9.0, 9.0, 9.0));
    mesh.normals.push(Tuple3D::new(0.0, 1.0, 0.0));

    let mut obj_parser = ObjParser::new("inline.obj");
    obj_parser.parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n")
        .unwrap();

    let shapes = obj_parser.append_to(&mut mesh, Some(MaterialId(2)));
    let corner = |v| FaceVertex::new(v, Some(2), None);

    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.normals.len(), 2);
    assert_eq!(shapes, vec![
        Shape::face(corner(2), corner(3), corner(4))
            .with_material(MaterialId(2)),
    ]);
    assert_eq!(mesh.vertex(4).unwrap(), Tuple3D::new(0.0, 1.0, 0.0));
}
