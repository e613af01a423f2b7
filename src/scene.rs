use std::fs;
use std::path::{ Path, PathBuf };

use log::info;
use serde::Deserialize;

use crate::tuple::Tuple3D;
use crate::mesh::{ Mesh, TexCoord };
use crate::shape::{ Shape, FaceVertex };
use crate::geometry::Plane3D;
use crate::light::{ Light, Material, MaterialId, TextureId };
use crate::texture::Texture;
use crate::canvas::Canvas;
use crate::obj::ObjParser;
use crate::world::World;
use crate::camera::Camera;
use crate::error::SceneError;

/// A world together with the camera looking at it.
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Loads a scene description from a JSON file.
    ///
    /// Texture and OBJ paths in the description are relative to the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Scene, SceneError> {
        let text = fs::read_to_string(path)
            .map_err(|e| SceneError::io(path, e))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        Scene::parse(&text, base)
    }

    /// Parses a scene description, resolving relative paths against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Scene, SceneError> {
        let mut scene_json: SceneJson = serde_json::from_str(text)?;
        scene_json.resolve_paths(base);

        Scene::try_from(scene_json)
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = SceneError;

    fn try_from(scene_json: SceneJson) -> Result<Scene, SceneError> {
        scene_json.validate()?;

        let camera = Camera::new(
            scene_json.eye.into(),
            scene_json.view_dir.into(),
            scene_json.up_dir.into(),
            scene_json.vfov,
            scene_json.width,
            scene_json.height,
        );

        let mut world = World::empty();
        world.background = scene_json.background.into();

        for path in scene_json.textures.iter() {
            let canvas = Canvas::load(path)?;
            world.add_texture(Texture::from(&canvas));
        }

        world.materials = scene_json.materials.iter().map(|m| m.into()).collect();
        world.lights = scene_json.lights.iter().map(|l| l.into()).collect();
        world.mesh = (&scene_json.mesh).into();
        world.shapes = scene_json.shapes.iter().map(|s| s.into()).collect();

        for obj in scene_json.meshes.iter() {
            let mut obj_parser = ObjParser::new(&obj.path);
            obj_parser.parse()?;

            let faces = obj_parser.append_to(&mut world.mesh,
                obj.material.map(MaterialId));
            info!("Loaded {} faces from {:?}", faces.len(), obj.path);
            world.shapes.extend(faces);
        }

        info!("Scene has {} shapes, {} lights, {} materials and {} textures",
            world.shapes.len(), world.lights.len(), world.materials.len(),
            world.textures.len());

        Ok(Scene { world, camera })
    }
}

fn black() -> [f64; 3] {
    [0.0, 0.0, 0.0]
}

fn white() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn one() -> f64 {
    1.0
}

#[derive(Deserialize)]
pub struct SceneJson {
    eye: [f64; 3],
    view_dir: [f64; 3],
    up_dir: [f64; 3],
    vfov: f64,
    width: usize,
    height: usize,

    #[serde(default = "black")]
    background: [f64; 3],

    #[serde(default)]
    materials: Vec<MaterialJson>,
    #[serde(default)]
    textures: Vec<PathBuf>,
    #[serde(default)]
    lights: Vec<LightJson>,
    #[serde(default)]
    mesh: MeshJson,
    #[serde(default)]
    meshes: Vec<ObjJson>,
    #[serde(default)]
    shapes: Vec<ShapeJson>,
}

#[derive(Clone, Deserialize)]
struct MaterialJson {
    diffuse: [f64; 3],
    specular: [f64; 3],
    ka: f64,
    kd: f64,
    ks: f64,
    exponent: i32,

    #[serde(default = "one")]
    opacity: f64,
    #[serde(default = "one")]
    refraction_index: f64,
    #[serde(default)]
    texture: Option<usize>,
}

#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LightJson {
    Point {
        position: [f64; 3],
        #[serde(default = "white")]
        color: [f64; 3],
    },
    Directional {
        direction: [f64; 3],
        #[serde(default = "white")]
        color: [f64; 3],
    },
    Spot {
        position: [f64; 3],
        direction: [f64; 3],
        half_angle: f64,
        #[serde(default = "white")]
        color: [f64; 3],
    },
}

#[derive(Clone, Default, Deserialize)]
struct MeshJson {
    #[serde(default)]
    vertices: Vec<[f64; 3]>,
    #[serde(default)]
    normals: Vec<[f64; 3]>,
    #[serde(default)]
    texcoords: Vec<[f64; 2]>,
}

#[derive(Clone, Deserialize)]
struct ObjJson {
    path: PathBuf,
    #[serde(default)]
    material: Option<usize>,
}

/// A shape description. Face corners are `[vertex, normal, texcoord]`
/// one-based mesh indices, where 0 means "absent".
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeJson {
    Sphere {
        center: [f64; 3],
        radius: f64,
        #[serde(default)]
        material: Option<usize>,
    },
    Ellipsoid {
        center: [f64; 3],
        axes: [f64; 3],
        #[serde(default)]
        material: Option<usize>,
    },
    Plane {
        origin: [f64; 3],
        u: [f64; 3],
        v: [f64; 3],
        #[serde(default)]
        material: Option<usize>,
    },
    Face {
        vertices: [[usize; 3]; 3],
        #[serde(default)]
        material: Option<usize>,
    },
}

impl ShapeJson {
    fn material(&self) -> Option<usize> {
        match *self {
            ShapeJson::Sphere { material, .. }
            | ShapeJson::Ellipsoid { material, .. }
            | ShapeJson::Plane { material, .. }
            | ShapeJson::Face { material, .. } => material,
        }
    }
}

impl SceneJson {
    fn resolve_paths(&mut self, base: &Path) {
        for path in self.textures.iter_mut() {
            *path = base.join(&*path);
        }

        for obj in self.meshes.iter_mut() {
            obj.path = base.join(&obj.path);
        }
    }

    /// Checks everything that can be checked before rendering.
    ///
    /// Mesh indices of faces are left to the renderer, which reports them as
    /// lookup errors.
    fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return invalid(format!("image size {}x{} is empty", self.width,
                self.height));
        }

        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("vertical field of view {} is not in \
                (0, 180) degrees", self.vfov));
        }

        let view: Tuple3D = self.view_dir.into();
        let up: Tuple3D = self.up_dir.into();
        if view.is_zero() || up.is_zero() || view.is_parallel(&up) {
            return invalid("view and up directions must be non-zero and not \
                parallel".into());
        }

        for (i, m) in self.materials.iter().enumerate() {
            if m.ka < 0.0 || m.kd < 0.0 || m.ks < 0.0 || m.exponent < 0 {
                return invalid(format!("material {} has a negative \
                    coefficient", i));
            }

            if !(0.0..=1.0).contains(&m.opacity) {
                return invalid(format!("material {} has opacity {} outside \
                    [0, 1]", i, m.opacity));
            }

            if m.refraction_index <= 0.0 {
                return invalid(format!("material {} has non-positive \
                    refraction index {}", i, m.refraction_index));
            }

            check_index("texture", m.texture, self.textures.len())?;
        }

        for light in self.lights.iter() {
            match *light {
                LightJson::Directional { direction, .. }
                | LightJson::Spot { direction, .. } => {
                    if Tuple3D::from(direction).is_zero() {
                        return invalid("light direction is zero".into());
                    }
                },
                LightJson::Point { .. } => (),
            }

            if let LightJson::Spot { half_angle, .. } = *light {
                if !(0.0..=180.0).contains(&half_angle) {
                    return invalid(format!("spot light half-angle {} is not \
                        in [0, 180] degrees", half_angle));
                }
            }
        }

        for shape in self.shapes.iter() {
            match *shape {
                ShapeJson::Sphere { radius, .. } if radius <= 0.0 => {
                    return invalid(format!("sphere radius {} is not positive",
                        radius));
                },
                ShapeJson::Ellipsoid { axes, .. }
                    if axes.iter().any(|&a| a <= 0.0) => {
                    return invalid(format!("ellipsoid axes {:?} are not all \
                        positive", axes));
                },
                _ => (),
            }

            check_index("material", shape.material(), self.materials.len())?;
        }

        for obj in self.meshes.iter() {
            check_index("material", obj.material, self.materials.len())?;
        }

        Ok(())
    }
}

fn invalid(reason: String) -> Result<(), SceneError> {
    Err(SceneError::Invalid(reason))
}

fn check_index(kind: &str, index: Option<usize>, len: usize)
    -> Result<(), SceneError> {
    match index {
        Some(i) if i >= len => invalid(format!("{} index {} is out of range \
            ({} defined)", kind, i, len)),
        _ => Ok(()),
    }
}

impl From<&MaterialJson> for Material {
    fn from(m: &MaterialJson) -> Material {
        Material {
            diffuse_color: m.diffuse.into(),
            specular_color: m.specular.into(),
            ambient: m.ka,
            diffuse: m.kd,
            specular: m.ks,
            exponent: m.exponent,
            texture: m.texture.map(TextureId),
            opacity: m.opacity,
            refraction_index: m.refraction_index,
        }
    }
}

impl From<&LightJson> for Light {
    fn from(l: &LightJson) -> Light {
        match *l {
            LightJson::Point { position, color }
                => Light::point(position.into(), color.into()),
            LightJson::Directional { direction, color }
                => Light::directional(direction.into(), color.into()),
            LightJson::Spot { position, direction, half_angle, color }
                => Light::spot(position.into(), direction.into(), half_angle,
                    color.into()),
        }
    }
}

impl From<&MeshJson> for Mesh {
    fn from(m: &MeshJson) -> Mesh {
        Mesh {
            vertices: m.vertices.iter().map(|&v| v.into()).collect(),
            normals: m.normals.iter().map(|&n| n.into()).collect(),
            texcoords: m.texcoords.iter().map(|t| TexCoord::new(t[0], t[1]))
                .collect(),
        }
    }
}

impl From<&ShapeJson> for Shape {
    fn from(shape_json: &ShapeJson) -> Shape {
        let shape = match *shape_json {
            ShapeJson::Sphere { center, radius, .. }
                => Shape::sphere(center.into(), radius),
            ShapeJson::Ellipsoid { center, axes, .. }
                => Shape::ellipsoid(center.into(), axes.into()),
            ShapeJson::Plane { origin, u, v, .. }
                => Shape::plane(Plane3D::new(origin.into(), u.into(), v.into())),
            ShapeJson::Face { vertices: [a, b, c], .. }
                => Shape::face(corner(a), corner(b), corner(c)),
        };

        Shape { material: shape_json.material().map(MaterialId), ..shape }
    }
}

/// Converts a `[vertex, normal, texcoord]` triple, where 0 means absent.
fn corner(indices: [usize; 3]) -> FaceVertex {
    let present = |i: usize| if i == 0 { None } else { Some(i) };
    FaceVertex::new(indices[0], present(indices[1]), present(indices[2]))
}

#[cfg(test)]
use crate::color::Color;

#[cfg(test)]
const MINIMAL: &str = r#"{
    "eye": [0, 0, 5],
    "view_dir": [0, 0, -1],
    "up_dir": [0, 1, 0],
    "vfov": 60,
    "width": 4,
    "height": 3
}"#;

#[cfg(test)]
fn with(key: &str, value: &str) -> String {
    let mut scene: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
    scene[key] = serde_json::from_str(value).unwrap();
    scene.to_string()
}

#[cfg(test)]
fn parse(text: &str) -> Result<Scene, SceneError> {
    Scene::parse(text, Path::new("."))
}

#[test]
fn minimal_scene() {
    let scene = parse(MINIMAL).unwrap();

    assert_eq!(scene.camera, Camera::new(
        Tuple3D::new(0.0, 0.0, 5.0),
        Tuple3D::new(0.0, 0.0, -1.0),
        Tuple3D::new(0.0, 1.0, 0.0),
        60.0, 4, 3,
    ));
    assert_eq!(scene.world.background, Color::black());
    assert!(scene.world.shapes.is_empty());
}

#[test]
fn shapes_lights_and_materials() {
    let mut scene: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
    scene["materials"] = serde_json::json!([{
        "diffuse": [1, 0, 0], "specular": [1, 1, 1],
        "ka": 0.1, "kd": 0.7, "ks": 0.2, "exponent": 50,
        "opacity": 0.5, "refraction_index": 1.5
    }]);
    scene["lights"] = serde_json::json!([
        { "type": "point", "position": [0, 10, 0] },
        { "type": "spot", "position": [0, 10, 0], "direction": [0, -1, 0],
          "half_angle": 20, "color": [0.5, 0.5, 0.5] }
    ]);
    scene["mesh"] = serde_json::json!({
        "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
        "normals": [[0, 0, 1]]
    });
    scene["shapes"] = serde_json::json!([
        { "type": "sphere", "center": [0, 0, -1], "radius": 2, "material": 0 },
        { "type": "face", "vertices": [[1, 1, 0], [2, 1, 0], [3, 1, 0]] }
    ]);

    let scene = parse(&scene.to_string()).unwrap();
    let w = &scene.world;

    assert_eq!(w.materials[0].diffuse_color, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(w.materials[0].opacity, 0.5);
    assert_eq!(w.lights[0], Light::point(Tuple3D::new(0.0, 10.0, 0.0),
        Color::white()));
    assert_eq!(w.lights[1].color, Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(w.mesh.vertices.len(), 3);
    assert_eq!(w.shapes[0], Shape::sphere(Tuple3D::new(0.0, 0.0, -1.0), 2.0)
        .with_material(MaterialId(0)));

    let smooth = |v| FaceVertex::new(v, Some(1), None);
    assert_eq!(w.shapes[1], Shape::face(smooth(1), smooth(2), smooth(3)));
}

#[test]
fn invalid_scenes_are_rejected() {
    let cases = [
        with("width", "0"),
        with("vfov", "180"),
        with("up_dir", "[0, 0, 3]"),
        with("view_dir", "[0, 0, 0]"),
        with("shapes", r#"[{ "type": "sphere", "center": [0, 0, 0],
            "radius": 0 }]"#),
        with("shapes", r#"[{ "type": "ellipsoid", "center": [0, 0, 0],
            "axes": [1, -1, 1] }]"#),
        with("shapes", r#"[{ "type": "sphere", "center": [0, 0, 0],
            "radius": 1, "material": 0 }]"#),
        with("materials", r#"[{ "diffuse": [1, 1, 1], "specular": [1, 1, 1],
            "ka": 0.1, "kd": 0.7, "ks": 0.2, "exponent": 50,
            "opacity": 1.5 }]"#),
        with("materials", r#"[{ "diffuse": [1, 1, 1], "specular": [1, 1, 1],
            "ka": 0.1, "kd": 0.7, "ks": 0.2, "exponent": 50,
            "texture": 0 }]"#),
        with("lights", r#"[{ "type": "directional", "direction": [0, 0, 0] }]"#),
        with("lights", r#"[{ "type": "spot", "position": [0, 5, 0],
            "direction": [0, -1, 0], "half_angle": -10 }]"#),
        with("lights", r#"[{ "type": "spot", "position": [0, 5, 0],
            "direction": [0, -1, 0], "half_angle": 200 }]"#),
    ];

    for case in cases.iter() {
        assert!(matches!(parse(case), Err(SceneError::Invalid(_))), "{}", case);
    }
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(parse("{ \"eye\": [0, 0] }"), Err(SceneError::Json(_))));
    assert!(matches!(parse(&with("shapes", r#"[{ "type": "cube" }]"#)),
        Err(SceneError::Json(_))));
}

#[test]
fn missing_files_are_io_errors() {
    let scene = with("textures", r#"["no-such-texture.ppm"]"#);
    assert!(matches!(parse(&scene), Err(SceneError::Io { .. })));

    assert!(matches!(Scene::load(Path::new("./scenes/missing.json")),
        Err(SceneError::Io { .. })));
}

#[test]
fn load_example_scene() {
    let scene = Scene::load(Path::new("./scenes/example.json")).unwrap();
    let w = &scene.world;

    // Textures and OBJ files are found next to the scene file.
    assert_eq!(w.textures.len(), 1);
    assert_eq!(w.textures[0].width(), 2);
    assert_eq!(w.mesh.vertices.len(), 4);
    assert_eq!(w.shapes.len(), 4 + 4);
    assert_eq!(w.shapes[7].material, Some(MaterialId(2)));
}
