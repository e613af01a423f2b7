use crate::consts::{ COLLISION_THRESHOLD, SHADOW_THRESHOLD, MAX_RECURSION_DEPTH };
use crate::ray::Ray3D;
use crate::mesh::Mesh;
use crate::color::Color;
use crate::shape::Shape;
use crate::texture::Texture;
use crate::intersect::Collision;
use crate::light::{ Light, Material, MaterialId, TextureId, light_direction,
    blinn_phong };
use crate::error::{ TraceError, TraceResult };

/// A world with objects and light.
///
/// The world owns every pool the shapes refer to (materials, textures and the
/// mesh), so shapes stay small and copyable. It is built once and only read
/// while rendering, which makes `&World` safe to share between threads.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub shapes: Vec<Shape>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub mesh: Mesh,
    pub background: Color,
}

impl World {
    /// Creates an empty world with no objects, no lights and a black
    /// background.
    pub fn empty() -> World {
        Default::default()
    }

    /// Adds a material to the pool, returning its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Adds a texture to the pool, returning its id.
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Returns the material of the shape behind a collision.
    pub fn material_of(&self, c: &Collision) -> TraceResult<&Material> {
        c.material
            .and_then(|id| self.material(id))
            .ok_or(TraceError::UnresolvedMaterial)
    }

    /// Casts a ray against all objects in the world.
    ///
    /// Every shape is tested (there is no acceleration structure). Hits closer
    /// than `COLLISION_THRESHOLD` are ignored, so rays leaving a surface don't
    /// hit that same surface again. The first valid hit becomes the closest;
    /// later hits replace it only when strictly closer, so ties go to the
    /// shape listed first.
    ///
    /// An error from any shape aborts the cast. So does a winning shape
    /// without a usable material, since it couldn't be shaded.
    pub fn cast(&self, r: &Ray3D) -> TraceResult<Option<Collision>> {
        let mut closest: Option<(usize, Collision)> = None;

        for (i, shape) in self.shapes.iter().enumerate() {
            let c = match shape.collide(r, &self.mesh)? {
                Some(c) if c.distance > COLLISION_THRESHOLD => c,
                _ => continue,
            };

            let closer = match closest {
                Some((_, ref best)) => c.distance < best.distance,
                None => true,
            };

            if closer {
                closest = Some((i, c));
            }
        }

        match closest {
            Some((i, c)) => {
                if self.material_of(&c).is_err() {
                    return Err(TraceError::MissingMaterial { shape: i });
                }

                Ok(Some(c))
            },
            None => Ok(None),
        }
    }

    /// Determines the color of a surface before lighting.
    ///
    /// Textured materials use the texel at the collision's texture
    /// coordinate; everything else (including textured materials on shapes
    /// without texture coordinates) uses the material's diffuse color.
    pub fn object_color(&self, m: &Material, c: &Collision) -> TraceResult<Color> {
        match (m.texture, c.texcoord) {
            (Some(id), Some(t)) => {
                let texture = self.textures.get(id.0)
                    .ok_or(TraceError::MissingTexture { texture: id.0 })?;
                Ok(texture.color_at(t))
            },
            _ => Ok(m.diffuse_color),
        }
    }

    /// Determines how much of a light reaches a collision.
    ///
    /// A shadow ray is cast from the collision towards the light. Every
    /// surface it crosses before reaching the light lets through
    /// `1 - opacity` of the light, so transparent objects cast partial
    /// shadows. 1.0 means fully lit and 0.0 fully shadowed.
    ///
    /// Each occluder is crossed by casting again from the occluder's surface.
    /// A straight line can cross each closed shape at most twice, which
    /// bounds the walk; degenerate scenes that exceed the bound keep whatever
    /// factor was accumulated.
    pub fn shadow_factor(&self, c: &Collision, light: &Light) -> TraceResult<f64> {
        let max_steps = 2 * self.shapes.len() + 2;

        let mut factor = 1.0;
        let mut origin = c.position;
        for _ in 0..max_steps {
            let (to_light, distance) = match light_direction(light, origin) {
                Some(d) => d,
                None => break,
            };

            // Standing on the light itself.
            if to_light.is_zero() {
                break;
            }

            let hit = match self.cast(&Ray3D::new(origin, to_light))? {
                Some(hit) if hit.distance < distance => hit,
                _ => break,
            };

            factor *= 1.0 - self.material_of(&hit)?.opacity;
            if factor <= 0.0 {
                return Ok(0.0);
            }

            origin = hit.position;
        }

        Ok(factor)
    }

    /// Calculates the color for a collision.
    ///
    /// This is ambient light, plus the Blinn-Phong contribution of every light
    /// (attenuated by shadows), plus reflected and refracted light while
    /// `depth` allows. Each partial sum is clamped.
    ///
    /// `medium_index` is the refraction index of the medium the ray travelled
    /// through to reach the collision.
    pub fn shade(&self, c: &Collision, depth: usize, medium_index: f64)
        -> TraceResult<Color> {
        let m = self.material_of(c)?;
        let object_color = self.object_color(m, c)?;

        let mut color = (object_color * m.ambient).clamp();

        for light in self.lights.iter() {
            // Spot lights don't reach points outside their cone.
            let to_light = match light_direction(light, c.position) {
                Some((to_light, _)) => to_light,
                None => continue,
            };

            // Skip lights which are (almost) entirely blocked.
            let shadow = self.shadow_factor(c, light)?;
            if shadow < SHADOW_THRESHOLD {
                continue;
            }

            let local = blinn_phong(m, object_color, light, c, to_light);
            color = (color + local * shadow).clamp();
        }

        if depth < MAX_RECURSION_DEPTH {
            let secondary = self.reflect_refract(c, depth, medium_index)?;
            color = (color + secondary).clamp();
        }

        Ok(color)
    }

    /// Determines the color seen along a ray.
    ///
    /// If nothing is hit, this is the background color.
    pub fn color_at(&self, r: &Ray3D, depth: usize, medium_index: f64)
        -> TraceResult<Color> {
        match self.cast(r)? {
            Some(c) => self.shade(&c, depth, medium_index),
            None => Ok(self.background),
        }
    }
}

#[cfg(test)]
mod fixtures {
    use super::*;
    use crate::tuple::Tuple3D;
    use crate::geometry::Plane3D;

    /// A horizontal plane at height `y`, facing up.
    pub fn horizontal(y: f64, material: MaterialId) -> Shape {
        Shape::plane(Plane3D::new(
            Tuple3D::new(0.0, y, 0.0),
            Tuple3D::new(0.0, 0.0, 1.0),
            Tuple3D::new(1.0, 0.0, 0.0),
        )).with_material(material)
    }

    /// A world with an opaque floor at y = 0 and a light high above it.
    pub fn lit_floor() -> World {
        let mut w = World::empty();
        let floor = w.add_material(Material::default());
        w.shapes.push(horizontal(0.0, floor));
        w.lights.push(Light::point(Tuple3D::new(0.0, 10.0, 0.0),
            Color::white()));
        w
    }

    /// The collision of a ray dropped onto the floor at the origin.
    pub fn floor_hit(w: &World) -> Collision {
        let r = Ray3D::new(Tuple3D::new(0.0, 1.0, 0.0),
            Tuple3D::new(0.0, -1.0, 0.0));
        w.cast(&r).unwrap().expect("Ray should hit the floor.")
    }

    pub fn with_opacity(opacity: f64) -> Material {
        Material { opacity, ..Default::default() }
    }
}

#[test]
fn cast_picks_closest_regardless_of_order() {
    use crate::tuple::Tuple3D;

    let mut w = World::empty();
    let m = w.add_material(Material::default());
    w.shapes.push(Shape::sphere(Tuple3D::new(0.0, 0.0, -10.0), 1.0)
        .with_material(m));
    w.shapes.push(Shape::sphere(Tuple3D::new(0.0, 0.0, -4.0), 1.0)
        .with_material(m));
    w.shapes.push(Shape::sphere(Tuple3D::new(0.0, 0.0, -7.0), 1.0)
        .with_material(m));

    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));
    let c = w.cast(&r).unwrap().unwrap();

    assert_eq!(c.distance, 3.0);
    assert_eq!(c.position, Tuple3D::new(0.0, 0.0, -3.0));
}

#[test]
fn cast_ignores_hits_at_ray_origin() {
    use crate::tuple::Tuple3D;

    let w = fixtures::lit_floor();

    // Starting on the floor and moving away: the floor at distance 0 is
    // ignored.
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 1.0, 0.0));
    assert_eq!(w.cast(&r).unwrap(), None);
}

#[test]
fn cast_without_hits() {
    use crate::tuple::Tuple3D;

    let w = fixtures::lit_floor();
    let r = Ray3D::new(Tuple3D::new(0.0, 1.0, 0.0), Tuple3D::new(1.0, 0.0, 0.0));

    assert_eq!(w.cast(&r).unwrap(), None);
}

#[test]
fn cast_rejects_shape_without_material() {
    use crate::tuple::Tuple3D;

    let mut w = World::empty();
    w.shapes.push(Shape::sphere(Tuple3D::zero(), 1.0));

    let r = Ray3D::new(Tuple3D::new(0.0, 0.0, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
    assert!(matches!(w.cast(&r), Err(TraceError::MissingMaterial { shape: 0 })));

    // Out-of-range ids are just as unusable.
    w.shapes[0] = w.shapes[0].with_material(MaterialId(3));
    assert!(matches!(w.cast(&r), Err(TraceError::MissingMaterial { shape: 0 })));
}

#[test]
fn cast_aborts_on_shape_error() {
    use crate::tuple::Tuple3D;

    let mut w = fixtures::lit_floor();
    let m = MaterialId(0);
    w.shapes.push(Shape::sphere(Tuple3D::new(50.0, 50.0, 50.0), -1.0)
        .with_material(m));

    let r = Ray3D::new(Tuple3D::new(0.0, 1.0, 0.0), Tuple3D::new(0.0, -1.0, 0.0));
    assert!(matches!(w.cast(&r), Err(TraceError::NonPositiveRadius(_))));
}

#[test]
fn no_occluders_fully_lit() {
    let w = fixtures::lit_floor();
    let c = fixtures::floor_hit(&w);

    assert_eq!(w.shadow_factor(&c, &w.lights[0]).unwrap(), 1.0);
}

#[test]
fn opaque_occluder_blocks_light() {
    let mut w = fixtures::lit_floor();
    let m = w.add_material(fixtures::with_opacity(1.0));
    w.shapes.push(fixtures::horizontal(5.0, m));
    let c = fixtures::floor_hit(&w);

    assert_eq!(w.shadow_factor(&c, &w.lights[0]).unwrap(), 0.0);
}

#[test]
fn half_transparent_occluder() {
    let mut w = fixtures::lit_floor();
    let m = w.add_material(fixtures::with_opacity(0.5));
    w.shapes.push(fixtures::horizontal(5.0, m));
    let c = fixtures::floor_hit(&w);

    assert_eq!(w.shadow_factor(&c, &w.lights[0]).unwrap(), 0.5);
}

#[test]
fn stacked_half_transparent_occluders() {
    let mut w = fixtures::lit_floor();
    let m = w.add_material(fixtures::with_opacity(0.5));
    w.shapes.push(fixtures::horizontal(3.0, m));
    w.shapes.push(fixtures::horizontal(6.0, m));
    let c = fixtures::floor_hit(&w);

    assert_eq!(w.shadow_factor(&c, &w.lights[0]).unwrap(), 0.25);
}

#[test]
fn occluder_beyond_light_casts_no_shadow() {
    let mut w = fixtures::lit_floor();
    let m = w.add_material(fixtures::with_opacity(1.0));
    w.shapes.push(fixtures::horizontal(20.0, m));
    let c = fixtures::floor_hit(&w);

    assert_eq!(w.shadow_factor(&c, &w.lights[0]).unwrap(), 1.0);
}

#[test]
fn directional_light_is_blocked_at_any_distance() {
    use crate::tuple::Tuple3D;

    let mut w = fixtures::lit_floor();
    w.lights[0] = Light::directional(Tuple3D::new(0.0, -1.0, 0.0),
        Color::white());
    let m = w.add_material(fixtures::with_opacity(1.0));
    w.shapes.push(fixtures::horizontal(1000.0, m));
    let c = fixtures::floor_hit(&w);

    assert_eq!(w.shadow_factor(&c, &w.lights[0]).unwrap(), 0.0);
}

#[test]
fn shadowed_point_gets_ambient_only() {
    let mut w = fixtures::lit_floor();
    let m = w.add_material(fixtures::with_opacity(1.0));
    w.shapes.push(fixtures::horizontal(5.0, m));
    let c = fixtures::floor_hit(&w);

    // Default material: white, ambient 0.1. The floor is opaque with an
    // index of 1.0, so head-on it reflects nothing.
    assert_eq!(w.shade(&c, 0, 1.0).unwrap(), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lit_point_is_clamped() {
    let w = fixtures::lit_floor();
    let c = fixtures::floor_hit(&w);

    // 0.1 ambient + 0.9 diffuse + 0.9 specular saturates.
    assert_eq!(w.shade(&c, 0, 1.0).unwrap(), Color::white());
}

#[test]
fn plane_winding_does_not_change_lighting() {
    use crate::tuple::Tuple3D;
    use crate::geometry::Plane3D;

    let matte = Material { diffuse: 0.5, specular: 0.0, ..Default::default() };

    let mut up = fixtures::lit_floor();
    up.materials[0] = matte;

    // Same floor, basis swapped so the geometric normal points down, away
    // from both the eye and the light.
    let mut down = up.clone();
    down.shapes[0] = Shape::plane(Plane3D::new(
        Tuple3D::zero(),
        Tuple3D::new(1.0, 0.0, 0.0),
        Tuple3D::new(0.0, 0.0, 1.0),
    )).with_material(MaterialId(0));

    let expected = Color::rgb(0.6, 0.6, 0.6);
    assert_eq!(up.shade(&fixtures::floor_hit(&up), 0, 1.0).unwrap(), expected);
    assert_eq!(down.shade(&fixtures::floor_hit(&down), 0, 1.0).unwrap(),
        expected);
}

#[test]
fn miss_returns_background() {
    use crate::tuple::Tuple3D;

    let mut w = World::empty();
    w.background = Color::rgb(0.2, 0.3, 0.4);
    let r = Ray3D::new(Tuple3D::zero(), Tuple3D::new(0.0, 0.0, -1.0));

    assert_eq!(w.color_at(&r, 0, 1.0).unwrap(), Color::rgb(0.2, 0.3, 0.4));
}

#[test]
fn diffuse_sphere_without_lights_is_pure_ambient() {
    use crate::tuple::Tuple3D;

    let mut w = World::empty();
    let m = w.add_material(Material {
        diffuse_color: Color::rgb(0.8, 0.4, 0.2),
        ambient: 0.5,
        specular: 0.0,
        opacity: 1.0,
        ..Default::default()
    });
    w.shapes.push(Shape::sphere(Tuple3D::zero(), 1.0).with_material(m));

    let ambient = Color::rgb(0.4, 0.2, 0.1);
    for &(x, y) in [(0.0, 0.0), (0.5, 0.5), (-0.7, 0.2), (0.0, -0.99)].iter() {
        let r = Ray3D::new(Tuple3D::new(x, y, 5.0), Tuple3D::new(0.0, 0.0, -1.0));
        assert_eq!(w.color_at(&r, 0, 1.0).unwrap(), ambient);
    }
}

#[test]
fn textured_material_uses_texels() {
    use crate::tuple::Tuple3D;
    use crate::mesh::TexCoord;
    use crate::intersect::CollisionKind;

    let mut w = World::empty();
    let t = w.add_texture(Texture::new(1, 1, vec![Color::rgb(0.0, 1.0, 0.0)]));
    let m = w.add_material(Material {
        texture: Some(t),
        ..Default::default()
    });

    let mut c = Collision {
        kind: CollisionKind::Surface,
        position: Tuple3D::zero(),
        distance: 1.0,
        normal: Tuple3D::new(0.0, 0.0, 1.0),
        incident: Tuple3D::new(0.0, 0.0, 1.0),
        material: Some(m),
        texcoord: Some(TexCoord::new(0.3, 0.3)),
    };

    let material = w.material(m).unwrap();
    assert_eq!(w.object_color(material, &c).unwrap(), Color::rgb(0.0, 1.0, 0.0));

    c.texcoord = None;
    assert_eq!(w.object_color(material, &c).unwrap(), Color::white());
}
