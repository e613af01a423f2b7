use crate::color::Color;
use crate::tuple::Tuple3D;
use crate::intersect::Collision;

/// An index into a world's material pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// An index into a world's texture pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightType {
    /// Light radiating in every direction from a position.
    Point { position: Tuple3D },

    /// Light arriving from infinitely far away, travelling along `direction`.
    Directional { direction: Tuple3D },

    /// A point light restricted to a cone around `direction`. The cone's
    /// half-angle is given in degrees.
    Spot { position: Tuple3D, direction: Tuple3D, half_angle: f64 },
}

/// A light source with a color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    pub ty: LightType,
    pub color: Color,
}

impl Light {
    pub fn point(position: Tuple3D, color: Color) -> Light {
        Light { ty: LightType::Point { position }, color }
    }

    pub fn directional(direction: Tuple3D, color: Color) -> Light {
        Light { ty: LightType::Directional { direction }, color }
    }

    pub fn spot(position: Tuple3D, direction: Tuple3D, half_angle: f64,
        color: Color) -> Light {
        Light { ty: LightType::Spot { position, direction, half_angle }, color }
    }
}

/// A material record.
///
/// Materials use attributes from the Blinn-Phong reflection model (ambient,
/// diffuse and specular coefficients plus a specular exponent), along with
/// opacity and an index of refraction for the transmission model.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// The object color used for ambient and diffuse light.
    pub diffuse_color: Color,

    /// The highlight color used for specular light.
    pub specular_color: Color,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub exponent: i32,

    /// A texture replacing `diffuse_color` wherever a texture coordinate is
    /// available.
    pub texture: Option<TextureId>,

    /// 1.0 is fully opaque, 0.0 fully transparent.
    pub opacity: f64,
    pub refraction_index: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            diffuse_color: Color::white(),
            specular_color: Color::white(),

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            exponent: 200,

            texture: None,

            opacity: 1.0,
            refraction_index: 1.0,
        }
    }
}

/// Finds the direction from `point` towards a light, and how far away the
/// light is.
///
/// Directional lights are infinitely far away. Spot lights return `None` for
/// points outside their cone; that simply means the light doesn't reach the
/// point.
pub fn light_direction(light: &Light, point: Tuple3D) -> Option<(Tuple3D, f64)> {
    match light.ty {
        LightType::Point { position } => {
            let v = position - point;
            Some((v.normalize(), v.magnitude()))
        },

        LightType::Directional { direction } => {
            Some((-direction.normalize(), f64::INFINITY))
        },

        LightType::Spot { position, direction, half_angle } => {
            let v = position - point;
            let to_light = v.normalize();

            // Angle between the light's axis and the ray leaving the light
            // towards `point`.
            if (-to_light).angle(&direction).to_degrees() > half_angle {
                return None;
            }

            Some((to_light, v.magnitude()))
        },
    }
}

/// Calculates the Blinn-Phong contribution of a single light at a collision.
///
/// The normal is taken on the side facing the incident ray. The diffuse term
/// uses the angle between that normal and the light; the specular term uses
/// the halfway vector between the light and the eye. The sum is clamped, then filtered by the light's color. Ambient light is not
/// included; `World::shade` adds it once per collision.
///
/// `object_color` is the material's diffuse color, or a texel when the
/// material is textured.
pub fn blinn_phong(m: &Material, object_color: Color, light: &Light,
    c: &Collision, to_light: Tuple3D) -> Color {
    let halfway = (to_light + c.incident).normalize();

    // The side seen by the ray is the front, whichever way the geometric
    // normal points. Lights behind that side contribute nothing.
    let (normal, _) = c.facing_normal();
    let diffuse_factor = normal.dot(&to_light).max(0.0);
    let specular_factor = halfway.dot(&normal).max(0.0).powi(m.exponent);

    let diffuse = object_color * m.diffuse * diffuse_factor;
    let specular = m.specular_color * m.specular * specular_factor;

    (diffuse + specular).clamp() * light.color
}

#[cfg(test)]
fn surface_facing(normal: Tuple3D, incident: Tuple3D) -> Collision {
    use crate::intersect::CollisionKind;

    Collision {
        kind: CollisionKind::Surface,
        position: Tuple3D::zero(),
        distance: 1.0,
        normal,
        incident,
        material: Some(MaterialId(0)),
        texcoord: None,
    }
}

#[cfg(test)]
fn matte() -> Material {
    Material {
        diffuse: 0.5,
        specular: 0.3,
        exponent: 1,
        ..Default::default()
    }
}

#[test]
fn point_light_direction_and_distance() {
    let light = Light::point(Tuple3D::new(0.0, 3.0, 4.0), Color::white());
    let (dir, dist) = light_direction(&light, Tuple3D::zero()).unwrap();

    assert_eq!(dir, Tuple3D::new(0.0, 0.6, 0.8));
    assert_eq!(dist, 5.0);
}

#[test]
fn directional_light_is_infinitely_far() {
    let light = Light::directional(Tuple3D::new(0.0, -2.0, 0.0),
        Color::white());
    let (dir, dist) = light_direction(&light, Tuple3D::new(5.0, 1.0, 2.0))
        .unwrap();

    assert_eq!(dir, Tuple3D::new(0.0, 1.0, 0.0));
    assert!(dist.is_infinite());
}

#[test]
fn spot_light_rejects_points_outside_cone() {
    let light = Light::spot(
        Tuple3D::new(0.0, 10.0, 0.0),
        Tuple3D::new(0.0, -1.0, 0.0),
        30.0,
        Color::white(),
    );

    // Directly below the light.
    let (dir, dist) = light_direction(&light, Tuple3D::zero()).unwrap();
    assert_eq!(dir, Tuple3D::new(0.0, 1.0, 0.0));
    assert_eq!(dist, 10.0);

    // 20 degrees off axis is inside, 45 degrees is outside.
    let inside = Tuple3D::new(10.0 * 20f64.to_radians().tan(), 0.0, 0.0);
    assert!(light_direction(&light, inside).is_some());

    let outside = Tuple3D::new(10.0, 0.0, 0.0);
    assert!(light_direction(&light, outside).is_none());
}

#[test]
fn eye_between_light_and_surface() {
    let n = Tuple3D::new(0.0, 0.0, 1.0);
    let c = surface_facing(n, n);
    let light = Light::point(Tuple3D::new(0.0, 0.0, 10.0), Color::white());

    let res = blinn_phong(&matte(), Color::white(), &light, &c, n);
    assert_eq!(res, Color::rgb(0.8, 0.8, 0.8));
}

#[test]
fn light_offset_45_degrees() {
    let n = Tuple3D::new(0.0, 0.0, 1.0);
    let c = surface_facing(n, n);
    let to_light = Tuple3D::new(0.0, 1.0, 1.0).normalize();
    let light = Light::point(Tuple3D::new(0.0, 10.0, 10.0), Color::white());

    // The halfway vector sits halfway between the eye and the light, at 22.5
    // degrees from the normal.
    let diffuse = 0.5 * std::f64::consts::FRAC_PI_4.cos();
    let specular = 0.3 * (std::f64::consts::PI / 8.0).cos();
    let expected = diffuse + specular;

    let res = blinn_phong(&matte(), Color::white(), &light, &c, to_light);
    assert_eq!(res, Color::rgb(expected, expected, expected));
}

#[test]
fn light_behind_surface_contributes_nothing() {
    let n = Tuple3D::new(0.0, 0.0, 1.0);
    let c = surface_facing(n, n);
    let light = Light::point(Tuple3D::new(0.0, 0.0, -10.0), Color::white());

    let res = blinn_phong(&matte(), Color::white(), &light, &c, -n);
    assert_eq!(res, Color::black());
}

#[test]
fn shading_is_clamped_then_filtered_by_light_color() {
    let n = Tuple3D::new(0.0, 0.0, 1.0);
    let c = surface_facing(n, n);
    let m = Material {
        diffuse: 0.9,
        specular: 0.9,
        ..Default::default()
    };
    let light = Light::point(Tuple3D::new(0.0, 0.0, 10.0),
        Color::rgb(0.5, 1.0, 0.0));

    // 0.9 + 0.9 clamps to 1.0 before the light color is applied.
    let res = blinn_phong(&m, Color::white(), &light, &c, n);
    assert_eq!(res, Color::rgb(0.5, 1.0, 0.0));
}

#[test]
fn object_color_only_affects_diffuse() {
    let n = Tuple3D::new(0.0, 0.0, 1.0);
    let c = surface_facing(n, n);
    let m = Material {
        specular_color: Color::rgb(0.0, 0.0, 1.0),
        ..matte()
    };
    let light = Light::point(Tuple3D::new(0.0, 0.0, 10.0), Color::white());

    let res = blinn_phong(&m, Color::rgb(1.0, 0.0, 0.0), &light, &c, n);
    assert_eq!(res, Color::rgb(0.5, 0.0, 0.3));
}

#[test]
fn back_side_is_lit_like_front_side() {
    let n = Tuple3D::new(0.0, 0.0, 1.0);
    let front = surface_facing(n, n);
    let back = surface_facing(-n, n);
    let light = Light::point(Tuple3D::new(0.0, 0.0, 10.0), Color::white());

    assert_eq!(blinn_phong(&matte(), Color::white(), &light, &back, n),
        blinn_phong(&matte(), Color::white(), &light, &front, n));
}
