use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::colour::Colour;
use crate::geometry::{AARect, AARectWhich, Hitable, Sphere};
use crate::lighting::{AttenuationParams, LightColour};
use crate::lights::{DegenerateGeometry, Light, PositionalLight, SpotLight};
use crate::materials::{CheckerTexture, ConstantTexture, Material, NoiseTexture, Texture};
use crate::math::Vec3;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Degenerate(#[from] DegenerateGeometry),
}

#[derive(Debug, Deserialize, Serialize)]
struct CameraDeclaration {
    eye: Vec3,
    focus: Vec3,
    up: Vec3,
    vertical_fov: f32,
}

#[derive(Debug, Deserialize, Serialize)]
enum AARectWhichDecl {
    XY,
    XZ,
    YZ,
}

#[derive(Debug, Deserialize, Serialize)]
struct SphereDeclaration {
    centre: Vec3,
    radius: f32,
    material: String,
    #[serde(default)]
    texture: Option<String>,
    #[serde(default)]
    alpha: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize)]
struct AARectDeclaration {
    which: AARectWhichDecl,
    a_min: f32,
    a_max: f32,
    b_min: f32,
    b_max: f32,
    c: f32,
    negate_normal: bool,
    material: String,
    #[serde(default)]
    texture: Option<String>,
    #[serde(default)]
    alpha: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "shape")]
enum ShapeDeclaration {
    Sphere(SphereDeclaration),
    AARect(AARectDeclaration),
}

#[derive(Debug, Deserialize, Serialize)]
struct PositionalLightDeclaration {
    pos: Vec3,
    #[serde(default = "default_on")]
    is_on: bool,
    #[serde(default = "default_tied")]
    tied_to_world: bool,
    #[serde(default)]
    attenuation: Option<AttenuationParams>,
    colour: LightColour,
}

#[derive(Debug, Deserialize, Serialize)]
struct SpotLightDeclaration {
    #[serde(flatten)]
    light: PositionalLightDeclaration,
    direction: Vec3,
    fov_degrees: f32,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
enum LightDeclaration {
    Positional(PositionalLightDeclaration),
    Spot(SpotLightDeclaration),
}

fn default_on() -> bool {
    true
}

fn default_tied() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
struct SceneDeclaration {
    camera: CameraDeclaration,
    objects: Vec<ShapeDeclaration>,
    #[serde(default)]
    translucent_objects: Vec<ShapeDeclaration>,
    lights: Vec<LightDeclaration>,
}

/// Definition of a scene to be rendered: camera, objects split into the
/// opaque and translucent groups the tracer composites, and lights.
pub struct Scene {
    pub camera: Camera,
    pub opaque_objects: Vec<Box<dyn Hitable>>,
    pub translucent_objects: Vec<Box<dyn Hitable>>,
    pub lights: Vec<Box<dyn Light>>,
}

fn read_spec_from_file<P: AsRef<Path>>(path: P) -> Result<SceneDeclaration, SceneError> {
    // Open the file in read-only mode with buffer.
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    // Read the JSON contents of the file as an instance of `SceneDeclaration`.
    let scene = serde_json::from_reader(reader)?;

    Ok(scene)
}

pub fn load_scene<P: AsRef<Path>>(nx: usize, ny: usize, scene_path: P) -> Result<Scene, SceneError> {
    let scene_spec = read_spec_from_file(scene_path)?;
    build_scene(nx, ny, &scene_spec)
}

fn named_texture(name: Option<&str>) -> Option<Box<dyn Texture>> {
    match name? {
        "green_checker" => Some(Box::new(CheckerTexture {
            check_size: 8.0,
            odd: Colour::new(0.2, 0.3, 0.1),
            even: Colour::grey(0.9),
        })),
        "red_checker" => Some(Box::new(CheckerTexture {
            check_size: 8.0,
            odd: Colour::new(0.4, 0.05, 0.05),
            even: Colour::grey(0.85),
        })),
        "marble" => Some(Box::new(NoiseTexture::new(12.0, Colour::new(0.6, 0.1, 0.2)))),
        "sandstone" => Some(Box::new(ConstantTexture { colour: Colour::new(0.76, 0.6, 0.42) })),
        _ => None,
    }
}

fn build_shape(obj: &ShapeDeclaration, m: &mut dyn FnMut(&str) -> Material) -> Box<dyn Hitable> {
    match obj {
        ShapeDeclaration::Sphere(sphere) => {
            let mut material = m(sphere.material.as_ref());
            if let Some(alpha) = sphere.alpha {
                material.alpha = alpha;
            }
            Box::new(Sphere {
                centre: sphere.centre,
                radius: sphere.radius,
                material,
                texture: named_texture(sphere.texture.as_deref()),
            })
        }
        ShapeDeclaration::AARect(rect) => {
            let mut material = m(rect.material.as_ref());
            if let Some(alpha) = rect.alpha {
                material.alpha = alpha;
            }
            Box::new(AARect {
                which: match rect.which {
                    AARectWhichDecl::XY => AARectWhich::XY,
                    AARectWhichDecl::XZ => AARectWhich::XZ,
                    AARectWhichDecl::YZ => AARectWhich::YZ,
                },
                a_min: rect.a_min,
                a_max: rect.a_max,
                b_min: rect.b_min,
                b_max: rect.b_max,
                c: rect.c,
                negate_normal: rect.negate_normal,
                material,
                texture: named_texture(rect.texture.as_deref()),
            })
        }
    }
}

fn build_positional(dec: &PositionalLightDeclaration) -> PositionalLight {
    PositionalLight {
        pos: dec.pos,
        is_on: dec.is_on,
        tied_to_world: dec.tied_to_world,
        attenuation_on: dec.attenuation.is_some(),
        at_params: dec.attenuation.unwrap_or_default(),
        colour: dec.colour,
    }
}

fn build_scene(nx: usize, ny: usize, scene_spec: &SceneDeclaration) -> Result<Scene, SceneError> {
    let mut rng = rand::thread_rng();
    let mut rand = || rng.gen::<f32>();

    let mut m = |mat: &str| match mat {
        "gold" => Material::new(
            Colour::new(0.24725, 0.1995, 0.0745),
            Colour::new(0.75164, 0.60648, 0.22648),
            Colour::new(0.628281, 0.555802, 0.366065),
            51.2,
        ),
        "silver" => Material::new(
            Colour::grey(0.19225),
            Colour::grey(0.50754),
            Colour::grey(0.508273),
            51.2,
        ),
        "copper" => Material::new(
            Colour::new(0.19125, 0.0735, 0.0225),
            Colour::new(0.7038, 0.27048, 0.0828),
            Colour::new(0.256777, 0.137622, 0.086014),
            12.8,
        ),
        "chrome" => Material::new(
            Colour::grey(0.25),
            Colour::grey(0.4),
            Colour::grey(0.774597),
            76.8,
        ),
        "red_plastic" => Material::new(
            Colour::BLACK,
            Colour::new(0.5, 0.0, 0.0),
            Colour::new(0.7, 0.6, 0.6),
            32.0,
        ),
        "green_plastic" => Material::new(
            Colour::BLACK,
            Colour::new(0.1, 0.35, 0.1),
            Colour::new(0.45, 0.55, 0.45),
            32.0,
        ),
        "glass" => Material::new(
            Colour::new(0.08, 0.08, 0.1),
            Colour::new(0.2, 0.2, 0.25),
            Colour::grey(0.9),
            96.0,
        )
        .with_alpha(0.4),
        "white_matte" => Material::matte(Colour::WHITE),
        "grey_matte" => Material::matte(Colour::grey(0.5)),
        "rand_matte" => Material::matte(Colour::new(rand() * rand(), rand() * rand(), rand() * rand())),
        _ => Material::matte(Colour::WHITE),
    };

    let mut opaque_objects: Vec<Box<dyn Hitable>> = Vec::new();
    for obj in &scene_spec.objects {
        opaque_objects.push(build_shape(obj, &mut m));
    }

    let mut translucent_objects: Vec<Box<dyn Hitable>> = Vec::new();
    for obj in &scene_spec.translucent_objects {
        translucent_objects.push(build_shape(obj, &mut m));
    }

    let mut lights: Vec<Box<dyn Light>> = Vec::new();
    for light in &scene_spec.lights {
        match light {
            LightDeclaration::Positional(dec) => lights.push(Box::new(build_positional(dec))),
            LightDeclaration::Spot(dec) => {
                let mut spot = SpotLight::new(dec.light.pos, dec.direction, dec.fov_degrees.to_radians())?;
                spot.base = build_positional(&dec.light);
                lights.push(Box::new(spot));
            }
        }
    }

    // Configure the camera, rejecting degenerate viewing geometry up front
    let camera_spec = &scene_spec.camera;
    (camera_spec.focus - camera_spec.eye)
        .try_normalise()
        .ok_or(DegenerateGeometry("camera eye and focus coincide"))?;
    camera_spec
        .up
        .cross(camera_spec.eye - camera_spec.focus)
        .try_normalise()
        .ok_or(DegenerateGeometry("camera up vector is parallel to the view direction"))?;
    let camera = Camera::new(camera_spec.eye, camera_spec.focus, camera_spec.up, camera_spec.vertical_fov, nx, ny);

    Ok(Scene { camera, opaque_objects, translucent_objects, lights })
}

fn demo_declaration() -> SceneDeclaration {
    let mut rng = rand::thread_rng();
    let mut rand = || rng.gen::<f32>();

    let mut objects = vec![
        ShapeDeclaration::AARect(AARectDeclaration {
            which: AARectWhichDecl::XZ,
            a_min: -8.0,
            a_max: 8.0,
            b_min: -8.0,
            b_max: 8.0,
            c: 0.0,
            negate_normal: false,
            material: "grey_matte".to_owned(),
            texture: Some("green_checker".to_owned()),
            alpha: None,
        }),
        ShapeDeclaration::Sphere(SphereDeclaration {
            centre: Vec3::new(-1.4, 0.7, -1.0),
            radius: 0.7,
            material: "gold".to_owned(),
            texture: None,
            alpha: None,
        }),
        ShapeDeclaration::Sphere(SphereDeclaration {
            centre: Vec3::new(0.0, 0.8, -2.2),
            radius: 0.8,
            material: "white_matte".to_owned(),
            texture: Some("marble".to_owned()),
            alpha: None,
        }),
        ShapeDeclaration::Sphere(SphereDeclaration {
            centre: Vec3::new(1.5, 0.6, -1.2),
            radius: 0.6,
            material: "chrome".to_owned(),
            texture: None,
            alpha: None,
        }),
    ];

    // A loose ring of small matte spheres around the main arrangement
    for i in 0..8 {
        let angle = i as f32 / 8.0 * 2.0 * std::f32::consts::PI;
        let orbit = 3.0 + 0.8 * rand();
        let radius = 0.15 + 0.1 * rand();
        objects.push(ShapeDeclaration::Sphere(SphereDeclaration {
            centre: Vec3::new(orbit * angle.cos(), radius, -1.2 + orbit * angle.sin()),
            radius,
            material: "rand_matte".to_owned(),
            texture: None,
            alpha: None,
        }));
    }

    let translucent_objects = vec![ShapeDeclaration::Sphere(SphereDeclaration {
        centre: Vec3::new(0.6, 0.5, 0.4),
        radius: 0.5,
        material: "glass".to_owned(),
        texture: None,
        alpha: Some(0.35),
    })];

    let lights = vec![
        LightDeclaration::Positional(PositionalLightDeclaration {
            pos: Vec3::new(-4.0, 6.0, 3.0),
            is_on: true,
            tied_to_world: true,
            attenuation: Some(AttenuationParams { constant: 1.0, linear: 0.02, quadratic: 0.002 }),
            colour: LightColour::uniform(Colour::grey(0.9)),
        }),
        LightDeclaration::Spot(SpotLightDeclaration {
            light: PositionalLightDeclaration {
                pos: Vec3::new(2.0, 7.0, 1.0),
                is_on: true,
                tied_to_world: true,
                attenuation: None,
                colour: LightColour {
                    ambient: Colour::grey(0.05),
                    diffuse: Colour::new(0.7, 0.7, 0.55),
                    specular: Colour::new(0.7, 0.7, 0.55),
                },
            },
            direction: Vec3::new(-0.25, -1.0, -0.35),
            fov_degrees: 40.0,
        }),
    ];

    SceneDeclaration {
        camera: CameraDeclaration {
            eye: Vec3::new(0.0, 2.2, 4.5),
            focus: Vec3::new(0.0, 0.6, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            vertical_fov: 50.0,
        },
        objects,
        translucent_objects,
        lights,
    }
}

/// Write the built-in demo scene declaration as JSON
pub fn write_demo_scene<P: AsRef<Path>>(path: P) -> Result<(), SceneError> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let ss = serde_json::to_string_pretty(&demo_declaration())?;
    std::fs::write(path, ss)?;
    Ok(())
}

/// The built-in demo scene, without going through a file
pub fn demo_scene(nx: usize, ny: usize) -> Result<Scene, SceneError> {
    build_scene(nx, ny, &demo_declaration())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_declaration_builds() {
        let scene = demo_scene(80, 60).unwrap();

        assert_eq!(scene.camera.nx(), 80);
        assert_eq!(scene.camera.ny(), 60);
        assert!(scene.opaque_objects.len() >= 4);
        assert_eq!(scene.translucent_objects.len(), 1);
        assert_eq!(scene.lights.len(), 2);
    }

    #[test]
    fn demo_declaration_round_trips_through_json() {
        let text = serde_json::to_string(&demo_declaration()).unwrap();
        let parsed: SceneDeclaration = serde_json::from_str(&text).unwrap();

        let scene = build_scene(40, 30, &parsed).unwrap();
        assert!(!scene.opaque_objects.is_empty());
    }

    #[test]
    fn spot_light_declaration_parses_flattened_fields() {
        let text = r#"{
            "camera": {
                "eye": {"x": 0.0, "y": 1.0, "z": 5.0},
                "focus": {"x": 0.0, "y": 0.0, "z": 0.0},
                "up": {"x": 0.0, "y": 1.0, "z": 0.0},
                "vertical_fov": 45.0
            },
            "objects": [
                {"shape": "sphere", "centre": {"x": 0.0, "y": 0.0, "z": 0.0}, "radius": 1.0, "material": "copper"}
            ],
            "lights": [
                {
                    "kind": "spot",
                    "pos": {"x": 0.0, "y": 5.0, "z": 0.0},
                    "colour": {
                        "ambient": {"r": 0.1, "g": 0.1, "b": 0.1},
                        "diffuse": {"r": 1.0, "g": 1.0, "b": 1.0},
                        "specular": {"r": 1.0, "g": 1.0, "b": 1.0}
                    },
                    "direction": {"x": 0.0, "y": -1.0, "z": 0.0},
                    "fov_degrees": 30.0
                }
            ]
        }"#;
        let parsed: SceneDeclaration = serde_json::from_str(text).unwrap();

        let scene = build_scene(40, 30, &parsed).unwrap();
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.translucent_objects.len(), 0);
    }

    #[test]
    fn zero_length_spot_direction_is_rejected() {
        let mut spec = demo_declaration();
        spec.lights.push(LightDeclaration::Spot(SpotLightDeclaration {
            light: PositionalLightDeclaration {
                pos: Vec3::new(0.0, 5.0, 0.0),
                is_on: true,
                tied_to_world: true,
                attenuation: None,
                colour: LightColour::white(),
            },
            direction: Vec3::new(0.0, 0.0, 0.0),
            fov_degrees: 30.0,
        }));

        match build_scene(40, 30, &spec) {
            Err(SceneError::Degenerate(_)) => (),
            other => panic!("expected a degenerate-geometry error, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn degenerate_camera_is_rejected() {
        let mut spec = demo_declaration();
        spec.camera.focus = spec.camera.eye;

        assert!(build_scene(40, 30, &spec).is_err());
    }

    #[test]
    fn write_and_load_round_trip() {
        let path = std::env::temp_dir().join("whitted_demo_scene_test.json");
        write_demo_scene(&path).unwrap();

        let scene = load_scene(40, 30, &path).unwrap();
        assert!(!scene.opaque_objects.is_empty());

        std::fs::remove_file(&path).ok();
    }
}
