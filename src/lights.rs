
use thiserror::Error;

use crate::camera::Frame;
use crate::colour::Colour;
use crate::geometry::{find_nearest_intersection, move_point_off_surface, Hitable};
use crate::lighting::{ambient_colour, total_colour, AttenuationParams, LightColour};
use crate::materials::Material;
use crate::math::{distance, dot, Ray, Vec3};

#[derive(Debug, Error)]
#[error("degenerate geometry: {0}")]
pub struct DegenerateGeometry(pub &'static str);

/// The contract a light exposes to the tracer
pub trait Light {
    fn illuminate(
        &self,
        intercept_pt: Vec3,
        normal: Vec3,
        material: &Material,
        eye_frame: &Frame,
        in_shadow: bool,
    ) -> Colour;

    /// World coordinates of the light, resolving camera-relative placement
    fn actual_position(&self, eye_frame: &Frame) -> Vec3;
}

pub struct PositionalLight {
    pub pos: Vec3,
    pub is_on: bool,
    pub tied_to_world: bool,
    pub attenuation_on: bool,
    pub at_params: AttenuationParams,
    pub colour: LightColour,
}

impl PositionalLight {
    pub fn new(pos: Vec3) -> PositionalLight {
        PositionalLight {
            pos,
            is_on: true,
            tied_to_world: true,
            attenuation_on: false,
            at_params: AttenuationParams::default(),
            colour: LightColour::white(),
        }
    }
}

impl Light for PositionalLight {
    fn illuminate(
        &self,
        intercept_pt: Vec3,
        normal: Vec3,
        material: &Material,
        eye_frame: &Frame,
        in_shadow: bool,
    ) -> Colour {
        if !self.is_on {
            return Colour::BLACK;
        }

        if in_shadow {
            // Shadows suppress diffuse and specular, never the ambient fill
            ambient_colour(material.ambient, self.colour.ambient)
        } else {
            let v = match (eye_frame.origin - intercept_pt).try_normalise() {
                Some(v) => v,
                None => return Colour::BLACK,
            };
            total_colour(
                material,
                &self.colour,
                v,
                normal,
                self.actual_position(eye_frame),
                intercept_pt,
                self.attenuation_on,
                &self.at_params,
            )
        }
    }

    fn actual_position(&self, eye_frame: &Frame) -> Vec3 {
        if self.tied_to_world {
            self.pos
        } else {
            eye_frame.to_world_coords(self.pos)
        }
    }
}

/// Positional light restricted to a cone around a pointing direction
pub struct SpotLight {
    pub base: PositionalLight,
    spot_dir: Vec3,
    pub fov: f32,
}

impl SpotLight {
    pub fn new(pos: Vec3, dir: Vec3, fov: f32) -> Result<SpotLight, DegenerateGeometry> {
        let spot_dir = dir
            .try_normalise()
            .ok_or(DegenerateGeometry("spot light direction has zero length"))?;
        Ok(SpotLight { base: PositionalLight::new(pos), spot_dir, fov })
    }

    pub fn set_direction(&mut self, dx: f32, dy: f32, dz: f32) -> Result<(), DegenerateGeometry> {
        self.spot_dir = Vec3::new(dx, dy, dz)
            .try_normalise()
            .ok_or(DegenerateGeometry("spot light direction has zero length"))?;
        Ok(())
    }

    pub fn direction(&self) -> Vec3 {
        self.spot_dir
    }
}

impl Light for SpotLight {
    fn illuminate(
        &self,
        intercept_pt: Vec3,
        normal: Vec3,
        material: &Material,
        eye_frame: &Frame,
        in_shadow: bool,
    ) -> Colour {
        // Outside the cone the spot contributes nothing, on or off
        if in_cone(self.actual_position(eye_frame), self.spot_dir, self.fov, intercept_pt) {
            self.base.illuminate(intercept_pt, normal, material, eye_frame, in_shadow)
        } else {
            Colour::BLACK
        }
    }

    fn actual_position(&self, eye_frame: &Frame) -> Vec3 {
        self.base.actual_position(eye_frame)
    }
}

/// Whether an intercept point falls within a spotlight's cone.
/// The cosine comparison is strict: a point exactly on the cone edge is out.
pub fn in_cone(spot_pos: Vec3, spot_dir: Vec3, spot_fov: f32, intercept_pt: Vec3) -> bool {
    let spot_dir = match spot_dir.try_normalise() {
        Some(d) => d,
        None => return false,
    };
    let to_intercept = match (intercept_pt - spot_pos).try_normalise() {
        Some(d) => d,
        None => return false,
    };
    dot(spot_dir, to_intercept) > (spot_fov / 2.0).cos()
}

/// Whether anything opaque sits between the intercept point and the light.
/// A feeler ray starts slightly off the surface to avoid self-intersection.
pub fn is_in_shadow(light_pos: Vec3, intercept_pt: Vec3, normal: Vec3, objects: &[Box<dyn Hitable>]) -> bool {
    let raised_pt = move_point_off_surface(intercept_pt, normal);
    let feeler_dir = match (light_pos - raised_pt).try_normalise() {
        Some(d) => d,
        None => return false,
    };
    let feeler = Ray::new(raised_pt, feeler_dir);

    match find_nearest_intersection(&feeler, objects) {
        Some(hit) => hit.t < distance(raised_pt, light_pos),
        None => false,
    }
}
