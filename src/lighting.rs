
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::materials::Material;
use crate::math::{distance, dot, Vec3};

/// The three colour contributions a light emits
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct LightColour {
    pub ambient: Colour,
    pub diffuse: Colour,
    pub specular: Colour,
}

impl LightColour {
    pub fn uniform(colour: Colour) -> LightColour {
        LightColour { ambient: colour, diffuse: colour, specular: colour }
    }

    pub fn white() -> LightColour {
        LightColour::uniform(Colour::WHITE)
    }
}

/// Distance falloff: factor(d) = 1 / (constant + linear*d + quadratic*d^2)
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct AttenuationParams {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for AttenuationParams {
    fn default() -> AttenuationParams {
        AttenuationParams { constant: 1.0, linear: 0.0, quadratic: 0.0 }
    }
}

impl AttenuationParams {
    pub fn factor(&self, distance: f32) -> f32 {
        let denominator = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denominator <= f32::EPSILON {
            0.0
        } else {
            1.0 / denominator
        }
    }
}

/// Ambient colour produced by a single light at a single point
pub fn ambient_colour(mat: Colour, light_ambient: Colour) -> Colour {
    (mat * light_ambient).clamped()
}

/// Diffuse colour produced by a single light at a single point.
/// `l` points from the surface toward the light; a light behind the
/// surface contributes nothing.
pub fn diffuse_colour(mat: Colour, light_diffuse: Colour, l: Vec3, n: Vec3) -> Colour {
    let dp = dot(l, n).max(0.0);
    (mat * light_diffuse * dp).clamped()
}

/// Specular colour produced by a single light at a single point.
/// `r` is the reflection of the light vector, `v` points toward the viewer.
pub fn specular_colour(mat: Colour, light_specular: Colour, shininess: f32, r: Vec3, v: Vec3) -> Colour {
    let dp = dot(v, r).clamp(0.0, 1.0);
    (mat * light_specular * dp.powf(shininess)).clamped()
}

/// Total colour produced by a single light at a single point.
/// Attenuation scales the diffuse and specular terms only: ambient models
/// uniform scene fill and does not fall off with distance.
pub fn total_colour(
    mat: &Material,
    light_colour: &LightColour,
    v: Vec3,
    n: Vec3,
    light_pos: Vec3,
    intercept_pt: Vec3,
    attenuation_on: bool,
    at_params: &AttenuationParams,
) -> Colour {
    let light_vec = match (light_pos - intercept_pt).try_normalise() {
        Some(l) => l,
        // Light coincident with the surface point: degenerate, no contribution
        None => return Colour::BLACK,
    };
    let light_distance = distance(light_pos, intercept_pt);
    let at = at_params.factor(light_distance);
    let reflection_vec = 2.0 * dot(light_vec, n) * n - light_vec;

    let amb = ambient_colour(mat.ambient, light_colour.ambient);
    let diff = diffuse_colour(mat.diffuse, light_colour.diffuse, light_vec, n);
    let spec = specular_colour(mat.specular, light_colour.specular, mat.shininess, reflection_vec, v);

    let total = if attenuation_on {
        amb + at * (diff + spec)
    } else {
        amb + diff + spec
    };

    total.clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::ApproxEqUlps;

    fn assert_colour_eq(actual: Colour, expected: Colour) {
        assert!(
            actual.r.approx_eq_ulps(&expected.r, 4)
                && actual.g.approx_eq_ulps(&expected.g, 4)
                && actual.b.approx_eq_ulps(&expected.b, 4),
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn shiny_red() -> Material {
        Material::new(
            Colour::new(0.1, 0.1, 0.1),
            Colour::new(0.8, 0.2, 0.2),
            Colour::new(0.5, 0.5, 0.5),
            32.0,
        )
    }

    #[test]
    fn ambient_is_clamped_product() {
        let mat = Colour::new(0.1, 0.1, 0.1);
        assert_eq!(ambient_colour(mat, Colour::WHITE), Colour::new(0.1, 0.1, 0.1));

        // Saturated inputs clamp rather than overflow
        let hot = Colour::new(2.0, 2.0, 2.0);
        assert_eq!(ambient_colour(hot, hot), Colour::WHITE);
    }

    #[test]
    fn diffuse_zero_when_light_behind_surface() {
        let mat = Colour::new(0.8, 0.2, 0.2);
        let n = Vec3::new(0.0, 1.0, 0.0);

        // Grazing and below-horizon light directions contribute nothing
        assert_eq!(diffuse_colour(mat, Colour::WHITE, Vec3::new(1.0, 0.0, 0.0), n), Colour::BLACK);
        assert_eq!(diffuse_colour(mat, Colour::WHITE, Vec3::new(0.0, -1.0, 0.0), n), Colour::BLACK);

        // Head-on light gives the full product
        assert_eq!(diffuse_colour(mat, Colour::WHITE, n, n), mat);
    }

    #[test]
    fn specular_monotone_in_alignment() {
        let mat = Colour::new(0.5, 0.5, 0.5);
        let r = Vec3::new(0.0, 1.0, 0.0);

        let mut previous = -1.0;
        for i in 0..=10 {
            // View vectors swinging into alignment with the reflection vector
            let cos_angle = i as f32 / 10.0;
            let sin_angle = (1.0 - cos_angle * cos_angle).sqrt();
            let v = Vec3::new(sin_angle, cos_angle, 0.0);
            let spec = specular_colour(mat, Colour::WHITE, 8.0, r, v);
            assert!(spec.r >= previous);
            previous = spec.r;
        }
    }

    #[test]
    fn specular_shininess_zero_is_constant() {
        let mat = Colour::new(0.5, 0.5, 0.5);
        let r = Vec3::new(0.0, 1.0, 0.0);
        let v = Vec3::new(0.6, 0.8, 0.0);

        assert_eq!(specular_colour(mat, Colour::WHITE, 0.0, r, v), mat);
    }

    #[test]
    fn attenuation_policy_spares_ambient() {
        let mat = shiny_red();
        let light = LightColour::white();
        let n = Vec3::new(0.0, 0.0, 1.0);
        let v = Vec3::new(0.0, 0.0, 1.0);
        let intercept = Vec3::new(0.0, 0.0, 0.0);
        // Light 1 unit off the surface, straight along the normal
        let light_pos = Vec3::new(0.0, 0.0, 1.0);
        // constant=2 makes factor(d) = 0.5 for any distance
        let at = AttenuationParams { constant: 2.0, linear: 0.0, quadratic: 0.0 };

        let amb = ambient_colour(mat.ambient, light.ambient);
        let diff = diffuse_colour(mat.diffuse, light.diffuse, n, n);
        let spec = specular_colour(mat.specular, light.specular, mat.shininess, n, v);

        let with_at = total_colour(&mat, &light, v, n, light_pos, intercept, true, &at);
        assert_colour_eq(with_at, (amb + 0.5 * (diff + spec)).clamped());

        let without_at = total_colour(&mat, &light, v, n, light_pos, intercept, false, &at);
        assert_colour_eq(without_at, (amb + diff + spec).clamped());
    }

    #[test]
    fn attenuation_factor_guards_zero_denominator() {
        let degenerate = AttenuationParams { constant: 0.0, linear: 0.0, quadratic: 0.0 };
        assert_eq!(degenerate.factor(3.0), 0.0);

        let inverse_square = AttenuationParams { constant: 0.0, linear: 0.0, quadratic: 1.0 };
        assert_eq!(inverse_square.factor(2.0), 0.25);
    }

    #[test]
    fn light_on_surface_point_is_black() {
        let mat = shiny_red();
        let light = LightColour::white();
        let pt = Vec3::new(1.0, 2.0, 3.0);

        let result = total_colour(
            &mat,
            &light,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            pt,
            pt,
            false,
            &AttenuationParams::default(),
        );
        assert_eq!(result, Colour::BLACK);
    }
}
