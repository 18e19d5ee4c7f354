
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::colour::Colour;

/// Phong surface description. `alpha` below 1.0 marks a translucent surface.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Colour,
    pub diffuse: Colour,
    pub specular: Colour,
    pub shininess: f32,
    pub alpha: f32,
}

impl Material {
    pub fn new(ambient: Colour, diffuse: Colour, specular: Colour, shininess: f32) -> Material {
        Material { ambient, diffuse, specular, shininess, alpha: 1.0 }
    }

    /// Dull surface: no highlight, ambient a fraction of the body colour
    pub fn matte(colour: Colour) -> Material {
        Material {
            ambient: colour * 0.2,
            diffuse: colour,
            specular: Colour::BLACK,
            shininess: 1.0,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Material {
        self.alpha = alpha;
        self
    }
}

pub trait Texture {
    fn sample_uv(&self, u: f32, v: f32) -> Colour;
}

pub struct ConstantTexture {
    pub colour: Colour,
}

impl Texture for ConstantTexture {
    fn sample_uv(&self, _u: f32, _v: f32) -> Colour {
        self.colour
    }
}

pub struct CheckerTexture {
    pub check_size: f32,
    pub odd: Colour,
    pub even: Colour,
}

impl Texture for CheckerTexture {
    fn sample_uv(&self, u: f32, v: f32) -> Colour {
        let checks = (u * self.check_size).floor() + (v * self.check_size).floor();
        if (checks as i32) % 2 == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// Perlin-modulated colour, for marble-ish surfaces
pub struct NoiseTexture {
    scale: f32,
    colour: Colour,
    perlin: Perlin,
}

impl NoiseTexture {
    pub fn new(scale: f32, colour: Colour) -> NoiseTexture {
        NoiseTexture { scale, colour, perlin: Perlin::new() }
    }
}

impl Texture for NoiseTexture {
    fn sample_uv(&self, u: f32, v: f32) -> Colour {
        let n = self.perlin.get([(self.scale * u) as f64, (self.scale * v) as f64, 0.0]) as f32;
        (self.colour * (0.5 * (1.0 + n))).clamped()
    }
}
