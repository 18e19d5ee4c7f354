
use crate::math::{Ray, Vec3};

/// Camera coordinate frame: origin plus right/up/back basis vectors.
/// Lights declared relative to the camera are resolved through this.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub origin: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Frame {
    pub fn to_world_coords(&self, p: Vec3) -> Vec3 {
        self.origin + p.x * self.u + p.y * self.v + p.z * self.w
    }
}

pub struct Camera {
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    origin: Vec3,
    frame: Frame,
    nx: usize,
    ny: usize,
}

impl Camera {
    pub fn new(lookfrom: Vec3, lookat: Vec3, vup: Vec3, vfov: f32, nx: usize, ny: usize) -> Camera {
        let aspect_ratio = nx as f32 / ny as f32;

        // Compute Field of View
        let theta = vfov * std::f32::consts::PI / 180.0;
        let half_height = (0.5 * theta).tan();
        let half_width = aspect_ratio * half_height;

        // Compute basis
        let w = (lookfrom - lookat).normalise();
        let u = vup.cross(w).normalise();
        let v = w.cross(u);

        let lower_left = lookfrom - u * half_width - v * half_height - w;
        let horizontal = u * (2.0 * half_width);
        let vertical = v * (2.0 * half_height);
        let origin = lookfrom;
        let frame = Frame { origin, u, v, w };

        Camera { lower_left, horizontal, vertical, origin, frame, nx, ny }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Ray through clip coordinates (s,t) in [0,1]^2 of the viewport
    pub fn clip_to_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left + self.horizontal * s + self.vertical * t;
        Ray::new(self.origin, (target - self.origin).normalise())
    }

    /// Ray through a (possibly fractional) pixel coordinate
    pub fn generate_ray(&self, px: f32, py: f32) -> Ray {
        self.clip_to_ray(px / self.nx as f32, py / self.ny as f32)
    }
}
