
use crate::materials::{Material, Texture};
use crate::math::*;

/// Offset used when spawning secondary rays, so a feeler or bounce
/// does not immediately re-intersect the surface it started on.
pub const SURFACE_EPSILON: f32 = 1e-3;

/// A record of where a ray hit an object, including a reference to the material
pub struct HitRecord<'a> {
    pub t: f32,
    pub intercept_pt: Vec3,
    pub normal: Vec3,
    pub material: &'a Material,
    pub texture: Option<&'a dyn Texture>,
    pub u: f32,
    pub v: f32,
}

pub trait Hitable {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord<'_>>;
}

pub struct Sphere {
    pub centre: Vec3,
    pub radius: f32,
    pub material: Material,
    pub texture: Option<Box<dyn Texture>>,
}

fn sphere_ray_intersect(ray: &Ray, t_min: f32, t_max: f32, centre: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - centre;
    let a = ray.direction.len_sq();
    let b = 2.0 * dot(oc, ray.direction);
    let c = oc.len_sq() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let d_sqrt = discriminant.sqrt();
    let t1 = (-b - d_sqrt) / (2.0 * a);
    if t1 < t_max && t1 > t_min {
        return Some(t1);
    }

    let t2 = (-b + d_sqrt) / (2.0 * a);
    if t2 < t_max && t2 > t_min {
        return Some(t2);
    }

    None
}

/// Spherical UV of a unit normal, u around the equator, v pole to pole
fn sphere_uv(n: Vec3) -> (f32, f32) {
    let u = 0.5 + n.z.atan2(n.x) / (2.0 * std::f32::consts::PI);
    let v = 0.5 - n.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
    (u, v)
}

impl Hitable for Sphere {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord<'_>> {
        let t = sphere_ray_intersect(ray, t_min, t_max, self.centre, self.radius)?;
        let intercept_pt = ray.at_t(t);
        // Negative radius flips the normal, which hollows the sphere out
        let normal = (intercept_pt - self.centre) * (1.0 / self.radius);
        let (u, v) = sphere_uv(normal);
        Some(HitRecord {
            t,
            intercept_pt,
            normal,
            material: &self.material,
            texture: self.texture.as_deref(),
            u,
            v,
        })
    }
}

pub enum AARectWhich {
    XY,
    XZ,
    YZ,
}

pub struct AARect {
    pub which: AARectWhich,
    pub a_min: f32,
    pub a_max: f32,
    pub b_min: f32,
    pub b_max: f32,
    pub c: f32,
    pub negate_normal: bool,
    pub material: Material,
    pub texture: Option<Box<dyn Texture>>,
}

impl Hitable for AARect {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord<'_>> {
        // Swizzle the inputs to match an XY plane layout
        let origin = ray.origin;
        let direction = ray.direction;
        let (origin, direction) = match self.which {
            AARectWhich::XY => (origin, direction),
            AARectWhich::XZ => (Vec3::new(origin.x, origin.z, origin.y), Vec3::new(direction.x, direction.z, direction.y)),
            AARectWhich::YZ => (Vec3::new(origin.y, origin.z, origin.x), Vec3::new(direction.y, direction.z, direction.x)),
        };

        // Calculate ray/plane intersect and bail if it is outside the required t range
        if direction.z == 0.0 {
            return None;
        }
        let t = (self.c - origin.z) / direction.z;
        if t < t_min || t > t_max {
            return None;
        }

        // Determine where in the plane the intersection is and bail if it is outside the rectangle
        let x = origin.x + t * direction.x;
        let y = origin.y + t * direction.y;
        if x < self.a_min || x > self.a_max || y < self.b_min || y > self.b_max {
            return None;
        }

        let sign = if self.negate_normal { -1.0 } else { 1.0 };
        let normal = match self.which {
            AARectWhich::XY => Vec3::new(0.0, 0.0, sign),
            AARectWhich::XZ => Vec3::new(0.0, sign, 0.0),
            AARectWhich::YZ => Vec3::new(sign, 0.0, 0.0),
        };
        Some(HitRecord {
            t,
            intercept_pt: ray.at_t(t),
            normal,
            material: &self.material,
            texture: self.texture.as_deref(),
            u: (x - self.a_min) / (self.a_max - self.a_min),
            v: (y - self.b_min) / (self.b_max - self.b_min),
        })
    }
}

/// Nearest intersection along the ray, by linear search over the collection
pub fn find_nearest_intersection<'a>(ray: &Ray, objects: &'a [Box<dyn Hitable>]) -> Option<HitRecord<'a>> {
    let mut result = None;
    let mut closest_so_far = f32::MAX;
    for obj in objects {
        if let Some(record) = obj.hit(ray, SURFACE_EPSILON, closest_so_far) {
            closest_so_far = record.t;
            result = Some(record);
        }
    }

    result
}

/// Raise a point slightly off its surface along the normal
pub fn move_point_off_surface(pt: Vec3, normal: Vec3) -> Vec3 {
    pt + normal * SURFACE_EPSILON
}
