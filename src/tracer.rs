
use log::info;
use rand::Rng;

use crate::colour::Colour;
use crate::geometry::{find_nearest_intersection, move_point_off_surface};
use crate::lights::is_in_shadow;
use crate::math::{map, reflect, Ray};
use crate::ppm::FrameBuffer;
use crate::scene::Scene;

/// Weight applied to the colour carried back by a mirror bounce
const REFLECTION_WEIGHT: f32 = 0.3;

pub struct RayTracer {
    pub default_colour: Colour,
}

impl RayTracer {
    pub fn new(default_colour: Colour) -> RayTracer {
        RayTracer { default_colour }
    }

    /// Trace an individual ray against the opaque scene contents.
    /// While `recursion_level` exceeds 1, one mirror bounce is followed and
    /// its colour folded in; a miss is simply black (the background is
    /// composited by the caller, not here).
    pub fn trace_ray(&self, ray: &Ray, scene: &Scene, recursion_level: u32) -> Colour {
        let hit = match find_nearest_intersection(ray, &scene.opaque_objects) {
            Some(hit) => hit,
            None => return Colour::BLACK,
        };

        let eye_frame = scene.camera.frame();
        let mut opaque_colour = Colour::BLACK;
        for light in &scene.lights {
            let shadowed = is_in_shadow(
                light.actual_position(eye_frame),
                hit.intercept_pt,
                hit.normal,
                &scene.opaque_objects,
            );
            opaque_colour += light.illuminate(hit.intercept_pt, hit.normal, hit.material, eye_frame, shadowed);
        }

        if let Some(texture) = hit.texture {
            let texel = texture.sample_uv(hit.u, hit.v);
            opaque_colour = 0.5 * texel + 0.5 * opaque_colour;
        }

        if recursion_level > 1 {
            let origin = move_point_off_surface(hit.intercept_pt, hit.normal);
            let direction = reflect(ray.direction, hit.normal);
            let bounced = Ray::new(origin, direction);
            opaque_colour += REFLECTION_WEIGHT * self.trace_ray(&bounced, scene, recursion_level - 1);
        }

        opaque_colour
    }

    /// Raytrace the scene into a viewport rectangle of the framebuffer.
    /// Each pixel is the box-filter average of an n*n grid of jittered
    /// sub-samples; the viewport is linearly remapped onto the camera's
    /// full resolution so a sub-rectangle can render a whole view.
    pub fn raytrace_scene(
        &self,
        framebuffer: &mut FrameBuffer,
        depth: u32,
        scene: &Scene,
        n: usize,
        view_start: (usize, usize),
        view_end: (usize, usize),
    ) {
        let camera = &scene.camera;
        let eye_frame = camera.frame();
        let mut rng = rand::thread_rng();
        info!(
            "raytracing {}x{} pixels at {} sub-samples each, depth {}",
            view_end.0 - view_start.0,
            view_end.1 - view_start.1,
            n * n,
            depth
        );

        for y in view_start.1..view_end.1 {
            for x in view_start.0..view_end.0 {
                let new_x = map(x as f32, view_start.0 as f32, view_end.0 as f32, 0.0, camera.nx() as f32);
                let new_y = map(y as f32, view_start.1 as f32, view_end.1 as f32, 0.0, camera.ny() as f32);

                let mut sum = Colour::BLACK;
                for r in 0..n {
                    for c in 0..n {
                        // Stratified jitter within the pixel footprint
                        let px = new_x + (r as f32 + rng.gen::<f32>()) / n as f32;
                        let py = new_y + (c as f32 + rng.gen::<f32>()) / n as f32;
                        let ray = camera.generate_ray(px, py);

                        let opaque_t = find_nearest_intersection(&ray, &scene.opaque_objects).map(|hit| hit.t);
                        let trans = find_nearest_intersection(&ray, &scene.translucent_objects).map(|hit| {
                            let mut trans_colour = Colour::BLACK;
                            for light in &scene.lights {
                                // A translucent surface takes its own direct light
                                // with the shadow flag forced on
                                trans_colour += light.illuminate(
                                    hit.intercept_pt,
                                    hit.normal,
                                    hit.material,
                                    eye_frame,
                                    true,
                                );
                            }
                            (hit.t, hit.material.alpha, trans_colour)
                        });

                        let opaque_colour = self.trace_ray(&ray, scene, depth);
                        let sample = composite(opaque_t, opaque_colour, trans, self.default_colour);
                        sum += sample.clamped();
                    }
                }

                framebuffer.set_colour(x, y, sum * (1.0 / (n * n) as f32));
            }
        }
    }
}

/// Blend one sub-sample's translucent hit over its opaque colour.
/// `trans` carries (t, alpha, colour) for the nearest translucent hit.
fn composite(
    opaque_t: Option<f32>,
    opaque_colour: Colour,
    trans: Option<(f32, f32, Colour)>,
    background: Colour,
) -> Colour {
    match (opaque_t, trans) {
        (Some(opaque_t), Some((trans_t, alpha, trans_colour))) => {
            if opaque_t < trans_t {
                opaque_colour
            } else {
                (1.0 - alpha) * opaque_colour + alpha * trans_colour
            }
        }
        (Some(_), None) => opaque_colour,
        (None, Some((_, alpha, trans_colour))) => (1.0 - alpha) * background + alpha * trans_colour,
        (None, None) => background,
    }
}
