//! Homogeneous participating medium (smoke, fog) bounded by another object.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    material::{Color, Isotropic, Material},
    sampling::gen_open_f32,
    texture::Texture,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Nudge past the entry point before searching for the exit.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of constant density filling a closed boundary.
///
/// Rays travelling through the boundary scatter at an exponentially
/// distributed free-flight distance; the scattering event uses an isotropic
/// phase function.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    /// A medium whose density is not positive never scatters.
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: neg_inv_density(density),
            phase_function: Arc::new(Isotropic::new(texture)),
        }
    }

    pub fn from_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: neg_inv_density(density),
            phase_function: Arc::new(Isotropic::from_color(albedo)),
        }
    }
}

/// `-1 / density`, or negative infinity (an infinite mean free path) when
/// the density is zero, negative or NaN.
fn neg_inv_density(density: f32) -> f32 {
    if density > 0.0 {
        -1.0 / density
    } else {
        log::warn!("Constant medium density {density} is not positive; it will never scatter");
        f32::NEG_INFINITY
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Entry and exit along the whole line, not just the caller's interval
        let mut entry = HitRecord::default();
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }

        let mut exit = HitRecord::default();
        let beyond_entry = Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY);
        if !self.boundary.hit(ray, beyond_entry, &mut exit, rng) {
            return false;
        }

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);

        if t_enter >= t_exit {
            return false;
        }

        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        // ln(xi) is finite and strictly negative, so the distance is positive
        let hit_distance = self.neg_inv_density * gen_open_f32(rng).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);

        // Arbitrary for a volume
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
