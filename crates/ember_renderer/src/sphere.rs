//! Sphere primitive for ray tracing, optionally moving for motion blur.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A sphere primitive.
///
/// The center is stored as a ray so a moving sphere is evaluated at the
/// incoming ray's time; a static sphere has zero velocity.
pub struct Sphere {
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center: Ray::new(center, Vec3::ZERO, 0.0),
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// Create a sphere moving linearly from `center0` at time 0 to `center1`
    /// at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: Ray::new(center0, center1 - center0, 0.0),
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from -Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let current_center = self.center.at(ray.time);
        let oc = current_center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - current_center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    fn hit(sphere: &Sphere, ray: &Ray) -> Option<(f32, Vec3, bool, f32, f32)> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        sphere
            .hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng)
            .then(|| (rec.t, rec.normal, rec.front_face, rec.u, rec.v))
    }

    #[test]
    fn test_sphere_hit_head_on() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let (t, normal, front_face, _, _) = hit(&sphere, &ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
        assert!((normal - Vec3::Z).length() < 1e-5);
        assert!(front_face);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        // Near root is behind the origin, so the far root is used
        let (t, normal, front_face, _, _) = hit(&sphere, &ray).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
        assert!(!front_face);
        assert!((normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(hit(&sphere, &ray).is_none());

        // Sphere entirely behind the ray
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(hit(&sphere, &ray).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        // +X maps to u = 0.5, equator to v = 0.5
        let (u, v) = Sphere::get_sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        // -Y is the bottom pole, +Y the top
        let (_, v) = Sphere::get_sphere_uv(-Vec3::Y);
        assert!(v.abs() < 1e-5);
        let (_, v) = Sphere::get_sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);

        // +Z maps to u = 0.25
        let (u, _) = Sphere::get_sphere_uv(Vec3::Z);
        assert!((u - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5, gray());

        // At time 0 the sphere sits at the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(hit(&sphere, &ray).is_some());

        // At time 1 it has moved out of the way
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(hit(&sphere, &ray).is_none());

        // Halfway, a ray at y = 1 hits it
        let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.5);
        let (t, _, _, _, _) = hit(&sphere, &ray).unwrap();
        assert!((t - 4.5).abs() < 1e-4);

        // Bounding box covers the whole path
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.y.min, -0.5);
        assert_eq!(bbox.y.max, 2.5);
    }
}
