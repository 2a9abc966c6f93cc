//! Instancing wrappers that move an object without copying its geometry.
//!
//! Each wrapper maps the incoming ray into the object's local frame, lets the
//! wrapped object answer, then maps the hit back into world space.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Offset an object by a fixed vector.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box() + offset;
        Self { object, offset, bbox }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Move the ray backwards by the offset
        let offset_ray = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        // Move the intersection point forwards by the offset
        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotate an object about the Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate by `angle` degrees (counter-clockwise looking down -Y).
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let (sin_theta, cos_theta) = angle.to_radians().sin_cos();
        let inner = object.bounding_box();

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for corner in inner.corners() {
            let rotated = Self::to_world(sin_theta, cos_theta, corner);
            min = min.min(rotated);
            max = max.max(rotated);
        }

        let bbox = if inner == Aabb::EMPTY {
            Aabb::EMPTY
        } else {
            Aabb::from_points(min, max)
        };

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox,
        }
    }

    #[inline]
    fn to_world(sin_theta: f32, cos_theta: f32, v: Vec3) -> Vec3 {
        Vec3::new(
            cos_theta * v.x + sin_theta * v.z,
            v.y,
            -sin_theta * v.x + cos_theta * v.z,
        )
    }

    #[inline]
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let rotated_ray = Ray::new(self.to_object(ray.origin), self.to_object(ray.direction), ray.time);

        if !self.object.hit(&rotated_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p = Self::to_world(self.sin_theta, self.cos_theta, rec.p);
        rec.normal = Self::to_world(self.sin_theta, self.cos_theta, rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::quad::make_box;
    use crate::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    fn cast(object: &dyn Hittable, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        object
            .hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng)
            .then(|| (rec.t, rec.p, rec.normal))
    }

    #[test]
    fn test_translate_moves_hit() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(5.0, 0.0, 0.0));

        let ray = Ray::new(Vec3::new(5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let (t, p, normal) = cast(&moved, &ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!((p - Vec3::new(5.0, 0.0, 1.0)).length() < 1e-5);
        assert!((normal - Vec3::Z).length() < 1e-5);

        let bbox = moved.bounding_box();
        assert_eq!(bbox.x, Interval::new(4.0, 6.0));

        // The original position is now empty
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(cast(&moved, &ray).is_none());
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // Long thin box along X
        let bar: Arc<dyn Hittable> = Arc::new(make_box(
            Vec3::new(-2.0, -0.5, -0.5),
            Vec3::new(2.0, 0.5, 0.5),
            gray(),
        ));
        let rotated = RotateY::new(bar, 90.0);

        // After a quarter turn the bar lies along Z
        let bbox = rotated.bounding_box();
        assert!((bbox.z.min + 2.0).abs() < 1e-4);
        assert!((bbox.z.max - 2.0).abs() < 1e-4);
        assert!((bbox.x.max - 0.5).abs() < 1e-4);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let (t, p, normal) = cast(&rotated, &ray).unwrap();
        assert!((t - 8.0).abs() < 1e-4);
        assert!((p - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-4);
        assert!((normal - Vec3::Z).length() < 1e-4);

        // Where the bar used to be there is nothing
        let ray = Ray::new(Vec3::new(1.5, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        assert!(cast(&rotated, &ray).is_none());
    }

    #[test]
    fn test_rotate_y_zero_is_identity() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5, gray()));
        let rotated = RotateY::new(sphere.clone(), 0.0);

        let ray = Ray::new(Vec3::new(1.0, 2.0, 10.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let (t0, p0, _) = cast(sphere.as_ref(), &ray).unwrap();
        let (t1, p1, _) = cast(&rotated, &ray).unwrap();
        assert!((t0 - t1).abs() < 1e-5);
        assert!((p0 - p1).length() < 1e-5);
    }
}
