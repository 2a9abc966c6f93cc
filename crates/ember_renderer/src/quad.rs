//! Planar quad primitive and the box built from six quads.
//!
//! The plane math here is shared with the triangle primitives; only the
//! acceptance test on the planar coordinates differs.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Rays with `|normal . direction|` below this are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A plane spanned by a corner `q` and two edge vectors.
///
/// Solves ray/plane intersection and expresses the hit point in the
/// `(u, v)` edge basis as `(alpha, beta)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlanarFrame {
    pub q: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    w: Vec3,
    pub normal: Vec3,
    d: f32,
}

/// Where a ray crosses a plane.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlanarHit {
    pub t: f32,
    pub p: Vec3,
    pub alpha: f32,
    pub beta: f32,
}

impl PlanarFrame {
    pub fn new(q: Vec3, u: Vec3, v: Vec3) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let nn = n.dot(n);
        let w = if nn > 0.0 { n / nn } else { Vec3::ZERO };

        Self {
            q,
            u,
            v,
            w,
            normal,
            d: normal.dot(q),
        }
    }

    /// Intersect the plane, returning the crossing if it lies in `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<PlanarHit> {
        let denom = self.normal.dot(ray.direction);

        // No hit if the ray is parallel to the plane
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        Some(PlanarHit { t, p, alpha, beta })
    }

    /// Fill the parts of a hit record shared by all planar primitives.
    pub fn fill_record<'a>(
        &self,
        ray: &Ray,
        hit: &PlanarHit,
        u: f32,
        v: f32,
        material: &'a dyn Material,
        rec: &mut HitRecord<'a>,
    ) {
        rec.t = hit.t;
        rec.p = hit.p;
        rec.u = u;
        rec.v = v;
        rec.material = material;
        rec.set_face_normal(ray, self.normal);
    }
}

/// A parallelogram with corner `q` and edges `u`, `v`.
pub struct Quad {
    frame: PlanarFrame,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        // Both diagonals, so a degenerate edge still yields a full box
        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            frame: PlanarFrame::new(q, u, v),
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }

    /// Unit plane normal (`u x v`, normalized).
    pub fn normal(&self) -> Vec3 {
        self.frame.normal
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let Some(hit) = self.frame.intersect(ray, ray_t) else {
            return false;
        };

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(hit.alpha) || !unit.contains(hit.beta) {
            return false;
        }

        self.frame
            .fill_record(ray, &hit, hit.alpha, hit.beta, self.material.as_ref(), rec);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Build the closed box spanned by two opposite corners, as six quads with
/// outward facing normals.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Arc::new(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone())));
    // right
    sides.add(Arc::new(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone())));
    // back
    sides.add(Arc::new(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone())));
    // left
    sides.add(Arc::new(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone())));
    // top
    sides.add(Arc::new(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone())));
    // bottom
    sides.add(Arc::new(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material)));

    sides
}
