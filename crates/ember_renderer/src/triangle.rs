//! Triangle primitives.
//!
//! Same plane solve as [`Quad`](crate::Quad); a hit is accepted when the
//! planar coordinates satisfy `alpha >= 0`, `beta >= 0` and
//! `alpha + beta <= 1`.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    quad::{PlanarFrame, PlanarHit},
    Material,
};
use ember_core::Mesh;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

#[inline]
fn inside_triangle(hit: &PlanarHit) -> bool {
    hit.alpha >= 0.0 && hit.beta >= 0.0 && hit.alpha + hit.beta <= 1.0
}

fn triangle_bbox(a: Vec3, b: Vec3, c: Vec3) -> Aabb {
    Aabb::from_points(a.min(b).min(c), a.max(b).max(c))
}

/// A triangle with corner `q` and edges `u`, `v`.
pub struct Triangle {
    frame: PlanarFrame,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            frame: PlanarFrame::new(q, u, v),
            material,
            bbox: triangle_bbox(q, q + u, q + v),
        }
    }

    /// Create a triangle from its three vertices (counter-clockwise for a
    /// normal facing the viewer).
    pub fn from_vertices(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(v0, v1 - v0, v2 - v0, material)
    }
}

impl Hittable for Triangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        match self.frame.intersect(ray, ray_t) {
            Some(hit) if inside_triangle(&hit) => {
                self.frame
                    .fill_record(ray, &hit, hit.alpha, hit.beta, self.material.as_ref(), rec);
                true
            }
            _ => false,
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A triangle taken from a mesh, carrying per-vertex texture coordinates.
pub struct MeshTriangle {
    frame: PlanarFrame,
    uvs: [[f32; 2]; 3],
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl MeshTriangle {
    pub fn new(positions: [Vec3; 3], uvs: [[f32; 2]; 3], material: Arc<dyn Material>) -> Self {
        let [v0, v1, v2] = positions;
        Self {
            frame: PlanarFrame::new(v0, v1 - v0, v2 - v0),
            uvs,
            material,
            bbox: triangle_bbox(v0, v1, v2),
        }
    }

    /// Interpolate the vertex UVs at planar coordinates `(alpha, beta)`.
    fn interpolate_uv(&self, alpha: f32, beta: f32) -> (f32, f32) {
        let gamma = 1.0 - alpha - beta;
        let [uv0, uv1, uv2] = self.uvs;
        (
            uv0[0] * gamma + uv1[0] * alpha + uv2[0] * beta,
            uv0[1] * gamma + uv1[1] * alpha + uv2[1] * beta,
        )
    }
}

impl Hittable for MeshTriangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        match self.frame.intersect(ray, ray_t) {
            Some(hit) if inside_triangle(&hit) => {
                let (u, v) = self.interpolate_uv(hit.alpha, hit.beta);
                self.frame
                    .fill_record(ray, &hit, u, v, self.material.as_ref(), rec);
                true
            }
            _ => false,
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Turn every triangle of a mesh into a [`MeshTriangle`] sharing one material.
pub fn triangles_from_mesh(mesh: &Mesh, material: Arc<dyn Material>) -> ember_core::Result<HittableList> {
    mesh.validate()?;

    let mut list = HittableList::new();
    for n in 0..mesh.triangle_count() {
        let (positions, uvs) = mesh.triangle(n);
        list.add(Arc::new(MeshTriangle::new(positions, uvs, material.clone())));
    }

    log::debug!(
        "Built {} triangles from mesh ({} vertices)",
        list.len(),
        mesh.positions.len()
    );

    Ok(list)
}
