//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The tree is stored as an arena: objects live in one vector and branch
//! nodes in another, with children referring to either by index. A branch
//! over a single object points both children at the same leaf.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable, HittableList};
use ember_math::{Aabb, Axis, Interval, Ray};
use rand::RngCore;

/// Child slot of a branch node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BvhChild {
    /// Index into the branch arena
    Node(usize),
    /// Index into the object arena
    Leaf(usize),
}

#[derive(Debug, Clone, Copy)]
struct BvhBranch {
    bbox: Aabb,
    left: BvhChild,
    right: BvhChild,
}

/// A BVH over shared scene objects. The root branch is at index 0.
pub struct BvhNode {
    objects: Vec<Arc<dyn Hittable>>,
    nodes: Vec<BvhBranch>,
}

impl BvhNode {
    /// Build a BVH over `objects`.
    ///
    /// Each span is split on the longest axis of its bounding box after
    /// sorting by the objects' box minimum on that axis. An empty input
    /// yields a BVH that never reports a hit.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let mut nodes = Vec::with_capacity(objects.len());

        if !objects.is_empty() {
            let len = objects.len();
            Self::build(&mut objects, 0, len, &mut nodes);
        }

        log::debug!(
            "Built BVH: {} branch nodes over {} objects",
            nodes.len(),
            objects.len()
        );

        Self { objects, nodes }
    }

    /// Build a BVH from the objects of a list.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Number of objects referenced by the tree.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of branch nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Recursive construction over `objects[start..end]`, returning the index
    /// of the branch node created for the span.
    fn build(
        objects: &mut [Arc<dyn Hittable>],
        start: usize,
        end: usize,
        nodes: &mut Vec<BvhBranch>,
    ) -> usize {
        let span = &mut objects[start..end];

        let bbox = span.iter().fold(Aabb::EMPTY, |acc, obj| {
            Aabb::surrounding(&acc, &obj.bounding_box())
        });

        // Reserve the slot so parents precede their children
        let index = nodes.len();
        nodes.push(BvhBranch {
            bbox,
            left: BvhChild::Leaf(start),
            right: BvhChild::Leaf(start),
        });

        let (left, right) = match span.len() {
            1 => (BvhChild::Leaf(start), BvhChild::Leaf(start)),
            2 => (BvhChild::Leaf(start), BvhChild::Leaf(start + 1)),
            n => {
                let axis = bbox.longest_axis();
                span.sort_unstable_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let mid = start + n / 2;
                let left = Self::build(objects, start, mid, nodes);
                let right = Self::build(objects, mid, end, nodes);
                (BvhChild::Node(left), BvhChild::Node(right))
            }
        };

        nodes[index].left = left;
        nodes[index].right = right;
        index
    }

    fn hit_child<'a>(
        &'a self,
        child: BvhChild,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match child {
            BvhChild::Node(index) => self.hit_node(index, ray, ray_t, rec, rng),
            BvhChild::Leaf(index) => self.objects[index].hit(ray, ray_t, rec, rng),
        }
    }

    fn hit_node<'a>(
        &'a self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let node = &self.nodes[index];
        if !node.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.hit_child(node.left, ray, ray_t, rec, rng);

        // A single-object span already answered through the left child
        if node.right == node.left {
            return hit_left;
        }

        // Only check right up to closest hit
        let right_t = if hit_left { ray_t.with_max(rec.t) } else { ray_t };
        let hit_right = self.hit_child(node.right, ray, right_t, rec, rng);

        hit_left || hit_right
    }
}

fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: Axis) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.hit_node(0, ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |root| root.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Material, Sphere};
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(center, radius, gray()))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert_eq!(bvh.node_count(), 0);
        assert_eq!(bvh.bounding_box(), Aabb::EMPTY);

        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!bvh.hit(&ray, Interval::UNIVERSE, &mut rec, &mut rng));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)]);

        // One branch whose children alias the same object
        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.nodes[0].left, BvhChild::Leaf(0));
        assert_eq!(bvh.nodes[0].right, BvhChild::Leaf(0));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_two_objects_no_recursion() {
        let bvh = BvhNode::new(vec![
            sphere(Vec3::new(-2.0, 0.0, 0.0), 0.5),
            sphere(Vec3::new(2.0, 0.0, 0.0), 0.5),
        ]);

        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.nodes[0].left, BvhChild::Leaf(0));
        assert_eq!(bvh.nodes[0].right, BvhChild::Leaf(1));
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0), 0.5))
            .collect();

        let bvh = BvhNode::new(spheres);
        assert_eq!(bvh.object_count(), 10);

        // Root box contains everything
        let bbox = bvh.bounding_box();
        assert_eq!(bbox.x, Interval::new(-0.5, 9.5));

        // Test ray that hits sphere at x=5
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    #[test]
    fn test_bvh_splits_on_longest_axis() {
        // Spread along Y, inserted out of order
        let ys = [4.0, -3.0, 9.0, 0.0, 6.0];
        let spheres: Vec<Arc<dyn Hittable>> =
            ys.iter().map(|&y| sphere(Vec3::new(0.0, y, 0.0), 0.5)).collect();

        let bvh = BvhNode::new(spheres);

        // Objects end up sorted by their box minimum on Y
        let mins: Vec<f32> = bvh.objects.iter().map(|o| o.bounding_box().y.min).collect();
        assert!(mins.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_bvh_nearest_across_children() {
        // Nearer sphere sorts into the right half on X
        let bvh = BvhNode::new(vec![
            sphere(Vec3::new(-3.0, 0.0, -20.0), 1.0),
            sphere(Vec3::new(-1.0, 0.0, -20.0), 1.0),
            sphere(Vec3::new(1.0, 0.0, -20.0), 1.0),
            sphere(Vec3::new(3.0, 0.0, -5.0), 1.0),
        ]);

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 4.0).abs() < 1e-4);
    }
}
