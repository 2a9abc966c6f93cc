//! Ember renderer - CPU path tracing
//!
//! A Monte Carlo path tracer: ray/object intersection over a BVH, a small
//! set of materials and textures, and a recursive radiance estimator that
//! renders buckets of the image in parallel.

mod bucket;
mod bvh;
mod camera;
mod constant_medium;
mod hittable;
mod material;
mod perlin;
mod quad;
mod renderer;
pub mod sampling;
pub mod scenes;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use constant_medium::ConstantMedium;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterResult,
};
pub use perlin::Perlin;
pub use quad::{make_box, Quad};
pub use renderer::{color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer};
pub use scenes::{build_scene, Scene, SCENE_NAMES};
pub use sphere::Sphere;
pub use texture::{
    CheckerTexture, ImageTexture, MarbleTexture, NoiseTexture, SolidColor, Texture,
    MISSING_TEXTURE_COLOR,
};
pub use transform::{RotateY, Translate};
pub use triangle::{triangles_from_mesh, MeshTriangle, Triangle};

/// Re-export the math types the public API is written in
pub use ember_math::{Aabb, Interval, Ray, Vec3};
pub use ember_core::{CameraSettings, RenderSettings};
