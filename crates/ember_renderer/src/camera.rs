//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::Color;
use ember_core::{CameraSettings, RenderSettings};
use ember_math::{Ray, Vec3};
use rand::RngCore;

/// Pinhole or thin-lens camera. The view is fixed at construction.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: Color,

    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    defocus_angle: f32,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Build a camera from render settings.
    ///
    /// Zero resolutions and sample counts are raised to one.
    pub fn new(settings: &RenderSettings) -> Self {
        let image_width = settings.image_width.max(1);
        let image_height = settings.image_height.max(1);
        let lens: &CameraSettings = &settings.camera;

        let look_from = Vec3::from_array(lens.look_from);
        let look_at = Vec3::from_array(lens.look_at);
        let vup = Vec3::from_array(lens.vup);

        let h = (lens.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * lens.focus_dist;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        // Image rows run down the viewport
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;
        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let upper_left = look_from - lens.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let defocus_radius = lens.focus_dist * (lens.defocus_angle / 2.0).to_radians().tan();

        Self {
            image_width,
            image_height,
            samples_per_pixel: settings.samples_per_pixel.max(1),
            max_depth: settings.max_depth,
            background: Vec3::from_array(settings.background),
            center: look_from,
            pixel00_loc: upper_left + 0.5 * (pixel_delta_u + pixel_delta_v),
            pixel_delta_u,
            pixel_delta_v,
            defocus_angle: lens.defocus_angle,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        }
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray starts on the defocus disk, passes through a jittered point
    /// in the pixel square, and carries a uniform time in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_x = gen_f32(rng) - 0.5;
        let offset_y = gen_f32(rng) - 0.5;

        let pixel_sample = self.pixel00_loc
            + (i as f32 + offset_x) * self.pixel_delta_u
            + (j as f32 + offset_y) * self.pixel_delta_v;

        let origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            let p = random_in_unit_disk(rng);
            self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
        };

        Ray::new(origin, pixel_sample - origin, gen_f32(rng))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}
