//! Built-in demo scenes.
//!
//! Each scene returns its world already wrapped in a BVH together with the
//! render settings it was composed for. Callers may override the settings
//! before rendering.

use std::path::Path;
use std::sync::Arc;

use crate::sampling::{gen_f32, gen_range_f32, random_vec3};
use crate::{
    make_box, BvhNode, CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight, Hittable,
    HittableList, ImageTexture, Lambertian, MarbleTexture, Material, Metal, NoiseTexture, Quad,
    RotateY, Sphere, Translate,
};
use ember_core::{CameraSettings, RenderSettings};
use ember_math::Vec3;
use rand::RngCore;

/// File name of the earth texture inside the texture directory.
pub const EARTH_TEXTURE: &str = "earthmap.jpg";

/// Names accepted by [`build_scene`].
pub const SCENE_NAMES: [&str; 9] = [
    "bouncing_spheres",
    "checkered_spheres",
    "earth",
    "perlin_spheres",
    "quads",
    "simple_light",
    "cornell_box",
    "cornell_smoke",
    "final_scene",
];

/// A ready-to-render world and the settings it was composed for.
pub struct Scene {
    pub name: &'static str,
    pub world: Arc<dyn Hittable>,
    pub settings: RenderSettings,
}

impl Scene {
    fn new(name: &'static str, world: HittableList, settings: RenderSettings) -> Self {
        Self {
            name,
            world: Arc::new(BvhNode::from_list(world)),
            settings,
        }
    }
}

/// Build a scene by name. Returns `None` for unknown names.
///
/// Image textures are looked up in `texture_dir`; a missing file renders
/// with the missing-texture color instead of failing.
pub fn build_scene(name: &str, texture_dir: &Path, rng: &mut dyn RngCore) -> Option<Scene> {
    let scene = match name {
        "bouncing_spheres" => bouncing_spheres(rng),
        "checkered_spheres" => checkered_spheres(),
        "earth" => earth(texture_dir),
        "perlin_spheres" => perlin_spheres(rng),
        "quads" => quads(),
        "simple_light" => simple_light(rng),
        "cornell_box" => cornell_box(),
        "cornell_smoke" => cornell_smoke(),
        "final_scene" => final_scene(texture_dir, rng),
        _ => return None,
    };

    log::debug!("Built scene '{}'", scene.name);
    Some(scene)
}

fn view(look_from: [f32; 3], look_at: [f32; 3], vfov: f32) -> CameraSettings {
    CameraSettings {
        look_from,
        look_at,
        vfov,
        ..CameraSettings::default()
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(albedo))
}

/// Random small spheres on a checker ground; diffuse ones bounce upwards
/// during the shutter interval.
pub fn bouncing_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::moving(center, center2, 0.2, lambertian(albedo))));
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                // glass
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let settings = RenderSettings {
        image_width: 640,
        image_height: 360,
        samples_per_pixel: 96,
        max_depth: 32,
        background: [0.7, 0.8, 1.0],
        camera: CameraSettings {
            defocus_angle: 0.6,
            focus_dist: 10.0,
            ..view([13.0, 2.0, 3.0], [0.0, 0.0, 0.0], 20.0)
        },
        ..RenderSettings::default()
    };

    Scene::new("bouncing_spheres", world, settings)
}

pub fn checkered_spheres() -> Scene {
    let mut world = HittableList::new();

    let checker: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(CheckerTexture::from_colors(
        0.48,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))));

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker)));

    let settings = RenderSettings {
        samples_per_pixel: 64,
        max_depth: 32,
        background: [0.7, 0.8, 1.0],
        camera: view([13.0, 2.0, 3.0], [0.0, 0.0, 0.0], 20.0),
        ..RenderSettings::default()
    };

    Scene::new("checkered_spheres", world, settings)
}

pub fn earth(texture_dir: &Path) -> Scene {
    let mut world = HittableList::new();

    let earth_texture = Arc::new(ImageTexture::open(texture_dir.join(EARTH_TEXTURE)));
    world.add(Arc::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Arc::new(Lambertian::new(earth_texture)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 0.0, -2.0),
        2.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let settings = RenderSettings {
        samples_per_pixel: 64,
        max_depth: 32,
        background: [0.7, 0.8, 1.0],
        camera: view([4.0, 3.0, 12.0], [0.0, 0.0, 0.0], 20.0),
        ..RenderSettings::default()
    };

    Scene::new("earth", world, settings)
}

pub fn perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let noise: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(4.0, rng))));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, noise.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise)));

    let settings = RenderSettings {
        samples_per_pixel: 64,
        max_depth: 32,
        background: [0.7, 0.8, 1.0],
        camera: view([4.0, 3.0, 12.0], [0.0, 0.0, 0.0], 20.0),
        ..RenderSettings::default()
    };

    Scene::new("perlin_spheres", world, settings)
}

pub fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = lambertian(Color::new(1.0, 0.2, 0.2));
    let back_green = lambertian(Color::new(0.2, 1.0, 0.2));
    let right_blue = lambertian(Color::new(0.2, 0.2, 1.0));
    let upper_orange = lambertian(Color::new(1.0, 0.5, 0.0));
    let lower_teal = lambertian(Color::new(0.2, 0.8, 0.8));

    world.add(Arc::new(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let settings = RenderSettings {
        image_width: 400,
        image_height: 400,
        samples_per_pixel: 100,
        max_depth: 50,
        background: [0.7, 0.8, 1.0],
        camera: view([0.0, 0.0, 9.0], [0.0, 0.0, 0.0], 80.0),
        ..RenderSettings::default()
    };

    Scene::new("quads", world, settings)
}

pub fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let marble: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(MarbleTexture::new(4.0, rng))));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(4.0)));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone())));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    let settings = RenderSettings {
        samples_per_pixel: 100,
        max_depth: 50,
        background: [0.0, 0.0, 0.0],
        camera: view([26.0, 3.0, 6.0], [0.0, 2.0, 0.0], 20.0),
        ..RenderSettings::default()
    };

    Scene::new("simple_light", world, settings)
}

/// The five walls of the Cornell box, without the light.
fn cornell_walls(world: &mut HittableList) -> Arc<dyn Material> {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    white
}

/// Box with one corner at the origin, rotated about Y and moved into place.
fn placed_box(size: Vec3, angle: f32, offset: Vec3, material: Arc<dyn Material>) -> Arc<dyn Hittable> {
    let shape: Arc<dyn Hittable> = Arc::new(make_box(Vec3::ZERO, size, material));
    let rotated: Arc<dyn Hittable> = Arc::new(RotateY::new(shape, angle));
    Arc::new(Translate::new(rotated, offset))
}

fn cornell_settings() -> RenderSettings {
    RenderSettings {
        image_width: 600,
        image_height: 600,
        samples_per_pixel: 200,
        max_depth: 50,
        background: [0.0, 0.0, 0.0],
        camera: view([278.0, 278.0, -800.0], [278.0, 278.0, 0.0], 40.0),
        ..RenderSettings::default()
    }
}

pub fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(15.0)));
    world.add(Arc::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));

    world.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    ));
    world.add(placed_box(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    ));

    Scene::new("cornell_box", world, cornell_settings())
}

pub fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(7.0)));
    world.add(Arc::new(Quad::new(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light,
    )));

    let box1 = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    );
    let box2 = placed_box(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    );

    world.add(Arc::new(ConstantMedium::from_color(box1, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::from_color(box2, 0.01, Color::ONE)));

    Scene::new("cornell_smoke", world, cornell_settings())
}

/// Everything at once: a field of boxes, a moving sphere, glass, metal,
/// subsurface-looking fog, global mist, image and noise textures and an
/// instanced cluster of spheres.
pub fn final_scene(texture_dir: &Path, rng: &mut dyn RngCore) -> Scene {
    let mut boxes1 = HittableList::new();
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);

            boxes1.add(Arc::new(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::from_list(boxes1)));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(7.0)));
    world.add(Arc::new(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light,
    )));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(Sphere::moving(
        center1,
        center2,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));

    world.add(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass shell filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::from_color(boundary, 0.2, Color::new(0.2, 0.4, 0.9))));

    // Thin mist over everything
    let mist: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 5000.0, Arc::new(Dielectric::new(1.5))));
    world.add(Arc::new(ConstantMedium::from_color(mist, 0.0001, Color::ONE)));

    let earth_texture = Arc::new(ImageTexture::open(texture_dir.join(EARTH_TEXTURE)));
    world.add(Arc::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::new(earth_texture)),
    )));

    let marble = Arc::new(MarbleTexture::new(0.2, rng));
    world.add(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(marble)),
    )));

    let mut boxes2 = HittableList::new();
    let white = lambertian(Color::splat(0.73));
    for _ in 0..1000 {
        boxes2.add(Arc::new(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, white.clone())));
    }

    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(boxes2));
    let cluster: Arc<dyn Hittable> = Arc::new(RotateY::new(cluster, 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    let settings = RenderSettings {
        image_width: 800,
        image_height: 800,
        samples_per_pixel: 250,
        max_depth: 40,
        background: [0.0, 0.0, 0.0],
        camera: view([478.0, 278.0, -600.0], [278.0, 278.0, 0.0], 40.0),
        ..RenderSettings::default()
    };

    Scene::new("final_scene", world, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HitRecord;
    use ember_math::{Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_name_builds() {
        let mut rng = StdRng::seed_from_u64(0);
        for name in SCENE_NAMES {
            let scene = build_scene(name, Path::new("does-not-exist"), &mut rng).unwrap();
            assert_eq!(scene.name, name);
            assert!(scene.settings.image_width > 0);
            assert!(scene.settings.samples_per_pixel > 0);
        }
    }

    #[test]
    fn test_unknown_name() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(build_scene("teapot", Path::new("."), &mut rng).is_none());
    }

    #[test]
    fn test_cornell_box_encloses_camera_target() {
        let scene = cornell_box();
        let bbox = scene.world.bounding_box();
        assert!(bbox.x.contains(278.0) && bbox.y.contains(278.0) && bbox.z.contains(278.0));

        // Looking down the box, the back wall is 555 away from the opening
        let mut rng = StdRng::seed_from_u64(0);
        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::new(278.0, 100.0, -800.0), Vec3::Z, 0.0);
        assert!(scene.world.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!(rec.p.z > 0.0);
    }

    #[test]
    fn test_bouncing_spheres_is_seeded() {
        let a = bouncing_spheres(&mut StdRng::seed_from_u64(5));
        let b = bouncing_spheres(&mut StdRng::seed_from_u64(5));
        assert_eq!(a.world.bounding_box(), b.world.bounding_box());
    }
}
