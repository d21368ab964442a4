//! Named scenes, each returning the scene and a camera framed for it.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, info};
use lux_core::{NoiseTexture, SceneKind, Settings, Texture, Textures};
use lux_math::{Interval, Vec3};
use lux_renderer::random::{gen_f32, gen_range_f32, random_vec3};
use lux_renderer::{
    AaRect, Assets, Background, BvhNode, Camera, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, FlipFace, Hittable, HittableList, Isotropic, Lambertian, MaterialId, Metal,
    MovingSphere, RotateY, Scene, Sphere, Translate,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Every scene uses a shutter open over [0, 1].
const SHUTTER: Interval = Interval::new(0.0, 1.0);

/// ChaCha stream for scene construction; bucket streams start at zero.
const SCENE_STREAM: u64 = u64::MAX;

const EARTH_MAP: &str = "earthmap.jpg";

pub fn build(settings: &Settings) -> Result<(Scene, Camera)> {
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    rng.set_stream(SCENE_STREAM);

    let assets = Assets::new(Textures::with_base_dir(&settings.texture_dir));
    let (scene, framing) = match settings.scene {
        SceneKind::RandomSpheres => random_spheres(assets, &mut rng)?,
        SceneKind::TwoSpheres => two_spheres(assets),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(assets, &mut rng),
        SceneKind::Earth => earth(assets)?,
        SceneKind::SimpleLight => simple_light(assets, &mut rng)?,
        SceneKind::CornellBox => cornell_box(assets)?,
        SceneKind::CornellSmoke => cornell_smoke(assets)?,
        SceneKind::FinalScene => final_scene(assets, &mut rng)?,
    };

    info!(
        "Scene '{}': {} materials, {} textures, light sampling {}",
        settings.scene,
        scene.assets.material_count(),
        scene.assets.textures.len(),
        if scene.lights.is_some() { "on" } else { "off" }
    );

    Ok((scene, frame(framing, settings)))
}

/// Camera placement for a scene, before the resolution is known.
struct Framing {
    look_from: Vec3,
    look_at: Vec3,
    vfov: f32,
    aperture: f32,
    focus_dist: f32,
}

impl Framing {
    fn looking_at(look_from: Vec3, look_at: Vec3, vfov: f32) -> Self {
        Self {
            look_from,
            look_at,
            vfov,
            aperture: 0.0,
            focus_dist: 10.0,
        }
    }

    fn outdoor() -> Self {
        Self::looking_at(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0)
    }

    fn cornell() -> Self {
        Self::looking_at(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            40.0,
        )
    }
}

fn frame(framing: Framing, settings: &Settings) -> Camera {
    let mut camera = Camera::new()
        .with_resolution(settings.width, settings.height)
        .with_position(framing.look_from, framing.look_at, Vec3::Y)
        .with_lens(framing.vfov, framing.aperture, framing.focus_dist)
        .with_shutter(SHUTTER.min, SHUTTER.max);
    camera.initialize();
    camera
}

fn checker(assets: &mut Assets) -> MaterialId {
    let texture = assets.textures.add(Texture::checker(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    assets.add_material(Lambertian::new(texture))
}

fn lambertian(assets: &mut Assets, albedo: Color) -> MaterialId {
    let texture = assets.textures.solid(albedo);
    assets.add_material(Lambertian::new(texture))
}

fn diffuse_light(assets: &mut Assets, radiance: f32) -> MaterialId {
    let texture = assets.textures.solid(Color::splat(radiance));
    assets.add_material(DiffuseLight::new(texture))
}

fn isotropic(assets: &mut Assets, albedo: Color) -> MaterialId {
    let texture = assets.textures.solid(albedo);
    assets.add_material(Isotropic::new(texture))
}

fn marble(assets: &mut Assets, scale: f32, rng: &mut dyn RngCore) -> MaterialId {
    let texture = assets
        .textures
        .add(Texture::Noise(NoiseTexture::new(scale, rng)));
    assets.add_material(Lambertian::new(texture))
}

fn earth_surface(assets: &mut Assets) -> Result<MaterialId> {
    let texture = assets.textures.load_image(EARTH_MAP)?;
    Ok(assets.add_material(Lambertian::new(texture)))
}

fn random_spheres(mut assets: Assets, rng: &mut dyn RngCore) -> Result<(Scene, Framing)> {
    let mut world = HittableList::new();

    let ground = checker(&mut assets);
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    let glass = assets.add_material(Dielectric::new(1.5));
    for a in -10..10 {
        for b in -10..10 {
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
                // Diffuse, bouncing upward over the shutter interval
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let material = lambertian(&mut assets, albedo);
                let center1 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(MovingSphere::new(
                    center, center1, SHUTTER.min, SHUTTER.max, 0.2, material,
                ));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                let material = assets.add_material(Metal::new(albedo, fuzz));
                world.add(Sphere::new(center, 0.2, material));
            } else {
                world.add(Sphere::new(center, 0.2, glass));
            }
        }
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    let brown = lambertian(&mut assets, Color::new(0.4, 0.2, 0.1));
    world.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown));
    let mirror = assets.add_material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    world.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, mirror));

    debug!("Random spheres: {} objects", world.len());
    let bvh = BvhNode::new(&world, SHUTTER, rng)?;

    let framing = Framing {
        aperture: 0.1,
        ..Framing::outdoor()
    };
    Ok((Scene::new(bvh, assets, Background::Sky), framing))
}

fn two_spheres(mut assets: Assets) -> (Scene, Framing) {
    let mut world = HittableList::new();

    let checker = checker(&mut assets);
    world.add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker));
    world.add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker));

    (Scene::new(world, assets, Background::Sky), Framing::outdoor())
}

fn two_perlin_spheres(mut assets: Assets, rng: &mut dyn RngCore) -> (Scene, Framing) {
    let mut world = HittableList::new();

    let marble = marble(&mut assets, 4.0, rng);
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));

    (Scene::new(world, assets, Background::Sky), Framing::outdoor())
}

fn earth(mut assets: Assets) -> Result<(Scene, Framing)> {
    let surface = earth_surface(&mut assets)?;
    let globe = Sphere::new(Vec3::ZERO, 2.0, surface);

    Ok((Scene::new(globe, assets, Background::Sky), Framing::outdoor()))
}

fn simple_light(mut assets: Assets, rng: &mut dyn RngCore) -> Result<(Scene, Framing)> {
    let mut world = HittableList::new();

    let marble = marble(&mut assets, 4.0, rng);
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));

    let light = diffuse_light(&mut assets, 4.0);
    world.add(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light));
    world.add(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light));

    let mut lights = HittableList::new();
    lights.add(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, MaterialId::NONE));
    lights.add(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, MaterialId::NONE));

    let scene = Scene::new(world, assets, Background::default()).with_lights(lights, SHUTTER)?;
    let framing = Framing::looking_at(
        Vec3::new(26.0, 3.0, 6.0),
        Vec3::new(0.0, 2.0, 0.0),
        20.0,
    );
    Ok((scene, framing))
}

/// The five walls of the 555-unit Cornell box, normals facing inward.
fn cornell_walls(assets: &mut Assets, world: &mut HittableList) -> MaterialId {
    let red = lambertian(assets, Color::new(0.65, 0.05, 0.05));
    let white = lambertian(assets, Color::new(0.73, 0.73, 0.73));
    let green = lambertian(assets, Color::new(0.12, 0.45, 0.15));

    world.add(FlipFace::new(AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    world.add(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red));
    world.add(FlipFace::new(AaRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white)));
    world.add(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white));
    world.add(FlipFace::new(AaRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white)));

    white
}

/// Ceiling light facing down into the box. Returns the matching sample shape.
fn ceiling_light(
    assets: &mut Assets,
    world: &mut HittableList,
    radiance: f32,
    (x0, x1): (f32, f32),
    (z0, z1): (f32, f32),
) -> AaRect {
    let light = diffuse_light(assets, radiance);
    world.add(FlipFace::new(AaRect::xz(x0, x1, z0, z1, 554.0, light)));
    AaRect::xz(x0, x1, z0, z1, 554.0, MaterialId::NONE)
}

/// A box resting on the floor, turned about its corner and then placed.
fn placed_box(size: Vec3, angle: f32, offset: Vec3, material: MaterialId) -> Translate {
    let cuboid = Cuboid::new(Vec3::ZERO, size, material);
    Translate::new(RotateY::new(cuboid, angle, SHUTTER), offset)
}

fn cornell_box(mut assets: Assets) -> Result<(Scene, Framing)> {
    let mut world = HittableList::new();

    cornell_walls(&mut assets, &mut world);
    let light = ceiling_light(
        &mut assets,
        &mut world,
        15.0,
        (213.0, 343.0),
        (227.0, 332.0),
    );

    let aluminum = assets.add_material(Metal::new(Color::new(0.8, 0.85, 0.88), 0.0));
    world.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        aluminum,
    ));

    let glass = assets.add_material(Dielectric::new(1.5));
    world.add(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass));

    let mut lights = HittableList::new();
    lights.add(light);
    lights.add(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        MaterialId::NONE,
    ));

    let scene = Scene::new(world, assets, Background::default()).with_lights(lights, SHUTTER)?;
    Ok((scene, Framing::cornell()))
}

fn cornell_smoke(mut assets: Assets) -> Result<(Scene, Framing)> {
    let mut world = HittableList::new();

    let white = cornell_walls(&mut assets, &mut world);
    let light = ceiling_light(
        &mut assets,
        &mut world,
        7.0,
        (113.0, 443.0),
        (127.0, 432.0),
    );

    let smoke = isotropic(&mut assets, Color::ZERO);
    let fog = isotropic(&mut assets, Color::ONE);

    let tall = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white,
    );
    let short = placed_box(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    );
    world.add(ConstantMedium::new(tall, 0.01, smoke)?);
    world.add(ConstantMedium::new(short, 0.01, fog)?);

    let mut lights = HittableList::new();
    lights.add(light);

    let scene = Scene::new(world, assets, Background::default()).with_lights(lights, SHUTTER)?;
    Ok((scene, Framing::cornell()))
}

fn final_scene(mut assets: Assets, rng: &mut dyn RngCore) -> Result<(Scene, Framing)> {
    let mut world = HittableList::new();

    // Ground of boxes with random heights
    let ground = lambertian(&mut assets, Color::new(0.48, 0.83, 0.53));
    let boxes_per_side = 20;
    let mut boxes = HittableList::new();
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            boxes.add(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground,
            ));
        }
    }
    world.add(BvhNode::new(&boxes, SHUTTER, rng)?);

    let light = ceiling_light(
        &mut assets,
        &mut world,
        7.0,
        (123.0, 423.0),
        (147.0, 412.0),
    );

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    let orange = lambertian(&mut assets, Color::new(0.7, 0.3, 0.1));
    world.add(MovingSphere::new(
        center0,
        center1,
        SHUTTER.min,
        SHUTTER.max,
        50.0,
        orange,
    ));

    let glass = assets.add_material(Dielectric::new(1.5));
    world.add(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, glass));
    let brushed = assets.add_material(Metal::new(Color::new(0.8, 0.8, 0.9), 10.0));
    world.add(Sphere::new(Vec3::new(0.0, 150.0, 145.0), 50.0, brushed));

    // Glass ball filled with blue haze
    let boundary: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(360.0, 150.0, 145.0), 70.0, glass));
    world.add_shared(Arc::clone(&boundary));
    let haze = isotropic(&mut assets, Color::new(0.2, 0.4, 0.9));
    world.add(ConstantMedium::from_shared(boundary, 0.2, haze)?);

    // Thin mist over everything
    let mist = isotropic(&mut assets, Color::ONE);
    let atmosphere = Sphere::new(Vec3::ZERO, 5000.0, glass);
    world.add(ConstantMedium::new(atmosphere, 0.0001, mist)?);

    let earth = earth_surface(&mut assets)?;
    world.add(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, earth));
    let marble = marble(&mut assets, 0.1, rng);
    world.add(Sphere::new(Vec3::new(220.0, 280.0, 300.0), 80.0, marble));

    // Cluster of small spheres
    let white = lambertian(&mut assets, Color::splat(0.73));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, white));
    }
    let cluster = BvhNode::new(&cluster, SHUTTER, rng)?;
    world.add(Translate::new(
        RotateY::new(cluster, 15.0, SHUTTER),
        Vec3::new(-100.0, 270.0, 395.0),
    ));

    let mut lights = HittableList::new();
    lights.add(light);

    let scene = Scene::new(world, assets, Background::default()).with_lights(lights, SHUTTER)?;
    let framing = Framing::looking_at(
        Vec3::new(478.0, 278.0, -600.0),
        Vec3::new(278.0, 278.0, 0.0),
        40.0,
    );
    Ok((scene, framing))
}
