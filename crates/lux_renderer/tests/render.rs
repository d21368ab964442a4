use lux_renderer::{
    render, render_parallel, render_pixel, AaRect, Assets, Background, Camera, Color,
    DiffuseLight, FlipFace, HittableList, Interval, Lambertian, MaterialId, RenderConfig, Scene,
    Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const RADIANCE: f32 = 15.0;
const ALBEDO: f32 = 0.5;

/// A grey sphere under a downward-facing area light, black background.
fn lit_sphere_scene() -> Scene {
    let mut assets = Assets::default();
    let grey = assets.textures.solid(Color::splat(ALBEDO));
    let glow = assets.textures.solid(Color::splat(RADIANCE));
    let diffuse = assets.add_material(Lambertian::new(grey));
    let light = assets.add_material(DiffuseLight::new(glow));

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::ZERO, 0.5, diffuse));
    world.add(FlipFace::new(AaRect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, light)));

    let mut lights = HittableList::new();
    lights.add(AaRect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, MaterialId::NONE));

    Scene::new(world, assets, Background::Solid(Color::ZERO))
        .with_lights(lights, Interval::new(0.0, 1.0))
        .unwrap()
}

fn camera() -> Camera {
    let mut camera = Camera::new()
        .with_resolution(16, 16)
        .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(40.0, 0.0, 3.0);
    camera.initialize();
    camera
}

fn config(seed: u64) -> RenderConfig {
    RenderConfig {
        samples_per_pixel: 16,
        max_depth: 8,
        seed,
        bucket_size: 8,
    }
}

#[test]
fn lit_sphere_receives_bounded_light() {
    let scene = lit_sphere_scene();
    let image = render_parallel(&camera(), &scene, &config(1));

    // Upper half of the sphere faces the light
    let lit = image.get(8, 5);
    assert!(lit.x > 0.0, "expected light on the sphere, got {lit:?}");

    // One diffuse bounce off the sphere cannot return more than albedo * radiance
    let bound = ALBEDO * RADIANCE;
    for pixel in &image.pixels {
        assert!(pixel.is_finite());
        assert!(pixel.max_element() <= bound, "{pixel:?} exceeds {bound}");
    }

    // Corner rays miss everything
    assert_eq!(image.get(0, 0), Color::ZERO);
}

#[test]
fn same_seed_renders_identical_pixels() {
    let scene = lit_sphere_scene();
    let camera = camera();

    let first = render_parallel(&camera, &scene, &config(7));
    let second = render_parallel(&camera, &scene, &config(7));
    assert_eq!(first.pixels, second.pixels);

    let sequential = render(&camera, &scene, &config(7));
    assert_eq!(first.pixels, sequential.pixels);
}

#[test]
fn different_seed_changes_noise() {
    let scene = lit_sphere_scene();
    let camera = camera();

    let a = render_parallel(&camera, &scene, &config(1));
    let b = render_parallel(&camera, &scene, &config(2));
    assert_ne!(a.pixels, b.pixels);
}

#[test]
fn rgba_image_matches_buffer_size() {
    let scene = lit_sphere_scene();
    let image = render(&camera(), &scene, &config(3));
    let rgba = image.to_rgba_image();

    assert_eq!(rgba.dimensions(), (16, 16));
    assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

/// Spread of one lit pixel across independent random streams.
fn pixel_variance(scene: &Scene, camera: &Camera, samples_per_pixel: u32) -> f32 {
    let config = RenderConfig {
        samples_per_pixel,
        ..config(0)
    };
    let values: Vec<f32> = (0..16)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            render_pixel(camera, scene, 8, 5, &config, &mut rng).x
        })
        .collect();

    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

#[test]
fn noise_shrinks_with_more_samples() {
    let scene = lit_sphere_scene();
    let camera = camera();

    let coarse = pixel_variance(&scene, &camera, 4);
    let fine = pixel_variance(&scene, &camera, 256);

    assert!(coarse > 0.0);
    assert!(fine < 0.5 * coarse, "variance {fine} at 256 spp vs {coarse} at 4 spp");
}
