//! Row-based image rendering.
//!
//! Each image row is an independent task with its own seeded generator.
//! The parallel path runs rows on a rayon pool, the sequential path runs
//! the same row function in a loop, and both assemble rows in row order.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::renderer::{color_to_rgb8, render_pixel};
use crate::{Camera, Hittable, Image, RenderConfig, RenderError, RenderResult, Rgb8};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Seed for one row's generator.
///
/// Mixes the row index into the base seed so neighbouring rows do not get
/// correlated sequences.
fn row_seed(seed: u64, row: u32) -> u64 {
    // splitmix64 finalizer
    let mut z = seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render one image row, left to right.
///
/// `row` counts from the bottom of the view. The result only depends on the
/// arguments, never on which thread runs it or when.
pub fn render_row(
    row: u32,
    width: u32,
    height: u32,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Vec<Rgb8> {
    let mut rng = StdRng::seed_from_u64(row_seed(config.seed, row));

    (0..width)
        .map(|col| {
            let color = render_pixel(camera, world, col, row, width, height, config, &mut rng);
            color_to_rgb8(color)
        })
        .collect()
}

/// Run a row task, turning a panic into a `RenderFailed` error.
fn guarded_row(
    row: u32,
    width: u32,
    height: u32,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> RenderResult<Vec<Rgb8>> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        render_row(row, width, height, camera, world, config)
    }))
    .map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "row task panicked".to_string());
        RenderError::RenderFailed { row, reason }
    })
}

fn validate(width: u32, height: u32, config: &RenderConfig) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidSettings(format!(
            "image must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    if config.samples_per_pixel == 0 {
        return Err(RenderError::InvalidSettings(
            "samples_per_pixel must be at least 1".to_string(),
        ));
    }
    if config.threads == Some(0) {
        return Err(RenderError::InvalidSettings(
            "threads must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Render all rows on the calling thread, bottom row first.
pub fn render_sequential(
    width: u32,
    height: u32,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> RenderResult<Image> {
    validate(width, height, config)?;

    let rows = (0..height)
        .map(|row| guarded_row(row, width, height, camera, world, config))
        .collect::<RenderResult<Vec<_>>>()?;

    Ok(Image::from_rows(width, rows))
}

/// Render rows on a dedicated thread pool.
///
/// Rows may finish in any order; the indexed collect puts each one back at
/// its own position before the image is assembled. Any failed row fails the
/// whole pass.
pub fn render_parallel(
    width: u32,
    height: u32,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> RenderResult<Image> {
    validate(width, height, config)?;

    let threads = config.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("orrery-row-{}", i))
        .build()
        .map_err(|e| RenderError::ThreadPool(e.to_string()))?;

    log::debug!("Rendering {} rows on {} threads", height, threads);

    let rows = pool.install(|| {
        (0..height)
            .into_par_iter()
            .map(|row| guarded_row(row, width, height, camera, world, config))
            .collect::<RenderResult<Vec<_>>>()
    })?;

    Ok(Image::from_rows(width, rows))
}

/// Render a full image, on the pool or sequentially per `config.parallel`.
pub fn render(
    width: u32,
    height: u32,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> RenderResult<Image> {
    let start = Instant::now();

    let image = if config.parallel {
        render_parallel(width, height, camera, world, config)?
    } else {
        render_sequential(width, height, camera, world, config)?
    };

    log::info!(
        "Rendered {}x{} @ {} spp ({}) in {:.2?}",
        width,
        height,
        config.samples_per_pixel,
        if config.parallel { "parallel" } else { "sequential" },
        start.elapsed()
    );

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, HitRecord, Lambertian, Ray, Scene, SolidColor, Sphere, Vec3};
    use orrery_math::Interval;
    use std::sync::Arc;

    fn small_scene() -> Scene {
        let mut scene = Scene::new();
        let matte = Arc::new(Lambertian::new(Arc::new(SolidColor::new(Color::new(
            0.7, 0.3, 0.2,
        )))));
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, matte.clone()).unwrap());
        scene.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, matte).unwrap());
        scene
    }

    fn config(parallel: bool) -> RenderConfig {
        RenderConfig {
            samples_per_pixel: 2,
            max_depth: 8,
            threads: Some(4),
            parallel,
            seed: 99,
            ..Default::default()
        }
    }

    #[test]
    fn test_row_seeds_differ() {
        assert_ne!(row_seed(0, 0), row_seed(0, 1));
        assert_ne!(row_seed(0, 5), row_seed(1, 5));
        assert_eq!(row_seed(7, 3), row_seed(7, 3));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scene = small_scene();
        let camera = Camera::new().with_lens(90.0, 2.0);

        let parallel = render_parallel(24, 12, &camera, &scene, &config(true)).unwrap();
        let sequential = render_sequential(24, 12, &camera, &scene, &config(false)).unwrap();

        assert_eq!(parallel.width(), 24);
        assert_eq!(parallel.height(), 12);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_rows_land_in_order() {
        let scene = small_scene();
        let camera = Camera::new().with_lens(90.0, 1.0);
        let cfg = config(true);

        let image = render(8, 8, &camera, &scene, &cfg).unwrap();

        // Top image row is the last shaded row
        for (shaded_row, image_row) in [(7u32, 0u32), (0, 7), (3, 4)] {
            let expected = render_row(shaded_row, 8, 8, &camera, &scene, &cfg);
            let actual: Vec<Rgb8> = (0..8).map(|x| image.get(x, image_row)).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_invalid_settings() {
        let scene = small_scene();
        let camera = Camera::new();

        assert!(matches!(
            render(0, 10, &camera, &scene, &config(true)),
            Err(RenderError::InvalidSettings(_))
        ));

        let no_samples = RenderConfig {
            samples_per_pixel: 0,
            ..config(false)
        };
        assert!(matches!(
            render(4, 4, &camera, &scene, &no_samples),
            Err(RenderError::InvalidSettings(_))
        ));

        let no_threads = RenderConfig {
            threads: Some(0),
            ..config(true)
        };
        assert!(matches!(
            render(4, 4, &camera, &scene, &no_threads),
            Err(RenderError::InvalidSettings(_))
        ));
    }

    /// Panics for rays through the upper half of the image.
    struct Faulty;

    impl Hittable for Faulty {
        fn hit<'a>(&'a self, ray: &Ray, _ray_t: Interval) -> Option<HitRecord<'a>> {
            if ray.direction().y > 0.0 {
                panic!("corrupt primitive");
            }
            None
        }
    }

    #[test]
    fn test_row_failure_aborts_render() {
        let camera = Camera::new().with_lens(90.0, 1.0);
        let cfg = RenderConfig {
            jitter: crate::Jitter::Fixed(0.5),
            ..config(true)
        };

        // Silence the default panic report for the expected panics
        let hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let parallel = render_parallel(4, 4, &camera, &Faulty, &cfg);
        let sequential = render_sequential(4, 4, &camera, &Faulty, &cfg);
        panic::set_hook(hook);

        for result in [parallel, sequential] {
            match result {
                Err(RenderError::RenderFailed { row, reason }) => {
                    assert!(row >= 2);
                    assert_eq!(reason, "corrupt primitive");
                }
                other => panic!("expected RenderFailed, got {:?}", other.map(|i| i.width())),
            }
        }
    }
}
