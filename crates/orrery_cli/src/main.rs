use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use orrery_core::{SceneDesc, TextureCache};
use orrery_renderer::{build_world, render, CameraMove, Image, RenderConfig, DEFAULT_MAX_DEPTH};

/// Headless driver: renders a scene, then re-renders after each camera move.
#[derive(Parser, Debug)]
#[command(name = "orrery", version, about)]
struct Args {
    /// Scene description (JSON). Defaults to the built-in reference scene
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Directory texture paths are resolved against
    #[arg(long)]
    assets: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum scatter depth per primary ray
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Render rows one after another on the main thread
    #[arg(long)]
    single_thread: bool,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Comma separated camera moves, one render pass each
    /// (right, left, forward, back, rise, sink, look-right, look-left,
    /// look-forward, look-back)
    #[arg(long, value_delimiter = ',')]
    moves: Vec<CameraMove>,

    /// Distance travelled per move
    #[arg(long, default_value_t = orrery_renderer::DEFAULT_MOVE_STEP)]
    step: f32,

    /// Print the effective scene as JSON and exit
    #[arg(long)]
    dump_scene: bool,
}

fn log_pass(label: &str, image: &Image) {
    let mean = image.mean_color();
    log::info!(
        "{}: {}x{}, mean color ({:.3}, {:.3}, {:.3})",
        label,
        image.width(),
        image.height(),
        mean.x,
        mean.y,
        mean.z
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let (mut desc, scene_dir) = match &args.scene {
        Some(path) => {
            let desc = SceneDesc::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            (desc, path.parent().map(|p| p.to_path_buf()))
        }
        None => (SceneDesc::reference(), None),
    };

    let mut cache = match args.assets.clone().or(scene_dir) {
        Some(dir) => TextureCache::with_base_dir(dir),
        None => TextureCache::new(),
    };

    // The reference scene should render even without its texture files
    if args.scene.is_none() {
        let replaced = desc.replace_missing_images(|path| cache.is_available(path));
        if !replaced.is_empty() {
            log::warn!(
                "Texture images not found, using checkerboards for: {}",
                replaced.join(", ")
            );
        }
    }

    if let Some(width) = args.width {
        desc.image.width = width;
    }
    if let Some(height) = args.height {
        desc.image.height = height;
    }
    if let Some(samples) = args.samples {
        desc.image.samples_per_pixel = samples;
    }

    if args.dump_scene {
        println!("{}", desc.to_json()?);
        return Ok(());
    }

    let mut world = build_world(&desc, &mut cache).context("Failed to build scene")?;
    log::info!("Scene ready: {} spheres", world.scene.len());

    let config = RenderConfig {
        samples_per_pixel: desc.image.samples_per_pixel,
        max_depth: args.depth,
        threads: args.threads,
        parallel: !args.single_thread,
        seed: args.seed,
        ..Default::default()
    };
    let (width, height) = (desc.image.width, desc.image.height);

    let image = render(width, height, &world.camera, &world.scene, &config)
        .context("Initial render failed")?;
    log_pass("pass 0", &image);

    for (i, mv) in args.moves.iter().enumerate() {
        world.camera.apply_move(*mv, args.step);
        log::debug!(
            "Camera {} -> from {:?} at {:?}",
            mv.name(),
            world.camera.look_from(),
            world.camera.look_at()
        );

        let image = render(width, height, &world.camera, &world.scene, &config)
            .with_context(|| format!("Render after move '{}' failed", mv.name()))?;
        log_pass(&format!("pass {} ({})", i + 1, mv.name()), &image);
    }

    Ok(())
}
