use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lume_core::{load_scene, Scene};
use lume_math::Vec3;
use lume_renderer::{
    render_frame, Camera, FrameBuffer, HashRandom, RenderConfig, RowOrder, DEFAULT_BUCKET_SIZE,
    DEFAULT_CAMERA_POSITION, DEFAULT_RAY_EPSILON,
};
use rand::rngs::StdRng;

const DEFAULT_ASPECT: f64 = 16.0 / 9.0;

/// Render a scene of spheres with a Monte Carlo path tracer.
#[derive(Parser, Debug)]
#[command(name = "lume", version)]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 1500)]
    width: u32,

    /// Image height in pixels [default: width at 16:9]
    #[arg(long)]
    height: Option<u32>,

    /// Paths traced per pixel
    #[arg(short, long, default_value_t = 100)]
    samples: u32,

    /// Maximum surface hits per path
    #[arg(short, long, default_value_t = 8)]
    bounces: u32,

    /// Frame seed; identical seeds give identical images
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JSON scene description [default: built-in showcase scene]
    #[arg(long)]
    scene: Option<PathBuf>,

    /// PNG output path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Also write the raw interleaved RGB8 buffer here
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Row order of the raw buffer
    #[arg(long, value_enum, default_value_t = Rows::TopDown)]
    rows: Rows,

    /// Random number generator used for path sampling
    #[arg(long, value_enum, default_value_t = Sampler::Std)]
    rng: Sampler,

    /// Edge length of the parallel render buckets
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Offset of bounce rays along the surface normal
    #[arg(long, default_value_t = DEFAULT_RAY_EPSILON)]
    epsilon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rows {
    TopDown,
    BottomUp,
}

impl From<Rows> for RowOrder {
    fn from(rows: Rows) -> Self {
        match rows {
            Rows::TopDown => RowOrder::TopDown,
            Rows::BottomUp => RowOrder::BottomUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Sampler {
    /// ChaCha-based StdRng
    Std,
    /// SplitMix64 hash stream
    Hash,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        let height = self
            .height
            .unwrap_or_else(|| (self.width as f64 / DEFAULT_ASPECT) as u32);
        RenderConfig {
            width: self.width,
            height,
            samples_per_pixel: self.samples,
            max_bounces: self.bounces,
            seed: self.seed,
            ray_epsilon: self.epsilon,
            bucket_size: self.bucket_size,
        }
    }
}

fn load(args: &Args) -> Result<(Scene, Vec3)> {
    match &args.scene {
        Some(path) => {
            let document = load_scene(path)
                .with_context(|| format!("failed to load scene {}", path.display()))?;
            let position = document
                .camera
                .map(|camera| camera.position)
                .unwrap_or(DEFAULT_CAMERA_POSITION);
            Ok((document.scene, position))
        }
        None => Ok((Scene::showcase(), DEFAULT_CAMERA_POSITION)),
    }
}

fn render(args: &Args, scene: &Scene, camera: &Camera, config: &RenderConfig) -> Result<FrameBuffer> {
    let frame = match args.rng {
        Sampler::Std => render_frame::<StdRng>(scene, camera, config),
        Sampler::Hash => render_frame::<HashRandom>(scene, camera, config),
    };
    Ok(frame?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("Starting Lume");

    let (scene, position) = load(&args)?;
    log::info!(
        "Scene has {} spheres, {} lights",
        scene.len(),
        scene.lights().count()
    );

    let config = args.render_config();
    let camera = Camera::for_image(position, config.width, config.height);
    log::info!("Camera at {:?}, aspect {:.3}", camera.position, camera.aspect_ratio);

    let frame = render(&args, &scene, &camera, &config)?;

    frame
        .to_image(RowOrder::TopDown)
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("Saved to {}", args.output.display());

    if let Some(path) = &args.raw {
        std::fs::write(path, frame.to_rgb8(args.rows.into()))
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Raw {:?} buffer saved to {}", args.rows, path.display());
    }

    Ok(())
}
