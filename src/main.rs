use std::path::PathBuf;

use anyhow::{ Context, Result };
use clap::Parser;
use log::{ info, warn };

use ray_tracer::consts::OUT_EXTENSION;
use ray_tracer::scene::Scene;

/// Renders a JSON scene description to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Scene description to render
    scene: PathBuf,

    /// Output image (defaults to the scene path with a .ppm extension)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Number of rendering threads (defaults to one per core)
    #[clap(short = 'j', long)]
    threads: Option<usize>,

    /// Render on the calling thread only
    #[clap(long)]
    serial: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        if args.serial {
            warn!("--threads has no effect with --serial");
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Could not configure the rendering thread pool")?;
    }

    let scene = Scene::load(&args.scene)
        .with_context(|| format!("Could not load scene {:?}", args.scene))?;

    let rendered = if args.serial {
        scene.camera.render(&scene.world)
    } else {
        scene.camera.render_parallel(&scene.world)
    };
    let canvas = rendered.context("Rendering failed")?;

    let output = args.output
        .unwrap_or_else(|| args.scene.with_extension(OUT_EXTENSION));
    canvas.save(&output)
        .with_context(|| format!("Could not write image {:?}", output))?;

    info!("Saved {:?}", output);
    Ok(())
}
