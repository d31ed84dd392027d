use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::time::Instant;

use anyhow::{anyhow, Result};
use log::{debug, error, info};

use pathtracing::config::{self, Config};
use pathtracing::logger::init_logger;
use pathtracing::{multi_threaded_render, Renderer, Screen, ThinLensCamera};

fn main() {
    let config = config::GLOBAL();
    init_logger(config.log_level());

    if let Err(err) = run(config) {
        error!("{:#}", err);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;
    let mut rng = config.rng();

    let scene = config.preset.create(&mut rng)?;
    info!(
        "Scene {}: {} objects, {} materials",
        config.preset,
        scene.objects().len(),
        scene.materials().len()
    );
    let camera = ThinLensCamera::from_config(config)?;
    debug!("{:#?}", camera);

    let threads = config.threads();
    let start = Instant::now();
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Screen> {
        if threads == 1 {
            let renderer = Renderer::new(config.clone());
            Ok(renderer.render(&camera, &scene, config.progress, &mut rng))
        } else {
            multi_threaded_render(config, &camera, &scene, threads)
        }
    }));
    let mut screen = rendered.map_err(|_| anyhow!("Rendering panicked"))??;
    info!(
        "Rendered {}x{} at {} samples per pixel in {:.2?}",
        screen.width,
        screen.height,
        config.samples,
        start.elapsed()
    );

    screen.gamma_correct(config.gamma);
    screen.save_png(&config.output)?;
    info!("Wrote {}", config.output.display());

    Ok(())
}
