use anyhow::{Context, Result};
use log::{debug, info};
use rand::SeedableRng;
use rayon::prelude::*;

use crate::{Camera, Color, Config, CrateRng, Scene, Screen};

/// Renders a whole image on the calling thread.
#[derive(Clone, Debug)]
pub struct Renderer {
    config: Config,
}
impl Renderer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Averages `config.samples` rays per pixel. With 0 samples the image stays black.
    ///
    /// Rays are jittered within their pixel unless only one sample is taken.
    pub fn render<C: Camera + ?Sized>(
        &self,
        camera: &C,
        scene: &Scene,
        show_progress: bool,
        rng: &mut CrateRng,
    ) -> Screen {
        let (width, height) = (self.config.width.get(), self.config.height.get());
        let mut screen = Screen::new(width, height);
        let samples = self.config.samples;
        if samples == 0 {
            return screen;
        }
        let jitter = samples > 1;

        for (row, pixels) in screen.rows_mut().enumerate() {
            if show_progress && row % 25 == 0 {
                info!("Scanlines remaining: {}", height - row);
            }

            for (col, pixel) in pixels.iter_mut().enumerate() {
                let mut color = Color::BLACK;
                for _ in 0..samples {
                    let ray = camera.get_ray(row, col, jitter, rng);
                    color += scene.color_at(&ray, self.config.recursion_limit, rng);
                }
                *pixel = color / samples as f64;
            }
        }
        if show_progress {
            info!("Scanlines remaining: 0");
        }

        screen
    }
}

/// Splits `total` samples over `workers` as evenly as possible. The first
/// `total % workers` workers get one extra sample.
///
/// # Example
/// ```
/// # use pathtracing::split_samples;
/// assert_eq!(split_samples(10, 4), vec![3, 3, 2, 2]);
/// assert_eq!(split_samples(2, 3), vec![1, 1, 0]);
/// ```
pub fn split_samples(total: u32, workers: usize) -> Vec<u32> {
    let workers = workers.max(1);
    let base = total / workers as u32;
    let rem = (total % workers as u32) as usize;
    (0..workers)
        .map(|i| if i < rem { base + 1 } else { base })
        .collect()
}

/// Renders with `n_threads` workers, each taking a share of `config.samples` and drawing
/// from its own rng.
///
/// The result is the unweighted mean of the images of the workers that got at least one
/// sample, no matter how many samples each of them took.
///
/// Every partition is a separate task on a pool of `n_threads` threads. Rayon may run two
/// partitions one after the other on the same thread, but each keeps its own rng and image.
/// Only the first worker logs progress, if `config.progress` is set.
pub fn multi_threaded_render<C: Camera + ?Sized>(
    config: &Config,
    camera: &C,
    scene: &Scene,
    n_threads: usize,
) -> Result<Screen> {
    let n_threads = n_threads.max(1);
    let spps = split_samples(config.samples, n_threads);
    info!("Using {} threads", n_threads);
    debug!("Samples per pixel for each thread: {:?}", spps);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("render-{}", i))
        .build()
        .context("Couldn't start the render threads")?;

    let images: Vec<Screen> = pool.install(|| {
        spps.par_iter()
            .enumerate()
            .map(|(i, &samples)| {
                debug!("Running thread {} with {} samples per pixel", i + 1, samples);
                let renderer = Renderer::new(Config {
                    samples,
                    ..config.clone()
                });
                let mut rng = worker_rng(config.seed, i);
                renderer.render(camera, scene, i == 0 && config.progress, &mut rng)
            })
            .collect()
    });
    info!("All threads finished");

    Ok(merge(
        &images,
        &spps,
        config.width.get(),
        config.height.get(),
    ))
}

/// Averages the images whose worker took at least one sample, each with the same weight.
/// Black if no worker took a sample.
fn merge(images: &[Screen], spps: &[u32], width: usize, height: usize) -> Screen {
    let mut merged = Screen::new(width, height);
    let contributing = spps.iter().filter(|&&s| s > 0).count();
    if contributing == 0 {
        return merged;
    }
    let weight = 1. / contributing as f64;
    for (image, _) in images.iter().zip(spps).filter(|(_, s)| **s > 0) {
        for (dst, &src) in merged.buffer.iter_mut().zip(image.buffer.iter()) {
            *dst += src * weight;
        }
    }
    merged
}

/// Worker `i` gets `seed + i`, so worker 0 draws the same numbers as a single threaded
/// render seeded with `seed`.
fn worker_rng(seed: Option<u64>, i: usize) -> CrateRng {
    match seed {
        Some(seed) => CrateRng::seed_from_u64(seed.wrapping_add(i as u64)),
        None => CrateRng::from_entropy(),
    }
}
