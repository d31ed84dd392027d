use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{anyhow, ensure, Result};
use log::LevelFilter;
use once_cell::sync::OnceCell;
use rand::{Rng, SeedableRng};
use structopt::StructOpt;
use strum::VariantNames;
use strum_macros::Display as StrumDisplay;
use strum_macros::{EnumString, EnumVariantNames};

use crate::{Color, CrateRng, Scene, Vec3};
use crate::{Dielectric, Lambertian, Metal, NormalShader, Sphere};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[allow(non_snake_case)]
/// Return a `Config` built from command line args
pub fn GLOBAL() -> &'static Config {
    CONFIG.get_or_init(Config::from_args)
}

#[derive(Clone, Debug, PartialEq, StructOpt)]
pub struct Config {
    #[structopt(short, long, default_value = "400", display_order = 0)]
    /// Width of render
    pub width: NonZeroUsize,

    #[structopt(short, long, default_value = "225", display_order = 1)]
    /// Height of render
    pub height: NonZeroUsize,

    #[structopt(short, long, default_value = "100")]
    /// Number of samples per pixel
    pub samples: u32,

    #[structopt(short = "m", long = "max-depth", default_value = "50")]
    /// Maximum ray bounce depth
    pub recursion_limit: u32,

    #[structopt(short, long, default_value = "2")]
    /// Gamma the finished image is corrected with
    pub gamma: f64,

    #[structopt(long, default_value = "13,2,3")]
    /// Camera position, as x,y,z
    pub position: Vec3,

    #[structopt(long, default_value = "0,0,0")]
    /// Point the camera looks at, as x,y,z
    pub look_at: Vec3,

    #[structopt(long, default_value = "0,1,0")]
    /// Which way is up for the camera, as x,y,z
    pub view_up: Vec3,

    #[structopt(long, default_value = "20", parse(try_from_str = parse_degrees))]
    /// Vertical field of view in degrees
    pub fov: f64,

    #[structopt(
        long = "defocus",
        default_value = "0.6",
        parse(try_from_str = parse_degrees),
    )]
    /// Angle of the cone of rays through each pixel, in degrees. 0 disables depth of field
    pub defocus_angle: f64,

    #[structopt(long, default_value = "10")]
    /// Distance to the plane in focus
    pub focal_length: f64,

    #[structopt(short, long)]
    /// Number of render threads. Defaults to the number of cpus
    pub threads: Option<NonZeroUsize>,

    #[structopt(short = "r", long = "rng")]
    /// Use a specific seed for the rng.
    pub seed: Option<u64>,

    #[structopt(
        help = "Don't log render progress",
        long = "no-progress",
        // Hide progress if the flag is given at least once
        parse(from_occurrences = invert_bool),
    )]
    /// Controls progress logging
    pub progress: bool,

    #[structopt(short, long, parse(from_occurrences))]
    /// Log more. Once for debug output, twice for trace
    pub verbose: u8,

    #[structopt(short, long, default_value = "render.png", parse(from_os_str))]
    /// Where to write the PNG
    pub output: PathBuf,

    #[structopt(
        default_value = "Random",
        // Using this instead of possible_values because possible_values doesn't wrap properly
        parse(try_from_str = parse_preset),
    )]
    /// The scene to render
    pub preset: Preset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: NonZeroUsize::new(400).unwrap(),
            height: NonZeroUsize::new(225).unwrap(),
            samples: 100,
            recursion_limit: 50,
            gamma: 2.,
            position: Vec3::new(13., 2., 3.),
            look_at: Vec3::ORIGIN,
            view_up: Vec3::UNIT_Y,
            fov: 20f64.to_radians(),
            defocus_angle: 0.6f64.to_radians(),
            focal_length: 10.,
            threads: None,
            seed: None,
            progress: true,
            verbose: 0,
            output: PathBuf::from("render.png"),
            preset: Preset::Random,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.gamma.is_finite() && self.gamma > 0.,
            "Gamma must be a positive number: {}",
            self.gamma
        );
        Ok(())
    }

    /// Number of render threads, at least 1.
    pub fn threads(&self) -> usize {
        match self.threads {
            Some(n) => n.get(),
            None => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// A fresh rng, seeded with `seed` if there is one.
    pub fn rng(&self) -> CrateRng {
        match self.seed {
            Some(seed) => CrateRng::seed_from_u64(seed),
            None => CrateRng::from_entropy(),
        }
    }
}

fn parse_preset(s: &str) -> Result<Preset> {
    s.parse::<Preset>().map_err(|_| {
        anyhow!(
            "\"{}\" isn't a Preset.\nPossible values: {:#?}",
            s,
            Preset::VARIANTS
        )
    })
}

fn parse_degrees(s: &str) -> Result<f64> {
    let degrees = s
        .parse::<f64>()
        .map_err(|_| anyhow!("\"{}\" isn't an angle in degrees", s))?;
    Ok(degrees.to_radians())
}

fn invert_bool(i: u64) -> bool {
    i == 0
}

#[derive(Copy, Clone, Debug, StrumDisplay, EnumString, EnumVariantNames, PartialEq)]
pub enum Preset {
    Random,
    Balls,
    Normals,
}

impl Preset {
    pub fn create(self, rng: &mut CrateRng) -> Result<Scene> {
        use Preset::*;

        let mut scene = Scene::new();
        match self {
            Random => {
                let ground = scene.add_material(Lambertian::from([0.5, 0.5, 0.5]));
                let glass = scene.add_material(Dielectric::clear(1.5));
                let brown = scene.add_material(Lambertian::from([0.4, 0.2, 0.1]));
                let metal = scene.add_material(Metal::from([0.7, 0.6, 0.5], 0.));

                scene.add_object(Sphere::from([0., -1000., 0.], 1000., ground))?;
                scene.add_object(Sphere::from([0., 1., 0.], 1., glass))?;
                scene.add_object(Sphere::from([-4., 1., 0.], 1., brown))?;
                scene.add_object(Sphere::from([4., 1., 0.], 1., metal))?;
                let fixed = scene.materials().len();

                for _ in 0..50 {
                    let kind = rng.gen::<f64>();
                    let albedo = Color::rand(rng);
                    let p = rng.gen_range(0., 0.5);
                    if kind < 0.5 {
                        // diffuse
                        scene.add_material(Lambertian::new(albedo));
                    } else if kind < 0.9 {
                        // metal
                        scene.add_material(Metal::new(albedo, p));
                    } else {
                        // glass, refractive index between 1.1 and 1.6
                        scene.add_material(Dielectric::clear(1.1 + p));
                    }
                }

                for a in -3..3 {
                    for b in -3..3 {
                        let (x, z) = (0.9 * rng.gen::<f64>(), 0.9 * rng.gen::<f64>());
                        let center = Vec3::new(a as f64 + x, 0.2, b as f64 + z);
                        if (center - Vec3::new(4., 0.2, 0.)).norm() <= 0.9 {
                            continue;
                        }
                        let material = rng.gen_range(fixed, scene.materials().len());
                        scene.add_object(Sphere::new(center, 0.2, material))?;
                    }
                }
            }
            Balls => {
                let ground = scene.add_material(Lambertian::from([0.8, 0.8, 0.]));
                let glass = scene.add_material(Dielectric::clear(1.5));
                let gold = scene.add_material(Metal::from([0.8, 0.6, 0.2], 0.));
                let blue = scene.add_material(Lambertian::from([0.1, 0.2, 0.5]));

                scene.add_object(Sphere::from([0., -100.5, -1.], 100., ground))?;
                scene.add_object(Sphere::from([0., 0., -1.], 0.5, glass))?;
                scene.add_object(Sphere::from([1.5, 0., -1.], 0.5, gold))?;
                scene.add_object(Sphere::from([-1.05, 0., -1.], 0.5, blue))?;
                scene.add_object(Sphere::from([1.5, 0., -2.5], 0.5, gold))?;
                scene.add_object(Sphere::from([-1.05, 0., -2.5], 0.5, blue))?;
            }
            Normals => {
                let normals = scene.add_material(NormalShader);

                scene.add_object(Sphere::from([0., -1000., 0.], 1000., normals))?;
                scene.add_object(Sphere::from([0., 1., 0.], 1., normals))?;
                scene.add_object(Sphere::from([-4., 1., 0.], 1., normals))?;
                scene.add_object(Sphere::from([4., 1., 0.], 1., normals))?;
            }
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod parse_test {
    use super::*;

    #[test]
    fn right_case() {
        assert_eq!("Random".parse::<Preset>().unwrap(), Preset::Random);
        assert_eq!("Normals".parse::<Preset>().unwrap(), Preset::Normals);
    }

    #[test]
    fn wrong_case() {
        "random".parse::<Preset>().unwrap_err();
        "rANDOM".parse::<Preset>().unwrap_err();
        "balls".parse::<Preset>().unwrap_err();
        "Two_spheres".parse::<Preset>().unwrap_err();
        parse_preset("normals").unwrap_err();
    }

    #[test]
    fn degrees() {
        assert!((parse_degrees("180").unwrap() - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(parse_degrees("0").unwrap(), 0.);
        parse_degrees("ninety").unwrap_err();
    }

    #[test]
    fn defaults_match_command_line() {
        let config = Config::from_iter(vec!["pathtracing"]);
        assert_eq!(config, Config::default());
        assert!(config.progress);
    }

    #[test]
    fn flags() {
        let config = Config::from_iter(vec![
            "pathtracing",
            "-w",
            "64",
            "-h",
            "48",
            "-s",
            "0",
            "--position",
            "1, 2.5, -3",
            "--fov",
            "90",
            "--no-progress",
            "-v",
            "-r",
            "11",
            "-t",
            "3",
            "Balls",
        ]);
        assert_eq!(config.width.get(), 64);
        assert_eq!(config.height.get(), 48);
        assert_eq!(config.samples, 0);
        assert_eq!(config.position, Vec3::new(1., 2.5, -3.));
        assert!((config.fov - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(!config.progress);
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.threads(), 3);
        assert_eq!(config.preset, Preset::Balls);
    }

    #[test]
    fn bad_flags() {
        Config::from_iter_safe(vec!["pathtracing", "-w", "0"]).unwrap_err();
        Config::from_iter_safe(vec!["pathtracing", "--position", "1,2"]).unwrap_err();
        Config::from_iter_safe(vec!["pathtracing", "random"]).unwrap_err();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gamma_must_be_positive() {
        Config::default().validate().unwrap();
        for &gamma in [0., -2., f64::NAN, f64::INFINITY].iter() {
            let config = Config {
                gamma,
                ..Config::default()
            };
            config.validate().unwrap_err();
        }
    }

    #[test]
    fn threads_at_least_one() {
        assert!(Config::default().threads() >= 1);
    }

    #[test]
    fn log_levels() {
        let level = |verbose| Config { verbose, ..Config::default() }.log_level();
        assert_eq!(level(0), LevelFilter::Info);
        assert_eq!(level(1), LevelFilter::Debug);
        assert_eq!(level(2), LevelFilter::Trace);
        assert_eq!(level(9), LevelFilter::Trace);
    }

    #[test]
    fn progress_shows_by_default() {
        let config = Config::default();
        assert!(config.progress);
        assert!(config.log_level() >= log::Level::Info);
    }

    #[test]
    fn random_preset() {
        let config = Config {
            seed: Some(5),
            ..Config::default()
        };
        let scene = Preset::Random.create(&mut config.rng()).unwrap();
        assert_eq!(scene.materials().len(), 54);
        assert!(scene.objects().len() >= 4 && scene.objects().len() <= 4 + 36);
        // Small spheres only use the random materials
        assert!(scene.objects()[4..]
            .iter()
            .all(|obj| obj.material_id() >= 4));

        let again = Preset::Random.create(&mut config.rng()).unwrap();
        assert_eq!(format!("{:?}", scene), format!("{:?}", again));
    }

    #[test]
    fn fixed_presets() {
        let mut rng = Config::default().rng();
        let balls = Preset::Balls.create(&mut rng).unwrap();
        assert_eq!(balls.objects().len(), 6);
        let normals = Preset::Normals.create(&mut rng).unwrap();
        assert_eq!(normals.materials().len(), 1);
        assert_eq!(normals.objects().len(), 4);
    }
}
