pub mod camera;
pub mod color;
pub mod config;
pub mod hit;
pub mod logger;
pub mod material;
pub mod ray;
pub mod render;
pub mod scene;
pub mod screen;
pub mod shape;
pub mod vec3;

pub use camera::{Camera, CameraBuilder, ThinLensCamera};
pub use color::Color;
pub use config::{Config, Preset};
pub use hit::{Intersection, Object};
pub use material::{Dielectric, Interaction, Lambertian, Material, Metal, NormalShader, Scatter};
pub use ray::{Ray, RayParams};
pub use render::{multi_threaded_render, split_samples, Renderer};
pub use scene::Scene;
pub use screen::Screen;
pub use shape::Sphere;
pub use vec3::Vec3;

/// The random number generator threaded through every stochastic call.
pub type CrateRng = rand::rngs::SmallRng;

pub trait F64Ext {
    /// Linear interpolation from `a` (at `self == 0`) to `b` (at `self == 1`).
    fn lerp(self, a: f64, b: f64) -> f64;
}
impl F64Ext for f64 {
    fn lerp(self, a: f64, b: f64) -> f64 {
        (1. - self) * a + self * b
    }
}
