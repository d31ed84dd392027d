use std::fmt::Debug;

use dyn_clone::DynClone;
use rand::Rng;

use crate::{Color, CrateRng, Intersection, Ray, RayParams, Vec3};

/// A scattered ray and its color information
#[derive(Copy, Clone, Debug)]
pub struct Scatter {
    pub attenuation: Color,
    pub ray: Ray,
}
impl Scatter {
    pub fn new(attenuation: Color, ray: Ray) -> Self {
        Self { attenuation, ray }
    }
}

/// The outcome of a ray meeting a material.
#[derive(Copy, Clone, Debug)]
pub enum Interaction {
    /// Keep tracing `Scatter::ray`, tinted by `Scatter::attenuation`.
    Scattered(Scatter),
    /// Stop here. The color is the final contribution of this path.
    Terminal(Color),
}
impl Interaction {
    pub fn continues(&self) -> bool {
        matches!(self, Interaction::Scattered(_))
    }

    pub fn attenuation(&self) -> Color {
        match self {
            Interaction::Scattered(scatter) => scatter.attenuation,
            Interaction::Terminal(color) => *color,
        }
    }

    /// The ray to keep tracing, if any.
    pub fn scattered(&self) -> Option<Ray> {
        match self {
            Interaction::Scattered(scatter) => Some(scatter.ray),
            Interaction::Terminal(_) => None,
        }
    }
}

pub trait Material: DynClone + Send + Sync + Debug {
    /// Decide what happens to `params.ray` at `hit`.
    fn interact(&self, params: &RayParams, hit: &Intersection, rng: &mut CrateRng)
        -> Interaction;
}
dyn_clone::clone_trait_object!(Material);

#[derive(Clone, Debug)]
/// Diffuse reflection
pub struct Lambertian {
    pub albedo: Color,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from(a: [f64; 3]) -> Self {
        Self::new(a.into())
    }
}
impl Default for Lambertian {
    /// Gray
    fn default() -> Self {
        Self::from([0.5, 0.5, 0.5])
    }
}
impl Material for Lambertian {
    fn interact(&self, _params: &RayParams, hit: &Intersection, rng: &mut CrateRng) -> Interaction {
        let mut scatter_dir = hit.local_normal + Vec3::rand_unit(rng);
        // The random vector cancelled out the normal
        if scatter_dir.is_near_zero() {
            scatter_dir = hit.local_normal;
        }
        if scatter_dir.dot(hit.local_normal) < 0. {
            scatter_dir = -scatter_dir;
        }
        let scattered = Ray::new(hit.point, scatter_dir);
        Interaction::Scattered(Scatter::new(self.albedo, scattered))
    }
}

#[derive(Clone, Debug)]
pub struct Metal {
    pub albedo: Color,
    /// The fuzziness of the Metal. Is between `0.0` and `1.0`
    pub fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        let fuzz = fuzz.max(0.).min(1.);
        Self { albedo, fuzz }
    }

    pub fn from(a: [f64; 3], fuzz: f64) -> Self {
        Self::new(a.into(), fuzz)
    }
}
impl Material for Metal {
    fn interact(&self, _params: &RayParams, hit: &Intersection, rng: &mut CrateRng) -> Interaction {
        let mut reflected = hit.ray.dir().reflect(hit.local_normal);
        if self.fuzz > 0. {
            reflected += self.fuzz * Vec3::rand_unit(rng);
        }
        let scattered = Ray::new(hit.point, reflected);

        // The fuzz scattered below the surface, so the ray is absorbed
        if scattered.dir().dot(hit.local_normal) < 0. {
            return Interaction::Terminal(Color::BLACK);
        }
        Interaction::Scattered(Scatter::new(self.albedo, scattered))
    }
}

#[derive(Clone, Debug)]
pub struct Dielectric {
    /// Glass doesn't absorb, so this is usually white
    pub albedo: Color,
    pub ref_index: f64,
}
impl Dielectric {
    pub fn new(albedo: Color, ref_index: f64) -> Self {
        Self { albedo, ref_index }
    }

    /// Clear glass with refractive index `ref_index`
    pub fn clear(ref_index: f64) -> Self {
        Self::new(Color::WHITE, ref_index)
    }

    /// Schlick's approximation of the Fresnel reflectance.
    pub fn schlick(cos: f64, eta_i_over_eta_t: f64) -> f64 {
        let r0 = (1. - eta_i_over_eta_t) / (1. + eta_i_over_eta_t);
        let r0 = r0 * r0;
        r0 + (1. - r0) * (1. - cos).powi(5)
    }
}
impl Default for Dielectric {
    fn default() -> Self {
        Self::clear(1.5)
    }
}
impl Material for Dielectric {
    fn interact(&self, params: &RayParams, hit: &Intersection, rng: &mut CrateRng) -> Interaction {
        let eta_i_over_eta_t = if hit.front {
            1. / self.ref_index
        } else {
            self.ref_index
        };
        let unit_dir = params.ray.dir();
        let cos_theta = (-unit_dir).dot(hit.local_normal).min(1.0);
        let sin_theta = (1. - cos_theta.powi(2)).sqrt();

        // No solution to Snell's law means total internal reflection
        let dir = if eta_i_over_eta_t * sin_theta > 1.0
            || rng.gen::<f64>() < Self::schlick(cos_theta, eta_i_over_eta_t)
        {
            unit_dir.reflect(hit.local_normal)
        } else {
            unit_dir.refract(hit.local_normal, eta_i_over_eta_t)
        };

        let scattered = Ray::new(hit.point, dir);
        Interaction::Scattered(Scatter::new(self.albedo, scattered))
    }
}

#[derive(Clone, Debug)]
/// Used for debugging. Colors the surface by its normal and stops the path.
pub struct NormalShader;
impl Material for NormalShader {
    fn interact(&self, _params: &RayParams, hit: &Intersection, _rng: &mut CrateRng) -> Interaction {
        let shade = 0.5 * (hit.local_normal + Vec3::new(1., 1., 1.));
        Interaction::Terminal(shade.into())
    }
}
