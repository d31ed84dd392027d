use anyhow::{ensure, Result};

use crate::{Color, CrateRng, Interaction, Intersection, Material, Object, Ray, RayParams};

/// Hits closer than this to a ray's origin are ignored, which keeps scattered rays from
/// re-hitting the surface they left ("shadow acne").
pub const ACNE_T_MIN: f64 = 0.001;

/// Everything that can be rendered. Objects refer to materials by their index in
/// `materials`, so every `material_id` is a valid index.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<Box<dyn Object>>,
    materials: Vec<Box<dyn Material>>,
}
impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id objects use to refer to `material`.
    pub fn add_material<M: Material + 'static>(&mut self, material: M) -> usize {
        self.materials.push(Box::new(material));
        self.materials.len() - 1
    }

    /// Fails if `object` refers to a material that hasn't been added.
    pub fn add_object<O: Object + 'static>(&mut self, object: O) -> Result<()> {
        ensure!(
            object.material_id() < self.materials.len(),
            "Object refers to material {} but the scene only has {} materials: {:?}",
            object.material_id(),
            self.materials.len(),
            object,
        );
        self.objects.push(Box::new(object));
        Ok(())
    }

    pub fn objects(&self) -> &[Box<dyn Object>] {
        &self.objects
    }

    pub fn materials(&self) -> &[Box<dyn Material>] {
        &self.materials
    }

    /// The hit nearest to the ray's origin within the window of `params`.
    pub fn closest_intersect(&self, params: &RayParams) -> Option<Intersection> {
        let mut closest: Option<Intersection> = None;
        for obj in &self.objects {
            if let Some(hit) = obj.intersect(params) {
                if closest.map_or(true, |c| hit.parametric < c.parametric) {
                    closest = Some(hit);
                }
            }
        }
        closest
    }

    /// The light arriving along `ray`, following at most `recursion_limit` bounces.
    ///
    /// Each bounce multiplies its attenuation into a running product, so deep limits don't
    /// grow the stack.
    pub fn color_at(&self, ray: &Ray, recursion_limit: u32, rng: &mut CrateRng) -> Color {
        let mut attenuation = Color::WHITE;
        let mut ray = *ray;

        for _ in 0..recursion_limit {
            let params = RayParams::new(ray, ACNE_T_MIN);
            let hit = match self.closest_intersect(&params) {
                Some(hit) => hit,
                None => return attenuation * background(&ray),
            };
            let material = &self.materials[hit.material_id];
            match material.interact(&params, &hit, rng) {
                Interaction::Scattered(scatter) => {
                    attenuation = attenuation * scatter.attenuation;
                    ray = scatter.ray;
                }
                Interaction::Terminal(color) => return attenuation * color,
            }
        }

        // Out of bounces, no more light is gathered
        Color::BLACK
    }
}

/// Sky gradient, white at the bottom to blue at the top.
fn background(ray: &Ray) -> Color {
    let t = 0.5 * (ray.dir().y + 1.);
    Color::WHITE.lerp(Color::SKY, t)
}
