use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::{Ray, RayParams, Vec3};

/// Where and how a ray met a surface.
#[derive(Copy, Clone, Debug)]
pub struct Intersection {
    /// Distance along the ray
    pub parametric: f64,
    pub point: Vec3,
    /// Unit normal pointing out of the solid
    pub outward_normal: Vec3,
    /// Unit normal on the same side as the incoming ray
    pub local_normal: Vec3,
    /// Hit the outside (front face) of the surface
    pub front: bool,
    /// Index into the scene's materials
    pub material_id: usize,
    /// The ray that produced this intersection
    pub ray: Ray,
}
impl Intersection {
    /// `outward_normal` must be unit length. The local normal and `front` are derived from
    /// the direction of `ray`.
    pub fn new(parametric: f64, ray: Ray, outward_normal: Vec3, material_id: usize) -> Self {
        // A ray travelling along the outward normal started inside the surface
        let front = ray.dir().dot(outward_normal) <= 0.;
        let local_normal = if front {
            outward_normal
        } else {
            -outward_normal
        };
        Self {
            parametric,
            point: ray.at(parametric),
            outward_normal,
            local_normal,
            front,
            material_id,
            ray,
        }
    }
}

/// Scene geometry.
pub trait Object: DynClone + Send + Sync + Debug {
    /// The nearest intersection whose distance lies in the window of `params`, if any.
    fn intersect(&self, params: &RayParams) -> Option<Intersection>;
    /// The material every intersection with this object reports.
    fn material_id(&self) -> usize;
}
dyn_clone::clone_trait_object!(Object);
