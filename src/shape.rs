use crate::{Intersection, Object, RayParams, Vec3};

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub material_id: usize,
}
impl Sphere {
    pub fn new(center: Vec3, radius: f64, material_id: usize) -> Self {
        Self {
            center,
            radius,
            material_id,
        }
    }
    pub fn from(c: [f64; 3], radius: f64, material_id: usize) -> Self {
        Self::new(c.into(), radius, material_id)
    }
}
impl Object for Sphere {
    fn intersect(&self, params: &RayParams) -> Option<Intersection> {
        let ray = params.ray;
        let oc = ray.origin() - self.center;
        let a = ray.dir().norm_squared();
        let half_b = oc.dot(ray.dir());
        let c = oc.norm_squared() - self.radius.powi(2);
        let disciminant = half_b.powi(2) - a * c;

        if disciminant < 0. {
            return None;
        }

        let root = disciminant.sqrt();
        // Try the nearer root first
        let t = [(-half_b - root) / a, (-half_b + root) / a]
            .iter()
            .copied()
            .find(|&t| params.contains(t))?;

        let outward_normal = (ray.at(t) - self.center) / self.radius;
        Some(Intersection::new(t, ray, outward_normal, self.material_id))
    }

    fn material_id(&self) -> usize {
        self.material_id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Ray;

    fn unit_sphere() -> Sphere {
        Sphere::from([0., 0., 0.], 1., 0)
    }

    #[test]
    fn nearer_root() {
        let ray = Ray::new(Vec3::new(0., 0., 5.), -Vec3::UNIT_Z);
        let hit = unit_sphere()
            .intersect(&RayParams::new(ray, 0.001))
            .unwrap();
        assert!((hit.parametric - 4.).abs() < 1e-12);
        assert!((hit.point - Vec3::new(0., 0., 1.)).norm() < 1e-12);
        assert!(hit.front);
        assert!((hit.local_normal - Vec3::UNIT_Z).norm() < 1e-12);
    }

    #[test]
    fn roots_symmetric_about_closest_approach() {
        // Closest approach to the center is at t = 5
        let ray = Ray::new(Vec3::new(0.5, 0., 5.), -Vec3::UNIT_Z);
        let sphere = unit_sphere();
        let near = sphere.intersect(&RayParams::new(ray, 0.)).unwrap();
        let far = sphere
            .intersect(&RayParams::new(ray, near.parametric + 1e-9))
            .unwrap();
        assert!(((5. - near.parametric) - (far.parametric - 5.)).abs() < 1e-12);
    }

    #[test]
    fn falls_back_to_farther_root() {
        let ray = Ray::new(Vec3::new(0., 0., 5.), -Vec3::UNIT_Z);
        let hit = unit_sphere()
            .intersect(&RayParams::new(ray, 4.5))
            .unwrap();
        assert!((hit.parametric - 6.).abs() < 1e-12);
        // Leaving the sphere, so the local normal faces back inside
        assert!(!hit.front);
        assert!((hit.outward_normal + Vec3::UNIT_Z).norm() < 1e-12);
        assert!((hit.local_normal - Vec3::UNIT_Z).norm() < 1e-12);
    }

    #[test]
    fn from_inside() {
        let ray = Ray::new(Vec3::ORIGIN, Vec3::UNIT_X);
        let hit = unit_sphere()
            .intersect(&RayParams::new(ray, 0.001))
            .unwrap();
        assert!((hit.parametric - 1.).abs() < 1e-12);
        assert!(!hit.front);
        assert!((hit.local_normal + Vec3::UNIT_X).norm() < 1e-12);
    }

    #[test]
    fn misses() {
        let sphere = unit_sphere();
        // Passes beside the sphere
        let ray = Ray::new(Vec3::new(2., 0., 5.), -Vec3::UNIT_Z);
        assert!(sphere.intersect(&RayParams::new(ray, 0.001)).is_none());
        // Sphere is behind the origin
        let ray = Ray::new(Vec3::new(0., 0., 5.), Vec3::UNIT_Z);
        assert!(sphere.intersect(&RayParams::new(ray, 0.001)).is_none());
        // Both roots beyond t_max
        let ray = Ray::new(Vec3::new(0., 0., 5.), -Vec3::UNIT_Z);
        assert!(sphere
            .intersect(&RayParams::with_range(ray, 0.001, 3.))
            .is_none());
    }
}
