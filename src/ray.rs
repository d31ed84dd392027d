use crate::Vec3;

/// A half-line from `origin` along a unit-length direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    dir: Vec3,
}
impl Ray {
    /// Normalizes `dir`.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self::from_unit(origin, Vec3::normalized(dir))
    }

    /// `dir` must already be unit length.
    pub fn from_unit(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + t * self.dir
    }
}

/// A ray plus the window of distances in which an intersection counts.
#[derive(Copy, Clone, Debug)]
pub struct RayParams {
    pub ray: Ray,
    /// Hits closer than this are ignored. Keeps a scattered ray from hitting the surface it
    /// left through floating point error.
    pub t_min: f64,
    pub t_max: f64,
}
impl RayParams {
    /// Accept every hit from `t_min` on.
    pub fn new(ray: Ray, t_min: f64) -> Self {
        Self::with_range(ray, t_min, f64::INFINITY)
    }

    pub fn with_range(ray: Ray, t_min: f64, t_max: f64) -> Self {
        Self { ray, t_min, t_max }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, t: f64) -> bool {
        self.t_min <= t && t <= self.t_max
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_normalizes() {
        let ray = Ray::new(Vec3::ORIGIN, Vec3::new(0., 3., 4.));
        assert!((ray.dir().norm() - 1.).abs() < 1e-12);
        assert!((ray.at(5.) - Vec3::new(0., 3., 4.)).norm() < 1e-12);
    }

    #[test]
    fn window_is_inclusive() {
        let params = RayParams::with_range(Ray::new(Vec3::ORIGIN, Vec3::UNIT_Z), 1., 2.);
        assert!(params.contains(1.));
        assert!(params.contains(2.));
        assert!(!params.contains(0.999));
        assert!(!params.contains(2.001));
        assert!(RayParams::new(params.ray, 0.001).contains(f64::MAX));
    }
}
