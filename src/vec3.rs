use std::ops;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::CrateRng;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
const ERR_NORMED_0: &str = "Tried to normalize vector of length 0!";
/// Components smaller than this are treated as zero.
const ZERO_EPSILON: f64 = 1e-6;
impl Vec3 {
    pub const ORIGIN: Self = Self::new(0., 0., 0.);
    // The standard basis
    pub const UNIT_X: Self = Self::new(1., 0., 0.);
    pub const UNIT_Y: Self = Self::new(0., 1., 0.);
    pub const UNIT_Z: Self = Self::new(0., 0., 1.);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// # Example
    /// ```
    /// # use pathtracing::vec3::Vec3;
    /// let a = Vec3::new(1., 2., 3.);
    /// let b = Vec3::normalized(a);
    /// assert!((b.norm() - 1.).abs() < 1e-12);
    /// ```
    pub fn normalized(v: Vec3) -> Self {
        let normed = v / v.norm();
        debug_assert!(!normed.is_nan(), "{}", ERR_NORMED_0);
        normed
    }

    /// # Example
    /// ```
    /// # use pathtracing::vec3::Vec3;
    /// let a = Vec3::new(0., 0., 0.);
    /// assert!(Vec3::checked_normalized(a).is_err());
    /// ```
    pub fn checked_normalized(v: Vec3) -> Result<Self> {
        let norm = v.norm();
        ensure!(norm != 0., ERR_NORMED_0);
        Ok(v / norm)
    }

    /// A random unit vector, obtained by normalizing a uniform sample from the unit ball.
    pub fn rand_unit(rng: &mut CrateRng) -> Self {
        loop {
            let p = InUnitBall.sample(rng);
            // The origin itself can't be normalized
            if p.norm_squared() > 0. {
                return Vec3::normalized(p);
            }
        }
    }

    /// Samples uniformly from the unit disk in the `x` and `y` dimensions. `z` is 0.
    pub fn rand_unit_disk(rng: &mut CrateRng) -> Self {
        InUnitDisk.sample(rng)
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    pub fn norm_squared(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2) + self.z.powi(2)
    }

    /// # Example
    /// ```
    /// # use pathtracing::vec3::Vec3;
    /// let a = Vec3::new(4., 8., 10.);
    /// let b = Vec3::new(9., 2., 7.);
    /// assert_eq!(a.dot(b), 122.);
    /// ```
    pub fn dot(&self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// # Example
    /// ```
    /// # use pathtracing::vec3::Vec3;
    /// let a = Vec3::new(2., 3., 4.);
    /// let b = Vec3::new(5., 6., 7.);
    /// assert_eq!(a.cross(b), Vec3::new(-3., 6., -3.));
    /// ```
    pub fn cross(&self, rhs: Vec3) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Mirror `self` about `normal`. `normal` must be unit length.
    ///
    /// # Example
    /// ```
    /// # use pathtracing::vec3::Vec3;
    /// let v = Vec3::new(1., -1., 0.);
    /// assert_eq!(v.reflect(Vec3::UNIT_Y), Vec3::new(1., 1., 0.));
    /// ```
    pub fn reflect(&self, normal: Vec3) -> Self {
        *self - 2. * self.dot(normal) * normal
    }

    /// Bend the unit vector `self` through a surface with unit `normal` using Snell's law.
    pub fn refract(&self, normal: Vec3, eta_i_over_eta_t: f64) -> Self {
        let cos_theta = (-*self).dot(normal).min(1.);
        let refract_perp = eta_i_over_eta_t * (*self + cos_theta * normal);
        let refract_parallel = -normal * (1. - refract_perp.norm_squared()).abs().sqrt();
        refract_perp + refract_parallel
    }

    /// True if every component is numerically zero.
    pub fn is_near_zero(&self) -> bool {
        self.x.abs() < ZERO_EPSILON && self.y.abs() < ZERO_EPSILON && self.z.abs() < ZERO_EPSILON
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Parses `x,y,z`
impl FromStr for Vec3 {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .with_context(|| format!("\"{}\" isn't a number", part.trim()))
            })
            .collect::<Result<Vec<_>>>()?;
        match parts[..] {
            [x, y, z] => Ok(Self::new(x, y, z)),
            _ => Err(anyhow!("Expected 3 comma separated numbers, got \"{}\"", s)),
        }
    }
}

/// Uniform distribution over the interior of the unit ball, by rejection sampling.
#[derive(Copy, Clone, Debug)]
pub struct InUnitBall;
impl Distribution<Vec3> for InUnitBall {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let side = Uniform::new(-1., 1.);
        loop {
            let p = Vec3::new(side.sample(rng), side.sample(rng), side.sample(rng));
            if p.norm_squared() < 1. {
                return p;
            }
        }
    }
}

/// Uniform distribution over the unit disk in the `z = 0` plane, by rejection sampling.
#[derive(Copy, Clone, Debug)]
pub struct InUnitDisk;
impl Distribution<Vec3> for InUnitDisk {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let side = Uniform::new(-1., 1.);
        loop {
            let p = Vec3::new(side.sample(rng), side.sample(rng), 0.);
            if p.norm_squared() < 1. {
                return p;
            }
        }
    }
}

impl ops::Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Componentwise `Vec3 op Vec3`, with its assigning form.
macro_rules! vec_op {
    ($op:ident, $fn:ident, $op_assign:ident, $fn_assign:ident) => {
        impl ops::$op for Vec3 {
            type Output = Self;

            fn $fn(self, rhs: Self) -> Self::Output {
                Self::new(
                    ops::$op::$fn(self.x, rhs.x),
                    ops::$op::$fn(self.y, rhs.y),
                    ops::$op::$fn(self.z, rhs.z),
                )
            }
        }
        impl ops::$op_assign for Vec3 {
            fn $fn_assign(&mut self, rhs: Self) {
                *self = ops::$op::$fn(*self, rhs);
            }
        }
    };
}
vec_op!(Add, add, AddAssign, add_assign);
vec_op!(Sub, sub, SubAssign, sub_assign);

/// `Vec3 op f64` applied to every component, with its assigning form.
macro_rules! scalar_op {
    ($op:ident, $fn:ident, $op_assign:ident, $fn_assign:ident) => {
        impl ops::$op<f64> for Vec3 {
            type Output = Self;

            fn $fn(self, rhs: f64) -> Self::Output {
                Self::new(
                    ops::$op::$fn(self.x, rhs),
                    ops::$op::$fn(self.y, rhs),
                    ops::$op::$fn(self.z, rhs),
                )
            }
        }
        impl ops::$op_assign<f64> for Vec3 {
            fn $fn_assign(&mut self, rhs: f64) {
                *self = ops::$op::$fn(*self, rhs);
            }
        }
    };
}
scalar_op!(Mul, mul, MulAssign, mul_assign);
scalar_op!(Div, div, DivAssign, div_assign);

impl ops::Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}
