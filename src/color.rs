use std::ops;

use rand::Rng;

use crate::{CrateRng, F64Ext, Vec3};

/// Linear RGB. Components are unbounded while accumulating samples and are expected to
/// end up in `0.0..=1.0` after averaging; nothing here clamps them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}
impl Color {
    pub const BLACK: Self = Self::new(0., 0., 0.);
    pub const WHITE: Self = Self::new(1., 1., 1.);
    /// Top of the background gradient
    pub const SKY: Self = Self::new(0.5, 0.7, 1.);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn rand(rng: &mut CrateRng) -> Self {
        let albedo = rng.gen::<[f64; 3]>();
        albedo.into()
    }

    /// Blend from `self` (at `t = 0`) to `other` (at `t = 1`).
    pub fn lerp(self, other: Color, t: f64) -> Self {
        Self::new(
            t.lerp(self.r, other.r),
            t.lerp(self.g, other.g),
            t.lerp(self.b, other.b),
        )
    }

    /// Raise every channel to `1 / gamma`.
    pub fn gamma_corrected(self, gamma: f64) -> Self {
        let correct = |c: f64| {
            if gamma == 1. {
                c
            } else if gamma == 2. {
                c.sqrt()
            } else if gamma == 3. {
                c.cbrt()
            } else {
                c.powf(1. / gamma)
            }
        };
        Self::new(correct(self.r), correct(self.g), correct(self.b))
    }
}

impl From<[f64; 3]> for Color {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}
impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl ops::Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}
impl ops::AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}
impl ops::Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}
impl ops::Mul<f64> for Color {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}
impl ops::Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}
impl ops::Div<f64> for Color {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(Color::WHITE.lerp(Color::SKY, 0.), Color::WHITE);
        assert_eq!(Color::WHITE.lerp(Color::SKY, 1.), Color::SKY);
        assert_eq!(
            Color::BLACK.lerp(Color::WHITE, 0.5),
            Color::new(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn gamma_shortcuts() {
        let c = Color::new(0.25, 0.0625, 1.);
        assert_eq!(c.gamma_corrected(1.), c);
        assert_eq!(c.gamma_corrected(2.), Color::new(0.5, 0.25, 1.));

        let cubed = Color::new(0.125, 0.001, 0.);
        let corrected = cubed.gamma_corrected(3.);
        assert!((corrected.r - 0.5).abs() < 1e-12);
        assert!((corrected.g - 0.1).abs() < 1e-12);
        assert_eq!(corrected.b, 0.);

        let corrected = Color::new(0.0625, 1., 0.).gamma_corrected(4.);
        assert!((corrected.r - 0.5).abs() < 1e-12);
        assert_eq!(corrected.g, 1.);
    }

    #[test]
    fn default_is_black() {
        assert_eq!(Color::default(), Color::BLACK);
    }
}
