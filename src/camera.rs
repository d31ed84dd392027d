use std::fmt::Debug;

use anyhow::{ensure, Context, Result};
use rand::Rng;

use crate::{Config, CrateRng, Ray, Vec3};

pub trait Camera: Sync + Debug {
    /// The ray through pixel (`row`, `col`), where (0, 0) is the top left pixel.
    ///
    /// With `jitter` the ray passes through a uniformly random point of the pixel instead of
    /// its center.
    fn get_ray(&self, row: usize, col: usize, jitter: bool, rng: &mut CrateRng) -> Ray;
}

/// A pinhole camera with an optional thin lens for depth of field. All angles are in
/// radians.
#[derive(Clone, Debug)]
pub struct ThinLensCamera {
    position: Vec3,
    /// Unit vector the camera looks along
    direction: Vec3,
    /// Width part of the orthonormal basis.
    right: Vec3,
    /// Height part of the orthonormal basis.
    up: Vec3,
    /// Distance from `position` to the viewport, which is also the plane in focus
    focal_length: f64,
    fov: f64,
    width: usize,
    height: usize,
    aspect_ratio: f64,
    viewport_width: f64,
    viewport_height: f64,
    /// Horizontal spacing between adjacent pixels on the viewport
    delta_x: f64,
    /// Vertical spacing between adjacent pixels on the viewport
    delta_y: f64,
    defocus_angle: f64,
    /// Radius of the disk rays originate from. Only used when `defocus_angle > 0`.
    defocus_radius: f64,
}
impl ThinLensCamera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder()
            .position(config.position)
            .look_at(config.look_at)
            .view_up(config.view_up)
            .fov(config.fov)
            .defocus_angle(config.defocus_angle)
            .focal_length(config.focal_length)
            .image_size(config.width.get(), config.height.get())
            .build()
    }

    /// A random point on the defocus disk
    fn defocused_origin(&self, rng: &mut CrateRng) -> Vec3 {
        let p = self.defocus_radius * Vec3::rand_unit_disk(rng);
        self.position + p.x * self.up + p.y * self.right
    }
}
impl Camera for ThinLensCamera {
    fn get_ray(&self, row: usize, col: usize, jitter: bool, rng: &mut CrateRng) -> Ray {
        // Pixel coordinates relative to the image center, y pointing up
        let x0 = (self.width as f64 / 2.).max(1.);
        let y0 = (self.height as f64 / 2.).max(1.);
        let x = col as f64 - x0;
        let y = y0 - row as f64;

        let mut vx = x * self.delta_x;
        let mut vy = y * self.delta_y;
        if jitter {
            vx += (rng.gen::<f64>() - 0.5) * self.delta_x;
            vy += (rng.gen::<f64>() - 0.5) * self.delta_y;
        }

        let pixel_sample =
            self.position + vy * self.up + vx * self.right + self.focal_length * self.direction;
        let origin = if self.defocus_angle > 0. {
            self.defocused_origin(rng)
        } else {
            self.position
        };

        Ray::new(origin, pixel_sample - origin)
    }
}

#[derive(Debug)]
pub struct CameraBuilder {
    position: Vec3,
    look_at: Vec3,
    view_up: Vec3,
    /// Vertical field of view
    fov: f64,
    /// Used for depth of field. Set to `0.0` to disable depth of field.
    defocus_angle: f64,
    focal_length: f64,
    width: usize,
    height: usize,
}
impl CameraBuilder {
    pub fn build(&self) -> Result<ThinLensCamera> {
        ensure!(
            self.width > 0 && self.height > 0,
            "Image size must be non-zero: {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.focal_length > 0.,
            "Focal length must be positive: {}",
            self.focal_length
        );
        ensure!(
            0. < self.fov && self.fov < std::f64::consts::PI,
            "Field of view must be between 0 and 180 degrees: {} degrees",
            self.fov.to_degrees()
        );
        let (width, height) = (self.width as f64, self.height as f64);

        // Form the orthonormal basis with the Gram-Schmidt process.
        // Also deal with bad camera configurations.

        // Error if camera's position and look_at are the same.
        let direction = Vec3::checked_normalized(self.look_at - self.position)
            .with_context(|| {
                format!(
                    "Camera's position and look_at vectors are the same.\nPosition: {:?}",
                    self.position,
                )
            })
            .camera_context(self)?;

        // Error if the view_up vector has length 0.
        Vec3::checked_normalized(self.view_up)
            .with_context(|| format!("Camera's view_up vector has length 0: {:?}", self.view_up))
            .camera_context(self)?;

        // Error if the view direction and view_up are parallel.
        let right = Vec3::checked_normalized(direction.cross(self.view_up))
            .with_context(|| {
                format!(
                    "Camera's view direction and view_up vectors are parallel.\nResp.: {:?} || {:?}",
                    direction, self.view_up,
                )
            })
            .camera_context(self)?;

        let up = Vec3::normalized(right.cross(direction));

        let aspect_ratio = width / height;
        let viewport_height = 2. * (self.fov / 2.).tan() * self.focal_length;
        let viewport_width = aspect_ratio * viewport_height;

        Ok(ThinLensCamera {
            position: self.position,
            direction,
            right,
            up,
            focal_length: self.focal_length,
            fov: self.fov,
            width: self.width,
            height: self.height,
            aspect_ratio,
            viewport_width,
            viewport_height,
            delta_x: viewport_width / width,
            delta_y: viewport_height / height,
            defocus_angle: self.defocus_angle,
            defocus_radius: self.focal_length * (self.defocus_angle / 2.).tan(),
        })
    }
    // ===== Builder Methods =====
    pub fn position<T: Into<Vec3>>(&mut self, position: T) -> &mut Self {
        self.position = position.into();
        self
    }
    pub fn look_at<T: Into<Vec3>>(&mut self, look_at: T) -> &mut Self {
        self.look_at = look_at.into();
        self
    }
    pub fn view_up<T: Into<Vec3>>(&mut self, view_up: T) -> &mut Self {
        self.view_up = view_up.into();
        self
    }
    /// Vertical field of view in radians
    pub fn fov(&mut self, fov: f64) -> &mut Self {
        self.fov = fov;
        self
    }
    pub fn fov_degrees(&mut self, fov: f64) -> &mut Self {
        self.fov(fov.to_radians())
    }
    /// Used for depth of field. Set to `0.0` to disable depth of field.
    pub fn defocus_angle(&mut self, angle: f64) -> &mut Self {
        self.defocus_angle = angle;
        self
    }
    pub fn focal_length(&mut self, focal_length: f64) -> &mut Self {
        self.focal_length = focal_length;
        self
    }
    pub fn image_size(&mut self, width: usize, height: usize) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }
}
impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            position: Vec3::new(13., 2., 3.),
            look_at: Vec3::ORIGIN,
            view_up: Vec3::UNIT_Y,
            fov: 20f64.to_radians(),
            defocus_angle: 0.6f64.to_radians(),
            focal_length: 10.,
            width: 400,
            height: 225,
        }
    }
}

trait ResultExt {
    fn camera_context(self, builder: &CameraBuilder) -> Result<Vec3>;
}
impl ResultExt for Result<Vec3> {
    /// Attach the CameraBuilder to the Result as context.
    fn camera_context(self, builder: &CameraBuilder) -> Result<Vec3> {
        self.with_context(|| format!("Invalid Camera configuration.\n{:#?}", builder))
    }
}
