use glam::{Mat4, Vec3};

use super::uniforms::TransformUniform;

/// Fixed camera parameters. The eye looks at `target` with +Z up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 10.0,
            eye: Vec3::new(-2.0, 0.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Z,
        }
    }
}

impl CameraConfig {
    /// Right-handed perspective with a [0, 1] depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.fov_y > 0.0 && self.fov_y < std::f32::consts::PI) {
            return Err(format!("fov_y must be in (0, pi), got {}", self.fov_y));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(format!("clip planes must satisfy 0 < near < far, got {}..{}", self.near, self.far));
        }
        if !(self.eye.is_finite() && self.target.is_finite() && self.up.is_finite()) {
            return Err("camera eye, target and up must be finite".into());
        }
        let forward = self.target - self.eye;
        if forward.length_squared() <= f32::EPSILON {
            return Err("camera eye and target coincide".into());
        }
        if self.up.length_squared() <= f32::EPSILON {
            return Err("camera up vector is zero".into());
        }
        // look_at needs a basis: up must not lie along the view direction
        if forward.normalize().cross(self.up.normalize()).length_squared() <= 1e-8 {
            return Err(format!("camera up {} is parallel to the view direction", self.up));
        }
        Ok(())
    }
}

/// Aspect ratio of a surface, guarding against a zero height.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Matrices for one frame: the model spins about +Z by the animation angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTransforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameTransforms {
    pub fn compute(camera: &CameraConfig, t: f64, aspect: f32) -> Self {
        Self {
            model: Mat4::from_axis_angle(Vec3::Z, t as f32),
            view: camera.view(),
            projection: camera.projection(aspect),
        }
    }

    pub fn to_uniform(&self) -> TransformUniform {
        TransformUniform {
            model: self.model.to_cols_array(),
            view: self.view.to_cols_array(),
            projection: self.projection.to_cols_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-6;

    #[test]
    fn projection_matches_reference() {
        let camera = CameraConfig::default();
        let p = camera.projection(4.0 / 3.0);

        let f = 1.0 / (std::f32::consts::FRAC_PI_4 / 2.0).tan();
        let r = 10.0 / (0.1 - 10.0);
        let expected = Mat4::from_cols(
            Vec4::new(f / (4.0 / 3.0), 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, r, -1.0),
            Vec4::new(0.0, 0.0, r * 0.1, 0.0),
        );
        assert!(p.abs_diff_eq(expected, EPS), "{p:?}");
        assert!((p.x_axis.x - 1.810_660_1).abs() < 1e-5);
        assert!((p.y_axis.y - 2.414_213_5).abs() < 1e-5);
    }

    #[test]
    fn view_looks_from_minus_x_with_z_up() {
        let v = CameraConfig::default().view();
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let expected = Mat4::from_cols(
            Vec4::new(0.0, s, -s, 0.0),
            Vec4::new(-1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, s, s, 0.0),
            Vec4::new(0.0, 0.0, -2.0 * std::f32::consts::SQRT_2, 1.0),
        );
        assert!(v.abs_diff_eq(expected, EPS), "{v:?}");
    }

    #[test]
    fn model_is_identity_at_zero_and_rotates_about_z() {
        let camera = CameraConfig::default();
        let at_zero = FrameTransforms::compute(&camera, 0.0, 1.0);
        assert!(at_zero.model.abs_diff_eq(Mat4::IDENTITY, EPS));

        let quarter = FrameTransforms::compute(&camera, std::f64::consts::FRAC_PI_2, 1.0);
        let x = quarter.model.transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::Y, EPS));
        let z = quarter.model.transform_vector3(Vec3::Z);
        assert!(z.abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn uniform_is_column_major() {
        let camera = CameraConfig::default();
        let transforms = FrameTransforms::compute(&camera, 0.0, 1.0);
        let uniform = transforms.to_uniform();
        // translation lives in the last column
        assert!((uniform.view[14] + 2.0 * std::f32::consts::SQRT_2).abs() < 1e-5);
        assert_eq!(uniform.view[15], 1.0);
        assert_eq!(uniform.projection[11], -1.0);
    }

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(aspect_ratio(800, 600), 800.0 / 600.0);
        assert_eq!(aspect_ratio(800, 0), 800.0);
    }

    #[test]
    fn degenerate_camera_is_rejected() {
        let mut camera = CameraConfig::default();
        camera.near = 0.0;
        assert!(camera.validate().is_err());

        let mut camera = CameraConfig::default();
        camera.target = camera.eye;
        assert!(camera.validate().is_err());

        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn camera_needs_finite_values_and_a_usable_up() {
        let mut camera = CameraConfig::default();
        camera.up = camera.target - camera.eye;
        assert!(camera.validate().is_err());

        let mut camera = CameraConfig::default();
        camera.up = (camera.eye - camera.target) * 3.0;
        assert!(camera.validate().is_err());

        let mut camera = CameraConfig::default();
        camera.up = Vec3::ZERO;
        assert!(camera.validate().is_err());

        let mut camera = CameraConfig::default();
        camera.eye.x = f32::NAN;
        assert!(camera.validate().is_err());

        let mut camera = CameraConfig::default();
        camera.target.y = f32::INFINITY;
        assert!(camera.validate().is_err());

        // the default up is oblique to the view direction, not perpendicular
        let camera = CameraConfig::default();
        assert!((camera.target - camera.eye).dot(camera.up) != 0.0);
        assert!(camera.validate().is_ok());
    }
}
