use std::f64::consts::TAU;

/// Rotation angle advanced by a fixed step each frame, wrapped into [0, 2π).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Animation {
    t: f64,
    step: f64,
}

impl Animation {
    pub const DEFAULT_STEP: f64 = 0.01;

    pub fn new(step: f64) -> Self {
        Self { t: 0.0, step }
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Advances by one step and returns the new angle.
    pub fn advance(&mut self) -> f64 {
        self.t += self.step;
        if self.t >= TAU {
            self.t -= TAU;
        }
        self.t
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}

/// Whether `step` can drive an [`Animation`].
pub(crate) fn validate_step(step: f64) -> Result<(), String> {
    if step.is_finite() && (0.0..TAU).contains(&step) {
        Ok(())
    } else {
        Err(format!("animation step must be finite and in [0, 2pi), got {step}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_returns_one_step() {
        let mut anim = Animation::default();
        assert_eq!(anim.t(), 0.0);
        assert_eq!(anim.advance(), 0.01);
    }

    #[test]
    fn wraps_at_two_pi() {
        let mut anim = Animation::new(1.0);
        for _ in 0..6 {
            anim.advance();
        }
        assert!((anim.t() - 6.0).abs() < 1e-12);
        // 7.0 wraps to 7 - 2π
        let t = anim.advance();
        assert!((t - (7.0 - TAU)).abs() < 1e-12);
    }

    #[test]
    fn stays_in_range_over_many_frames() {
        let mut anim = Animation::default();
        for _ in 0..1_000_000 {
            let t = anim.advance();
            assert!((0.0..TAU).contains(&t));
        }
        let expected = (1_000_000.0 * 0.01) % TAU;
        assert!((anim.t() - expected).abs() < 1e-6, "{} vs {expected}", anim.t());
    }

    #[test]
    fn zero_step_holds_still() {
        let mut anim = Animation::new(0.0);
        assert_eq!(anim.advance(), 0.0);
        assert_eq!(anim.advance(), 0.0);
    }

    #[test]
    fn step_validation() {
        assert!(validate_step(0.01).is_ok());
        assert!(validate_step(0.0).is_ok());
        assert!(validate_step(-0.1).is_err());
        assert!(validate_step(TAU).is_err());
        assert!(validate_step(f64::NAN).is_err());
    }
}
