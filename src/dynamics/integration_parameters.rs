use crate::math::Real;

/// Parameters for a time-step of the physics engine.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug)]
pub struct IntegrationParameters {
    /// The timestep length (default: `1.0 / 60.0`).
    pub dt: Real,
    /// The ratio between the current timestep length and the previous one,
    /// used to rescale warm-started impulses whenever the timestep changes
    /// (default: `1.0`).
    pub dt_ratio: Real,
    /// Whether the solver is seeded with the impulses accumulated during the
    /// previous timestep (default: `true`).
    pub warm_starting: bool,
    /// Maximum number of iterations performed by the velocity solver (default: `4`).
    pub max_velocity_iterations: usize,
    /// Maximum number of iterations performed by the position solver (default: `1`).
    pub max_position_iterations: usize,
    /// Minimum number of dynamic bodies in each active island (default: `128`).
    pub min_island_size: usize,
}

impl IntegrationParameters {
    /// The inverse of the time-stepping length, i.e. the steps per second.
    ///
    /// This is zero if `self.dt` is zero.
    #[inline(always)]
    pub fn inv_dt(&self) -> Real {
        if self.dt == 0.0 {
            0.0
        } else {
            1.0 / self.dt
        }
    }

    /// Sets the time-stepping length.
    #[inline]
    pub fn set_dt(&mut self, dt: Real) {
        assert!(dt >= 0.0, "The time-stepping length cannot be negative.");
        self.dt = dt;
    }

    /// Sets the inverse time-stepping length (i.e. the frequency).
    ///
    /// This automatically recomputes `self.dt`.
    #[inline]
    pub fn set_inv_dt(&mut self, inv_dt: Real) {
        if inv_dt == 0.0 {
            self.dt = 0.0
        } else {
            self.dt = 1.0 / inv_dt
        }
    }
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            dt_ratio: 1.0,
            warm_starting: true,
            max_velocity_iterations: 4,
            max_position_iterations: 1,
            min_island_size: 128,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn inv_dt_of_zero_dt() {
        let mut params = IntegrationParameters::default();
        params.set_dt(0.0);
        assert_eq!(params.inv_dt(), 0.0);
    }

    #[test]
    #[should_panic]
    fn negative_dt_is_rejected() {
        IntegrationParameters::default().set_dt(-0.1);
    }
}
