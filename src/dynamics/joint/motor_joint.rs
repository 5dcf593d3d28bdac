use crate::math::{Isometry, Point, Real, Vector};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// A joint that drives the relative pose of two bodies towards a target
/// offset, using a bounded force and torque.
pub struct MotorJoint {
    /// The target translation of the second body, expressed in the local frame
    /// of the first body.
    pub linear_offset: Vector<Real>,
    /// The target orientation of the second body relative to the first body.
    pub angular_offset: Real,
    /// The impulse applied by this joint on the first body.
    ///
    /// The impulse applied to the second body is given by `-impulse`.
    pub impulse: Vector<Real>,
    /// The angular impulse applied by this joint on the first body.
    ///
    /// The angular impulse applied to the second body is given by
    /// `-angular_impulse`.
    pub angular_impulse: Real,
    /// The maximum force this joint can deliver to reach its target.
    pub max_force: Real,
    /// The maximum torque this joint can deliver to reach its target.
    pub max_torque: Real,
    /// The proportion of the pose error corrected at each timestep.
    pub correction_factor: Real,
}

impl MotorJoint {
    /// Creates a new motor joint with the given target offsets.
    pub fn new(linear_offset: Vector<Real>, angular_offset: Real) -> Self {
        Self {
            linear_offset,
            angular_offset,
            impulse: na::zero(),
            angular_impulse: 0.0,
            max_force: 1.0,
            max_torque: 1.0,
            correction_factor: 0.3,
        }
    }

    /// Creates a new motor joint whose target offsets describe the current
    /// relative pose of the two bodies.
    ///
    /// A joint created this way is initially at rest: it only starts pushing
    /// the bodies once their relative pose diverges from the captured one.
    pub fn from_positions(pos1: &Isometry<Real>, pos2: &Isometry<Real>) -> Self {
        let linear_offset = pos1
            .inverse_transform_point(&Point::from(pos2.translation.vector))
            .coords;
        let angular_offset = pos1.rotation.rotation_to(&pos2.rotation).angle();
        Self::new(linear_offset, angular_offset)
    }

    /// Sets the maximum force this joint can deliver.
    pub fn set_max_force(&mut self, max_force: Real) {
        assert!(max_force >= 0.0, "The maximum force must be non-negative.");
        self.max_force = max_force;
    }

    /// Sets the maximum torque this joint can deliver.
    pub fn set_max_torque(&mut self, max_torque: Real) {
        assert!(max_torque >= 0.0, "The maximum torque must be non-negative.");
        self.max_torque = max_torque;
    }

    /// Sets the proportion of the pose error corrected at each timestep.
    pub fn set_correction_factor(&mut self, correction_factor: Real) {
        assert!(
            (0.0..=1.0).contains(&correction_factor),
            "The correction factor must be in [0, 1]."
        );
        self.correction_factor = correction_factor;
    }

    /// The reaction force applied on the first body by this joint, as a
    /// function of the inverse timestep length.
    pub fn reaction_force(&self, inv_dt: Real) -> Vector<Real> {
        self.impulse * inv_dt
    }

    /// The reaction torque applied on the first body by this joint, as a
    /// function of the inverse timestep length.
    pub fn reaction_torque(&self, inv_dt: Real) -> Real {
        self.angular_impulse * inv_dt
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Isometry, Real, Vector};
    use approx::assert_relative_eq;

    const PI: Real = std::f32::consts::PI as Real;

    #[test]
    fn offsets_from_positions_describe_the_relative_pose() {
        let pos1 = Isometry::new(Vector::new(1.0, 2.0), PI / 2.0);
        let pos2 = Isometry::new(Vector::new(1.0, 3.0), PI);
        let joint = MotorJoint::from_positions(&pos1, &pos2);

        assert_relative_eq!(joint.linear_offset, Vector::new(1.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(joint.angular_offset, PI / 2.0, epsilon = 1.0e-5);
    }

    #[test]
    fn angular_offset_is_wrapped_to_the_shortest_arc() {
        let pos1 = Isometry::new(Vector::zeros(), 3.0 * PI / 4.0);
        let pos2 = Isometry::new(Vector::zeros(), -3.0 * PI / 4.0);
        let joint = MotorJoint::from_positions(&pos1, &pos2);

        // The raw difference is -3π/2, which wraps to π/2.
        assert_relative_eq!(joint.angular_offset, PI / 2.0, epsilon = 1.0e-5);
    }

    #[test]
    #[should_panic(expected = "The maximum force must be non-negative.")]
    fn negative_max_force_is_rejected() {
        let mut joint = MotorJoint::new(Vector::zeros(), 0.0);
        joint.set_max_force(-1.0);
    }

    #[test]
    #[should_panic(expected = "The correction factor must be in [0, 1].")]
    fn out_of_range_correction_factor_is_rejected() {
        let mut joint = MotorJoint::new(Vector::zeros(), 0.0);
        joint.set_correction_factor(1.5);
    }
}
