use crate::dynamics::{IntegrationParameters, MotorJoint, RigidBody};
use crate::math::{Isometry, Real};

/// Position-level resolution for a motor joint between two dynamic bodies.
///
/// The motor joint performs its whole position correction through the bias of
/// its velocity constraint, so there is no positional error left to resolve
/// here and this constraint always reports convergence.
#[derive(Debug)]
pub(crate) struct MotorPositionConstraint;

impl MotorPositionConstraint {
    pub fn from_params(_rb1: &RigidBody, _rb2: &RigidBody, _joint: &MotorJoint) -> Self {
        Self
    }

    pub fn solve(&self, _params: &IntegrationParameters, _positions: &mut [Isometry<Real>]) -> bool {
        true
    }
}

/// Position-level resolution for a motor joint with a non-dynamic body.
#[derive(Debug)]
pub(crate) struct MotorPositionGroundConstraint;

impl MotorPositionGroundConstraint {
    pub fn from_params(_rb1: &RigidBody, _rb2: &RigidBody, _joint: &MotorJoint) -> Self {
        Self
    }

    pub fn solve(&self, _params: &IntegrationParameters, _positions: &mut [Isometry<Real>]) -> bool {
        true
    }
}
