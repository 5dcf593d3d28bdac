use crate::dynamics::solver::joint_constraint::{
    MotorPositionConstraint, MotorPositionGroundConstraint,
};
use crate::dynamics::{IntegrationParameters, Joint, JointParams, RigidBodySet};
use crate::math::{Isometry, Real};

#[derive(Debug)]
pub(crate) enum AnyJointPositionConstraint {
    MotorJointConstraint(MotorPositionConstraint),
    MotorJointGroundConstraint(MotorPositionGroundConstraint),
}

impl AnyJointPositionConstraint {
    pub fn from_joint(joint: &Joint, bodies: &RigidBodySet) -> Self {
        let rb1 = &bodies[joint.body1];
        let rb2 = &bodies[joint.body2];

        match &joint.params {
            JointParams::MotorJoint(p) => AnyJointPositionConstraint::MotorJointConstraint(
                MotorPositionConstraint::from_params(rb1, rb2, p),
            ),
        }
    }

    pub fn from_joint_ground(joint: &Joint, bodies: &RigidBodySet) -> Self {
        let mut handle1 = joint.body1;
        let mut handle2 = joint.body2;
        let flipped = !bodies[handle2].is_dynamic();

        if flipped {
            std::mem::swap(&mut handle1, &mut handle2);
        }

        let rb1 = &bodies[handle1];
        let rb2 = &bodies[handle2];

        match &joint.params {
            JointParams::MotorJoint(p) => AnyJointPositionConstraint::MotorJointGroundConstraint(
                MotorPositionGroundConstraint::from_params(rb1, rb2, p),
            ),
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [Isometry<Real>]) -> bool {
        match self {
            AnyJointPositionConstraint::MotorJointConstraint(c) => c.solve(params, positions),
            AnyJointPositionConstraint::MotorJointGroundConstraint(c) => c.solve(params, positions),
        }
    }
}
