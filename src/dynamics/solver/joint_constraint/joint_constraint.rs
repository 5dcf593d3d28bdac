use crate::dynamics::solver::joint_constraint::{
    MotorVelocityConstraint, MotorVelocityGroundConstraint,
};
use crate::dynamics::solver::SolverVel;
use crate::dynamics::{IntegrationParameters, Joint, JointIndex, JointParams, RigidBodySet};
use crate::math::Real;

#[derive(Debug)]
pub(crate) enum AnyJointVelocityConstraint {
    MotorJointConstraint(MotorVelocityConstraint),
    MotorJointGroundConstraint(MotorVelocityGroundConstraint),
}

impl AnyJointVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointIndex,
        joint: &Joint,
        bodies: &RigidBodySet,
    ) -> Self {
        let rb1 = &bodies[joint.body1];
        let rb2 = &bodies[joint.body2];

        match &joint.params {
            JointParams::MotorJoint(p) => AnyJointVelocityConstraint::MotorJointConstraint(
                MotorVelocityConstraint::from_params(params, joint_id, rb1, rb2, p),
            ),
        }
    }

    pub fn from_joint_ground(
        params: &IntegrationParameters,
        joint_id: JointIndex,
        joint: &Joint,
        bodies: &RigidBodySet,
    ) -> Self {
        let mut handle1 = joint.body1;
        let mut handle2 = joint.body2;
        let flipped = !bodies[handle2].is_dynamic();

        if flipped {
            std::mem::swap(&mut handle1, &mut handle2);
        }

        let rb1 = &bodies[handle1];
        let rb2 = &bodies[handle2];

        match &joint.params {
            JointParams::MotorJoint(p) => AnyJointVelocityConstraint::MotorJointGroundConstraint(
                MotorVelocityGroundConstraint::from_params(params, joint_id, rb1, rb2, p, flipped),
            ),
        }
    }

    pub fn warmstart(&self, mj_lambdas: &mut [SolverVel<Real>]) {
        match self {
            AnyJointVelocityConstraint::MotorJointConstraint(c) => c.warmstart(mj_lambdas),
            AnyJointVelocityConstraint::MotorJointGroundConstraint(c) => c.warmstart(mj_lambdas),
        }
    }

    pub fn solve(&mut self, mj_lambdas: &mut [SolverVel<Real>]) {
        match self {
            AnyJointVelocityConstraint::MotorJointConstraint(c) => c.solve(mj_lambdas),
            AnyJointVelocityConstraint::MotorJointGroundConstraint(c) => c.solve(mj_lambdas),
        }
    }

    pub fn writeback_impulses(&self, joints_all: &mut [Joint]) {
        match self {
            AnyJointVelocityConstraint::MotorJointConstraint(c) => c.writeback_impulses(joints_all),
            AnyJointVelocityConstraint::MotorJointGroundConstraint(c) => {
                c.writeback_impulses(joints_all)
            }
        }
    }
}
