use super::{categorize_joints, AnyJointVelocityConstraint};
use crate::dynamics::{IntegrationParameters, Joint, JointIndex, RigidBodySet};

pub(crate) struct SolverConstraints {
    pub not_ground_interactions: Vec<JointIndex>,
    pub ground_interactions: Vec<JointIndex>,
    pub velocity_constraints: Vec<AnyJointVelocityConstraint>,
}

impl SolverConstraints {
    pub fn new() -> Self {
        Self {
            not_ground_interactions: vec![],
            ground_interactions: vec![],
            velocity_constraints: vec![],
        }
    }

    pub fn init(
        &mut self,
        params: &IntegrationParameters,
        bodies: &RigidBodySet,
        joints: &[Joint],
        joint_indices: &[JointIndex],
    ) {
        self.not_ground_interactions.clear();
        self.ground_interactions.clear();
        categorize_joints(
            bodies,
            joints,
            joint_indices,
            &mut self.ground_interactions,
            &mut self.not_ground_interactions,
        );

        self.velocity_constraints.clear();
        self.compute_joint_constraints(params, bodies, joints);
        self.compute_joint_ground_constraints(params, bodies, joints);
    }

    fn compute_joint_constraints(
        &mut self,
        params: &IntegrationParameters,
        bodies: &RigidBodySet,
        joints: &[Joint],
    ) {
        for joint_i in &self.not_ground_interactions {
            let joint = &joints[*joint_i];
            let constraint =
                AnyJointVelocityConstraint::from_joint(params, *joint_i, joint, bodies);
            self.velocity_constraints.push(constraint);
        }
    }

    fn compute_joint_ground_constraints(
        &mut self,
        params: &IntegrationParameters,
        bodies: &RigidBodySet,
        joints: &[Joint],
    ) {
        for joint_i in &self.ground_interactions {
            let joint = &joints[*joint_i];
            let constraint =
                AnyJointVelocityConstraint::from_joint_ground(params, *joint_i, joint, bodies);
            self.velocity_constraints.push(constraint);
        }
    }
}
