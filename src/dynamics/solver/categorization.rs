use crate::dynamics::{Joint, JointIndex, RigidBodySet};

pub(crate) fn categorize_joints(
    bodies: &RigidBodySet,
    joints: &[Joint],
    joint_indices: &[JointIndex],
    ground_joints: &mut Vec<JointIndex>,
    nonground_joints: &mut Vec<JointIndex>,
) {
    for joint_i in joint_indices {
        let joint = &joints[*joint_i];
        let rb1 = &bodies[joint.body1];
        let rb2 = &bodies[joint.body2];

        if !rb1.is_dynamic() || !rb2.is_dynamic() {
            ground_joints.push(*joint_i);
        } else {
            nonground_joints.push(*joint_i);
        }
    }
}
