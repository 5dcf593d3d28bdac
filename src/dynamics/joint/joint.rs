use crate::dynamics::{JointHandle, MotorJoint, RigidBodyHandle};

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// An enum grouping all possible types of joints.
pub enum JointParams {
    /// A motor joint that drives the relative pose of two bodies towards a
    /// target offset.
    MotorJoint(MotorJoint),
}

impl JointParams {
    /// An aliased name of this joint type.
    pub fn type_name(&self) -> &'static str {
        match self {
            JointParams::MotorJoint(_) => "MotorJoint",
        }
    }

    /// Gets a reference to the underlying motor joint, if `self` is one.
    pub fn as_motor_joint(&self) -> Option<&MotorJoint> {
        match self {
            JointParams::MotorJoint(joint) => Some(joint),
        }
    }

    /// Gets a mutable reference to the underlying motor joint, if `self` is
    /// one.
    pub fn as_motor_joint_mut(&mut self) -> Option<&mut MotorJoint> {
        match self {
            JointParams::MotorJoint(joint) => Some(joint),
        }
    }
}

impl From<MotorJoint> for JointParams {
    fn from(joint: MotorJoint) -> Self {
        JointParams::MotorJoint(joint)
    }
}

/// A joint attached to two rigid-bodies.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Joint {
    /// Handle to the first body attached to this joint.
    pub body1: RigidBodyHandle,
    /// Handle to the second body attached to this joint.
    pub body2: RigidBodyHandle,
    // A joint needs to know its own handle to simplify its removal.
    pub(crate) handle: JointHandle,
    /// The joint target offsets and accumulated impulses.
    pub params: JointParams,
}
