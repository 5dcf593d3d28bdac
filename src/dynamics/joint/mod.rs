pub use self::joint::{Joint, JointParams};
pub(crate) use self::joint_set::JointIndex;
pub use self::joint_set::{JointHandle, JointSet};
pub use self::motor_joint::MotorJoint;

mod joint;
mod joint_set;
mod motor_joint;
