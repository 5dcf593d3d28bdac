//! Structures related to dynamics: bodies, joints, etc.

pub use self::integration_parameters::IntegrationParameters;
pub(crate) use self::joint::JointIndex;
pub use self::joint::{Joint, JointHandle, JointParams, JointSet, MotorJoint};
pub use self::mass_properties::MassProperties;
pub use self::rigid_body::{RigidBody, RigidBodyActivation, RigidBodyBuilder, RigidBodyType};
pub use self::rigid_body_set::{RigidBodyHandle, RigidBodySet};
pub(crate) use self::solver::IslandSolver;

mod integration_parameters;
mod joint;
mod mass_properties;
mod rigid_body;
mod rigid_body_set;
mod solver;
