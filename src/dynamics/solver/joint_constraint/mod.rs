pub(crate) use self::joint_constraint::AnyJointVelocityConstraint;
pub(crate) use self::joint_position_constraint::AnyJointPositionConstraint;
pub(crate) use self::motor_position_constraint::{
    MotorPositionConstraint, MotorPositionGroundConstraint,
};
pub(crate) use self::motor_velocity_constraint::{
    MotorVelocityConstraint, MotorVelocityGroundConstraint,
};

mod joint_constraint;
mod joint_position_constraint;
mod motor_position_constraint;
mod motor_velocity_constraint;
