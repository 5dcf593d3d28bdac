pub(crate) use self::categorization::categorize_joints;
pub(crate) use self::island_solver::IslandSolver;
pub(crate) use self::joint_constraint::{AnyJointPositionConstraint, AnyJointVelocityConstraint};
pub(crate) use self::position_solver::PositionSolver;
pub(crate) use self::solver_constraints::SolverConstraints;
pub(crate) use self::solver_vel::SolverVel;
pub(crate) use self::velocity_solver::VelocitySolver;

mod categorization;
mod island_solver;
mod joint_constraint;
mod position_solver;
mod solver_constraints;
mod solver_vel;
mod velocity_solver;
