use super::{AnyJointPositionConstraint, PositionSolver, SolverConstraints, VelocitySolver};
use crate::counters::Counters;
use crate::dynamics::{IntegrationParameters, Joint, JointIndex, RigidBodySet};

pub(crate) struct IslandSolver {
    joint_constraints: SolverConstraints,
    position_constraints: Vec<AnyJointPositionConstraint>,
    velocity_solver: VelocitySolver,
    position_solver: PositionSolver,
}

impl IslandSolver {
    pub fn new() -> Self {
        Self {
            joint_constraints: SolverConstraints::new(),
            position_constraints: Vec::new(),
            velocity_solver: VelocitySolver::new(),
            position_solver: PositionSolver::new(),
        }
    }

    pub fn init_and_solve(
        &mut self,
        island_id: usize,
        counters: &mut Counters,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        joints_all: &mut [Joint],
        joint_indices: &[JointIndex],
    ) {
        // Assemble the constraints of this island.
        counters.solver.velocity_assembly_time.resume();
        self.joint_constraints
            .init(params, bodies, joints_all, joint_indices);

        self.position_constraints.clear();
        for joint_i in &self.joint_constraints.not_ground_interactions {
            let joint = &joints_all[*joint_i];
            self.position_constraints
                .push(AnyJointPositionConstraint::from_joint(joint, bodies));
        }
        for joint_i in &self.joint_constraints.ground_interactions {
            let joint = &joints_all[*joint_i];
            self.position_constraints
                .push(AnyJointPositionConstraint::from_joint_ground(joint, bodies));
        }
        counters.solver.velocity_assembly_time.pause();

        // Solve the velocity constraints.
        counters.solver.velocity_resolution_time.resume();
        self.velocity_solver.solve(
            island_id,
            params,
            bodies,
            &mut self.joint_constraints.velocity_constraints,
            joints_all,
        );
        counters.solver.velocity_resolution_time.pause();

        // Integrate the positions.
        bodies.foreach_active_island_body_mut_internal(island_id, |_, rb| {
            rb.integrate_next_position(params.dt);
        });

        // Solve the position constraints.
        counters.solver.position_resolution_time.resume();
        self.position_solver
            .solve(island_id, params, bodies, &self.position_constraints);
        counters.solver.position_resolution_time.pause();
    }
}
