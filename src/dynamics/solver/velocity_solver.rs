use super::{AnyJointVelocityConstraint, SolverVel};
use crate::dynamics::{IntegrationParameters, Joint, RigidBodySet};
use crate::math::Real;

pub(crate) struct VelocitySolver {
    pub mj_lambdas: Vec<SolverVel<Real>>,
}

impl VelocitySolver {
    pub fn new() -> Self {
        Self {
            mj_lambdas: Vec::new(),
        }
    }

    pub fn solve(
        &mut self,
        island_id: usize,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        constraints: &mut [AnyJointVelocityConstraint],
        joints_all: &mut [Joint],
    ) {
        self.mj_lambdas.clear();
        self.mj_lambdas
            .resize(bodies.active_island(island_id).len(), SolverVel::zero());

        // Seed the solver with the current body velocities.
        for (_, rb) in bodies.iter_active_island(island_id) {
            let dvel = &mut self.mj_lambdas[rb.active_set_offset];
            dvel.linear = rb.linvel;
            dvel.angular = rb.angvel;
        }

        // Warmstart.
        for constraint in &*constraints {
            constraint.warmstart(&mut self.mj_lambdas);
        }

        // Resolution.
        for _ in 0..params.max_velocity_iterations {
            for constraint in &mut *constraints {
                constraint.solve(&mut self.mj_lambdas);
            }
        }

        // Write the new velocities back to the rigid-bodies.
        let mj_lambdas = &self.mj_lambdas;
        bodies.foreach_active_island_body_mut_internal(island_id, |_, rb| {
            let dvel = mj_lambdas[rb.active_set_offset];
            rb.linvel = dvel.linear;
            rb.angvel = dvel.angular;
        });

        // Write the accumulated impulses back to the joints, for warmstarting
        // the next timestep.
        for constraint in &*constraints {
            constraint.writeback_impulses(joints_all);
        }
    }
}
