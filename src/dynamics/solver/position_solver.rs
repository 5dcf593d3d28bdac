use super::AnyJointPositionConstraint;
use crate::dynamics::{IntegrationParameters, RigidBodySet};
use crate::math::{Isometry, Real};

pub(crate) struct PositionSolver {
    positions: Vec<Isometry<Real>>,
}

impl PositionSolver {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    pub fn solve(
        &mut self,
        island_id: usize,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        constraints: &[AnyJointPositionConstraint],
    ) {
        if constraints.is_empty() {
            // Nothing to do: no need to move the positions in and out of the
            // solver workspace.
            return;
        }

        // The bodies of an island are ordered by their active set offset, so
        // the workspace can be filled by a plain iteration.
        self.positions.clear();
        self.positions.extend(
            bodies
                .iter_active_island(island_id)
                .map(|(_, rb)| *rb.next_position()),
        );

        for _ in 0..params.max_position_iterations {
            let mut all_converged = true;

            for constraint in constraints {
                all_converged = constraint.solve(params, &mut self.positions) && all_converged;
            }

            if all_converged {
                break;
            }
        }

        let positions = &self.positions;
        bodies.foreach_active_island_body_mut_internal(island_id, |_, rb| {
            rb.set_next_position(positions[rb.active_set_offset]);
        });
    }
}
