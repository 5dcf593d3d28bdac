use crate::counters::Counters;
use crate::dynamics::{IntegrationParameters, IslandSolver, JointIndex, JointSet, RigidBodySet};

/// The physics pipeline, responsible for stepping the whole physics
/// simulation.
///
/// This structure only contains temporary data and counters. It can be
/// dropped and replaced by a fresh copy at any time. For a deterministic
/// simulation, however, a given `PhysicsPipeline` should be used for only one
/// simulation.
pub struct PhysicsPipeline {
    /// Counters used for benchmarking only.
    pub counters: Counters,
    joint_constraint_indices: Vec<Vec<JointIndex>>,
    solvers: Vec<IslandSolver>,
}

impl Default for PhysicsPipeline {
    fn default() -> Self {
        PhysicsPipeline::new()
    }
}

#[allow(dead_code)]
fn check_pipeline_send_sync() {
    fn do_test<T: Sync>() {}
    do_test::<PhysicsPipeline>();
}

impl PhysicsPipeline {
    /// Initializes a new physics pipeline.
    pub fn new() -> PhysicsPipeline {
        PhysicsPipeline {
            counters: Counters::new(false),
            joint_constraint_indices: Vec::new(),
            solvers: Vec::new(),
        }
    }

    /// Executes one timestep of the physics simulation.
    pub fn step(
        &mut self,
        integration_parameters: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        joints: &mut JointSet,
    ) {
        self.counters.reset();
        self.counters.step_started();

        // Rebuild the active sets and the simulation islands, waking and
        // putting bodies to sleep as needed.
        self.counters.island_construction_started();
        bodies.update_active_set_with_joints(joints, integration_parameters.min_island_size);
        self.counters.island_construction_completed();

        // Collect the active joints of each island.
        if self.joint_constraint_indices.len() < bodies.num_islands() {
            self.joint_constraint_indices
                .resize_with(bodies.num_islands(), Vec::new);
        }
        joints.select_active_interactions(bodies, &mut self.joint_constraint_indices);

        let nconstraints = self.joint_constraint_indices[..bodies.num_islands()]
            .iter()
            .map(|indices| indices.len())
            .sum();
        self.counters.set_nconstraints(nconstraints);

        // Solve all the islands.
        self.counters.solver_started();
        if self.solvers.len() < bodies.num_islands() {
            self.solvers
                .resize_with(bodies.num_islands(), IslandSolver::new);
        }

        for island_id in 0..bodies.num_islands() {
            self.solvers[island_id].init_and_solve(
                island_id,
                &mut self.counters,
                integration_parameters,
                bodies,
                joints.joints_mut(),
                &self.joint_constraint_indices[island_id],
            );
        }
        self.counters.solver_completed();

        // Kinematic bodies are not part of any island: integrate them apart.
        bodies.foreach_active_kinematic_body_mut_internal(|_, rb| {
            rb.integrate_next_position(integration_parameters.dt);
        });

        // Commit the new positions of all the active bodies.
        self.counters.update_started();
        bodies.foreach_active_dynamic_body_mut_internal(|_, rb| {
            rb.position = rb.next_position;
            rb.update_world_mass_properties();
        });
        bodies.foreach_active_kinematic_body_mut_internal(|_, rb| {
            rb.position = rb.next_position;
            rb.update_world_mass_properties();
        });
        self.counters.update_completed();

        self.counters.step_completed();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{MassProperties, MotorJoint, RigidBodyBuilder};
    use crate::math::{Point, Real, Vector};
    use approx::assert_relative_eq;

    const PI: Real = std::f32::consts::PI as Real;

    fn unit_mass_properties() -> MassProperties {
        MassProperties::new(Point::origin(), 1.0, 1.0)
    }

    #[test]
    fn motor_joint_drives_a_body_to_its_target_pose() {
        let mut pipeline = PhysicsPipeline::new();
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let ground = bodies.insert(RigidBodyBuilder::new_static().build());
        let follower = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .translation(1.0, 0.0)
                .mass_properties(unit_mass_properties())
                .build(),
        );

        let mut motor = MotorJoint::new(Vector::new(2.0, 0.0), 0.0);
        motor.set_max_force(1000.0);
        motor.set_max_torque(1000.0);
        motor.set_correction_factor(0.2);
        let joint = joints.insert(&mut bodies, ground, follower, motor);

        // The follower starts one unit short of its target.
        pipeline.step(&params, &mut bodies, &mut joints);
        assert!(bodies[follower].linvel().x > 0.0);

        // The joint pulls the ground towards -x, which is the reaction of
        // pushing the follower towards +x.
        let motor = joints.get(joint).unwrap().params.as_motor_joint().unwrap();
        assert!(motor.reaction_force(params.inv_dt()).x < 0.0);

        let target = Vector::new(2.0, 0.0);
        let mut prev_error =
            (bodies[follower].position().translation.vector - target).norm();

        for _ in 0..240 {
            pipeline.step(&params, &mut bodies, &mut joints);
            let error = (bodies[follower].position().translation.vector - target).norm();
            assert!(error <= prev_error + 1.0e-6);
            prev_error = error;
        }

        assert!(prev_error < 1.0e-2);
    }

    #[test]
    fn paired_dynamic_bodies_meet_halfway() {
        let mut pipeline = PhysicsPipeline::new();
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let h1 = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .mass_properties(unit_mass_properties())
                .build(),
        );
        let h2 = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .translation(2.0, 0.0)
                .mass_properties(unit_mass_properties())
                .build(),
        );

        let mut motor = MotorJoint::new(Vector::zeros(), 0.0);
        motor.set_max_force(100.0);
        joints.insert(&mut bodies, h1, h2, motor);

        pipeline.step(&params, &mut bodies, &mut joints);

        // Equal masses: the bodies approach each other symmetrically.
        let v1 = *bodies[h1].linvel();
        let v2 = *bodies[h2].linvel();
        assert!(v1.x > 0.0);
        assert!(v2.x < 0.0);
        assert_relative_eq!(v1.x, -v2.x, epsilon = 1.0e-5);

        for _ in 0..300 {
            pipeline.step(&params, &mut bodies, &mut joints);
        }

        let p1 = bodies[h1].position().translation.vector;
        let p2 = bodies[h2].position().translation.vector;
        assert!((p2 - p1).norm() < 1.0e-2);
        assert_relative_eq!(p1.x, 1.0, epsilon = 0.1);
    }

    #[test]
    fn angular_motor_spins_the_dynamic_body_of_a_flipped_joint() {
        let mut pipeline = PhysicsPipeline::new();
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        // The dynamic body comes first in the joint, so the solver has to
        // flip the pair to put the ground first.
        let rotor = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .mass_properties(unit_mass_properties())
                .build(),
        );
        let ground = bodies.insert(RigidBodyBuilder::new_static().build());

        // Keeping the ground at -π/2 relative to the rotor means the rotor
        // itself has to turn to +π/2.
        let mut motor = MotorJoint::new(Vector::zeros(), -PI / 2.0);
        motor.set_max_torque(1000.0);
        joints.insert(&mut bodies, rotor, ground, motor);

        pipeline.step(&params, &mut bodies, &mut joints);
        assert!(bodies[rotor].angvel() > 0.0);

        for _ in 0..240 {
            pipeline.step(&params, &mut bodies, &mut joints);
        }

        assert_relative_eq!(
            bodies[rotor].position().rotation.angle(),
            PI / 2.0,
            epsilon = 1.0e-2
        );
    }

    #[test]
    fn rider_follows_a_kinematic_platform() {
        let mut pipeline = PhysicsPipeline::new();
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let platform = bodies.insert(RigidBodyBuilder::new_kinematic().linvel(1.0, 0.0).build());
        let rider = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .mass_properties(unit_mass_properties())
                .build(),
        );

        let mut motor = MotorJoint::new(Vector::zeros(), 0.0);
        motor.set_max_force(1000.0);
        joints.insert(&mut bodies, platform, rider, motor);

        for _ in 0..300 {
            pipeline.step(&params, &mut bodies, &mut joints);
        }

        let platform_pos = bodies[platform].position().translation.vector;
        let rider_pos = bodies[rider].position().translation.vector;

        // The platform moved, and the rider tracks it with a small steady
        // lag.
        assert!(platform_pos.x > 4.0);
        assert!((platform_pos - rider_pos).norm() < 0.2);
        assert!(!bodies[rider].is_sleeping());
    }

    #[test]
    fn rigid_body_removal_before_step() {
        let mut pipeline = PhysicsPipeline::new();
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let h1 = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .mass_properties(unit_mass_properties())
                .build(),
        );
        let h2 = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .translation(1.0, 0.0)
                .mass_properties(unit_mass_properties())
                .build(),
        );
        joints.insert(&mut bodies, h1, h2, MotorJoint::new(Vector::zeros(), 0.0));

        pipeline.step(&params, &mut bodies, &mut joints);

        bodies.remove(h1, &mut joints);
        assert!(joints.is_empty());

        // Stepping after the removal must not touch the deleted body.
        pipeline.step(&params, &mut bodies, &mut joints);
        assert!(bodies.contains(h2));
        assert_eq!(bodies.len(), 1);
    }

    #[test]
    fn timestep_scaling_preserves_the_warmstart_impulse() {
        let mut pipeline = PhysicsPipeline::new();
        let mut params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let ground = bodies.insert(RigidBodyBuilder::new_static().build());
        let follower = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .translation(1.0, 0.0)
                .mass_properties(unit_mass_properties())
                .build(),
        );
        let joint = joints.insert(
            &mut bodies,
            ground,
            follower,
            MotorJoint::new(Vector::new(2.0, 0.0), 0.0),
        );

        pipeline.step(&params, &mut bodies, &mut joints);
        let impulse = joints.get(joint).unwrap().params.as_motor_joint().unwrap().impulse;
        assert!(impulse.norm() > 0.0);

        // Halving the timestep halves the warmstart seed through `dt_ratio`.
        let new_dt = params.dt / 2.0;
        params.dt_ratio = new_dt / params.dt;
        params.set_dt(new_dt);

        pipeline.step(&params, &mut bodies, &mut joints);
        let new_impulse = joints.get(joint).unwrap().params.as_motor_joint().unwrap().impulse;

        // The impulse budget shrank with the timestep.
        let max_impulse: Real = 1.0 * params.dt;
        assert!(new_impulse.norm() <= max_impulse * (1.0 + 1.0e-5));
    }
}
