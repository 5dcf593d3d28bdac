use crate::dynamics::solver::SolverVel;
use crate::dynamics::{IntegrationParameters, Joint, JointIndex, MotorJoint, RigidBody};
use crate::math::{Real, Rotation, SdpMatrix, Vector};
use crate::utils::{self, WCross, WCrossMatrix};

#[derive(Debug)]
pub(crate) struct MotorVelocityConstraint {
    mj_lambda1: usize,
    mj_lambda2: usize,

    joint_id: JointIndex,

    impulse: Vector<Real>,
    angular_impulse: Real,

    linear_rhs: Vector<Real>,
    angular_rhs: Real,

    linear_mass: SdpMatrix<Real>,
    angular_mass: Real,

    im1: Real,
    im2: Real,

    ii1: Real,
    ii2: Real,

    r1: Vector<Real>,
    r2: Vector<Real>,

    max_impulse: Real,
    max_angular_impulse: Real,
}

impl MotorVelocityConstraint {
    pub fn from_params(
        params: &IntegrationParameters,
        joint_id: JointIndex,
        rb1: &RigidBody,
        rb2: &RigidBody,
        joint: &MotorJoint,
    ) -> Self {
        let im1 = rb1.effective_inv_mass;
        let im2 = rb2.effective_inv_mass;
        let ii1 = rb1.effective_world_inv_inertia;
        let ii2 = rb2.effective_world_inv_inertia;
        let r1 = rb1.position.translation.vector - rb1.world_com.coords;
        let r2 = rb2.position.translation.vector - rb2.world_com.coords;
        let rmat1 = r1.gcross_matrix();
        let rmat2 = r2.gcross_matrix();

        // In 2D we just unroll the computation because
        // it's just easier that way.
        let m11 = im1 + im2 + rmat1.x * rmat1.x * ii1 + rmat2.x * rmat2.x * ii2;
        let m12 = rmat1.x * rmat1.y * ii1 + rmat2.x * rmat2.y * ii2;
        let m22 = im1 + im2 + rmat1.y * rmat1.y * ii1 + rmat2.y * rmat2.y * ii2;
        let linear_mass = SdpMatrix::new(m11, m12, m22).inverse();
        let angular_mass = utils::inv(ii1 + ii2);

        let linear_error = rb2.position.translation.vector
            - rb1.position.translation.vector
            - rb1.position.rotation * joint.linear_offset;
        let target_rot = rb1.position.rotation * Rotation::new(joint.angular_offset);
        let angular_error = target_rot.rotation_to(&rb2.position.rotation).angle();

        // The position feedback enters the velocity constraint as a bias,
        // scaled by the correction factor.
        let bias_coeff = joint.correction_factor * params.inv_dt();
        let linear_rhs = linear_error * bias_coeff;
        let angular_rhs = angular_error * bias_coeff;

        let (impulse, angular_impulse) = if params.warm_starting {
            (
                joint.impulse * params.dt_ratio,
                joint.angular_impulse * params.dt_ratio,
            )
        } else {
            (na::zero(), 0.0)
        };

        MotorVelocityConstraint {
            joint_id,
            mj_lambda1: rb1.active_set_offset,
            mj_lambda2: rb2.active_set_offset,
            impulse,
            angular_impulse,
            linear_rhs,
            angular_rhs,
            linear_mass,
            angular_mass,
            im1,
            im2,
            ii1,
            ii2,
            r1,
            r2,
            max_impulse: joint.max_force * params.dt,
            max_angular_impulse: joint.max_torque * params.dt,
        }
    }

    pub fn warmstart(&self, mj_lambdas: &mut [SolverVel<Real>]) {
        let mut mj_lambda1 = mj_lambdas[self.mj_lambda1];
        let mut mj_lambda2 = mj_lambdas[self.mj_lambda2];

        mj_lambda1.linear += self.im1 * self.impulse;
        mj_lambda1.angular += self.ii1 * (self.angular_impulse + self.r1.gcross(self.impulse));

        mj_lambda2.linear -= self.im2 * self.impulse;
        mj_lambda2.angular -= self.ii2 * (self.angular_impulse + self.r2.gcross(self.impulse));

        mj_lambdas[self.mj_lambda1] = mj_lambda1;
        mj_lambdas[self.mj_lambda2] = mj_lambda2;
    }

    pub fn solve(&mut self, mj_lambdas: &mut [SolverVel<Real>]) {
        let mut mj_lambda1 = mj_lambdas[self.mj_lambda1];
        let mut mj_lambda2 = mj_lambdas[self.mj_lambda2];

        // Solve the angular part first: the linear part below must see the
        // angular velocities it produced.
        {
            let ang_dvel = mj_lambda2.angular - mj_lambda1.angular + self.angular_rhs;
            let new_impulse = na::clamp(
                self.angular_impulse + self.angular_mass * ang_dvel,
                -self.max_angular_impulse,
                self.max_angular_impulse,
            );
            let dimpulse = new_impulse - self.angular_impulse;
            self.angular_impulse = new_impulse;

            mj_lambda1.angular += self.ii1 * dimpulse;
            mj_lambda2.angular -= self.ii2 * dimpulse;
        }

        // Linear part.
        {
            let lin_dvel = -mj_lambda1.linear - mj_lambda1.angular.gcross(self.r1)
                + mj_lambda2.linear
                + mj_lambda2.angular.gcross(self.r2)
                + self.linear_rhs;
            let mut new_impulse = self.impulse + self.linear_mass * lin_dvel;

            // The accumulated impulse is clamped along its own direction so
            // the bounded motor does not change the direction it pushes in.
            if new_impulse.norm_squared() > self.max_impulse * self.max_impulse {
                new_impulse = new_impulse.normalize() * self.max_impulse;
            }

            let dimpulse = new_impulse - self.impulse;
            self.impulse = new_impulse;

            mj_lambda1.linear += self.im1 * dimpulse;
            mj_lambda1.angular += self.ii1 * self.r1.gcross(dimpulse);

            mj_lambda2.linear -= self.im2 * dimpulse;
            mj_lambda2.angular -= self.ii2 * self.r2.gcross(dimpulse);
        }

        mj_lambdas[self.mj_lambda1] = mj_lambda1;
        mj_lambdas[self.mj_lambda2] = mj_lambda2;
    }

    pub fn writeback_impulses(&self, joints_all: &mut [Joint]) {
        if let Some(motor) = joints_all[self.joint_id].params.as_motor_joint_mut() {
            motor.impulse = self.impulse;
            motor.angular_impulse = self.angular_impulse;
        }
    }
}

#[derive(Debug)]
pub(crate) struct MotorVelocityGroundConstraint {
    mj_lambda2: usize,

    joint_id: JointIndex,

    impulse: Vector<Real>,
    angular_impulse: Real,

    linear_rhs: Vector<Real>,
    angular_rhs: Real,

    linear_mass: SdpMatrix<Real>,
    angular_mass: Real,

    im2: Real,
    ii2: Real,
    r2: Vector<Real>,

    // -1.0 if the joint's body ordering had to be flipped to put the
    // non-dynamic body first, 1.0 otherwise.
    sign: Real,

    max_impulse: Real,
    max_angular_impulse: Real,
}

impl MotorVelocityGroundConstraint {
    pub fn from_params(
        params: &IntegrationParameters,
        joint_id: JointIndex,
        rb1: &RigidBody,
        rb2: &RigidBody,
        joint: &MotorJoint,
        flipped: bool,
    ) -> Self {
        let im2 = rb2.effective_inv_mass;
        let ii2 = rb2.effective_world_inv_inertia;
        let r1 = rb1.position.translation.vector - rb1.world_com.coords;
        let r2 = rb2.position.translation.vector - rb2.world_com.coords;
        let rmat2 = r2.gcross_matrix();

        // In 2D we just unroll the computation because
        // it's just easier that way.
        let m11 = im2 + rmat2.x * rmat2.x * ii2;
        let m12 = rmat2.x * rmat2.y * ii2;
        let m22 = im2 + rmat2.y * rmat2.y * ii2;
        let linear_mass = SdpMatrix::new(m11, m12, m22).inverse();
        let angular_mass = utils::inv(ii2);

        // The target offsets are expressed with respect to the joint's
        // original body ordering, so the pose error is measured there.
        let (pose1, pose2) = if flipped {
            (&rb2.position, &rb1.position)
        } else {
            (&rb1.position, &rb2.position)
        };
        let sign = if flipped { -1.0 } else { 1.0 };

        let linear_error = pose2.translation.vector
            - pose1.translation.vector
            - pose1.rotation * joint.linear_offset;
        let target_rot = pose1.rotation * Rotation::new(joint.angular_offset);
        let angular_error = target_rot.rotation_to(&pose2.rotation).angle();

        let bias_coeff = joint.correction_factor * params.inv_dt() * sign;

        // The ground body's velocity contribution is constant through the
        // whole solve, so it is folded into the right-hand-side.
        let linear_rhs = -rb1.linvel - rb1.angvel.gcross(r1) + linear_error * bias_coeff;
        let angular_rhs = -rb1.angvel + angular_error * bias_coeff;

        let (impulse, angular_impulse) = if params.warm_starting {
            (
                joint.impulse * (params.dt_ratio * sign),
                joint.angular_impulse * params.dt_ratio * sign,
            )
        } else {
            (na::zero(), 0.0)
        };

        MotorVelocityGroundConstraint {
            joint_id,
            mj_lambda2: rb2.active_set_offset,
            impulse,
            angular_impulse,
            linear_rhs,
            angular_rhs,
            linear_mass,
            angular_mass,
            im2,
            ii2,
            r2,
            sign,
            max_impulse: joint.max_force * params.dt,
            max_angular_impulse: joint.max_torque * params.dt,
        }
    }

    pub fn warmstart(&self, mj_lambdas: &mut [SolverVel<Real>]) {
        let mut mj_lambda2 = mj_lambdas[self.mj_lambda2];

        mj_lambda2.linear -= self.im2 * self.impulse;
        mj_lambda2.angular -= self.ii2 * (self.angular_impulse + self.r2.gcross(self.impulse));

        mj_lambdas[self.mj_lambda2] = mj_lambda2;
    }

    pub fn solve(&mut self, mj_lambdas: &mut [SolverVel<Real>]) {
        let mut mj_lambda2 = mj_lambdas[self.mj_lambda2];

        // Solve the angular part first: the linear part below must see the
        // angular velocity it produced.
        {
            let ang_dvel = mj_lambda2.angular + self.angular_rhs;
            let new_impulse = na::clamp(
                self.angular_impulse + self.angular_mass * ang_dvel,
                -self.max_angular_impulse,
                self.max_angular_impulse,
            );
            let dimpulse = new_impulse - self.angular_impulse;
            self.angular_impulse = new_impulse;

            mj_lambda2.angular -= self.ii2 * dimpulse;
        }

        // Linear part.
        {
            let lin_dvel =
                mj_lambda2.linear + mj_lambda2.angular.gcross(self.r2) + self.linear_rhs;
            let mut new_impulse = self.impulse + self.linear_mass * lin_dvel;

            if new_impulse.norm_squared() > self.max_impulse * self.max_impulse {
                new_impulse = new_impulse.normalize() * self.max_impulse;
            }

            let dimpulse = new_impulse - self.impulse;
            self.impulse = new_impulse;

            mj_lambda2.linear -= self.im2 * dimpulse;
            mj_lambda2.angular -= self.ii2 * self.r2.gcross(dimpulse);
        }

        mj_lambdas[self.mj_lambda2] = mj_lambda2;
    }

    // FIXME: duplicated code with the non-ground constraint.
    pub fn writeback_impulses(&self, joints_all: &mut [Joint]) {
        if let Some(motor) = joints_all[self.joint_id].params.as_motor_joint_mut() {
            motor.impulse = self.impulse * self.sign;
            motor.angular_impulse = self.angular_impulse * self.sign;
        }
    }
}
