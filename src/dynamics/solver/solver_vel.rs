use crate::math::{AngVector, Vector};
use na::{RealField, Scalar};

/// The linear and angular velocities of a rigid-body, as manipulated by the
/// velocity solver.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SolverVel<N: Scalar + Copy> {
    pub linear: Vector<N>,
    pub angular: AngVector<N>,
}

impl<N: RealField + Copy> SolverVel<N> {
    pub fn zero() -> Self {
        Self {
            linear: na::zero(),
            angular: na::zero(),
        }
    }
}
