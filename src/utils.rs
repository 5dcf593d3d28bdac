//! Miscellaneous utilities.

use crate::math::Real;
use na::{Matrix2, RowVector2, Vector2};
use std::ops::Mul;

const INV_EPSILON: Real = 1.0e-20;

/// The inverse of `val`, or zero when `val` is too close to zero.
pub(crate) fn inv(val: Real) -> Real {
    if (-INV_EPSILON..=INV_EPSILON).contains(&val) {
        0.0
    } else {
        1.0 / val
    }
}

/// If `elt` is one of the elements of `pair`, returns the other element.
pub(crate) fn select_other<T: PartialEq>(pair: (T, T), elt: T) -> T {
    if pair.0 == elt {
        pair.1
    } else {
        pair.0
    }
}

/// The generalized cross-product in 2D.
pub(crate) trait WCross<Rhs>: Sized {
    type Result;
    fn gcross(&self, rhs: Rhs) -> Self::Result;
}

impl WCross<Vector2<Real>> for Vector2<Real> {
    type Result = Real;

    fn gcross(&self, rhs: Vector2<Real>) -> Self::Result {
        self.x * rhs.y - self.y * rhs.x
    }
}

impl WCross<Vector2<Real>> for Real {
    type Result = Vector2<Real>;

    fn gcross(&self, rhs: Vector2<Real>) -> Self::Result {
        Vector2::new(-rhs.y * *self, rhs.x * *self)
    }
}

/// The matrix representation of the generalized cross-product in 2D.
pub(crate) trait WCrossMatrix: Sized {
    type Result;
    fn gcross_matrix(&self) -> Self::Result;
}

impl WCrossMatrix for Vector2<Real> {
    type Result = RowVector2<Real>;

    fn gcross_matrix(&self) -> Self::Result {
        RowVector2::new(-self.y, self.x)
    }
}

/// A 2x2 symmetric-positive-semi-definite matrix.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SdpMatrix2<N> {
    /// The component at the first row and first column of this matrix.
    pub m11: N,
    /// The component at the first row and second column of this matrix.
    pub m12: N,
    /// The component at the second row and second column of this matrix.
    pub m22: N,
}

impl<N: na::RealField + Copy> SdpMatrix2<N> {
    /// A new SDP matrix filled with the given components.
    ///
    /// The component `m21` is assumed to be equal to `m12`.
    pub fn new(m11: N, m12: N, m22: N) -> Self {
        Self { m11, m12, m22 }
    }

    /// Builds an SDP matrix from the components of `mat`, assumed to be symmetric.
    ///
    /// Only the lower-triangular part of `mat` is read.
    pub fn from_sdp_matrix(mat: Matrix2<N>) -> Self {
        Self {
            m11: mat.m11,
            m12: mat.m21,
            m22: mat.m22,
        }
    }

    /// The SDP matrix with all components set to zero.
    pub fn zero() -> Self {
        Self {
            m11: N::zero(),
            m12: N::zero(),
            m22: N::zero(),
        }
    }

    /// Converts this SDP matrix to a regular nalgebra matrix.
    pub fn into_matrix(self) -> Matrix2<N> {
        Matrix2::new(self.m11, self.m12, self.m12, self.m22)
    }
}

impl SdpMatrix2<Real> {
    /// The inverse of this SDP matrix.
    ///
    /// If the determinant of this matrix vanishes, the result is the zero
    /// matrix, so that multiplying by the "inverse" yields no correction at
    /// all instead of a non-finite one.
    pub fn inverse(&self) -> Self {
        let det = self.m11 * self.m22 - self.m12 * self.m12;
        let inv_det = inv(det);
        Self {
            m11: self.m22 * inv_det,
            m12: -self.m12 * inv_det,
            m22: self.m11 * inv_det,
        }
    }
}

impl<N: na::RealField + Copy> Mul<Vector2<N>> for SdpMatrix2<N> {
    type Output = Vector2<N>;

    fn mul(self, rhs: Vector2<N>) -> Self::Output {
        Vector2::new(
            self.m11 * rhs.x + self.m12 * rhs.y,
            self.m12 * rhs.x + self.m22 * rhs.y,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inv_of_zero_is_zero() {
        assert_eq!(inv(0.0), 0.0);
        assert_eq!(inv(1.0e-30), 0.0);
        assert_relative_eq!(inv(4.0), 0.25);
    }

    #[test]
    fn sdp_inverse_roundtrip() {
        let m = SdpMatrix2::new(3.0, 1.0, 2.0);
        let id = m.inverse().into_matrix() * m.into_matrix();
        assert_relative_eq!(id, Matrix2::identity(), epsilon = 1.0e-6);
    }

    #[test]
    fn sdp_singular_inverse_is_zero() {
        // Rank-1 matrix: determinant is exactly zero.
        let m = SdpMatrix2::new(1.0, 1.0, 1.0);
        assert_eq!(m.inverse(), SdpMatrix2::zero());
    }

    #[test]
    fn gcross_matches_cross_product() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 4.0);
        assert_relative_eq!(a.gcross(b), 1.0 * 4.0 - 2.0 * 3.0);

        let w: Real = 2.0;
        assert_relative_eq!(w.gcross(a), Vector2::new(-4.0, 2.0));

        // The matrix form is the linear map `r × _`.
        assert_relative_eq!(a.gcross_matrix() * b, na::Vector1::new(a.gcross(b)));
    }
}
