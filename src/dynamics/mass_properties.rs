use crate::math::{Isometry, Point, Real};
use crate::utils;

/// The local mass properties of a rigid-body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// The center of mass of a rigid-body expressed in its local-space.
    pub local_com: Point<Real>,
    /// The inverse of the mass of a rigid-body.
    ///
    /// If this is zero, the rigid-body is assumed to have infinite mass.
    pub inv_mass: Real,
    /// The inverse of the principal angular inertia of a rigid-body, about
    /// its center of mass.
    ///
    /// If this is zero, the rigid-body is assumed to have infinite angular
    /// inertia.
    pub inv_principal_inertia: Real,
}

impl MassProperties {
    /// Initializes the mass properties with the given center-of-mass, mass,
    /// and angular inertia.
    ///
    /// A zero mass (resp. angular inertia) yields a zero inverse mass (resp.
    /// inverse angular inertia), i.e. the body ignores any linear (resp.
    /// angular) impulse.
    pub fn new(local_com: Point<Real>, mass: Real, principal_inertia: Real) -> Self {
        Self {
            local_com,
            inv_mass: utils::inv(mass),
            inv_principal_inertia: utils::inv(principal_inertia),
        }
    }

    /// The world-space center of mass of a rigid-body with the given position.
    pub fn world_com(&self, pos: &Isometry<Real>) -> Point<Real> {
        pos * self.local_com
    }

    /// The mass of a rigid-body with these mass properties.
    ///
    /// Returns zero if the inverse mass is zero (infinite mass).
    pub fn mass(&self) -> Real {
        utils::inv(self.inv_mass)
    }

    /// The principal angular inertia of a rigid-body with these mass
    /// properties.
    ///
    /// Returns zero if the inverse angular inertia is zero (infinite
    /// inertia).
    pub fn principal_inertia(&self) -> Real {
        utils::inv(self.inv_principal_inertia)
    }
}

impl Default for MassProperties {
    fn default() -> Self {
        // All-zero inverses: the body ignores every impulse.
        Self {
            local_com: Point::origin(),
            inv_mass: 0.0,
            inv_principal_inertia: 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vector;
    use approx::assert_relative_eq;

    #[test]
    fn zero_mass_yields_zero_inverse() {
        let props = MassProperties::new(Point::origin(), 0.0, 0.0);
        assert_eq!(props.inv_mass, 0.0);
        assert_eq!(props.inv_principal_inertia, 0.0);
        assert_eq!(props.mass(), 0.0);
    }

    #[test]
    fn world_com_follows_the_body_frame() {
        let props = MassProperties::new(Point::new(1.0, 0.0), 2.0, 1.0);
        let pos = Isometry::new(Vector::new(1.0, 2.0), std::f32::consts::FRAC_PI_2 as Real);
        let world_com = props.world_com(&pos);
        assert_relative_eq!(world_com, Point::new(1.0, 3.0), epsilon = 1.0e-5);
        assert_relative_eq!(props.mass(), 2.0);
    }
}
