use crate::dynamics::MassProperties;
use crate::math::{AngVector, Isometry, Point, Real, Rotation, Translation, Vector};
use crate::utils::WCross;
use num::Zero;

/// The status of a body, governing the way it is affected by external forces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum RigidBodyType {
    /// A body affected by impulses (joints included).
    Dynamic,
    /// A body that never moves.
    Static,
    /// A body ignoring impulses, moving only through its user-set velocity.
    Kinematic,
}

/// The activation (sleeping) state of a rigid-body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyActivation {
    /// The pseudo-kinetic-energy threshold below which this body can fall asleep.
    ///
    /// A negative threshold prevents the body from ever sleeping.
    pub threshold: Real,
    /// The current exponentially-averaged pseudo-kinetic energy of this body.
    pub energy: Real,
    /// Is this body currently sleeping?
    pub sleeping: bool,
}

impl Default for RigidBodyActivation {
    fn default() -> Self {
        Self::active()
    }
}

impl RigidBodyActivation {
    /// The default energy threshold below which a body can be put to sleep.
    pub fn default_threshold() -> Real {
        0.01
    }

    /// Creates an awake activation state with the default threshold.
    pub fn active() -> Self {
        RigidBodyActivation {
            threshold: Self::default_threshold(),
            energy: Self::default_threshold() * 2.0,
            sleeping: false,
        }
    }

    /// Creates an asleep activation state with the default threshold.
    pub fn inactive() -> Self {
        RigidBodyActivation {
            threshold: Self::default_threshold(),
            energy: 0.0,
            sleeping: true,
        }
    }

    /// Creates an activation state that prevents the body from ever sleeping.
    pub fn cannot_sleep() -> Self {
        RigidBodyActivation {
            threshold: -1.0,
            ..Self::active()
        }
    }

    /// Is this body awake?
    pub fn is_active(&self) -> bool {
        self.energy != 0.0
    }

    pub(crate) fn wake_up(&mut self, strong: bool) {
        self.sleeping = false;
        if strong || self.energy == 0.0 {
            self.energy = self.threshold.abs() * 2.0;
        }
    }

    pub(crate) fn sleep(&mut self) {
        self.energy = 0.0;
        self.sleeping = true;
    }
}

/// A rigid body.
///
/// To create a new rigid-body, use the [`RigidBodyBuilder`] structure.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBody {
    /// The world-space position of this body.
    pub(crate) position: Isometry<Real>,
    /// The next world-space position, as computed by the solver but not
    /// promoted to `position` yet.
    pub(crate) next_position: Isometry<Real>,
    /// The local mass properties of this body.
    pub(crate) mass_properties: MassProperties,
    /// The world-space center of mass of this body.
    pub(crate) world_com: Point<Real>,
    /// The inverse mass taking into account translation locking.
    pub(crate) effective_inv_mass: Real,
    /// The inverse angular inertia taking into account rotation locking.
    pub(crate) effective_world_inv_inertia: Real,
    /// The linear velocity of this body.
    pub(crate) linvel: Vector<Real>,
    /// The angular velocity of this body.
    pub(crate) angvel: AngVector<Real>,
    pub(crate) body_type: RigidBodyType,
    pub(crate) translations_locked: bool,
    pub(crate) rotations_locked: bool,
    /// The activation (sleeping) state of this body.
    pub(crate) activation: RigidBodyActivation,
    pub(crate) active_island_id: usize,
    pub(crate) active_set_id: usize,
    pub(crate) active_set_offset: usize,
    pub(crate) active_set_timestamp: u32,
    /// User-defined data associated to this rigid-body.
    pub user_data: u128,
}

impl RigidBody {
    fn new() -> Self {
        Self {
            position: Isometry::identity(),
            next_position: Isometry::identity(),
            mass_properties: MassProperties::default(),
            world_com: Point::origin(),
            effective_inv_mass: 0.0,
            effective_world_inv_inertia: 0.0,
            linvel: Vector::zeros(),
            angvel: 0.0,
            body_type: RigidBodyType::Dynamic,
            translations_locked: false,
            rotations_locked: false,
            activation: RigidBodyActivation::active(),
            active_island_id: crate::INVALID_USIZE,
            active_set_id: crate::INVALID_USIZE,
            active_set_offset: crate::INVALID_USIZE,
            active_set_timestamp: 0,
            user_data: 0,
        }
    }

    /// The activation (sleeping) state of this body.
    pub fn activation(&self) -> &RigidBodyActivation {
        &self.activation
    }

    /// Is this body sleeping?
    pub fn is_sleeping(&self) -> bool {
        self.activation.sleeping
    }

    /// Is the velocity of this body not zero?
    pub fn is_moving(&self) -> bool {
        !self.linvel.is_zero() || !self.angvel.is_zero()
    }

    /// The type of this body (dynamic, static, or kinematic).
    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Is this body dynamic, i.e. affected by impulses?
    pub fn is_dynamic(&self) -> bool {
        self.body_type == RigidBodyType::Dynamic
    }

    /// Is this body static, i.e. never moving?
    pub fn is_static(&self) -> bool {
        self.body_type == RigidBodyType::Static
    }

    /// Is this body kinematic, i.e. moving only through its user-set velocity?
    pub fn is_kinematic(&self) -> bool {
        self.body_type == RigidBodyType::Kinematic
    }

    /// The mass properties of this body.
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass_properties
    }

    /// The mass of this body.
    pub fn mass(&self) -> Real {
        self.mass_properties.mass()
    }

    /// The world-space center of mass of this body.
    pub fn world_com(&self) -> &Point<Real> {
        &self.world_com
    }

    /// Is the translation of this body locked?
    pub fn is_translation_locked(&self) -> bool {
        self.translations_locked
    }

    /// Is the rotation of this body locked?
    pub fn is_rotation_locked(&self) -> bool {
        self.rotations_locked
    }

    /// The world-space position of this body.
    pub fn position(&self) -> &Isometry<Real> {
        &self.position
    }

    /// The position of this body computed by the last solver sub-step, before
    /// promotion to `self.position`.
    pub fn next_position(&self) -> &Isometry<Real> {
        &self.next_position
    }

    /// Sets the position of this body.
    ///
    /// The next position is overwritten as well, so the solver does not see a
    /// phantom displacement.
    pub fn set_position(&mut self, pos: Isometry<Real>) {
        self.position = pos;
        self.next_position = pos;
        self.update_world_mass_properties();
    }

    pub(crate) fn set_next_position(&mut self, pos: Isometry<Real>) {
        self.next_position = pos;
    }

    /// The linear velocity of this body.
    pub fn linvel(&self) -> &Vector<Real> {
        &self.linvel
    }

    /// The angular velocity of this body.
    pub fn angvel(&self) -> AngVector<Real> {
        self.angvel
    }

    /// Sets the linear velocity of this body.
    ///
    /// This does not wake the body up; see
    /// [`crate::dynamics::RigidBodySet::wake_up`].
    pub fn set_linvel(&mut self, linvel: Vector<Real>) {
        self.linvel = linvel;
    }

    /// Sets the angular velocity of this body.
    ///
    /// This does not wake the body up; see
    /// [`crate::dynamics::RigidBodySet::wake_up`].
    pub fn set_angvel(&mut self, angvel: AngVector<Real>) {
        self.angvel = angvel;
    }

    /// The velocity of the given world-space point on this body.
    pub fn velocity_at_point(&self, point: &Point<Real>) -> Vector<Real> {
        let dpt = point - self.world_com;
        self.linvel + self.angvel.gcross(dpt)
    }

    /// Applies an impulse at the center-of-mass of this body.
    ///
    /// The impulse is applied right away, changing the linear velocity. This
    /// does nothing on non-dynamic bodies, and does not wake the body up.
    pub fn apply_impulse(&mut self, impulse: Vector<Real>) {
        if self.body_type == RigidBodyType::Dynamic {
            self.linvel += impulse * self.effective_inv_mass;
        }
    }

    /// Applies an angular impulse at the center-of-mass of this body.
    ///
    /// The impulse is applied right away, changing the angular velocity. This
    /// does nothing on non-dynamic bodies, and does not wake the body up.
    pub fn apply_torque_impulse(&mut self, torque_impulse: Real) {
        if self.body_type == RigidBodyType::Dynamic {
            self.angvel += self.effective_world_inv_inertia * torque_impulse;
        }
    }

    /// The kinetic energy of this body.
    pub fn kinetic_energy(&self) -> Real {
        let linear = self.mass() * self.linvel.norm_squared();
        let angular = self.mass_properties.principal_inertia() * self.angvel * self.angvel;
        (linear + angular) / 2.0
    }

    /// The mass-independent energy used for sleep scoring.
    pub(crate) fn pseudo_kinetic_energy(&self) -> Real {
        self.linvel.norm_squared() + self.angvel * self.angvel
    }

    pub(crate) fn wake_up(&mut self, strong: bool) {
        self.activation.wake_up(strong);
    }

    pub(crate) fn sleep(&mut self) {
        self.activation.sleep();
        self.linvel = Vector::zeros();
        self.angvel = 0.0;
    }

    pub(crate) fn update_world_mass_properties(&mut self) {
        self.world_com = self.mass_properties.world_com(&self.position);

        self.effective_inv_mass = if self.is_dynamic() && !self.translations_locked {
            self.mass_properties.inv_mass
        } else {
            0.0
        };

        // In 2D the world inverse inertia equals the principal inverse
        // inertia: rotating a scalar inertia leaves it unchanged.
        self.effective_world_inv_inertia = if self.is_dynamic() && !self.rotations_locked {
            self.mass_properties.inv_principal_inertia
        } else {
            0.0
        };
    }

    /// Integrates the velocities of this body to compute its next position.
    ///
    /// The motion is anchored at the center of mass: the body translates by
    /// `linvel * dt` and rotates about its center of mass by `angvel * dt`.
    pub(crate) fn integrate_next_position(&mut self, dt: Real) {
        let com = self.position * self.mass_properties.local_com;
        let shift = Translation::from(com.coords);
        self.next_position =
            shift * Isometry::new(self.linvel * dt, self.angvel * dt) * shift.inverse()
                * self.position;
    }
}

/// A builder for rigid-bodies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyBuilder {
    position: Isometry<Real>,
    linvel: Vector<Real>,
    angvel: AngVector<Real>,
    body_type: RigidBodyType,
    mass_properties: MassProperties,
    can_sleep: bool,
    sleeping: bool,
    translations_locked: bool,
    rotations_locked: bool,
    user_data: u128,
}

impl RigidBodyBuilder {
    /// Initializes the builder of a new rigid body with the given type.
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            angvel: 0.0,
            body_type,
            mass_properties: MassProperties::default(),
            can_sleep: true,
            sleeping: false,
            translations_locked: false,
            rotations_locked: false,
            user_data: 0,
        }
    }

    /// Initializes the builder of a new static rigid body.
    pub fn new_static() -> Self {
        Self::new(RigidBodyType::Static)
    }

    /// Initializes the builder of a new kinematic rigid body.
    pub fn new_kinematic() -> Self {
        Self::new(RigidBodyType::Kinematic)
    }

    /// Initializes the builder of a new dynamic rigid body.
    pub fn new_dynamic() -> Self {
        Self::new(RigidBodyType::Dynamic)
    }

    /// Sets the initial translation of the rigid-body to be created.
    pub fn translation(mut self, x: Real, y: Real) -> Self {
        self.position.translation.x = x;
        self.position.translation.y = y;
        self
    }

    /// Sets the initial orientation of the rigid-body to be created.
    pub fn rotation(mut self, angle: AngVector<Real>) -> Self {
        self.position.rotation = Rotation::new(angle);
        self
    }

    /// Sets the initial position (translation and orientation) of the
    /// rigid-body to be created.
    pub fn position(mut self, pos: Isometry<Real>) -> Self {
        self.position = pos;
        self
    }

    /// Sets the mass properties of the rigid-body being built.
    ///
    /// If this is never called, the rigid-body ignores every impulse (its
    /// inverse mass and inverse angular inertia are both zero).
    pub fn mass_properties(mut self, props: MassProperties) -> Self {
        self.mass_properties = props;
        self
    }

    /// Prevents this rigid-body from translating because of impulses.
    pub fn lock_translations(mut self) -> Self {
        self.translations_locked = true;
        self
    }

    /// Prevents this rigid-body from rotating because of impulses.
    pub fn lock_rotations(mut self) -> Self {
        self.rotations_locked = true;
        self
    }

    /// Sets the initial linear velocity of the rigid-body to be created.
    pub fn linvel(mut self, x: Real, y: Real) -> Self {
        self.linvel = Vector::new(x, y);
        self
    }

    /// Sets the initial angular velocity of the rigid-body to be created.
    pub fn angvel(mut self, angvel: AngVector<Real>) -> Self {
        self.angvel = angvel;
        self
    }

    /// Sets whether or not the rigid-body to be created can sleep if it
    /// reaches a dynamic equilibrium.
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Sets whether or not the rigid-body is to be created asleep.
    pub fn sleeping(mut self, sleeping: bool) -> Self {
        self.sleeping = sleeping;
        self
    }

    /// An arbitrary user-defined 128-bit integer associated to the
    /// rigid-bodies built by this builder.
    pub fn user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }

    /// Build a new rigid-body with the parameters configured with this
    /// builder.
    pub fn build(&self) -> RigidBody {
        let mut rb = RigidBody::new();
        rb.position = self.position;
        rb.next_position = self.position;
        rb.linvel = self.linvel;
        rb.angvel = self.angvel;
        rb.body_type = self.body_type;
        rb.mass_properties = self.mass_properties;
        rb.translations_locked = self.translations_locked;
        rb.rotations_locked = self.rotations_locked;
        rb.user_data = self.user_data;

        if self.can_sleep && self.sleeping {
            rb.activation = RigidBodyActivation::inactive();
        }
        if !self.can_sleep {
            rb.activation = RigidBodyActivation::cannot_sleep();
        }

        rb.update_world_mass_properties();
        rb
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn static_bodies_ignore_impulses() {
        let mut rb = RigidBodyBuilder::new_static()
            .mass_properties(MassProperties::new(Point::origin(), 1.0, 1.0))
            .build();
        assert_eq!(rb.effective_inv_mass, 0.0);
        assert_eq!(rb.effective_world_inv_inertia, 0.0);

        rb.apply_impulse(Vector::new(1.0, 0.0));
        rb.apply_torque_impulse(1.0);
        assert!(!rb.is_moving());
    }

    #[test]
    fn locked_rotations_zero_the_effective_inertia() {
        let rb = RigidBodyBuilder::new_dynamic()
            .mass_properties(MassProperties::new(Point::origin(), 2.0, 3.0))
            .lock_rotations()
            .build();
        assert_relative_eq!(rb.effective_inv_mass, 0.5);
        assert_eq!(rb.effective_world_inv_inertia, 0.0);
    }

    #[test]
    fn integration_rotates_about_the_center_of_mass() {
        let angvel = std::f32::consts::FRAC_PI_2 as Real;
        let mut rb = RigidBodyBuilder::new_dynamic()
            .mass_properties(MassProperties::new(Point::new(1.0, 0.0), 1.0, 1.0))
            .angvel(angvel)
            .build();
        rb.integrate_next_position(1.0);

        // The body origin orbits the center of mass (1, 0).
        let next = rb.next_position();
        assert_relative_eq!(
            next.translation.vector,
            Vector::new(1.0, -1.0),
            epsilon = 1.0e-5
        );
        assert_relative_eq!(next.rotation.angle(), angvel, epsilon = 1.0e-5);
    }

    #[test]
    fn velocity_at_point_includes_the_angular_part() {
        let mut rb = RigidBodyBuilder::new_dynamic()
            .mass_properties(MassProperties::new(Point::origin(), 1.0, 1.0))
            .linvel(1.0, 0.0)
            .angvel(2.0)
            .build();
        rb.update_world_mass_properties();

        let vel = rb.velocity_at_point(&Point::new(0.0, 1.0));
        assert_relative_eq!(vel, Vector::new(1.0 - 2.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn builder_sleep_states() {
        assert!(RigidBodyBuilder::new_dynamic().build().activation().is_active());
        assert!(RigidBodyBuilder::new_dynamic()
            .sleeping(true)
            .build()
            .is_sleeping());
        assert!(RigidBodyBuilder::new_dynamic()
            .can_sleep(false)
            .build()
            .activation()
            .threshold < 0.0);
    }
}
