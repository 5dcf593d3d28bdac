use crate::data::{Arena, Index};
use crate::dynamics::{JointSet, RigidBody, RigidBodyActivation, RigidBodyType};
use crate::math::Real;
use crate::utils;

/// The unique identifier of a rigid-body added to a `RigidBodySet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct RigidBodyHandle(pub Index);

impl RigidBodyHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs a handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(Index::from_raw_parts(id, generation))
    }

    /// An always-invalid rigid-body handle.
    pub fn invalid() -> Self {
        Self(Index::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32))
    }
}

/// A set of rigid bodies that can be handled by a physics pipeline.
///
/// This set is also responsible for maintaining the active rigid-bodies and
/// their simulation islands, and for putting non-moving rigid-bodies to sleep
/// to save computation time.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone)]
pub struct RigidBodySet {
    pub(crate) bodies: Arena<RigidBody>,
    pub(crate) active_dynamic_set: Vec<RigidBodyHandle>,
    pub(crate) active_kinematic_set: Vec<RigidBodyHandle>,
    // Each island is a range `active_islands[i]..active_islands[i + 1]` of the
    // active dynamic set, with a sentinel at the end.
    pub(crate) active_islands: Vec<usize>,
    active_set_timestamp: u32,
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    can_sleep: Vec<RigidBodyHandle>, // Workspace.
    #[cfg_attr(feature = "serde-serialize", serde(skip))]
    stack: Vec<RigidBodyHandle>, // Workspace.
}

impl RigidBodySet {
    /// Create a new empty set of rigid bodies.
    pub fn new() -> Self {
        Self {
            bodies: Arena::new(),
            active_dynamic_set: vec![],
            active_kinematic_set: vec![],
            active_islands: vec![],
            active_set_timestamp: 0,
            can_sleep: vec![],
            stack: vec![],
        }
    }

    /// The number of rigid bodies on this set.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// `true` if there are no rigid bodies in this set.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Is the given body handle valid?
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Insert a rigid body into this set and retrieve its handle.
    pub fn insert(&mut self, mut rb: RigidBody) -> RigidBodyHandle {
        rb.update_world_mass_properties();
        let handle = RigidBodyHandle(self.bodies.insert(rb));
        let rb = &mut self.bodies[handle.0];

        match rb.body_type {
            RigidBodyType::Dynamic if !rb.activation.sleeping => {
                rb.active_set_id = self.active_dynamic_set.len();
                self.active_dynamic_set.push(handle);
            }
            RigidBodyType::Kinematic => {
                rb.active_set_id = self.active_kinematic_set.len();
                self.active_kinematic_set.push(handle);
            }
            _ => {}
        }

        handle
    }

    /// Removes a rigid-body, and all the joints attached to it.
    pub fn remove(&mut self, handle: RigidBodyHandle, joints: &mut JointSet) -> Option<RigidBody> {
        let rb = self.bodies.remove(handle.0)?;

        // Remove this body from the active sets, patching the body moved by
        // the swap-removal.
        let mut active_sets = [&mut self.active_kinematic_set, &mut self.active_dynamic_set];
        let mut moved = None;

        for active_set in &mut active_sets {
            if active_set.get(rb.active_set_id) == Some(&handle) {
                active_set.swap_remove(rb.active_set_id);
                moved = active_set.get(rb.active_set_id).copied();
            }
        }

        if let Some(moved) = moved {
            self.bodies[moved.0].active_set_id = rb.active_set_id;
        }

        joints.remove_joints_attached_to_rigid_body(handle, self);
        Some(rb)
    }

    /// Gets the rigid-body with the given handle.
    pub fn get(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    /// Gets a mutable reference to the rigid-body with the given handle.
    ///
    /// If this modifies a sleeping body, call [`RigidBodySet::wake_up`]
    /// afterwards so the modification takes effect.
    pub fn get_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    /// Iterates through all the rigid-bodies on this set.
    pub fn iter(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.bodies.iter().map(|(h, rb)| (RigidBodyHandle(h), rb))
    }

    /// Iterates mutably through all the rigid-bodies on this set.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RigidBodyHandle, &mut RigidBody)> {
        self.bodies.iter_mut().map(|(h, rb)| (RigidBodyHandle(h), rb))
    }

    /// The handles of all the active dynamic rigid-bodies on this set.
    pub fn active_dynamic_bodies(&self) -> &[RigidBodyHandle] {
        &self.active_dynamic_set[..]
    }

    /// The handles of all the active kinematic rigid-bodies on this set.
    pub fn active_kinematic_bodies(&self) -> &[RigidBodyHandle] {
        &self.active_kinematic_set[..]
    }

    pub(crate) fn num_islands(&self) -> usize {
        self.active_islands.len() - 1
    }

    pub(crate) fn active_island(&self, island_id: usize) -> &[RigidBodyHandle] {
        let island_range = self.active_islands[island_id]..self.active_islands[island_id + 1];
        &self.active_dynamic_set[island_range]
    }

    pub(crate) fn iter_active_island(
        &self,
        island_id: usize,
    ) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.active_island(island_id)
            .iter()
            .map(move |h| (*h, &self.bodies[h.0]))
    }

    pub(crate) fn foreach_active_island_body_mut_internal(
        &mut self,
        island_id: usize,
        mut f: impl FnMut(RigidBodyHandle, &mut RigidBody),
    ) {
        let island_range = self.active_islands[island_id]..self.active_islands[island_id + 1];
        for handle in &self.active_dynamic_set[island_range] {
            if let Some(rb) = self.bodies.get_mut(handle.0) {
                f(*handle, rb)
            }
        }
    }

    pub(crate) fn foreach_active_dynamic_body_mut_internal(
        &mut self,
        mut f: impl FnMut(RigidBodyHandle, &mut RigidBody),
    ) {
        for handle in &self.active_dynamic_set {
            if let Some(rb) = self.bodies.get_mut(handle.0) {
                f(*handle, rb)
            }
        }
    }

    pub(crate) fn foreach_active_kinematic_body_mut_internal(
        &mut self,
        mut f: impl FnMut(RigidBodyHandle, &mut RigidBody),
    ) {
        for handle in &self.active_kinematic_set {
            if let Some(rb) = self.bodies.get_mut(handle.0) {
                f(*handle, rb)
            }
        }
    }

    /// Forces the specified rigid-body to wake up if it is dynamic.
    ///
    /// If `strong` is `true` then it is assured that the rigid-body will
    /// remain awake during multiple subsequent timesteps.
    pub fn wake_up(&mut self, handle: RigidBodyHandle, strong: bool) {
        // NOTE: there are legitimate cases (like when deleting a joint
        // attached to an already-removed body) where we could be attempting to
        // wake-up a rigid-body that has already been deleted.
        if let Some(rb) = self.bodies.get_mut(handle.0) {
            if rb.is_dynamic() {
                rb.wake_up(strong);

                if self.active_dynamic_set.get(rb.active_set_id) != Some(&handle) {
                    rb.active_set_id = self.active_dynamic_set.len();
                    self.active_dynamic_set.push(handle);
                }
            }
        }
    }

    /// Updates the active-set and island bookkeeping, using joints as the
    /// connectivity between bodies.
    pub(crate) fn update_active_set_with_joints(
        &mut self,
        joints: &JointSet,
        min_island_size: usize,
    ) {
        assert!(
            min_island_size > 0,
            "The minimum island size must be at least 1."
        );

        // Update the energy of every rigid body and
        // keep only those that may not sleep.
        self.active_set_timestamp += 1;
        self.stack.clear();
        self.can_sleep.clear();

        // NOTE: the `.rev()` is here so that two successive timesteps preserve
        // the order of the bodies in the `active_dynamic_set` vec. This reversal
        // does not seem to affect performances nor stability. However it makes
        // debugging slightly nicer so we keep this rev.
        let mut old_active_set = std::mem::take(&mut self.active_dynamic_set);
        for h in old_active_set.drain(..).rev() {
            let rb = &mut self.bodies[h.0];
            let pseudo_kinetic_energy = rb.pseudo_kinetic_energy();
            update_energy(&mut rb.activation, pseudo_kinetic_energy);

            if rb.activation.energy <= rb.activation.threshold {
                // Mark them as sleeping for now. This will
                // be set to false during the graph traversal
                // if it should not be put to sleep.
                rb.activation.sleeping = true;
                self.can_sleep.push(h);
            } else {
                self.stack.push(h);
            }
        }
        self.active_dynamic_set = old_active_set;

        // Now iterate on all active kinematic bodies and push all the bodies
        // joined to them to the stack so they can be woken up.
        for h in self.active_kinematic_set.iter() {
            let rb = &self.bodies[h.0];

            if !rb.is_moving() {
                // If the kinematic body does not move, it does not have
                // to wake up any dynamic body.
                continue;
            }

            for inter in joints.joints_with(*h) {
                let other = utils::select_other((inter.0, inter.1), *h);
                self.stack.push(other);
            }
        }

        // Propagation of awake state and awake island computation through the
        // traversal of the joint graph.
        self.active_islands.clear();
        self.active_islands.push(0);

        // The max avoids underflow when the stack is empty.
        let mut island_marker = self.stack.len().max(1) - 1;

        while let Some(handle) = self.stack.pop() {
            let rb = &self.bodies[handle.0];

            if rb.active_set_timestamp == self.active_set_timestamp || !rb.is_dynamic() {
                // We already visited this body and its neighbors.
                // Also, we don't propagate awake state through static bodies.
                continue;
            }

            if self.stack.len() < island_marker {
                if self.active_dynamic_set.len() - *self.active_islands.last().unwrap()
                    >= min_island_size
                {
                    // We are starting a new island.
                    self.active_islands.push(self.active_dynamic_set.len());
                }

                island_marker = self.stack.len();
            }

            // Transmit the active state to all the rigid-bodies attached to
            // this one by a joint.
            for inter in joints.joints_with(handle) {
                let other = utils::select_other((inter.0, inter.1), handle);
                self.stack.push(other);
            }

            let rb = &mut self.bodies[handle.0];
            rb.activation.wake_up(false);
            rb.active_island_id = self.active_islands.len() - 1;
            rb.active_set_id = self.active_dynamic_set.len();
            rb.active_set_offset = rb.active_set_id - self.active_islands[rb.active_island_id];
            rb.active_set_timestamp = self.active_set_timestamp;

            self.active_dynamic_set.push(handle);
        }

        self.active_islands.push(self.active_dynamic_set.len());

        // Actually put to sleep bodies which have not been detected as awake.
        for h in &self.can_sleep {
            let rb = &mut self.bodies[h.0];
            if rb.activation.sleeping {
                rb.sleep();
            }
        }
    }
}

impl Default for RigidBodySet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<RigidBodyHandle> for RigidBodySet {
    type Output = RigidBody;

    fn index(&self, index: RigidBodyHandle) -> &RigidBody {
        &self.bodies[index.0]
    }
}

impl std::ops::IndexMut<RigidBodyHandle> for RigidBodySet {
    fn index_mut(&mut self, index: RigidBodyHandle) -> &mut RigidBody {
        &mut self.bodies[index.0]
    }
}

fn update_energy(activation: &mut RigidBodyActivation, pseudo_kinetic_energy: Real) {
    let mix_factor = 0.01;
    let new_energy = (1.0 - mix_factor) * activation.energy + mix_factor * pseudo_kinetic_energy;
    activation.energy = new_energy.min(activation.threshold.abs() * 4.0);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{MotorJoint, RigidBodyBuilder};
    use crate::math::{Point, Vector};
    use crate::prelude::MassProperties;

    fn dynamic_body() -> RigidBody {
        RigidBodyBuilder::new_dynamic()
            .mass_properties(MassProperties::new(Point::origin(), 1.0, 1.0))
            .build()
    }

    #[test]
    fn islands_split_by_joint_connectivity() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let a1 = bodies.insert(dynamic_body());
        let a2 = bodies.insert(dynamic_body());
        let b1 = bodies.insert(dynamic_body());
        let b2 = bodies.insert(dynamic_body());

        joints.insert(&mut bodies, a1, a2, MotorJoint::new(Vector::zeros(), 0.0));
        joints.insert(&mut bodies, b1, b2, MotorJoint::new(Vector::zeros(), 0.0));

        bodies.update_active_set_with_joints(&joints, 1);
        assert_eq!(bodies.num_islands(), 2);

        // Each island contains one connected pair.
        for island_id in 0..bodies.num_islands() {
            assert_eq!(bodies.active_island(island_id).len(), 2);
        }

        // With a large minimum island size the islands get merged.
        bodies.update_active_set_with_joints(&joints, 128);
        assert_eq!(bodies.num_islands(), 1);
        assert_eq!(bodies.active_island(0).len(), 4);
    }

    #[test]
    fn still_bodies_fall_asleep_and_wake_up() {
        let mut bodies = RigidBodySet::new();
        let joints = JointSet::new();
        let h = bodies.insert(dynamic_body());

        for _ in 0..200 {
            bodies.update_active_set_with_joints(&joints, 128);
        }

        assert!(bodies[h].is_sleeping());
        assert!(bodies.active_dynamic_bodies().is_empty());

        bodies.wake_up(h, true);
        assert!(!bodies[h].is_sleeping());
        assert_eq!(bodies.active_dynamic_bodies(), &[h][..]);
    }

    #[test]
    fn moving_bodies_stay_awake() {
        let mut bodies = RigidBodySet::new();
        let joints = JointSet::new();
        let h = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .mass_properties(MassProperties::new(Point::origin(), 1.0, 1.0))
                .linvel(1.0, 0.0)
                .build(),
        );

        for _ in 0..200 {
            bodies.update_active_set_with_joints(&joints, 128);
        }

        assert!(!bodies[h].is_sleeping());
        assert_eq!(bodies.active_dynamic_bodies(), &[h][..]);
    }

    #[test]
    fn moving_kinematic_body_wakes_its_joint_partner() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let platform = bodies.insert(RigidBodyBuilder::new_kinematic().build());
        let rider = bodies.insert(dynamic_body());
        joints.insert(
            &mut bodies,
            platform,
            rider,
            MotorJoint::new(Vector::zeros(), 0.0),
        );

        // Let the rider fall asleep.
        for _ in 0..200 {
            bodies.update_active_set_with_joints(&joints, 128);
        }
        assert!(bodies[rider].is_sleeping());

        // A moving kinematic platform drags the rider out of sleep.
        bodies[platform].set_linvel(Vector::new(1.0, 0.0));
        bodies.update_active_set_with_joints(&joints, 128);
        assert!(!bodies[rider].is_sleeping());
        assert_eq!(bodies.active_dynamic_bodies(), &[rider][..]);
    }

    #[test]
    fn removal_patches_the_active_set() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let h1 = bodies.insert(dynamic_body());
        let h2 = bodies.insert(dynamic_body());
        let h3 = bodies.insert(dynamic_body());

        bodies.remove(h1, &mut joints);
        assert_eq!(bodies.len(), 2);

        // The swap-removal moved `h3` into the first slot.
        for (i, h) in bodies.active_dynamic_bodies().iter().enumerate() {
            assert_eq!(bodies[*h].active_set_id, i);
        }
        assert!(bodies.active_dynamic_bodies().contains(&h2));
        assert!(bodies.active_dynamic_bodies().contains(&h3));
    }

    #[test]
    fn bodies_outside_the_active_sets_can_be_removed_and_woken() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        // Neither body enters an active set on insertion.
        let ground = bodies.insert(RigidBodyBuilder::new_static().build());
        let sleeper = bodies.insert(
            RigidBodyBuilder::new_dynamic()
                .mass_properties(MassProperties::new(Point::origin(), 1.0, 1.0))
                .sleeping(true)
                .build(),
        );
        assert!(bodies.active_dynamic_bodies().is_empty());

        bodies.remove(ground, &mut joints);
        assert!(bodies.active_dynamic_bodies().is_empty());

        bodies.wake_up(sleeper, true);
        assert!(!bodies[sleeper].is_sleeping());
        assert_eq!(bodies.active_dynamic_bodies(), &[sleeper][..]);
        assert_eq!(bodies[sleeper].active_set_id, 0);
    }
}
