use crate::data::{Arena, Index};
use crate::dynamics::{Joint, JointParams, RigidBodyHandle, RigidBodySet};
use crate::error_handler::{default_error_handler, Error};
use crate::math::{Real, Vector};

/// The position of a joint in the dense array of all the joints of a
/// `JointSet`.
pub(crate) type JointIndex = usize;

/// The unique identifier of a joint added to a `JointSet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct JointHandle(pub Index);

impl JointHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs a handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(Index::from_raw_parts(id, generation))
    }

    /// An always-invalid joint handle.
    pub fn invalid() -> Self {
        Self(Index::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32))
    }
}

/// A set of joints that can be handled by a physics pipeline.
///
/// The joints themselves are stored in a dense array so the solver can iterate
/// through them without indirection. Handles remain stable across removals.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone)]
pub struct JointSet {
    // Maps joint handles to indices in `joints`.
    joint_ids: Arena<JointIndex>,
    joints: Vec<Joint>,
}

impl JointSet {
    /// Creates a new empty set of joints.
    pub fn new() -> Self {
        Self {
            joint_ids: Arena::new(),
            joints: Vec::new(),
        }
    }

    /// The number of joints on this set.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// `true` if there are no joints in this set.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Is the given joint handle valid?
    pub fn contains(&self, handle: JointHandle) -> bool {
        self.joint_ids.contains(handle.0)
    }

    /// Gets the joint with the given handle.
    pub fn get(&self, handle: JointHandle) -> Option<&Joint> {
        let id = self.joint_ids.get(handle.0)?;
        self.joints.get(*id)
    }

    /// Gets a mutable reference to the joint with the given handle.
    ///
    /// Modifications done through this reference do not wake the attached
    /// rigid-bodies up. Use [`JointSet::set_motor_linear_offset`] and
    /// [`JointSet::set_motor_angular_offset`] to change a motor target in a
    /// way that wakes the bodies it must move.
    pub fn get_mut(&mut self, handle: JointHandle) -> Option<&mut Joint> {
        let id = self.joint_ids.get(handle.0)?;
        self.joints.get_mut(*id)
    }

    /// Iterates through all the joints on this set.
    pub fn iter(&self) -> impl Iterator<Item = (JointHandle, &Joint)> {
        self.joints.iter().map(|joint| (joint.handle, joint))
    }

    pub(crate) fn joints_mut(&mut self) -> &mut [Joint] {
        &mut self.joints[..]
    }

    /// Iterates through the joints attached to the given rigid-body, yielding
    /// both endpoints and the joint position in the dense array.
    pub(crate) fn joints_with(
        &self,
        body: RigidBodyHandle,
    ) -> impl Iterator<Item = (RigidBodyHandle, RigidBodyHandle, JointIndex)> + '_ {
        self.joints.iter().enumerate().filter_map(move |(i, joint)| {
            if joint.body1 == body || joint.body2 == body {
                Some((joint.body1, joint.body2, i))
            } else {
                None
            }
        })
    }

    /// Inserts a new joint into this set and retrieves its handle.
    ///
    /// Both attached rigid-bodies are woken up. If one of the body handles is
    /// not part of `bodies`, or if both handles point to the same body, the
    /// global error handler is invoked and `JointHandle::invalid()` is
    /// returned.
    pub fn insert(
        &mut self,
        bodies: &mut RigidBodySet,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint_params: impl Into<JointParams>,
    ) -> JointHandle {
        if body1 == body2 {
            let handler = default_error_handler();
            handler(Error::JointInsertSameBody(format!(
                "Cannot attach a joint to a single rigid-body twice: {:?}.",
                body1
            )));
            return JointHandle::invalid();
        }

        if !bodies.contains(body1) || !bodies.contains(body2) {
            let handler = default_error_handler();
            handler(Error::JointInsertBodyNotFound(format!(
                "At least one of the rigid-bodies {:?} and {:?} was not found in the set.",
                body1, body2
            )));
            return JointHandle::invalid();
        }

        let handle = JointHandle(self.joint_ids.insert(self.joints.len()));
        self.joints.push(Joint {
            body1,
            body2,
            handle,
            params: joint_params.into(),
        });

        bodies.wake_up(body1, true);
        bodies.wake_up(body2, true);
        handle
    }

    /// Removes a joint from this set.
    ///
    /// If `wake_up` is `true`, the rigid-bodies attached to this joint will be
    /// woken up.
    pub fn remove(
        &mut self,
        handle: JointHandle,
        bodies: &mut RigidBodySet,
        wake_up: bool,
    ) -> Option<Joint> {
        let id = self.joint_ids.remove(handle.0)?;
        let removed = self.joints.swap_remove(id);

        // Patch the id of the joint moved by the swap-removal.
        if let Some(moved) = self.joints.get(id) {
            self.joint_ids[moved.handle.0] = id;
        }

        if wake_up {
            bodies.wake_up(removed.body1, true);
            bodies.wake_up(removed.body2, true);
        }

        Some(removed)
    }

    /// Removes every joint attached to the given rigid-body, waking up the
    /// bodies at their other endpoints.
    pub(crate) fn remove_joints_attached_to_rigid_body(
        &mut self,
        handle: RigidBodyHandle,
        bodies: &mut RigidBodySet,
    ) {
        // Collect the handles first because the removals shuffle `joints`.
        let attached: Vec<JointHandle> = self
            .joints
            .iter()
            .filter(|joint| joint.body1 == handle || joint.body2 == handle)
            .map(|joint| joint.handle)
            .collect();

        for joint_handle in attached {
            self.remove(joint_handle, bodies, true);
        }
    }

    /// Sets the target linear offset of the given motor joint.
    ///
    /// Both attached rigid-bodies are woken up, unless the target is already
    /// equal to `linear_offset`.
    pub fn set_motor_linear_offset(
        &mut self,
        handle: JointHandle,
        bodies: &mut RigidBodySet,
        linear_offset: Vector<Real>,
    ) {
        if let Some(id) = self.joint_ids.get(handle.0) {
            let joint = &mut self.joints[*id];
            if let Some(motor) = joint.params.as_motor_joint_mut() {
                if motor.linear_offset != linear_offset {
                    bodies.wake_up(joint.body1, true);
                    bodies.wake_up(joint.body2, true);
                    motor.linear_offset = linear_offset;
                }
            }
        }
    }

    /// Sets the target angular offset of the given motor joint.
    ///
    /// Both attached rigid-bodies are woken up, unless the target is already
    /// equal to `angular_offset`.
    pub fn set_motor_angular_offset(
        &mut self,
        handle: JointHandle,
        bodies: &mut RigidBodySet,
        angular_offset: Real,
    ) {
        if let Some(id) = self.joint_ids.get(handle.0) {
            let joint = &mut self.joints[*id];
            if let Some(motor) = joint.params.as_motor_joint_mut() {
                if motor.angular_offset != angular_offset {
                    bodies.wake_up(joint.body1, true);
                    bodies.wake_up(joint.body2, true);
                    motor.angular_offset = angular_offset;
                }
            }
        }
    }

    /// Retrieves all the joints involving at least one non-sleeping dynamic
    /// body, grouped by the island containing that body.
    pub(crate) fn select_active_interactions(
        &self,
        bodies: &RigidBodySet,
        out: &mut [Vec<JointIndex>],
    ) {
        for out_island in &mut out[..bodies.num_islands()] {
            out_island.clear();
        }

        // FIXME: don't iterate through all the joints.
        for (i, joint) in self.joints.iter().enumerate() {
            let rb1 = &bodies[joint.body1];
            let rb2 = &bodies[joint.body2];

            if (rb1.is_dynamic() || rb2.is_dynamic())
                && (!rb1.is_dynamic() || !rb1.is_sleeping())
                && (!rb2.is_dynamic() || !rb2.is_sleeping())
            {
                let island_id = if !rb1.is_dynamic() {
                    rb2.active_island_id
                } else {
                    rb1.active_island_id
                };

                out[island_id].push(i);
            }
        }
    }
}

impl Default for JointSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{MotorJoint, RigidBody, RigidBodyBuilder};
    use crate::math::{Point, Vector};
    use crate::prelude::MassProperties;

    fn dynamic_body() -> RigidBody {
        RigidBodyBuilder::new_dynamic()
            .mass_properties(MassProperties::new(Point::origin(), 1.0, 1.0))
            .build()
    }

    #[test]
    fn removal_patches_the_dense_array() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let h1 = bodies.insert(dynamic_body());
        let h2 = bodies.insert(dynamic_body());
        let h3 = bodies.insert(dynamic_body());

        let j12 = joints.insert(&mut bodies, h1, h2, MotorJoint::new(Vector::zeros(), 0.0));
        let j13 = joints.insert(&mut bodies, h1, h3, MotorJoint::new(Vector::zeros(), 0.0));
        let j23 = joints.insert(&mut bodies, h2, h3, MotorJoint::new(Vector::zeros(), 0.0));

        let removed = joints.remove(j12, &mut bodies, true).unwrap();
        assert_eq!(removed.body1, h1);
        assert_eq!(removed.body2, h2);
        assert_eq!(joints.len(), 2);
        assert!(!joints.contains(j12));

        // The swap-removal moved `j23` where `j12` was. Handles must still
        // resolve to the right joints.
        let j13 = joints.get(j13).unwrap();
        assert_eq!((j13.body1, j13.body2), (h1, h3));
        let j23 = joints.get(j23).unwrap();
        assert_eq!((j23.body1, j23.body2), (h2, h3));
    }

    #[test]
    fn removing_a_body_removes_its_joints() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let h1 = bodies.insert(dynamic_body());
        let h2 = bodies.insert(dynamic_body());
        let h3 = bodies.insert(dynamic_body());

        joints.insert(&mut bodies, h1, h2, MotorJoint::new(Vector::zeros(), 0.0));
        joints.insert(&mut bodies, h1, h3, MotorJoint::new(Vector::zeros(), 0.0));
        let j23 = joints.insert(&mut bodies, h2, h3, MotorJoint::new(Vector::zeros(), 0.0));

        bodies.remove(h1, &mut joints);

        assert_eq!(joints.len(), 1);
        assert!(joints.contains(j23));
    }

    #[test]
    fn same_value_offset_change_does_not_wake_the_bodies() {
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let h1 = bodies.insert(dynamic_body());
        let h2 = bodies.insert(dynamic_body());
        let joint = joints.insert(
            &mut bodies,
            h1,
            h2,
            MotorJoint::new(Vector::new(1.0, 0.0), 0.0),
        );

        bodies[h1].sleep();
        bodies[h2].sleep();

        joints.set_motor_linear_offset(joint, &mut bodies, Vector::new(1.0, 0.0));
        joints.set_motor_angular_offset(joint, &mut bodies, 0.0);
        assert!(bodies[h1].is_sleeping());
        assert!(bodies[h2].is_sleeping());

        joints.set_motor_linear_offset(joint, &mut bodies, Vector::new(2.0, 0.0));
        assert!(!bodies[h1].is_sleeping());
        assert!(!bodies[h2].is_sleeping());

        bodies[h1].sleep();
        bodies[h2].sleep();

        joints.set_motor_angular_offset(joint, &mut bodies, 1.0);
        assert!(!bodies[h1].is_sleeping());
        assert!(!bodies[h2].is_sleeping());
    }
}
