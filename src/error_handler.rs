//! Error handling for impulse2d.
//!
//! A number of checks are in place to catch inconsistent API usage as soon as
//! it occurs (for example attaching a joint to a rigid-body that was already
//! removed). These indicate a bug in the calling code, but some callers may
//! prefer logging and recovering over aborting the simulation.
//!
//! Setting [`GLOBAL_ERROR_HANDLER`] lets you as the end user pick how to react
//! to those errors.
//!
//! This module is typically NOT used by library authors, to allow end users to
//! customize their own error handler.
//!
//! Its default behaviour is to [`panic!`].

use std::sync::OnceLock;

use log::warn;

/// Possible errors to handle through [`default_error_handler`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// A joint insertion referenced a rigid-body handle not present in the set.
    JointInsertBodyNotFound(String),
    /// A joint insertion referenced the same rigid-body twice.
    JointInsertSameBody(String),
}

/// A global error handler. This can be set at startup, as long as it is set
/// before any uses.
///
/// # Example
///
/// ```
/// use impulse2d::error_handler::{warn, GLOBAL_ERROR_HANDLER};
/// if GLOBAL_ERROR_HANDLER.set(Box::new(warn)).is_err() {
///     log::error!("The error handler can only be set once, globally.");
/// }
/// ```
pub static GLOBAL_ERROR_HANDLER: OnceLock<Box<dyn Fn(Error) + Sync + Send>> = OnceLock::new();

/// The default error handler. This defaults to [`panic()`].
#[inline]
pub fn default_error_handler() -> &'static (dyn Fn(Error) + Sync + Send) {
    &**GLOBAL_ERROR_HANDLER.get_or_init(|| Box::new(panic))
}

/// Error handler that panics with the error.
#[track_caller]
#[inline(always)]
pub fn panic(error: Error) {
    panic!("Encountered an error:\n{:?}", error);
}

/// Error handler that logs the error at the `warn` level.
#[track_caller]
#[inline]
pub fn warn(error: Error) {
    warn!("Encountered an error:\n{:?}", error);
}

#[cfg(test)]
mod test {
    use crate::error_handler::GLOBAL_ERROR_HANDLER;
    use crate::prelude::*;
    use std::sync::mpsc::{self, Receiver, Sender};

    #[test]
    fn error_handling() {
        use log::error;

        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let h1 = bodies.insert(RigidBodyBuilder::new_dynamic().build());

        let (tx, rx): (Sender<i32>, Receiver<i32>) = mpsc::channel();
        // Set error handling.
        if GLOBAL_ERROR_HANDLER
            .set(Box::new(move |error| {
                println!("error: {:?}", error);
                assert!(tx.send(1).is_ok());
            }))
            .is_err()
        {
            error!("The error handler can only be set once, globally.");
        }

        // Attaching a joint to a removed/nonexistent body is reported.
        let handle = joints.insert(
            &mut bodies,
            h1,
            RigidBodyHandle::invalid(),
            MotorJoint::new(Vector::zeros(), 0.0),
        );
        assert_eq!(handle, JointHandle::invalid());
        assert!(rx.try_recv() == Ok(1));
        assert!(rx.try_recv().is_err());

        // Attaching a body to itself is reported too.
        let handle = joints.insert(&mut bodies, h1, h1, MotorJoint::new(Vector::zeros(), 0.0));
        assert_eq!(handle, JointHandle::invalid());
        assert!(rx.try_recv() == Ok(1));
        assert!(rx.try_recv().is_err());
        assert!(joints.is_empty());
    }
}
