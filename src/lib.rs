/*!
impulse2d
=========

**impulse2d** is a 2-dimensional rigid-body dynamics library centered on the
*motor joint*: a constraint that drives the relative pose of two rigid bodies
toward a target linear and angular offset, with the applied force and torque
bounded by configurable limits. Constraints are solved with a warm-started
sequential-impulse velocity solver using positional-error feedback.

The crate ships the world layer needed to step such joints: rigid bodies,
generational body/joint sets, island management with sleeping, and a minimal
physics pipeline.

## Cargo features

- `f32`/`f64` - precision of the whole simulation (exactly one must be
  enabled; `f32` is the default).
- `serde-serialize` - serialization of the world state with serde.
- `profiler` - compiles in the per-stage timing counters.
*/
#![deny(bare_trait_objects)]
#![warn(missing_docs)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]

#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!("The `f32` and `f64` features cannot be enabled at the same time.");
#[cfg(not(any(feature = "f32", feature = "f64")))]
compile_error!("Exactly one of the `f32` and `f64` features must be enabled.");

pub extern crate nalgebra as na;
#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

/// The string version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const INVALID_U32: u32 = u32::MAX;
pub(crate) const INVALID_USIZE: usize = INVALID_U32 as usize;

pub mod counters;
pub mod data;
pub mod dynamics;
pub mod error_handler;
pub mod pipeline;
pub mod utils;

/// Elementary mathematical entities (vectors, rotations, isometries).
pub mod math {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub type Real = f32;
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub type Real = f64;

    /// The dimension of the simulation.
    pub const DIM: usize = 2;

    /// The angular vector type: in 2D this is just a scalar angular rate.
    pub type AngVector<N> = N;

    /// The vector type.
    pub type Vector<N> = na::Vector2<N>;

    /// The point type.
    pub type Point<N> = na::Point2<N>;

    /// The orientation type: a unit complex number.
    pub type Rotation<N> = na::UnitComplex<N>;

    /// The transformation matrix type.
    pub type Isometry<N> = na::Isometry2<N>;

    /// The translation type.
    pub type Translation<N> = na::Translation2<N>;

    /// A 2x2 symmetric positive-semi-definite matrix.
    pub type SdpMatrix<N> = crate::utils::SdpMatrix2<N>;
}

/// Prelude re-exporting the types most commonly needed by user code.
pub mod prelude {
    pub use crate::dynamics::*;
    pub use crate::math::*;
    pub use crate::pipeline::*;
    pub use na::{self, Isometry2, Point2, UnitComplex, Vector2};
}
