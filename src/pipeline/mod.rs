//! Structure for combining the various steps of a physics simulation.

pub use self::physics_pipeline::PhysicsPipeline;

mod physics_pipeline;
