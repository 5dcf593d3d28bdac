//! Data structures modified with guaranteed deterministic behavior after deserialization.

pub use self::arena::{Arena, Index};

pub mod arena;
