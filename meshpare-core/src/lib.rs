//! Core data structures for meshpare
//!
//! This crate provides the fundamental types shared across the workspace:
//! the triangle mesh exchange type, point/vector aliases, and the common
//! error type.

pub mod error;
pub mod mesh;
pub mod point;

pub use error::*;
pub use mesh::*;
pub use point::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3, Vector4};
