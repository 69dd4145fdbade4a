//! Render pipelines.
//!
//! - `basic` is the Phong pipeline all meshes are drawn with
//! - `light` holds the light sources and their uniform

pub mod basic;
pub mod light;
