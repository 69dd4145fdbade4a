//! Engine data structures: meshes, materials, instances and scene graphs.
//!
//! This module contains the core data types for scene representation:
//!
//! - `model` contains vertices, colours, Phong materials and GPU meshes
//! - `texture` contains the depth and multisample attachments
//! - `instance` holds per-instance transformation data
//! - `scene_graph` enables hierarchical scene organization
//! - `spin` is the constant per-frame rotation driving the demos

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod spin;
pub mod texture;
