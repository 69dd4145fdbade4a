//! The two demo scenes.
//!
//! Each scene provides its viewer [`Settings`](crate::context::Settings), a
//! pure scene-graph builder and a [`GraphicsFlow`](crate::flow::GraphicsFlow)
//! that spins the built graph every frame.

pub mod cube;
pub mod molecule;
