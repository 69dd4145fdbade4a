//! scene-ngin
//!
//! A small wgpu scene renderer for native windows and the web. It tessellates
//! boxes, spheres and cylinders, arranges them in a scene graph, shades them
//! with Blinn-Phong lighting and spins them inside a winit render loop. Two
//! scenes ship with the crate: a rotating cube and a ball-and-stick molecule
//! with orbit controls.
//!
//! High-level modules
//! - `camera`: camera, projection, orbit controls and the camera uniform
//! - `context`: central GPU and window context, viewer settings and resize handling
//! - `data_structures`: engine data models (meshes, instances, scene graph, rotation)
//! - `flow`: the event loop, the flow trait and the viewer handle
//! - `pipelines`: the Phong render pipeline and the lights
//! - `resources`: tessellation and GPU upload helpers
//! - `render`: render composition for pipeline reuse
//! - `scenes`: the cube and molecule scenes
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scenes;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Runs the rotating cube in the `#canvas` element of the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn run_cube() -> Result<(), JsValue> {
    flow::run::<()>(
        scenes::cube::settings(),
        vec![scenes::cube::CubeFlow::constructor()],
    )
    .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

/// Runs the water molecule in the `#canvas` element of the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn run_molecule() -> Result<(), JsValue> {
    flow::run::<()>(
        scenes::molecule::settings(),
        vec![scenes::molecule::MoleculeFlow::constructor(
            scenes::molecule::Molecule::water(),
        )],
    )
    .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
