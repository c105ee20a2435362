//! WebGPU rendering module
//!
//! Scenes are built as colored triangle lists in screen pixels and mapped to
//! the canvas with letterboxing.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{Letterbox, RenderState};
pub use vertex::Vertex;
