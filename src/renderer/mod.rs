//! WebGPU rendering module
//!
//! The scene builder tessellates the whole frame into colored triangles on
//! the CPU; the pipeline draws them in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{FrameOptions, build_frame, instructions_frame};
pub use vertex::Vertex;
