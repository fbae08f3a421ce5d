//! GPU rendering subsystem.
//!
//! - `Mesh`: CPU-side indexed triangle geometry
//! - `GpuMesh`: the same geometry uploaded into static vertex/index buffers
//! - `RenderTarget`: what a draw callback gets for one frame
//!
//! Positions are clip-space; there is no camera transform.

mod ctx;
mod gpu_mesh;
mod mesh;

pub use ctx::RenderTarget;
pub use gpu_mesh::GpuMesh;
pub use mesh::{Mesh, MeshError, Vertex};
