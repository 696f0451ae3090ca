//! Renderable assets: the triangle mesh and its textured material.

mod material;
mod mesh;

pub use material::{sampler_descriptor, Material, MaterialSource, TextureImage};
pub use mesh::{MeshVertex, TriangleMesh, TRIANGLE_VERTICES};
