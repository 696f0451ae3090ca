//! The renderer and its fixed pipeline.
//!
//! Conventions:
//! - right-handed world space, +Z up
//! - clip space follows wgpu: depth in [0, 1]
//! - matrices are uploaded column-major at fixed offsets of one uniform buffer
//!   (model @ 0, view @ 64, projection @ 128), matching `TransformData` in the
//!   shader

mod animation;
mod camera;
mod config;
mod pipeline;
mod renderer;
mod shader;
mod uniforms;

pub use animation::Animation;
pub use camera::{aspect_ratio, CameraConfig, FrameTransforms};
pub use config::{RendererConfig, DEFAULT_CLEAR_COLOR};
pub use pipeline::{
    bind_group_layout_entries, Bindings, PipelineState, SAMPLER_BINDING, TEXTURE_BINDING,
    UNIFORM_BINDING,
};
pub use renderer::Renderer;
pub use shader::{FRAGMENT_ENTRY, MESH_SHADER, VERTEX_ENTRY};
pub use uniforms::{
    TransformUniform, MATRIX_SIZE, MODEL_OFFSET, PROJECTION_OFFSET, UNIFORM_BUFFER_SIZE,
    VIEW_OFFSET,
};
