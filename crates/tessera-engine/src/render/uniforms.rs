use bytemuck::{Pod, Zeroable};

/// Byte offset of the model matrix in the transform uniform.
pub const MODEL_OFFSET: u64 = 0;
/// Byte offset of the view matrix.
pub const VIEW_OFFSET: u64 = 64;
/// Byte offset of the projection matrix.
pub const PROJECTION_OFFSET: u64 = 128;
/// Total size of the transform uniform buffer.
pub const UNIFORM_BUFFER_SIZE: u64 = 192;

/// Size of one column-major 4x4 f32 matrix.
pub const MATRIX_SIZE: u64 = 64;

/// CPU mirror of `TransformData` in `mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: [f32; 16],
    pub view: [f32; 16],
    pub projection: [f32; 16],
}

const _: () = {
    assert!(std::mem::size_of::<TransformUniform>() as u64 == UNIFORM_BUFFER_SIZE);
    assert!(std::mem::offset_of!(TransformUniform, model) as u64 == MODEL_OFFSET);
    assert!(std::mem::offset_of!(TransformUniform, view) as u64 == VIEW_OFFSET);
    assert!(std::mem::offset_of!(TransformUniform, projection) as u64 == PROJECTION_OFFSET);
    assert!(std::mem::size_of::<[f32; 16]>() as u64 == MATRIX_SIZE);
    assert!(VIEW_OFFSET == MODEL_OFFSET + MATRIX_SIZE);
    assert!(PROJECTION_OFFSET == VIEW_OFFSET + MATRIX_SIZE);
};
