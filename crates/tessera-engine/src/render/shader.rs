/// WGSL source for the textured mesh pipeline.
pub const MESH_SHADER: &str = include_str!("shaders/mesh.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_declares_entry_points_and_bindings() {
        assert!(MESH_SHADER.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(MESH_SHADER.contains(&format!("fn {FRAGMENT_ENTRY}(")));
        for binding in 0..3 {
            assert!(MESH_SHADER.contains(&format!("@group(0) @binding({binding})")));
        }
    }
}
