use std::fmt;
use std::path::PathBuf;

/// Errors surfaced by device setup, asset creation and the frame cycle.
///
/// Every variant is terminal for the `Renderer` that produced it; callers are
/// expected to build a fresh renderer rather than retry.
#[derive(Debug)]
pub enum RenderError {
    /// No GPU adapter compatible with the surface was found.
    AdapterUnavailable(String),
    /// The adapter refused to create a logical device.
    DeviceUnavailable(String),
    /// The presentation surface could not be created or has no usable format.
    Surface(String),
    /// The texture image could not be read, decoded or uploaded.
    AssetLoad { path: Option<PathBuf>, reason: String },
    /// Pipeline construction was requested before mesh and material were ready.
    AssetsNotReady,
    /// A frame was requested before the pipeline was built.
    NotInitialized,
    /// The surface failed in a way that cannot be recovered by reconfiguring.
    SurfaceLost(wgpu::SurfaceError),
    /// A configuration value is out of range.
    InvalidConfig(String),
}

impl RenderError {
    pub(crate) fn asset(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        Self::AssetLoad { path, reason: reason.into() }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdapterUnavailable(why) => write!(f, "no suitable GPU adapter: {why}"),
            Self::DeviceUnavailable(why) => write!(f, "failed to create GPU device: {why}"),
            Self::Surface(why) => write!(f, "surface error: {why}"),
            Self::AssetLoad { path: Some(path), reason } => {
                write!(f, "failed to load texture {}: {reason}", path.display())
            }
            Self::AssetLoad { path: None, reason } => write!(f, "failed to load texture: {reason}"),
            Self::AssetsNotReady => {
                write!(f, "pipeline construction requires mesh and material to be ready")
            }
            Self::NotInitialized => write!(f, "renderer has no pipeline; call build_pipeline first"),
            Self::SurfaceLost(err) => write!(f, "unrecoverable surface error: {err}"),
            Self::InvalidConfig(why) => write!(f, "invalid renderer config: {why}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceLost(err) => Some(err),
            _ => None,
        }
    }
}
