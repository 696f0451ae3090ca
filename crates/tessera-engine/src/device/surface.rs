use super::SurfaceErrorAction;

/// Picks the presentation format for a surface.
///
/// With `prefer_srgb`, the first sRGB format the surface reports wins;
/// otherwise (or if none is sRGB) the surface's own preferred format, which
/// wgpu lists first, is used.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let preferred = caps.formats.first().copied()?;

    if prefer_srgb {
        if let Some(srgb) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(srgb);
        }
    }

    Some(preferred)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Applies a new drawable size to the surface configuration.
///
/// Returns `false` when the size is zero in either dimension; wgpu cannot
/// configure such a surface, so configuration is deferred until a real size
/// arrives.
pub(crate) fn apply_resize(config: &mut wgpu::SurfaceConfiguration, width: u32, height: u32) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    config.width = width;
    config.height = height;
    true
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
