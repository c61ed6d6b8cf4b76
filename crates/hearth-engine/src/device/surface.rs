use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *caps.formats.first()?;
    if prefer_srgb {
        if let Some(srgb) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(srgb);
        }
    }
    Some(first)
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

/// Present mode fallback: the requested one if supported, else FIFO.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Whether a swapchain of `current` size must be rebuilt for `new`. Zero
/// extents cannot be configured and are deferred until the window grows.
#[inline]
pub(crate) fn needs_reconfigure(current: (u32, u32), new: (u32, u32)) -> bool {
    new != current && new.0 > 0 && new.1 > 0
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            present_modes: vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox],
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    #[test]
    fn srgb_is_preferred_when_asked() {
        let c = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&c, false),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
        assert_eq!(choose_surface_format(&caps(&[]), true), None);
    }

    #[test]
    fn unsupported_modes_fall_back() {
        let c = caps(&[wgpu::TextureFormat::Rgba8Unorm]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Immediate),
            wgpu::PresentMode::Fifo
        );
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn reconfigure_only_on_real_change() {
        assert!(!needs_reconfigure((800, 600), (800, 600)));
        assert!(needs_reconfigure((800, 600), (1024, 768)));
        assert!(!needs_reconfigure((800, 600), (0, 600)));
        assert!(needs_reconfigure((0, 0), (800, 600)));
    }

    #[test]
    fn surface_errors_map_to_actions() {
        use wgpu::SurfaceError::*;
        assert_eq!(classify_surface_error(&Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify_surface_error(&Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify_surface_error(&Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(classify_surface_error(&OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
