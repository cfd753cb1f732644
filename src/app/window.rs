//! Window configuration

use crate::config::WindowConfig;
use winit::dpi::LogicalSize;
use winit::window::{Fullscreen, WindowAttributes};

/// Smallest window the app allows when resizable
const MIN_SIZE: LogicalSize<f64> = LogicalSize::new(320.0, 240.0);

/// Creates window attributes from configuration
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(
            config.width.max(MIN_SIZE.width),
            config.height.max(MIN_SIZE.height),
        ))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.resizable {
        attrs = attrs.with_min_inner_size(MIN_SIZE);
    }

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    #[test]
    fn tiny_windows_are_clamped() {
        let config = WindowConfig {
            width: 10.0,
            height: 10.0,
            ..Default::default()
        };
        let attrs = window_attributes_from_config(&config);
        assert_eq!(
            attrs.inner_size,
            Some(Size::Logical(LogicalSize::new(320.0, 240.0)))
        );
        assert!(attrs.min_inner_size.is_some());
    }

    #[test]
    fn fullscreen_is_borderless() {
        let config = WindowConfig {
            fullscreen: true,
            ..Default::default()
        };
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
        assert_eq!(attrs.title, "Kiln");
    }
}
