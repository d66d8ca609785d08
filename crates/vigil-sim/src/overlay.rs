//! Overlay presenter — the full-screen fade driven by the caught sequence.
//!
//! Effectively process-wide UI state, isolated behind an interface with an
//! explicit lifecycle rather than a hidden singleton. The engine owns one
//! presenter instance; all sequencing guards drive it.

use vigil_core::state::OverlayView;

/// Presentation surface for the caught-sequence fade.
pub trait OverlayPresenter: Send + Sync {
    /// Make the overlay visible with the given message. Opacity is left
    /// where it is; fades animate it explicitly.
    fn show(&mut self, message: &str);
    /// Set overlay opacity in [0, 1].
    fn set_opacity(&mut self, opacity: f32);
    /// Hide immediately — no animation.
    fn hide(&mut self);
    /// Current state for snapshots.
    fn view(&self) -> OverlayView;
}

/// Default presenter: plain state for the host to render.
#[derive(Debug, Clone, Default)]
pub struct ScreenFade {
    visible: bool,
    opacity: f32,
    message: String,
}

impl ScreenFade {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayPresenter for ScreenFade {
    fn show(&mut self, message: &str) {
        self.visible = true;
        self.message = message.to_string();
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.opacity = 0.0;
    }

    fn view(&self) -> OverlayView {
        OverlayView {
            visible: self.visible,
            opacity: self.opacity,
            message: self.message.clone(),
        }
    }
}

/// Cubic Hermite smoothstep over [0, 1]; fades ease in and out instead of
/// moving linearly.
pub fn smoothstep01(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep01(0.0), 0.0);
        assert_eq!(smoothstep01(1.0), 1.0);
        assert!((smoothstep01(0.5) - 0.5).abs() < 1e-6);
        // Eases: slower than linear near the ends.
        assert!(smoothstep01(0.1) < 0.1);
        assert!(smoothstep01(0.9) > 0.9);
        // Clamped outside the unit interval.
        assert_eq!(smoothstep01(-1.0), 0.0);
        assert_eq!(smoothstep01(2.0), 1.0);
    }

    #[test]
    fn test_screen_fade_lifecycle() {
        let mut fade = ScreenFade::new();
        assert!(!fade.view().visible);

        fade.show("DETECTED");
        fade.set_opacity(0.7);
        let view = fade.view();
        assert!(view.visible);
        assert_eq!(view.message, "DETECTED");
        assert!((view.opacity - 0.7).abs() < 1e-6);

        fade.hide();
        let view = fade.view();
        assert!(!view.visible);
        assert_eq!(view.opacity, 0.0);
    }
}
