use crate::paint::Color;

use super::{ParamEdit, ParamError, ParamId, ParamValue, ParameterStore};

/// Hue step of a color nudge, in degrees.
const HUE_STEP_DEGREES: f32 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlKind {
    /// Hex color picker.
    Color,
    /// Slider over `[min, max]` in increments of `step`.
    Range { min: f32, max: f32, step: f32 },
}

impl ControlKind {
    /// Snaps to the nearest step and clamps into range. Colors pass through.
    pub fn constrain(self, value: f32) -> f32 {
        match self {
            ControlKind::Color => value,
            ControlKind::Range { min, max, step } => {
                if !value.is_finite() {
                    return min;
                }
                let snapped = if step > 0.0 { (value / step).round() * step } else { value };
                snapped.clamp(min, max)
            }
        }
    }
}

/// Metadata of one control on the tuning surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlSpec {
    pub id: ParamId,
    pub label: &'static str,
    pub kind: ControlKind,
}

const THRESHOLD: ControlKind = ControlKind::Range { min: -5.0, max: 5.0, step: 0.1 };

/// Controls in display order.
pub static CONTROLS: [ControlSpec; 9] = [
    ControlSpec { id: ParamId::BaseColor, label: "color", kind: ControlKind::Color },
    ControlSpec {
        id: ParamId::Repetition,
        label: "repetition",
        kind: ControlKind::Range { min: 1.0, max: 150.0, step: 1.0 },
    },
    ControlSpec { id: ParamId::HighlightColor, label: "highlightColor", kind: ControlKind::Color },
    ControlSpec {
        id: ParamId::HighlightLowThreshold,
        label: "highlightLowThreshold",
        kind: THRESHOLD,
    },
    ControlSpec {
        id: ParamId::HighlightHighThreshold,
        label: "highlightHighThreshold",
        kind: THRESHOLD,
    },
    ControlSpec { id: ParamId::ShadowColor, label: "shadowColor", kind: ControlKind::Color },
    ControlSpec { id: ParamId::ShadowLowThreshold, label: "shadowLowThreshold", kind: THRESHOLD },
    ControlSpec { id: ParamId::ShadowHighThreshold, label: "shadowHighThreshold", kind: THRESHOLD },
    ControlSpec {
        id: ParamId::BackgroundColor,
        label: "backgroundColor",
        kind: ControlKind::Color,
    },
];

impl ControlSpec {
    pub fn find(id: ParamId) -> Option<&'static ControlSpec> {
        CONTROLS.iter().find(|spec| spec.id == id)
    }
}

/// Keyboard-driven cursor over [`CONTROLS`].
///
/// The surface only produces [`ParamEdit`]s; applying them is the store's job.
#[derive(Debug, Clone, Default)]
pub struct ControlSurface {
    selected: usize,
}

impl ControlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn selected(&self) -> &'static ControlSpec {
        &CONTROLS[self.selected]
    }

    pub fn select_next(&mut self) -> &'static ControlSpec {
        self.selected = (self.selected + 1) % CONTROLS.len();
        self.selected()
    }

    pub fn select_prev(&mut self) -> &'static ControlSpec {
        self.selected = (self.selected + CONTROLS.len() - 1) % CONTROLS.len();
        self.selected()
    }

    /// Moves the selected value by `steps`: slider steps, or hue increments for colors.
    pub fn nudge(&self, store: &ParameterStore, steps: f32) -> ParamEdit {
        let spec = self.selected();
        let value = match (spec.kind, store.get(spec.id)) {
            (kind @ ControlKind::Range { step, .. }, ParamValue::Number(v)) => {
                ParamValue::Number(kind.constrain(v + steps * step))
            }
            (_, ParamValue::Color(c)) => ParamValue::Color(c.rotate_hue(steps * HUE_STEP_DEGREES)),
            (_, value) => value,
        };
        ParamEdit::new(spec.id, value)
    }

    /// Edit setting the selected color control to typed hex text.
    ///
    /// Accepts what [`Color::from_hex`] accepts. Numeric controls reject the
    /// parsed color with [`ParamError::TypeMismatch`].
    pub fn enter_hex(&self, input: &str) -> Result<ParamEdit, ParamError> {
        let spec = self.selected();
        let value = ParamValue::Color(Color::from_hex(input)?);
        match spec.kind {
            ControlKind::Color => Ok(ParamEdit::new(spec.id, value)),
            ControlKind::Range { .. } => Err(ParamError::TypeMismatch { id: spec.id, value }),
        }
    }

    /// Edit restoring the selected control to its default.
    pub fn reset(&self) -> ParamEdit {
        let id = self.selected().id;
        ParamEdit::new(id, ParameterStore::default().get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(surface: &mut ControlSurface, id: ParamId) {
        while surface.selected().id != id {
            surface.select_next();
        }
    }

    // ── ranges ─────────────────────────────────────────────────────────────

    #[test]
    fn range_constrain_clamps_and_snaps() {
        let rep = ControlKind::Range { min: 1.0, max: 150.0, step: 1.0 };
        assert_eq!(rep.constrain(0.0), 1.0);
        assert_eq!(rep.constrain(49.6), 50.0);
        assert_eq!(rep.constrain(151.0), 150.0);
        assert_eq!(rep.constrain(f32::NAN), 1.0);

        assert!((THRESHOLD.constrain(1.234) - 1.2).abs() < 1e-5);
        assert_eq!(THRESHOLD.constrain(-9.0), -5.0);
    }

    #[test]
    fn labels_are_unique() {
        for (i, a) in CONTROLS.iter().enumerate() {
            for b in &CONTROLS[i + 1..] {
                assert_ne!(a.label, b.label);
                assert_ne!(a.id, b.id);
            }
        }
    }

    // ── surface ────────────────────────────────────────────────────────────

    #[test]
    fn selection_wraps() {
        let mut surface = ControlSurface::new();
        assert_eq!(surface.selected().id, ParamId::BaseColor);
        assert_eq!(surface.select_prev().id, ParamId::BackgroundColor);
        assert_eq!(surface.select_next().id, ParamId::BaseColor);
    }

    #[test]
    fn nudge_steps_numeric_controls() {
        let store = ParameterStore::default();
        let mut surface = ControlSurface::new();
        select(&mut surface, ParamId::Repetition);

        let edit = surface.nudge(&store, -1.0);
        assert_eq!(edit, ParamEdit::new(ParamId::Repetition, ParamValue::Number(99.0)));

        let edit = surface.nudge(&store, 500.0);
        assert_eq!(edit.value, ParamValue::Number(150.0));
    }

    #[test]
    fn nudge_rotates_color_hue() {
        let store = ParameterStore::default();
        let surface = ControlSurface::new();

        let ParamValue::Color(c) = surface.nudge(&store, 1.0).value else {
            panic!("expected color");
        };
        assert_ne!(c, store.material.base_color);
        assert_eq!(c.rotate_hue(-10.0).to_hex(), store.material.base_color.to_hex());
    }

    // ── hex entry ──────────────────────────────────────────────────────────

    #[test]
    fn typed_hex_targets_selected_color() {
        let mut surface = ControlSurface::new();
        select(&mut surface, ParamId::ShadowColor);

        let edit = surface.enter_hex("#3a7f12").unwrap();
        assert_eq!(edit.id, ParamId::ShadowColor);
        assert_eq!(edit.value, ParamValue::Color(Color::from_hex("3a7f12").unwrap()));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let surface = ControlSurface::new();
        let err = surface.enter_hex("#12345").unwrap_err();
        assert!(matches!(err, ParamError::InvalidColor(ref e) if e.input == "#12345"));
    }

    #[test]
    fn numeric_control_refuses_hex() {
        let mut surface = ControlSurface::new();
        select(&mut surface, ParamId::Repetition);
        let err = surface.enter_hex("ffffff").unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { id: ParamId::Repetition, .. }));
    }

    #[test]
    fn reset_restores_default() {
        let mut store = ParameterStore::default();
        store.set(ParamId::ShadowHighThreshold, ParamValue::Number(4.0)).unwrap();

        let mut surface = ControlSurface::new();
        select(&mut surface, ParamId::ShadowHighThreshold);
        assert_eq!(surface.reset().value, ParamValue::Number(1.5));
    }
}
