//! Keyboard mapping for the parameter panel.
//!
//! Tab / Shift+Tab walk the controls, arrows nudge the selected value
//! (PageUp / PageDown by ten steps), R resets it, H lists every control.
//! On a color control, typing hex digits and pressing Enter sets the color;
//! Backspace erases a digit and Escape drops the typed text.

use halftone_engine::context::AppContext;
use halftone_engine::input::{InputFrame, Key, Modifiers};
use halftone_engine::params::{ControlKind, CONTROLS};

/// Longest hex entry, `rrggbb`.
const HEX_LEN: usize = 6;

/// What a key press asks the panel to do.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PanelAction {
    SelectNext,
    SelectPrev,
    Nudge(f32),
    Reset,
    Help,
    /// Append a hex digit to the typed color.
    Type(char),
    Erase,
    Commit,
    Quit,
}

impl PanelAction {
    pub fn for_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        let action = match key {
            Key::Tab if modifiers.shift => Self::SelectPrev,
            Key::Tab => Self::SelectNext,
            Key::ArrowUp | Key::ArrowRight => Self::Nudge(1.0),
            Key::ArrowDown | Key::ArrowLeft => Self::Nudge(-1.0),
            Key::PageUp => Self::Nudge(10.0),
            Key::PageDown => Self::Nudge(-10.0),
            Key::R => Self::Reset,
            Key::H => Self::Help,
            Key::HexDigit(_) => Self::Type(key.hex_char()?),
            Key::Backspace => Self::Erase,
            Key::Enter => Self::Commit,
            Key::Escape => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

/// Outcome of one frame of panel input.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PanelOutcome {
    /// Selection, a value or the typed text changed; the status line is stale.
    pub changed: bool,
    pub quit: bool,
}

/// Panel state that outlives a frame.
#[derive(Debug, Default)]
pub struct Panel {
    hex: String,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex digits typed so far for the selected color control.
    pub fn typed(&self) -> &str {
        &self.hex
    }

    /// Applies the key presses of this frame to `ctx`, in the order they arrived.
    pub fn handle_keys(&mut self, ctx: &mut AppContext, frame: &InputFrame) -> PanelOutcome {
        let mut outcome = PanelOutcome::default();

        for (key, modifiers) in frame.key_presses() {
            let Some(action) = PanelAction::for_key(key, modifiers) else {
                continue;
            };
            match self.apply(ctx, action) {
                Some(true) => outcome.changed = true,
                Some(false) => {}
                None => {
                    outcome.quit = true;
                    break;
                }
            }
        }

        outcome
    }

    /// Applies one action. Returns `None` for quit, otherwise whether anything changed.
    pub fn apply(&mut self, ctx: &mut AppContext, action: PanelAction) -> Option<bool> {
        match action {
            PanelAction::Type(c) => {
                if ctx.panel.selected().kind != ControlKind::Color || self.hex.len() >= HEX_LEN {
                    return Some(false);
                }
                self.hex.push(c);
                Some(true)
            }
            PanelAction::Erase => Some(self.hex.pop().is_some()),
            PanelAction::Quit if !self.hex.is_empty() => {
                self.hex.clear();
                Some(true)
            }
            PanelAction::Commit => {
                if self.hex.is_empty() {
                    return Some(false);
                }
                let typed = std::mem::take(&mut self.hex);
                match ctx.panel.enter_hex(&typed) {
                    Ok(edit) => Some(commit(ctx, edit)),
                    Err(e) => {
                        log::warn!("{e}");
                        Some(true)
                    }
                }
            }
            PanelAction::SelectNext | PanelAction::SelectPrev => {
                self.hex.clear();
                apply(ctx, action)
            }
            _ => apply(ctx, action),
        }
    }
}

/// Applies one action that needs no typed text. Returns `None` for quit,
/// otherwise whether anything changed.
pub fn apply(ctx: &mut AppContext, action: PanelAction) -> Option<bool> {
    let edit = match action {
        PanelAction::Quit => return None,
        PanelAction::SelectNext => {
            ctx.panel.select_next();
            return Some(true);
        }
        PanelAction::SelectPrev => {
            ctx.panel.select_prev();
            return Some(true);
        }
        PanelAction::Help => {
            for spec in CONTROLS.iter() {
                log::info!("{:<22} {}", spec.label, ctx.params.get(spec.id));
            }
            return Some(false);
        }
        PanelAction::Nudge(steps) => ctx.panel.nudge(&ctx.params, steps),
        PanelAction::Reset => ctx.panel.reset(),
        PanelAction::Type(_) | PanelAction::Erase | PanelAction::Commit => return Some(false),
    };

    Some(commit(ctx, edit))
}

fn commit(ctx: &mut AppContext, edit: halftone_engine::params::ParamEdit) -> bool {
    match ctx.apply_edit(edit) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("edit rejected: {e}");
            false
        }
    }
}

/// Window title showing the selected control and its value, or the typed hex text.
pub fn status_line(ctx: &AppContext, panel: &Panel) -> String {
    let spec = ctx.panel.selected();
    if panel.typed().is_empty() {
        format!("halftone · {} = {}", spec.label, ctx.params.get(spec.id))
    } else {
        format!("halftone · {} = #{}_", spec.label, panel.typed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halftone_engine::input::{InputEvent, KeyState};
    use halftone_engine::material::ShaderSources;
    use halftone_engine::paint::Color;
    use halftone_engine::params::{ParamId, ParamValue, ParameterStore};
    use halftone_engine::scene::SceneConfig;
    use halftone_engine::viewport::ResizeEvent;

    fn context() -> AppContext {
        AppContext::new(
            &SceneConfig::default(),
            ParameterStore::default(),
            ShaderSources::builtin(),
            ResizeEvent::new(800.0, 600.0, 1.0),
        )
        .unwrap()
    }

    fn select(ctx: &mut AppContext, id: ParamId) {
        while ctx.panel.selected().id != id {
            ctx.panel.select_next();
        }
    }

    fn press(frame: &mut InputFrame, key: Key) {
        frame.push_event(InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
    }

    fn type_hex(frame: &mut InputFrame, text: &str) {
        for c in text.chars() {
            let digit = c.to_digit(16).unwrap() as u8;
            press(frame, Key::HexDigit(digit));
        }
    }

    // ── key mapping ────────────────────────────────────────────────────────

    #[test]
    fn shift_tab_selects_previous() {
        let shift = Modifiers { shift: true, ..Default::default() };
        assert_eq!(PanelAction::for_key(Key::Tab, shift), Some(PanelAction::SelectPrev));
        assert_eq!(
            PanelAction::for_key(Key::Tab, Modifiers::default()),
            Some(PanelAction::SelectNext)
        );
    }

    #[test]
    fn hex_keys_type_digits() {
        let none = Modifiers::default();
        assert_eq!(PanelAction::for_key(Key::HexDigit(11), none), Some(PanelAction::Type('b')));
        assert_eq!(PanelAction::for_key(Key::Enter, none), Some(PanelAction::Commit));
        assert_eq!(PanelAction::for_key(Key::Backspace, none), Some(PanelAction::Erase));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(PanelAction::for_key(Key::Unknown(42), Modifiers::default()), None);
    }

    // ── edits ──────────────────────────────────────────────────────────────

    #[test]
    fn page_down_reaches_the_uniform() {
        let mut ctx = context();
        select(&mut ctx, ParamId::Repetition);

        assert_eq!(apply(&mut ctx, PanelAction::Nudge(-10.0)), Some(true));
        let expected = match ctx.params.get(ParamId::Repetition) {
            ParamValue::Number(v) => v,
            other => panic!("unexpected {other:?}"),
        };
        assert!(expected < 100.0);
        assert_eq!(ctx.material().uniforms().repetition, expected);
    }

    #[test]
    fn reset_restores_default_value() {
        let mut ctx = context();
        select(&mut ctx, ParamId::Repetition);
        apply(&mut ctx, PanelAction::Nudge(5.0));
        apply(&mut ctx, PanelAction::Reset);

        assert_eq!(ctx.params.get(ParamId::Repetition), ParamValue::Number(100.0));
        assert_eq!(ctx.material().uniforms().repetition, 100.0);
    }

    #[test]
    fn escape_quits() {
        let mut ctx = context();
        assert_eq!(apply(&mut ctx, PanelAction::Quit), None);
        assert_eq!(Panel::new().apply(&mut ctx, PanelAction::Quit), None);
    }

    // ── frame input ────────────────────────────────────────────────────────

    #[test]
    fn keys_apply_in_arrival_order() {
        let mut ctx = context();
        let mut panel = Panel::new();
        let mut frame = InputFrame::default();
        press(&mut frame, Key::Tab);
        press(&mut frame, Key::ArrowUp);

        let outcome = panel.handle_keys(&mut ctx, &frame);
        assert!(outcome.changed);
        assert!(!outcome.quit);
        assert_eq!(ctx.panel.selected().id, ParamId::Repetition);
        assert_eq!(ctx.params.get(ParamId::Repetition), ParamValue::Number(101.0));
    }

    #[test]
    fn typed_hex_sets_selected_color() {
        let mut ctx = context();
        let mut panel = Panel::new();
        select(&mut ctx, ParamId::HighlightColor);

        let mut frame = InputFrame::default();
        type_hex(&mut frame, "2b9fe0");
        press(&mut frame, Key::Enter);
        assert!(panel.handle_keys(&mut ctx, &frame).changed);

        let expected = Color::from_hex("#2b9fe0").unwrap();
        assert_eq!(ctx.params.get(ParamId::HighlightColor), ParamValue::Color(expected));
        assert_eq!(ctx.material().uniforms().highlight_color, expected.to_array());
        assert_eq!(panel.typed(), "");
    }

    #[test]
    fn typing_spans_frames_and_backspace_erases() {
        let mut ctx = context();
        let mut panel = Panel::new();

        let mut frame = InputFrame::default();
        type_hex(&mut frame, "fff");
        panel.handle_keys(&mut ctx, &frame);
        assert_eq!(panel.typed(), "fff");
        assert!(status_line(&ctx, &panel).ends_with("#fff_"));

        frame.clear();
        press(&mut frame, Key::Backspace);
        type_hex(&mut frame, "0");
        press(&mut frame, Key::Enter);
        panel.handle_keys(&mut ctx, &frame);

        let expected = Color::from_hex("ff0").unwrap();
        assert_eq!(ctx.params.get(ParamId::BaseColor), ParamValue::Color(expected));
    }

    #[test]
    fn escape_cancels_typing_before_quitting() {
        let mut ctx = context();
        let mut panel = Panel::new();
        let before = ctx.params.get(ParamId::BaseColor);

        let mut frame = InputFrame::default();
        type_hex(&mut frame, "12");
        press(&mut frame, Key::Escape);
        let outcome = panel.handle_keys(&mut ctx, &frame);
        assert!(!outcome.quit);
        assert_eq!(panel.typed(), "");
        assert_eq!(ctx.params.get(ParamId::BaseColor), before);

        frame.clear();
        press(&mut frame, Key::Escape);
        assert!(panel.handle_keys(&mut ctx, &frame).quit);
    }

    #[test]
    fn digits_are_ignored_on_numeric_controls() {
        let mut ctx = context();
        let mut panel = Panel::new();
        select(&mut ctx, ParamId::Repetition);

        let mut frame = InputFrame::default();
        type_hex(&mut frame, "ab");
        press(&mut frame, Key::Enter);
        panel.handle_keys(&mut ctx, &frame);

        assert_eq!(panel.typed(), "");
        assert_eq!(ctx.params.get(ParamId::Repetition), ParamValue::Number(100.0));
    }

    #[test]
    fn incomplete_hex_leaves_color_alone() {
        let mut ctx = context();
        let mut panel = Panel::new();
        let before = ctx.params.get(ParamId::BaseColor);

        let mut frame = InputFrame::default();
        type_hex(&mut frame, "1234");
        press(&mut frame, Key::Enter);
        panel.handle_keys(&mut ctx, &frame);

        assert_eq!(ctx.params.get(ParamId::BaseColor), before);
        assert_eq!(panel.typed(), "");
    }

    #[test]
    fn status_line_names_selection() {
        let ctx = context();
        let line = status_line(&ctx, &Panel::new());
        assert!(line.contains(CONTROLS[0].label));
    }
}
