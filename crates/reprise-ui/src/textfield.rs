//! Editing state for text fields.
//!
//! A [`TextFieldState`] lives outside the composition (the host owns one per
//! field, keyed by the field's `state_key`) so the text survives recomposition.
//! Widgets stay controlled: the field renders whatever the state holds, and
//! edits are routed back through `on_change`.

use std::rc::Rc;

use reprise_core::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

/// Font size used inside text fields, in dp.
pub const TF_FONT_DP: f32 = 16.0;
/// Horizontal inset between the field border and its text, in dp.
pub const TF_PADDING_X_DP: f32 = 8.0;

/// Text buffer plus a cursor, with grapheme-aware deletion.
///
/// `cursor` is a byte offset into `text` and always sits on a char boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextFieldState {
    pub text: String,
    pub cursor: usize,
}

impl TextFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with existing content, cursor at the end.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    /// Inserts at the cursor and moves the cursor past the inserted text.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Removes the grapheme cluster before the cursor. Returns false at the
    /// start of the buffer. A single backspace deletes a whole cluster, so
    /// combining marks and emoji never shed bytes one at a time.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// A single-line text input. `state_key` picks the host-side
/// [`TextFieldState`] this field renders; `hint` shows dimmed while the
/// buffer is empty. Pass `0` as the key to fall back to the view id.
#[allow(non_snake_case)]
pub fn TextField(state_key: ViewId, hint: impl Into<String>) -> View {
    let hint = hint.into();
    View::new(
        0,
        ViewKind::TextField {
            state_key,
            hint: hint.clone(),
            on_change: None,
            on_submit: None,
        },
    )
    .semantics(Semantics::new(Role::TextField).label(hint))
}

/// Wires change/submit callbacks onto a [`TextField`] view.
pub trait TextFieldExt: Sized {
    fn on_change(self, f: impl Fn(String) + 'static) -> Self;
    fn on_submit(self, f: impl Fn(String) + 'static) -> Self;
}

impl TextFieldExt for View {
    fn on_change(mut self, f: impl Fn(String) + 'static) -> Self {
        if let ViewKind::TextField { on_change, .. } = &mut self.kind {
            *on_change = Some(Rc::new(f));
        } else {
            log::warn!("on_change called on a view that is not a TextField; ignoring");
        }
        self
    }

    fn on_submit(mut self, f: impl Fn(String) + 'static) -> Self {
        if let ViewKind::TextField { on_submit, .. } = &mut self.kind {
            *on_submit = Some(Rc::new(f));
        } else {
            log::warn!("on_submit called on a view that is not a TextField; ignoring");
        }
        self
    }
}
