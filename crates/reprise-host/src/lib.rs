//! Headless host for Reprise compositions.
//!
//! A [`Host`] owns a [`Stage`], the ambient services (clock, timers, title
//! sink, diagnostics) and a render backend, and drives the
//! compose → layout → commit cycle. Input is synthetic: clicks by label or
//! position, typing into the focused field — routed through the frame's hit
//! regions the way a windowing host routes real events.
//!
//! ```no_run
//! use reprise_host::Host;
//! use reprise_ui::{Button, Column, ViewExt};
//! use reprise_core::prelude::*;
//!
//! let mut host = Host::new(|| {
//!     let count = remember_state(|| 0i64);
//!     let n = *count.borrow();
//!     let count = count.clone();
//!     Column(Modifier::new()).child(Button(format!("clicked {n}"), move || {
//!         *count.borrow_mut() += 1;
//!         invalidate();
//!     }))
//! });
//! host.mount();
//! host.click("clicked 0").unwrap();
//! ```

pub mod error;
pub mod harness;
pub mod term;
pub mod tests;

pub use error::HostError;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use reprise_core::prelude::*;
use reprise_ui::{TextFieldState, layout_and_paint};
use web_time::Duration;

/// Recompose limit per flush. State writes during build can request another
/// pass; a build that never settles is a bug worth surfacing.
const STABILIZE_LIMIT: usize = 8;

pub struct Host {
    stage: Stage,
    build: Box<dyn FnMut() -> View>,
    clock: Rc<dyn Clock>,
    timers: Rc<TimerRegistry>,
    title: Rc<dyn TitleSink>,
    diagnostics: Rc<dyn Diagnostics>,
    theme: Theme,
    density: Density,
    backend: Box<dyn RenderBackend>,
    frame_cache: Option<Frame>,
    textfield_states: HashMap<u64, Rc<RefCell<TextFieldState>>>,
    frames_committed: u64,
}

impl Host {
    /// A host with default services: system clock, fresh timer registry,
    /// log-backed title/diagnostics, and a backend that discards frames.
    pub fn new(build: impl FnMut() -> View + 'static) -> Self {
        Self {
            stage: Stage::new(),
            build: Box::new(build),
            clock: Rc::new(SystemClock),
            timers: Rc::new(TimerRegistry::new()),
            title: Rc::new(LogTitle),
            diagnostics: Rc::new(LogDiagnostics),
            theme: Theme::default(),
            density: Density::default(),
            backend: Box::new(NullBackend),
            frame_cache: None,
            textfield_states: HashMap::new(),
            frames_committed: 0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.stage.size = (width, height);
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_title_sink(mut self, sink: Rc<dyn TitleSink>) -> Self {
        self.title = sink;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.density = density;
        self
    }

    pub fn with_backend(mut self, backend: Box<dyn RenderBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Composes the first frame. Calling it on a mounted host does nothing.
    pub fn mount(&mut self) {
        if self.frame_cache.is_none() {
            let (w, h) = self.stage.size;
            self.backend.resize(w, h);
            self.flush();
        }
    }

    /// Composes until the invalidation flag stays clear, committing each
    /// pass to the backend.
    pub fn flush(&mut self) {
        let _ = take_invalidated();
        let mut passes = 0;
        loop {
            self.compose_commit();
            passes += 1;
            if !take_invalidated() {
                break;
            }
            if passes >= STABILIZE_LIMIT {
                log::warn!(
                    "composition did not settle after {passes} passes; \
                     a build function is probably writing state it also reads"
                );
                break;
            }
        }
    }

    fn compose_commit(&mut self) {
        let focused = self.stage.focused;
        let theme = self.theme;
        let density = self.density;
        let clock = self.clock.clone();
        let timers = self.timers.clone();
        let title = self.title.clone();
        let diagnostics = self.diagnostics.clone();

        let stage = &mut self.stage;
        let build = &mut self.build;
        let states = &self.textfield_states;

        // Locals wrap both build and layout: widgets read the theme while
        // composing, and the paint pass reads it again for defaults.
        let frame = with_theme(theme, || {
            with_density(density, || {
                with_clock(clock, || {
                    with_timers(timers, || {
                        with_title_sink(title, || {
                            with_diagnostics(diagnostics, || {
                                stage.compose(&mut *build, |view, size| {
                                    layout_and_paint(view, size, states, focused)
                                })
                            })
                        })
                    })
                })
            })
        });

        self.backend.commit(&frame.scene);
        self.frames_committed += 1;
        self.frame_cache = Some(frame);
    }

    /// Clicks the button whose semantics label equals `label`, focuses it,
    /// and recomposes.
    pub fn click(&mut self, label: &str) -> Result<(), HostError> {
        let (id, cb) = {
            let frame = self.frame_cache.as_ref().ok_or(HostError::NotMounted)?;
            let sem = frame
                .semantics_nodes
                .iter()
                .find(|n| n.role == Role::Button && n.label.as_deref() == Some(label))
                .ok_or_else(|| HostError::NoSuchTarget(label.to_string()))?;
            let hit = frame
                .hit_regions
                .iter()
                .find(|h| h.id == sem.id)
                .ok_or_else(|| HostError::NotClickable(label.to_string()))?;
            let cb = hit
                .on_click
                .clone()
                .ok_or_else(|| HostError::NotClickable(label.to_string()))?;
            (hit.id, cb)
        };
        self.stage.focused = Some(id);
        cb();
        self.flush();
        Ok(())
    }

    /// Clicks whatever sits topmost at `(x, y)` in px. A click on empty
    /// space clears focus, like a windowing host would.
    pub fn click_at(&mut self, x: f32, y: f32) -> Result<(), HostError> {
        let pos = Vec2 { x, y };
        let target = {
            let frame = self.frame_cache.as_ref().ok_or(HostError::NotMounted)?;
            // Hit regions are sorted low z first; topmost wins.
            frame
                .hit_regions
                .iter()
                .rev()
                .find(|h| h.rect.contains(pos))
                .map(|h| (h.id, h.focusable, h.tf_state_key, h.on_click.clone()))
        };
        let Some((id, focusable, tf_key, cb)) = target else {
            self.stage.focused = None;
            self.flush();
            return Ok(());
        };
        if focusable {
            self.stage.focused = Some(id);
            if let Some(key) = tf_key {
                self.ensure_field_state(key);
            }
        }
        if let Some(cb) = cb {
            cb();
        }
        self.flush();
        Ok(())
    }

    /// Moves focus to the widget labeled `label` (for empty text fields,
    /// that is the hint). Creates backing state when the target is a field.
    pub fn focus(&mut self, label: &str) -> Result<(), HostError> {
        let (id, tf_key) = {
            let frame = self.frame_cache.as_ref().ok_or(HostError::NotMounted)?;
            let sem = frame
                .semantics_nodes
                .iter()
                .find(|n| n.label.as_deref() == Some(label))
                .ok_or_else(|| HostError::NoSuchTarget(label.to_string()))?;
            let hit = frame
                .hit_regions
                .iter()
                .find(|h| h.id == sem.id && h.focusable)
                .ok_or_else(|| HostError::NotFocusable(label.to_string()))?;
            (hit.id, hit.tf_state_key)
        };
        self.stage.focused = Some(id);
        if let Some(key) = tf_key {
            self.ensure_field_state(key);
        }
        self.flush();
        Ok(())
    }

    /// Moves focus to the next focusable widget in layout order, wrapping.
    pub fn focus_next(&mut self) -> Result<(), HostError> {
        let next = {
            let frame = self.frame_cache.as_ref().ok_or(HostError::NotMounted)?;
            let chain = &frame.focus_chain;
            if chain.is_empty() {
                None
            } else {
                match self
                    .stage
                    .focused
                    .and_then(|id| chain.iter().position(|&c| c == id))
                {
                    Some(i) => Some(chain[(i + 1) % chain.len()]),
                    None => chain.first().copied(),
                }
            }
        };
        if let Some(id) = next {
            let tf_key = self.frame_cache.as_ref().and_then(|f| {
                f.hit_regions
                    .iter()
                    .find(|h| h.id == id)
                    .and_then(|h| h.tf_state_key)
            });
            self.stage.focused = Some(id);
            if let Some(key) = tf_key {
                self.ensure_field_state(key);
            }
            self.flush();
        }
        Ok(())
    }

    /// Inserts `s` into the focused text field and fires its change
    /// callback once with the full new text.
    pub fn type_str(&mut self, s: &str) -> Result<(), HostError> {
        let (id, key) = self.focused_field()?;
        let state = self.ensure_field_state(key);
        state.borrow_mut().insert_str(s);
        let text = state.borrow().text.clone();
        self.notify_text_change(id, text);
        self.flush();
        Ok(())
    }

    /// Deletes the grapheme before the cursor in the focused field.
    pub fn backspace(&mut self) -> Result<(), HostError> {
        let (id, key) = self.focused_field()?;
        let Some(state) = self.textfield_states.get(&key).cloned() else {
            return Ok(());
        };
        let changed = state.borrow_mut().backspace();
        if changed {
            let text = state.borrow().text.clone();
            self.notify_text_change(id, text);
            self.flush();
        }
        Ok(())
    }

    /// Fires the focused field's submit callback with its current text.
    pub fn submit(&mut self) -> Result<(), HostError> {
        let (id, key) = self.focused_field()?;
        let text = self
            .textfield_states
            .get(&key)
            .map(|s| s.borrow().text.clone())
            .unwrap_or_default();
        let cb = self.frame_cache.as_ref().and_then(|f| {
            f.hit_regions
                .iter()
                .find(|h| h.id == id)
                .and_then(|h| h.on_text_submit.clone())
        });
        if let Some(cb) = cb {
            cb(text);
            self.flush();
        }
        Ok(())
    }

    fn focused_field(&self) -> Result<(u64, u64), HostError> {
        let id = self.stage.focused.ok_or(HostError::NoFocusedField)?;
        let frame = self.frame_cache.as_ref().ok_or(HostError::NotMounted)?;
        let key = frame
            .hit_regions
            .iter()
            .find(|h| h.id == id)
            .and_then(|h| h.tf_state_key)
            .ok_or(HostError::NoFocusedField)?;
        Ok((id, key))
    }

    fn ensure_field_state(&mut self, key: u64) -> Rc<RefCell<TextFieldState>> {
        self.textfield_states
            .entry(key)
            .or_insert_with(|| Rc::new(RefCell::new(TextFieldState::new())))
            .clone()
    }

    fn notify_text_change(&self, id: u64, text: String) {
        if let Some(f) = &self.frame_cache
            && let Some(h) = f.hit_regions.iter().find(|h| h.id == id)
            && let Some(cb) = &h.on_text_change
        {
            cb(text);
        }
    }

    /// Fires every timer due at the clock's current instant, draining any
    /// backlog one period per round and committing a frame between rounds,
    /// so each firing composes against the state it produced.
    pub fn pump(&mut self) -> usize {
        let mut fired = 0;
        loop {
            let n = self.timers.fire_due(self.clock.now());
            if n == 0 {
                break;
            }
            fired += n;
            self.flush();
        }
        if take_invalidated() {
            self.flush();
        }
        fired
    }

    /// Sleeps the thread between timer deadlines for `d`, pumping at each.
    /// Needs a clock that actually advances; with a manual clock use
    /// [`harness::Harness::advance`] instead.
    pub fn run_for(&mut self, d: Duration) {
        let end = self.clock.now() + d;
        loop {
            let now = self.clock.now();
            if now >= end {
                break;
            }
            let wake = match self.timers.next_deadline() {
                Some(next) if next <= end => next,
                _ => {
                    std::thread::sleep(end - now);
                    break;
                }
            };
            if wake > now {
                std::thread::sleep(wake - now);
                if self.clock.now() <= now {
                    log::warn!(
                        "clock did not advance during run_for; bailing out \
                         (manual clocks need Harness::advance)"
                    );
                    break;
                }
            }
            self.pump();
        }
    }

    /// Changes the composed size and recomposes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.stage.size = (width, height);
        self.backend.resize(width, height);
        if self.frame_cache.is_some() {
            self.flush();
        }
    }

    /// Tears the stage down: effect cleanups run exactly once, timers they
    /// scheduled get cancelled. The host can be mounted again afterwards.
    pub fn unmount(&mut self) {
        self.stage.unmount();
        self.frame_cache = None;
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame_cache.as_ref()
    }

    pub fn frames_committed(&self) -> u64 {
        self.frames_committed
    }

    pub fn timers(&self) -> &Rc<TimerRegistry> {
        &self.timers
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn focused(&self) -> Option<u64> {
        self.stage.focused
    }

    /// Current text of the field keyed `key`, if its state exists.
    pub fn field_text(&self, key: u64) -> Option<String> {
        self.textfield_states.get(&key).map(|s| s.borrow().text.clone())
    }
}
