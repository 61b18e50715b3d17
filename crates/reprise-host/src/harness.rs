//! Deterministic host for tests: manual clock, recording sinks, and
//! deadline-stepped time travel.
//!
//! [`Harness::advance`] never jumps the clock straight to the target; it
//! stops at every timer deadline on the way and pumps there, so each firing
//! observes the instant it was scheduled for. Jumping first and pumping once
//! would collapse a backlog into a single observable instant.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reprise_core::prelude::*;
use web_time::Duration;

use crate::{Host, HostError};

/// Title sink that remembers every title it was asked to set.
#[derive(Default)]
pub struct RecordingTitle {
    history: RefCell<Vec<String>>,
}

impl RecordingTitle {
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl TitleSink for RecordingTitle {
    fn set_title(&self, title: &str) {
        self.history.borrow_mut().push(title.to_string());
    }
}

/// Diagnostics sink that remembers every reported event, in order.
#[derive(Default)]
pub struct RecordingDiagnostics {
    events: RefCell<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.contains(needle))
            .count()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, event: &str) {
        self.events.borrow_mut().push(event.to_string());
    }
}

#[derive(Default)]
struct BackendState {
    commits: Cell<u64>,
    size: Cell<(u32, u32)>,
    last: RefCell<Option<Scene>>,
}

/// Render backend that counts commits and keeps the last scene. Cloning
/// shares the underlying state, so the harness can keep a handle while the
/// host owns the boxed backend.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Rc<BackendState>,
}

impl RecordingBackend {
    pub fn commits(&self) -> u64 {
        self.inner.commits.get()
    }

    pub fn size(&self) -> (u32, u32) {
        self.inner.size.get()
    }

    pub fn last_scene(&self) -> Option<Scene> {
        self.inner.last.borrow().clone()
    }
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.inner.size.set((width, height));
    }

    fn commit(&mut self, scene: &Scene) {
        self.inner.commits.set(self.inner.commits.get() + 1);
        *self.inner.last.borrow_mut() = Some(scene.clone());
    }
}

/// A [`Host`] wired to a manual clock and recording sinks.
pub struct Harness {
    pub host: Host,
    clock: Rc<ManualClock>,
    titles: Rc<RecordingTitle>,
    diagnostics: Rc<RecordingDiagnostics>,
    backend: RecordingBackend,
}

impl Harness {
    /// Builds the harness and composes the first frame.
    pub fn mount(build: impl FnMut() -> View + 'static) -> Self {
        let clock = Rc::new(ManualClock::new());
        let titles = Rc::new(RecordingTitle::default());
        let diagnostics = Rc::new(RecordingDiagnostics::default());
        let backend = RecordingBackend::default();

        let mut host = Host::new(build)
            .with_clock(clock.clone())
            .with_title_sink(titles.clone())
            .with_diagnostics(diagnostics.clone())
            .with_backend(Box::new(backend.clone()));
        host.mount();

        Self {
            host,
            clock,
            titles,
            diagnostics,
            backend,
        }
    }

    /// Advances the manual clock by `d`, stopping at every timer deadline on
    /// the way and pumping there.
    pub fn advance(&mut self, d: Duration) {
        let target = self.clock.now() + d;
        loop {
            let Some(next) = self.host.timers().next_deadline() else {
                break;
            };
            if next > target {
                break;
            }
            self.clock.advance_to(next);
            self.host.pump();
        }
        self.clock.advance_to(target);
        self.host.pump();
    }

    pub fn advance_secs(&mut self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    pub fn click(&mut self, label: &str) -> Result<(), HostError> {
        self.host.click(label)
    }

    pub fn focus(&mut self, label: &str) -> Result<(), HostError> {
        self.host.focus(label)
    }

    pub fn type_str(&mut self, s: &str) -> Result<(), HostError> {
        self.host.type_str(s)
    }

    pub fn unmount(&mut self) {
        self.host.unmount();
    }

    pub fn clock(&self) -> &Rc<ManualClock> {
        &self.clock
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.history()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.events()
    }

    /// How many diagnostics events contain `needle`.
    pub fn diag_count(&self, needle: &str) -> usize {
        self.diagnostics.count_containing(needle)
    }

    pub fn commits(&self) -> u64 {
        self.backend.commits()
    }

    /// All text currently in the committed scene, in paint order.
    pub fn scene_texts(&self) -> Vec<String> {
        self.backend
            .last_scene()
            .map(|s| {
                s.nodes
                    .iter()
                    .filter_map(|n| match n {
                        SceneNode::Text { text, .. } => Some(text.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.scene_texts().iter().any(|t| t.contains(needle))
    }
}
