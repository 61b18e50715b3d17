//! # Composition locals
//!
//! Thread-local "composition locals" carry ambient parameters down the tree
//! without threading them through every constructor:
//!
//! - `Theme` — colors for surfaces, text, controls.
//! - `Density` — dp→px scale factor.
//! - `TitleSink` — where window-title writes go.
//! - `Diagnostics` — where components report observable events.
//! - `Clock` — the time source composition reads.
//! - `TimerRegistry` — the ambient timer facility `clock_state` subscribes to.
//!
//! Override any of them for a subtree (or for a whole mount, as the host
//! does) with the matching `with_*` function:
//!
//! ```rust
//! use reprise_core::*;
//!
//! let light = Theme {
//!     background: Color::WHITE,
//!     surface: Color::from_hex("#F5F5F5"),
//!     on_surface: Color::from_hex("#222222"),
//!     ..Theme::default()
//! };
//!
//! with_theme(light, || {
//!     // views composed here see the light theme
//! });
//! ```
//!
//! Capability getters hand out `Rc` handles. A closure that needs a
//! capability at event time (a button handler reporting to diagnostics, a
//! timer callback reading the clock) must capture the handle during
//! composition; the locals stack is only populated while composing.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::Color;
use crate::time::Clock;
use crate::timer::TimerRegistry;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        } else {
            let mut m = HashMap::new();
            m.insert(t, v);
            st.borrow_mut().push(m);
        }
    });
}

fn get_local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return Some(t.clone());
            }
        }
        None
    })
}

// Typed API

/// Color theme used by widgets and layout. Small and semantic rather than a
/// full design-system spec.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Default container surface (cards, panels).
    pub surface: Color,
    /// Primary foreground color on top of `surface`/`background`.
    pub on_surface: Color,
    /// Accent color.
    pub primary: Color,
    /// Foreground color used on top of `primary`.
    pub on_primary: Color,
    /// Low-emphasis outline/border color.
    pub outline: Color,
    /// Focus rings and accessibility highlights.
    pub focus: Color,
    /// Default button background.
    pub button_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#121212"),
            surface: Color::from_hex("#1E1E1E"),
            on_surface: Color::from_hex("#DDDDDD"),
            primary: Color::from_hex("#34AF82"),
            on_primary: Color::WHITE,
            outline: Color::from_hex("#555555"),
            focus: Color::from_hex("#88CCFF"),
            button_bg: Color::from_hex("#34AF82"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Density {
    pub scale: f32, // dp→px multiplier
}

impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Convert a dp scalar into px using the current `Density`.
pub fn dp_to_px(dp: f32) -> f32 {
    dp * density().scale
}

/// Where `window_title` writes land. Hosts install a real sink (terminal
/// escape, recording sink); the default routes to the log.
pub trait TitleSink: 'static {
    fn set_title(&self, title: &str);
}

/// Default sink: titles go to the log under the `reprise::title` target.
pub struct LogTitle;

impl TitleSink for LogTitle {
    fn set_title(&self, title: &str) {
        log::info!(target: "reprise::title", "{title}");
    }
}

/// Observable-event channel for components: recomputations, child renders,
/// results of handlers. Tests install a recording sink and assert on it.
pub trait Diagnostics: 'static {
    fn report(&self, event: &str);
}

/// Default diagnostics: events go to the log under `reprise::diag`.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, event: &str) {
        log::debug!(target: "reprise::diag", "{event}");
    }
}

// Provide helpers (push a new frame, set the local, run closure, pop frame)

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Theme>(), Box::new(theme));
        f()
    })
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Density>(), Box::new(density));
        f()
    })
}

pub fn with_title_sink<R>(sink: Rc<dyn TitleSink>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Rc<dyn TitleSink>>(), Box::new(sink));
        f()
    })
}

pub fn with_diagnostics<R>(diag: Rc<dyn Diagnostics>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Rc<dyn Diagnostics>>(), Box::new(diag));
        f()
    })
}

pub fn with_clock<R>(clock: Rc<dyn Clock>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Rc<dyn Clock>>(), Box::new(clock));
        f()
    })
}

pub fn with_timers<R>(timers: Rc<TimerRegistry>, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Rc<TimerRegistry>>(), Box::new(timers));
        f()
    })
}

// Getters with defaults if not set

pub fn theme() -> Theme {
    get_local::<Theme>().unwrap_or_default()
}

pub fn density() -> Density {
    get_local::<Density>().unwrap_or_default()
}

pub fn title_sink() -> Rc<dyn TitleSink> {
    get_local::<Rc<dyn TitleSink>>().unwrap_or_else(|| Rc::new(LogTitle))
}

pub fn diagnostics() -> Rc<dyn Diagnostics> {
    get_local::<Rc<dyn Diagnostics>>().unwrap_or_else(|| Rc::new(LogDiagnostics))
}

pub fn clock() -> Rc<dyn Clock> {
    get_local::<Rc<dyn Clock>>().unwrap_or_else(|| Rc::new(crate::time::SystemClock))
}

/// The ambient timer facility, if a host installed one. There is no sane
/// default: a registry nobody pumps would never fire.
pub fn timers() -> Option<Rc<TimerRegistry>> {
    get_local::<Rc<TimerRegistry>>()
}
