//! # State, Signals, and Effects
//!
//! Reprise builds UI from plain functions over a small reactive core rather
//! than a widget tree with mutable fields. The main pieces:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `remember*` — lifecycle-aware storage bound to composition.
//! - `memo` / `memo_callback` / `memo_child` — dependency-keyed caches.
//! - `effect` / `disposable_effect` — side-effects with cleanup.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use reprise_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Every write raises the runtime's invalidation flag; the host consumes it
//! and recomposes the mounted tree, so a button handler only has to write the
//! signal and the next frame follows.
//!
//! ## Remembered state
//!
//! UI state lives in `remember_*` slots rather than globals:
//!
//! ```rust,ignore
//! use reprise_core::*;
//!
//! fn CounterView() -> View {
//!     let count = remember(|| signal(0i64));
//!
//!     let on_click = {
//!         let count = count.clone();
//!         move || count.update(|v| *v += 1)
//!     };
//!
//!     reprise_ui::Button(format!("Count = {}", count.get()), on_click)
//! }
//! ```
//!
//! - `remember` and `remember_state` are order-based: the Nth call in a
//!   composition always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key-based and
//!   stable across conditional branches.
//!
//! ## Memoization
//!
//! `memo` caches a derived value until its dependency changes;
//! `memo_callback` does the same for an `Rc` callback so its identity is
//! stable across recompositions; `memo_child` caches a whole subtree behind
//! an explicit input-comparison policy:
//!
//! ```rust,ignore
//! let total = memo(count.get(), |c| expensive_sum(*c));
//!
//! let on_add = memo_callback(count.get(), |c| {
//!     let c = *c;
//!     Rc::new(move || expensive_sum(c)) as Rc<dyn Fn() -> i64>
//! });
//!
//! memo_child("totals", ByIdentity, on_add.clone(), |on_add| {
//!     TotalsRow(on_add.clone())
//! })
//! ```
//!
//! ## Effects and cleanup
//!
//! `disposable_effect` is the workhorse: keyed on a value, it re-runs when
//! the key changes (cleaning up the previous run first) and its pending
//! cleanup runs once at unmount. `clock_state` uses it to keep a repeating
//! timer subscribed for exactly the mount's lifetime:
//!
//! ```rust,ignore
//! disposable_effect(count.get(), move || {
//!     title_sink().set_title(&format!("You clicked {count} times"));
//!     Dispose::none()
//! });
//! ```
//!
//! Long-running resources (timers here; anything with a handle) should be
//! acquired inside an effect body and released in its `Dispose`, so they
//! disappear with the UI that owns them.
//!
//! ## Stages and hosts
//!
//! A [`Stage`](runtime::Stage) owns one mounted composition: its slot
//! storage and a scope that lives until `unmount`. Hosts (see
//! `reprise-host`) drive the stage: compose, route events through the frame's
//! hit regions, pump timers, and commit scenes to a render backend.

pub mod color;
pub mod effects;
pub mod geometry;
pub mod locals;
pub mod modifier;
pub mod prelude;
pub mod render_api;
pub mod runtime;
pub mod scope;
pub mod semantics;
pub mod signal;
pub mod state;
pub mod tests;
pub mod time;
pub mod timer;
pub mod view;

pub use color::*;
pub use effects::*;
pub use geometry::*;
pub use locals::*;
pub use modifier::*;
pub use prelude::*;
pub use render_api::*;
pub use runtime::*;
pub use semantics::*;
pub use signal::*;
pub use state::*;
pub use time::*;
pub use timer::*;
pub use view::*;
