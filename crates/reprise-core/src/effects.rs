use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::runtime::remember;
use crate::scope::scoped_effect;

/// A cleanup that runs at most once. Clones share the same guard, so any
/// copy may trigger it and the rest become no-ops.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// A dispose with nothing to do, for effects without cleanup.
    pub fn none() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs the cleanup if it has not run yet.
    pub fn run(&self) {
        if let Some(f) = self.0.borrow_mut().take() {
            f()
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}

/// Runs `f()` immediately and returns its `Dispose`, also parking a copy in
/// the current scope so the cleanup runs at unmount even if the caller drops
/// the returned handle.
pub fn effect<F>(f: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let d = f();

    if let Some(scope) = crate::scope::current_scope() {
        let d2 = d.clone();
        scope.add_disposer(move || d2.run());
    }

    d
}

/// Helper to build the cleanup handed back from an effect body.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// Runs on every recomposition. For work that must happen again each frame,
/// like reporting a render to diagnostics.
pub fn side_effect(effect: impl FnOnce()) {
    effect();
}

/// Keyed effect: runs on first composition and whenever `key` differs from
/// the previous composition; the prior cleanup runs before the new body.
/// The pending cleanup also runs once at unmount.
///
/// Slot-based, so the call must stay at a stable position in the composition.
pub fn disposable_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| Cell::new(false));

    // One unmount disposer per callsite per mount. Slots are born with the
    // mount's scope, so slot-init and first-composition coincide.
    if !installed.get() {
        installed.set(true);
        let cleanup_slot = cleanup_slot.clone();
        scoped_effect(move || {
            on_unmount(move || {
                if let Some(d) = cleanup_slot.borrow_mut().take() {
                    d.run();
                }
            })
        });
    }

    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);

        if let Some(d) = cleanup_slot.borrow_mut().take() {
            d.run();
        }

        let d = effect();
        *cleanup_slot.borrow_mut() = Some(d);
    }
}

/// Publishes `title` through the ambient [`crate::locals::TitleSink`].
///
/// Keyed on the title text, so recompositions that produce the same title do
/// not re-write it; only an actual change reaches the sink. The title is left
/// in place at unmount.
pub fn window_title(title: impl Into<String>) {
    let title = title.into();
    disposable_effect(title.clone(), move || {
        crate::locals::title_sink().set_title(&title);
        Dispose::none()
    });
}
