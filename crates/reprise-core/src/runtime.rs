use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;
use crate::{Rect, Scene, View, semantics::Role};

thread_local! {
    static COMPOSER_STACK: RefCell<Vec<Rc<RefCell<Composer>>>> = RefCell::new(Vec::new());
    static INVALIDATED: Cell<bool> = const { Cell::new(false) };
}

/// Slot storage for one mounted tree. Positional slots are matched by call
/// order, keyed slots by string key; both live for the whole mount.
#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

impl Composer {
    fn clear(&mut self) {
        self.slots.clear();
        self.keyed_slots.clear();
        self.cursor = 0;
    }
}

/// Installs a composer for the duration of a compose pass. Stages push their
/// own composer here, so several mounted stages can share a thread.
pub struct ComposeGuard;

impl ComposeGuard {
    pub fn begin(composer: Rc<RefCell<Composer>>) -> Self {
        composer.borrow_mut().cursor = 0;
        COMPOSER_STACK.with(|stack| stack.borrow_mut().push(composer));
        ComposeGuard
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        COMPOSER_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn with_composer<R>(f: impl FnOnce(&mut Composer) -> R) -> R {
    let composer = COMPOSER_STACK.with(|stack| stack.borrow().last().cloned());
    let Some(composer) = composer else {
        panic!("composition primitive used outside of an active composition");
    };
    let mut composer = composer.borrow_mut();
    f(&mut composer)
}

/// Marks the last composed tree stale. Raised by every `Signal` write; hosts
/// consume it via [`take_invalidated`] to decide when to recompose.
pub fn invalidate() {
    INVALIDATED.with(|flag| flag.set(true));
}

/// Takes and clears the invalidation flag.
pub fn take_invalidated() -> bool {
    INVALIDATED.with(|flag| flag.replace(false))
}

/// Slot-based remember (sequential composition only).
///
/// `init` runs with the composer borrowed, so it must not call other slot
/// primitives; chain them sequentially instead.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    with_composer(|c| {
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            // replace (else panics)
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember, stable under conditional composition.
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    with_composer(|c| {
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!("remember_with_key: key '{key}' reused with a different type; replacing.");
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}

/// Returns a cached value, recomputing only when `dep` differs from the
/// previous composition (`PartialEq`).
///
/// `compute` runs outside the composer borrow, so it may read locals and
/// report to diagnostics; it must not call positional slot primitives.
pub fn memo<D, T>(dep: D, compute: impl FnOnce(&D) -> T) -> T
where
    D: PartialEq + 'static,
    T: Clone + 'static,
{
    let cache = remember_state::<Option<(D, T)>>(|| None);

    {
        let cached = cache.borrow();
        if let Some((prev, value)) = cached.as_ref()
            && *prev == dep
        {
            return value.clone();
        }
    }

    let value = compute(&dep);
    *cache.borrow_mut() = Some((dep, value.clone()));
    value
}

/// [`memo`] for callbacks: the returned `Rc` keeps its identity
/// (`Rc::ptr_eq`) across recompositions until `dep` changes, so it can gate
/// identity-compared children.
pub fn memo_callback<D, R>(
    dep: D,
    make: impl FnOnce(&D) -> Rc<dyn Fn() -> R>,
) -> Rc<dyn Fn() -> R>
where
    D: PartialEq + 'static,
    R: 'static,
{
    memo(dep, make)
}

/// Decides whether a memoized child may keep its cached subtree for a new
/// input. Passed by value at the `memo_child` call site, so the comparison
/// rule is visible where the child is used.
pub trait InputPolicy<P> {
    fn reuse(&self, prev: &P, next: &P) -> bool;
}

/// Reuse while the input is the same allocation (`Rc::ptr_eq`). The policy
/// for callback props: a stable `memo_callback` keeps the child cached, a
/// rebuilt closure invalidates it even if it computes the same thing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByIdentity;

impl<T: ?Sized> InputPolicy<Rc<T>> for ByIdentity {
    fn reuse(&self, prev: &Rc<T>, next: &Rc<T>) -> bool {
        Rc::ptr_eq(prev, next)
    }
}

/// Reuse while the input compares equal (`PartialEq`).
#[derive(Clone, Copy, Debug, Default)]
pub struct ByValue;

impl<P: PartialEq> InputPolicy<P> for ByValue {
    fn reuse(&self, prev: &P, next: &P) -> bool {
        prev == next
    }
}

/// Composes `build` only when `policy` says `input` no longer matches the
/// cached one; otherwise returns the cached subtree without running `build`.
///
/// Keyed like [`remember_with_key`]. `build` runs in normal composition
/// context, but positional slots inside it would go dead on cached frames,
/// so a memoized child should keep its own state keyed (or take it through
/// `input`).
pub fn memo_child<P, Pol, F>(key: impl Into<String>, policy: Pol, input: P, build: F) -> View
where
    P: Clone + 'static,
    Pol: InputPolicy<P>,
    F: FnOnce(&P) -> View,
{
    let cache = remember_state_with_key::<Option<(P, View)>>(key, || None);

    {
        let cached = cache.borrow();
        if let Some((prev, view)) = cached.as_ref()
            && policy.reuse(prev, &input)
        {
            return view.clone();
        }
    }

    let view = build(&input);
    *cache.borrow_mut() = Some((input, view.clone()));
    view
}

/// Frame — output of composition for a tick: scene + input/semantics.
pub struct Frame {
    pub scene: Scene,
    pub hit_regions: Vec<HitRegion>,
    pub semantics_nodes: Vec<SemNode>,
    pub focus_chain: Vec<u64>,
}

#[derive(Clone)]
pub struct HitRegion {
    pub id: u64,
    pub rect: Rect,
    pub on_click: Option<Rc<dyn Fn()>>,
    pub focusable: bool,
    pub z_index: f32,
    pub on_text_change: Option<Rc<dyn Fn(String)>>,
    pub on_text_submit: Option<Rc<dyn Fn(String)>>,
    /// If this hit region belongs to a TextField, this persistent key is used
    /// for looking up host-managed TextFieldState. Falls back to `id` if None.
    pub tf_state_key: Option<u64>,
}

/// Flattened semantics node produced by `layout_and_paint`.
///
/// This is what hosts target widgets through: resolved screen rect, role,
/// label, and focus/enabled state.
#[derive(Clone)]
pub struct SemNode {
    /// Stable id, shared with the associated `HitRegion` / `ViewId`.
    pub id: u64,
    pub role: Role,
    pub label: Option<String>,
    pub rect: Rect,
    pub focused: bool,
    pub enabled: bool,
}

/// One mounted composition: slot storage, the mount-lifetime scope, focus,
/// and the composed size.
///
/// Slots and the root scope live from the first [`compose`] to [`unmount`];
/// effect cleanups registered during any composition run once, at unmount.
///
/// [`compose`]: Stage::compose
/// [`unmount`]: Stage::unmount
pub struct Stage {
    pub focused: Option<u64>,
    pub size: (u32, u32),
    composer: Rc<RefCell<Composer>>,
    root_scope: Option<Scope>,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            focused: None,
            size: (1280, 800),
            composer: Rc::new(RefCell::new(Composer::default())),
            root_scope: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.root_scope.is_some()
    }

    /// Runs one compose pass: builds the tree inside this stage's composer
    /// and scope, then lays it out and paints it via `layout_paint`.
    pub fn compose<F>(
        &mut self,
        mut build_root: F,
        layout_paint: impl FnOnce(&View, (u32, u32)) -> (Scene, Vec<HitRegion>, Vec<SemNode>),
    ) -> Frame
    where
        F: FnMut() -> View,
    {
        let scope = self.root_scope.get_or_insert_with(Scope::new).clone();
        let _guard = ComposeGuard::begin(self.composer.clone());
        let root = scope.run(&mut build_root);
        let (scene, hits, sem) = layout_paint(&root, self.size);

        let focus_chain: Vec<u64> = hits.iter().filter(|h| h.focusable).map(|h| h.id).collect();

        Frame {
            scene,
            hit_regions: hits,
            semantics_nodes: sem,
            focus_chain,
        }
    }

    /// Tears the mount down: disposes the root scope (running every pending
    /// effect cleanup exactly once) and drops all slots. The stage can be
    /// composed again afterwards; that starts a fresh mount.
    pub fn unmount(&mut self) {
        if let Some(scope) = self.root_scope.take() {
            scope.dispose();
        }
        self.composer.borrow_mut().clear();
        self.focused = None;
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
