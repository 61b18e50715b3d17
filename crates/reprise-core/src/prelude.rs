pub use crate::color::Color;
pub use crate::effects::{
    Dispose, disposable_effect, effect, on_unmount, side_effect, window_title,
};
pub use crate::geometry::{Rect, Size, Vec2};
pub use crate::locals::{
    Density, Diagnostics, LogDiagnostics, LogTitle, Theme, TitleSink, clock, density,
    diagnostics, dp_to_px, theme, timers, title_sink, with_clock, with_density, with_diagnostics,
    with_theme, with_timers, with_title_sink,
};
pub use crate::modifier::{Border, Modifier};
pub use crate::render_api::{NullBackend, RenderBackend};
pub use crate::runtime::{
    ByIdentity, ByValue, ComposeGuard, Frame, HitRegion, InputPolicy, SemNode, Stage,
    invalidate, memo, memo_callback, memo_child, remember, remember_state,
    remember_state_with_key, remember_with_key, take_invalidated,
};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::semantics::{Role, Semantics};
pub use crate::signal::{Signal, signal};
pub use crate::state::clock_state;
pub use crate::time::{Clock, ManualClock, SystemClock, Timestamp};
pub use crate::timer::{TimerHandle, TimerKey, TimerRegistry};
pub use crate::view::{Scene, SceneNode, View, ViewId, ViewKind};
