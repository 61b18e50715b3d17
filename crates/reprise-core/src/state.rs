use web_time::Duration;

use crate::effects::{Dispose, disposable_effect};
use crate::locals;
use crate::runtime::remember;
use crate::signal::{Signal, signal};
use crate::time::Timestamp;

/// A signal carrying the current wall-clock time, refreshed every `period`.
///
/// The timer is subscribed through the ambient [`locals::timers`] registry on
/// first composition and cancelled exactly once, at unmount (or when `period`
/// changes, in which case the old subscription is cancelled before the new
/// one is made). Composing without an ambient registry yields a frozen
/// timestamp and a warning rather than a panic, so pure layout tests can
/// still compose clock users.
pub fn clock_state(period: Duration) -> Signal<Timestamp> {
    let clock = locals::clock();
    let sig = remember({
        let clock = clock.clone();
        move || signal(Timestamp(clock.wall_now()))
    });
    let out: Signal<Timestamp> = (*sig).clone();

    disposable_effect(period, {
        let out = out.clone();
        move || match locals::timers() {
            Some(timers) => {
                let handle = timers.schedule_repeating(period, clock.now(), {
                    let out = out.clone();
                    let clock = clock.clone();
                    move || out.set(Timestamp(clock.wall_now()))
                });
                Dispose::new(move || {
                    handle.cancel();
                })
            }
            None => {
                log::warn!("clock_state: no ambient timer registry; the clock will not tick");
                Dispose::none()
            }
        }
    });

    out
}
