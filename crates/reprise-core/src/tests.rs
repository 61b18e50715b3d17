#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use web_time::{Duration, SystemTime};

    use crate::effects::{Dispose, disposable_effect, effect, on_unmount, window_title};
    use crate::locals::{TitleSink, with_clock, with_timers, with_title_sink};
    use crate::runtime::{
        ByIdentity, ByValue, Frame, Stage, memo, memo_callback, memo_child, remember,
        remember_with_key, take_invalidated,
    };
    use crate::scope::Scope;
    use crate::signal::signal;
    use crate::state::clock_state;
    use crate::time::{Clock, ManualClock, Timestamp};
    use crate::timer::{TimerHandle, TimerRegistry};
    use crate::view::{Scene, View, ViewKind};
    use crate::{Color, Rect, Vec2};

    fn empty() -> View {
        View::new(0, ViewKind::Box)
    }

    fn compose_frame(stage: &mut Stage, build: &mut dyn FnMut() -> View) -> Frame {
        stage.compose(build, |_, _| (Scene::default(), Vec::new(), Vec::new()))
    }

    fn compose_with_time(
        stage: &mut Stage,
        clock: &Rc<ManualClock>,
        timers: &Rc<TimerRegistry>,
        build: &mut dyn FnMut() -> View,
    ) -> Frame {
        let clock: Rc<dyn Clock> = clock.clone();
        with_clock(clock, || {
            with_timers(timers.clone(), || compose_frame(stage, build))
        })
    }

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let called = Rc::new(RefCell::new(false));

        let called_clone = called.clone();
        sig.subscribe(move |_| {
            *called_clone.borrow_mut() = true;
        });

        sig.set(42);
        assert!(*called.borrow());
    }

    #[test]
    fn test_signal_write_invalidates() {
        let _ = take_invalidated();

        let sig = signal(0);
        assert!(!take_invalidated());

        sig.set(1);
        assert!(take_invalidated());
        assert!(!take_invalidated());

        sig.update(|v| *v += 1);
        assert!(take_invalidated());
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(RefCell::new(false));

        let scope = Scope::new();
        let cleaned_up_clone = cleaned_up.clone();
        scope.add_disposer(move || {
            *cleaned_up_clone.borrow_mut() = true;
        });

        assert!(!*cleaned_up.borrow());
        scope.dispose();
        assert!(*cleaned_up.borrow());
    }

    #[test]
    fn test_effect_registers_cleanup_in_scope() {
        let cleaned = Rc::new(Cell::new(0));

        let scope = Scope::new();
        scope.run(|| {
            let cleaned = cleaned.clone();
            effect(move || {
                let cleaned = cleaned.clone();
                on_unmount(move || cleaned.set(cleaned.get() + 1))
            });
        });

        assert_eq!(cleaned.get(), 0);
        scope.dispose();
        assert_eq!(cleaned.get(), 1);
    }

    #[test]
    fn test_remember_slots_persist_across_frames() {
        let inits = Rc::new(Cell::new(0));
        let mut stage = Stage::new();

        let mut build = {
            let inits = inits.clone();
            move || {
                let count = remember({
                    let inits = inits.clone();
                    move || {
                        inits.set(inits.get() + 1);
                        signal(7i64)
                    }
                });
                assert_eq!(count.get(), 7);
                empty()
            }
        };

        compose_frame(&mut stage, &mut build);
        compose_frame(&mut stage, &mut build);
        compose_frame(&mut stage, &mut build);
        assert_eq!(inits.get(), 1);
    }

    #[test]
    fn test_key_based_remember() {
        let mut stage = Stage::new();
        let mut build = || {
            let val1 = remember_with_key("test", || 42);
            let val2 = remember_with_key("test", || 100);

            assert_eq!(*val1, 42);
            assert_eq!(*val2, 42); // Not 100, because key exists
            empty()
        };
        compose_frame(&mut stage, &mut build);
    }

    #[test]
    fn test_stages_do_not_share_slots() {
        let mut a = Stage::new();
        let mut b = Stage::new();

        let mut build_a = || {
            let v = remember(|| signal(1i64));
            v.update(|x| *x += 1);
            assert!(v.get() >= 2);
            empty()
        };
        let mut build_b = || {
            let v = remember(|| signal(100i64));
            assert_eq!(v.get(), 100);
            empty()
        };

        compose_frame(&mut a, &mut build_a);
        compose_frame(&mut b, &mut build_b);
        compose_frame(&mut a, &mut build_a);
        compose_frame(&mut b, &mut build_b);
    }

    #[test]
    fn test_memo_recomputes_only_on_dep_change() {
        let computes = Rc::new(Cell::new(0));
        let dep = Rc::new(Cell::new(3i64));
        let mut stage = Stage::new();

        let mut build = {
            let computes = computes.clone();
            let dep = dep.clone();
            move || {
                let computes = computes.clone();
                let got = memo(dep.get(), move |d| {
                    computes.set(computes.get() + 1);
                    d * 10
                });
                assert_eq!(got, dep.get() * 10);
                empty()
            }
        };

        compose_frame(&mut stage, &mut build);
        compose_frame(&mut stage, &mut build);
        assert_eq!(computes.get(), 1);

        dep.set(4);
        compose_frame(&mut stage, &mut build);
        assert_eq!(computes.get(), 2);

        compose_frame(&mut stage, &mut build);
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn test_memo_callback_identity_stable_until_dep_changes() {
        let dep = Rc::new(Cell::new(1i64));
        let last: Rc<RefCell<Option<Rc<dyn Fn() -> i64>>>> = Rc::new(RefCell::new(None));
        let same_as_last = Rc::new(Cell::new(false));
        let mut stage = Stage::new();

        let mut build = {
            let dep = dep.clone();
            let last = last.clone();
            let same_as_last = same_as_last.clone();
            move || {
                let cb = memo_callback(dep.get(), |d| {
                    let d = *d;
                    Rc::new(move || d * 2)
                });
                assert_eq!(cb(), dep.get() * 2);

                if let Some(prev) = last.borrow().as_ref() {
                    same_as_last.set(Rc::ptr_eq(prev, &cb));
                }
                *last.borrow_mut() = Some(cb);
                empty()
            }
        };

        compose_frame(&mut stage, &mut build);
        compose_frame(&mut stage, &mut build);
        assert!(same_as_last.get(), "identity must hold while dep is stable");

        dep.set(2);
        compose_frame(&mut stage, &mut build);
        assert!(!same_as_last.get(), "identity must change with the dep");
    }

    #[test]
    fn test_memo_child_by_identity() {
        let builds = Rc::new(Cell::new(0));
        let input: Rc<RefCell<Rc<dyn Fn() -> i64>>> = Rc::new(RefCell::new(Rc::new(|| 42)));
        let mut stage = Stage::new();

        let mut build = {
            let builds = builds.clone();
            let input = input.clone();
            move || {
                let builds = builds.clone();
                let current = input.borrow().clone();
                memo_child("child", ByIdentity, current, move |_| {
                    builds.set(builds.get() + 1);
                    empty()
                })
            }
        };

        compose_frame(&mut stage, &mut build);
        compose_frame(&mut stage, &mut build);
        assert_eq!(builds.get(), 1, "same Rc: cached subtree is reused");

        // A fresh closure computing the same thing is a different identity.
        *input.borrow_mut() = Rc::new(|| 42);
        compose_frame(&mut stage, &mut build);
        assert_eq!(builds.get(), 2);
    }

    #[test]
    fn test_memo_child_by_value() {
        let builds = Rc::new(Cell::new(0));
        let input = Rc::new(RefCell::new(String::from("a")));
        let mut stage = Stage::new();

        let mut build = {
            let builds = builds.clone();
            let input = input.clone();
            move || {
                let builds = builds.clone();
                memo_child("child", ByValue, input.borrow().clone(), move |_| {
                    builds.set(builds.get() + 1);
                    empty()
                })
            }
        };

        compose_frame(&mut stage, &mut build);
        // A fresh but equal String does not rebuild.
        compose_frame(&mut stage, &mut build);
        assert_eq!(builds.get(), 1);

        *input.borrow_mut() = String::from("b");
        compose_frame(&mut stage, &mut build);
        assert_eq!(builds.get(), 2);
    }

    #[test]
    fn test_disposable_effect_rekey_and_unmount() {
        let runs = Rc::new(Cell::new(0));
        let cleanups = Rc::new(Cell::new(0));
        let key = Rc::new(Cell::new(1i32));
        let mut stage = Stage::new();

        let mut build = {
            let runs = runs.clone();
            let cleanups = cleanups.clone();
            let key = key.clone();
            move || {
                let runs = runs.clone();
                let cleanups = cleanups.clone();
                disposable_effect(key.get(), move || {
                    runs.set(runs.get() + 1);
                    Dispose::new(move || cleanups.set(cleanups.get() + 1))
                });
                empty()
            }
        };

        compose_frame(&mut stage, &mut build);
        assert_eq!((runs.get(), cleanups.get()), (1, 0));

        // Same key: nothing re-runs.
        compose_frame(&mut stage, &mut build);
        assert_eq!((runs.get(), cleanups.get()), (1, 0));

        // Key change: old cleanup, then new run.
        key.set(2);
        compose_frame(&mut stage, &mut build);
        assert_eq!((runs.get(), cleanups.get()), (2, 1));

        // Unmount: the pending cleanup runs exactly once.
        stage.unmount();
        assert_eq!((runs.get(), cleanups.get()), (2, 2));
        stage.unmount();
        assert_eq!(cleanups.get(), 2);
    }

    #[test]
    fn test_window_title_writes_only_on_change() {
        struct RecTitle(Rc<RefCell<Vec<String>>>);
        impl TitleSink for RecTitle {
            fn set_title(&self, title: &str) {
                self.0.borrow_mut().push(title.to_string());
            }
        }

        let writes = Rc::new(RefCell::new(Vec::new()));
        let count = Rc::new(Cell::new(0i64));
        let mut stage = Stage::new();

        let mut build = {
            let count = count.clone();
            move || {
                window_title(format!("You clicked {} times", count.get()));
                empty()
            }
        };

        let sink: Rc<dyn TitleSink> = Rc::new(RecTitle(writes.clone()));
        let mut composed = |stage: &mut Stage, build: &mut dyn FnMut() -> View| {
            with_title_sink(sink.clone(), || compose_frame(stage, build))
        };

        composed(&mut stage, &mut build);
        composed(&mut stage, &mut build);
        assert_eq!(writes.borrow().len(), 1, "same title is not re-written");

        count.set(3);
        composed(&mut stage, &mut build);
        assert_eq!(
            *writes.borrow(),
            vec![
                "You clicked 0 times".to_string(),
                "You clicked 3 times".to_string()
            ]
        );
    }

    #[test]
    fn test_timer_fire_and_rearm() {
        let clock = ManualClock::new();
        let timers = Rc::new(TimerRegistry::new());
        let fires = Rc::new(Cell::new(0));

        let t0 = clock.now();
        let _handle = timers.schedule_repeating(Duration::from_secs(1), t0, {
            let fires = fires.clone();
            move || fires.set(fires.get() + 1)
        });

        assert_eq!(timers.active(), 1);
        assert_eq!(timers.next_deadline(), Some(t0 + Duration::from_secs(1)));

        assert_eq!(timers.fire_due(t0), 0, "nothing due before the deadline");

        clock.advance(Duration::from_secs(1));
        assert_eq!(timers.fire_due(clock.now()), 1);
        assert_eq!(fires.get(), 1);
        assert_eq!(
            timers.next_deadline(),
            Some(t0 + Duration::from_secs(2)),
            "re-armed one period later"
        );

        assert_eq!(timers.fire_due(clock.now()), 0, "not due again until then");
    }

    #[test]
    fn test_timer_cancel_exactly_once() {
        let clock = ManualClock::new();
        let timers = Rc::new(TimerRegistry::new());

        let handle = timers.schedule_repeating(Duration::from_secs(1), clock.now(), || {});
        assert_eq!(timers.scheduled_total(), 1);
        assert!(handle.is_active());

        assert!(handle.cancel());
        assert_eq!(timers.active(), 0);
        assert_eq!(timers.cancelled_total(), 1);

        clock.advance(Duration::from_secs(5));
        assert_eq!(timers.fire_due(clock.now()), 0);
    }

    #[test]
    fn test_timer_backlog_fires_once_per_period() {
        let clock = ManualClock::new();
        let timers = Rc::new(TimerRegistry::new());
        let fires = Rc::new(Cell::new(0));

        let _handle = timers.schedule_repeating(Duration::from_secs(1), clock.now(), {
            let fires = fires.clone();
            move || fires.set(fires.get() + 1)
        });

        clock.advance(Duration::from_millis(3500));
        let mut rounds = 0;
        while timers.fire_due(clock.now()) > 0 {
            rounds += 1;
        }
        assert_eq!(fires.get(), 3, "3 whole periods elapsed");
        assert_eq!(rounds, 3, "one firing per round, never twice for one deadline");
    }

    #[test]
    fn test_timer_cancelled_mid_round_does_not_fire() {
        let clock = ManualClock::new();
        let timers = Rc::new(TimerRegistry::new());
        let second_fired = Rc::new(Cell::new(false));

        let victim = Rc::new(RefCell::new(None::<TimerHandle>));
        let _killer = timers.schedule_repeating(Duration::from_secs(1), clock.now(), {
            let victim = victim.clone();
            move || {
                if let Some(h) = victim.borrow_mut().take() {
                    h.cancel();
                }
            }
        });
        let handle = timers.schedule_repeating(Duration::from_secs(1), clock.now(), {
            let second_fired = second_fired.clone();
            move || second_fired.set(true)
        });
        *victim.borrow_mut() = Some(handle);

        clock.advance(Duration::from_secs(1));
        timers.fire_due(clock.now());
        assert!(
            !second_fired.get(),
            "a timer cancelled earlier in the same round must not fire"
        );
        assert_eq!(timers.active(), 1);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        let t0 = clock.now();

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), t0 + Duration::from_secs(5));

        // advance_to never goes backwards
        clock.advance_to(t0 + Duration::from_secs(2));
        assert_eq!(clock.now(), t0 + Duration::from_secs(5));

        clock.advance_to(t0 + Duration::from_secs(8));
        assert_eq!(clock.now(), t0 + Duration::from_secs(8));
    }

    #[test]
    fn test_timestamp_format_hms() {
        let ts = Timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(3661));
        assert_eq!(ts.format_hms(), "01:01:01");

        let midnight = Timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(86_400));
        assert_eq!(midnight.format_hms(), "00:00:00");
    }

    #[test]
    fn test_clock_state_ticks_and_cancels_on_unmount() {
        let clock = Rc::new(ManualClock::new());
        let timers = Rc::new(TimerRegistry::new());
        let seen: Rc<RefCell<Vec<Timestamp>>> = Rc::new(RefCell::new(Vec::new()));
        let mut stage = Stage::new();

        let mut build = {
            let seen = seen.clone();
            move || {
                let now = clock_state(Duration::from_secs(1));
                seen.borrow_mut().push(now.get());
                empty()
            }
        };

        compose_with_time(&mut stage, &clock, &timers, &mut build);
        assert_eq!(timers.active(), 1);
        assert_eq!(timers.scheduled_total(), 1);

        // Recomposition must not re-subscribe.
        compose_with_time(&mut stage, &clock, &timers, &mut build);
        assert_eq!(timers.scheduled_total(), 1);

        clock.advance(Duration::from_secs(1));
        assert_eq!(timers.fire_due(clock.now()), 1);
        assert!(take_invalidated(), "a tick invalidates the frame");
        compose_with_time(&mut stage, &clock, &timers, &mut build);

        let seen = seen.borrow();
        let first = seen[0];
        let last = *seen.last().unwrap();
        assert!(last > first, "each tick observes a strictly later time");

        drop(seen);
        stage.unmount();
        assert_eq!(timers.active(), 0);
        assert_eq!(timers.cancelled_total(), 1);
        assert_eq!(timers.scheduled_total(), 1, "cancelled exactly once, no respawn");

        clock.advance(Duration::from_secs(3));
        assert_eq!(timers.fire_due(clock.now()), 0, "no ticks after unmount");
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }
}
