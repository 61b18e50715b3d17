#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use reprise_core::prelude::*;
    use reprise_ui::{
        Button, Column, Text, TextField, TextFieldExt, ViewExt,
    };
    use web_time::Duration;

    use crate::harness::{Harness, RecordingBackend};
    use crate::{Host, HostError};

    fn counter() -> impl FnMut() -> View {
        || {
            let count = remember(|| signal(0i64));
            let n = count.get();
            let on_click = (*count).clone();
            Column(Modifier::new()).child((
                Text(format!("count: {n}")),
                Button("inc", move || on_click.update(|c| *c += 1)),
            ))
        }
    }

    #[test]
    fn click_by_label_updates_composition() {
        let mut h = Harness::mount(counter());
        assert!(h.has_text("count: 0"));

        let before = h.commits();
        h.click("inc").unwrap();
        assert!(h.has_text("count: 1"));
        assert!(h.commits() > before);

        h.click("inc").unwrap();
        assert!(h.has_text("count: 2"));
    }

    #[test]
    fn click_unknown_label_errors() {
        let mut h = Harness::mount(counter());
        let err = h.click("does not exist").unwrap_err();
        assert!(matches!(err, HostError::NoSuchTarget(label) if label == "does not exist"));
    }

    #[test]
    fn type_without_focus_errors() {
        let mut h = Harness::mount(counter());
        assert!(matches!(
            h.type_str("x").unwrap_err(),
            HostError::NoFocusedField
        ));
    }

    fn echo_field() -> impl FnMut() -> View {
        || {
            let text = remember(|| signal(String::new()));
            let cur = text.get();
            let sink = (*text).clone();
            Column(Modifier::new()).child((
                TextField(5, "name").on_change(move |v| sink.set(v)),
                Text(format!("typed: {cur}")),
            ))
        }
    }

    #[test]
    fn focus_and_type_round_trip() {
        let mut h = Harness::mount(echo_field());
        h.focus("name").unwrap();
        h.type_str("ab").unwrap();

        assert!(h.has_text("typed: ab"));
        assert_eq!(h.host.field_text(5).as_deref(), Some("ab"));

        // Focus persists across recompositions; keep typing.
        h.type_str("c").unwrap();
        assert!(h.has_text("typed: abc"));
    }

    #[test]
    fn backspace_edits_focused_field() {
        let mut h = Harness::mount(echo_field());
        h.focus("name").unwrap();
        h.type_str("abc").unwrap();
        h.host.backspace().unwrap();

        assert!(h.has_text("typed: ab"));
        assert_eq!(h.host.field_text(5).as_deref(), Some("ab"));
    }

    #[test]
    fn submit_fires_callback_with_current_text() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let seen = submitted.clone();
        let mut h = Harness::mount(move || {
            let seen = seen.clone();
            Column(Modifier::new()).child(
                TextField(9, "query").on_submit(move |v| seen.borrow_mut().push(v)),
            )
        });

        h.focus("query").unwrap();
        h.type_str("find me").unwrap();
        h.host.submit().unwrap();

        assert_eq!(*submitted.borrow(), vec!["find me".to_string()]);
    }

    #[test]
    fn click_at_position_and_miss_clears_focus() {
        let mut h = Harness::mount(counter());

        let center = {
            let frame = h.host.frame().unwrap();
            let sem = frame
                .semantics_nodes
                .iter()
                .find(|n| n.label.as_deref() == Some("inc"))
                .unwrap();
            sem.rect.center()
        };
        h.host.click_at(center.x, center.y).unwrap();
        assert!(h.has_text("count: 1"));
        assert!(h.host.focused().is_some());

        h.host.click_at(5000.0, 5000.0).unwrap();
        assert!(h.host.focused().is_none());
    }

    #[test]
    fn focus_next_cycles_in_layout_order() {
        let mut h = Harness::mount(|| {
            Column(Modifier::new()).child((
                Button("a", || {}),
                Button("b", || {}),
                TextField(2, "c"),
            ))
        });

        let chain = h.host.frame().unwrap().focus_chain.clone();
        assert_eq!(chain.len(), 3);

        h.host.focus_next().unwrap();
        assert_eq!(h.host.focused(), Some(chain[0]));
        h.host.focus_next().unwrap();
        assert_eq!(h.host.focused(), Some(chain[1]));
        h.host.focus_next().unwrap();
        assert_eq!(h.host.focused(), Some(chain[2]));
        h.host.focus_next().unwrap();
        assert_eq!(h.host.focused(), Some(chain[0]), "wraps around");
    }

    fn ticking_clock() -> impl FnMut() -> View {
        || {
            let now = clock_state(Duration::from_secs(1));
            let ts = now.get();
            Column(Modifier::new()).child(Text(ts.format_hms()))
        }
    }

    #[test]
    fn manual_clock_advances_drive_ticks() {
        let mut h = Harness::mount(ticking_clock());
        assert!(h.has_text("00:00:00"));

        h.advance_secs(1);
        assert!(h.has_text("00:00:01"));

        h.advance_secs(2);
        assert!(h.has_text("00:00:03"));
    }

    #[test]
    fn unmount_cancels_scheduled_timers() {
        let mut h = Harness::mount(ticking_clock());
        assert_eq!(h.host.timers().active(), 1);

        h.unmount();
        assert_eq!(h.host.timers().active(), 0);
        assert_eq!(h.host.timers().cancelled_total(), 1);

        let commits = h.commits();
        h.advance_secs(5);
        assert_eq!(h.commits(), commits, "no frames after unmount");
    }

    #[test]
    fn window_title_flows_to_sink_per_change() {
        let mut h = Harness::mount(|| {
            let count = remember(|| signal(0i64));
            let n = count.get();
            window_title(format!("clicked {n} times"));
            let on_click = (*count).clone();
            Column(Modifier::new()).child(Button("inc", move || on_click.update(|c| *c += 1)))
        });

        h.click("inc").unwrap();
        h.click("inc").unwrap();

        assert_eq!(
            h.titles(),
            vec![
                "clicked 0 times".to_string(),
                "clicked 1 times".to_string(),
                "clicked 2 times".to_string(),
            ]
        );
    }

    #[test]
    fn cascading_writes_settle_within_flush() {
        let mut h = Harness::mount(|| {
            let doubled = remember(|| signal(0i64));
            let source = remember(|| signal(3i64));
            let want = source.get() * 2;
            if doubled.get() != want {
                doubled.set(want);
            }
            Column(Modifier::new()).child(Text(format!("doubled: {}", doubled.get())))
        });

        assert!(h.has_text("doubled: 6"));
        // First pass writes, second pass settles.
        assert_eq!(h.commits(), 2);
    }

    #[test]
    fn resize_recomposes_at_new_size() {
        let backend = RecordingBackend::default();
        let mut host = Host::new(|| {
            Column(Modifier::new()).child(Text("hello"))
        })
        .with_backend(Box::new(backend.clone()));
        host.mount();
        assert_eq!(backend.size(), (1280, 800));

        let before = backend.commits();
        host.resize(640, 480);
        assert_eq!(backend.size(), (640, 480));
        assert!(backend.commits() > before);
    }
}
