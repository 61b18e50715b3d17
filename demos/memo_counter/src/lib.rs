#![allow(non_snake_case)]
//! The counter-and-clock view again, plus the memoization story: a cached
//! O(count) sum, an identity-stable callback computing the same sum, a plain
//! text field, and a child view that only rebuilds when the callback it
//! receives is a different allocation.


use std::rc::Rc;

use reprise_core::prelude::*;
use reprise_ui::*;
use web_time::Duration;

/// Key for the input field's host-side editing state.
pub const VALUE_FIELD: u64 = 1;

pub fn MemoCounter() -> View {
    let count = remember(|| signal(0i64));
    let value = remember(|| signal(String::new()));
    let now = clock_state(Duration::from_secs(1));

    side_effect(|| diagnostics().report("render"));
    window_title(format!("You clicked {} times", count.get()));

    let n = count.get();

    // Cached sum of 0..count, recomputed only when the counter moves. The
    // loop is deliberately linear; that is what makes the cache observable.
    let expensive = memo(n, |c| {
        diagnostics().report("computed");
        let mut sum = 0i64;
        for i in 0..*c {
            sum += i;
        }
        sum
    });

    // The same sum again, captured behind an identity-stable callback. Not
    // merged with the memo above: the two are separate caches, and the demo
    // is about observing which one runs when.
    let add = memo_callback(n, |c| {
        let c = *c;
        Rc::new(move || {
            let mut sum = 0i64;
            for i in 0..c {
                sum += i;
            }
            sum
        }) as Rc<dyn Fn() -> i64>
    });

    let on_click = {
        let count = (*count).clone();
        move || count.update(|c| *c += 1)
    };
    let on_change = {
        let value = (*value).clone();
        move |v: String| value.set(v)
    };

    Surface(
        Modifier::new().fill_max_size().background(theme().background),
        Column(Modifier::new().padding(24.0)).child((
            Text("MemoCounter")
                .size(20.0)
                .modifier(Modifier::new().padding(4.0)),
            Text(format!("expensive: {expensive}")).modifier(Modifier::new().padding(4.0)),
            Text(format!("{n}")).modifier(Modifier::new().padding(4.0)),
            Button("click", on_click).modifier(Modifier::new().padding(4.0)),
            Text(now.get().format_hms()).modifier(Modifier::new().padding(4.0)),
            TextField(VALUE_FIELD, "type something")
                .on_change(on_change)
                .modifier(
                    Modifier::new()
                        .size(220.0, 36.0)
                        .border(1.0, theme().outline, 6.0),
                ),
            Text(format!("typed: {}", value.get())).modifier(Modifier::new().padding(4.0)),
            memo_child("sum-child", ByIdentity, add, |add| SumChild(add.clone())),
        )),
    )
}

/// Rebuilt only when `add` is a different allocation, which happens exactly
/// when the parent's counter changed. Its button reports the callback's
/// result to diagnostics; nothing is displayed.
pub fn SumChild(add: Rc<dyn Fn() -> i64>) -> View {
    diagnostics().report("child render");

    let on_add = {
        let diag = diagnostics();
        move || diag.report(&format!("child sum: {}", add()))
    };

    Column(Modifier::new().padding(4.0)).child((
        Text("Child")
            .size(18.0)
            .modifier(Modifier::new().padding(4.0)),
        Button("add", on_add).modifier(Modifier::new().padding(4.0)),
    ))
}
