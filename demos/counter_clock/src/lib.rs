#![allow(non_snake_case)]
//! Counter-and-clock view: a remembered click counter, a 1 Hz clock signal,
//! and a window title that follows the count.


use reprise_core::prelude::*;
use reprise_ui::*;
use web_time::Duration;

pub fn CounterClock() -> View {
    let count = remember(|| signal(0i64));
    let now = clock_state(Duration::from_secs(1));

    side_effect(|| diagnostics().report("render"));
    window_title(format!("You clicked {} times", count.get()));

    let on_click = {
        let count = (*count).clone();
        move || count.update(|c| *c += 1)
    };

    Surface(
        Modifier::new().fill_max_size().background(theme().background),
        Column(Modifier::new().padding(24.0)).child((
            Text("CounterClock")
                .size(20.0)
                .modifier(Modifier::new().padding(4.0)),
            Text(format!("{}", count.get())).modifier(Modifier::new().padding(4.0)),
            Button("click", on_click).modifier(Modifier::new().padding(4.0)),
            Text(now.get().format_hms()).modifier(Modifier::new().padding(4.0)),
        )),
    )
}
