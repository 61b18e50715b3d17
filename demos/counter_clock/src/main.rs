use std::rc::Rc;

use counter_clock::CounterClock;
use reprise_host::Host;
use reprise_host::term::{OscTitle, TermBackend};
use web_time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = Host::new(CounterClock)
        .with_backend(Box::new(TermBackend::default()))
        .with_title_sink(Rc::new(OscTitle));
    host.mount();

    host.run_for(Duration::from_secs(2));
    host.click("click")?;
    host.click("click")?;
    host.run_for(Duration::from_secs(1));

    host.unmount();
    log::info!(
        "timers: scheduled={} cancelled={} active={}",
        host.timers().scheduled_total(),
        host.timers().cancelled_total(),
        host.timers().active()
    );
    Ok(())
}
