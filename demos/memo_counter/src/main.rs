use std::rc::Rc;

use memo_counter::MemoCounter;
use reprise_host::Host;
use reprise_host::term::{OscTitle, TermBackend};
use web_time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut host = Host::new(MemoCounter)
        .with_backend(Box::new(TermBackend::default()))
        .with_title_sink(Rc::new(OscTitle));
    host.mount();

    host.run_for(Duration::from_secs(1));
    host.click("click")?;
    host.click("click")?;
    host.focus("type something")?;
    host.type_str("memo")?;
    host.click("add")?;
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
