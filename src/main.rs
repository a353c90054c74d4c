mod telemetry;

use pillbox_engine::Scheduler;
use pillbox_infra::{setup_context, ISys, InMemoryNotifier};
use std::sync::Arc;
use std::time::Duration;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("pillbox".into(), "info".into());
    init_subscriber(subscriber);

    let notifier = Arc::new(InMemoryNotifier::new());
    let context = setup_context(notifier.clone())?;

    // Stand-in delivery loop until a platform notifier is wired in: fires
    // pending requests whose instant has passed, on the context's clock
    let delivery_loop = tokio::spawn({
        let notifier = notifier.clone();
        let sys = context.sys.clone();
        async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            loop {
                tick.tick().await;
                for id in notifier.deliver_due(sys.now()) {
                    info!("Notification {} fired", id);
                }
            }
        }
    });

    let scheduler = Scheduler::start(context);
    tokio::signal::ctrl_c().await?;
    scheduler.stop();
    delivery_loop.abort();
    Ok(())
}
