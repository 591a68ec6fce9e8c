use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use cashshop_application::ops::spawn_reservation_sweeper;
use cashshop_domain::messages::{Message, Topic};
use cashshop_infrastructure::AppConfig;
use cashshop_interfaces_messaging::{run_consumer, INBOUND_TOPICS};

use crate::context::AppContext;
use crate::replay::{load_replay, replay};

pub async fn run_standalone(config: AppConfig, replay_path: Option<PathBuf>) -> Result<()> {
    let context = AppContext::new(&config)?;
    let records = match replay_path {
        Some(path) => load_replay(&path).await?,
        None => Vec::new(),
    };
    serve(context, records, shutdown_signal()).await
}

/// Runs consumers and the reservation sweeper until `shutdown` resolves.
pub async fn serve(
    context: AppContext,
    records: Vec<(Topic, Message)>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let state = context.state;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut workers = vec![spawn_reservation_sweeper(&state, shutdown_rx.clone())];
    for topic in INBOUND_TOPICS {
        let receiver = context.bus.subscribe(topic).await;
        workers.push(tokio::spawn(run_consumer(
            state.clone(),
            topic,
            receiver,
            shutdown_rx.clone(),
        )));
    }

    if !records.is_empty() {
        replay(context.bus.as_ref(), records).await?;
    }
    info!("cash shop ready");

    shutdown.await;
    info!("shutting down");
    let _ = shutdown_tx.send(true);
    for worker in workers {
        if let Err(err) = worker.await {
            warn!("worker ended abnormally: {}", err);
        }
    }

    info!("final metrics\n{}", state.metrics.render_prometheus());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use cashshop_infrastructure::InMemoryMessageBus;
    use crate::replay::parse_replay;
    use cashshop_domain::messages::CashShopStatusEvent;
    use cashshop_domain::ErrorCode;

    #[tokio::test]
    async fn replayed_commands_are_consumed_before_shutdown() {
        let bus = Arc::new(InMemoryMessageBus::default().with_journal());
        let context = AppContext::with_bus(&AppConfig::default(), bus.clone()).expect("context");
        let metrics = context.state.metrics.clone();
        let records = parse_replay(
            r#"{"topic":"EVENT_TOPIC_ACCOUNT_STATUS","key":"1","value":{"accountId":1,"status":"CREATED"}}
{"topic":"COMMAND_TOPIC_CASH_SHOP","key":"10","value":{"type":"PURCHASE","characterId":10,"body":{"currency":1,"serialNumber":20000001}}}"#,
        )
        .expect("records");

        let settled = {
            let bus = bus.clone();
            async move {
                while bus.published(Topic::WalletStatus).is_empty()
                    || bus.published(Topic::CashShopStatus).is_empty()
                {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(10), serve(context, records, settled))
            .await
            .expect("replay settled")
            .expect("serve");

        assert_eq!(bus.published(Topic::WalletStatus).len(), 1);
        // The empty in-memory directory knows no character 10.
        let events: Vec<CashShopStatusEvent> = bus
            .published(Topic::CashShopStatus)
            .iter()
            .map(|message| message.decode().expect("event"))
            .collect();
        assert_eq!(
            events,
            vec![CashShopStatusEvent::error(
                cashshop_domain::CharacterId(10),
                ErrorCode::UnknownError
            )]
        );
        assert_eq!(metrics.snapshot().workflow_errors, 1);
    }
}
