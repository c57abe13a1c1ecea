use std::{net::SocketAddr, sync::Arc, time::Duration};

use engine::{Currency, NotificationQueue, Notifier, Sweeper};
use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;
use server::{ExpoNotifier, StripeGateway};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "kickabout={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect_database(&settings.database).await?;
    let http = reqwest::Client::new();
    let mut builder = engine::Engine::builder().database(db);

    match settings.payments {
        Some(payments) => {
            tracing::info!("Found payment settings...");
            let currency = Currency::try_from(payments.currency.as_str())?;
            let gateway = StripeGateway::new(http.clone(), payments.secret_key, payments.api_base);
            builder = builder.payments(Arc::new(gateway)).currency(currency);
        }
        None => tracing::info!("payments not configured; payment sheets are disabled"),
    }

    match settings.notifications {
        Some(notifications) => {
            tracing::info!("Found notification settings...");
            let (queue, worker) = NotificationQueue::channel(notifications.queue_size);
            let notifier: Arc<dyn Notifier> =
                Arc::new(ExpoNotifier::new(http.clone(), notifications.endpoint));
            builder = builder.notifications(queue);
            tasks.spawn(worker.run(notifier));
        }
        None => tracing::info!("notifications not configured; messages will be dropped"),
    }

    let engine = Arc::new(builder.build().await?);

    let period = Duration::from_secs(settings.sweeper.interval_secs.max(1));
    tasks.spawn(Sweeper::new(engine.clone(), period).run());

    let addr: SocketAddr = format!("{}:{}", settings.server.bind, settings.server.port).parse()?;
    tasks.spawn(server::run(engine, addr));

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let mut options = ConnectOptions::new(config.url.clone());
    options.max_connections(config.max_connections.max(1));

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
