#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};
use futures::future::BoxFuture;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

use engine::{
    Engine, NewEventCmd, NewUserCmd, Notification, NotificationQueue, NotificationWorker,
    Notifier, NotifyResult, User,
};
use migration::MigratorTrait;

pub async fn connect() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = connect().await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Engine over a file database with a real connection pool, so transactions
/// can overlap. Keep the returned dir alive for the duration of the test.
pub async fn engine_with_pool(connections: u32) -> (Engine, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("kickabout.db").display());
    let mut options = ConnectOptions::new(url);
    options.max_connections(connections).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    (engine, dir)
}

/// Engine wired to a notification queue; run the worker after dropping the engine.
pub async fn engine_with_notifications() -> (Engine, NotificationWorker) {
    let db = connect().await;
    let (queue, worker) = NotificationQueue::channel(64);
    let engine = Engine::builder()
        .database(db)
        .notifications(queue)
        .build()
        .await
        .unwrap();
    (engine, worker)
}

#[derive(Default)]
pub struct Inbox {
    pub delivered: Mutex<Vec<Notification>>,
}

impl Notifier for Inbox {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, NotifyResult> {
        self.delivered.lock().unwrap().push(notification);
        Box::pin(async { Ok(()) })
    }
}

pub async fn drain(worker: NotificationWorker) -> Vec<Notification> {
    let inbox = Arc::new(Inbox::default());
    worker.run(inbox.clone()).await;
    let delivered = inbox.delivered.lock().unwrap().clone();
    delivered
}

pub async fn user(engine: &Engine, name: &str) -> User {
    engine
        .create_user(NewUserCmd::new(
            name,
            "Tester",
            format!("{name}@example.com"),
            "$argon2id$stub",
        ))
        .await
        .unwrap()
}

pub fn future_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, 1).unwrap()
}

pub fn kickoff() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 30, 0).unwrap()
}

pub fn open_event(host_id: i32, players: u32) -> NewEventCmd {
    NewEventCmd::new(host_id, "Five-a-side", "Riverside pitch", future_date(), kickoff(), players)
}

pub fn team_event(host_id: i32, team_one: u32, team_two: u32) -> NewEventCmd {
    open_event(host_id, team_one + team_two).teams(team_one, team_two, "red", "blue")
}
