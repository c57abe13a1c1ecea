//! Best-effort participant notifications.
//!
//! Operations never deliver notifications themselves: after their
//! transaction commits they push a [`Notification`] onto a bounded queue and
//! return. A [`NotificationWorker`] drains the queue in its own task and hands
//! each message to the configured [`Notifier`]. Delivery failures are logged
//! and dropped; they never reach the caller of join/leave/cancel.

use std::{error::Error, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::mpsc::{self, error::TrySendError};

/// A message for one destination address (push token).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub address: String,
    pub title: String,
    pub body: String,
}

pub type NotifyResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Delivery collaborator (push service, mail, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, NotifyResult>;
}

/// Producer side, cloned into the engine.
#[derive(Clone, Debug)]
pub struct NotificationQueue {
    tx: mpsc::Sender<Notification>,
}

impl NotificationQueue {
    /// Create a queue holding at most `capacity` undelivered messages.
    pub fn channel(capacity: usize) -> (Self, NotificationWorker) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, NotificationWorker { rx })
    }

    /// Enqueue without waiting. A full or closed queue drops the message.
    pub fn push(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(address = %dropped.address, "notification queue full; dropping message");
            }
            Err(TrySendError::Closed(dropped)) => {
                tracing::warn!(address = %dropped.address, "notification worker stopped; dropping message");
            }
        }
    }
}

pub struct NotificationWorker {
    rx: mpsc::Receiver<Notification>,
}

impl NotificationWorker {
    /// Deliver queued messages until every [`NotificationQueue`] is dropped.
    pub async fn run(mut self, notifier: Arc<dyn Notifier>) {
        while let Some(notification) = self.rx.recv().await {
            let address = notification.address.clone();
            match notifier.notify(notification).await {
                Ok(()) => tracing::debug!(%address, "notification delivered"),
                Err(err) => tracing::warn!(%address, "notification delivery failed: {err}"),
            }
        }
        tracing::debug!("notification queue closed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) -> BoxFuture<'static, NotifyResult> {
            let fail = notification.address == "broken";
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(notification.address);
            }
            Box::pin(async move {
                if fail {
                    return Err("unreachable device".into());
                }
                Ok(())
            })
        }
    }

    fn message(address: &str) -> Notification {
        Notification {
            address: address.to_string(),
            title: "Kickabout".to_string(),
            body: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn worker_keeps_going_after_a_failure() {
        let recorder = Arc::new(Recorder::default());
        let (queue, worker) = NotificationQueue::channel(8);
        queue.push(message("broken"));
        queue.push(message("ok"));
        drop(queue);

        worker.run(recorder.clone()).await;
        assert_eq!(*recorder.seen.lock().unwrap(), vec!["broken", "ok"]);
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let recorder = Arc::new(Recorder::default());
        let (queue, worker) = NotificationQueue::channel(1);
        queue.push(message("first"));
        queue.push(message("second"));
        drop(queue);

        worker.run(recorder.clone()).await;
        assert_eq!(*recorder.seen.lock().unwrap(), vec!["first"]);
    }
}
