use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use super::{models::ParticipantRecord, repository::StatsRepository};

#[derive(Debug)]
enum PersistenceCommand {
    Put(ParticipantRecord),
    MarkProcessed(String),
    ClearAll,
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget writer in front of a [`StatsRepository`].
///
/// A single worker drains the queue in FIFO order, so writes for the same
/// participant reach the store in the order they were enqueued. Failures are
/// logged and dropped; the in-memory ledger stays authoritative.
pub struct PersistenceQueue {
    sender: mpsc::UnboundedSender<PersistenceCommand>,
}

impl PersistenceQueue {
    /// Spawns the worker task; must be called inside a tokio runtime.
    pub fn spawn(repository: Arc<dyn StatsRepository>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(repository, receiver));
        Self { sender }
    }

    pub fn put(&self, record: ParticipantRecord) {
        self.send(PersistenceCommand::Put(record));
    }

    pub fn mark_processed(&self, message_id: &str) {
        self.send(PersistenceCommand::MarkProcessed(message_id.to_string()));
    }

    pub fn clear_all(&self) {
        self.send(PersistenceCommand::ClearAll);
    }

    /// Waits until everything enqueued before this call has been attempted.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        self.send(PersistenceCommand::Flush(ack));
        if done.await.is_err() {
            warn!("Persistence worker stopped before flush completed");
        }
    }

    fn send(&self, command: PersistenceCommand) {
        if self.sender.send(command).is_err() {
            error!("Persistence worker is not running; write dropped");
        }
    }
}

async fn run_worker(
    repository: Arc<dyn StatsRepository>,
    mut receiver: mpsc::UnboundedReceiver<PersistenceCommand>,
) {
    while let Some(command) = receiver.recv().await {
        match command {
            PersistenceCommand::Put(record) => {
                if let Err(err) = repository.put_record(&record).await {
                    error!(?err, participant_id = %record.id, "Failed to persist participant record");
                }
            }
            PersistenceCommand::MarkProcessed(message_id) => {
                if let Err(err) = repository.mark_processed(&message_id).await {
                    error!(?err, message_id = %message_id, "Failed to persist processed message");
                }
            }
            PersistenceCommand::ClearAll => {
                if let Err(err) = repository.clear_all().await {
                    error!(?err, "Failed to clear persisted stats");
                }
            }
            PersistenceCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    debug!("Persistence worker stopped");
}
