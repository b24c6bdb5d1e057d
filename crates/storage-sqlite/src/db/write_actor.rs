//! Single-writer actor for the SQLite database.
//!
//! SQLite allows one writer at a time. Instead of letting pooled
//! connections contend for the write lock, all mutations are funneled
//! through one background task that owns a dedicated connection and
//! processes jobs serially, each inside an immediate transaction. The
//! serialization is also what makes multi-statement write jobs (such as
//! the snapshot lookup-then-write upsert) atomic with respect to each
//! other.

use std::any::Any;

use diesel::{Connection, SqliteConnection};
use tokio::sync::{mpsc, oneshot};

use stockfolio_core::errors::Result;

use super::DbPool;
use crate::errors::StorageError;

// A write job: runs against the actor's connection inside a transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

// Boxed return value; the concrete type is restored on the caller side.
type ErasedResult = Box<dyn Any + Send + 'static>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(Job<ErasedResult>, oneshot::Sender<Result<ErasedResult>>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction: either all of its
    /// statements commit or none do.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as ErasedResult)),
                ret_tx,
            ))
            .await
            .expect("Writer actor's receiving channel was closed, indicating the actor stopped.");

        ret_rx
            .await
            .expect("Writer actor dropped the reply sender without sending a result.")
            .map(|boxed: ErasedResult| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("Failed to downcast writer actor result."))
            })
    }
}

/// Spawns the background task that acts as the single writer.
///
/// The actor checks out one connection from the pool and holds it for its
/// whole lifetime; it terminates when the last [`WriteHandle`] is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) =
        mpsc::channel::<(Job<ErasedResult>, oneshot::Sender<Result<ErasedResult>>)>(1024);

    tokio::spawn(async move {
        let mut conn = pool.get().expect(
            "Failed to get a connection from the DB pool for the writer actor. \
             The pool might be exhausted or misconfigured.",
        );

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<ErasedResult> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // Ignore error if the receiver has dropped (e.g., the request
            // was cancelled).
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
