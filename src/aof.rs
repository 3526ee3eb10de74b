use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{self, Duration};
use tokio_util::codec::FramedRead;
use tracing::{error, info};

use crate::codec::FrameCodec;
use crate::commands::Command;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// How often buffered writes are forced to stable storage. A crash loses at
/// most one period's worth of appends.
const SYNC_PERIOD: Duration = Duration::from_secs(1);

/// The append-only file: every accepted mutating command is re-encoded as a
/// request array and appended, in the exact byte format of the live wire
/// protocol. At startup the log is decoded record by record and re-executed
/// to reconstruct the store.
///
/// The handle is cheap to clone; append, sync and replay all serialize on
/// one file lock, so concurrent writers' records never interleave.
#[derive(Clone)]
pub struct Aof {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl Aof {
    /// Opens (creating if needed) the log at `path` and starts the periodic
    /// sync task. Failing to open the log is fatal: the server must not
    /// accept writes it cannot make durable.
    pub async fn open(path: impl AsRef<Path>) -> Result<Aof, Error> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let aof = Aof {
            file: Arc::new(Mutex::new(file)),
            path,
        };

        tokio::spawn({
            let file = aof.file.clone();
            async move {
                let mut ticker = time::interval(SYNC_PERIOD);
                loop {
                    ticker.tick().await;
                    let file = file.lock().await;
                    if let Err(e) = file.sync_data().await {
                        error!("Failed to sync append-only file: {}", e);
                    }
                }
            }
        });

        Ok(aof)
    }

    /// Takes the log lock. A writer that executes its mutation while
    /// holding this lock and then appends through the guard gets its record
    /// into the log in the same order its write became visible; no other
    /// writer can mutate and append in between.
    pub async fn lock(&self) -> AppendLock<'_> {
        AppendLock {
            file: self.file.lock().await,
        }
    }

    /// Appends one request frame to the log. Durability is deferred to the
    /// periodic sync; the in-memory mutation has already committed by the
    /// time this runs, so a failure here is a durability concern for the
    /// operator, not a correctness rollback.
    pub async fn append(&self, frame: &Frame) -> Result<(), Error> {
        self.lock().await.append(frame).await
    }

    /// Decodes the log from the beginning and re-executes every record
    /// against `store`, without re-appending and without producing client
    /// output. Runs before the listener starts. A record that fails to
    /// decode or parse is a fatal startup error; a corrupt tail is never
    /// silently truncated.
    ///
    /// Relative TTLs are recomputed against the current clock, so a key
    /// logged with `EX 100` gets a fresh 100 seconds on every replay. The
    /// log stays byte-identical to live requests in exchange.
    pub async fn replay(&self, store: &Store) -> Result<u64, Error> {
        // Replay holds the same lock as append and sync.
        let _file = self.file.lock().await;

        let reader = File::open(&self.path).await?;
        let mut frames = FramedRead::new(reader, FrameCodec);

        let mut count = 0;
        while let Some(frame) = frames.next().await {
            let command = Command::try_from(frame?)?;
            command.exec(store.clone()).await?;
            count += 1;
        }

        info!("Replayed {} commands from {}", count, self.path.display());
        Ok(count)
    }

    /// Forces everything written so far to stable storage. Called on
    /// shutdown; the periodic task covers steady state.
    pub async fn sync(&self) -> Result<(), Error> {
        let file = self.file.lock().await;
        file.sync_all().await?;
        Ok(())
    }
}

/// Exclusive hold on the log, spanning a mutate-then-append sequence.
pub struct AppendLock<'a> {
    file: MutexGuard<'a, File>,
}

impl AppendLock<'_> {
    pub async fn append(&mut self, frame: &Frame) -> Result<(), Error> {
        self.file.write_all(&frame.serialize()).await?;
        Ok(())
    }
}
