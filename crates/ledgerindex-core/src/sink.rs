//! Append-only event sink, one per domain.
//!
//! A sink owns its output file for the lifetime of the process. Records are
//! written synchronously, one JSON object per line, in the order `emit` is
//! called. Nothing is ever rewritten or truncated.
//!
//! Delivery is at-most-once: a record that fails to serialize or append is
//! logged and dropped, and block processing carries on.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{IndexerConfig, INDEXER_DIR};
use crate::context::ExecutionContext;
use crate::error::IndexerError;
use crate::event::{stamp, DomainEvent};

/// What happened to one `emit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The record was appended.
    Written,
    /// Non-committing execution; nothing was written or logged.
    Suppressed,
    /// Serialization or I/O failed, or the sink was closed; the record is lost.
    Dropped,
}

/// Counters for one sink since it was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkStats {
    pub written: u64,
    /// Emissions skipped because the execution was simulated.
    pub suppressed: u64,
    pub dropped: u64,
}

#[derive(Default)]
struct Counters {
    written: AtomicU64,
    suppressed: AtomicU64,
    dropped: AtomicU64,
}

/// Append-only JSON-lines stream for the payload type `E`.
///
/// `emit` takes `&self`; appends are serialized behind a mutex so concurrent
/// callers can never interleave partial records.
pub struct EventSink<E> {
    path: PathBuf,
    file: Mutex<Option<File>>,
    sync_on_emit: bool,
    counters: Counters,
    _event: PhantomData<fn(&E)>,
}

impl<E: DomainEvent> EventSink<E> {
    /// Open the stream for `E`'s domain as described by `config`.
    pub fn open(config: &IndexerConfig) -> Result<Self, IndexerError> {
        config.validate()?;
        let mut sink = Self::open_at(&config.home_dir, &config.file_name(E::DOMAIN))?;
        sink.sync_on_emit = config.sync_on_emit;
        Ok(sink)
    }

    /// Open `<base_dir>/indexer/<file_name>` for appending, creating the
    /// directory and the file if needed.
    pub fn open_at(base_dir: impl AsRef<Path>, file_name: &str) -> Result<Self, IndexerError> {
        let path = base_dir.as_ref().join(INDEXER_DIR).join(file_name);
        let open = |path: &Path| -> std::io::Result<File> {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            OpenOptions::new().create(true).append(true).open(path)
        };
        let file = open(&path).map_err(|source| IndexerError::OpenStream {
            path: path.clone(),
            source,
        })?;

        info!(domain = %E::DOMAIN, output = %path.display(), "opened event stream");

        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
            sync_on_emit: false,
            counters: Counters::default(),
            _event: PhantomData,
        })
    }

    /// Resolved output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record for `event`, stamped with `ctx`.
    ///
    /// Simulated executions are skipped without writing or logging anything.
    pub fn emit<C: ExecutionContext + ?Sized>(&self, ctx: &C, event: &E) -> EmitOutcome {
        if ctx.is_simulated() {
            self.counters.suppressed.fetch_add(1, Ordering::Relaxed);
            return EmitOutcome::Suppressed;
        }

        match self.append(ctx, event) {
            Ok(()) => {
                self.counters.written.fetch_add(1, Ordering::Relaxed);
                info!(
                    domain = %E::DOMAIN,
                    block_height = ctx.block_height(),
                    action = event.action(),
                    output = %self.path.display(),
                    event = ?event,
                    "exported event"
                );
                EmitOutcome::Written
            }
            Err(e) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    domain = %E::DOMAIN,
                    block_height = ctx.block_height(),
                    action = event.action(),
                    error = %e,
                    "dropped event"
                );
                EmitOutcome::Dropped
            }
        }
    }

    fn append<C: ExecutionContext + ?Sized>(&self, ctx: &C, event: &E) -> Result<(), IndexerError> {
        let mut line = serde_json::to_vec(&stamp(ctx, event))?;
        line.push(b'\n');

        let mut guard = self.lock();
        let file = guard.as_mut().ok_or_else(|| IndexerError::Closed {
            path: self.path.clone(),
        })?;
        let write = |file: &mut File| -> std::io::Result<()> {
            file.write_all(&line)?;
            file.flush()?;
            if self.sync_on_emit {
                file.sync_data()?;
            }
            Ok(())
        };
        write(file).map_err(|source| IndexerError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Flush and close the stream. Later calls are no-ops.
    pub fn close(&self) -> Result<(), IndexerError> {
        let Some(mut file) = self.lock().take() else {
            return Ok(());
        };
        file.flush()?;
        file.sync_all()?;
        info!(
            domain = %E::DOMAIN,
            output = %self.path.display(),
            written = self.counters.written.load(Ordering::Relaxed),
            "closed event stream"
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    pub fn stats(&self) -> SinkStats {
        SinkStats {
            written: self.counters.written.load(Ordering::Relaxed),
            suppressed: self.counters.suppressed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        // A panic mid-append cannot leave the handle itself inconsistent.
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<E> Drop for EventSink<E> {
    /// Best-effort flush of a stream that was never closed explicitly.
    fn drop(&mut self) {
        let file = self.file.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(file) = file.as_mut() {
            if let Err(e) = file.flush().and_then(|()| file.sync_data()) {
                warn!(output = %self.path.display(), error = %e, "flush on drop failed");
            }
        }
    }
}

impl<E> std::fmt::Debug for EventSink<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("path", &self.path)
            .field("sync_on_emit", &self.sync_on_emit)
            .finish()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
