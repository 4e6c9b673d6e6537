//! Background worker thread — all backend I/O runs here.
//!
//! The worker owns the result source. The main thread owns the store and
//! applies whatever comes back, so the store never crosses threads.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use quantdash_core::{BacktestTask, ResultSource, SourceError};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Fetch the task list once.
    Refresh,
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Refreshed(Result<Vec<BacktestTask>, SourceError>),
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    source: Box<dyn ResultSource>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("quantdash-worker".into())
        .spawn(move || worker_loop(source.as_ref(), rx, tx))
}

fn worker_loop(source: &dyn ResultSource, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Refresh) => {
                let fetched = source.list_tasks();
                match &fetched {
                    Ok(tasks) => log::debug!("{}: listed {} tasks", source.name(), tasks.len()),
                    Err(err) => log::debug!("{}: listing failed: {err}", source.name()),
                }
                if tx.send(WorkerResponse::Refreshed(fetched)).is_err() {
                    // UI has gone away.
                    break;
                }
            }
        }
    }
    log::debug!("worker exiting");
}
