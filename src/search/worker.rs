//! Dedicated worker thread for background searches.
//!
//! One search runs at a time; excess jobs queue in submission order. The
//! pool owns a single named OS thread that drains a job channel and exits
//! when the pool is dropped.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};
use log::debug;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Single-threaded executor for search jobs.
pub struct SearchPool {
    tx: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl SearchPool {
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<Job>();
        let handle = thread::Builder::new()
            .name("marga-search".into())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
                debug!("Search worker shutting down");
            })
            .expect("Failed to spawn search worker thread");

        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue a job for execution on the worker thread.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(tx) = &self.tx {
            // Send only fails after shutdown has begun; the job is dropped.
            let _ = tx.send(Box::new(job));
        }
    }
}

impl Default for SearchPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SearchPool {
    fn drop(&mut self) {
        // Disconnect the channel so the worker's recv() returns, then join.
        // When the pool itself is dropped from a job on the worker thread,
        // skip the join; the disconnected channel ends the thread anyway.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}
