//! Owner of the background tasks that belong to one view.
//!
//! Each view (dashboard, transaction page) runs its pollers as tasks spawned
//! here. [`Scheduler::reset`] aborts all of them and bumps the generation so
//! that events already queued by the old view can be recognised and dropped.

use std::future::Future;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the currently active view
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Spawn a task owned by the current view
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(tokio::spawn(fut));
    }

    /// Tear down the current view: abort every task and start a new generation
    pub fn reset(&mut self) -> u64 {
        self.abort_all();
        self.generation += 1;
        self.generation
    }

    /// Number of tasks that have not finished yet
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.abort_all();
    }
}
