//! Cancellable delayed tasks.
//!
//! The debounce timer is the only cancellable unit in the client. Production
//! code uses [`TokioScheduler`]; tests drive a [`ManualScheduler`] whose clock
//! only moves when told to.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed, unless the returned handle is cancelled first.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

/// Handle to a scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Timers on the tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

impl TokioScheduler {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => task(),
            }
        });

        TaskHandle::new(token)
    }
}

struct PendingTask {
    due: Duration,
    order: u64,
    token: CancellationToken,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_order: u64,
    pending: Vec<PendingTask>,
}

/// Virtual clock scheduler. Tasks run synchronously inside [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Tasks that are scheduled and not cancelled.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .pending
            .iter()
            .filter(|p| !p.token.is_cancelled())
            .count()
    }

    /// Move the clock forward, running every due task in deadline order.
    /// Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.state.lock();
                state.pending.retain(|p| !p.token.is_cancelled());

                let earliest = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.order))
                    .map(|(i, _)| i);

                earliest.map(|i| {
                    let task = state.pending.swap_remove(i);
                    state.now = task.due;
                    task
                })
            };

            // Run outside the lock so a task may schedule again.
            match next {
                Some(pending) => {
                    (pending.task)();
                    fired += 1;
                }
                None => break,
            }
        }

        self.state.lock().now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let token = CancellationToken::new();
        let mut state = self.state.lock();
        let order = state.next_order;
        state.next_order += 1;
        let due = state.now + delay;
        state.pending.push(PendingTask {
            due,
            order,
            token: token.clone(),
            task,
        });
        TaskHandle::new(token)
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}
