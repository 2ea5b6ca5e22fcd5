//! Cooperative periodic scheduler.
//!
//! One pass walks the task table in order with a single `now` sample. A task
//! runs when its period has elapsed since its last start; period 0 runs on
//! every pass. Tasks never preempt each other, so a slow task only delays the
//! ones after it.

use crate::tick::{has_elapsed, Tick};

/// Task entry point. Receives the shared context and the pass timestamp.
pub type TaskFn<C> = fn(&mut C, Tick);

/// One row of the task table.
pub struct TaskEntry<C> {
    pub name: &'static str,
    pub run: TaskFn<C>,
    /// 0 = run on every pass
    pub period_ms: u32,
    last_run_ms: Tick,
    runs: u32,
}

impl<C> TaskEntry<C> {
    pub const fn new(name: &'static str, period_ms: u32, run: TaskFn<C>) -> Self {
        Self {
            name,
            run,
            period_ms,
            last_run_ms: 0,
            runs: 0,
        }
    }

    #[inline]
    pub fn is_due(&self, now: Tick) -> bool {
        self.period_ms == 0 || has_elapsed(now, self.last_run_ms, self.period_ms)
    }

    /// Tick at which the task last started.
    pub fn last_run_ms(&self) -> Tick {
        self.last_run_ms
    }

    /// Invocation count (wraps).
    pub fn runs(&self) -> u32 {
        self.runs
    }
}

/// Fixed task table.
pub struct Scheduler<C, const N: usize> {
    tasks: [TaskEntry<C>; N],
}

impl<C, const N: usize> Scheduler<C, N> {
    pub const fn new(tasks: [TaskEntry<C>; N]) -> Self {
        Self { tasks }
    }

    /// Run every due task once, in table order.
    ///
    /// `last_run_ms` is stamped before the call, so a task that overruns its
    /// period is still not re-entered within the same pass. Returns the
    /// number of tasks that ran.
    pub fn run_pass(&mut self, now: Tick, ctx: &mut C) -> usize {
        let mut ran = 0;

        for task in self.tasks.iter_mut() {
            if task.is_due(now) {
                task.last_run_ms = now;
                task.runs = task.runs.wrapping_add(1);
                (task.run)(ctx, now);
                ran += 1;
            }
        }

        ran
    }

    pub fn tasks(&self) -> &[TaskEntry<C>] {
        &self.tasks
    }

    pub fn find(&self, name: &str) -> Option<&TaskEntry<C>> {
        self.tasks.iter().find(|t| t.name == name)
    }
}
