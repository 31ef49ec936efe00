//! Combat domain: cooperative timing primitives for boss routines.
//!
//! Routines are plain state machines advanced once per simulation tick. Every
//! suspension point is either a [`Wait`] (fixed duration) or a [`WaitUntil`]
//! (condition bounded by a timeout). A [`Scheduler`] owns the named routines
//! that are currently running and cancels them through their cleanup path.

use std::time::Duration;

/// A wait-for-duration suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    duration: Duration,
    elapsed: Duration,
}

impl Wait {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances the wait by `dt`.
    ///
    /// Returns the unused part of `dt` once the wait has finished, or `None`
    /// while it is still pending. A finished wait hands back all of `dt`.
    pub fn advance(&mut self, dt: Duration) -> Option<Duration> {
        let remaining = self.remaining();
        if dt >= remaining {
            self.elapsed = self.duration;
            Some(dt - remaining)
        } else {
            self.elapsed += dt;
            None
        }
    }
}

/// Result of polling a [`WaitUntil`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Pending,
    /// The condition held; carries the unused tick time.
    Ready(Duration),
    /// The timeout elapsed first; carries the unused tick time.
    TimedOut(Duration),
}

/// A wait-for-condition suspension point. Never blocks longer than its timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitUntil {
    timeout: Wait,
}

impl WaitUntil {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: Wait::new(timeout),
        }
    }

    pub fn poll(&mut self, condition: bool, dt: Duration) -> Poll {
        if condition {
            return Poll::Ready(dt);
        }
        match self.timeout.advance(dt) {
            Some(leftover) => Poll::TimedOut(leftover),
            None => Poll::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Finished,
}

/// A resumable timed sequence driven by a [`Scheduler`].
pub trait Routine<C> {
    /// Runs the routine until its next suspension point.
    fn resume(&mut self, cx: &mut C, dt: Duration) -> Progress;

    /// Cleanup executed when the routine is cancelled before finishing.
    fn cleanup(&mut self, _cx: &mut C) {}
}

#[derive(Debug)]
struct Task<R> {
    name: &'static str,
    routine: R,
}

/// Single-threaded owner of the named routines of one boss.
///
/// Routines resume in start order. Cancellation runs the routine's cleanup
/// before returning, so a replacement started right after never overlaps the
/// routine it replaces.
#[derive(Debug)]
pub struct Scheduler<R> {
    tasks: Vec<Task<R>>,
}

impl<R> Default for Scheduler<R> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<R> Scheduler<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.iter().map(|t| t.name)
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.tasks
            .iter()
            .find(|t| t.name == name)
            .map(|t| &t.routine)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut R> {
        self.tasks
            .iter_mut()
            .find(|t| t.name == name)
            .map(|t| &mut t.routine)
    }

    /// Starts `routine` under `name`, cancelling any routine already running
    /// under that name first.
    pub fn start<C>(&mut self, name: &'static str, routine: R, cx: &mut C)
    where
        R: Routine<C>,
    {
        self.cancel(name, cx);
        self.tasks.push(Task { name, routine });
    }

    /// Cancels the routine running under `name` and waits for its cleanup.
    /// Returns false when nothing was running.
    pub fn cancel<C>(&mut self, name: &str, cx: &mut C) -> bool
    where
        R: Routine<C>,
    {
        let Some(index) = self.tasks.iter().position(|t| t.name == name) else {
            return false;
        };
        let mut task = self.tasks.remove(index);
        task.routine.cleanup(cx);
        true
    }

    pub fn cancel_all<C>(&mut self, cx: &mut C)
    where
        R: Routine<C>,
    {
        for mut task in self.tasks.drain(..) {
            task.routine.cleanup(cx);
        }
    }

    /// Resumes every routine once; finished routines are dropped.
    pub fn tick<C>(&mut self, cx: &mut C, dt: Duration)
    where
        R: Routine<C>,
    {
        self.tasks
            .retain_mut(|task| task.routine.resume(cx, dt) == Progress::Running);
    }
}
