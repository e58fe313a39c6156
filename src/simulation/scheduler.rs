//! Threaded stepping: one worker thread per body.
//!
//! Each step runs a four-phase handshake between the coordinator (the
//! calling thread) and the workers:
//!
//! 1. **compute-ready**: the coordinator sends every worker the same frozen
//!    snapshot of positions and masses
//! 2. **compute**: each worker evaluates the full row for its own body
//!    (both halves of every pair, so no worker writes shared state) and
//!    reports the acceleration
//! 3. **compute-done**: the coordinator waits for all `n` reports
//! 4. **integrate**: the coordinator applies the position/velocity update to
//!    every body, then releases the workers for the next step
//!
//! All waits block on channels; nothing spins. A worker that exits early or
//! panics, or a barrier that is not reached within
//! [`RunConfig::barrier_timeout`], aborts the run: the remaining workers are
//! shut down and joined before the error is returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, error, info, trace};

use crate::error::{SimError, SimResult};

use super::forces::NewtonianGravity;
use super::params::DEFAULT_BARRIER_TIMEOUT;
use super::states::PointMass;
use super::system::System;
use super::vector::Vector3;

/// Run settings handed to the scheduler up front and never mutated while
/// workers are alive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub dt: f64, // step size
    pub steps: u64, // number of steps
    pub barrier_timeout: Duration, // max wait at any barrier
}

impl RunConfig {
    pub fn new(dt: f64, steps: u64) -> Self {
        Self {
            dt,
            steps,
            barrier_timeout: DEFAULT_BARRIER_TIMEOUT,
        }
    }

    pub fn with_barrier_timeout(mut self, timeout: Duration) -> Self {
        self.barrier_timeout = timeout;
        self
    }
}

/// Lifecycle of one worker as seen by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Spawned,
    WaitingForWork,
    Computing,
    Reported,
    Joined,
}

/// Outcome of a threaded run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps_completed: u64,
    pub elapsed: Duration, // wall time of the stepping loop
    pub cancelled: bool, // stopped early through the cancel flag
    pub worker_states: Vec<WorkerState>, // final state per worker
}

enum Command {
    Compute(Arc<[PointMass]>),
    Shutdown,
}

enum Event {
    Ready(usize),
    Reported(usize, Vector3),
    Exited(usize),
}

/// Sends `Exited` when the worker leaves its loop for any reason,
/// including a panic
struct ExitGuard {
    index: usize,
    events: Sender<Event>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let _ = self.events.send(Event::Exited(self.index));
    }
}

struct Worker<'scope> {
    commands: Option<Sender<Command>>, // None once shutdown was requested
    handle: Option<ScopedJoinHandle<'scope, ()>>,
    state: WorkerState,
}

fn worker_loop(index: usize, gravity: NewtonianGravity, commands: Receiver<Command>, events: Sender<Event>) {
    let _guard = ExitGuard {
        index,
        events: events.clone(),
    };
    if events.send(Event::Ready(index)).is_err() {
        return;
    }

    // WaitingForWork until a command arrives; a closed channel means shutdown
    while let Ok(Command::Compute(snapshot)) = commands.recv() {
        let acc = gravity.row_accel(index, &snapshot);
        if events.send(Event::Reported(index, acc)).is_err() {
            break;
        }
    }
}

/// Steps a [`System`] with one worker thread per body.
#[derive(Debug, Clone)]
pub struct ParallelStepScheduler {
    config: RunConfig,
}

impl ParallelStepScheduler {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run all configured steps
    pub fn run(&self, system: &mut System) -> SimResult<RunReport> {
        let never = AtomicBool::new(false);
        self.run_with_cancel(system, &never)
    }

    /// Run until all configured steps are done or `cancel` is set.
    ///
    /// `cancel` is only observed between steps, when every worker is
    /// waiting for work, so a cancelled run leaves the system at a step
    /// boundary.
    pub fn run_with_cancel(&self, system: &mut System, cancel: &AtomicBool) -> SimResult<RunReport> {
        let n = system.len();
        let gravity = system.gravity();

        thread::scope(|scope| -> SimResult<RunReport> {
            let (event_tx, event_rx) = crossbeam_channel::unbounded::<Event>();
            let mut workers: Vec<Worker<'_>> = Vec::with_capacity(n);

            for index in 0..n {
                let (cmd_tx, cmd_rx) = crossbeam_channel::bounded::<Command>(1);
                let events = event_tx.clone();
                let handle = thread::Builder::new()
                    .name(format!("orbsim-body-{index}"))
                    .spawn_scoped(scope, move || worker_loop(index, gravity, cmd_rx, events))?;
                workers.push(Worker {
                    commands: Some(cmd_tx),
                    handle: Some(handle),
                    state: WorkerState::Spawned,
                });
            }
            // only workers hold senders from here on
            drop(event_tx);
            debug!(workers = n, "spawned step workers");

            let start = Instant::now();
            let outcome = self.coordinate(system, &mut workers, &event_rx, cancel);
            let elapsed = start.elapsed();

            let joined = shutdown(&mut workers);
            let worker_states = workers.iter().map(|w| w.state).collect();

            match (outcome, joined) {
                (Ok((steps_completed, cancelled)), Ok(())) => {
                    info!(steps = steps_completed, ?elapsed, cancelled, "threaded run finished");
                    Ok(RunReport {
                        steps_completed,
                        elapsed,
                        cancelled,
                        worker_states,
                    })
                }
                (Err(e), _) | (Ok(_), Err(e)) => {
                    error!(error = %e, "threaded run aborted");
                    Err(e)
                }
            }
        })
    }

    /// The per-step handshake. Returns `(steps_completed, cancelled)`.
    fn coordinate(
        &self,
        system: &mut System,
        workers: &mut [Worker<'_>],
        events: &Receiver<Event>,
        cancel: &AtomicBool,
    ) -> SimResult<(u64, bool)> {
        let n = workers.len();
        let timeout = self.config.barrier_timeout;

        // startup: every worker is alive and waiting
        let mut ready = 0;
        while ready < n {
            match self.next_event(events, "startup", workers)? {
                Event::Ready(i) => {
                    workers[i].state = WorkerState::WaitingForWork;
                    ready += 1;
                }
                Event::Exited(i) => return Err(SimError::WorkerLost { index: i }),
                Event::Reported(i, _) => return Err(SimError::WorkerLost { index: i }),
            }
        }

        let mut accels = vec![Vector3::zeros(); n];
        for done in 0..self.config.steps {
            // step boundary: every worker is WaitingForWork
            if cancel.load(Ordering::Acquire) {
                debug!(step = done, "cancel requested");
                return Ok((done, true));
            }

            // compute-ready
            let snapshot: Arc<[PointMass]> = system.snapshot().into();
            for (i, w) in workers.iter_mut().enumerate() {
                let lost = || SimError::WorkerLost { index: i };
                w.commands
                    .as_ref()
                    .ok_or_else(lost)?
                    .send_timeout(Command::Compute(Arc::clone(&snapshot)), timeout)
                    .map_err(|_| lost())?;
                w.state = WorkerState::Computing;
            }

            // compute-done
            let mut reported = 0;
            while reported < n {
                match self.next_event(events, "compute-done", workers)? {
                    Event::Reported(i, acc) => {
                        accels[i] = acc;
                        workers[i].state = WorkerState::Reported;
                        reported += 1;
                    }
                    Event::Exited(i) => return Err(SimError::WorkerLost { index: i }),
                    Event::Ready(_) => {}
                }
            }

            // integrate; workers are idle so nobody reads positions now
            system.finish_step(&accels, self.config.dt);

            // step-done
            for w in workers.iter_mut() {
                w.state = WorkerState::WaitingForWork;
            }
            trace!(step = done + 1, "threaded step done");
        }

        Ok((self.config.steps, false))
    }

    fn next_event(&self, events: &Receiver<Event>, phase: &'static str, workers: &[Worker<'_>]) -> SimResult<Event> {
        let timeout = self.config.barrier_timeout;
        events.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => SimError::BarrierTimeout { phase, waited: timeout },
            // every worker sender is gone; blame the first one the barrier
            // is still waiting on
            RecvTimeoutError::Disconnected => SimError::WorkerLost {
                index: first_pending(workers),
            },
        })
    }
}

/// First worker that has not reached the current barrier
fn first_pending(workers: &[Worker<'_>]) -> usize {
    workers
        .iter()
        .position(|w| matches!(w.state, WorkerState::Spawned | WorkerState::Computing))
        .unwrap_or(0)
}

/// Ask every worker to stop and join it. A worker still computing finishes
/// its row first, since commands are only read between rows.
fn shutdown(workers: &mut [Worker<'_>]) -> SimResult<()> {
    for w in workers.iter_mut() {
        if let Some(commands) = w.commands.take() {
            // a full channel holds an unread command; dropping the sender
            // still ends the worker loop once that command is consumed
            let _ = commands.try_send(Command::Shutdown);
        }
    }

    let mut result = Ok(());
    for (index, w) in workers.iter_mut().enumerate() {
        if let Some(handle) = w.handle.take() {
            if handle.join().is_err() && result.is_ok() {
                result = Err(SimError::WorkerLost { index });
            }
        }
        w.state = WorkerState::Joined;
    }
    result
}
