//! Step-by-step draw loop
//!
//! The scheduler never sleeps and never spawns. It keeps a virtual clock and
//! at most one pending step; the host either moves the clock with
//! [`Scheduler::advance`] or fires a specific [`StepTicket`] when its own
//! timer expires. Any ticket that is not the current pending one is stale and
//! draws nothing, which is how pause, reset and a superseding start cancel a
//! step that was already scheduled.

use std::time::Duration;

use tracing::{debug, trace};

use crate::models::Module;
use crate::surface::{DrawingSurface, Palette};

/// Handle for one scheduled step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepTicket(u64);

/// The step waiting to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep {
    /// Ticket that fires this step
    pub ticket: StepTicket,
    /// Clock time at which it is due
    pub due: Duration,
}

/// Externally visible scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run in progress
    Idle,
    /// Drawing, with a step pending
    Running,
    /// Run suspended mid-way
    Paused,
    /// Every module drawn
    Completed,
}

// The pending step lives inside `Running`, so "a step is scheduled" and
// "the loop is running" cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running { pending: PendingStep },
    Paused,
    Completed,
}

/// Outcome of one step attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A module was drawn
    Drew {
        /// The module just drawn
        module: Module,
        /// Steps drawn so far, including this one
        current_step: usize,
        /// Length of the pattern
        total_steps: usize,
    },
    /// The run finished; reported once per run
    Completed {
        /// Length of the pattern
        total_steps: usize,
    },
    /// The ticket was cancelled or superseded; nothing happened
    Stale,
}

/// Steps drawn out of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Steps drawn
    pub current_step: usize,
    /// Pattern length
    pub total_steps: usize,
}

impl Progress {
    /// Completed fraction in `[0, 1]`; an empty pattern counts as done
    pub fn fraction(&self) -> f64 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.current_step as f64 / self.total_steps as f64
        }
    }

    /// Completed percentage, rounded
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}

/// Animation state machine over `Idle`, `Running`, `Paused`, `Completed`
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: RunState,
    pattern: Vec<Module>,
    current_step: usize,
    module_size: u32,
    palette: Palette,
    now: Duration,
    last_ticket: u64,
}

impl Scheduler {
    /// Create an idle scheduler drawing with `palette`
    pub fn new(palette: Palette) -> Self {
        Self {
            state: RunState::Idle,
            pattern: Vec::new(),
            current_step: 0,
            module_size: 0,
            palette,
            now: Duration::ZERO,
            last_ticket: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        match self.state {
            RunState::Idle => Phase::Idle,
            RunState::Running { .. } => Phase::Running,
            RunState::Paused => Phase::Paused,
            RunState::Completed => Phase::Completed,
        }
    }

    /// True while a run is live, paused or not
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. } | RunState::Paused)
    }

    /// True while paused
    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Steps drawn and total steps of the current pattern
    pub fn progress(&self) -> Progress {
        Progress {
            current_step: self.current_step,
            total_steps: self.pattern.len(),
        }
    }

    /// The order being drawn
    pub fn pattern(&self) -> &[Module] {
        &self.pattern
    }

    /// The scheduled step, if any
    pub fn pending(&self) -> Option<PendingStep> {
        match self.state {
            RunState::Running { pending } => Some(pending),
            _ => None,
        }
    }

    /// Virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Time until the pending step is due
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending().map(|p| p.due.saturating_sub(self.now))
    }

    /// Begin drawing `pattern`, replacing any previous run
    ///
    /// Whatever step was pending is dropped. The first step is attempted
    /// immediately, so the returned tick is either the first draw or, for an
    /// empty pattern, completion.
    pub fn start<S>(&mut self, pattern: Vec<Module>, module_size: u32, surface: &mut S, delay: Duration) -> Tick
    where
        S: DrawingSurface + ?Sized,
    {
        debug!(steps = pattern.len(), module_size, "starting animation");
        self.pattern = pattern;
        self.module_size = module_size;
        self.current_step = 0;
        self.state = RunState::Idle;
        self.step(surface, delay)
    }

    /// Suspend a running animation; no-op unless running
    pub fn pause(&mut self) -> bool {
        if let RunState::Running { pending } = self.state {
            debug!(step = self.current_step, ticket = pending.ticket.0, "pausing animation");
            self.state = RunState::Paused;
            true
        } else {
            false
        }
    }

    /// Continue a paused animation from the current step; no-op unless paused
    pub fn resume<S>(&mut self, surface: &mut S, delay: Duration) -> Option<Tick>
    where
        S: DrawingSurface + ?Sized,
    {
        if self.state != RunState::Paused {
            return None;
        }
        debug!(step = self.current_step, "resuming animation");
        Some(self.step(surface, delay))
    }

    /// Stop the loop, clear the surface and rewind to step 0
    pub fn reset<S>(&mut self, surface: &mut S)
    where
        S: DrawingSurface + ?Sized,
    {
        debug!(phase = ?self.phase(), step = self.current_step, "resetting animation");
        self.state = RunState::Idle;
        self.current_step = 0;
        surface.clear(self.palette.background);
    }

    /// Stop the loop, leaving what was drawn in place
    pub fn cancel(&mut self) -> bool {
        if self.is_running() {
            debug!(step = self.current_step, "cancelling animation");
            self.state = RunState::Idle;
            true
        } else {
            false
        }
    }

    /// Fire a scheduled step
    ///
    /// Only the current pending ticket draws; anything else is [`Tick::Stale`].
    pub fn fire<S>(&mut self, ticket: StepTicket, surface: &mut S, delay: Duration) -> Tick
    where
        S: DrawingSurface + ?Sized,
    {
        match self.state {
            RunState::Running { pending } if pending.ticket == ticket => {
                self.now = self.now.max(pending.due);
                self.step(surface, delay)
            }
            _ => {
                trace!(ticket = ticket.0, "ignoring stale step");
                Tick::Stale
            }
        }
    }

    /// Move the clock forward by `elapsed`, firing every step that falls due
    ///
    /// `delay` spaces out steps scheduled during this call.
    pub fn advance<S>(&mut self, elapsed: Duration, surface: &mut S, delay: Duration) -> Vec<Tick>
    where
        S: DrawingSurface + ?Sized,
    {
        let deadline = self.now.saturating_add(elapsed);
        let mut ticks = Vec::new();
        while let RunState::Running { pending } = self.state {
            if pending.due > deadline {
                break;
            }
            ticks.push(self.fire(pending.ticket, surface, delay));
        }
        self.now = deadline;
        ticks
    }

    fn step<S>(&mut self, surface: &mut S, delay: Duration) -> Tick
    where
        S: DrawingSurface + ?Sized,
    {
        let total_steps = self.pattern.len();
        if self.current_step >= total_steps {
            debug!(total_steps, "animation complete");
            self.state = RunState::Completed;
            return Tick::Completed { total_steps };
        }

        let module = self.pattern[self.current_step];
        surface.fill_rect(
            module.x,
            module.y,
            self.module_size,
            self.module_size,
            self.palette.foreground,
        );
        self.current_step += 1;

        self.last_ticket += 1;
        let pending = PendingStep {
            ticket: StepTicket(self.last_ticket),
            due: self.now.saturating_add(delay),
        };
        self.state = RunState::Running { pending };
        trace!(
            step = self.current_step,
            total_steps,
            row = module.row,
            col = module.col,
            "drew module"
        );

        Tick::Drew {
            module,
            current_step: self.current_step,
            total_steps,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CanvasSettings;
    use crate::surface::{BLACK, RecordingSurface, WHITE};

    const DELAY: Duration = Duration::from_millis(10);

    fn pattern(n: usize) -> Vec<Module> {
        let settings = CanvasSettings::new(2, n).unwrap();
        (0..n).map(|i| settings.module_at(i, i)).collect()
    }

    fn drawn(surface: &RecordingSurface) -> Vec<(u32, u32)> {
        surface.fills_of(BLACK)
    }

    fn positions(modules: &[Module]) -> Vec<(u32, u32)> {
        modules.iter().map(|m| (m.x, m.y)).collect()
    }

    #[test]
    fn test_start_draws_first_step_immediately() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        let modules = pattern(3);

        let tick = scheduler.start(modules.clone(), 2, &mut surface, DELAY);
        assert_eq!(
            tick,
            Tick::Drew {
                module: modules[0],
                current_step: 1,
                total_steps: 3
            }
        );
        assert_eq!(scheduler.phase(), Phase::Running);
        assert_eq!(scheduler.next_due_in(), Some(DELAY));
        assert_eq!(drawn(&surface), positions(&modules[..1]));
    }

    #[test]
    fn test_runs_to_completion_once() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        let modules = pattern(4);
        scheduler.start(modules.clone(), 2, &mut surface, DELAY);

        let ticks = scheduler.advance(Duration::from_secs(1), &mut surface, DELAY);
        let completions = ticks
            .iter()
            .filter(|t| matches!(t, Tick::Completed { total_steps: 4 }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(ticks.len(), 4); // three draws plus completion
        assert_eq!(scheduler.phase(), Phase::Completed);
        assert_eq!(scheduler.pending(), None);
        assert_eq!(drawn(&surface), positions(&modules));
        assert_eq!(drawn(&surface).len(), scheduler.progress().current_step);

        assert!(scheduler.advance(Duration::from_secs(1), &mut surface, DELAY).is_empty());
    }

    #[test]
    fn test_advance_respects_delay() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        scheduler.start(pattern(5), 2, &mut surface, DELAY);

        assert!(scheduler.advance(Duration::from_millis(9), &mut surface, DELAY).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1), &mut surface, DELAY).len(), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(25), &mut surface, DELAY).len(), 2);
        assert_eq!(scheduler.progress().current_step, 4);
        assert_eq!(scheduler.next_due_in(), Some(Duration::from_millis(5)));
    }

    #[test]
    fn test_delay_change_applies_to_next_step() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        scheduler.start(pattern(5), 2, &mut surface, DELAY);

        let slow = Duration::from_millis(100);
        scheduler.advance(DELAY, &mut surface, slow);
        assert_eq!(scheduler.next_due_in(), Some(slow));
    }

    #[test]
    fn test_pause_and_resume_continue_at_same_step() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        let modules = pattern(6);
        scheduler.start(modules.clone(), 2, &mut surface, DELAY);
        scheduler.advance(Duration::from_millis(20), &mut surface, DELAY);
        assert_eq!(scheduler.progress().current_step, 3);

        let ticket = scheduler.pending().unwrap().ticket;
        assert!(scheduler.pause());
        assert!(scheduler.is_paused() && scheduler.is_running());
        assert_eq!(scheduler.fire(ticket, &mut surface, DELAY), Tick::Stale);
        assert!(scheduler.advance(Duration::from_secs(5), &mut surface, DELAY).is_empty());
        assert_eq!(scheduler.progress().current_step, 3);

        let tick = scheduler.resume(&mut surface, DELAY).unwrap();
        assert!(matches!(tick, Tick::Drew { module, current_step: 4, .. } if module == modules[3]));
        assert_eq!(drawn(&surface), positions(&modules[..4]));
    }

    #[test]
    fn test_pause_resume_noops() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        assert!(!scheduler.pause());
        assert!(scheduler.resume(&mut surface, DELAY).is_none());

        scheduler.start(pattern(2), 2, &mut surface, DELAY);
        assert!(scheduler.resume(&mut surface, DELAY).is_none());
        assert!(scheduler.pause());
        assert!(!scheduler.pause());
        assert_eq!(scheduler.phase(), Phase::Paused);
    }

    #[test]
    fn test_reset_cancels_pending_step() {
        let mut surface = RecordingSurface::new();
        surface.resize(40, 40);
        let mut scheduler = Scheduler::default();
        scheduler.start(pattern(5), 2, &mut surface, DELAY);
        scheduler.advance(DELAY, &mut surface, DELAY);

        let ticket = scheduler.pending().unwrap().ticket;
        scheduler.reset(&mut surface);
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(scheduler.progress().current_step, 0);
        assert!(surface.fills_since_clear().is_empty());

        assert_eq!(scheduler.fire(ticket, &mut surface, DELAY), Tick::Stale);
        assert!(scheduler.advance(Duration::from_secs(1), &mut surface, DELAY).is_empty());
        assert!(surface.fills_since_clear().is_empty());
        assert_eq!(surface.fills_of(WHITE).len(), 1);
    }

    #[test]
    fn test_restart_supersedes_previous_run() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        scheduler.start(pattern(5), 2, &mut surface, DELAY);
        let old = scheduler.pending().unwrap().ticket;

        let next = pattern(2);
        scheduler.start(next.clone(), 2, &mut surface, DELAY);
        assert_eq!(scheduler.fire(old, &mut surface, DELAY), Tick::Stale);
        assert_eq!(scheduler.progress(), Progress { current_step: 1, total_steps: 2 });
    }

    #[test]
    fn test_cancel_keeps_drawing() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        scheduler.start(pattern(5), 2, &mut surface, DELAY);
        assert!(scheduler.cancel());
        assert!(!scheduler.cancel());
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(scheduler.progress().current_step, 1);
        assert_eq!(drawn(&surface).len(), 1);
    }

    #[test]
    fn test_empty_pattern_completes_immediately() {
        let mut surface = RecordingSurface::new();
        let mut scheduler = Scheduler::default();
        let tick = scheduler.start(Vec::new(), 2, &mut surface, DELAY);
        assert_eq!(tick, Tick::Completed { total_steps: 0 });
        assert_eq!(scheduler.phase(), Phase::Completed);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_progress_percent() {
        let progress = Progress {
            current_step: 1,
            total_steps: 3,
        };
        assert_eq!(progress.percent(), 33);
        assert_eq!(Progress::default().fraction(), 1.0);
    }
}
