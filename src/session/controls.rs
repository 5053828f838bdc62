use crate::animator::{Phase, Scheduler};

/// Availability of each user action for the current scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// A new generation may be requested
    pub generate: bool,
    /// Pause/resume is meaningful
    pub pause: bool,
    /// There is something to reset
    pub reset: bool,
    /// There is a finished drawing to save
    pub save: bool,
    /// Label for the pause toggle
    pub pause_label: &'static str,
}

impl Controls {
    /// Derive control availability from the scheduler
    pub fn for_scheduler(scheduler: &Scheduler) -> Self {
        let running = scheduler.is_running();
        let paused = scheduler.is_paused();
        let drawn = scheduler.progress().current_step > 0;
        Self {
            generate: !(running && !paused),
            pause: running,
            reset: running || drawn,
            save: !running && drawn,
            pause_label: if paused { "Resume" } else { "Pause" },
        }
    }
}

pub(crate) fn status_line(scheduler: &Scheduler, module_count: Option<usize>) -> String {
    let progress = scheduler.progress();
    match scheduler.phase() {
        Phase::Paused => "Animation paused".to_string(),
        Phase::Completed => {
            let n = module_count.unwrap_or(0);
            format!(
                "Animation complete! QR code ({n}×{n}) with {} dark modules is ready to scan",
                progress.total_steps
            )
        }
        Phase::Idle if progress.current_step == 0 => "Ready to generate QR code".to_string(),
        Phase::Idle | Phase::Running => format!(
            "Drawing... {}/{} ({}%)",
            progress.current_step,
            progress.total_steps,
            progress.percent()
        ),
    }
}
