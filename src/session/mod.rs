//! Session controller
//!
//! A [`Session`] owns one encoder, one drawing surface and the scheduler
//! state for the current generation. Every `generate` call replaces the
//! previous run wholesale; failures leave it untouched.

mod controls;

pub use controls::Controls;

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::animator::{
    AnimationMode, Phase, Progress, Scheduler, StepTicket, Tick, extract_modules, generate_pattern,
};
use crate::config;
use crate::encoder::{AUTO_VERSION, EncodeError, QrEncoder};
use crate::error::{Error, ErrorKind, Result, SaveError};
use crate::models::{CanvasSettings, ECLevel, MAX_MODULE_SIZE, Version};
use crate::surface::{DrawingSurface, Palette};

/// File name used when saving without an explicit path
pub const DEFAULT_FILE_NAME: &str = "animated-qr-code.png";

/// Parameters for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Text to encode; surrounding whitespace is ignored
    pub text: String,
    /// Reveal order
    pub mode: AnimationMode,
    /// Error correction level
    pub level: ECLevel,
    /// Module side in pixels
    pub module_size: u32,
    /// Pause between steps
    pub delay: Duration,
}

impl GenerateRequest {
    /// Request for `text` with the configured defaults
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: config::default_mode(),
            level: config::default_ec_level(),
            module_size: config::default_module_size(),
            delay: config::default_delay(),
        }
    }

    /// Set the reveal order
    pub fn mode(mut self, mode: AnimationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the error correction level
    pub fn level(mut self, level: ECLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the module size in pixels
    pub fn module_size(mut self, module_size: u32) -> Self {
        self.module_size = module_size;
        self
    }

    /// Set the pause between steps
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Summary of a successful generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    /// Canvas geometry
    pub settings: CanvasSettings,
    /// Version picked by the encoder
    pub version: Version,
    /// Error correction level used
    pub level: ECLevel,
    /// Reveal order used
    pub mode: AnimationMode,
    /// Number of dark modules, which is the number of steps
    pub dark_modules: usize,
}

/// Notification produced by a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A step was drawn
    Progress(Progress),
    /// Every module was drawn; sent once per run
    Completed {
        /// Side of the symbol in modules
        module_count: usize,
        /// Steps drawn
        total_steps: usize,
    },
    /// A request failed
    Error {
        /// Error category
        kind: ErrorKind,
        /// User-facing message
        message: String,
    },
}

/// Orchestrates encode, extract, order and animate for one user
pub struct Session<E, S> {
    encoder: E,
    surface: S,
    palette: Palette,
    scheduler: Scheduler,
    generation: Option<Generation>,
    delay: Duration,
    events: Vec<SessionEvent>,
}

impl<E: QrEncoder, S: DrawingSurface> Session<E, S> {
    /// Create a session with the default black-on-white palette
    pub fn new(encoder: E, surface: S) -> Self {
        Self::with_palette(encoder, surface, Palette::default())
    }

    /// Create a session with custom colors
    pub fn with_palette(encoder: E, surface: S, palette: Palette) -> Self {
        Self {
            encoder,
            surface,
            palette,
            scheduler: Scheduler::new(palette),
            generation: None,
            delay: config::default_delay(),
            events: Vec::new(),
        }
    }

    /// Encode `request.text` and start revealing it
    ///
    /// Any run in progress is stopped first, but only once encoding has
    /// succeeded: a rejected request leaves the previous animation as it was.
    pub fn generate(&mut self, request: &GenerateRequest) -> Result<Generation> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(self.fail(Error::EmptyInput));
        }
        if !(1..=MAX_MODULE_SIZE).contains(&request.module_size) {
            return Err(self.fail(Error::InvalidModuleSize(request.module_size)));
        }

        let symbol = match self.encoder.encode(text, AUTO_VERSION, request.level) {
            Ok(symbol) => symbol,
            Err(err) => return Err(self.fail(err.into())),
        };
        // Module size is already in range, so only an empty symbol is left
        let Some(settings) = CanvasSettings::new(request.module_size, symbol.module_count()) else {
            let err = EncodeError::Internal("encoder returned an empty symbol".into());
            return Err(self.fail(err.into()));
        };

        self.scheduler.cancel();
        self.surface.resize(settings.total_size, settings.total_size);
        self.surface.clear(self.palette.background);

        let modules = extract_modules(&symbol.modules, &settings);
        let pattern = generate_pattern(&modules, request.mode, settings.module_count);

        let generation = Generation {
            settings,
            version: symbol.version,
            level: symbol.error_correction,
            mode: request.mode,
            dark_modules: modules.len(),
        };
        info!(
            version = generation.version.number(),
            level = %generation.level,
            mode = %generation.mode,
            dark_modules = generation.dark_modules,
            canvas = settings.total_size,
            "generated QR code"
        );

        self.generation = Some(generation);
        self.delay = request.delay;
        let tick = self
            .scheduler
            .start(pattern, settings.module_size, &mut self.surface, self.delay);
        self.record(tick);
        Ok(generation)
    }

    /// Suspend the animation; no-op unless running
    pub fn pause(&mut self) -> bool {
        self.scheduler.pause()
    }

    /// Continue a paused animation; no-op unless paused
    pub fn resume(&mut self) -> bool {
        match self.scheduler.resume(&mut self.surface, self.delay) {
            Some(tick) => {
                self.record(tick);
                true
            }
            None => false,
        }
    }

    /// Pause if running, resume if paused; returns whether now paused
    pub fn toggle_pause(&mut self) -> bool {
        if self.scheduler.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.scheduler.is_paused()
    }

    /// Stop, clear the canvas and forget the current generation
    pub fn reset(&mut self) {
        self.scheduler.reset(&mut self.surface);
        self.generation = None;
    }

    /// Change the pause between steps; applies from the next scheduled step
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Current pause between steps
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Move the animation clock forward, drawing every step that falls due
    ///
    /// Returns the number of modules drawn.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let ticks = self.scheduler.advance(elapsed, &mut self.surface, self.delay);
        let mut drawn = 0;
        for tick in ticks {
            if matches!(tick, Tick::Drew { .. }) {
                drawn += 1;
            }
            self.record(tick);
        }
        drawn
    }

    /// Fire one scheduled step by ticket; stale tickets do nothing
    pub fn fire(&mut self, ticket: StepTicket) -> Tick {
        let tick = self.scheduler.fire(ticket, &mut self.surface, self.delay);
        self.record(tick);
        tick
    }

    /// Ticket of the step waiting to fire
    pub fn pending_ticket(&self) -> Option<StepTicket> {
        self.scheduler.pending().map(|p| p.ticket)
    }

    /// Time until the next step is due
    pub fn next_due_in(&self) -> Option<Duration> {
        self.scheduler.next_due_in()
    }

    /// Export the canvas as PNG bytes
    pub fn save(&mut self) -> Result<Vec<u8>> {
        if self.scheduler.progress().current_step == 0 {
            return Err(self.fail(SaveError::NothingDrawn.into()));
        }
        match self.surface.export_png() {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(self.fail(SaveError::from(err).into())),
        }
    }

    /// Export the canvas and write it to `path`
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.save()?;
        if let Err(source) = std::fs::write(path, &bytes) {
            let err = SaveError::Io {
                path: path.to_path_buf(),
                source,
            };
            return Err(self.fail(err.into()));
        }
        info!(path = %path.display(), bytes = bytes.len(), "QR code saved");
        Ok(())
    }

    /// Drain queued notifications
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scheduler phase
    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Steps drawn out of the total
    pub fn progress(&self) -> Progress {
        self.scheduler.progress()
    }

    /// Current generation, if any
    pub fn generation(&self) -> Option<&Generation> {
        self.generation.as_ref()
    }

    /// Current canvas geometry, if any
    pub fn canvas(&self) -> Option<&CanvasSettings> {
        self.generation.as_ref().map(|g| &g.settings)
    }

    /// Borrow the scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Borrow the drawing surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Which user actions are currently available
    pub fn controls(&self) -> Controls {
        Controls::for_scheduler(&self.scheduler)
    }

    /// One-line description of the current state
    pub fn status(&self) -> String {
        let module_count = self.canvas().map(|c| c.module_count);
        controls::status_line(&self.scheduler, module_count)
    }

    fn record(&mut self, tick: Tick) {
        match tick {
            Tick::Drew {
                current_step,
                total_steps,
                ..
            } => self.events.push(SessionEvent::Progress(Progress {
                current_step,
                total_steps,
            })),
            Tick::Completed { total_steps } => {
                let module_count = self.canvas().map(|c| c.module_count).unwrap_or(0);
                debug!(module_count, total_steps, "reveal finished");
                self.events.push(SessionEvent::Completed {
                    module_count,
                    total_steps,
                });
            }
            Tick::Stale => {}
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        warn!(kind = ?err.kind(), "{err}");
        self.events.push(SessionEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FixedEncoder;
    use crate::models::BitMatrix;
    use crate::surface::{BLACK, ImageSurface, RecordingSurface, WHITE};

    const DELAY: Duration = Duration::from_millis(5);

    fn checker() -> BitMatrix {
        BitMatrix::from_rows(&["#.#", ".#.", "#.#"]).unwrap()
    }

    fn request(text: &str) -> GenerateRequest {
        GenerateRequest::new(text)
            .mode(AnimationMode::Sequential)
            .level(ECLevel::M)
            .module_size(2)
            .delay(DELAY)
    }

    #[test]
    fn test_generate_starts_animation() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        let generation = session.generate(&request("hi")).unwrap();

        assert_eq!(generation.dark_modules, 5);
        assert_eq!(generation.settings.total_size, (3 + 8) * 2);
        assert_eq!(session.surface().size(), (22, 22));
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(
            session.take_events(),
            vec![SessionEvent::Progress(Progress {
                current_step: 1,
                total_steps: 5
            })]
        );
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        let err = session.generate(&request("   \n\t")).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
        assert!(session.surface().ops().is_empty());
        assert_eq!(session.phase(), Phase::Idle);
        assert!(matches!(
            session.take_events().as_slice(),
            [SessionEvent::Error {
                kind: ErrorKind::EmptyInput,
                ..
            }]
        ));
    }

    #[test]
    fn test_zero_module_size_is_rejected() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        let err = session.generate(&request("x").module_size(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(session.generation().is_none());
    }

    #[test]
    fn test_empty_symbol_is_an_encoder_fault() {
        let mut session = Session::new(FixedEncoder::new(BitMatrix::square(0)), RecordingSurface::new());
        let err = session.generate(&request("x")).unwrap_err();
        assert!(matches!(err, Error::Encoding(EncodeError::Internal(_))));
        assert!(session.surface().ops().is_empty());
    }

    #[test]
    fn test_oversized_module_size_is_rejected() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        for size in [MAX_MODULE_SIZE + 1, 200_000_000, u32::MAX] {
            let err = session.generate(&request("x").module_size(size)).unwrap_err();
            assert!(matches!(err, Error::InvalidModuleSize(s) if s == size));
        }
        assert!(session.surface().ops().is_empty());
        assert!(session.generation().is_none());
        assert!(
            session
                .take_events()
                .iter()
                .all(|e| matches!(e, SessionEvent::Error { kind: ErrorKind::InvalidConfig, .. }))
        );
    }

    #[test]
    fn test_completion_event_once() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        session.generate(&request("hi")).unwrap();
        session.advance(Duration::from_secs(1));
        session.advance(Duration::from_secs(1));

        let completed: Vec<_> = session
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::Completed { .. }))
            .collect();
        assert_eq!(
            completed,
            vec![SessionEvent::Completed {
                module_count: 3,
                total_steps: 5
            }]
        );
        assert_eq!(session.surface().fills_of(BLACK).len(), 5);
    }

    #[test]
    fn test_toggle_pause() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        assert!(!session.toggle_pause());
        session.generate(&request("hi")).unwrap();
        assert!(session.toggle_pause());
        assert_eq!(session.status(), "Animation paused");
        assert!(!session.toggle_pause());
        assert_eq!(session.progress().current_step, 2);
    }

    #[test]
    fn test_reset_clears_generation() {
        let mut session = Session::new(FixedEncoder::new(checker()), ImageSurface::new());
        session.generate(&request("hi")).unwrap();
        session.advance(DELAY);
        session.reset();

        assert!(session.canvas().is_none());
        assert_eq!(session.progress().current_step, 0);
        assert_eq!(session.surface().count_pixels(BLACK), 0);
        assert_eq!(session.surface().count_pixels(WHITE), 22 * 22);
        assert_eq!(session.status(), "Ready to generate QR code");
    }

    #[test]
    fn test_save_before_drawing_fails() {
        let mut session = Session::new(FixedEncoder::new(checker()), ImageSurface::new());
        let err = session.save().unwrap_err();
        assert!(matches!(err, Error::Save(SaveError::NothingDrawn)));
    }

    #[test]
    fn test_save_unsupported_surface() {
        let mut session = Session::new(FixedEncoder::new(checker()), RecordingSurface::new());
        session.generate(&request("hi")).unwrap();
        let err = session.save().unwrap_err();
        assert!(matches!(err, Error::Save(SaveError::Surface(_))));
    }

    #[test]
    fn test_save_png() {
        let mut session = Session::new(FixedEncoder::new(checker()), ImageSurface::new());
        session.generate(&request("hi")).unwrap();
        session.advance(Duration::from_secs(1));
        let bytes = session.save().unwrap();
        let image = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (22, 22));
        // Module (1, 1) sits at offset 8 + 2
        assert_eq!(*image.get_pixel(10, 10), BLACK);
        assert_eq!(*image.get_pixel(12, 10), WHITE);
    }
}
