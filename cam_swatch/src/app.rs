//! Top-level application state and run loop.
//!
//! `AppState` owns the `ColorState`, the last classified `RaisedSet`
//! and the swatch reveal animation. Frames arrive as an ordered stream
//! of events; each one is fully processed before the next is examined,
//! so there is never a concurrent classification in flight.

use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};

use anyhow::Result;

use finger_palette::{ColorState, PaletteEntry};
use hand_frame::{HandFrame, RaisedSet, RAISED_MARGIN};

use crate::source::{
    spawn_hand_source, DetectorSource, FrameEvent, ReplaySource, SimHandSource,
};
use crate::visualizer::{RevealAnimation, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where hand frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Keyboard-driven synthetic poses (default).
    Sim,
    /// Recorded frames played back from a JSON file.
    Replay(PathBuf),
    /// External detector subprocess: program plus arguments.
    Detector(Vec<String>),
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source: SourceKind,
    /// Raised-finger margin in normalized units.
    pub margin: f32,
    /// Frame cadence for the sim and replay sources.
    pub fps: u32,
    /// Draw all 21 landmarks, not just raised fingertips.
    pub show_landmarks: bool,
    /// Hands below this detector confidence are dropped.
    pub min_confidence: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source:         SourceKind::Sim,
            margin:         RAISED_MARGIN,
            fps:            30,
            show_landmarks: true,
            min_confidence: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── color selection ──────────────────────────────────────────────────
    color:  ColorState,
    reveal: RevealAnimation,

    // ── last classified frame ────────────────────────────────────────────
    raised: RaisedSet,
    hand:   Option<HandFrame>,

    margin:      f32,
    frames_seen: u64,
    transitions: u64,

    // ── status message ───────────────────────────────────────────────────
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let color = ColorState::new();
        let reveal = RevealAnimation::settled(color.current().argb);
        AppState {
            color,
            reveal,
            raised:      RaisedSet::empty(),
            hand:        None,
            margin:      cfg.margin,
            frames_seen: 0,
            transitions: 0,
            status:      format!("Ready - raise a finger (margin {})", cfg.margin),
        }
    }

    // ── process one frame of detections ──────────────────────────────────

    /// Feed one frame's hands through classification and color update.
    ///
    /// An empty frame is skipped entirely: the classifier is not
    /// invoked and the color selection stays exactly as it is. With a
    /// hand present, a transition (and its side effects: animation
    /// restart, log line) happens only when the dominant finger maps to
    /// a different color than the current one.
    pub fn process_frame(&mut self, mut hands: Vec<HandFrame>) {
        self.frames_seen += 1;

        if hands.is_empty() {
            self.hand = None;
            self.raised = RaisedSet::empty();
            self.status = "No hand detected".to_string();
            return;
        }

        // The classifier contract is one hand; extra detections are ignored.
        let hand = hands.swap_remove(0);
        let raised = RaisedSet::classify(&hand, self.margin);

        match raised.dominant() {
            Some(dominant) => {
                if let Some(t) = self.color.select(dominant) {
                    self.transitions += 1;
                    self.reveal.restart(t.from.argb, t.to.argb);
                    log::info!(
                        "{} raised: {} -> {}",
                        dominant.name(),
                        t.from.name,
                        t.to.name
                    );
                    self.status = format!(
                        "{} -> {}  ({} raised)",
                        t.from.name, t.to.name, dominant.name()
                    );
                } else {
                    self.status = format!(
                        "{} raised - {} already selected",
                        dominant.name(),
                        self.color.current().name
                    );
                }
            }
            None => {
                self.status = format!("Hand flat - holding {}", self.color.current().name);
            }
        }

        self.raised = raised;
        self.hand = Some(hand);
    }

    // ── per-frame animation tick ─────────────────────────────────────────

    pub fn tick(&mut self) {
        self.reveal.tick();
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn color(&self) -> &'static PaletteEntry { self.color.current() }
    pub fn raised(&self) -> &RaisedSet           { &self.raised }
    pub fn hand(&self) -> Option<&HandFrame>     { self.hand.as_ref() }
    pub fn reveal(&self) -> &RevealAnimation     { &self.reveal }
    pub fn frames_seen(&self) -> u64             { self.frames_seen }
    pub fn transitions(&self) -> u64             { self.transitions }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the configured hand source on its own thread, opens the
/// visualizer window, and drives the event/render loop at the window's
/// refresh rate.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── sim input channel (only the Sim source consumes it) ──────────────
    let (sim_tx, sim_rx) = mpsc::channel();

    let frame_rx = match &cfg.source {
        SourceKind::Sim => spawn_hand_source(SimHandSource {
            rx: sim_rx,
            fps: cfg.fps,
        }),
        SourceKind::Replay(path) => {
            spawn_hand_source(ReplaySource::load(path, cfg.fps)?)
        }
        SourceKind::Detector(command) => {
            spawn_hand_source(DetectorSource::launch(command, cfg.min_confidence)?)
        }
    };

    // ── visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── app state ────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);
    let mut source_done = false;

    // ── main loop ────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        // Drain frame events in arrival order.
        while !source_done {
            match frame_rx.try_recv() {
                Ok(FrameEvent::Frame { hands }) => app.process_frame(hands),
                Ok(FrameEvent::Quit) => return Ok(()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Replay or detector ended; keep the last state on
                    // screen until the window closes.
                    log::info!("hand source finished after {} frames", app.frames_seen());
                    source_done = true;
                }
            }
        }

        app.tick();
        vis.render(&app, cfg.show_landmarks);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_frame::{synthetic_pose, Finger};

    fn make_app() -> AppState {
        AppState::new(&AppConfig::default())
    }

    #[test]
    fn starts_on_red() {
        let app = make_app();
        assert_eq!(app.color().id, 0);
        assert_eq!(app.color().name, "Red");
        assert_eq!(app.transitions(), 0);
    }

    #[test]
    fn index_frame_selects_cyan() {
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Index])]);
        assert_eq!(app.color().id, 2);
        assert_eq!(app.color().name, "Cyan");
        assert_eq!(app.transitions(), 1);
    }

    #[test]
    fn identical_frames_transition_once() {
        let mut app = make_app();
        let pose = synthetic_pose(&[Finger::Index]);
        app.process_frame(vec![pose.clone()]);
        assert_eq!(app.transitions(), 1);
        app.process_frame(vec![pose]);
        assert_eq!(app.transitions(), 1);
        assert_eq!(app.color().name, "Cyan");
    }

    #[test]
    fn empty_frame_is_skipped() {
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Pinky])]);
        assert_eq!(app.color().name, "Gold");

        app.process_frame(Vec::new());
        assert_eq!(app.color().name, "Gold");
        assert!(app.hand().is_none());
        assert!(app.raised().is_empty());
        assert_eq!(app.frames_seen(), 2);
    }

    #[test]
    fn flat_hand_holds_color() {
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Middle])]);
        assert_eq!(app.color().name, "Lime");

        app.process_frame(vec![synthetic_pose(&[])]);
        assert_eq!(app.color().name, "Lime");
        assert!(app.raised().is_empty());
        assert!(app.hand().is_some());
    }

    #[test]
    fn tie_break_prefers_index_over_pinky() {
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Index, Finger::Pinky])]);
        assert_eq!(app.color().name, "Cyan");
    }

    #[test]
    fn thumb_on_startup_is_silent() {
        // Thumb maps to Red, already current — no transition, no restart.
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Thumb])]);
        assert_eq!(app.transitions(), 0);
        assert_eq!(app.color().name, "Red");
    }

    #[test]
    fn extra_hands_are_ignored() {
        let mut app = make_app();
        app.process_frame(vec![
            synthetic_pose(&[Finger::Index]),
            synthetic_pose(&[Finger::Pinky]),
        ]);
        assert_eq!(app.color().name, "Cyan");
    }

    #[test]
    fn reveal_restarts_only_on_transition() {
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Index])]);
        assert_eq!(app.reveal().progress(), 0.0);

        for _ in 0..5 {
            app.tick();
        }
        let progress = app.reveal().progress();
        assert!(progress > 0.0);

        // Same dominant finger again: the animation must not restart.
        app.process_frame(vec![synthetic_pose(&[Finger::Index])]);
        assert_eq!(app.reveal().progress(), progress);
    }

    #[test]
    fn reveal_settles() {
        let mut app = make_app();
        app.process_frame(vec![synthetic_pose(&[Finger::Ring])]);
        for _ in 0..100 {
            app.tick();
        }
        assert!(app.reveal().done());
    }

    #[test]
    fn custom_margin_is_respected() {
        // Synthetic raised tips sit 0.15 above the PIP; a margin wider
        // than that classifies nothing.
        let cfg = AppConfig {
            margin: 0.2,
            ..AppConfig::default()
        };
        let mut app = AppState::new(&cfg);
        app.process_frame(vec![synthetic_pose(&[Finger::Index])]);
        assert!(app.raised().is_empty());
        assert_eq!(app.color().name, "Red");
    }
}
