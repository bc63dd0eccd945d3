//! Hand-frame delivery — simulated, replayed from a recording, or read
//! from a live detector subprocess.
//!
//! The public interface is [`FrameEvent`] delivered over an `mpsc`
//! channel. Consumers don't need to know where frames came from.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use hand_frame::{synthetic_pose, Finger, HandFrame, Handedness, Landmark, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent
// ════════════════════════════════════════════════════════════════════════════

/// One delivery from a hand source.
#[derive(Clone, Debug)]
pub enum FrameEvent {
    /// One video frame's worth of detections — possibly no hands.
    Frame { hands: Vec<HandFrame> },

    /// The source asks the application to shut down.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface over sim, replay and detector
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FrameEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> Receiver<FrameEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// Toggle one finger up/down.
    Toggle(Finger),
    /// Lower every finger (flat hand).
    LowerAll,
    /// Toggle whether a hand is present at all.
    ToggleHand,
    /// Quit the application.
    Quit,
}

/// Hand source driven by [`SimInput`] events from the visualizer's
/// window.
///
/// Key toggles update a synthetic pose, which is then emitted at a
/// steady `fps` so the app sees the same frame cadence a real detector
/// would produce — including empty frames while the hand is "away".
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
    pub fps: u32,
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        let tick = Duration::from_millis(1000 / self.fps.max(1) as u64);
        let mut up = [false; 5];
        let mut hand_present = true;

        loop {
            // Drain pending toggles before building this frame's pose.
            loop {
                match self.rx.try_recv() {
                    Ok(SimInput::Toggle(finger)) => {
                        up[finger.ordinal()] = !up[finger.ordinal()];
                    }
                    Ok(SimInput::LowerAll)   => up = [false; 5],
                    Ok(SimInput::ToggleHand) => hand_present = !hand_present,
                    Ok(SimInput::Quit) => {
                        let _ = tx.send(FrameEvent::Quit);
                        return;
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let hands = if hand_present {
                let raised: Vec<Finger> = Finger::ALL
                    .iter()
                    .copied()
                    .zip(up)
                    .filter_map(|(finger, is_up)| is_up.then_some(finger))
                    .collect();
                vec![synthetic_pose(&raised)]
            } else {
                Vec::new()
            };

            if tx.send(FrameEvent::Frame { hands }).is_err() {
                return;
            }
            thread::sleep(tick);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire format — what the detector prints and recordings store
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct LandmarkWire {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Debug, Deserialize)]
struct HandWire {
    #[serde(default)]
    handedness: String,
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<LandmarkWire>,
}

fn full_score() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct FrameWire {
    #[serde(default)]
    hands: Vec<HandWire>,
    #[serde(default)]
    error: Option<String>,
}

impl HandWire {
    /// Convert one wire hand, enforcing the 21-landmark contract.
    fn into_hand(self) -> Option<HandFrame> {
        if self.landmarks.len() != LANDMARK_COUNT {
            log::warn!(
                "expected {} landmarks, got {} — hand dropped",
                LANDMARK_COUNT,
                self.landmarks.len()
            );
            return None;
        }
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (slot, lm) in landmarks.iter_mut().zip(self.landmarks) {
            *slot = Landmark { x: lm.x, y: lm.y, z: lm.z };
        }
        let handedness = if self.handedness.eq_ignore_ascii_case("left") {
            Handedness::Left
        } else {
            Handedness::Right
        };
        Some(HandFrame {
            landmarks,
            confidence: self.score,
            handedness,
        })
    }
}

/// Turn one wire frame into app hands, applying the confidence filter.
fn frame_hands(wire: FrameWire, min_confidence: f32) -> Vec<HandFrame> {
    if let Some(err) = wire.error {
        log::warn!("detector error: {}", err);
        return Vec::new();
    }
    wire.hands
        .into_iter()
        .filter(|h| h.score >= min_confidence)
        .filter_map(HandWire::into_hand)
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource — play back a recorded frame sequence
// ════════════════════════════════════════════════════════════════════════════

/// Plays a recorded JSON file of frames at a fixed rate, once.
///
/// The recording is a JSON array of frame objects in the detector wire
/// format. When it ends, the source thread simply stops; the app keeps
/// the last classified state on screen.
pub struct ReplaySource {
    frames: Vec<Vec<HandFrame>>,
    fps: u32,
}

impl ReplaySource {
    pub fn load(path: &Path, fps: u32) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recording {:?}", path))?;
        let wires: Vec<FrameWire> = serde_json::from_str(&data)
            .with_context(|| format!("malformed recording {:?}", path))?;
        let frames = wires.into_iter().map(|w| frame_hands(w, 0.0)).collect();
        Ok(ReplaySource { frames, fps })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl HandSource for ReplaySource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        let tick = Duration::from_millis(1000 / self.fps.max(1) as u64);
        log::info!("replaying {} recorded frames", self.frames.len());
        for hands in self.frames {
            if tx.send(FrameEvent::Frame { hands }).is_err() {
                return;
            }
            thread::sleep(tick);
        }
        log::info!("replay finished");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorSource — external hand-landmark detector subprocess
// ════════════════════════════════════════════════════════════════════════════

/// Frames from an external hand-landmark detector subprocess.
///
/// The detector owns the camera and the model; this side only reads
/// its stdout. Protocol: the process prints `READY` on its first line,
/// then one JSON frame object per line for as long as it runs.
pub struct DetectorSource {
    child: Child,
    stdout: BufReader<ChildStdout>,
    min_confidence: f32,
}

impl DetectorSource {
    /// Spawn `command` (program plus arguments) and wait for the READY
    /// handshake.
    pub fn launch(command: &[String], min_confidence: f32) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .context("empty detector command")?;

        log::info!("starting detector: {}", command.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start detector {:?}", program))?;

        let stdout = child.stdout.take().context("detector has no stdout")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout
            .read_line(&mut ready)
            .context("detector closed before signalling READY")?;
        if ready.trim() != "READY" {
            let _ = child.kill();
            bail!("detector did not signal READY, got: {:?}", ready.trim());
        }
        log::info!("detector ready");

        Ok(DetectorSource {
            child,
            stdout,
            min_confidence,
        })
    }
}

impl HandSource for DetectorSource {
    fn run(mut self: Box<Self>, tx: Sender<FrameEvent>) {
        let mut line = String::new();
        loop {
            line.clear();
            match self.stdout.read_line(&mut line) {
                Ok(0) => {
                    log::info!("detector stream ended");
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("detector read error: {}", e);
                    return;
                }
            }

            let wire: FrameWire = match serde_json::from_str(&line) {
                Ok(w) => w,
                Err(e) => {
                    log::warn!("bad detector line ({}): {}", e, line.trim());
                    continue;
                }
            };

            let hands = frame_hands(wire, self.min_confidence);
            if tx.send(FrameEvent::Frame { hands }).is_err() {
                return;
            }
        }
    }
}

impl Drop for DetectorSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_frame::{RaisedSet, RAISED_MARGIN};

    fn frame_json(hands: &str) -> String {
        format!(r#"{{"hands":[{}]}}"#, hands)
    }

    fn hand_json(score: f32, landmark_count: usize) -> String {
        let landmarks: Vec<String> = (0..landmark_count)
            .map(|i| format!(r#"{{"x":0.5,"y":{:.3},"z":0.0}}"#, i as f32 / 30.0))
            .collect();
        format!(
            r#"{{"handedness":"Left","score":{},"landmarks":[{}]}}"#,
            score,
            landmarks.join(",")
        )
    }

    #[test]
    fn wire_frame_parses() {
        let wire: FrameWire = serde_json::from_str(&frame_json(&hand_json(0.9, 21))).unwrap();
        let hands = frame_hands(wire, 0.5);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].handedness, Handedness::Left);
        assert!((hands[0].confidence - 0.9).abs() < 1e-6);
        assert!((hands[0].landmarks[3].y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn wrong_landmark_count_dropped() {
        let wire: FrameWire = serde_json::from_str(&frame_json(&hand_json(0.9, 20))).unwrap();
        assert!(frame_hands(wire, 0.0).is_empty());
    }

    #[test]
    fn low_confidence_dropped() {
        let wire: FrameWire = serde_json::from_str(&frame_json(&hand_json(0.3, 21))).unwrap();
        assert!(frame_hands(wire, 0.5).is_empty());
    }

    #[test]
    fn error_field_yields_empty_frame() {
        let wire: FrameWire =
            serde_json::from_str(r#"{"hands":[],"error":"camera busy"}"#).unwrap();
        assert!(frame_hands(wire, 0.0).is_empty());
    }

    #[test]
    fn empty_object_is_empty_frame() {
        let wire: FrameWire = serde_json::from_str("{}").unwrap();
        assert!(frame_hands(wire, 0.0).is_empty());
    }

    #[test]
    fn missing_score_defaults_to_full() {
        let json = r#"{"hands":[{"landmarks":[
            {"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},
            {"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},
            {"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},
            {"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},{"x":0,"y":0},
            {"x":0,"y":0}]}]}"#;
        let wire: FrameWire = serde_json::from_str(json).unwrap();
        let hands = frame_hands(wire, 0.99);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].handedness, Handedness::Right);
    }

    #[test]
    fn replay_loads_and_plays() {
        let path = std::env::temp_dir().join("cam_swatch_replay_test.json");
        let recording = format!(
            "[{},{},{}]",
            frame_json(&hand_json(0.9, 21)),
            r#"{"hands":[]}"#,
            frame_json(&hand_json(0.8, 21)),
        );
        std::fs::write(&path, recording).unwrap();

        let source = ReplaySource::load(&path, 1000).unwrap();
        assert_eq!(source.len(), 3);

        let rx = spawn_hand_source(source);
        let mut frames = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            if let FrameEvent::Frame { hands } = event {
                frames.push(hands);
            }
        }
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].len(), 1);
        assert!(frames[1].is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn replay_load_rejects_garbage() {
        let path = std::env::temp_dir().join("cam_swatch_replay_bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ReplaySource::load(&path, 30).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn sim_source_reflects_toggles() {
        let (input_tx, input_rx) = mpsc::channel();
        input_tx.send(SimInput::Toggle(Finger::Index)).unwrap();

        let rx = spawn_hand_source(SimHandSource { rx: input_rx, fps: 500 });

        // The first frame already carries the pre-queued toggle.
        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let FrameEvent::Frame { hands } = event else {
            panic!("expected a frame");
        };
        assert_eq!(hands.len(), 1);
        let raised = RaisedSet::classify(&hands[0], RAISED_MARGIN);
        assert_eq!(raised.dominant(), Some(Finger::Index));

        input_tx.send(SimInput::Quit).unwrap();
        loop {
            match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
                FrameEvent::Quit => break,
                FrameEvent::Frame { .. } => continue,
            }
        }
    }

    #[test]
    fn sim_source_hand_absence() {
        let (input_tx, input_rx) = mpsc::channel();
        input_tx.send(SimInput::ToggleHand).unwrap();

        let rx = spawn_hand_source(SimHandSource { rx: input_rx, fps: 500 });
        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let FrameEvent::Frame { hands } = event else {
            panic!("expected a frame");
        };
        assert!(hands.is_empty());
    }
}
