//! # hand_frame
//!
//! Data model for one detected hand — 21 normalized landmarks in the
//! MediaPipe hand-landmark order — plus the raised-finger classifier
//! built on top of it.
//!
//! The classifier is purely geometric and stateless: a finger counts as
//! raised when its tip sits more than [`RAISED_MARGIN`] above its
//! PIP joint in normalized image coordinates (image y grows downward,
//! so "above" means a *smaller* y).
//!
//! ## Quick start
//!
//! ```rust
//! use hand_frame::{Finger, RaisedSet, synthetic_pose, RAISED_MARGIN};
//!
//! let hand = synthetic_pose(&[Finger::Index, Finger::Pinky]);
//! let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
//!
//! assert!(raised.contains(Finger::Index));
//! assert!(raised.contains(Finger::Pinky));
//! // Anatomical priority: index outranks pinky.
//! assert_eq!(raised.dominant(), Some(Finger::Index));
//! ```

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices (MediaPipe hand landmark model convention)
// ════════════════════════════════════════════════════════════════════════════

/// Landmark indices into a [`HandFrame`], following the MediaPipe hand
/// landmark model: wrist first, then four joints per digit from the
/// palm outward.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Number of landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Default raised-finger margin in normalized coordinate units.
///
/// A tip must be at least this far above its PIP joint to count as
/// raised. Fixed threshold, no hysteresis, no temporal smoothing.
pub const RAISED_MARGIN: f32 = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single normalized 2D keypoint on a detected hand.
///
/// `x` and `y` are in `[0, 1]` relative to frame width/height; `z` is
/// the detector's relative depth (negative toward the camera). Only `y`
/// participates in raised-finger classification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Convert to pixel coordinates for a frame of the given dimensions.
    pub fn to_pixels(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x * width, self.y * height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Finger — the five digit identities
// ════════════════════════════════════════════════════════════════════════════

/// One of the five finger identities, in anatomical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers in anatomical priority order, thumb first.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Landmark index of this finger's tip.
    pub fn tip_index(self) -> usize {
        match self {
            Finger::Thumb  => landmarks::THUMB_TIP,
            Finger::Index  => landmarks::INDEX_TIP,
            Finger::Middle => landmarks::MIDDLE_TIP,
            Finger::Ring   => landmarks::RING_TIP,
            Finger::Pinky  => landmarks::PINKY_TIP,
        }
    }

    /// Landmark index of this finger's second-from-tip joint.
    ///
    /// The thumb has no PIP; its IP joint fills the same role so that
    /// all five digits share one tip-vs-second-joint rule.
    pub fn pip_index(self) -> usize {
        match self {
            Finger::Thumb  => landmarks::THUMB_IP,
            Finger::Index  => landmarks::INDEX_PIP,
            Finger::Middle => landmarks::MIDDLE_PIP,
            Finger::Ring   => landmarks::RING_PIP,
            Finger::Pinky  => landmarks::PINKY_PIP,
        }
    }

    /// Position in [`Finger::ALL`] (0 = thumb … 4 = pinky).
    pub fn ordinal(self) -> usize {
        match self {
            Finger::Thumb  => 0,
            Finger::Index  => 1,
            Finger::Middle => 2,
            Finger::Ring   => 3,
            Finger::Pinky  => 4,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb  => "Thumb",
            Finger::Index  => "Index",
            Finger::Middle => "Middle",
            Finger::Ring   => "Ring",
            Finger::Pinky  => "Pinky",
        }
    }

    /// Single-letter initial, for compact on-screen markers.
    pub fn initial(self) -> char {
        match self {
            Finger::Thumb  => 'T',
            Finger::Index  => 'I',
            Finger::Middle => 'M',
            Finger::Ring   => 'R',
            Finger::Pinky  => 'P',
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

/// Which hand the detector believes it saw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame — one detected hand in one video frame
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand: exactly [`LANDMARK_COUNT`] landmarks in MediaPipe
/// order, plus the detector's confidence score and handedness.
///
/// Confidence and handedness are carried through for display; neither
/// influences classification or dominant-finger tie-breaking.
#[derive(Clone, Debug)]
pub struct HandFrame {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub confidence: f32,
    pub handedness: Handedness,
}

impl HandFrame {
    /// Build a frame from bare landmarks with full confidence.
    pub fn from_landmarks(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        HandFrame {
            landmarks,
            confidence: 1.0,
            handedness: Handedness::default(),
        }
    }

    /// Tip landmark of the given finger.
    pub fn tip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.tip_index()]
    }

    /// Second-joint landmark of the given finger.
    pub fn pip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.pip_index()]
    }

    /// Whether `finger` is raised under the given margin: the tip must
    /// sit strictly more than `margin` above the PIP joint.
    pub fn is_raised(&self, finger: Finger, margin: f32) -> bool {
        self.tip(finger).y < self.pip(finger).y - margin
    }

    /// All landmarks as pixel coordinates, for rendering.
    pub fn pixel_landmarks(&self, width: f32, height: f32) -> Vec<(f32, f32)> {
        self.landmarks
            .iter()
            .map(|lm| lm.to_pixels(width, height))
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RaisedSet — which fingers are extended this frame
// ════════════════════════════════════════════════════════════════════════════

/// The fingers classified as raised in one frame, in anatomical order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RaisedSet {
    fingers: Vec<Finger>,
}

impl RaisedSet {
    /// No fingers raised.
    pub fn empty() -> Self {
        RaisedSet::default()
    }

    /// Classify every finger of `hand` against the margin rule.
    ///
    /// Stateless and per-frame; iteration over [`Finger::ALL`] fixes
    /// the output order regardless of landmark layout.
    pub fn classify(hand: &HandFrame, margin: f32) -> Self {
        let fingers = Finger::ALL
            .iter()
            .copied()
            .filter(|&f| hand.is_raised(f, margin))
            .collect();
        RaisedSet { fingers }
    }

    /// The first raised finger in anatomical priority order
    /// (thumb > index > middle > ring > pinky), or `None` when no
    /// finger is raised. This fixed tie-break is independent of raised
    /// count and detector confidence.
    pub fn dominant(&self) -> Option<Finger> {
        self.fingers.first().copied()
    }

    pub fn contains(&self, finger: Finger) -> bool {
        self.fingers.contains(&finger)
    }

    pub fn is_empty(&self) -> bool {
        self.fingers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fingers.len()
    }

    /// Raised fingers in anatomical order.
    pub fn fingers(&self) -> &[Finger] {
        &self.fingers
    }
}

// ════════════════════════════════════════════════════════════════════════════
// synthetic_pose — stylised landmark generator
// ════════════════════════════════════════════════════════════════════════════

/// Generate a stylised [`HandFrame`] with exactly the given fingers
/// raised and the rest curled.
///
/// The pose is geometrically plausible (wrist low, digits fanned out in
/// columns) so it renders sensibly, and it is exact with respect to the
/// classifier: raised tips sit 0.15 above their PIP, curled tips 0.04
/// below — comfortably on either side of [`RAISED_MARGIN`].
pub fn synthetic_pose(raised: &[Finger]) -> HandFrame {
    let mut lm = [Landmark::default(); LANDMARK_COUNT];

    lm[landmarks::WRIST] = Landmark::new(0.50, 0.85);

    // Thumb chain leans out to the side of the palm.
    let thumb_up = raised.contains(&Finger::Thumb);
    lm[landmarks::THUMB_CMC] = Landmark::new(0.40, 0.76);
    lm[landmarks::THUMB_MCP] = Landmark::new(0.34, 0.68);
    lm[landmarks::THUMB_IP]  = Landmark::new(0.30, 0.60);
    lm[landmarks::THUMB_TIP] = Landmark::new(
        0.28,
        if thumb_up { 0.60 - 0.15 } else { 0.60 + 0.04 },
    );

    // Four fingers in columns across the palm.
    let columns = [
        (Finger::Index,  0.40, landmarks::INDEX_MCP),
        (Finger::Middle, 0.48, landmarks::MIDDLE_MCP),
        (Finger::Ring,   0.56, landmarks::RING_MCP),
        (Finger::Pinky,  0.64, landmarks::PINKY_MCP),
    ];
    for (finger, x, mcp) in columns {
        let up = raised.contains(&finger);
        lm[mcp]     = Landmark::new(x, 0.62);
        lm[mcp + 1] = Landmark::new(x, 0.52);               // PIP
        lm[mcp + 2] = Landmark::new(x, 0.45);               // DIP
        lm[mcp + 3] = Landmark::new(x, if up { 0.52 - 0.15 } else { 0.52 + 0.04 });
    }

    HandFrame::from_landmarks(lm)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_and_pip_indices() {
        assert_eq!(Finger::Thumb.tip_index(), 4);
        assert_eq!(Finger::Thumb.pip_index(), 3);
        assert_eq!(Finger::Index.tip_index(), 8);
        assert_eq!(Finger::Index.pip_index(), 6);
        assert_eq!(Finger::Pinky.tip_index(), 20);
        assert_eq!(Finger::Pinky.pip_index(), 18);
    }

    #[test]
    fn anatomical_order() {
        assert_eq!(Finger::ALL[0], Finger::Thumb);
        assert_eq!(Finger::ALL[4], Finger::Pinky);
        for (i, finger) in Finger::ALL.into_iter().enumerate() {
            assert_eq!(finger.ordinal(), i);
        }
    }

    #[test]
    fn single_raised_finger_classified_alone() {
        for finger in Finger::ALL {
            let hand = synthetic_pose(&[finger]);
            let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
            assert_eq!(raised.fingers(), &[finger], "pose for {:?}", finger);
        }
    }

    #[test]
    fn flat_hand_classifies_empty() {
        let hand = synthetic_pose(&[]);
        let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
        assert!(raised.is_empty());
        assert_eq!(raised.dominant(), None);
    }

    #[test]
    fn margin_is_strict() {
        // Tip exactly margin above the PIP is NOT raised.
        let mut hand = synthetic_pose(&[]);
        let pip_y = hand.pip(Finger::Index).y;
        hand.landmarks[Finger::Index.tip_index()].y = pip_y - RAISED_MARGIN;
        assert!(!hand.is_raised(Finger::Index, RAISED_MARGIN));

        // A hair beyond the margin is.
        hand.landmarks[Finger::Index.tip_index()].y = pip_y - RAISED_MARGIN - 0.001;
        assert!(hand.is_raised(Finger::Index, RAISED_MARGIN));
    }

    #[test]
    fn tie_break_is_anatomical() {
        // Index and pinky both raised → index dominates, regardless of
        // which column sits where.
        let hand = synthetic_pose(&[Finger::Pinky, Finger::Index]);
        let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
        assert_eq!(raised.len(), 2);
        assert_eq!(raised.dominant(), Some(Finger::Index));
    }

    #[test]
    fn thumb_outranks_all() {
        let hand = synthetic_pose(&Finger::ALL);
        let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
        assert_eq!(raised.len(), 5);
        assert_eq!(raised.dominant(), Some(Finger::Thumb));
    }

    #[test]
    fn concrete_index_scenario() {
        // index tip 0.30 vs PIP 0.40: difference 0.10 > 0.05 margin;
        // every other finger stays within the margin.
        let mut hand = synthetic_pose(&[]);
        hand.landmarks[landmarks::INDEX_PIP].y = 0.40;
        hand.landmarks[landmarks::INDEX_TIP].y = 0.30;
        let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
        assert_eq!(raised.fingers(), &[Finger::Index]);
        assert_eq!(raised.dominant(), Some(Finger::Index));
    }

    #[test]
    fn confidence_does_not_affect_classification() {
        let mut hand = synthetic_pose(&[Finger::Middle]);
        hand.confidence = 0.01;
        let raised = RaisedSet::classify(&hand, RAISED_MARGIN);
        assert_eq!(raised.dominant(), Some(Finger::Middle));
    }

    #[test]
    fn pixel_conversion() {
        let lm = Landmark::new(0.5, 0.25);
        assert_eq!(lm.to_pixels(640.0, 480.0), (320.0, 120.0));

        let hand = synthetic_pose(&[]);
        assert_eq!(hand.pixel_landmarks(100.0, 100.0).len(), LANDMARK_COUNT);
    }
}
