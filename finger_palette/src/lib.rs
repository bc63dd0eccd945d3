//! # finger_palette
//!
//! Map a dominant raised finger to one of five fixed display colors,
//! and hold the single current selection.
//!
//! * **Thumb**  → Red
//! * **Index**  → Cyan
//! * **Middle** → Lime
//! * **Ring**   → Violet
//! * **Pinky**  → Gold
//!
//! [`ColorState`] is the one piece of mutable state in the system: it
//! starts at Red and changes only when a newly selected finger maps to
//! a different palette entry. The caller performs UI side effects
//! (swatch repaint, animation restart) only when [`ColorState::select`]
//! reports a [`Transition`].
//!
//! ## Quick start
//!
//! ```rust
//! use finger_palette::{ColorState, entry_for};
//! use hand_frame::Finger;
//!
//! let mut state = ColorState::new();
//! assert_eq!(state.current().name, "Red");
//!
//! // Index finger raised → transition to Cyan.
//! let t = state.select(Finger::Index).expect("color should change");
//! assert_eq!(t.to.name, "Cyan");
//!
//! // Same finger again → no transition, no side effect.
//! assert!(state.select(Finger::Index).is_none());
//!
//! assert_eq!(entry_for(Finger::Pinky).name, "Gold");
//! ```

use hand_frame::Finger;

// ════════════════════════════════════════════════════════════════════════════
// PaletteEntry — one selectable color
// ════════════════════════════════════════════════════════════════════════════

/// One of the five fixed palette entries.
///
/// `argb` is the packed `0xAARRGGBB` form of `hex`, ready for a
/// software framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: u8,
    pub name: &'static str,
    pub hex: &'static str,
    pub argb: u32,
}

/// The full palette, indexed by entry id.
pub const PALETTE: [PaletteEntry; 5] = [
    PaletteEntry { id: 0, name: "Red",    hex: "#E63946", argb: 0xFFE63946 },
    PaletteEntry { id: 1, name: "Lime",   hex: "#8AC926", argb: 0xFF8AC926 },
    PaletteEntry { id: 2, name: "Cyan",   hex: "#00B4D8", argb: 0xFF00B4D8 },
    PaletteEntry { id: 3, name: "Violet", hex: "#9D4EDD", argb: 0xFF9D4EDD },
    PaletteEntry { id: 4, name: "Gold",   hex: "#FFCA3A", argb: 0xFFFFCA3A },
];

/// Look up a palette entry by id. Panics on an out-of-range id; every
/// id stored in [`ColorState`] comes from [`PALETTE`] itself.
pub fn entry(id: u8) -> &'static PaletteEntry {
    &PALETTE[id as usize]
}

/// The fixed finger → color assignment.
pub fn entry_for(finger: Finger) -> &'static PaletteEntry {
    match finger {
        Finger::Thumb  => &PALETTE[0],
        Finger::Index  => &PALETTE[2],
        Finger::Middle => &PALETTE[1],
        Finger::Ring   => &PALETTE[3],
        Finger::Pinky  => &PALETTE[4],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transition — reported once per actual color change
// ════════════════════════════════════════════════════════════════════════════

/// Emitted by [`ColorState::select`] when the selection changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: &'static PaletteEntry,
    pub to: &'static PaletteEntry,
    /// The finger that drove the change.
    pub finger: Finger,
}

// ════════════════════════════════════════════════════════════════════════════
// ColorState — the single current selection
// ════════════════════════════════════════════════════════════════════════════

/// The current palette selection.
///
/// Fully connected: any entry may follow any other. Starts at entry 0
/// (Red) and lives for the process lifetime of the app; there is no
/// reset operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorState {
    current: u8,
}

impl ColorState {
    pub fn new() -> Self {
        ColorState { current: PALETTE[0].id }
    }

    /// The currently selected entry.
    pub fn current(&self) -> &'static PaletteEntry {
        entry(self.current)
    }

    /// Select the color mapped to `finger`.
    ///
    /// Returns `Some(Transition)` and updates the state iff the mapped
    /// entry differs from the current one; otherwise the state is left
    /// untouched and nothing is signalled, so repeated frames with the
    /// same dominant finger cause no repeated side effects.
    pub fn select(&mut self, finger: Finger) -> Option<Transition> {
        let to = entry_for(finger);
        if to.id == self.current {
            return None;
        }
        let from = self.current();
        self.current = to.id;
        Some(Transition { from, to, finger })
    }
}

impl Default for ColorState {
    fn default() -> Self {
        ColorState::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
