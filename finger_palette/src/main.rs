//! Print the palette table and walk a scripted selection sequence,
//! showing which frames actually cause a transition.

use finger_palette::{ColorState, entry_for, PALETTE};
use hand_frame::Finger;

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              Finger → Color Palette Demo             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    println!("  ┌─ palette ─────────────────────────────┐");
    for finger in Finger::ALL {
        let e = entry_for(finger);
        println!("  │  {:6} → [{}] {:6}  {}          │", finger.name(), e.id, e.name, e.hex);
    }
    println!("  └───────────────────────────────────────┘");
    println!();

    // A plausible run of dominant fingers over successive frames.
    // Repeats are the interesting part: they must not re-transition.
    let frames = [
        Finger::Thumb,   // Red is already current → no-op
        Finger::Index,
        Finger::Index,
        Finger::Pinky,
        Finger::Pinky,
        Finger::Pinky,
        Finger::Middle,
        Finger::Index,
    ];

    let mut state = ColorState::new();
    println!("  Start: {} ({})", state.current().name, state.current().hex);
    println!();

    for (i, finger) in frames.iter().enumerate() {
        match state.select(*finger) {
            Some(t) => println!(
                "  frame {}  {:6} → transition {} → {}",
                i, finger.name(), t.from.name, t.to.name
            ),
            None => println!(
                "  frame {}  {:6} → unchanged ({})",
                i, finger.name(), state.current().name
            ),
        }
    }

    println!();
    println!("  Final: {} ({})", state.current().name, state.current().hex);
    println!("  {} entries in palette.", PALETTE.len());
    println!();
}
