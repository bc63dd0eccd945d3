//! # cam_swatch
//!
//! Finger-painting color picker: an external hand-landmark detector
//! delivers 21-point hand frames; whichever finger is raised selects
//! the displayed color swatch.
//!
//! ## Finger → Color mapping
//!
//! | Finger | Color | Hex |
//! |---|---|---|
//! | Thumb | Red | `#E63946` |
//! | Index | Cyan | `#00B4D8` |
//! | Middle | Lime | `#8AC926` |
//! | Ring | Violet | `#9D4EDD` |
//! | Pinky | Gold | `#FFCA3A` |
//!
//! With several fingers raised, the first in anatomical order wins
//! (thumb > index > middle > ring > pinky). The swatch changes only
//! when the selection actually changes — the reveal animation never
//! restarts on a repeated frame.
//!
//! ## Frame sources
//!
//! * (default) — **Simulation mode**: keyboard toggles build a
//!   synthetic hand pose, emitted at a steady frame rate.
//! * `--replay FILE` — play back a recorded JSON frame sequence.
//! * `--detector CMD...` — spawn an external detector subprocess that
//!   owns the camera and model and prints one JSON frame per line.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `1`–`5` | Toggle thumb / index / middle / ring / pinky |
//! | `0` | Lower all fingers |
//! | `H` | Hand enters / leaves the frame |
//! | `Q` | Quit |

pub mod source;
pub mod app;
pub mod visualizer;
