//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────┬───────────────────────────────────┐
//! │                  │  HAND VIEW                        │
//! │   SWATCH         │  (landmark dots, raised-tip       │
//! │   name           │   markers)                        │
//! │   #hex           │                                   │
//! │                  │  [T] [I] [M] [R] [P]  indicators  │
//! │  status bar                                          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The swatch repaints through [`RevealAnimation`], a top-to-bottom
//! wipe restarted only when the color selection actually changes.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use anyhow::{anyhow, Result};
use finger_palette::entry_for;
use hand_frame::Finger;

use crate::app::AppState;
use crate::source::SimInput;

use std::sync::mpsc::Sender;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 960;
pub const WIN_H: usize = 540;
const SWATCH_W:    usize = 380;
const HAND_X:      usize = SWATCH_W;
const HAND_W:      usize = WIN_W - SWATCH_W;
const STATUS_Y:    usize = WIN_H - 36;
const INDICATOR_Y: usize = STATUS_Y - 64;
const BG_COLOR:    u32 = 0xFF1A1A2E;
const PANEL_BG:    u32 = 0xFF16213E;
const TEXT_BG:     u32 = 0xFF0F3460;
const CELL_DIM:    u32 = 0xFF2A2A3E;
const DOT_COLOR:   u32 = 0xFF8899AA;

// ════════════════════════════════════════════════════════════════════════════
// RevealAnimation — swatch repaint wipe
// ════════════════════════════════════════════════════════════════════════════

/// Top-to-bottom wipe that repaints the swatch from the previous color
/// to the new one. Restarted by the app only on an actual transition,
/// so an unchanged selection never re-triggers it.
#[derive(Clone, Debug)]
pub struct RevealAnimation {
    progress: f32,
    from: u32,
    to: u32,
}

impl RevealAnimation {
    /// An already-finished animation showing `color`.
    pub fn settled(color: u32) -> Self {
        RevealAnimation { progress: 1.0, from: color, to: color }
    }

    pub fn restart(&mut self, from: u32, to: u32) {
        self.progress = 0.0;
        self.from = from;
        self.to = to;
    }

    pub fn tick(&mut self) {
        self.progress = (self.progress + 0.06).min(1.0);
    }

    pub fn done(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Color for a row at normalized height `frac` (0.0 top, 1.0 bottom).
    fn row_color(&self, frac: f32) -> u32 {
        if frac <= self.progress { self.to } else { self.from }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            "Cam Swatch - Finger Color Picker",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("failed to create window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input and translate to [`SimInput`] events.
    ///
    /// Only the sim source consumes them (apart from Quit); with a
    /// replay or detector source the sends land on a closed channel and
    /// are silently dropped.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let toggles = [
            (Key::Key1, Finger::Thumb),
            (Key::Key2, Finger::Index),
            (Key::Key3, Finger::Middle),
            (Key::Key4, Finger::Ring),
            (Key::Key5, Finger::Pinky),
        ];
        for (key, finger) in toggles {
            if one_shot(&self.window, key) {
                let _ = self.sim_tx.send(SimInput::Toggle(finger));
            }
        }
        if one_shot(&self.window, Key::Key0) {
            let _ = self.sim_tx.send(SimInput::LowerAll);
        }
        if one_shot(&self.window, Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }

        true
    }

    /// Render one frame of application state.
    pub fn render(&mut self, app: &AppState, show_landmarks: bool) {
        self.buf.fill(BG_COLOR);

        self.draw_swatch(app);
        self.draw_hand_panel(app, show_landmarks);
        self.draw_indicators(app);

        // ── status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(&app.status, 10, STATUS_Y + 6, 2, 0xFFEEEEEE);
        self.draw_label(
            "1-5=FINGERS  0=LOWER ALL  H=HAND AWAY  Q=QUIT",
            10,
            WIN_H - 12,
            1,
            0xFF8888AA,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── swatch panel ──────────────────────────────────────────────────────

    fn draw_swatch(&mut self, app: &AppState) {
        let reveal = app.reveal();

        // Vertical gradient of the (possibly mid-wipe) swatch color.
        for row in 0..STATUS_Y {
            let frac = row as f32 / STATUS_Y as f32;
            let base = reveal.row_color(frac);
            let shaded = blend(base, 0xFF000000, 0.35 * frac);
            self.fill_rect(0, row, SWATCH_W, 1, shaded);
        }

        let entry = app.color();
        self.draw_label(entry.name, 28, 56, 5, 0xFFFFFFFF);
        self.draw_label(entry.hex, 28, 104, 3, 0xFFEEEEEE);
    }

    // ── hand panel ────────────────────────────────────────────────────────

    fn draw_hand_panel(&mut self, app: &AppState, show_landmarks: bool) {
        self.fill_rect(HAND_X, 0, HAND_W, STATUS_Y, PANEL_BG);

        let Some(hand) = app.hand() else {
            self.draw_label("NO HAND", HAND_X + HAND_W / 2 - 56, INDICATOR_Y / 2, 4, 0xFF555577);
            return;
        };

        let pixels = hand.pixel_landmarks(HAND_W as f32, INDICATOR_Y as f32);

        if show_landmarks {
            for &(px, py) in &pixels {
                self.fill_rect(HAND_X + px as usize, py as usize, 3, 3, DOT_COLOR);
            }
        }

        // Raised fingertips get a filled diamond in their mapped color.
        for &finger in app.raised().fingers() {
            let (px, py) = pixels[finger.tip_index()];
            let cx = HAND_X + px as usize;
            let cy = py as usize;
            self.draw_diamond(cx, cy, 7, entry_for(finger).argb);
            self.draw_label(&finger.initial().to_string(), cx + 12, cy.saturating_sub(4), 2, 0xFFFFFFFF);
        }
    }

    // ── per-finger indicator row ──────────────────────────────────────────

    fn draw_indicators(&mut self, app: &AppState) {
        const PAD: usize = 14;
        const GAP: usize = 10;
        let cell_w = (HAND_W - 2 * PAD - 4 * GAP) / 5;
        let cell_h = 48;
        let y = INDICATOR_Y + 8;

        for (i, finger) in Finger::ALL.into_iter().enumerate() {
            let x = HAND_X + PAD + i * (cell_w + GAP);
            let lit = app.raised().contains(finger);
            let fill = if lit { entry_for(finger).argb } else { CELL_DIM };
            self.fill_rect(x, y, cell_w, cell_h, fill);
            self.draw_border(x, y, cell_w, cell_h, 0xFF000000);

            let text_color = if lit { 0xFF000000 } else { 0xFF777799 };
            self.draw_label(
                &finger.initial().to_string(),
                x + cell_w / 2 - 3,
                y + cell_h / 2 - 5,
                2,
                text_color,
            );
        }
    }

    // ── primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h.saturating_sub(1), w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w.saturating_sub(1), y, 1, h, color);
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        let (cx, cy, r) = (cx as isize, cy as isize, r as isize);
        for dy in -r..=r {
            let half = r - dy.abs();
            for dx in -half..=half {
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 && (x as usize) < WIN_W && (y as usize) < WIN_H {
                    self.buf[y as usize * WIN_W + x as usize] = color;
                }
            }
        }
    }

    /// Render `text` with the 3×5 bitmap font at an integer pixel scale.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_settled_is_done() {
        let r = RevealAnimation::settled(0xFF112233);
        assert!(r.done());
        assert_eq!(r.row_color(0.0), 0xFF112233);
        assert_eq!(r.row_color(1.0), 0xFF112233);
    }

    #[test]
    fn reveal_wipes_top_down() {
        let mut r = RevealAnimation::settled(0xFF000001);
        r.restart(0xFF000001, 0xFF000002);
        for _ in 0..8 {
            r.tick();
        }
        assert!(!r.done());
        // Top rows already show the new color, bottom rows the old one.
        assert_eq!(r.row_color(0.0), 0xFF000002);
        assert_eq!(r.row_color(1.0), 0xFF000001);
    }

    #[test]
    fn reveal_completes() {
        let mut r = RevealAnimation::settled(0);
        r.restart(1, 2);
        for _ in 0..50 {
            r.tick();
        }
        assert!(r.done());
        assert_eq!(r.row_color(1.0), 2);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFFFFFFFF, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn blend_is_opaque() {
        let c = blend(0x00112233, 0x00445566, 0.5);
        assert_eq!(c >> 24, 0xFF);
    }

    #[test]
    fn glyphs_cover_status_characters() {
        // Every character the app can print must have a real glyph.
        let used = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#->(). =,:";
        for ch in used.chars() {
            if ch == ' ' {
                continue;
            }
            assert_ne!(
                char_glyph(ch),
                char_glyph('\u{7f}'),
                "missing glyph for {:?}",
                ch
            );
        }
    }
}
