//! Interactive explorer for the raised-finger classifier.
//! Type finger initials to build a pose and see how it classifies.

use hand_frame::{Finger, RaisedSet, synthetic_pose, RAISED_MARGIN};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           Raised-Finger Classifier Explorer          ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Enter finger initials to raise (e.g. \"ip\" = index+pinky),");
    println!("  an empty line for a flat hand, or q to quit.");
    println!();

    loop {
        let line = read_line("Fingers [T/I/M/R/P]: ");
        let trimmed = line.trim();

        if trimmed.eq_ignore_ascii_case("q") {
            println!("\nGoodbye!\n");
            break;
        }

        let mut pose = Vec::new();
        let mut bad = false;
        for ch in trimmed.chars() {
            let finger = match ch.to_ascii_uppercase() {
                'T' => Finger::Thumb,
                'I' => Finger::Index,
                'M' => Finger::Middle,
                'R' => Finger::Ring,
                'P' => Finger::Pinky,
                _   => { println!("  ⚠  Unknown finger '{}'. Use T/I/M/R/P.\n", ch); bad = true; break; }
            };
            if !pose.contains(&finger) {
                pose.push(finger);
            }
        }
        if bad { continue; }

        let hand = synthetic_pose(&pose);
        let raised = RaisedSet::classify(&hand, RAISED_MARGIN);

        println!();
        println!("  ┌─ classification (margin {}) ─", RAISED_MARGIN);
        for finger in Finger::ALL {
            let tip = hand.tip(finger);
            let pip = hand.pip(finger);
            println!(
                "  │  {:6}  tip.y={:.2}  pip.y={:.2}  {}",
                finger.name(),
                tip.y,
                pip.y,
                if raised.contains(finger) { "RAISED" } else { "-" },
            );
        }
        match raised.dominant() {
            Some(f) => println!("  └─ dominant: {}", f.name()),
            None    => println!("  └─ dominant: none"),
        }
        println!();
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
