//! cam_swatch — interactive entry point.

use cam_swatch::app::{run, AppConfig, SourceKind};
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Cam Swatch — Finger-Painting Color Picker             ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let cfg = if args.is_empty() {
        configure_interactively()
    } else {
        match parse_args(&args) {
            Ok(cfg) => cfg,
            Err(msg) => {
                eprintln!("Error: {}", msg);
                eprintln!();
                eprintln!("Usage: cam_swatch [--quick] [--margin M] [--fps N]");
                eprintln!("                  [--no-landmarks] [--replay FILE]");
                eprintln!("                  [--detector CMD [ARGS...]]");
                std::process::exit(2);
            }
        }
    };

    match &cfg.source {
        SourceKind::Sim           => println!("  Mode: keyboard simulation"),
        SourceKind::Replay(path)  => println!("  Mode: replay from {:?}", path),
        SourceKind::Detector(cmd) => println!("  Mode: detector `{}`", cmd.join(" ")),
    }
    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<AppConfig, String> {
    let mut cfg = AppConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--quick" => {}
            "--no-landmarks" => cfg.show_landmarks = false,
            "--margin" => {
                i += 1;
                let raw = args.get(i).ok_or("--margin needs a value")?;
                let m: f32 = raw.parse().map_err(|_| format!("bad margin {:?}", raw))?;
                cfg.margin = m.clamp(0.01, 0.3);
            }
            "--fps" => {
                i += 1;
                let raw = args.get(i).ok_or("--fps needs a value")?;
                let f: u32 = raw.parse().map_err(|_| format!("bad fps {:?}", raw))?;
                cfg.fps = f.clamp(5, 120);
            }
            "--replay" => {
                i += 1;
                let raw = args.get(i).ok_or("--replay needs a file")?;
                cfg.source = SourceKind::Replay(PathBuf::from(raw));
            }
            "--detector" => {
                // Everything after the flag is the detector command line.
                let command: Vec<String> = args[i + 1..].to_vec();
                if command.is_empty() {
                    return Err("--detector needs a command".to_string());
                }
                cfg.source = SourceKind::Detector(command);
                break;
            }
            other => return Err(format!("unknown flag {:?}", other)),
        }
        i += 1;
    }
    Ok(cfg)
}

fn configure_interactively() -> AppConfig {
    let mut cfg = AppConfig::default();

    println!("  Frame source:");
    println!("    1. Keyboard simulation (no hardware needed)");
    println!("    2. Replay a recorded frame file");
    println!("    3. External detector subprocess");
    cfg.source = match read_line("  Choice (1-3, default 1): ").trim() {
        "2" => {
            let path = read_line("  Recording path: ");
            SourceKind::Replay(PathBuf::from(path.trim()))
        }
        "3" => {
            let cmd = read_line("  Detector command: ");
            let command: Vec<String> =
                cmd.trim().split_whitespace().map(str::to_string).collect();
            if command.is_empty() {
                println!("  ⚠  Empty command — falling back to simulation.");
                SourceKind::Sim
            } else {
                SourceKind::Detector(command)
            }
        }
        _ => SourceKind::Sim,
    };

    cfg.margin = {
        let m = read_line("  Raised-finger margin (default 0.05): ")
            .trim()
            .parse()
            .unwrap_or(cfg.margin);
        m.clamp(0.01, 0.3)
    };

    cfg.fps = {
        let f = read_line("  Frame rate (default 30): ")
            .trim()
            .parse()
            .unwrap_or(cfg.fps);
        f.clamp(5, 120)
    };

    cfg.show_landmarks = !read_line("  Draw all landmarks? (Y/n): ")
        .trim()
        .eq_ignore_ascii_case("n");

    cfg
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
