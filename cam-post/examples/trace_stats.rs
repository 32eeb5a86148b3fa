//! Standalone trace inspector
//!
//! Parses a trace file, prints how often each event occurs, then posts the
//! rapid and linear moves it contains.
//!
//! Usage:
//!   trace_stats <job.trace> [--limit <count>]

use cam_post::{BuilderConfig, Emit, Position, Program, TraceParser};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <job.trace> [--limit <count>]", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let limit = args
        .iter()
        .position(|a| a == "--limit")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10);

    let text = std::fs::read_to_string(&path)?;
    let events = TraceParser::parse(&text);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in &events {
        *counts.entry(event.name.as_str()).or_default() += 1;
    }

    println!("=== {} ===", path.display());
    println!("Events: {}", events.len());
    println!("Distinct names: {}", counts.len());

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    println!("\nMost frequent:");
    for (name, count) in sorted.iter().take(limit) {
        println!("  {}: {}", name, count);
    }

    let mut program = Program::new(BuilderConfig::new());
    program.load_events(events.clone());
    program.on("RapidMove", |ctx, params, _| {
        ctx.rapid(Position::from_parameters(params), Emit::new());
        Ok(())
    });
    program.on("LinearMove", |ctx, params, _| {
        ctx.line(Position::from_parameters(params), Emit::new());
        Ok(())
    });
    program.process()?;

    println!("\nMoves:");
    for file in program.generate() {
        println!("{}", file.text);
    }

    Ok(())
}
