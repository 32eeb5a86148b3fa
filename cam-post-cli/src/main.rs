//! CAM Post CLI Application
//!
//! This is the command-line interface for the CAM trace post-processor.
//! It uses the cam-post library and adds:
//! - Reading trace files and writing program files
//! - TOML configuration
//! - A standard set of listeners for common trace events
//! - Event inspection (list / JSON dump)

use anyhow::{Context, Result};
use cam_post::{Program, TraceParser};
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;

mod config;
mod output;
mod post;

/// CAM Post - Turn CAM trace logs into machine-control programs
#[derive(Parser, Debug)]
#[command(name = "cam-post-cli")]
#[command(about = "Post-process CAM trace logs into numbered G-code programs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the trace file to post-process
    #[arg(short, long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Directory for generated files (default: stdout)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Name of the main program file
    #[arg(long, value_name = "NAME")]
    main_name: Option<String>,

    /// Disable N line numbers
    #[arg(long)]
    no_numbering: bool,

    /// First line number
    #[arg(long, value_name = "N")]
    start: Option<u64>,

    /// Line number increment
    #[arg(long, value_name = "N")]
    increment: Option<u64>,

    /// Only list the parsed event names
    #[arg(long)]
    list_events: bool,

    /// Only print the parsed events as JSON
    #[arg(long)]
    dump_events: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAM Post CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using post library v{}", cam_post::VERSION);

    let Some(trace_path) = &args.trace else {
        // No input - show help
        println!("CAM Post - No trace file specified");
        println!("\nQuick Start:");
        println!("  cam-post-cli --trace job.trace");
        println!("  cam-post-cli --trace job.trace --output out/");
        println!("\nInspect a trace:");
        println!("  cam-post-cli --trace job.trace --list-events");
        println!("\nUse --help for more options");
        return Ok(());
    };

    let text = fs::read_to_string(trace_path)
        .with_context(|| format!("Failed to read trace file: {:?}", trace_path))?;

    if args.list_events || args.dump_events {
        inspect_mode(&args, &text)
    } else {
        post_mode(&args, &text)
    }
}

/// Inspect mode - parse the trace and print what was found
fn inspect_mode(args: &Args, text: &str) -> Result<()> {
    let events = TraceParser::parse(text);

    if args.dump_events {
        let json = serde_json::to_string_pretty(&events).context("Failed to serialize events")?;
        println!("{}", json);
    } else {
        for event in &events {
            println!("{:>6}  {}", event.index, event.name);
        }
    }

    Ok(())
}

/// Post mode - load config, run the standard listeners, write the program
fn post_mode(args: &Args, text: &str) -> Result<()> {
    let app_config = resolve_config(args)?;
    log::debug!("Configuration: {:?}", app_config);

    let mut program = Program::new(app_config.builder_config());
    post::register_standard_listeners(&mut program, &app_config.post);
    program.load_trace(text);

    let unhandled: Vec<&str> = program
        .list_events()
        .into_iter()
        .filter(|name| program.registry().count(name) == 0)
        .collect();
    if !unhandled.is_empty() {
        log::warn!("{} events have no listener and will be skipped", unhandled.len());
        log::debug!("Unhandled events: {:?}", unhandled);
    }

    program.process().context("Post-processing failed")?;
    let files = program.generate();

    match &app_config.output.directory {
        Some(directory) => {
            let written = output::write_files(&files, directory, &app_config.output.extension)?;
            log::info!("Generated {} file(s)", written.len());
        }
        None => {
            let stdout = io::stdout();
            output::print_files(&files, &mut stdout.lock())?;
        }
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied
fn resolve_config(args: &Args) -> Result<config::AppConfig> {
    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };

    if let Some(directory) = &args.output {
        app_config.output.directory = Some(directory.clone());
    }
    if let Some(name) = &args.main_name {
        app_config.output.main_file_name = name.clone();
    }
    if args.no_numbering {
        app_config.numbering.enabled = false;
    }
    if let Some(start) = args.start {
        app_config.numbering.start = start;
    }
    if let Some(increment) = args.increment {
        app_config.numbering.increment = increment;
    }

    app_config.validate()?;
    Ok(app_config)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "cam-post-cli",
            "--trace",
            "job.trace",
            "--no-numbering",
            "--start",
            "1",
            "--main-name",
            "O42",
            "--output",
            "out",
        ]);

        let config = resolve_config(&args).unwrap();
        assert!(!config.numbering.enabled);
        assert_eq!(config.numbering.start, 1);
        assert_eq!(config.output.main_file_name, "O42");
        assert_eq!(config.output.directory, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = Args::parse_from(["cam-post-cli", "--increment", "0"]);
        assert!(resolve_config(&args).is_err());
    }
}
