//! # Console Host Daemon
//!
//! Runs a key script against the console and prints the final frame.

use console_host::{HostRuntime, HostRuntimeConfig};
use std::env;
use std::path::Path;
use std::process;

struct Options {
    config: HostRuntimeConfig,
    dump_log: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("consoled");

    let options = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(options.config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let frame = runtime.run();
    print!("{}", frame);

    if options.dump_log {
        println!("--- log ---");
        for line in runtime.log_lines() {
            println!("{}", line);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config: HostRuntimeConfig::default(),
        dump_log: false,
    };
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--script" | "-s" => {
                let path = value_for(args, &mut i, "--script")?;
                options
                    .config
                    .load_script(Path::new(path))
                    .map_err(|e| e.to_string())?;
            }
            "--settings" => {
                let path = value_for(args, &mut i, "--settings")?;
                options
                    .config
                    .load_settings(Path::new(path))
                    .map_err(|e| e.to_string())?;
            }
            "--max-steps" => {
                let value = value_for(args, &mut i, "--max-steps")?;
                options.config.max_steps = value
                    .parse()
                    .map_err(|_| format!("Invalid max-steps value: {}", value))?;
            }
            "--dump-log" => {
                options.dump_log = true;
            }
            "--help" | "-h" => {
                print_usage(args.first().map(String::as_str).unwrap_or("consoled"));
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn value_for<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --script <FILE>      Key script to play");
    eprintln!("  --settings <FILE>        Settings overrides (JSON)");
    eprintln!("  --max-steps <N>          Maximum ticks to run (0 = unlimited)");
    eprintln!("  --dump-log               Print collected log entries after the frame");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --script console_host/scripts/give_sword.keys", program);
    eprintln!("  {} --script session.keys --settings console.json --dump-log", program);
}
