//! ring-runner: headless runner for the ringwatch pipeline.
//!
//! Usage:
//!   ring-runner --seed 12345 --accounts 120 --transactions 900 --sensitivity 1.2
//!   ring-runner --config desk.json --json
//!   ring-runner --seed 12345 --ipc-mode

use anyhow::Result;
use ringwatch_core::{
    config::{DeskConfig, GeneratorParams},
    desk::Desk,
    view::{format_currency, DeskView, Severity},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Generate {
        accounts: usize,
        transactions: usize,
    },
    Analyze {
        sensitivity: f64,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    run_id: String,
    generation: u64,
    sensitivity: f64,
    view: DeskView,
}

#[derive(serde::Serialize)]
struct RunReport<'a> {
    run_id: &'a str,
    generated_at: String,
    seed: u64,
    accounts: usize,
    transactions: usize,
    sensitivity: f64,
    view: DeskView,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json = args.iter().any(|a| a == "--json");

    let run_id = format!("run-{}-{}", config.seed, uuid::Uuid::new_v4().simple());

    if !ipc_mode && !json {
        println!("ringwatch — ring-runner");
        println!("  seed:         {}", config.seed);
        println!("  accounts:     {}", config.generator.account_count);
        println!("  transactions: {}", config.generator.transaction_count);
        println!("  sensitivity:  {:.1}", config.sensitivity);
        println!();
    }

    let mut desk = Desk::bootstrap(run_id, config)?;

    if ipc_mode {
        run_ipc_loop(&mut desk)?;
    } else if json {
        print_json_report(&desk)?;
    } else {
        print_summary(&desk)?;
    }

    Ok(())
}

/// Config file first (if any), then individual flags on top.
fn build_config(args: &[String]) -> Result<DeskConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => DeskConfig::load(Path::new(path))?,
        None => DeskConfig::default(),
    };

    config.seed = parse_arg(args, "--seed", config.seed);
    config.generator.account_count =
        parse_arg(args, "--accounts", config.generator.account_count);
    config.generator.transaction_count =
        parse_arg(args, "--transactions", config.generator.transaction_count);
    config.sensitivity = parse_arg(args, "--sensitivity", config.sensitivity);

    config.validate()?;
    Ok(config)
}

fn run_ipc_loop(desk: &mut Desk) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    // Initial state so the front end can draw before the first command.
    writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(desk)?)?)?;
    stdout.flush()?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unparseable command: {}", buffer.trim());
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::Generate { accounts, transactions } => {
                let params = GeneratorParams {
                    account_count: accounts,
                    transaction_count: transactions,
                    layout: desk.config().generator.layout,
                };
                desk.generate(params).map(|_| ())
            }
            IpcCommand::Analyze { sensitivity } => desk.analyze(sensitivity).map(|_| ()),
        };

        // A rejected command is reported; the session carries on unchanged.
        match outcome {
            Ok(()) => {
                let state = build_ui_state(desk)?;
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
                stdout.flush()?;
            }
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn build_ui_state(desk: &Desk) -> Result<UiState> {
    Ok(UiState {
        run_id: desk.run_id.clone(),
        generation: desk.generation(),
        sensitivity: desk.analysis().sensitivity,
        view: desk.view()?,
    })
}

fn print_json_report(desk: &Desk) -> Result<()> {
    let config = desk.config();
    let report = RunReport {
        run_id: &desk.run_id,
        generated_at: chrono::Utc::now().to_rfc3339(),
        seed: config.seed,
        accounts: config.generator.account_count,
        transactions: config.generator.transaction_count,
        sensitivity: config.sensitivity,
        view: desk.view()?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_summary(desk: &Desk) -> Result<()> {
    let view = desk.view()?;
    let summary = &view.summary;

    println!("=== RUN SUMMARY ===");
    println!("  run_id:            {}", desk.run_id);
    println!("  edges drawn:       {}", view.graph.edges.len());
    println!("  flagged accounts:  {}", summary.flagged_count);
    println!("  estimated rings:   {}", summary.ring_count);
    println!("  suspicious volume: {}", summary.suspicious_volume_label);

    println!();
    println!("=== TOP FLAGGED ===");
    if view.details.is_empty() {
        println!("  (No accounts above threshold)");
    } else {
        for row in &view.details {
            let marker = match row.severity {
                Severity::High => "!!",
                Severity::Elevated => " !",
            };
            println!(
                "  {marker} {} | score {:.1} | volume {} | in {} / out {}",
                row.id,
                row.score,
                format_currency(row.volume),
                row.incoming,
                row.outgoing
            );
        }
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
