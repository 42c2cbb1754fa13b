use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rosterqa_core::{canonicalize_headers, load_snapshot, normalize_whitespace};
use rosterqa_runner::{Config, Convention, Pipeline};
use rosterqa_validate::{default_rules, run_all};

#[derive(Parser)]
#[command(name = "rosterqa", version)]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "rosterqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default rosterqa.toml (refuses to overwrite)
    Init {
        #[arg(long, default_value = "data")]
        data_dir: String,
    },

    /// Validate config and data directory invariants
    Doctor,

    /// Run the three record rules against a single snapshot file
    Validate {
        #[arg(long)]
        file: PathBuf,
    },

    /// Full pipeline: select freshest pair, drift check, validate, report
    Run,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.cmd {
        Command::Init { data_dir } => {
            if cli.config.exists() {
                return Err(anyhow!("{} already exists", cli.config.display()));
            }
            Config::default_for(&data_dir).save_to(&cli.config)?;
            println!("wrote {}", cli.config.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Doctor => {
            let cfg = Config::load_from(&cli.config)?;
            doctor(&cfg)?;
            println!("OK");
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { file } => {
            let snap = load_snapshot(&file)?;
            let snap = normalize_whitespace(&canonicalize_headers(&snap));
            let reports = run_all(&default_rules(), &snap);

            let mut clean = true;
            for report in &reports {
                for finding in &report.findings {
                    println!("[{}] {}", finding.rule_id, finding.message);
                }
                clean &= report.passed();
            }
            if clean {
                println!("{} records, all rules passed", snap.row_count());
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Run => {
            let cfg = Config::load_from(&cli.config)?;
            let report = Pipeline::new(cfg).run()?;
            match report.outcome {
                rosterqa_runner::RunOutcome::Success => {
                    println!("run {}: success", report.run_id.as_str());
                    Ok(ExitCode::SUCCESS)
                }
                rosterqa_runner::RunOutcome::Failure { reason } => {
                    println!("run {}: failure ({reason})", report.run_id.as_str());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn doctor(cfg: &Config) -> Result<()> {
    let data_dir = cfg.data_dir();
    if !data_dir.is_dir() {
        return Err(anyhow!("data dir {} does not exist", data_dir.display()));
    }

    let mut candidates = 0usize;
    for entry in std::fs::read_dir(&data_dir)
        .with_context(|| format!("list {}", data_dir.display()))?
    {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(&format!(".{}", cfg.input.extension)) {
            candidates += 1;
            // One convention per invocation: a monthly run must be able to
            // date every candidate it will consider.
            if cfg.input.convention == Convention::Monthly {
                if let Err(err) = rosterqa_core::period_from_filename(name) {
                    return Err(anyhow!("undatable candidate {name:?}: {err}"));
                }
            }
        }
    }
    if candidates < 2 {
        return Err(anyhow!(
            "need at least 2 .{} snapshots in {}, found {candidates}",
            cfg.input.extension,
            data_dir.display()
        ));
    }
    Ok(())
}
