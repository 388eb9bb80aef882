#![allow(non_snake_case)]
use RustedIntegrals::Utils::logger::init_logger;
use RustedIntegrals::config::AppConfig;
use RustedIntegrals::server;
use RustedIntegrals::solver::integral_solver::IntegralSolver;
use RustedIntegrals::solver::rules::{examples_table, rules_table, run_examples};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rusted-integrals",
    version,
    about = "Indefinite integrals with the method name and solution steps",
    long_about = "Solves indefinite integrals of single-variable expressions such as x^2, sin(x) or x*exp(x). \
                  Runs as a web service (default) or solves from the command line.\n\n\
                  Environment: PORT, HOST, LOG_LEVEL, LOG_FILE override the config file."
)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Start the HTTP server
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        host: Option<String>,
    },
    /// Solve one integral and print the result
    Solve {
        /// expression to integrate, e.g. "x^2" or "∫ x*sin(x) dx"
        expression: String,
        /// integration variable
        #[arg(long, default_value = "x")]
        var: String,
        /// print the JSON response instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the table of integration rules
    Rules,
    /// Solve the example problems
    Examples,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Serve {
        port: None,
        host: None,
    });

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config
        .apply_env_overrides(|key| std::env::var(key).ok())
        .context("invalid environment variable")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    let mut level = config.log_level()?;
    // one-shot commands keep the terminal quiet unless asked otherwise
    if !matches!(command, Command::Serve { .. }) && cli.log_level.is_none() {
        level = level.min(LevelFilter::Warn);
    }
    init_logger(level, config.logging.file.as_deref()).context("failed to create log file")?;

    match command {
        Command::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start tokio runtime")?;
            runtime
                .block_on(server::run(&config, IntegralSolver::new()))
                .with_context(|| format!("server on {} failed", config.address()))?;
        }
        Command::Solve {
            expression,
            var,
            json,
        } => {
            let solver = IntegralSolver::with_variable(&var);
            let result = solver.solve_integral(&expression);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.success {
                println!("Input:  {}", result.input.unwrap_or_default());
                if let Some(method) = result.method {
                    println!("Method: {}", method);
                }
                println!("Result: {}", result.result.unwrap_or_default());
                for (i, step) in result.steps.unwrap_or_default().iter().enumerate() {
                    println!("  {}. {}", i + 1, step);
                }
            }
            if !result.success {
                bail!(
                    "{} ({})",
                    result.error.unwrap_or_default(),
                    result.details.unwrap_or_default()
                );
            }
        }
        Command::Rules => {
            println!("Integration Rules\n");
            println!("{}", rules_table());
        }
        Command::Examples => {
            let solver = IntegralSolver::new();
            println!("Example Problems\n");
            println!("{}", examples_table(&run_examples(&solver)));
        }
    }
    Ok(())
}
