use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use launchpad::config::Config;
use launchpad::hierarchy::{self, document, AssembledOrg};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Assemble GCP organization hierarchies declared in YAML
#[derive(Parser, Debug)]
#[command(name = "launchpad", version = launchpad::VERSION, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the assembled hierarchy as indented text
    Dump {
        /// YAML files or directories (defaults to the inputs of the last run)
        paths: Vec<PathBuf>,

        /// Spaces per hierarchy level
        #[arg(long)]
        indent: Option<usize>,
    },
    /// Write the assembled hierarchy as a Graphviz DOT diagram
    Draw {
        /// YAML files or directories (defaults to the inputs of the last run)
        paths: Vec<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("launchpad started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("launchpad").join("launchpad.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".launchpad").join("launchpad.log");
    }
    PathBuf::from("launchpad.log")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    let paths = match args.command {
        Command::Dump { paths, indent } => {
            let paths = effective_paths(&config, &paths)?;
            let assembled = assemble(&paths)?;
            let mut stdout = io::stdout().lock();
            assembled
                .dump(config.effective_indent(indent), &mut stdout)
                .context("Failed to print hierarchy")?;
            stdout.flush()?;
            paths
        }
        Command::Draw { paths, output } => {
            let paths = effective_paths(&config, &paths)?;
            let diagram = assemble(&paths)?.draw();
            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    diagram
                        .write_dot(&mut file)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Diagram written to {:?}", path);
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    diagram
                        .write_dot(&mut stdout)
                        .context("Failed to print diagram")?;
                    stdout.flush()?;
                }
            }
            paths
        }
    };

    if let Err(e) = config.set_last_paths(&paths) {
        tracing::warn!("Failed to save config: {}", e);
    }

    Ok(())
}

fn effective_paths(config: &Config, cli_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let paths = config.effective_paths(cli_paths);
    if paths.is_empty() {
        bail!("No input given. Pass YAML files or directories to assemble");
    }
    Ok(paths)
}

fn assemble(paths: &[PathBuf]) -> Result<AssembledOrg> {
    tracing::info!("Loading declarations from {:?}", paths);
    let declarations = document::load_paths(paths).context("Failed to load declarations")?;
    hierarchy::build(declarations)
        .with_context(|| format!("Failed to assemble hierarchy from {}", describe(paths)))
}

fn describe(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
