use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ltl::{
    app::{App, Settings},
    generators::{Generator, SimultaneousConfig},
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Depth-first carving from the start cell
    #[value(alias = "b")]
    RecursiveBacktrack,
    /// Several agents carving in turn, orphans linked afterwards
    #[value(alias = "s")]
    Simultaneous,
}

impl From<Algorithm> for Generator {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::RecursiveBacktrack => Generator::RecurBacktrack,
            Algorithm::Simultaneous => Generator::Simultaneous,
        }
    }
}

/// Lost in the labyrinth: find the exit of a randomly generated maze.
///
/// Move with the arrow keys (or t, s, r, n for left, down, up, right) and
/// quit with q or Esc.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Board height in cells [default: fits the terminal]
    #[arg(short = 'H', long, value_parser = clap::value_parser!(i32).range(1..=1024))]
    height: Option<i32>,

    /// Board width in cells [default: fits the terminal]
    #[arg(short = 'W', long, value_parser = clap::value_parser!(i32).range(1..=1024))]
    width: Option<i32>,

    /// Let a robot find the exit, waiting LAG tenths of a second between steps
    #[arg(short, long, value_name = "LAG", num_args = 0..=1, default_missing_value = "1.0")]
    robot: Option<f32>,

    /// Maze generation algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::Simultaneous)]
    algorithm: Algorithm,

    /// Show the maze being carved
    #[arg(long)]
    animate: bool,

    /// Agents carving at the same time with the simultaneous algorithm
    #[arg(long, default_value_t = 4)]
    max_agents: usize,

    /// Walls an agent lineage may carve with the simultaneous algorithm
    #[arg(long, default_value_t = 128)]
    energy: u32,

    /// File receiving the logs
    #[arg(long, default_value = "ltl.log")]
    log_file: PathBuf,

    /// Random seed [default: drawn from the operating system]
    seed: Option<u64>,
}

impl Args {
    fn robot_lag(&self) -> anyhow::Result<Option<Duration>> {
        self.robot
            .map(|tenths| {
                Duration::try_from_secs_f32(tenths / 10.0)
                    .with_context(|| format!("invalid robot lag {}", tenths))
            })
            .transpose()
    }
}

/// Opens `path` for appending log lines, creating it if needed.
fn log_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log file {} has no valid file name", path.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&directory)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

/// Logs go to a file since the terminal shows the maze.
fn init_logging(path: &Path) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let appender = log_appender(path)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(&args.log_file)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let settings = Settings {
        height: args.height,
        width: args.width,
        generator: args.algorithm.into(),
        simultaneous: SimultaneousConfig {
            max_agents: args.max_agents,
            energy: args.energy,
        },
        seed,
        robot_lag: args.robot_lag()?,
        animate: args.animate,
    };
    tracing::info!("[main] starting with {:?}", settings);

    let app = App::new(settings);
    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(&mut stdout);
    App::restore_terminal(&mut stdout)?;

    let summary = result?;
    tracing::info!(
        "[main] done, reached: {}, steps: {}",
        summary.reached,
        summary.steps
    );
    println!("{}", summary);
    Ok(())
}
