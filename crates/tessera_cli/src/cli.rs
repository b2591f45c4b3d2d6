use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use tessera_renderer::{Integrator, ThreadCount, DEFAULT_TILE_SIZE};

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// What each camera ray evaluates to
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IntegratorArg {
    /// Full path tracing
    Path,
    /// Surface normals as colors
    Normals,
}

impl From<IntegratorArg> for Integrator {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Path => Integrator::Path,
            IntegratorArg::Normals => Integrator::Normals,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "tessera")]
#[command(about = "Tile-parallel path tracer for sphere scenes")]
pub struct Args {
    /// Output image (.bmp or .png)
    #[arg(default_value = "output.bmp")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 512)]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value_t = 32)]
    pub samples: u32,

    /// Maximum scatter events per path
    #[arg(long, default_value_t = 32)]
    pub max_bounces: u32,

    /// Edge length of the square render tiles
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Worker threads (default: hardware threads minus one)
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Fixed sampler seed for reproducible renders
    #[arg(long)]
    pub seed: Option<u64>,

    /// Shading mode
    #[arg(long, value_enum, default_value_t = IntegratorArg::Path)]
    pub integrator: IntegratorArg,

    /// JSON scene description (default: built-in showcase scene)
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Worker thread policy requested on the command line.
    pub fn thread_count(&self) -> ThreadCount {
        match self.threads {
            Some(n) => ThreadCount::Fixed(n),
            None => ThreadCount::Auto,
        }
    }
}
