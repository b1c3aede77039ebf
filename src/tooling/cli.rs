//! CLI Tooling
//!
//! Command-line interface over a workspace's cook database: freshness checks,
//! dependency queries, record inspection, and a watch loop that reports
//! invalidated outputs.

use super::format::{format_path_list, format_record, format_verdict, format_versions};
use crate::config::{ConfigLoader, CookDbConfig};
use crate::database::CookDatabase;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::path::AssetPath;
use crate::store::DependencySpec;
use crate::types::{FileType, GameDirectory};
use crate::versions::Versions;
use crate::fs::{DiskFileSystem, FileSystem};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// cookdb - Cooked asset freshness tracking
#[derive(Parser)]
#[command(name = "cookdb")]
#[command(about = "Track which cooked assets are stale and why")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target platform (PC, IOS, Android, Linux)
    #[arg(long)]
    pub platform: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging settings from `config` with command-line overrides applied.
    pub fn logging_config(&self, config: &CookDbConfig) -> LoggingConfig {
        let mut logging = config.logging.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        logging
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a cooked output is up to date
    Check {
        /// Asset path, e.g. content://fx/bloom.fx
        path: String,
        /// List what changed
        #[arg(long)]
        details: bool,
    },
    /// List outputs that depend on a file or directory
    Deps {
        path: String,
    },
    /// Show the record of a cooked output
    Show {
        path: String,
    },
    /// Record what an output was cooked from
    Update {
        /// Output asset path
        path: String,
        /// Cooked timestamp; defaults to the cooked file's current one
        #[arg(long)]
        cooked_timestamp: Option<u64>,
        /// Source file dependency (repeatable)
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Cooked sibling dependency (repeatable)
        #[arg(long = "sibling")]
        siblings: Vec<String>,
        /// Directory dependency (repeatable)
        #[arg(long = "directory")]
        directories: Vec<String>,
    },
    /// Show cooker and per-type data versions
    Versions,
    /// Show the effective configuration
    Config,
    /// Watch the trees and report invalidated outputs
    Watch {
        /// Stop after this many seconds
        #[arg(long, default_value = "60")]
        seconds: u64,
        /// Poll interval for reporting in milliseconds
        #[arg(long, default_value = "250")]
        poll_ms: u64,
    },
}

/// CLI context for one workspace
pub struct CliContext {
    config: CookDbConfig,
}

fn parse_path(path: &str) -> Result<AssetPath, ApiError> {
    AssetPath::parse(path)
}

impl CliContext {
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        platform: Option<&str>,
    ) -> Result<Self, ApiError> {
        let mut config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        if let Some(platform) = platform {
            config.platform = platform.parse().map_err(ApiError::ConfigError)?;
        }
        Ok(Self { config })
    }

    pub fn from_config(config: CookDbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CookDbConfig {
        &self.config
    }

    fn open(&self, watch: bool) -> Result<CookDatabase, ApiError> {
        let config = CookDbConfig {
            watch,
            ..self.config.clone()
        };
        CookDatabase::from_config(&config)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Check { path, details } => {
                let output = parse_path(path)?;
                let db = self.open(false)?;
                let verdict = db.verdict(output);
                Ok(format_verdict(output, &verdict, *details))
            }
            Commands::Deps { path } => {
                let path = parse_path(path)?;
                let db = self.open(false)?;
                // Dependents are only known for records already loaded.
                self.load_records(&db);
                let mut dependents = Vec::new();
                db.get_dependents(path, &mut dependents);
                Ok(format_path_list(&format!("Dependents of {}", path), &dependents))
            }
            Commands::Show { path } => {
                let output = parse_path(path)?;
                let db = self.open(false)?;
                match db.record(output) {
                    Some(record) => Ok(format_record(output, &record)),
                    None => Err(ApiError::StorageError(crate::error::StorageError::NotFound(
                        output.record_path().cooked_relative(),
                    ))),
                }
            }
            Commands::Update {
                path,
                cooked_timestamp,
                sources,
                siblings,
                directories,
            } => {
                let output = parse_path(path)?;
                let mut specs = Vec::new();
                for s in sources {
                    specs.push(DependencySpec::source(parse_path(s)?));
                }
                for s in siblings {
                    specs.push(DependencySpec::sibling(parse_path(s)?));
                }
                for d in directories {
                    specs.push(DependencySpec::directory(parse_path(d)?));
                }
                let db = self.open(false)?;
                let cooked = match cooked_timestamp {
                    Some(ts) => *ts,
                    None => DiskFileSystem::new(&self.config.source_dir, &self.config.cooked_dir)
                        .modified_time_for_platform(self.config.platform, output)
                        .ok_or_else(|| {
                            ApiError::InvalidPath(format!("{} has not been cooked", output))
                        })?,
                };
                db.update_metadata(output, cooked, &specs)?;
                Ok(format!("Recorded {} with {} dependencies", output, specs.len()))
            }
            Commands::Versions => Ok(format_versions(&Versions::default())),
            Commands::Config => self.config.to_toml(),
            Commands::Watch { seconds, poll_ms } => self.watch(*seconds, *poll_ms),
        }
    }

    /// Load every persisted record of the platform so reverse lookups see
    /// the full graph.
    fn load_records(&self, db: &CookDatabase) {
        let disk = DiskFileSystem::new(&self.config.source_dir, &self.config.cooked_dir);
        let directories = GameDirectory::ALL
            .into_iter()
            .filter(|d| *d != GameDirectory::Unknown);
        for directory in directories {
            for file in disk.list_for_platform(self.config.platform, directory) {
                if let Some(output) = record_output(file) {
                    if db.record(output).is_none() {
                        debug!(output = %output, "Record file did not load");
                    }
                }
            }
        }
    }

    fn watch(&self, seconds: u64, poll_ms: u64) -> Result<String, ApiError> {
        let db = self.open(true)?;
        self.load_records(&db);
        let deadline = Instant::now() + Duration::from_secs(seconds);
        let poll = Duration::from_millis(poll_ms.max(10));
        let mut reported = 0usize;

        info!(platform = %db.platform(), seconds, "Watching for changes");
        while Instant::now() < deadline {
            std::thread::sleep(poll);
            for path in db.take_changed() {
                let dependents = db.dependents(path);
                reported += 1;
                println!("{}", format_path_list(&format!("{} changed; stale", path), &dependents));
            }
        }
        Ok(format!("Watched for {}s, {} changes", seconds, reported))
    }
}

/// Output path a record file belongs to, e.g. `fx/bloom.fxc.json` is the
/// record of `fx/bloom.fx`.
fn record_output(file: AssetPath) -> Option<AssetPath> {
    if file.file_type() != FileType::Json {
        return None;
    }
    let cooked = file.name();
    FileType::all()
        .iter()
        .copied()
        .filter(|t| *t != FileType::Unknown)
        .find_map(|t| {
            let stem = cooked.strip_suffix(t.cooked_extension())?;
            Some(AssetPath::new(file.directory(), t, stem))
        })
        .filter(|output| output.record_path() == file)
}
