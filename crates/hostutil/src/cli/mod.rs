//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use hostutil_common::config::{EINVAL, parse_mode};
use hostutil_common::{HostutilResult, MountConfig};

use crate::mount::Mounter;

/// hostutil - host filesystem and bind-mount utilities
#[derive(Parser)]
#[command(name = "hostutil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable table.
    Table,
    /// Pretty printed JSON.
    Json,
}

/// Helper commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Bind mount source directories under a target root (last argument)
    Bind {
        /// Source directories followed by the target root
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Mode (octal) for mount points that have to be created
        #[arg(long, env = "HOSTUTIL_DIR_MODE", value_parser = parse_octal)]
        dir_mode: Option<u32>,
    },

    /// Unmount a single mount point
    Unmount {
        /// Mount point
        mountpoint: PathBuf,
    },

    /// Unmount every directory directly under a root
    UnmountAll {
        /// Target root
        root: PathBuf,

        /// OS error code to read as "not mounted" (repeatable)
        #[arg(long = "benign-errno", default_values_t = [EINVAL])]
        benign_errnos: Vec<i32>,
    },

    /// Show usage of the filesystem holding a path
    Usage {
        /// Any path on the filesystem
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the apparent size of a directory tree in bytes
    Du {
        /// File or directory
        path: PathBuf,
    },

    /// List a directory
    Ls {
        /// Directory to list
        dir: PathBuf,

        /// Only list directories
        #[arg(short, long, conflicts_with = "absolute")]
        dirs: bool,

        /// Print absolute paths
        #[arg(short, long)]
        absolute: bool,
    },

    /// Create a file and reserve space for it
    Fallocate {
        /// File to create
        file: PathBuf,

        /// Bytes to reserve
        #[arg(short, long)]
        size: u64,

        /// Permission mode (octal)
        #[arg(short, long, default_value = "644", value_parser = parse_octal)]
        mode: u32,

        /// Truncate an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Resolve symlinks in paths
    Resolve {
        /// Paths to resolve
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Check whether a file (or, with --dir, a directory) exists
    Exists {
        /// Path to check
        path: PathBuf,

        /// Expect a directory instead of a file
        #[arg(long)]
        dir: bool,
    },
}

fn parse_octal(raw: &str) -> std::result::Result<u32, String> {
    parse_mode(raw).map_err(|e| e.to_string())
}

fn report<T>(result: HostutilResult<T>, action: &str) -> Result<T> {
    result.map_err(|e| eyre!("Failed to {}: {}", action, e))
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Bind { paths, dir_mode } => {
                let mut config = MountConfig::default();
                if let Some(mode) = dir_mode {
                    config = config.with_dir_mode(mode);
                }
                report(
                    Mounter::with_config(config).bind_mount_all(&paths),
                    "bind mount",
                )?;
                if let Some(root) = paths.last() {
                    println!(
                        "Bound {} directories under {}",
                        paths.len() - 1,
                        root.display()
                    );
                }
                Ok(())
            }

            Commands::Unmount { mountpoint } => {
                report(Mounter::new().unmount(&mountpoint), "unmount")?;
                println!("Unmounted {}", mountpoint.display());
                Ok(())
            }

            Commands::UnmountAll {
                root,
                benign_errnos,
            } => {
                let config = MountConfig::default().with_benign_unmount_errnos(benign_errnos);
                report(Mounter::with_config(config).unmount_all(&root), "unmount")?;
                println!("Unmounted everything under {}", root.display());
                Ok(())
            }

            Commands::Usage { path, format } => {
                let usage = report(crate::fs::fs_usage(&path), "read filesystem usage")?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&usage)?),
                    OutputFormat::Table => {
                        println!("PATH\tTOTAL\tUSED\tFREE\tUSE%\tINODES\tIUSE%");
                        println!(
                            "{}\t{}\t{}\t{}\t{:.1}\t{}\t{:.1}",
                            usage.path.display(),
                            usage.total,
                            usage.used,
                            usage.free,
                            usage.used_percent,
                            usage.inodes_total,
                            usage.inodes_used_percent
                        );
                    }
                }
                Ok(())
            }

            Commands::Du { path } => {
                let size = report(crate::fs::dir_size(&path), "compute size")?;
                println!("{}\t{}", size, path.display());
                Ok(())
            }

            Commands::Ls {
                dir,
                dirs,
                absolute,
            } => {
                if absolute {
                    for path in report(crate::fs::ls_names_abs(&dir), "list directory")? {
                        println!("{}", path.display());
                    }
                } else {
                    let names = if dirs {
                        crate::fs::ls_dirs(&dir)
                    } else {
                        crate::fs::ls_names(&dir)
                    };
                    for name in report(names, "list directory")? {
                        println!("{}", name.to_string_lossy());
                    }
                }
                Ok(())
            }

            Commands::Fallocate {
                file,
                size,
                mode,
                force,
            } => {
                report(crate::fs::fallocate(&file, size, mode, force), "allocate")?;
                println!("Reserved {} bytes for {}", size, file.display());
                Ok(())
            }

            Commands::Resolve { paths } => {
                let resolution = crate::fs::resolve_symlinks(&paths);
                for path in &resolution.paths {
                    println!("{}", path.display());
                }
                report(resolution.into_result(), "resolve symlinks")?;
                Ok(())
            }

            Commands::Exists { path, dir } => {
                let exists = if dir {
                    crate::fs::dir_exists(&path)
                } else {
                    crate::fs::file_exists(&path)
                };
                let exists = report(exists, "check path")?;
                println!("{exists}");
                if exists {
                    Ok(())
                } else {
                    Err(eyre!("{} does not exist", path.display()))
                }
            }
        }
    }
}
