//! Command-line front end for refreshing tracked Simplicity SDK files.
//!
//! The binary is a thin wrapper over [`run`]; everything here writes to a
//! caller-provided writer so the whole flow can be driven from tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sdksync_io_fs::conf::C_PHASE_HEADERS;
use sdksync_io_fs::{
    ReportSync, SpecResolvedPaths, SpecSyncOptions, SpecSyncPhase, derive_headers_phase,
    derive_libs_phase, emit_notice, resolve_paths, sync_phase,
};
use tracing_subscriber::EnvFilter;

/// Printed after every run, whichever phases ran.
pub const C_BANNER_CAUTION: &str = "
    ********************************************
    *** DO NOT COMMIT COPIED FILES RANDOMLY! ***
    ********************************************

 This tool does not parse the slcc trees for the files that are actually intended to be published!
";

/// Copy headers and prebuilt libraries from a local Simplicity SDK checkout,
/// refreshing only files that already exist in this project.
#[derive(Debug, Parser)]
#[command(name = "copy_local_sdk")]
#[command(about = "Refresh tracked SDK headers and blobs from a local Simplicity SDK")]
pub struct Cli {
    /// Path to the local Simplicity SDK
    #[arg(short = 's', long = "sdk")]
    pub sdk: PathBuf,

    /// Only copy headers
    #[arg(short = 'e', long = "headers-only", conflicts_with = "libs_only")]
    pub headers_only: bool,

    /// Only copy libraries into the blob staging area
    #[arg(short = 'l', long = "libs-only")]
    pub libs_only: bool,

    /// Project root holding `simplicity_sdk` and `zephyr/blobs` (defaults to
    /// the directory this tool is checked out in)
    #[arg(long = "project-root")]
    pub project_root: Option<PathBuf>,

    /// Report what would be copied without writing anything
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Suppress per-file copy/skip notices
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Also carry over timestamps and extended attributes
    #[arg(long = "preserve-metadata")]
    pub preserve_metadata: bool,

    /// Diagnostic log filter written to stderr (e.g. `debug`, `sdksync_io_fs=trace`)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    fn sync_options(&self) -> SpecSyncOptions {
        SpecSyncOptions {
            if_verbose: !self.quiet,
            if_dry_run: self.dry_run,
            if_preserve_metadata: self.preserve_metadata,
        }
    }

    /// Phases enabled by the mode flags, in run order.
    pub fn select_phases(&self, spec_paths: &SpecResolvedPaths) -> Vec<SpecSyncPhase> {
        let mut l_phases = Vec::with_capacity(2);
        if !self.libs_only {
            l_phases.push(derive_headers_phase(spec_paths));
        }
        if !self.headers_only {
            l_phases.push(derive_libs_phase(spec_paths));
        }
        l_phases
    }
}

/// Project root the tool belongs to: the parent of this workspace checkout.
pub fn derive_default_project_root() -> PathBuf {
    // <project>/<workspace>/crates/sdksync_cli
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(3)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Install the stderr `tracing` subscriber. Invalid filters fall back to `warn`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve paths, run the enabled phases, then print the summary and banner.
///
/// Returns one report per phase that ran, keyed by phase name. Output to
/// `writer` is best effort throughout; only resolution and copy failures
/// end the run with an error.
pub fn run<W: Write>(cli: &Cli, writer: &mut W) -> Result<Vec<(String, ReportSync)>> {
    let path_dir_project = cli
        .project_root
        .clone()
        .unwrap_or_else(derive_default_project_root);
    let spec_paths = resolve_paths(&cli.sdk, &path_dir_project)?;
    let spec_sync_options = cli.sync_options();

    let mut l_reports = Vec::new();
    for spec_phase in cli.select_phases(&spec_paths) {
        if spec_phase.name == C_PHASE_HEADERS {
            emit_notice(
                writer,
                format_args!("Copy SDK headers from {}", spec_paths.path_dir_sdk.display()),
            );
        } else {
            emit_notice(writer, format_args!("Copy SDK libraries to local blobs"));
        }
        tracing::info!(
            phase = %spec_phase.name,
            dst = %spec_phase.path_dir_dst.display(),
            n_patterns = spec_phase.patterns.len(),
            "starting phase"
        );
        let report = sync_phase(
            &spec_paths.path_dir_sdk,
            &spec_phase,
            &spec_sync_options,
            writer,
        )
        .with_context(|| format!("{} phase failed", spec_phase.name))?;
        l_reports.push((spec_phase.name, report));
    }

    emit_notice(writer, format_args!("Done"));
    for (name, report) in &l_reports {
        emit_notice(writer, format_args!("{}", report.format(&format!("[{name}]"))));
    }
    emit_notice(writer, format_args!("{C_BANNER_CAUTION}"));
    Ok(l_reports)
}
