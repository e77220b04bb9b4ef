//! Pattern expansion and existence-gated copy.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::report::{ReportSync, ReportSyncBuilder};
use crate::spec::{EnumSyncAction, SpecSyncOptions, SpecSyncPhase, SyncError};
use crate::util::{
    SpecSourcePattern, collect_matching_files, copy_file_with_metadata, derive_destination_path,
    is_same_file,
};

struct SpecSyncContext<'a, W: Write> {
    path_dir_src: &'a Path,
    path_dir_dst: &'a Path,
    spec_sync_options: &'a SpecSyncOptions,
    builder_sync_report: ReportSyncBuilder,
    writer: &'a mut W,
}

/// Refresh files under `dir_destination` from `dir_source`.
///
/// Every pattern is expanded against `dir_source` in order. A matched file is
/// copied onto `dir_destination/<relative path>` only if that destination
/// already exists at the moment it is visited; otherwise it is skipped. No file
/// or directory is ever created under `dir_destination`.
///
/// With `if_verbose`, one notice per match is written to `writer`:
/// `Skipping <src>` or `Copy <src> to <dst>` (the latter before the bytes move).
///
/// Returns [`SyncError`] on the first malformed pattern, unreadable source
/// directory, destination that is the source file itself, or failed copy. Copies done before the failure are kept.
pub fn copy_selected<P, Q, S, W>(
    dir_source: P,
    dir_destination: Q,
    patterns: &[S],
    spec_sync_options: &SpecSyncOptions,
    writer: &mut W,
) -> Result<ReportSync, SyncError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<str>,
    W: Write,
{
    let mut spec_sync_ctx = SpecSyncContext {
        path_dir_src: dir_source.as_ref(),
        path_dir_dst: dir_destination.as_ref(),
        spec_sync_options,
        builder_sync_report: ReportSyncBuilder::default(),
        writer,
    };

    for pattern in patterns {
        let c_pattern: &str = pattern.as_ref();
        let spec_pattern = SpecSourcePattern::compile(c_pattern)?;
        let l_files_src = collect_matching_files(spec_sync_ctx.path_dir_src, &spec_pattern)?;
        tracing::debug!(
            pattern = c_pattern,
            n_matched = l_files_src.len(),
            "expanded pattern"
        );
        for path_file_src in l_files_src {
            handle_matched_file(path_file_src, &mut spec_sync_ctx)?;
        }
    }

    Ok(spec_sync_ctx.builder_sync_report.build())
}

/// Run one [`SpecSyncPhase`] against the SDK root.
pub fn sync_phase<P, W>(
    dir_source: P,
    spec_phase: &SpecSyncPhase,
    spec_sync_options: &SpecSyncOptions,
    writer: &mut W,
) -> Result<ReportSync, SyncError>
where
    P: AsRef<Path>,
    W: Write,
{
    let report = copy_selected(
        dir_source,
        &spec_phase.path_dir_dst,
        spec_phase.patterns.as_slice(),
        spec_sync_options,
        writer,
    )?;
    tracing::info!(phase = %spec_phase.name, "{}", report.format("[SYNC]"));
    Ok(report)
}

fn handle_matched_file<W: Write>(
    path_file_src: PathBuf,
    spec_sync_ctx: &mut SpecSyncContext<'_, W>,
) -> Result<(), SyncError> {
    let path_file_dst = derive_destination_path(
        &path_file_src,
        spec_sync_ctx.path_dir_src,
        spec_sync_ctx.path_dir_dst,
    );
    let if_verbose = spec_sync_ctx.spec_sync_options.if_verbose;

    if !path_file_dst.exists() {
        if if_verbose {
            emit_notice(
                spec_sync_ctx.writer,
                format_args!("Skipping {}", path_file_src.display()),
            );
        }
        tracing::debug!(src = %path_file_src.display(), "destination untracked, skipped");
        spec_sync_ctx.builder_sync_report.add_decision(
            path_file_src,
            path_file_dst,
            EnumSyncAction::Skipped,
        );
        return Ok(());
    }

    if !path_file_dst.is_file() {
        return Err(SyncError::DestinationNotFile(path_file_dst));
    }

    // Copying a file onto itself truncates it before the read.
    let b_same_file = is_same_file(&path_file_src, &path_file_dst).map_err(|e| {
        SyncError::CopyFailed {
            src: path_file_src.clone(),
            dst: path_file_dst.clone(),
            source: e,
        }
    })?;
    if b_same_file {
        return Err(SyncError::SameFile {
            src: path_file_src,
            dst: path_file_dst,
        });
    }

    if spec_sync_ctx.spec_sync_options.if_dry_run {
        if if_verbose {
            emit_notice(
                spec_sync_ctx.writer,
                format_args!(
                    "Would copy {} to {}",
                    path_file_src.display(),
                    path_file_dst.display()
                ),
            );
        }
        spec_sync_ctx.builder_sync_report.add_decision(
            path_file_src,
            path_file_dst,
            EnumSyncAction::Planned,
        );
        return Ok(());
    }

    if if_verbose {
        emit_notice(
            spec_sync_ctx.writer,
            format_args!(
                "Copy {} to {}",
                path_file_src.display(),
                path_file_dst.display()
            ),
        );
    }
    copy_file_with_metadata(
        &path_file_src,
        &path_file_dst,
        spec_sync_ctx.spec_sync_options.if_preserve_metadata,
    )
    .map_err(|e| SyncError::CopyFailed {
        src: path_file_src.clone(),
        dst: path_file_dst.clone(),
        source: e,
    })?;
    tracing::debug!(
        src = %path_file_src.display(),
        dst = %path_file_dst.display(),
        "copied"
    );
    spec_sync_ctx.builder_sync_report.add_decision(
        path_file_src,
        path_file_dst,
        EnumSyncAction::Copied,
    );
    Ok(())
}

/// Write one line of user-facing output.
///
/// Output is best effort: a failed write is logged and never aborts a sync.
pub fn emit_notice<W: Write>(writer: &mut W, args: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(writer, "{args}") {
        tracing::warn!("failed to write notice: {e}");
    }
}
