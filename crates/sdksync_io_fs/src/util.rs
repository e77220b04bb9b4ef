use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher};

use crate::spec::SyncError;

const TUP_GLOB_META: [char; 5] = ['*', '?', '[', ']', '{'];

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

/// Compiled source pattern plus the directory the walk can start from.
#[derive(Debug, Clone)]
pub(crate) struct SpecSourcePattern {
    pub(crate) matcher: GlobMatcher,
    pub(crate) path_rel_prefix: PathBuf,
    /// Per-segment matchers up to the first `**` (all segments when there is none).
    pub(crate) l_segment_matchers: Vec<GlobMatcher>,
    /// Pattern holds `**`, so matches may sit at any depth.
    pub(crate) if_recursive: bool,
}

impl SpecSourcePattern {
    pub(crate) fn compile(pattern: &str) -> Result<Self, SyncError> {
        let c_pattern = pattern.trim_start_matches("./");
        if c_pattern.is_empty() || Path::new(c_pattern).is_absolute() {
            return Err(SyncError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern must be a non-empty path relative to the source root".to_string(),
            });
        }

        // `*` must stay inside one segment; only `**` crosses directories.
        let matcher = GlobBuilder::new(c_pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| SyncError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.kind().to_string(),
            })?
            .compile_matcher();

        let (l_segment_matchers, if_recursive) = compile_segment_matchers(c_pattern);
        Ok(Self {
            matcher,
            path_rel_prefix: derive_literal_prefix(c_pattern),
            l_segment_matchers,
            if_recursive,
        })
    }

    pub(crate) fn is_match(&self, path_rel: &Path) -> bool {
        self.matcher.is_match(path_rel)
    }

    /// Whether a file matching the pattern can live under `path_rel_dir`.
    ///
    /// Without `**`, a directory is reachable only when it is shallower than
    /// the pattern and each component matches the segment at its depth.
    pub(crate) fn can_descend(&self, path_rel_dir: &Path) -> bool {
        let l_components: Vec<_> = path_rel_dir.components().collect();
        if !self.if_recursive && l_components.len() >= self.l_segment_matchers.len() {
            return false;
        }
        l_components
            .iter()
            .zip(&self.l_segment_matchers)
            .all(|(part, matcher)| matcher.is_match(part.as_os_str()))
    }
}

fn compile_segment_matchers(pattern: &str) -> (Vec<GlobMatcher>, bool) {
    let mut l_segment_matchers = Vec::new();
    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        if segment.contains("**") {
            return (l_segment_matchers, true);
        }
        match Glob::new(segment) {
            Ok(glob) => l_segment_matchers.push(glob.compile_matcher()),
            // Alternations spanning `/` cannot be split; walk everything.
            Err(_) => return (Vec::new(), true),
        }
    }
    (l_segment_matchers, false)
}

/// Leading directory segments of `pattern` that hold no glob metacharacters.
///
/// The final segment is never part of the prefix, so `a/b/c.h` yields `a/b`.
pub(crate) fn derive_literal_prefix(pattern: &str) -> PathBuf {
    let l_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let Some((_, l_dirs)) = l_segments.split_last() else {
        return PathBuf::new();
    };

    l_dirs
        .iter()
        .take_while(|s| !s.contains(TUP_GLOB_META) && **s != "." && **s != "..")
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Traversal

/// Regular files under `path_dir_src` whose source-relative path matches.
///
/// Entries are visited sorted by name. Directories the pattern cannot reach
/// are never opened, so read errors only surface for reachable ones.
/// Symlinked directories are not followed; symlinked files count when they
/// resolve to a regular file. A missing starting directory yields an empty
/// list.
pub(crate) fn collect_matching_files(
    path_dir_src: &Path,
    spec_pattern: &SpecSourcePattern,
) -> Result<Vec<PathBuf>, SyncError> {
    let path_dir_start = path_dir_src.join(&spec_pattern.path_rel_prefix);
    let mut l_matches = Vec::new();
    if !path_dir_start.is_dir() {
        return Ok(l_matches);
    }
    walk_directory(path_dir_src, &path_dir_start, spec_pattern, &mut l_matches)?;
    Ok(l_matches)
}

fn walk_directory(
    path_dir_src: &Path,
    path_root: &Path,
    spec_pattern: &SpecSourcePattern,
    l_matches: &mut Vec<PathBuf>,
) -> Result<(), SyncError> {
    let map_walk_err = |e: io::Error| SyncError::WalkFailed {
        path: path_root.to_path_buf(),
        source: e,
    };

    let mut l_entries = Vec::new();
    for entry_res in fs::read_dir(path_root).map_err(map_walk_err)? {
        let entry = entry_res.map_err(map_walk_err)?;
        let cfg_file_type = entry.file_type().map_err(map_walk_err)?;
        l_entries.push((entry.file_name(), entry.path(), cfg_file_type));
    }
    l_entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (_, path_entry, cfg_file_type) in l_entries {
        let Ok(path_rel) = path_entry.strip_prefix(path_dir_src) else {
            continue;
        };

        if cfg_file_type.is_dir() {
            if spec_pattern.can_descend(path_rel) {
                walk_directory(path_dir_src, &path_entry, spec_pattern, l_matches)?;
            }
            continue;
        }

        let b_is_file = cfg_file_type.is_file()
            || (cfg_file_type.is_symlink() && path_entry.is_file());
        if !b_is_file {
            continue;
        }

        if spec_pattern.is_match(path_rel) {
            l_matches.push(path_entry);
        }
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

pub(crate) fn absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Canonical form when the path exists, absolute form otherwise.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    absolutize_path(path)
}

/// Mirror `path_file_src` from `path_dir_src` onto `path_dir_dst`.
pub(crate) fn derive_destination_path(
    path_file_src: &Path,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    match path_file_src.strip_prefix(path_dir_src) {
        Ok(path_rel) => path_dir_dst.join(path_rel),
        Err(_) => path_dir_dst.join(path_file_src.file_name().unwrap_or_default()),
    }
}

/// Both paths name the same file, through links or identical canonical forms.
pub(crate) fn is_same_file(path_file_a: &Path, path_file_b: &Path) -> Result<bool, io::Error> {
    if fs::canonicalize(path_file_a)? == fs::canonicalize(path_file_b)? {
        return Ok(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let stat_a = fs::metadata(path_file_a)?;
        let stat_b = fs::metadata(path_file_b)?;
        Ok(stat_a.dev() == stat_b.dev() && stat_a.ino() == stat_b.ino())
    }
    #[cfg(not(unix))]
    Ok(false)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ByteCopy

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_preserve_metadata: bool,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    if if_preserve_metadata {
        apply_metadata(path_file_src, path_file_dst)?;
    }
    Ok(())
}

fn apply_metadata(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(path = %path_file_src.display(), error = %e, "cannot list xattrs");
            return;
        }
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        set_xattr_or_warn(path_file_dst, &name, &raw_value);
    }
}

/// Returns whether the attribute was written; failures are logged, not raised.
#[cfg(target_os = "linux")]
fn set_xattr_or_warn(path_file_dst: &Path, name: &std::ffi::OsStr, raw_value: &[u8]) -> bool {
    match xattr::set(path_file_dst, name, raw_value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                path = %path_file_dst.display(),
                xattr = %name.to_string_lossy(),
                error = %e,
                "xattr not copied"
            );
            false
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
