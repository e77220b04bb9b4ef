//! SDK source and destination root resolution.

use std::fs;
use std::io;
use std::path::Path;

use crate::conf::{derive_blobs_dir, derive_headers_dir};
use crate::spec::{SpecResolvedPaths, SyncError};
use crate::util::{absolutize_path, normalize_path};

/// Resolve the SDK checkout and both destination roots.
///
/// The SDK path must exist and be a directory; anything else fails before any
/// pattern is expanded. Destination roots are only normalized, never created,
/// and may be missing.
pub fn resolve_paths<P, Q>(sdk: P, project_root: Q) -> Result<SpecResolvedPaths, SyncError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_sdk_abs = absolutize_path(sdk.as_ref());
    let path_dir_sdk = fs::canonicalize(&path_sdk_abs).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SyncError::SdkNotFound {
            path: path_sdk_abs.clone(),
            source: e,
        },
        _ => SyncError::ResolveFailed {
            path: path_sdk_abs.clone(),
            source: e,
        },
    })?;

    let meta_sdk = fs::metadata(&path_dir_sdk).map_err(|e| SyncError::ResolveFailed {
        path: path_dir_sdk.clone(),
        source: e,
    })?;
    if !meta_sdk.is_dir() {
        return Err(SyncError::SdkNotDirectory(path_dir_sdk));
    }

    let path_dir_project = normalize_path(project_root.as_ref());
    let spec_paths = SpecResolvedPaths {
        path_dir_headers: normalize_path(&derive_headers_dir(&path_dir_project)),
        path_dir_blobs: normalize_path(&derive_blobs_dir(&path_dir_project)),
        path_dir_sdk,
    };
    tracing::debug!(
        sdk = %spec_paths.path_dir_sdk.display(),
        headers = %spec_paths.path_dir_headers.display(),
        blobs = %spec_paths.path_dir_blobs.display(),
        "resolved sync roots"
    );
    Ok(spec_paths)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::resolve_paths;
    use crate::spec::SyncError;

    #[test]
    fn resolve_existing_sdk_and_missing_destinations() {
        let tmp = TempDir::new().expect("tempdir");
        let sdk = tmp.path().join("sdk");
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&sdk).expect("mkdir sdk");
        std::fs::create_dir_all(&project).expect("mkdir project");

        let spec_paths = resolve_paths(&sdk, &project).expect("resolve");
        let project_canon = std::fs::canonicalize(&project).expect("canon");

        assert_eq!(spec_paths.path_dir_sdk, std::fs::canonicalize(&sdk).expect("canon"));
        assert_eq!(spec_paths.path_dir_headers, project_canon.join("simplicity_sdk"));
        assert_eq!(
            spec_paths.path_dir_blobs,
            project_canon.join("zephyr").join("blobs").join("simplicity_sdk")
        );
        assert!(!spec_paths.path_dir_headers.exists());
        assert!(!spec_paths.path_dir_blobs.exists());
    }

    #[test]
    fn resolve_missing_sdk_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let err = resolve_paths(tmp.path().join("no_sdk"), tmp.path()).expect_err("must fail");
        assert!(matches!(err, SyncError::SdkNotFound { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn resolve_file_as_sdk_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("sdk.txt");
        std::fs::write(&path_file, "x").expect("write");

        let err = resolve_paths(&path_file, tmp.path()).expect_err("must fail");
        assert!(matches!(err, SyncError::SdkNotDirectory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_follows_sdk_symlink() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().expect("tempdir");
        let sdk_real = tmp.path().join("sdk_real");
        let sdk_link = tmp.path().join("sdk_link");
        std::fs::create_dir_all(&sdk_real).expect("mkdir");
        symlink(&sdk_real, &sdk_link).expect("symlink");

        let spec_paths = resolve_paths(&sdk_link, tmp.path()).expect("resolve");
        assert_eq!(
            spec_paths.path_dir_sdk,
            std::fs::canonicalize(&sdk_real).expect("canon")
        );
    }
}
