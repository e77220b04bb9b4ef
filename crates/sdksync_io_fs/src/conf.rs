//! SDK layout constants and default phase factories.
//!
//! The pattern lists are hand-maintained. They are not derived from, nor
//! checked against, the slcc component trees that define what the SDK
//! actually publishes.

use std::path::{Path, PathBuf};

use crate::spec::{SpecResolvedPaths, SpecSyncPhase};

/// Project-local SDK mirror, relative to the project root.
pub const C_DIR_HEADERS_REL: &str = "simplicity_sdk";
/// Blob staging area, relative to the project root.
pub const C_DIR_BLOBS_REL: &str = "zephyr/blobs/simplicity_sdk";

/// Source subtrees whose tracked files are refreshed into the headers mirror.
pub const L_PATTERNS_SDK_HEADERS: [&str; 3] = [
    "platform/radio/rail_lib/autogen/**/*",
    "protocol/bluetooth/bgstack/ll/**/*",
    "protocol/bluetooth/bgcommon/lib/build/gcc/**/*",
];

/// Release static libraries refreshed into the blob staging area.
pub const L_PATTERNS_SDK_LIBS: [&str; 3] = [
    "platform/radio/rail_lib/autogen/librail_release/librail_*_gcc_release.a",
    "protocol/bluetooth/bgstack/ll/lib/libbluetooth_controller_*_gcc_release.a",
    "protocol/bluetooth/bgcommon/lib/build/gcc/**/bgcommon/release/libbgcommon.a",
];

pub const C_PHASE_HEADERS: &str = "headers";
pub const C_PHASE_LIBS: &str = "libs";

/// Headers destination under `path_dir_project`.
pub fn derive_headers_dir(path_dir_project: &Path) -> PathBuf {
    path_dir_project.join(C_DIR_HEADERS_REL)
}

/// Blob destination under `path_dir_project`.
pub fn derive_blobs_dir(path_dir_project: &Path) -> PathBuf {
    C_DIR_BLOBS_REL
        .split('/')
        .fold(path_dir_project.to_path_buf(), |acc, seg| acc.join(seg))
}

/// Headers phase: header subtrees into the project SDK mirror.
pub fn derive_headers_phase(spec_paths: &SpecResolvedPaths) -> SpecSyncPhase {
    SpecSyncPhase {
        name: C_PHASE_HEADERS.to_string(),
        patterns: L_PATTERNS_SDK_HEADERS.iter().map(|s| s.to_string()).collect(),
        path_dir_dst: spec_paths.path_dir_headers.clone(),
    }
}

/// Libraries phase: release archives into the blob staging area.
pub fn derive_libs_phase(spec_paths: &SpecResolvedPaths) -> SpecSyncPhase {
    SpecSyncPhase {
        name: C_PHASE_LIBS.to_string(),
        patterns: L_PATTERNS_SDK_LIBS.iter().map(|s| s.to_string()).collect(),
        path_dir_dst: spec_paths.path_dir_blobs.clone(),
    }
}

/// Both phases in run order.
pub fn derive_default_sync_phases(spec_paths: &SpecResolvedPaths) -> Vec<SpecSyncPhase> {
    vec![derive_headers_phase(spec_paths), derive_libs_phase(spec_paths)]
}
