//! `sdksync_io_fs` v1:
//! Rust-side engine that refreshes tracked SDK files from a local checkout.
//!
//! Modules:
//! - `resolve` : SDK and destination root resolution
//! - `copy`    : pattern expansion and existence-gated copy
//! - `conf`    : SDK layout constants and phase factories
//! - `spec`    : enums/options/errors
//! - `report`  : run-time report model
//! - `util`    : shared helper functions

pub mod conf;
pub mod copy;
pub mod report;
pub mod resolve;
pub mod spec;
mod util;

pub use conf::{
    L_PATTERNS_SDK_HEADERS, L_PATTERNS_SDK_LIBS, derive_default_sync_phases,
    derive_headers_phase, derive_libs_phase,
};
pub use copy::{copy_selected, emit_notice, sync_phase};
pub use report::{ReportSync, ReportSyncBuilder};
pub use resolve::resolve_paths;
pub use spec::{
    EnumSyncAction, SpecResolvedPaths, SpecSyncDecision, SpecSyncOptions, SpecSyncPhase,
    SyncError,
};
