//! Sync report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::{EnumSyncAction, SpecSyncDecision};

/// Aggregate counters and per-file decisions for one `copy_selected` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportSync {
    /// Number of source files matched by any pattern.
    pub cnt_matched: u64,
    /// Number of destination files overwritten.
    pub cnt_copied: u64,
    /// Number of matches skipped because the destination is untracked.
    pub cnt_skipped: u64,
    /// Number of copies withheld by dry-run.
    pub cnt_planned: u64,
    /// Decisions in pattern order, then walk order.
    pub decisions: Vec<SpecSyncDecision>,
}

impl ReportSync {
    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_matched".to_string(), self.cnt_matched);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_planned".to_string(), self.cnt_planned);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} matched={} copied={} skipped={} planned={}",
            self.cnt_matched, self.cnt_copied, self.cnt_skipped, self.cnt_planned
        )
    }

    /// Destination paths that received new bytes.
    pub fn copied_destinations(&self) -> impl Iterator<Item = &PathBuf> {
        self.decisions
            .iter()
            .filter(|d| d.action == EnumSyncAction::Copied)
            .map(|d| &d.path_file_dst)
    }

    /// Fold another report into this one, keeping decision order.
    pub fn merge(&mut self, other: ReportSync) {
        self.cnt_matched += other.cnt_matched;
        self.cnt_copied += other.cnt_copied;
        self.cnt_skipped += other.cnt_skipped;
        self.cnt_planned += other.cnt_planned;
        self.decisions.extend(other.decisions);
    }
}

impl fmt::Display for ReportSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SYNC]"))
    }
}

/// Mutable accumulator for sync statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportSyncBuilder {
    cnt_matched: u64,
    cnt_copied: u64,
    cnt_skipped: u64,
    cnt_planned: u64,
    decisions: Vec<SpecSyncDecision>,
}

impl ReportSyncBuilder {
    /// Record one decision and bump the matching counters.
    pub fn add_decision(
        &mut self,
        path_file_src: PathBuf,
        path_file_dst: PathBuf,
        action: EnumSyncAction,
    ) {
        self.cnt_matched += 1;
        match action {
            EnumSyncAction::Copied => self.cnt_copied += 1,
            EnumSyncAction::Skipped => self.cnt_skipped += 1,
            EnumSyncAction::Planned => self.cnt_planned += 1,
        }
        self.decisions.push(SpecSyncDecision {
            path_file_src,
            path_file_dst,
            action,
        });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportSync {
        ReportSync {
            cnt_matched: self.cnt_matched,
            cnt_copied: self.cnt_copied,
            cnt_skipped: self.cnt_skipped,
            cnt_planned: self.cnt_planned,
            decisions: self.decisions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportSync, ReportSyncBuilder};
    use crate::spec::EnumSyncAction;

    #[test]
    fn report_sync_counts_each_action() {
        let mut builder = ReportSyncBuilder::default();
        builder.add_decision(PathBuf::from("s/a"), PathBuf::from("d/a"), EnumSyncAction::Copied);
        builder.add_decision(PathBuf::from("s/b"), PathBuf::from("d/b"), EnumSyncAction::Skipped);
        builder.add_decision(PathBuf::from("s/c"), PathBuf::from("d/c"), EnumSyncAction::Skipped);
        builder.add_decision(PathBuf::from("s/d"), PathBuf::from("d/d"), EnumSyncAction::Planned);
        let report = builder.build();

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_matched"], 4);
        assert_eq!(dict_counts["cnt_copied"], 1);
        assert_eq!(dict_counts["cnt_skipped"], 2);
        assert_eq!(dict_counts["cnt_planned"], 1);

        let l_copied: Vec<_> = report.copied_destinations().collect();
        assert_eq!(l_copied, vec![&PathBuf::from("d/a")]);
    }

    #[test]
    fn report_sync_format_and_display_match() {
        let report = ReportSync {
            cnt_matched: 5,
            cnt_copied: 3,
            cnt_skipped: 2,
            cnt_planned: 0,
            decisions: vec![],
        };

        let txt = report.format("[SYNC]");
        assert_eq!(txt, "[SYNC] matched=5 copied=3 skipped=2 planned=0");
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn report_sync_merge_keeps_order() {
        let mut builder_a = ReportSyncBuilder::default();
        builder_a.add_decision(PathBuf::from("s/a"), PathBuf::from("d/a"), EnumSyncAction::Copied);
        let mut builder_b = ReportSyncBuilder::default();
        builder_b.add_decision(PathBuf::from("s/b"), PathBuf::from("d/b"), EnumSyncAction::Skipped);

        let mut report = builder_a.build();
        report.merge(builder_b.build());

        assert_eq!(report.cnt_matched, 2);
        assert_eq!(report.decisions[0].path_file_src, PathBuf::from("s/a"));
        assert_eq!(report.decisions[1].path_file_src, PathBuf::from("s/b"));
    }
}
