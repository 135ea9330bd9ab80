//! Variant expansion and locator deduplication
//!
//! A record carrying disabled alternate locators is expanded into one record
//! per distinct locator, numbered ` (1)`, ` (2)`, ... in candidate order
//! (primary first, then alternates as they appeared in the source). Every
//! locator kept this way is remembered for the rest of the run, so a mirror
//! that shows up again, even under an unrelated channel, is suppressed.
//! Records without alternates are passed through unchecked, but their locator
//! is remembered as well.
//!
//! The seen-set belongs to a [`VariantExpander`] value. Create one per run;
//! reuse the same value only when deduplication across sources is wanted.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::models::{normalize_locator, ChannelRecord};

/// Controls which records are subject to the seen-set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupPolicy {
    /// Also filter records without alternates (dropped when already seen)
    pub dedupe_single_source: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantStatistics {
    pub records_in: usize,
    pub records_out: usize,
    pub variants_emitted: usize,
    pub locators_suppressed: usize,
}

#[derive(Debug, Default)]
pub struct VariantExpander {
    policy: DedupPolicy,
    seen: HashSet<String>,
    stats: VariantStatistics,
}

impl VariantExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DedupPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Number of distinct locators registered so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, locator: &str) -> bool {
        self.seen.contains(normalize_locator(locator))
    }

    pub fn statistics(&self) -> &VariantStatistics {
        &self.stats
    }

    /// Expand a batch of records, continuing from the current seen-set
    pub fn expand(&mut self, records: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
        let mut output = Vec::with_capacity(records.len());
        let records_in = records.len();

        for record in records {
            if record.has_alternates() {
                self.expand_record(record, &mut output);
            } else if self.policy.dedupe_single_source {
                self.filter_single(record, &mut output);
            } else {
                self.register_single(&record);
                output.push(record);
            }
        }

        self.stats.records_in += records_in;
        self.stats.records_out += output.len();
        info!(
            "Variant expansion: records_in={} records_out={} seen_locators={}",
            records_in,
            output.len(),
            self.seen.len()
        );

        output
    }

    fn expand_record(&mut self, record: ChannelRecord, output: &mut Vec<ChannelRecord>) {
        let candidates = record
            .primary_locator
            .iter()
            .chain(record.alternate_locators.iter())
            .map(|line| normalize_locator(line));

        let mut kept = Vec::new();
        for candidate in candidates {
            if candidate.is_empty() {
                continue;
            }
            if !self.seen.insert(candidate.to_string()) {
                debug!(
                    "Suppressing already seen locator '{}' for channel '{}'",
                    candidate, record.name
                );
                self.stats.locators_suppressed += 1;
                continue;
            }
            kept.push(candidate.to_string());
        }

        if kept.is_empty() {
            debug!("Channel '{}' has no unseen locators; dropped", record.name);
            return;
        }

        for (index, locator) in kept.into_iter().enumerate() {
            let suffix = format!(" ({})", index + 1);
            output.push(ChannelRecord {
                id: record.id.clone(),
                display_name: record
                    .display_name
                    .as_ref()
                    .map(|display_name| format!("{display_name}{suffix}")),
                logo_url: record.logo_url.clone(),
                group_title: record.group_title.clone(),
                name: format!("{}{}", record.name, suffix),
                primary_locator: Some(locator),
                alternate_locators: Vec::new(),
            });
            self.stats.variants_emitted += 1;
        }
    }

    /// Remember a single-source locator so later variants do not repeat it
    fn register_single(&mut self, record: &ChannelRecord) {
        if let Some(locator) = record
            .primary_locator
            .as_deref()
            .map(normalize_locator)
            .filter(|locator| !locator.is_empty())
        {
            self.seen.insert(locator.to_string());
        }
    }

    fn filter_single(&mut self, record: ChannelRecord, output: &mut Vec<ChannelRecord>) {
        let locator = record
            .primary_locator
            .as_deref()
            .map(normalize_locator)
            .filter(|locator| !locator.is_empty());

        if let Some(locator) = locator {
            if !self.seen.insert(locator.to_string()) {
                debug!(
                    "Dropping channel '{}': locator '{}' already emitted",
                    record.name, locator
                );
                self.stats.locators_suppressed += 1;
                return;
            }
        }
        output.push(record);
    }
}

/// Expand variants with a fresh seen-set and the default policy
pub fn expand_variants(records: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
    VariantExpander::new().expand(records)
}
