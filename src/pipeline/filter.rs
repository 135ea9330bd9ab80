//! Channel selection and ordering
//!
//! Selection keeps the relative order of the records it retains; the only
//! stage that reorders is [`sort_by_name`], which is stable.

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::models::ChannelRecord;
use crate::utils::natural_cmp;

/// Keep records whose `group_title` is one of `accepted`
///
/// Records without a group never match.
pub fn filter_by_groups<S: AsRef<str>>(
    records: Vec<ChannelRecord>,
    accepted: &[S],
) -> Vec<ChannelRecord> {
    let accepted: HashSet<&str> = accepted.iter().map(|s| s.as_ref()).collect();
    let total = records.len();

    let selected: Vec<ChannelRecord> = records
        .into_iter()
        .filter(|record| {
            record
                .group_title
                .as_deref()
                .is_some_and(|group| accepted.contains(group))
        })
        .collect();

    info!(
        "Group filter kept {} of {} channels ({} accepted groups)",
        selected.len(),
        total,
        accepted.len()
    );
    selected
}

/// Stable sort by `name` in case-insensitive natural order
pub fn sort_by_name(mut records: Vec<ChannelRecord>) -> Vec<ChannelRecord> {
    records.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    records
}

/// Group titles in order of first appearance
pub fn distinct_groups(records: &[ChannelRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| record.group_title.as_deref())
        .filter(|group| seen.insert(*group))
        .collect()
}

/// Keep records whose id appears in `ids`, in record order
pub fn select_by_ids<S: AsRef<str>>(records: &[ChannelRecord], ids: &[S]) -> Vec<ChannelRecord> {
    let wanted: HashSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
    records
        .iter()
        .filter(|record| {
            record
                .id
                .as_deref()
                .is_some_and(|id| wanted.contains(id))
        })
        .cloned()
        .collect()
}

/// Build every configured sublist (output name to member ids)
pub fn build_sublists(
    records: &[ChannelRecord],
    sublists: &BTreeMap<String, Vec<String>>,
) -> BTreeMap<String, Vec<ChannelRecord>> {
    sublists
        .iter()
        .map(|(name, ids)| {
            let members = select_by_ids(records, ids);
            if members.len() < ids.len() {
                debug!(
                    "Sublist '{}': {} of {} ids matched a channel",
                    name,
                    members.len(),
                    ids.len()
                );
            }
            (name.clone(), members)
        })
        .collect()
}
