#![forbid(unsafe_code)]

//! Reducers over a decoded climb population.

use crate::climbs::ClimbRow;
use crate::frames;
use std::collections::{BTreeMap, BTreeSet};

/// Keeps one climb per distinct name: the one with the highest
/// `ascensionist_count`; an exact tie goes to the lexicographically lowest
/// uuid. Output preserves the first-appearance order of each retained name.
pub fn dedup_by_name(climbs: Vec<ClimbRow>) -> Vec<ClimbRow> {
    let mut slot_by_name: BTreeMap<String, usize> = BTreeMap::new();
    let mut kept: Vec<ClimbRow> = Vec::new();
    for climb in climbs {
        match slot_by_name.get(&climb.name) {
            None => {
                slot_by_name.insert(climb.name.clone(), kept.len());
                kept.push(climb);
            }
            Some(&slot) => {
                let current = &kept[slot];
                let wins = climb.ascensionist_count > current.ascensionist_count
                    || (climb.ascensionist_count == current.ascensionist_count
                        && climb.uuid < current.uuid);
                if wins {
                    kept[slot] = climb;
                }
            }
        }
    }
    kept
}

/// Counts token occurrences per hole id across every frame string, keeping
/// only ids present in `valid_ids`; ordered by count descending, then hole
/// id ascending.
pub fn hole_frequency<'a, I>(frames_strings: I, valid_ids: &BTreeSet<u32>) -> Vec<(u32, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for frames_str in frames_strings {
        for token in frames::tokens(frames_str) {
            if valid_ids.contains(&token.hole_id) {
                *counts.entry(token.hole_id).or_insert(0) += 1;
            }
        }
    }
    let mut out: Vec<(u32, u64)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    out
}
