use crate::models::TallyMap;
use std::collections::BTreeMap;

/// Sum of all counts, widened so any tally that parses can be added up.
pub fn total_votes(tally: &TallyMap) -> u128 {
    tally.values().map(|&votes| u128::from(votes)).sum()
}

/// Share of the total, in percent, for one candidate.
///
/// The total is taken over the ids present in `tally` only; an id that is
/// absent, or a tally with no votes at all, yields exactly 0.
pub fn vote_share(tally: &TallyMap, candidate_id: &str) -> f64 {
    let total = total_votes(tally);
    if total == 0 {
        return 0.0;
    }
    let votes = tally.get(candidate_id).copied().unwrap_or(0);
    votes as f64 * 100.0 / total as f64
}

pub fn vote_shares(tally: &TallyMap) -> BTreeMap<String, f64> {
    tally
        .keys()
        .map(|id| (id.clone(), vote_share(tally, id)))
        .collect()
}

pub fn format_share(share: f64) -> String {
    format!("{:.1}", share)
}
