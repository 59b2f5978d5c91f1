pub mod percentages;

use crate::models::{Candidate, TallyMap};
use percentages::{format_share, vote_share};

// One line of the live results display
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsRow {
    pub candidate_id: String,
    pub display_name: String,
    pub votes: u64,
    pub share: f64,        // 0.0..=100.0
    pub percentage: String, // share to one decimal place
    pub listed: bool,       // false for ids the backend reported but the client never declared
}

/// Rows for every declared candidate, in declaration order, followed by any
/// ids the tally carries that were not declared.
///
/// Undeclared ids are shown under their raw id rather than dropped, so the
/// displayed percentages always add up over what the backend reported.
pub fn results_rows(candidates: &[Candidate], tally: &TallyMap) -> Vec<ResultsRow> {
    let mut rows: Vec<ResultsRow> = candidates
        .iter()
        .map(|candidate| row(candidate, tally, true))
        .collect();

    for id in tally.keys() {
        if !candidates.iter().any(|candidate| &candidate.id == id) {
            rows.push(row(&Candidate::unlisted(id), tally, false));
        }
    }

    rows
}

fn row(candidate: &Candidate, tally: &TallyMap, listed: bool) -> ResultsRow {
    let share = vote_share(tally, &candidate.id);
    ResultsRow {
        candidate_id: candidate.id.clone(),
        display_name: candidate.name.clone(),
        votes: tally.get(&candidate.id).copied().unwrap_or(0),
        share,
        percentage: format_share(share),
        listed,
    }
}

const FILLS: [char; 4] = ['█', '▓', '▒', '░'];

/// Text rendering of the results bar plus a per-candidate summary.
pub fn render_results(rows: &[ResultsRow], width: usize) -> String {
    let total: u128 = rows.iter().map(|row| u128::from(row.votes)).sum();
    let mut out = String::new();

    out.push('[');
    if total == 0 {
        out.push_str(&" ".repeat(width));
    } else {
        let mut drawn = 0;
        for (i, row) in rows.iter().enumerate() {
            let cells = if i + 1 == rows.len() {
                width.saturating_sub(drawn)
            } else {
                ((row.share / 100.0) * width as f64).round() as usize
            };
            let cells = cells.min(width.saturating_sub(drawn));
            out.extend(std::iter::repeat_n(FILLS[i % FILLS.len()], cells));
            drawn += cells;
        }
    }
    out.push_str("]\n");

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{} {}: {} votes ({}%)\n",
            FILLS[i % FILLS.len()],
            row.display_name,
            row.votes,
            row.percentage
        ));
    }
    out.push_str(&format!("{} votes in total.", total));

    out
}
