//! Pure ledger derivations over a movement set.

use std::collections::HashMap;

use stockroom_core::PartId;

use crate::movement::Movement;
use crate::part::Part;

/// Sort most recent first. Stable, so equal dates keep insertion order.
pub fn sort_by_date_desc(movements: &mut [Movement]) {
    movements.sort_by(|a, b| b.date().cmp(&a.date()));
}

/// All movements for one part, most recent first.
pub fn movements_for_part(movements: &[Movement], part_id: PartId) -> Vec<Movement> {
    let mut out: Vec<Movement> = movements
        .iter()
        .filter(|m| m.part_id() == part_id)
        .cloned()
        .collect();
    sort_by_date_desc(&mut out);
    out
}

/// The `limit` most recent movements across all parts.
pub fn recent_movements(movements: &[Movement], limit: usize) -> Vec<Movement> {
    let mut out = movements.to_vec();
    sort_by_date_desc(&mut out);
    out.truncate(limit);
    out
}

/// Stock level of a part recomputed from scratch (starting at zero).
///
/// Summed in `i128` so a persisted ledger can never overflow the check itself.
pub fn stock_from_ledger(movements: &[Movement], part_id: PartId) -> i128 {
    movements
        .iter()
        .filter(|m| m.part_id() == part_id)
        .map(|m| i128::from(m.signed_delta()))
        .sum()
}

/// Parts whose cached stock disagrees with the ledger, with (cached, ledger).
pub fn stock_mismatches(parts: &[Part], movements: &[Movement]) -> Vec<(PartId, i64, i128)> {
    let mut sums: HashMap<PartId, i128> = HashMap::new();
    for m in movements {
        *sums.entry(m.part_id()).or_default() += i128::from(m.signed_delta());
    }

    parts
        .iter()
        .filter_map(|p| {
            let expected = sums.get(&p.id_typed()).copied().unwrap_or(0);
            (i128::from(p.current_stock()) != expected)
                .then_some((p.id_typed(), p.current_stock(), expected))
        })
        .collect()
}
