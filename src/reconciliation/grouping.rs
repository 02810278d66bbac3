//! Same amount, different date detection

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ReconcileConfig;
use crate::normalize::NormalizedTable;
use crate::types::*;

struct AmountGroup {
    debit: Amount,
    credit: Amount,
    left: BTreeSet<String>,
    right: BTreeSet<String>,
}

/// Find amount pairs booked on different dates in the two ledgers.
///
/// Every left row is paired with every right row sharing (debit, credit);
/// pairs whose dates are equal are dropped and the dates of the remaining
/// pairs are collected per side. A date takes part in some pair with a
/// different date exactly when the other side holds a date other than it,
/// so the pairing is evaluated over distinct dates instead of the full
/// product.
///
/// Records come out ordered by the (debit, credit) text. Dates within a
/// record are ordered as `DD/MM/YYYY` text, which sorts by day before month.
/// Groups whose two date sets end up identical are not reported.
pub fn group_by_amount(left: &NormalizedTable, right: &NormalizedTable) -> Vec<ReconciliationRecord> {
    let mut groups: BTreeMap<AmountKey, AmountGroup> = BTreeMap::new();
    for (side, table) in [(Side::Left, left), (Side::Right, right)] {
        for row in &table.rows {
            let group = groups.entry(row.amount_key()).or_insert_with(|| AmountGroup {
                debit: row.debit.clone(),
                credit: row.credit.clone(),
                left: BTreeSet::new(),
                right: BTreeSet::new(),
            });
            let dates = match side {
                Side::Left => &mut group.left,
                Side::Right => &mut group.right,
            };
            dates.insert(row.date_text());
        }
    }

    groups
        .into_values()
        .filter_map(|group| {
            let left_dates = dates_with_other_partner(&group.left, &group.right);
            let right_dates = dates_with_other_partner(&group.right, &group.left);
            if left_dates.is_empty() || right_dates.is_empty() || left_dates == right_dates {
                return None;
            }
            Some(ReconciliationRecord {
                debit: group.debit,
                credit: group.credit,
                left_dates,
                right_dates,
            })
        })
        .collect()
}

// Dates of `own` that can be paired with a different date from `other`.
fn dates_with_other_partner(own: &BTreeSet<String>, other: &BTreeSet<String>) -> BTreeSet<String> {
    own.iter()
        .filter(|date| other.iter().any(|candidate| candidate != *date))
        .cloned()
        .collect()
}

/// Render records as the grouped output table:
/// debit, credit, then one joined date column per side
pub fn records_to_table(
    records: &[ReconciliationRecord],
    config: &ReconcileConfig,
) -> ReconcileResult<Table> {
    let mut table = Table::new([
        config.columns.debit.clone(),
        config.columns.credit.clone(),
        config.grouped_date_column(Side::Left),
        config.grouped_date_column(Side::Right),
    ]);

    for record in records {
        table.push_row([
            record.debit.to_string(),
            record.credit.to_string(),
            record.joined_dates(Side::Left, &config.date_joiner),
            record.joined_dates(Side::Right, &config.date_joiner),
        ])?;
    }

    Ok(table)
}
