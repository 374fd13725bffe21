use std::collections::BTreeMap;

use crate::error::{DashboardError, Result};
use crate::types::{CellValue, TicketTable};

/// Reduce each ticket's status history to the rows carrying its
/// highest-priority status.
///
/// Rows are grouped by the `reference` column (rows with an empty reference
/// are left out). For each group the first status in `priority` that occurs
/// in the group wins and every row with exactly that status is kept. A group
/// holding none of the listed statuses contributes no rows.
///
/// Groups are emitted in ascending reference order, rows within a group in
/// their original order.
pub fn resolve_statuses(
    table: &TicketTable,
    reference: &str,
    status: &str,
    priority: &[String],
) -> Result<TicketTable> {
    let reference_col = column(table, reference)?;
    let status_col = column(table, status)?;

    let mut groups: BTreeMap<&CellValue, Vec<usize>> = BTreeMap::new();
    for (index, row) in table.rows().iter().enumerate() {
        let key = &row[reference_col];
        if key.is_empty() {
            continue;
        }
        groups.entry(key).or_default().push(index);
    }

    let status_of = |index: usize| table.rows()[index][status_col].as_text();

    let mut kept = Vec::with_capacity(table.len());
    let mut dropped_groups = 0;
    for rows in groups.values() {
        let winner = priority
            .iter()
            .find(|wanted| rows.iter().any(|&i| status_of(i) == Some(wanted.as_str())));

        match winner {
            Some(wanted) => kept.extend(
                rows.iter()
                    .copied()
                    .filter(|&i| status_of(i) == Some(wanted.as_str())),
            ),
            None => dropped_groups += 1,
        }
    }

    log::debug!(
        "Status resolution: {} references, {} without a tracked status, {} of {} rows kept",
        groups.len(),
        dropped_groups,
        kept.len(),
        table.len()
    );

    Ok(table.select_rows(&kept))
}

fn column(table: &TicketTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| DashboardError::MissingColumn {
            column: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn priority() -> Vec<String> {
        vec!["CLOSED".into(), "RESOLVED".into(), "OPEN".into()]
    }

    fn table(rows: &[(&str, &str)]) -> TicketTable {
        TicketTable::new(
            vec!["Reference".into(), "Status".into(), "Row".into()],
            rows.iter()
                .enumerate()
                .map(|(i, (reference, status))| {
                    vec![
                        if reference.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(reference.to_string())
                        },
                        CellValue::Text(status.to_string()),
                        CellValue::Number(i as f64),
                    ]
                })
                .collect(),
        )
    }

    fn kept(result: &TicketTable) -> Vec<(String, String)> {
        result
            .rows()
            .iter()
            .map(|row| (row[0].to_string(), row[1].to_string()))
            .collect()
    }

    fn resolve(input: &TicketTable) -> TicketTable {
        resolve_statuses(input, "Reference", "Status", &priority()).unwrap()
    }

    #[test]
    fn test_closed_beats_everything() {
        let input = table(&[("T1", "OPEN"), ("T1", "RESOLVED"), ("T1", "CLOSED")]);
        assert_eq!(kept(&resolve(&input)), vec![("T1".into(), "CLOSED".into())]);
    }

    #[test]
    fn test_resolved_beats_open() {
        let input = table(&[("T1", "OPEN"), ("T1", "RESOLVED"), ("T1", "OPEN")]);
        assert_eq!(kept(&resolve(&input)), vec![("T1".into(), "RESOLVED".into())]);
    }

    #[test]
    fn test_open_alone_is_kept() {
        let input = table(&[("T1", "OPEN"), ("T1", "OPEN")]);
        assert_eq!(resolve(&input).len(), 2);
    }

    #[test]
    fn test_untracked_statuses_drop_group() {
        let input = table(&[("T2", "PENDING"), ("T2", "PENDING"), ("T3", "OPEN")]);
        assert_eq!(kept(&resolve(&input)), vec![("T3".into(), "OPEN".into())]);
    }

    #[test]
    fn test_status_match_is_exact() {
        let input = table(&[("T1", "closed"), ("T1", "OPEN "), ("T2", "OPEN")]);
        assert_eq!(kept(&resolve(&input)), vec![("T2".into(), "OPEN".into())]);
    }

    #[test]
    fn test_winning_rows_all_retained_in_order() {
        let input = table(&[
            ("T1", "CLOSED"),
            ("T1", "OPEN"),
            ("T1", "CLOSED"),
        ]);
        let result = resolve(&input);
        let row_numbers: Vec<String> = result.rows().iter().map(|r| r[2].to_string()).collect();
        assert_eq!(row_numbers, vec!["0", "2"]);
    }

    #[test]
    fn test_groups_sorted_and_empty_reference_skipped() {
        let input = table(&[("T9", "OPEN"), ("", "CLOSED"), ("T1", "OPEN")]);
        assert_eq!(
            kept(&resolve(&input)),
            vec![("T1".into(), "OPEN".into()), ("T9".into(), "OPEN".into())]
        );
    }

    #[test]
    fn test_missing_column_errors() {
        let input = table(&[("T1", "OPEN")]);
        let err = resolve_statuses(&input, "Ticket", "Status", &priority()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn { ref column } if column == "Ticket"));
    }

    #[test]
    fn test_deterministic() {
        let input = table(&[("T2", "OPEN"), ("T1", "RESOLVED"), ("T2", "CLOSED")]);
        assert_eq!(resolve(&input), resolve(&input));
    }
}
