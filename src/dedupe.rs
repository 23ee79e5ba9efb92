//! Collapses repeated candidates to their most recent export row and orders
//! the survivors by application date, newest first.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::dates;
use crate::plan::ColumnPlan;
use crate::table::{InputTable, cell_value};

/// One surviving row: its index in the input plus the serial used for
/// ordering. Unparseable application dates serialize to 0 and sink to the
/// bottom.
#[derive(Debug, Clone, Copy)]
pub struct Survivor {
    pub row: usize,
    pub application_serial: i64,
}

#[derive(Debug)]
pub struct DedupeOutcome {
    pub survivors: Vec<Survivor>,
    pub skipped_blank_id: usize,
}

/// A later row replaces an earlier one for the same candidate only when its
/// `CREATED_DATE` is non-empty and compares greater as a plain string.
/// Candidates keep their first-seen position, which stable sorting preserves
/// across equal application serials.
pub fn dedupe(table: &InputTable, plan: &ColumnPlan) -> DedupeOutcome {
    let keys = plan.keys;
    let mut latest: HashMap<&str, (usize, &str)> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    let mut skipped_blank_id = 0usize;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let id = cell_value(row, keys.candidate_id);
        if id.is_empty() {
            skipped_blank_id += 1;
            continue;
        }
        let created = cell_value(row, keys.created_date);
        match latest.entry(id) {
            Entry::Occupied(mut slot) => {
                let (_, existing_created) = *slot.get();
                if !created.is_empty() && existing_created < created {
                    slot.insert((row_idx, created));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert((row_idx, created));
                first_seen.push(id);
            }
        }
    }

    let mut survivors: Vec<Survivor> = first_seen
        .iter()
        .map(|id| {
            let (row, _) = latest[id];
            let application = keys
                .application_date
                .map(|idx| cell_value(&table.rows[row], idx))
                .unwrap_or("");
            Survivor {
                row,
                application_serial: dates::to_serial(application),
            }
        })
        .collect();
    survivors.sort_by(|a, b| b.application_serial.cmp(&a.application_serial));

    DedupeOutcome {
        survivors,
        skipped_blank_id,
    }
}
