//! Meter replacements seen only across periods.
//!
//! A meter replaced between two statements shows up as a new serial number in
//! the next period rather than as a split period. Once a run's rows are built,
//! each account's hot-water rows are compared in order to catch these.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::report::gvs::{SOURCE_INSTALLATION, SOURCE_REMOVAL};
use crate::report::{InstallDateMemo, RecordType, ReportRow, field};

/// Marks hot-water meters replaced between consecutive periods.
///
/// For each account, consecutive hot-water accrual rows are compared. When the
/// serial number differs, the earlier row is relabelled as read at removal,
/// the later one as read at installation if it names a meter, and the later
/// row's reading date is recorded as the install date. A later row with a
/// meter then reports the account's recorded install date.
///
/// The two rows of an in-period replacement are already labelled; they and
/// the comparison right after them are left alone.
///
/// Returns the number of replacements found.
pub fn mark_meter_replacements(rows: &mut [ReportRow], memo: &mut InstallDateMemo) -> usize {
    let mut by_account: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        if row.record_type() != RecordType::GvsAccural {
            continue;
        }
        if let Some(account) = row.get(field::ACCOUNT).as_text() {
            by_account.entry(account.to_string()).or_default().push(index);
        }
    }

    let mut found = 0;
    for (account, indices) in &by_account {
        let mut skip_next = false;
        for pair in indices.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            if skip_next {
                skip_next = false;
                continue;
            }
            if same_period(&rows[earlier], &rows[later]) {
                skip_next = true;
                continue;
            }

            if rows[earlier].get(field::METER_NUMBER) != rows[later].get(field::METER_NUMBER) {
                rows[earlier].patch(field::READING_SOURCE, SOURCE_REMOVAL);
                if !rows[later].get(field::METER_NUMBER).is_empty() {
                    rows[later].patch(field::READING_SOURCE, SOURCE_INSTALLATION);
                }
                let reading_date = rows[later].get(field::READING_DATE).as_text();
                match reading_date.filter(|date| !date.is_empty()) {
                    Some(date) => memo.record(account, date),
                    None => warn!(account, "Replacing meter has no reading date"),
                }
                debug!(
                    account,
                    removed = %rows[earlier].get(field::METER_NUMBER),
                    installed = %rows[later].get(field::METER_NUMBER),
                    "Meter replaced between periods"
                );
                found += 1;
            }

            if rows[later].get(field::METER_NUMBER).is_empty() {
                continue;
            }
            if let Some(date) = memo.recorded(account) {
                let date = date.to_string();
                rows[later].patch(field::METER_INSTALLED, date);
            }
        }
    }
    found
}

fn same_period(a: &ReportRow, b: &ReportRow) -> bool {
    a.get(field::REPORT_MONTH) == b.get(field::REPORT_MONTH)
        && a.get(field::REPORT_YEAR) == b.get(field::REPORT_YEAR)
}
