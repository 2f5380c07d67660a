/// Derived settlement-rate computation.
///
/// Takes the flat, chronologically unordered list of `MeasurementRow`s
/// produced by ingestion, orders it into contiguous address groups with
/// dates ascending inside each group, and fills in `recent_rate`: the
/// settlement per year over the interval since the previous measurement
/// at the same address.
///
/// The degenerate cases never raise, they produce a zero rate:
/// first row of a group, duplicate or out-of-order dates, unparseable
/// dates, and readings without a baseline (infinite subsidence).

use chrono::NaiveDate;

use crate::ingest::meetbouten::round_to;
use crate::model::MeasurementRow;

/// Average Gregorian year, matching the interval unit of the externally
/// supplied rate.
const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// Orders rows by address then date and computes `recent_rate` per row.
///
/// The sort is stable: rows with equal address and date keep their
/// original relative order. Addresses order lexicographically, so rows
/// of the same address come out contiguous; `None` dates sort before
/// parsed dates within their address.
///
/// Per row, in sorted order:
/// - infinite `subsidence` (first reading, no baseline) → rate `0.0`.
///   The row's date still anchors the interval of the next row.
/// - a positive interval since the previous row of the same group →
///   `round_to(subsidence / interval_years, 1)`.
/// - anything else (first of group, zero/negative interval, missing
///   date) → rate `0.0`. Division is never performed on a zero or
///   negative interval.
pub fn compute_recent_rates(mut rows: Vec<MeasurementRow>) -> Vec<MeasurementRow> {
    rows.sort_by(|a, b| a.address.cmp(&b.address).then(a.date.cmp(&b.date)));

    for i in 0..rows.len() {
        let interval = if i > 0 && rows[i - 1].address == rows[i].address {
            interval_years(rows[i - 1].date, rows[i].date)
        } else {
            0.0
        };

        let row = &mut rows[i];
        row.recent_rate = if row.subsidence.is_infinite() {
            0.0
        } else if interval > 0.0 {
            round_to(row.subsidence / interval, 1)
        } else {
            0.0
        };
    }

    rows
}

/// Interval between two measurement dates in (average) years.
/// Zero when either date is missing.
fn interval_years(prev: Option<NaiveDate>, next: Option<NaiveDate>) -> f64 {
    match (prev, next) {
        (Some(p), Some(n)) => (n - p).num_seconds() as f64 / SECONDS_PER_YEAR,
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::meetbouten::parse_datum;

    fn row(address: &str, device_id: &str, datum: &str, subsidence: f64) -> MeasurementRow {
        MeasurementRow {
            address: address.to_string(),
            height_above_nap: 1.0,
            device_id: device_id.to_string(),
            device_status: "Actueel".to_string(),
            cumulative_subsidence: 0.0,
            subsidence,
            supplied_rate: None,
            datum: datum.to_string(),
            date: parse_datum(datum),
            measurement_index: 1,
            recent_rate: 0.0,
        }
    }

    #[test]
    fn test_same_address_rows_are_contiguous_and_date_ascending() {
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 3", "b", "2021-01-01", 1.0),
            row("Kerkstraat 1", "a", "2022-01-01", 1.0),
            row("Kerkstraat 3", "b", "2019-01-01", f64::INFINITY),
            row("Kerkstraat 1", "a", "2020-01-01", f64::INFINITY),
        ]);

        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.address.as_str(), r.datum.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Kerkstraat 1", "2020-01-01"),
                ("Kerkstraat 1", "2022-01-01"),
                ("Kerkstraat 3", "2019-01-01"),
                ("Kerkstraat 3", "2021-01-01"),
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_address_and_date() {
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 1", "first", "2020-01-01", 1.0),
            row("Kerkstraat 1", "second", "2020-01-01", 1.0),
        ]);
        assert_eq!(rows[0].device_id, "first");
        assert_eq!(rows[1].device_id, "second");
        // Duplicate dates give a zero interval, never a division.
        assert_eq!(rows[0].recent_rate, 0.0);
        assert_eq!(rows[1].recent_rate, 0.0);
    }

    #[test]
    fn test_first_row_of_each_group_gets_zero_rate() {
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 1", "a", "2020-01-01", 0.5),
            row("Kerkstraat 1", "a", "2021-01-01", 0.5),
            row("Kerkstraat 3", "b", "2020-06-01", 0.5),
        ]);
        assert_eq!(rows[0].recent_rate, 0.0); // first of "Kerkstraat 1"
        assert_ne!(rows[1].recent_rate, 0.0);
        assert_eq!(rows[2].recent_rate, 0.0); // first of "Kerkstraat 3"
    }

    #[test]
    fn test_rate_arithmetic_over_one_year() {
        // 2020-01-01 → 2021-01-01 is 366 days (leap year), so the
        // interval is 366/365.25 years and 2.0 over it rounds to 2.0.
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 1", "a", "2020-01-01", f64::INFINITY),
            row("Kerkstraat 1", "a", "2021-01-01", 2.0),
        ]);
        assert_eq!(rows[0].recent_rate, 0.0);
        assert_eq!(rows[1].recent_rate, 2.0);
    }

    #[test]
    fn test_rate_arithmetic_over_half_year() {
        // 2021-01-01 → 2021-07-02 is 182 days; 1.5 mm over it is
        // 1.5 / (182/365.25) = 3.0105… → 3.0.
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 1", "a", "2021-01-01", 0.0),
            row("Kerkstraat 1", "a", "2021-07-02", 1.5),
        ]);
        assert_eq!(rows[1].recent_rate, 3.0);
    }

    #[test]
    fn test_infinite_subsidence_row_still_anchors_next_interval() {
        // The middle row has no baseline and gets rate 0, but the third
        // row's interval must run from the middle row's date, not from
        // the first row's.
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 1", "a", "2019-01-01", 1.0),
            row("Kerkstraat 1", "a", "2020-01-01", f64::INFINITY),
            row("Kerkstraat 1", "a", "2021-01-01", 2.0),
        ]);
        assert_eq!(rows[1].recent_rate, 0.0);
        // 366 days, not 731: interval anchored at 2020-01-01.
        assert_eq!(rows[2].recent_rate, 2.0);
    }

    #[test]
    fn test_single_row_group_gets_zero_rate() {
        let rows = compute_recent_rates(vec![row("Kerkstraat 2", "a", "2022-06-01", 1.5)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recent_rate, 0.0);
    }

    #[test]
    fn test_malformed_date_routes_to_zero_interval() {
        // Neither the row without a parseable date nor its successor can
        // compute an interval; both get rate 0.
        let rows = compute_recent_rates(vec![
            row("Kerkstraat 1", "a", "not-a-date", 1.0),
            row("Kerkstraat 1", "a", "2021-01-01", 2.0),
        ]);
        assert_eq!(rows[0].date, None);
        assert_eq!(rows[0].recent_rate, 0.0);
        assert_eq!(rows[1].recent_rate, 0.0);
    }

    #[test]
    fn test_every_row_has_a_defined_rate_after_processing() {
        let rows = compute_recent_rates(vec![
            row("B", "b", "2020-01-01", f64::INFINITY),
            row("A", "a", "2021-01-01", 1.0),
            row("B", "b", "bogus", 0.3),
            row("A", "a", "2020-01-01", f64::INFINITY),
        ]);
        for r in &rows {
            assert!(r.recent_rate.is_finite());
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(compute_recent_rates(Vec::new()).is_empty());
    }
}
