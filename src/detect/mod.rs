use crate::clean::{Metric, TrafficTable};
use crate::stats::{mean, std_deviation};
use chrono::NaiveDate;
use thiserror::Error;

/// Days with an IVT share above this fraction are flagged outright.
pub const HIGH_IVT_THRESHOLD: f64 = 0.8;

/// How many sample standard deviations above the mean a ratio must sit to
/// count as a statistical outlier.
pub const OUTLIER_SIGMA: f64 = 2.0;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("need at least 2 rows to compute a standard deviation, table has {rows}")]
    InsufficientData { rows: usize },
}

/// A day flagged by the fixed IVT threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct HighIvtDay {
    pub date: NaiveDate,
    pub idfa_ua_ratio: Option<f64>,
    pub idfa_ip_ratio: Option<f64>,
    pub requests_per_idfa: Option<f64>,
    pub ivt: Option<f64>,
}

/// A day flagged by the mean + sigma·std test on either identity ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierDay {
    pub date: NaiveDate,
    pub idfa_ua_ratio: Option<f64>,
    pub idfa_ip_ratio: Option<f64>,
    pub ivt: Option<f64>,
}

/// Order-preserving subsequence of days with `IVT > threshold`.
/// A missing IVT never passes the test.
pub fn high_ivt(table: &TrafficTable, threshold: f64) -> Vec<HighIvtDay> {
    table
        .records()
        .iter()
        .filter(|r| r.ivt.map(|v| v > threshold).unwrap_or(false))
        .map(|r| HighIvtDay {
            date: r.date,
            idfa_ua_ratio: r.idfa_ua_ratio,
            idfa_ip_ratio: r.idfa_ip_ratio,
            requests_per_idfa: r.requests_per_idfa,
            ivt: r.ivt,
        })
        .collect()
}

/// Days where `idfa_ua_ratio` or `idfa_ip_ratio` exceeds its own
/// mean + `sigma`·std, both computed once over the full table.
///
/// Tables with fewer than two rows cannot support the std computation and
/// are rejected. A ratio column with fewer than two non-missing values
/// contributes no flags; a missing cell never passes its column's test.
pub fn statistical_outliers(
    table: &TrafficTable,
    sigma: f64,
) -> Result<Vec<OutlierDay>, DetectError> {
    if table.len() < 2 {
        return Err(DetectError::InsufficientData { rows: table.len() });
    }

    let ua_cutoff = column_cutoff(table, Metric::IdfaUaRatio, sigma);
    let ip_cutoff = column_cutoff(table, Metric::IdfaIpRatio, sigma);

    let exceeds = |value: Option<f64>, cutoff: Option<f64>| match (value, cutoff) {
        (Some(v), Some(c)) => v > c,
        _ => false,
    };

    Ok(table
        .records()
        .iter()
        .filter(|r| exceeds(r.idfa_ua_ratio, ua_cutoff) || exceeds(r.idfa_ip_ratio, ip_cutoff))
        .map(|r| OutlierDay {
            date: r.date,
            idfa_ua_ratio: r.idfa_ua_ratio,
            idfa_ip_ratio: r.idfa_ip_ratio,
            ivt: r.ivt,
        })
        .collect())
}

fn column_cutoff(table: &TrafficTable, metric: Metric, sigma: f64) -> Option<f64> {
    let values = table.column_values(metric);
    Some(mean(&values)? + sigma * std_deviation(&values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{clean, COLUMN_NAMES};
    use crate::ingest::RawTable;

    fn table(rows_after_date: &[[&str; 10]]) -> TrafficTable {
        let mut rows: Vec<Vec<String>> = vec![
            vec!["Daily Data".to_string()],
            COLUMN_NAMES.iter().map(|s| s.to_string()).collect(),
        ];
        for (i, fields) in rows_after_date.iter().enumerate() {
            let mut row = vec![format!("2024-03-{:02}", i + 1)];
            row.extend(fields.iter().map(|s| s.to_string()));
            rows.push(row);
        }
        clean(&RawTable::from_rows(rows)).unwrap()
    }

    #[test]
    fn high_ivt_is_sound_and_complete() {
        let t = table(&[
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.95"],
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.80"],
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.81"],
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", ""],
        ]);
        let flagged = high_ivt(&t, HIGH_IVT_THRESHOLD);
        // strictly greater: 0.80 stays, 0.81 and 0.95 flagged, missing skipped
        assert_eq!(flagged.len(), 2);
        assert!(flagged.iter().all(|d| d.ivt.unwrap() > HIGH_IVT_THRESHOLD));
        assert_eq!(flagged[0].ivt, Some(0.95));
        assert_eq!(flagged[1].ivt, Some(0.81));
    }

    #[test]
    fn spike_in_ua_ratio_is_flagged() {
        // nine quiet days and one spike; the spike sits ~2.85 sample stds
        // above the mean, the quiet days well below the cutoff
        let mut days = vec![["10", "5", "3", "100", "10", "50", "5", "0.5", "1", "0.1"]; 9];
        days.push(["10", "5", "3", "100", "10", "50", "5", "0.5", "100", "0.1"]);
        let t = table(&days);

        let flagged = statistical_outliers(&t, OUTLIER_SIGMA).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].idfa_ua_ratio, Some(100.0));
    }

    #[test]
    fn single_row_is_insufficient() {
        let t = table(&[[
            "10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.1",
        ]]);
        match statistical_outliers(&t, OUTLIER_SIGMA) {
            Err(DetectError::InsufficientData { rows }) => assert_eq!(rows, 1),
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn views_do_not_reorder_rows() {
        let t = table(&[
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.9"],
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.2"],
            ["10", "5", "3", "100", "10", "50", "5", "0.5", "0.3", "0.85"],
        ]);
        let flagged = high_ivt(&t, HIGH_IVT_THRESHOLD);
        assert_eq!(flagged.len(), 2);
        assert!(flagged[0].date < flagged[1].date);
    }
}
