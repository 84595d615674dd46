pub mod date;

use crate::ingest::RawTable;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

/// Fixed schema of the daily export, positional after empty-column pruning.
pub const COLUMN_NAMES: [&str; 11] = [
    "Date",
    "unique_idfas",
    "unique_ips",
    "unique_uas",
    "total_requests",
    "requests_per_idfa",
    "impressions",
    "impressions_per_idfa",
    "idfa_ip_ratio",
    "idfa_ua_ratio",
    "IVT",
];

/// Leading rows of the export that are never data: a section label
/// ("Daily Data") followed by a duplicated header line.
pub const LEADING_JUNK_ROWS: usize = 2;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("expected {} columns after cleaning, found {found}", COLUMN_NAMES.len())]
    SchemaMismatch { found: usize },
}

/// The ten numeric columns, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    UniqueIdfas,
    UniqueIps,
    UniqueUas,
    TotalRequests,
    RequestsPerIdfa,
    Impressions,
    ImpressionsPerIdfa,
    IdfaIpRatio,
    IdfaUaRatio,
    Ivt,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::UniqueIdfas,
        Metric::UniqueIps,
        Metric::UniqueUas,
        Metric::TotalRequests,
        Metric::RequestsPerIdfa,
        Metric::Impressions,
        Metric::ImpressionsPerIdfa,
        Metric::IdfaIpRatio,
        Metric::IdfaUaRatio,
        Metric::Ivt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::UniqueIdfas => "unique_idfas",
            Metric::UniqueIps => "unique_ips",
            Metric::UniqueUas => "unique_uas",
            Metric::TotalRequests => "total_requests",
            Metric::RequestsPerIdfa => "requests_per_idfa",
            Metric::Impressions => "impressions",
            Metric::ImpressionsPerIdfa => "impressions_per_idfa",
            Metric::IdfaIpRatio => "idfa_ip_ratio",
            Metric::IdfaUaRatio => "idfa_ua_ratio",
            Metric::Ivt => "IVT",
        }
    }
}

/// One cleaned day of traffic metrics. Numeric cells that failed coercion
/// stay missing rather than poisoning the row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficRecord {
    pub date: NaiveDate,
    pub unique_idfas: Option<f64>,
    pub unique_ips: Option<f64>,
    pub unique_uas: Option<f64>,
    pub total_requests: Option<f64>,
    pub requests_per_idfa: Option<f64>,
    pub impressions: Option<f64>,
    pub impressions_per_idfa: Option<f64>,
    pub idfa_ip_ratio: Option<f64>,
    pub idfa_ua_ratio: Option<f64>,
    pub ivt: Option<f64>,
}

impl TrafficRecord {
    pub fn metric(&self, m: Metric) -> Option<f64> {
        match m {
            Metric::UniqueIdfas => self.unique_idfas,
            Metric::UniqueIps => self.unique_ips,
            Metric::UniqueUas => self.unique_uas,
            Metric::TotalRequests => self.total_requests,
            Metric::RequestsPerIdfa => self.requests_per_idfa,
            Metric::Impressions => self.impressions,
            Metric::ImpressionsPerIdfa => self.impressions_per_idfa,
            Metric::IdfaIpRatio => self.idfa_ip_ratio,
            Metric::IdfaUaRatio => self.idfa_ua_ratio,
            Metric::Ivt => self.ivt,
        }
    }
}

/// Cleaned table, rows in source order re-indexed from 0. Never mutated
/// after construction; downstream stages only read it.
#[derive(Debug, Default)]
pub struct TrafficTable {
    records: Vec<TrafficRecord>,
}

impl TrafficTable {
    pub fn records(&self) -> &[TrafficRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-missing values of one column, in row order.
    pub fn column_values(&self, m: Metric) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.metric(m)).collect()
    }
}

/// Trim whitespace + strip outer quotes if present.
fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Total numeric coercion: anything that is not a valid number becomes
/// missing, never an error.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Clean a raw export into a typed [`TrafficTable`].
///
/// Steps, in contract order: drop the two leading non-data rows, drop
/// columns empty in every remaining row, assert exactly 11 survivors before
/// any positional naming, coerce numerics permissively, parse dates
/// permissively, drop rows whose date is missing.
pub fn clean(raw: &RawTable) -> Result<TrafficTable, CleanError> {
    let rows: &[Vec<String>] = raw.rows.get(LEADING_JUNK_ROWS..).unwrap_or(&[]);

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let surviving: Vec<usize> = (0..width)
        .filter(|&i| {
            rows.iter()
                .any(|r| r.get(i).map(|c| !clean_str(c).is_empty()).unwrap_or(false))
        })
        .collect();

    if surviving.len() != COLUMN_NAMES.len() {
        return Err(CleanError::SchemaMismatch {
            found: surviving.len(),
        });
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let cell = |slot: usize| row.get(surviving[slot]).map(String::as_str).unwrap_or("");

        // unparseable date means the row is dropped, not kept with a null
        let Some(date) = date::parse_date(cell(0)) else {
            continue;
        };

        records.push(TrafficRecord {
            date,
            unique_idfas: coerce_numeric(cell(1)),
            unique_ips: coerce_numeric(cell(2)),
            unique_uas: coerce_numeric(cell(3)),
            total_requests: coerce_numeric(cell(4)),
            requests_per_idfa: coerce_numeric(cell(5)),
            impressions: coerce_numeric(cell(6)),
            impressions_per_idfa: coerce_numeric(cell(7)),
            idfa_ip_ratio: coerce_numeric(cell(8)),
            idfa_ua_ratio: coerce_numeric(cell(9)),
            ivt: coerce_numeric(cell(10)),
        });
    }

    info!(
        raw_rows = raw.rows.len(),
        kept_rows = records.len(),
        "cleaned traffic table"
    );
    Ok(TrafficTable { records })
}
