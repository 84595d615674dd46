use crate::clean::{Metric, TrafficTable, COLUMN_NAMES};
use crate::detect::{HighIvtDay, OutlierDay};
use crate::stats::{ColumnSummary, CorrelationMatrix};

const HEAD_ROWS: usize = 5;

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.6}"),
        None => "NaN".to_string(),
    }
}

/// Column count, names, head, and a per-column non-null/type summary.
pub fn print_overview(table: &TrafficTable) {
    println!("Columns detected: {}", COLUMN_NAMES.len());
    println!("Column names: {COLUMN_NAMES:?}");

    println!("\n=== Head ===");
    let widths: Vec<usize> = COLUMN_NAMES.iter().map(|n| n.len().max(10)).collect();
    let header: Vec<String> = COLUMN_NAMES
        .iter()
        .zip(&widths)
        .map(|(n, &w)| format!("{n:>w$}"))
        .collect();
    println!("{}", header.join(" "));
    for rec in table.records().iter().take(HEAD_ROWS) {
        let mut cells = vec![format!("{:>w$}", rec.date.to_string(), w = widths[0])];
        for (m, &w) in Metric::ALL.iter().zip(&widths[1..]) {
            cells.push(format!("{:>w$}", fmt_opt(rec.metric(*m))));
        }
        println!("{}", cells.join(" "));
    }

    println!("\n=== Schema ===");
    println!("{} rows after cleaning", table.len());
    println!("{:<22} {:>9} {}", "column", "non-null", "dtype");
    println!("{:<22} {:>9} {}", "Date", table.len(), "date");
    for m in Metric::ALL {
        println!(
            "{:<22} {:>9} {}",
            m.name(),
            table.column_values(m).len(),
            "f64"
        );
    }
}

pub fn print_summary(summaries: &[ColumnSummary]) {
    println!("\n=== Summary Statistics ===");
    println!(
        "{:<22} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for s in summaries {
        println!(
            "{:<22} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            s.metric.name(),
            s.count,
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.q25),
            fmt_opt(s.median),
            fmt_opt(s.q75),
            fmt_opt(s.max),
        );
    }
}

pub fn print_correlations(matrix: &CorrelationMatrix) {
    println!("\n=== Correlation Matrix ===");
    let widths: Vec<usize> = matrix.metrics.iter().map(|m| m.name().len().max(9)).collect();
    let header: Vec<String> = matrix
        .metrics
        .iter()
        .zip(&widths)
        .map(|(m, &w)| format!("{:>w$}", m.name()))
        .collect();
    println!("{:<22} {}", "", header.join(" "));
    for (m, row) in matrix.metrics.iter().zip(&matrix.cells) {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, &w)| match c {
                Some(r) => format!("{r:>w$.3}"),
                None => format!("{:>w$}", "NaN"),
            })
            .collect();
        println!("{:<22} {}", m.name(), cells.join(" "));
    }
}

pub fn print_high_ivt(days: &[HighIvtDay], threshold: f64) {
    println!("\n=== Days with High IVT (> {threshold}) ===");
    if days.is_empty() {
        println!("none");
        return;
    }
    println!(
        "{:<12} {:>14} {:>14} {:>18} {:>10}",
        "Date", "idfa_ua_ratio", "idfa_ip_ratio", "requests_per_idfa", "IVT"
    );
    for d in days {
        println!(
            "{:<12} {:>14} {:>14} {:>18} {:>10}",
            d.date.to_string(),
            fmt_opt(d.idfa_ua_ratio),
            fmt_opt(d.idfa_ip_ratio),
            fmt_opt(d.requests_per_idfa),
            fmt_opt(d.ivt),
        );
    }
}

pub fn print_outliers(days: &[OutlierDay]) {
    println!("\n=== Potential Anomaly Days ===");
    if days.is_empty() {
        println!("none");
        return;
    }
    println!(
        "{:<12} {:>14} {:>14} {:>10}",
        "Date", "idfa_ua_ratio", "idfa_ip_ratio", "IVT"
    );
    for d in days {
        println!(
            "{:<12} {:>14} {:>14} {:>10}",
            d.date.to_string(),
            fmt_opt(d.idfa_ua_ratio),
            fmt_opt(d.idfa_ip_ratio),
            fmt_opt(d.ivt),
        );
    }
}
