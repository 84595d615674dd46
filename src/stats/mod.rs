use crate::clean::{Metric, TrafficTable};

/// Arithmetic mean; `None` on an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation (N−1 denominator, matching the defaults of the
/// usual statistics libraries). Needs at least two observations.
pub fn std_deviation(data: &[f64]) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let m = mean(data)?;
    let variance = data.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile with linear interpolation over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Descriptive statistics for one numeric column, missing values skipped.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub metric: Metric,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Per-column summary of the cleaned table, schema order.
pub fn describe(table: &TrafficTable) -> Vec<ColumnSummary> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let mut values = table.column_values(metric);
            values.sort_by(f64::total_cmp);
            ColumnSummary {
                metric,
                count: values.len(),
                mean: mean(&values),
                std: std_deviation(&values),
                min: values.first().copied(),
                q25: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q75: quantile(&values, 0.75),
                max: values.last().copied(),
            }
        })
        .collect()
}

/// Full Pearson correlation matrix over the numeric columns.
///
/// Each pair is computed over the rows where both values are present; cells
/// with fewer than two such rows, or a constant column, stay `None`.
pub struct CorrelationMatrix {
    pub metrics: Vec<Metric>,
    pub cells: Vec<Vec<Option<f64>>>,
}

pub fn correlation_matrix(table: &TrafficTable) -> CorrelationMatrix {
    let metrics: Vec<Metric> = Metric::ALL.to_vec();
    let cells = metrics
        .iter()
        .map(|&a| {
            metrics
                .iter()
                .map(|&b| pearson_pairwise(table, a, b))
                .collect()
        })
        .collect();
    CorrelationMatrix { metrics, cells }
}

fn pearson_pairwise(table: &TrafficTable, a: Metric, b: Metric) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = table
        .records()
        .iter()
        .filter_map(|r| Some((r.metric(a)?, r.metric(b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some(cov / (var_a.sqrt() * var_b.sqrt()))
}
