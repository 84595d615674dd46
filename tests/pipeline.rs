use anyhow::Result;
use chrono::NaiveDate;
use ivtscan::clean::{clean, CleanError};
use ivtscan::detect::{high_ivt, statistical_outliers, HIGH_IVT_THRESHOLD, OUTLIER_SIGMA};
use ivtscan::ingest::load_csv;
use std::io::Write;
use tempfile::NamedTempFile;

const DUP_HEADER: &str = ",Date,unique_idfas,unique_ips,unique_uas,total_requests,\
requests_per_idfa,impressions,impressions_per_idfa,idfa_ip_ratio,idfa_ua_ratio,IVT";

/// Writes an export in the real shape: a header line, a section label, a
/// duplicated header, then data rows. The leading unnamed column is blank in
/// every data row.
fn write_export(data_rows: &[String]) -> Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new()?;
    writeln!(tmp, "{DUP_HEADER}")?;
    writeln!(tmp, "Daily Data,,,,,,,,,,,")?;
    writeln!(tmp, "{DUP_HEADER}")?;
    for row in data_rows {
        writeln!(tmp, "{row}")?;
    }
    tmp.flush()?;
    Ok(tmp)
}

fn day(date: &str, ua_ratio: &str, ivt: &str) -> String {
    format!(",{date},10,5,3,100,10,50,5,0.5,{ua_ratio},{ivt}")
}

#[test]
fn end_to_end_drops_junk_and_bad_dates() -> Result<()> {
    let tmp = write_export(&[
        day("2024-01-01", "0.3", "0.2"),
        ",bad-date,1,1,1,1,1,1,1,1,1,1".to_string(),
    ])?;

    let table = clean(&load_csv(tmp.path())?)?;
    assert_eq!(table.len(), 1);

    let rec = &table.records()[0];
    assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(rec.ivt, Some(0.2));
    assert_eq!(rec.unique_idfas, Some(10.0));
    assert_eq!(rec.idfa_ua_ratio, Some(0.3));
    Ok(())
}

#[test]
fn end_to_end_schema_mismatch_aborts() -> Result<()> {
    let mut tmp = NamedTempFile::new()?;
    writeln!(tmp, "Date,a,b,c")?;
    writeln!(tmp, "Daily Data,,,")?;
    writeln!(tmp, "Date,a,b,c")?;
    writeln!(tmp, "2024-01-01,1,2,3")?;
    tmp.flush()?;

    let raw = load_csv(tmp.path())?;
    match clean(&raw) {
        Err(CleanError::SchemaMismatch { found }) => assert_eq!(found, 4),
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
    Ok(())
}

#[test]
fn end_to_end_anomaly_views() -> Result<()> {
    let mut rows: Vec<String> = (1..=9)
        .map(|d| day(&format!("2024-01-{d:02}"), "1", "0.1"))
        .collect();
    rows.push(day("2024-01-10", "100", "0.95"));

    let table = clean(&load_csv(write_export(&rows)?.path())?)?;
    assert_eq!(table.len(), 10);

    let high = high_ivt(&table, HIGH_IVT_THRESHOLD);
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].ivt, Some(0.95));
    assert_eq!(high[0].requests_per_idfa, Some(10.0));

    let outliers = statistical_outliers(&table, OUTLIER_SIGMA)?;
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].idfa_ua_ratio, Some(100.0));
    assert_eq!(
        outliers[0].date,
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    );
    Ok(())
}

#[test]
fn end_to_end_single_row_cannot_support_outlier_test() -> Result<()> {
    let table = clean(&load_csv(write_export(&[day("2024-01-01", "1", "0.1")])?.path())?)?;
    assert!(statistical_outliers(&table, OUTLIER_SIGMA).is_err());
    Ok(())
}
