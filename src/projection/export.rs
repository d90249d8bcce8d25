//! CSV and JSON output for projected funds

use std::io::Write;

use serde::Serialize;

use super::cashflows::{Phase, ProjectedFund};
use crate::error::ExportError;

/// One flat CSV row per fund-year
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    fund_id: &'a str,
    family_member_id: &'a str,
    year: i32,
    age: i32,
    phase: Phase,
    annual_return_rate: String,
    begin_amount: String,
    contribution: String,
    withdrawal: String,
    growth: String,
    end_amount: String,
    is_actual_balance: bool,
}

/// Write every projected year of every fund as CSV
pub fn write_csv<W: Write>(writer: W, funds: &[ProjectedFund]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for projected in funds {
        for row in &projected.retirement_projection {
            csv_writer.serialize(CsvRow {
                fund_id: &projected.fund.id,
                family_member_id: &projected.fund.family_member_id,
                year: row.year,
                age: row.age,
                phase: row.phase,
                annual_return_rate: row.annual_return_rate.normalize().to_string(),
                begin_amount: format!("{:.2}", row.begin_amount),
                contribution: format!("{:.2}", row.contribution),
                withdrawal: format!("{:.2}", row.withdrawal),
                growth: format!("{:.2}", row.growth),
                end_amount: format!("{:.2}", row.end_amount),
                is_actual_balance: row.is_actual_balance,
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write projected funds as pretty-printed JSON
pub fn write_json<W: Write>(writer: W, funds: &[ProjectedFund]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, funds)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::fund::Fund;
    use crate::projection::cashflows::ProjectionYearEntry;
    use rust_decimal_macros::dec;

    fn projected() -> ProjectedFund {
        ProjectedFund::new(
            Fund::new("f1", "m1", dec!(10000), dec!(100), 12),
            vec![ProjectionYearEntry {
                year: 2026,
                age: 30,
                phase: Phase::Accumulation,
                annual_return_rate: dec!(0.0700),
                begin_amount: dec!(10000.00),
                contribution: dec!(1200.00),
                withdrawal: dec!(0.00),
                growth: dec!(795.12),
                end_amount: dec!(11995.12),
                is_actual_balance: false,
                recorded_growth: None,
            }],
        )
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &[projected()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "fund_id,family_member_id,year,age,phase,annual_return_rate,begin_amount,contribution,withdrawal,growth,end_amount,is_actual_balance"
        );
        assert_eq!(
            lines.next().unwrap(),
            "f1,m1,2026,30,accumulation,0.07,10000.00,1200.00,0.00,795.12,11995.12,false"
        );
        assert!(lines.next().is_none());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_export_errors() {
        let err = write_csv(ClosedPipe, &[projected()]).unwrap_err();
        assert!(matches!(err, ExportError::Io(_) | ExportError::Csv(_)));

        let err = write_json(ClosedPipe, &[projected()]).unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }

    #[test]
    fn test_write_json_carries_fund_fields() {
        let mut out = Vec::new();
        write_json(&mut out, &[projected()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let fund = &value[0];
        assert_eq!(fund["id"], "f1");
        assert_eq!(fund["family_member_id"], "m1");
        assert_eq!(fund["contribution_frequency"], 12);
        assert_eq!(fund["retirement_projection"][0]["year"], 2026);
        let end_amount = fund["retirement_projection"][0]["end_amount"].as_f64().unwrap();
        assert_relative_eq!(end_amount, 11995.12, epsilon = 1e-9);
        assert_eq!(fund["retirement_projection"][0]["is_actual_balance"], false);
    }
}
