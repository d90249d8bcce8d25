//! Load funds from JSON and recorded actuals from CSV

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ActualDataEntry, Fund};
use crate::error::LoadError;

/// Either the stored `retirement_fund_data` envelope or a bare fund list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FundDocument {
    Envelope {
        #[serde(alias = "retirement-fund-data")]
        retirement_fund_data: Vec<Fund>,
    },
    Funds(Vec<Fund>),
}

/// Raw CSV row: fund_id,year,actual_balance,actual_contributions,actual_growth
#[derive(Debug, Deserialize)]
struct ActualCsvRow {
    fund_id: String,
    year: i32,
    actual_balance: Decimal,
    actual_contributions: Decimal,
    actual_growth: Decimal,
}

impl ActualCsvRow {
    fn into_entry(self) -> (String, ActualDataEntry) {
        let entry = ActualDataEntry::new(
            self.year,
            self.actual_balance,
            self.actual_contributions,
            self.actual_growth,
        );
        (self.fund_id, entry)
    }
}

/// Load funds from a JSON file
pub fn load_funds<P: AsRef<Path>>(path: P) -> Result<Vec<Fund>, LoadError> {
    let file = File::open(path)?;
    load_funds_from_reader(BufReader::new(file))
}

/// Load funds from any reader
pub fn load_funds_from_reader<R: Read>(reader: R) -> Result<Vec<Fund>, LoadError> {
    let document: FundDocument = serde_json::from_reader(reader)?;
    let funds = match document {
        FundDocument::Envelope { retirement_fund_data } => retirement_fund_data,
        FundDocument::Funds(funds) => funds,
    };
    log::debug!("loaded {} funds", funds.len());
    Ok(funds)
}

/// Load actual-data rows from a CSV file, in file order
pub fn load_actual_data<P: AsRef<Path>>(path: P) -> Result<Vec<(String, ActualDataEntry)>, LoadError> {
    let file = File::open(path)?;
    load_actual_data_from_reader(file)
}

/// Load actual-data rows from any reader, in input order
pub fn load_actual_data_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<(String, ActualDataEntry)>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ActualCsvRow = result?;
        rows.push(row.into_entry());
    }

    Ok(rows)
}

/// Append actual-data rows to the funds they name.
///
/// Rows are appended after any actual data the fund already carries, so
/// recorded JSON entries keep precedence for a duplicated year.
pub fn attach_actual_data(
    mut funds: Vec<Fund>,
    rows: Vec<(String, ActualDataEntry)>,
) -> Result<Vec<Fund>, LoadError> {
    let index: HashMap<String, usize> = funds
        .iter()
        .enumerate()
        .map(|(i, fund)| (fund.id.clone(), i))
        .collect();

    for (fund_id, entry) in rows {
        let Some(&i) = index.get(&fund_id) else {
            return Err(LoadError::UnknownFund { fund_id });
        };
        funds[i].actual_data.push(entry);
    }

    Ok(funds)
}
