//! Tabular (CSV) registry sources
//!
//! Layout:
//! ```text
//! m1,m2,m3
//! 110001,560034,400001
//! 110002,,400002
//! 110003
//! ```
//! Each header is a merchant id and each column lists the pincodes that
//! merchant serves. Columns may be ragged; empty cells are ignored.

use crate::model::{MerchantId, Pincode};
use crate::{Error, Registry, Result};
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Build a registry from a CSV reader
pub fn from_csv_reader(reader: impl Read) -> Result<Registry> {
    let started = Instant::now();
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let merchants: Vec<MerchantId> = csv
        .headers()?
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let name = name.trim();
            if name.is_empty() {
                Err(Error::MalformedInput(format!(
                    "column {} has an empty merchant id",
                    col + 1
                )))
            } else {
                Ok(MerchantId::new(name))
            }
        })
        .collect::<Result<_>>()?;

    let mut columns: Vec<Vec<Pincode>> = vec![Vec::new(); merchants.len()];
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        for (col, cell) in record.iter().enumerate() {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let column = columns.get_mut(col).ok_or_else(|| {
                Error::MalformedInput(format!(
                    "line {}: value {:?} in column {} has no merchant header",
                    line,
                    cell,
                    col + 1
                ))
            })?;
            let code = Pincode::parse(cell).map_err(|_| {
                Error::MalformedInput(format!(
                    "line {}: {:?} under merchant {} is not a pincode",
                    line, cell, merchants[col]
                ))
            })?;
            column.push(code);
        }
    }

    let mut registry = Registry::new();
    let mut pairs = 0usize;
    for (merchant, codes) in merchants.into_iter().zip(&columns) {
        pairs += registry.load_merchant(codes, merchant);
    }
    debug!(
        columns = columns.len(),
        pairs,
        elapsed = ?started.elapsed(),
        "built registry from table"
    );
    Ok(registry)
}

/// Build a registry from a CSV file
pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Registry> {
    let file = std::fs::File::open(path.as_ref())?;
    from_csv_reader(file)
}
