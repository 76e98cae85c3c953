use std::path::Path;

use log::{debug, info};

use super::columns::{self, C14_AGE, CAL_BP, SIGMA};
use super::model::{CalibrationDataset, CalibrationRow, Column, Table};
use crate::error::{CalibrationError, RowError};

// ---------------------------------------------------------------------------
// Delimited table reader
// ---------------------------------------------------------------------------

/// Read a delimited text file with a header row.
///
/// Blank lines and lines starting with `#` are skipped.  The delimiter is
/// taken from the header line: comma if it has one, else tab, else runs
/// of whitespace (see [`splits_on_whitespace`]).  Fields are trimmed and
/// empty cells become `None`.
pub fn read_table(path: &Path) -> Result<Table, CalibrationError> {
    if !path.exists() {
        return Err(CalibrationError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| CalibrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&text)
}

/// Text counterpart of [`read_table`].
pub fn parse_table(text: &str) -> Result<Table, CalibrationError> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| {
            let t = l.trim_start();
            !t.is_empty() && !t.starts_with('#')
        })
        .collect();

    let Some(header) = lines.first() else {
        return Ok(Table::default());
    };

    let (delimiter, body) = if header.contains(',') {
        (b',', lines.join("\n"))
    } else if header.contains('\t') {
        (b'\t', lines.join("\n"))
    } else if !splits_on_whitespace(&lines) {
        (b',', lines.join("\n"))
    } else {
        let rejoined: Vec<String> = lines
            .iter()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(","))
            .collect();
        (b',', rejoined.join("\n"))
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect(),
        );
    }

    Ok(Table::from_rows(headers, rows))
}

/// Whitespace splitting applies only when the header and the first data
/// line break into the same number of fields (and more than one), so a
/// single spaced label like `14C Age` stays one column.
fn splits_on_whitespace(lines: &[&str]) -> bool {
    let count = |l: &str| l.split_whitespace().count();
    match lines {
        [header, first, ..] => {
            let n = count(header);
            n > 1 && n == count(first)
        }
        [header] => count(header) > 1,
        [] => false,
    }
}

/// Interpret a cell as a finite number.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Calibration dataset
// ---------------------------------------------------------------------------

/// Load a calibration curve from a delimited file.
pub fn load_calibration(path: &Path) -> Result<CalibrationDataset, CalibrationError> {
    let table = read_table(path)?;
    dataset_from_table(table)
}

/// Normalize headers, check the required columns, and keep the rows whose
/// retained cells are all present and numeric.
pub fn dataset_from_table(table: Table) -> Result<CalibrationDataset, CalibrationError> {
    let table = columns::normalize(table);

    let (Some(cal), Some(c14)) = (table.column(CAL_BP), table.column(C14_AGE)) else {
        return Err(CalibrationError::MissingColumns {
            observed: table.column_names(),
        });
    };
    let sigma = table.column(SIGMA);

    let parsed: Vec<Result<CalibrationRow, RowError>> = (0..table.n_rows())
        .map(|row| parse_row(row, cal, c14, sigma))
        .collect();

    let (rows, rejected): (Vec<_>, Vec<_>) = parsed.into_iter().partition(Result::is_ok);
    for err in rejected.iter().filter_map(|r| r.as_ref().err()) {
        debug!("Dropping calibration row: {err}");
    }

    let rows: Vec<CalibrationRow> = rows.into_iter().filter_map(Result::ok).collect();
    info!(
        "Calibration dataset loaded: {} rows ({} dropped)",
        rows.len(),
        rejected.len()
    );
    Ok(CalibrationDataset::from_rows(rows))
}

/// Parse one row of the retained columns.
///
/// Missing cells are checked across every retained column before any
/// numeric conversion is attempted.
pub fn parse_row(
    row: usize,
    cal: &Column,
    c14: &Column,
    sigma: Option<&Column>,
) -> Result<CalibrationRow, RowError> {
    let cal_text = cell(cal, row, CAL_BP)?;
    let c14_text = cell(c14, row, C14_AGE)?;
    let sigma_text = sigma.map(|col| cell(col, row, SIGMA)).transpose()?;

    Ok(CalibrationRow {
        cal_bp: number(cal_text, row, CAL_BP)?,
        c14_age: number(c14_text, row, C14_AGE)?,
        sigma: sigma_text.map(|t| number(t, row, SIGMA)).transpose()?,
    })
}

fn cell<'a>(col: &'a Column, row: usize, column: &'static str) -> Result<&'a str, RowError> {
    col.values
        .get(row)
        .and_then(|v| v.as_deref())
        .ok_or(RowError::Missing { row, column })
}

fn number(text: &str, row: usize, column: &'static str) -> Result<f64, RowError> {
    parse_number(text).ok_or_else(|| RowError::NotNumeric {
        row,
        column,
        value: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Uploaded sample ages
// ---------------------------------------------------------------------------

/// Read raw ages from an uploaded table file.
pub fn load_sample_ages(path: &Path) -> Result<Vec<f64>, CalibrationError> {
    sample_ages(read_table(path)?)
}

/// Pull raw ages out of an uploaded table.
///
/// Uses the `c14_age` column when normalization finds one, otherwise the
/// first column whose every filled cell is numeric.  Empty and `NaN`
/// cells are skipped.
pub fn sample_ages(table: Table) -> Result<Vec<f64>, CalibrationError> {
    let table = columns::normalize(table);

    if let Some(col) = table.column(C14_AGE) {
        return column_values(col);
    }

    let col = table
        .columns()
        .iter()
        .find(|c| is_numeric_column(c))
        .ok_or(CalibrationError::NoNumericColumn)?;
    debug!("No c14_age column in upload, using '{}'", col.name);
    column_values(col)
}

fn column_values(col: &Column) -> Result<Vec<f64>, CalibrationError> {
    let mut out = Vec::with_capacity(col.values.len());
    for cell in col.values.iter().flatten() {
        let value = cell
            .parse::<f64>()
            .map_err(|_| CalibrationError::UploadValue {
                column: col.name.clone(),
                value: cell.clone(),
            })?;
        if !value.is_nan() {
            out.push(value);
        }
    }
    Ok(out)
}

fn is_numeric_column(col: &Column) -> bool {
    let mut filled = col.values.iter().flatten().peekable();
    filled.peek().is_some() && filled.all(|cell| cell.parse::<f64>().is_ok())
}
