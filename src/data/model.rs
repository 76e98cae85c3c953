use serde::Serialize;

// ---------------------------------------------------------------------------
// Table – labelled string columns, as read from a delimited file
// ---------------------------------------------------------------------------

/// One labelled column of raw cell text.  Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<String>>,
}

/// A header row plus data rows, stored column-major.
///
/// Column order follows the source file.  Labels are unique: inserting a
/// column under an existing label replaces that column's values in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build from a header and row-major cells.  Short rows are padded
    /// with empty cells, surplus cells are ignored.  A repeated header gets
    /// a `.1`, `.2`, … suffix so every source column survives.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let n_rows = rows.len();
        let mut table = Table {
            columns: Vec::with_capacity(headers.len()),
            n_rows,
        };
        for (idx, header) in headers.into_iter().enumerate() {
            let mut name = header.clone();
            let mut k = 0;
            while table.column(&name).is_some() {
                k += 1;
                name = format!("{header}.{k}");
            }
            let values = rows.iter().map(|r| r.get(idx).cloned().flatten()).collect();
            table.insert(Column { name, values });
        }
        table
    }

    /// Build from whole columns, applying the same overwrite rule as
    /// [`Self::insert`].
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        let mut table = Table {
            columns: Vec::with_capacity(columns.len()),
            n_rows,
        };
        for column in columns {
            table.insert(column);
        }
        table
    }

    /// Insert a column, overwriting any existing column with the same label.
    pub fn insert(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => existing.values = column.values,
            None => self.columns.push(column),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
}

// ---------------------------------------------------------------------------
// CalibrationRow – one tabulated curve point
// ---------------------------------------------------------------------------

/// A single point of the calibration curve.  Both ages are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationRow {
    /// Calendar age, years before present.
    pub cal_bp: f64,
    /// Conventional radiocarbon age.
    pub c14_age: f64,
    pub sigma: Option<f64>,
}

// ---------------------------------------------------------------------------
// CalibrationDataset – the complete loaded curve
// ---------------------------------------------------------------------------

/// The loaded calibration curve.
///
/// Rows keep their storage order; a copy sorted ascending by `c14_age` is
/// built once at construction for interpolation and charting.  The sort is
/// stable, so rows sharing a `c14_age` keep their file order.
#[derive(Debug, Clone)]
pub struct CalibrationDataset {
    rows: Vec<CalibrationRow>,
    sorted_x: Vec<f64>,
    sorted_y: Vec<f64>,
}

impl CalibrationDataset {
    pub fn from_rows(rows: Vec<CalibrationRow>) -> Self {
        let mut order: Vec<&CalibrationRow> = rows.iter().collect();
        order.sort_by(|a, b| a.c14_age.total_cmp(&b.c14_age));
        let sorted_x = order.iter().map(|r| r.c14_age).collect();
        let sorted_y = order.iter().map(|r| r.cal_bp).collect();
        CalibrationDataset {
            rows,
            sorted_x,
            sorted_y,
        }
    }

    /// Rows in storage (file) order.
    pub fn rows(&self) -> &[CalibrationRow] {
        &self.rows
    }

    /// Radiocarbon ages, ascending.
    pub fn sorted_c14(&self) -> &[f64] {
        &self.sorted_x
    }

    /// Calendar ages paired with [`Self::sorted_c14`].
    pub fn sorted_cal_bp(&self) -> &[f64] {
        &self.sorted_y
    }

    /// `(c14_age, cal_bp)` pairs, ascending by `c14_age`.
    pub fn sorted_points(&self) -> Vec<(f64, f64)> {
        self.sorted_x
            .iter()
            .copied()
            .zip(self.sorted_y.iter().copied())
            .collect()
    }

    /// Covered radiocarbon range `(min, max)`, `None` when empty.
    pub fn c14_range(&self) -> Option<(f64, f64)> {
        Some((*self.sorted_x.first()?, *self.sorted_x.last()?))
    }

    pub fn has_sigma(&self) -> bool {
        self.rows.iter().any(|r| r.sigma.is_some())
    }

    /// Number of curve points.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cal_bp: f64, c14_age: f64) -> CalibrationRow {
        CalibrationRow {
            cal_bp,
            c14_age,
            sigma: None,
        }
    }

    #[test]
    fn sorting_leaves_storage_order_alone() {
        let ds = CalibrationDataset::from_rows(vec![row(300.0, 30.0), row(100.0, 10.0), row(200.0, 20.0)]);
        let stored: Vec<f64> = ds.rows().iter().map(|r| r.c14_age).collect();
        assert_eq!(stored, vec![30.0, 10.0, 20.0]);
        assert_eq!(ds.sorted_c14(), &[10.0, 20.0, 30.0]);
        assert_eq!(ds.sorted_cal_bp(), &[100.0, 200.0, 300.0]);
        assert_eq!(ds.c14_range(), Some((10.0, 30.0)));
    }

    #[test]
    fn duplicate_ages_keep_file_order() {
        let ds = CalibrationDataset::from_rows(vec![row(5.0, 1.0), row(7.0, 0.0), row(9.0, 1.0)]);
        assert_eq!(ds.sorted_points(), vec![(0.0, 7.0), (1.0, 5.0), (1.0, 9.0)]);
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let ds = CalibrationDataset::from_rows(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.c14_range(), None);
    }

    #[test]
    fn duplicate_labels_overwrite_in_place() {
        let mut t = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Some("1".into()), Some("2".into())]],
        );
        t.insert(Column {
            name: "a".into(),
            values: vec![Some("9".into())],
        });
        assert_eq!(t.column_names(), vec!["a", "b"]);
        assert_eq!(t.column("a").unwrap().values, vec![Some("9".to_string())]);
    }

    #[test]
    fn repeated_headers_are_suffixed() {
        let t = Table::from_rows(
            vec!["Sigma".into(), "Age".into(), "Sigma".into()],
            vec![vec![Some("1".into()), Some("2".into()), Some("3".into())]],
        );
        assert_eq!(t.column_names(), vec!["Sigma", "Age", "Sigma.1"]);
        assert_eq!(t.column("Sigma.1").unwrap().values, vec![Some("3".to_string())]);
    }

    #[test]
    fn short_rows_are_padded() {
        let t = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Some("1".into())]],
        );
        assert_eq!(t.column("b").unwrap().values, vec![None]);
        assert_eq!(t.n_rows(), 1);
    }
}
