use serde::{Deserialize, Serialize};

/// One loaded roster file: a header row plus string cells, one row per
/// agent record. Construction pads or truncates every row to the header
/// width, so column access never indexes out of bounds on a ragged file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Snapshot {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of a named column, top to bottom. `None` when the column is
    /// absent; callers decide whether absence is an error.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// New table with one header renamed; unchanged clone when `from` is
    /// not present.
    pub fn rename_column(&self, from: &str, to: &str) -> Snapshot {
        let mut out = self.clone();
        if let Some(idx) = out.column_index(from) {
            out.headers[idx] = to.to_string();
        }
        out
    }

    /// New table with every cell passed through `f`. Headers are left
    /// untouched.
    pub fn map_cells(&self, f: impl Fn(&str) -> String) -> Snapshot {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| f(cell)).collect())
            .collect();
        Snapshot {
            headers: self.headers.clone(),
            rows,
        }
    }
}
