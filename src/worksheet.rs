//! Worksheets handed over by a spreadsheet reader.
//!
//! A worksheet is a named matrix of optional cells whose first row holds the
//! column headers. With the `csv` feature, worksheets can be loaded from CSV text.

use crate::Row;
use serde::{Deserialize, Serialize};

/// Name of the worksheet picked from multi-sheet workbooks.
pub const AUTHORS_SHEET: &str = "Authors";

/// A named sheet of rows, header row first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    pub data: Vec<Row>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, data: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Splits the sheet into its header names and its data rows.
    ///
    /// Missing header cells read as empty names. An empty sheet has no headers
    /// and no rows.
    pub fn split_header(&self) -> (Vec<String>, &[Row]) {
        match self.data.split_first() {
            Some((header, rows)) => {
                let names = header
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or_default().trim().to_string())
                    .collect();
                (names, rows)
            }
            None => (Vec::new(), &[]),
        }
    }

    /// Whether the sheet has at least one row below the header.
    pub fn has_data(&self) -> bool {
        self.data.len() > 1
    }

    /// Loads a worksheet from CSV text.
    ///
    /// Empty cells become `None`, rows of only empty cells are dropped and rows
    /// may have differing lengths.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::Worksheet`](crate::ArrangeError::Worksheet) if the
    /// text is not valid CSV.
    ///
    /// # Examples
    ///
    /// ```
    /// use author_arranger::Worksheet;
    ///
    /// let sheet = Worksheet::from_csv("Authors", "First,Last\nAda,Lovelace\n").unwrap();
    /// let (headers, rows) = sheet.split_header();
    /// assert_eq!(headers, vec!["First", "Last"]);
    /// assert_eq!(rows.len(), 1);
    /// ```
    #[cfg(feature = "csv")]
    pub fn from_csv<S: AsRef<str>>(name: &str, csv_text: S) -> crate::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_text.as_ref().as_bytes());

        let mut data = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Row = record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect();

            if row.iter().all(Option::is_none) {
                continue;
            }
            data.push(row);
        }

        log::debug!("loaded worksheet \"{name}\" with {} rows", data.len());
        Ok(Self::new(name, data))
    }
}

/// Picks the worksheet to arrange: the only sheet, or the one named "Authors".
pub fn select_worksheet(sheets: &[Worksheet]) -> Option<&Worksheet> {
    match sheets {
        [only] => Some(only),
        _ => sheets.iter().find(|sheet| sheet.name == AUTHORS_SHEET),
    }
}
