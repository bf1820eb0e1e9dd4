//! Table rendering utilities for CLI outputs.

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    separator: Option<String>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            separator: None,
        }
    }

    /// Draw a rule under the header, repeating `sep` (blank disables it).
    pub fn with_separator(mut self, sep: &str) -> Self {
        self.separator = Some(sep.to_string()).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Columns grow to fit their widest cell.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(col.header.chars().count()))
                    .fold(col.width, usize::max)
            })
            .collect();

        let mut out = String::new();

        for (col, w) in self.columns.iter().zip(&widths) {
            out.push_str(&format!("{:<width$} ", col.header, width = *w));
        }
        out.push('\n');

        if let Some(sep) = &self.separator {
            let total = widths.iter().map(|w| w + 1).sum::<usize>().saturating_sub(1);
            let unit = sep.chars().count().max(1);
            out.push_str(&sep.repeat(total.div_ceil(unit)));
            out.push('\n');
        }

        for row in &self.rows {
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&format!("{:<width$} ", cell, width = *w));
            }
            out.push('\n');
        }

        out
    }
}
