use serde::Serialize;

#[derive(Debug, Default)]
pub struct Report {
    buf: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn banner(&mut self, title: &str) {
        let stars = "*".repeat(title.len() + 6);
        self.line(&stars);
        self.line(format!("** {} **", title));
        self.line(&stars);
    }

    pub fn table(&mut self, title: &str, header: &[String], rows: &[Vec<String>]) {
        self.banner(title);
        self.buf.push_str(&format_table(header, rows));
        self.buf.push('\n');
    }

    /// Pretty JSON dump of a serializable value under a banner
    pub fn json<T: Serialize>(&mut self, title: &str, value: &T) {
        self.banner(title);
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.line(json),
            Err(e) => self.line(format!("failed to serialize: {}", e)),
        }
        self.buf.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Left-aligned columns joined by `" | "` with a dashed rule under the header
pub fn format_table(header: &[String], rows: &[Vec<String>]) -> String {
    let cols = header.len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return format!("row {} has {} columns, expected {}\n", idx, row.len(), cols);
    }

    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            rows.iter()
                .map(|r| r[c].chars().count())
                .chain(std::iter::once(header[c].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let head = render(header);
    let mut out = String::with_capacity(head.len() * (rows.len() + 2));
    out.push_str(&head);
    out.push('\n');
    out.push_str(&"-".repeat(head.chars().count()));
    out.push('\n');
    for row in rows {
        out.push_str(&render(row));
        out.push('\n');
    }
    out
}

/// Convenience for building a header from string literals
pub fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}
