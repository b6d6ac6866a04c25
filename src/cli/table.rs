//! Table formatting for CLI list commands
//!
//! Rows are built from typed cells so every list command gets the same TSV,
//! CSV, Markdown and id-only renderings.

use chrono::{DateTime, Local, NaiveDate, Utc};
use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record id (cyan)
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Preformatted amount, right aligned
    Money(String),
    /// Supplier rating out of 5
    Rating(f64),
    /// Whole percentage with color coding (100=green, >0=yellow, 0=dim)
    Percent(u8),
    /// Status keyword with color coding
    Status(String),
    /// Yes/no flag (yes=green)
    Flag(bool),
    /// Calendar date
    Day(NaiveDate),
    /// Timestamp shown in local time
    DateTime(DateTime<Utc>),
    /// Integer value
    Number(i64),
    /// Float value with precision
    Float(f64, usize),
    /// Placeholder
    Empty,
}

fn styled_status(s: &str) -> console::StyledObject<&str> {
    match s.to_lowercase().as_str() {
        "approved" | "accepted" | "awarded" | "low" | "sent" => style(s).green(),
        "pending" | "quoted" | "medium" | "draft" => style(s).yellow(),
        "rejected" | "high" => style(s).red().bold(),
        "closed" => style(s).dim(),
        _ => style(s).white(),
    }
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width.saturating_sub(1)), width = width)
            }
            CellValue::Money(s) => format!("{:>width$}", s, width = width),
            CellValue::Rating(r) => {
                let s = format!("{:.1}", r);
                let styled = if *r >= 4.5 {
                    style(s).green()
                } else if *r >= 4.0 {
                    style(s).white()
                } else {
                    style(s).yellow()
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Percent(p) => {
                let s = format!("{}%", p);
                let styled = match p {
                    100 => style(s).green(),
                    0 => style(s).dim(),
                    _ => style(s).yellow(),
                };
                format!("{:>width$}", styled, width = width)
            }
            CellValue::Status(s) => format!("{:<width$}", styled_status(s), width = width),
            CellValue::Flag(b) => {
                let styled = if *b { style("yes").green() } else { style("no").dim() };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Day(d) => format!("{:<width$}", d.format("%Y-%m-%d"), width = width),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                format!("{:<width$}", local.format("%Y-%m-%d %H:%M"), width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Float(f, precision) => {
                format!("{:>width$.prec$}", f, width = width, prec = precision)
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Money(s) | CellValue::Status(s) => {
                escape_csv(s)
            }
            CellValue::Empty => String::new(),
            other => other.raw(),
        }
    }

    /// Raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Money(s) | CellValue::Status(s) => {
                s.clone()
            }
            CellValue::Rating(r) => format!("{:.1}", r),
            CellValue::Percent(p) => format!("{}%", p),
            CellValue::Flag(b) => (if *b { "yes" } else { "no" }).to_string(),
            CellValue::Day(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%d %H:%M").to_string()
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Display width of the unstyled content
    pub fn display_width(&self) -> usize {
        self.raw().chars().count()
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            show_summary: true,
        }
    }

    /// Drop the "N thing(s) found" line
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Output rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.output_csv(&rows),
            OutputFormat::Md => self.output_md(&rows),
            OutputFormat::Id => {
                for row in &rows {
                    println!("{}", row.id);
                }
            }
            _ => self.output_tsv(&rows),
        }
    }

    /// Column widths from content, capped at each column's maximum
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);
                col.header.len().max(max_content + 1).min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = w))
            .collect();
        println!("{}", header.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => CellValue::Empty.format_tsv(*w),
                })
                .collect();
            println!("{}", parts.join(" "));
        }

        if self.show_summary {
            println!();
            println!("{} {}(s) found.", style(rows.len()).cyan(), self.entity_name);
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let header: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        println!("{}", header.join(","));
        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            println!("{}", parts.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow]) {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(self.columns.iter().map(|col| {
                row.get(col.key)
                    .map(CellValue::raw)
                    .unwrap_or_else(|| "-".to_string())
                    .replace('|', "\\|")
            }));
        }
        println!("{}", builder.build().with(Style::markdown()));
    }
}
