use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use super::format::{format_g, format_row};
use super::table::AngleTable;

pub const DEFAULT_COMMENT: &str = "angle table generated by tabulate-angle";
const CONTRIBUTOR: &str = "tabulate-angle";

/// Renders [`AngleTable`]s in the `angle_style table` file format.
#[derive(Debug, Clone)]
pub struct TableWriter {
    date: NaiveDate,
    comment: String,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableWriter {
    /// Header dated today, local time.
    pub fn new() -> Self {
        Self {
            date: Local::now().date_naive(),
            comment: DEFAULT_COMMENT.to_string(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[tracing::instrument(skip(self, table, out), fields(label = table.label()))]
    pub fn write<W: Write + ?Sized>(&self, table: &AngleTable, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "# DATE: {} UNITS: {} CONTRIBUTOR: {}",
            self.date.format("%Y-%m-%d"),
            table.units(),
            CONTRIBUTOR
        )?;
        writeln!(out, "# {}", self.comment)?;
        writeln!(out)?;
        writeln!(out, "{}", table.label())?;
        writeln!(out, "N {} EQ {}", table.len(), format_g(table.eq(), 6))?;
        writeln!(out)?;
        for p in table.points() {
            writeln!(out, "{}", format_row(p.index, p.angle, p.energy, p.force))?;
        }
        out.flush().context("Failed to flush table output")?;
        Ok(())
    }
}

/// `-` is stdout; anything else is a file opened for appending, so several
/// tables can share one file.
pub fn open_output(filename: &str) -> Result<Box<dyn Write>> {
    if filename == "-" {
        return Ok(Box::new(io::stdout().lock()));
    }
    let path = Path::new(filename);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open table file {:?}", path))?;
    Ok(Box::new(io::BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabulate::{AngleTabulator, HarmonicAngle, Units};
    use std::fs;
    use tempfile::tempdir;

    fn harmonic_table(n: usize) -> AngleTable {
        AngleTabulator::new(n)
            .tabulate(&HarmonicAngle::default(), "HARM", Units::Real)
            .unwrap()
    }

    fn writer() -> TableWriter {
        TableWriter::new().with_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_write_header_and_rows() {
        let mut out = Vec::new();
        writer().write(&harmonic_table(3), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# DATE: 2024-03-01 UNITS: real CONTRIBUTOR: tabulate-angle");
        assert_eq!(lines[1], "# angle table generated by tabulate-angle");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "HARM");
        assert_eq!(lines[4], "N 3 EQ 90");
        assert_eq!(lines[5], "");
        assert_eq!(lines.len(), 9);
        assert!(lines[6].starts_with("       1  0 "));
        assert!(lines[7].starts_with("       2  90 "));
        assert!(lines[8].starts_with("       3  180 "));
    }

    #[test]
    fn test_rows_parse_back_to_samples() {
        let table = harmonic_table(181);
        let mut out = Vec::new();
        writer().write(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rows: Vec<Vec<f64>> = text
            .lines()
            .skip(6)
            .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows.len(), 181);
        for (row, p) in rows.iter().zip(table.points()) {
            assert_eq!(row[0] as usize, p.index);
            assert!((row[1] - p.angle).abs() < 1e-12);
            assert!((row[2] - p.energy).abs() < 1e-12);
            assert!((row[3] - p.force).abs() < 1e-12);
        }
        assert!(text.contains("N 181 EQ 120\n"));
    }

    #[test]
    fn test_custom_comment() {
        let mut out = Vec::new();
        writer()
            .with_comment("water bend")
            .write(&harmonic_table(2), &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\n# water bend\n"));
    }

    #[test]
    fn test_open_output_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("angle.table");
        let table = harmonic_table(2);

        for _ in 0..2 {
            let mut out = open_output(path.to_str().unwrap()).unwrap();
            writer().write(&table, &mut out).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("\nHARM\n").count(), 2);
    }
}
