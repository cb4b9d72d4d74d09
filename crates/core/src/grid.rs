//! Rectangular sample grid loaded from a delimited text file
//!
//! Rows are time layers and columns are spatial samples:
//! `grid.get(t, x)` is the value at time index `t` and space index `x`.
//! Values are stored row-major in a single buffer.
//!
//! # File format
//!
//! One row per line, comma-separated decimal numbers, no header. Fields may
//! carry a sign and an exponent and are trimmed of surrounding whitespace.
//! Blank lines are skipped. Every row must have the same number of fields.

use crate::error::{Location, PlotError, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Default data file name, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "res.csv";

/// Label used in errors for grids that did not come from a file
const IN_MEMORY: &str = "<memory>";

/// Two-dimensional scalar field sampled over `(t, x)` index space
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Values in row-major order (`t * x_size + x`)
    values: Vec<f64>,
    /// Number of rows (time layers)
    t_size: usize,
    /// Number of columns (spatial samples)
    x_size: usize,
}

impl Grid {
    /// Load a grid from a comma-separated file
    ///
    /// # Errors
    /// - `FileAccess` if the path cannot be opened or read
    /// - `Parse` if any field is not a valid number
    /// - `Shape` if the file has no rows or rows have differing field counts
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PlotError::file_access(path, e))?;
        let grid = Self::from_reader(file, path)?;
        debug!(
            "Loaded {}x{} grid from {}",
            grid.t_size,
            grid.x_size,
            path.display()
        );
        Ok(grid)
    }

    /// Parse a grid from any reader
    ///
    /// `origin` only labels errors.
    ///
    /// # Errors
    /// Same as [`Grid::load`].
    pub fn from_reader<R: Read>(reader: R, origin: impl AsRef<Path>) -> Result<Self> {
        let origin = origin.as_ref();
        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b',')
            .trim(Trim::All)
            // Ragged rows are reported as shape errors below
            .flexible(true)
            .from_reader(reader);

        let mut values = Vec::new();
        let mut x_size = None;
        let mut t_size = 0;

        for result in csv.records() {
            let record = result.map_err(|e| csv_error(origin, e))?;
            let line = record.position().map_or(t_size as u64 + 1, csv::Position::line);

            match x_size {
                None => x_size = Some(record.len()),
                Some(expected) if expected != record.len() => {
                    return Err(PlotError::shape(
                        origin,
                        format!("row at line {line} has a different field count"),
                        format!("{expected} fields"),
                        format!("{} fields", record.len()),
                    ));
                }
                Some(_) => {}
            }

            for (idx, field) in record.iter().enumerate() {
                let value = field.parse::<f64>().map_err(|e| {
                    PlotError::parse(
                        origin,
                        Location::field(line, idx + 1),
                        format!("'{field}' is not a number: {e}"),
                    )
                })?;
                values.push(value);
            }
            t_size += 1;
        }

        let Some(x_size) = x_size else {
            return Err(PlotError::shape(
                origin,
                "no rows to determine column count from",
                "at least 1 row",
                "0 rows",
            ));
        };

        Self::from_parts(values, t_size, x_size, origin)
    }

    /// Build a grid from nested rows, checking that it is rectangular
    ///
    /// # Errors
    /// Returns `Shape` if there are no rows, no columns, or the rows differ
    /// in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let t_size = rows.len();
        let x_size = rows.first().map_or(0, Vec::len);

        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != x_size) {
            return Err(PlotError::shape(
                IN_MEMORY,
                format!("row {idx} has a different length"),
                format!("{x_size} values"),
                format!("{} values", row.len()),
            ));
        }

        let values = rows.into_iter().flatten().collect();
        Self::from_parts(values, t_size, x_size, IN_MEMORY)
    }

    /// Build a grid from a row-major buffer
    ///
    /// # Errors
    /// Returns `Shape` if either dimension is zero or the buffer length is
    /// not `t_size * x_size`.
    pub fn from_values(values: Vec<f64>, t_size: usize, x_size: usize) -> Result<Self> {
        Self::from_parts(values, t_size, x_size, IN_MEMORY)
    }

    fn from_parts(
        values: Vec<f64>,
        t_size: usize,
        x_size: usize,
        origin: impl AsRef<Path>,
    ) -> Result<Self> {
        if t_size == 0 || x_size == 0 {
            return Err(PlotError::shape(
                origin,
                "degenerate grid",
                "at least 1x1",
                format!("{t_size}x{x_size}"),
            ));
        }
        let Some(cells) = t_size.checked_mul(x_size) else {
            return Err(PlotError::shape(
                origin,
                "dimensions overflow the addressable cell count",
                format!("at most {} cells", usize::MAX),
                format!("{t_size}x{x_size}"),
            ));
        };
        if values.len() != cells {
            return Err(PlotError::shape(
                origin,
                "buffer length does not match dimensions",
                format!("{cells} values"),
                format!("{} values", values.len()),
            ));
        }
        Ok(Self {
            values,
            t_size,
            x_size,
        })
    }

    /// Number of rows (time layers)
    pub fn t_size(&self) -> usize {
        self.t_size
    }

    /// Number of columns (spatial samples)
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Shape as `(t_size, x_size)`
    pub fn shape(&self) -> (usize, usize) {
        (self.t_size, self.x_size)
    }

    /// Value at time index `t` and space index `x`
    pub fn get(&self, t: usize, x: usize) -> Option<f64> {
        if t < self.t_size && x < self.x_size {
            Some(self.values[t * self.x_size + x])
        } else {
            None
        }
    }

    /// One time layer
    pub fn row(&self, t: usize) -> Option<&[f64]> {
        if t < self.t_size {
            let start = t * self.x_size;
            Some(&self.values[start..start + self.x_size])
        } else {
            None
        }
    }

    /// Iterate over time layers in order
    pub fn rows(&self) -> std::slice::Chunks<'_, f64> {
        self.values.chunks(self.x_size)
    }

    /// Raw row-major values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Minimum and maximum over finite values, `None` if there are none
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Write the grid in the same format [`Grid::load`] reads
    ///
    /// # Errors
    /// Returns `FileAccess` (labelled with `origin`) if the writer fails.
    pub fn write_csv<W: Write>(&self, writer: W, origin: impl AsRef<Path>) -> Result<()> {
        let origin = origin.as_ref();
        let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
        for row in self.rows() {
            csv.write_record(row.iter().map(ToString::to_string))
                .map_err(|e| csv_error(origin, e))?;
        }
        csv.flush().map_err(|e| PlotError::file_access(origin, e))
    }

    /// Save the grid to a file
    ///
    /// # Errors
    /// Returns `FileAccess` if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PlotError::file_access(path, e))?;
        self.write_csv(file, path)?;
        debug!(
            "Wrote {}x{} grid to {}",
            self.t_size,
            self.x_size,
            path.display()
        );
        Ok(())
    }
}

/// Map a csv failure to the crate taxonomy
fn csv_error(origin: &Path, err: csv::Error) -> PlotError {
    let location = err
        .position()
        .map_or_else(Location::default, |p| Location::line(p.line()));
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PlotError::file_access(origin, source),
        _ => PlotError::parse(origin, location, message),
    }
}
