//! Row-oriented text tables for density snapshots and trajectories.
//!
//! A snapshot table has one row per frame. Fields are separated by `,` and
//! every row ends with `;` (a newline after it is optional):
//!
//! ```text
//! 0.00000,0.2,0.2,0.2,0,0;
//! 0.10000,0.2,0.2,0.1,0.1,0;
//! ```
//!
//! The first field is the time rounded to a fixed number of decimals, the
//! rest are densities in spatial order. Densities are written with Rust's
//! shortest round-trip formatting, so they read back bit for bit.
//!
//! Reading fails on anything malformed: an empty table, a field that is not
//! a number, a row with a different field count than the first one, a
//! missing terminator or time that does not strictly increase.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use thiserror::Error;

use crate::{DensitySnapshot, SnapshotSeries, tracer::Trajectory};

/// Decimal places used for the time column by default.
pub const TIME_PRECISION: usize = 5;

/// Errors that can occur when reading or writing a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("table has no rows")]
    Empty,

    #[error("row {row} has no density fields")]
    NoDensity { row: usize },

    #[error("row {row}, field {field}: {text:?} is not a number")]
    Parse {
        row: usize,
        field: usize,
        text: String,
    },

    #[error("row {row} has {found} fields, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} is not terminated by ';'")]
    Unterminated { row: usize },

    #[error("time {time} in row {row} does not increase")]
    NonIncreasingTime { row: usize, time: f64 },
}

/// Writes `series` as a snapshot table with `precision` decimals for time.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_snapshots<W: Write>(
    mut writer: W,
    series: &SnapshotSeries,
    precision: usize,
) -> Result<(), TableError> {
    for snapshot in series {
        write!(writer, "{:.precision$}", snapshot.time)?;
        for u in &snapshot.density {
            write!(writer, ",{u}")?;
        }
        writeln!(writer, ";")?;
    }
    writer.flush()?;

    tracing::debug!(rows = series.len(), "wrote snapshot table");
    Ok(())
}

/// Reads a snapshot table.
///
/// # Errors
///
/// Returns an error if reading fails or the table is malformed.
pub fn read_snapshots<R: Read>(mut reader: R) -> Result<SnapshotSeries, TableError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let rows = split_rows(&text)?;
    let Some(first) = rows.first() else {
        return Err(TableError::Empty);
    };
    let expected = first.len();

    let mut snapshots: Vec<DensitySnapshot> = Vec::with_capacity(rows.len());
    for (row, fields) in rows.iter().enumerate() {
        if fields.len() != expected {
            return Err(TableError::Ragged {
                row,
                expected,
                found: fields.len(),
            });
        }
        if fields.len() < 2 {
            return Err(TableError::NoDensity { row });
        }

        let values = fields
            .iter()
            .enumerate()
            .map(|(field, text)| {
                text.parse::<f64>().map_err(|_| TableError::Parse {
                    row,
                    field,
                    text: (*text).to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let time = values[0];
        if snapshots.last().is_some_and(|previous| time <= previous.time) {
            return Err(TableError::NonIncreasingTime { row, time });
        }

        snapshots.push(DensitySnapshot {
            time,
            density: values[1..].to_vec(),
        });
    }

    tracing::debug!(rows = snapshots.len(), nodes = expected - 1, "read snapshot table");
    Ok(SnapshotSeries::new(snapshots))
}

/// Writes a snapshot table to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_snapshots(
    path: impl AsRef<Path>,
    series: &SnapshotSeries,
    precision: usize,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_snapshots(BufWriter::new(file), series, precision)
}

/// Reads a snapshot table from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_snapshots(path: impl AsRef<Path>) -> Result<SnapshotSeries, TableError> {
    let file = File::open(path)?;
    read_snapshots(BufReader::new(file))
}

/// Writes trajectories as rows of `start_time,time,position,speed;`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_trajectories<W: Write>(
    mut writer: W,
    trajectories: &[Trajectory],
) -> Result<(), TableError> {
    for trajectory in trajectories {
        for point in trajectory.points() {
            writeln!(
                writer,
                "{},{},{},{};",
                trajectory.start_time(),
                point.time,
                point.position,
                point.speed
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes a trajectory table to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_trajectories(path: impl AsRef<Path>, trajectories: &[Trajectory]) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_trajectories(BufWriter::new(file), trajectories)
}

/// Splits a table into rows of trimmed fields.
fn split_rows(text: &str) -> Result<Vec<Vec<&str>>, TableError> {
    let mut chunks: Vec<&str> = text.split(';').collect();

    // Everything after the last ';' must be blank.
    let tail = chunks.pop().unwrap_or_default();
    if !tail.trim().is_empty() {
        return Err(TableError::Unterminated { row: chunks.len() });
    }

    Ok(chunks
        .into_iter()
        .map(|chunk| chunk.split(',').map(str::trim).collect())
        .collect())
}

/// Parses a trajectory table line by line.
///
/// Each item is one row as `[start_time, time, position, speed]`. Blank
/// lines are skipped; unreadable lines and malformed rows yield an error.
pub fn trajectory_rows<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<[f64; 4], TableError>> {
    reader
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |line| !line.trim().is_empty()))
        .map(|(row, line)| -> Result<[f64; 4], TableError> {
            let line = line?;
            let Some(body) = line.trim().strip_suffix(';') else {
                return Err(TableError::Unterminated { row });
            };
            let fields: Vec<&str> = body.split(',').map(str::trim).collect();
            if fields.len() != 4 {
                return Err(TableError::Ragged {
                    row,
                    expected: 4,
                    found: fields.len(),
                });
            }
            let mut values = [0.0; 4];
            for (field, (slot, text)) in values.iter_mut().zip(&fields).enumerate() {
                *slot = text.parse().map_err(|_| TableError::Parse {
                    row,
                    field,
                    text: (*text).to_owned(),
                })?;
            }
            Ok(values)
        })
}
