//! Positions CSV: `timestamp,cup_x,cup_y,block_x,block_y`

use crate::{
    constants::{POSITIONS_HEADER, TIMESTAMP_FORMAT},
    error::{PlacementError, Result},
    geometry::{Placement, PlacementPair},
};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Read},
    path::{Path, PathBuf},
};

/// Receives each accepted pair as soon as it is accepted
pub trait PairSink {
    fn accept(&mut self, pair: &PlacementPair) -> Result<()>;
}

impl PairSink for Vec<PlacementPair> {
    fn accept(&mut self, pair: &PlacementPair) -> Result<()> {
        self.push(pair.clone());
        Ok(())
    }
}

/// Row-at-a-time positions writer; every row is flushed so an interrupted
/// run keeps what it already accepted.
pub struct PositionsWriter {
    path: PathBuf,
    wtr: csv::Writer<BufWriter<File>>,
    rows: usize,
}

impl PositionsWriter {
    /// Truncates `path` and writes the header.
    pub fn create(path: &Path) -> Result<Self> {
        ensure_parent_dir(path)?;
        let file = File::create(path).map_err(|e| PlacementError::CreateFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = Self::from_file(path, file);
        writer.wtr.write_record(POSITIONS_HEADER)?;
        writer.wtr.flush()?;
        Ok(writer)
    }

    /// Appends to `path`, writing the header only if the file is new or empty.
    pub fn append(path: &Path) -> Result<Self> {
        ensure_parent_dir(path)?;
        let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PlacementError::OpenFile {
                path: path.to_path_buf(),
                source: e,
            })?;
        let mut writer = Self::from_file(path, file);
        if needs_header {
            writer.wtr.write_record(POSITIONS_HEADER)?;
            writer.wtr.flush()?;
        }
        Ok(writer)
    }

    fn from_file(path: &Path, file: File) -> Self {
        #[allow(unused_mut)]
        let mut builder = WriterBuilder::new();
        #[cfg(windows)]
        {
            use csv::Terminator;
            builder = builder.terminator(Terminator::CRLF);
        }
        Self {
            path: path.to_path_buf(),
            wtr: builder.from_writer(BufWriter::new(file)),
            rows: 0,
        }
    }

    pub fn write_pair(&mut self, pair: &PlacementPair) -> Result<()> {
        write_row(&mut self.wtr, pair)?;
        self.wtr.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written through this writer (header excluded)
    pub fn rows_written(&self) -> usize {
        self.rows
    }
}

impl PairSink for PositionsWriter {
    fn accept(&mut self, pair: &PlacementPair) -> Result<()> {
        self.write_pair(pair)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| PlacementError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn write_row<W: std::io::Write>(wtr: &mut csv::Writer<W>, pair: &PlacementPair) -> Result<()> {
    let timestamp = pair.timestamp.format(TIMESTAMP_FORMAT).to_string();
    wtr.write_record([
        timestamp,
        pair.cup.x.to_string(),
        pair.cup.y.to_string(),
        pair.block.x.to_string(),
        pair.block.y.to_string(),
    ])?;
    Ok(())
}

/// Replaces the whole file with `pairs`.
pub fn rewrite_positions(path: &Path, pairs: &[PlacementPair]) -> Result<()> {
    let mut writer = PositionsWriter::create(path)?;
    for pair in pairs {
        write_row(&mut writer.wtr, pair)?;
    }
    writer.wtr.flush()?;
    Ok(())
}

pub fn read_positions(path: &Path) -> Result<Vec<PlacementPair>> {
    let file = File::open(path).map_err(|e| PlacementError::OpenFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_positions_from_reader(file)
}

pub fn read_positions_from_reader<R: Read>(reader: R) -> Result<Vec<PlacementPair>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    validate_headers(&mut rdr)?;

    let mut pairs = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2; // 1-indexed, after header
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        pairs.push(parse_record(&rec, row)?);
    }
    Ok(pairs)
}

/// Row `index` (0-based) of a loaded positions file
pub fn position_at(pairs: &[PlacementPair], index: usize) -> Result<&PlacementPair> {
    pairs.get(index).ok_or(PlacementError::PositionIndex {
        index,
        len: pairs.len(),
    })
}

fn validate_headers<R: Read>(rdr: &mut csv::Reader<R>) -> Result<()> {
    let headers = rdr
        .headers()
        .map_err(|e| PlacementError::CsvHeader(format!("Failed to read headers: {}", e)))?;

    for (idx, expected) in POSITIONS_HEADER.iter().enumerate() {
        match headers.get(idx) {
            Some(found) if found.eq_ignore_ascii_case(expected) => {}
            Some(found) => {
                return Err(PlacementError::CsvHeader(format!(
                    "Expected '{}' in column {}, found '{}'",
                    expected, idx, found
                )));
            }
            None => {
                return Err(PlacementError::CsvHeader(format!(
                    "Missing '{}' column at index {}",
                    expected, idx
                )));
            }
        }
    }
    Ok(())
}

fn parse_record(rec: &StringRecord, row: usize) -> Result<PlacementPair> {
    if rec.len() < POSITIONS_HEADER.len() {
        return Err(PlacementError::CsvRow {
            row,
            expected: POSITIONS_HEADER.len(),
            got: rec.len(),
        });
    }

    let timestamp = NaiveDateTime::parse_from_str(&rec[0], TIMESTAMP_FORMAT).map_err(|_| {
        PlacementError::ValueParse {
            row,
            column: POSITIONS_HEADER[0],
            value: rec[0].to_string(),
        }
    })?;

    let coord = |idx: usize| -> Result<i32> {
        rec[idx].parse().map_err(|_| PlacementError::ValueParse {
            row,
            column: POSITIONS_HEADER[idx],
            value: rec[idx].to_string(),
        })
    };

    Ok(PlacementPair::new(
        timestamp,
        Placement::new(coord(1)?, coord(2)?),
        Placement::new(coord(3)?, coord(4)?),
    ))
}
