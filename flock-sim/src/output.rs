//! Snapshot writers and readers.
//!
//! A writer receives each step's positions in bird id order. Two on-disk
//! layouts are supported: one CSV file per step with `x,y` rows, and a single
//! JSON-lines file with one [`Snapshot`] per line.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flock_core::Vector2D;
use flock_shared::{OutputSettings, Position, Snapshot, SnapshotFormat};

use crate::error::SnapshotError;

const FRAME_PREFIX: &str = "positions_";
const JSONL_FILE: &str = "positions.jsonl";

/// Destination for per-step position dumps
pub trait SnapshotWriter {
    fn write(&mut self, step: usize, positions: &[Vector2D]) -> Result<(), SnapshotError>;

    /// Flushes anything buffered. Called once after the last step.
    fn finish(&mut self) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// Writes `positions_NNN.csv` into a directory, one file per step
pub struct CsvFrameWriter {
    directory: PathBuf,
    width: usize,
}

impl CsvFrameWriter {
    /// Creates `directory` if needed. Step numbers are zero-padded wide
    /// enough that the files sort by name for `total_steps` frames.
    pub fn create(directory: impl Into<PathBuf>, total_steps: usize) -> Result<Self, SnapshotError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| SnapshotError::io(&directory, e))?;

        let digits = total_steps.saturating_sub(1).to_string().len();
        Ok(Self {
            directory,
            width: digits.max(3),
        })
    }

    pub fn frame_path(&self, step: usize) -> PathBuf {
        self.directory
            .join(format!("{FRAME_PREFIX}{step:0width$}.csv", width = self.width))
    }
}

impl SnapshotWriter for CsvFrameWriter {
    fn write(&mut self, step: usize, positions: &[Vector2D]) -> Result<(), SnapshotError> {
        let path = self.frame_path(step);
        let mut out = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|e| SnapshotError::io(&path, e.into()))?;

        for p in positions {
            out.write_record([format!("{:.6}", p.x), format!("{:.6}", p.y)])
                .map_err(|e| SnapshotError::io(&path, e.into()))?;
        }
        out.flush().map_err(|e| SnapshotError::io(&path, e))
    }
}

/// Appends one JSON snapshot per line to a single file
pub struct JsonLinesWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl JsonLinesWriter {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
        }
        let file = File::create(&path).map_err(|e| SnapshotError::io(&path, e))?;

        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotWriter for JsonLinesWriter {
    fn write(&mut self, step: usize, positions: &[Vector2D]) -> Result<(), SnapshotError> {
        let line = Snapshot::new(step, positions).to_json_line()?;
        writeln!(self.out, "{line}").map_err(|e| SnapshotError::io(&self.path, e))
    }

    fn finish(&mut self) -> Result<(), SnapshotError> {
        self.out
            .flush()
            .map_err(|e| SnapshotError::io(&self.path, e))
    }
}

/// Keeps every snapshot in memory
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub snapshots: Vec<Snapshot>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotWriter for MemoryWriter {
    fn write(&mut self, step: usize, positions: &[Vector2D]) -> Result<(), SnapshotError> {
        self.snapshots.push(Snapshot::new(step, positions));
        Ok(())
    }
}

/// Opens the writer selected by `settings`, sized for `total_steps` frames.
pub fn open_writer(
    settings: &OutputSettings,
    total_steps: usize,
) -> Result<Box<dyn SnapshotWriter>, SnapshotError> {
    let directory = PathBuf::from(&settings.directory);
    let writer: Box<dyn SnapshotWriter> = match settings.format {
        SnapshotFormat::Csv => Box::new(CsvFrameWriter::create(directory, total_steps)?),
        SnapshotFormat::Jsonl => Box::new(JsonLinesWriter::create(directory.join(JSONL_FILE))?),
    };
    Ok(writer)
}

/// Reads one CSV frame back as positions in file (id) order.
pub fn read_csv_frame(path: &Path) -> Result<Vec<Position>, SnapshotError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| SnapshotError::io(path, e.into()))?;

    let mut positions = Vec::new();
    for (row, result) in reader.deserialize::<Position>().enumerate() {
        let position = result.map_err(|e| SnapshotError::Parse {
            path: path.to_path_buf(),
            line: e.position().map_or(row + 1, |pos| pos.line() as usize),
            reason: e.to_string(),
        })?;
        positions.push(position);
    }

    Ok(positions)
}

/// Reads every snapshot from a JSON-lines file.
pub fn read_json_lines(path: &Path) -> Result<Vec<Snapshot>, SnapshotError> {
    let file = File::open(path).map_err(|e| SnapshotError::io(path, e))?;
    let mut snapshots = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| SnapshotError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let snapshot = Snapshot::from_json_line(&line).map_err(|e| SnapshotError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            reason: e.to_string(),
        })?;
        snapshots.push(snapshot);
    }

    Ok(snapshots)
}

/// CSV frame files in `directory`, ordered by step number.
pub fn list_csv_frames(directory: &Path) -> Result<Vec<PathBuf>, SnapshotError> {
    let entries = fs::read_dir(directory).map_err(|e| SnapshotError::io(directory, e))?;
    let mut frames = Vec::new();

    for entry in entries {
        let path = entry.map_err(|e| SnapshotError::io(directory, e))?.path();
        let step = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix(FRAME_PREFIX))
            .and_then(|rest| rest.strip_suffix(".csv"))
            .and_then(|digits| digits.parse::<usize>().ok());
        if let Some(step) = step {
            frames.push((step, path));
        }
    }

    frames.sort_by_key(|(step, _)| *step);
    Ok(frames.into_iter().map(|(_, path)| path).collect())
}
