use bincode::{deserialize_from, serialize_into};
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::codec::{from_judge_text, to_judge_text};
use crate::config::EditorConfig;
use crate::editor::GridEditor;
use crate::grid::Grid;
use crate::history::{HistoryEntry, HistoryStore};

/// Everything needed to resume editing where it stopped.
///
/// `grid` always equals the current history entry; files that break this are
/// rejected when loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawSession")]
pub struct Session {
    pub grid: Grid,
    pub history: HistoryStore,
    pub selected_char: char,
    pub saved_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawSession {
    grid: Grid,
    history: HistoryStore,
    selected_char: char,
    saved_at: DateTime<Utc>,
}

impl TryFrom<RawSession> for Session {
    type Error = String;

    fn try_from(raw: RawSession) -> Result<Self, Self::Error> {
        if raw.history.current().grid != raw.grid {
            return Err(String::from("session grid differs from its current history entry"));
        }
        Ok(Session {
            grid: raw.grid,
            history: raw.history,
            selected_char: raw.selected_char,
            saved_at: raw.saved_at,
        })
    }
}

impl Session {
    /// Snapshots the editor. A stroke still in progress is recorded as if it
    /// had just ended; the live editor keeps drawing.
    pub fn capture(editor: &GridEditor) -> Self {
        let mut history = editor.history().clone();
        if editor.is_drawing() {
            history.push(HistoryEntry::new(editor.grid().clone()));
        }
        Session {
            grid: editor.grid().clone(),
            history,
            selected_char: editor.selected_char(),
            saved_at: Utc::now(),
        }
    }

    pub fn into_editor(self, config: EditorConfig) -> crate::error::Result<GridEditor> {
        GridEditor::from_parts(config, self.grid, self.history, Some(self.selected_char))
    }
}

/// Writes a gzip-compressed bincode session file.
pub fn save_session(session: &Session, filename: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(filename)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = BufWriter::new(encoder);

    serialize_into(&mut writer, session).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?.flush()
}

pub fn load_session(filename: impl AsRef<Path>) -> io::Result<Session> {
    let file = File::open(filename)?;
    let decoder = GzDecoder::new(file);
    let mut reader = BufReader::new(decoder);

    let session: Session = deserialize_from(&mut reader)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(session)
}

pub fn write_judge_file(grid: &Grid, filename: impl AsRef<Path>) -> io::Result<()> {
    fs::write(filename, to_judge_text(grid))
}

pub fn read_judge_file(filename: impl AsRef<Path>) -> io::Result<Grid> {
    let text = fs::read_to_string(filename)?;
    from_judge_text(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Loads a grid from a judge text file (`.txt`, `.in`) or from the current
/// grid of a session file (`.gz`).
pub fn load_grid_file(filepath: impl AsRef<Path>) -> Result<Grid, Box<dyn Error>> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("txt") | Some("in") => Ok(read_judge_file(path)?),
        Some("gz") => Ok(load_session(path)?.grid),
        Some(ext) => Err(format!("Unsupported file extension: {}", ext).into()),
        None => Err("File has no extension".into()),
    }
}
