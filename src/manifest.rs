//! The annotation manifest: an append-only, pipe-delimited text log.
//!
//! One line per successfully processed clip:
//! `<processed_path>|<speaker_id>|<annotated_text>`. The first field is the
//! resumption key. The file is read once when the manifest is opened to
//! build the processed set, and only ever appended to afterwards: a crash
//! after N clips leaves exactly N complete lines on disk.

use crate::error::Result;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One manifest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path of the processed WAV file (the resumption key).
    pub audio_path: String,
    /// Speaker identifier, taken from the speaker directory name.
    pub speaker: String,
    /// Language-tagged transcript, e.g. `[EN]hello[EN]`.
    pub text: String,
}

impl ManifestEntry {
    /// Serialize to one newline-terminated manifest line.
    pub fn to_line(&self) -> String {
        format!("{}|{}|{}\n", self.audio_path, self.speaker, self.text)
    }

    /// Parse a manifest line. Returns `None` for blank or fieldless lines.
    ///
    /// Lines with fewer than three fields still yield their first field as
    /// the path so resumption tolerates partially mangled history.
    pub fn parse_line(line: &str) -> Option<ManifestEntry> {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.is_empty() {
            return None;
        }
        let mut fields = trimmed.splitn(3, '|');
        let audio_path = fields.next()?.to_string();
        let speaker = fields.next().unwrap_or("").to_string();
        let text = fields.next().unwrap_or("").to_string();
        Some(ManifestEntry {
            audio_path,
            speaker,
            text,
        })
    }
}

/// The on-disk manifest plus the in-memory processed-path snapshot.
///
/// The snapshot is taken once at open and updated on every append; it is
/// never re-read mid-run, so concurrent external writers are not supported.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    processed: HashSet<String>,
}

impl Manifest {
    /// Open a manifest, loading the set of already-processed paths.
    ///
    /// A missing file is not an error: it means nothing has been processed
    /// yet. Malformed lines are ignored rather than rejected.
    pub fn open(path: &Path) -> Result<Self> {
        let processed = match fs::read_to_string(path) {
            Ok(contents) => contents
                .lines()
                .filter_map(ManifestEntry::parse_line)
                .map(|entry| entry.audio_path)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            processed,
        })
    }

    /// Whether a processed path is already recorded.
    pub fn contains(&self, audio_path: &str) -> bool {
        self.processed.contains(audio_path)
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    /// True when no paths are recorded.
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Append one entry and update the processed set.
    ///
    /// The line is written and flushed immediately so an interrupted run
    /// never loses completed work.
    pub fn append(&mut self, entry: &ManifestEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.to_line().as_bytes())?;
        file.flush()?;

        self.processed.insert(entry.audio_path.clone());
        Ok(())
    }
}
