use crate::error::{IoError, Result};
use pizzapets_data::HistoryEvent;
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Appends history entries to a JSON-lines file.
///
/// Replays rebuild the full history every time; the writer remembers how
/// many entries it has already written and only appends the rest.
pub struct HistoryWriter {
    file: Option<BufWriter<File>>,
    written: usize,
}

impl HistoryWriter {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {:?}", path)))?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            written: 0,
        })
    }

    /// A writer that discards everything.
    #[must_use]
    pub fn new_dummy() -> Self {
        Self {
            file: None,
            written: 0,
        }
    }

    /// Writes the entries past the last call's length. A shorter history
    /// means a different pet or a rewound clock; counting restarts.
    pub fn append_new(&mut self, history: &[HistoryEvent]) -> Result<usize> {
        if history.len() < self.written {
            self.written = 0;
        }
        let fresh = &history[self.written..];
        if let Some(ref mut file) = self.file {
            for event in fresh {
                let json = serde_json::to_string(event)?;
                writeln!(file, "{}", json)?;
            }
            file.flush()?;
        }
        self.written = history.len();
        Ok(fresh.len())
    }

    pub fn reset(&mut self) {
        self.written = 0;
    }
}

/// Reads a JSON-lines history file, skipping lines that do not parse.
pub fn read_history<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryEvent>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };
    let reader = BufReader::new(file);
    let mut events = Vec::new();
    for line in reader.lines().map_while(std::result::Result::ok) {
        if let Ok(event) = serde_json::from_str::<HistoryEvent>(&line) {
            events.push(event);
        }
    }
    Ok(events)
}

/// SHA-256 over the JSON rendering of a history log.
pub fn compute_history_hash(history: &[HistoryEvent]) -> Result<String> {
    let json = serde_json::to_string(history)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
