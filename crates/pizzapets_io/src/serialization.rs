//! JSON serialization with error handling.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to compact JSON.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string(data)?)
}

pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(serde_json::from_str(json)?)
}

/// Writes `data` as pretty-printed JSON, replacing the file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })?;
    Ok(())
}

pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json).map_err(|e| e.with_context(format!("parsing {:?}", path.as_ref())))
}
