//! Calibration table writer.
//!
//! Three files are produced from one cache, all keyed by tensor name in
//! sorted order:
//! - `calibration.json`: `{"name": [rmin, rmax], ...}`
//! - `calibration.bin`: bincode-encoded [`KeyValue`] list holding the
//!   absolute maximum of each range as a string
//! - `calibration.cache`: one `name absmax` line per tensor

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use qlinear_common::{CalibrationTableConfig, QLinearError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const JSON_FILE_NAME: &str = "calibration.json";
pub const BINARY_FILE_NAME: &str = "calibration.bin";
pub const TEXT_FILE_NAME: &str = "calibration.cache";

/// Tensor name → observed `(rmin, rmax)`.
pub type CalibrationCache = BTreeMap<String, (f32, f32)>;

/// One entry of the binary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CalibrationTable {
    dict: Vec<KeyValue>,
}

/// Where [`write_calibration_table`] put its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationTablePaths {
    pub json: PathBuf,
    pub binary: PathBuf,
    pub text: PathBuf,
}

/// `max(|rmin|, |rmax|)` as the shortest round-trip decimal: `2.0`, `0.5`,
/// and in exponent form a signed exponent of at least two digits (`1e-05`,
/// `1.5e+20`).
fn absmax_string((rmin, rmax): (f32, f32)) -> String {
    let shortest = format!("{:?}", rmin.abs().max(rmax.abs()));
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => shortest,
    }
}

fn key_values(cache: &CalibrationCache) -> Vec<KeyValue> {
    cache
        .iter()
        .map(|(key, &range)| KeyValue { key: key.clone(), value: absmax_string(range) })
        .collect()
}

/// Write the calibration table using settings from the environment.
pub fn write_calibration_table(
    cache: &CalibrationCache,
    dir: impl AsRef<Path>,
) -> Result<CalibrationTablePaths> {
    write_calibration_table_with_config(cache, dir, &CalibrationTableConfig::from_env())
}

/// Write the calibration table into `dir`.
///
/// With `config.debug_validate`, the binary table is read back and every
/// entry is logged.
pub fn write_calibration_table_with_config(
    cache: &CalibrationCache,
    dir: impl AsRef<Path>,
    config: &CalibrationTableConfig,
) -> Result<CalibrationTablePaths> {
    let dir = dir.as_ref();
    info!(entries = cache.len(), dir = %dir.display(), "writing calibration table");
    debug!(?cache, "calibration cache");

    let paths = CalibrationTablePaths {
        json: dir.join(JSON_FILE_NAME),
        binary: dir.join(BINARY_FILE_NAME),
        text: dir.join(TEXT_FILE_NAME),
    };

    let mut json = BufWriter::new(File::create(&paths.json)?);
    serde_json::to_writer(&mut json, cache)?;
    json.flush()?;

    let entries = key_values(cache);
    let table = CalibrationTable { dict: entries };
    let bytes = bincode::serialize(&table)
        .map_err(|e| QLinearError::Serialization(format!("calibration table: {e}")))?;
    fs::write(&paths.binary, &bytes)?;

    if config.debug_validate {
        for kv in read_calibration_binary(&paths.binary)? {
            info!(key = %kv.key, value = %kv.value, "calibration table entry");
        }
    }

    let mut text = BufWriter::new(File::create(&paths.text)?);
    for kv in &table.dict {
        writeln!(text, "{} {}", kv.key, kv.value)?;
    }
    text.flush()?;

    Ok(paths)
}

/// Entries of a binary table written by [`write_calibration_table`].
pub fn read_calibration_binary(path: impl AsRef<Path>) -> Result<Vec<KeyValue>> {
    let bytes = fs::read(path)?;
    let table: CalibrationTable = bincode::deserialize(&bytes)
        .map_err(|e| QLinearError::Serialization(format!("calibration table: {e}")))?;
    Ok(table.dict)
}

/// Ranges from a `calibration.json` file.
pub fn read_calibration_json(path: impl AsRef<Path>) -> Result<CalibrationCache> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absmax_formatting() {
        assert_eq!(absmax_string((-2.0, 1.0)), "2.0");
        assert_eq!(absmax_string((0.0, 0.5)), "0.5");
        assert_eq!(absmax_string((-0.25, 0.125)), "0.25");
    }

    #[test]
    fn absmax_exponent_has_sign_and_two_digits() {
        assert_eq!(absmax_string((-1e-5, 0.0)), "1e-05");
        assert_eq!(absmax_string((0.0, 1e20)), "1e+20");
        assert_eq!(absmax_string((0.0, 1.5e-7)), "1.5e-07");
        assert_eq!(absmax_string((-3.4e38, 0.0)), "3.4e+38");
        assert_eq!(absmax_string((0.0, 1e16)), "1e+16");
        assert_eq!(absmax_string((0.0, 12345.0)), "12345.0");
    }

    #[test]
    fn key_values_are_sorted() {
        let mut cache = CalibrationCache::new();
        cache.insert("b".into(), (0.0, 1.0));
        cache.insert("a".into(), (-3.0, 1.0));
        let kv = key_values(&cache);
        assert_eq!(kv[0], KeyValue { key: "a".into(), value: "3.0".into() });
        assert_eq!(kv[1].key, "b");
    }
}
