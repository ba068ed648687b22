use crate::data::WordBank;
use crate::dictionary::{ApproximateDictionary, ExactDictionary};
use crate::results::BaldaError;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Bumped whenever the layout of a persisted index changes.
pub const FORMAT_VERSION: u32 = 1;

/// A dictionary index that can be written to disk and read back.
pub trait PersistedIndex: Serialize + DeserializeOwned {
    /// Names the kind of index, so that one kind is never loaded as another.
    const KIND: &'static str;
}

impl PersistedIndex for ExactDictionary {
    const KIND: &'static str = "exact";
}

impl PersistedIndex for ApproximateDictionary {
    const KIND: &'static str = "approximate";
}

#[derive(Serialize, Deserialize)]
struct IndexFile<T> {
    format_version: u32,
    kind: String,
    index: T,
}

/// The fields of an [`IndexFile`] that identify its layout. The index itself is skipped.
#[derive(Deserialize)]
struct IndexHeader {
    format_version: u32,
    kind: String,
}

/// Reads an index previously written by [`save_index`].
pub fn load_index<T, P>(path: P) -> Result<T, BaldaError>
where
    T: PersistedIndex,
    P: AsRef<Path>,
{
    let text = fs::read_to_string(path)?;
    // Another kind or version may not decode as `T` at all, so check the header first.
    let header: IndexHeader = ron::from_str(&text)?;
    if header.format_version != FORMAT_VERSION || header.kind != T::KIND {
        return Err(BaldaError::IndexMismatch {
            found: format!("{} v{}", header.kind, header.format_version),
            expected: format!("{} v{}", T::KIND, FORMAT_VERSION),
        });
    }
    let file: IndexFile<T> = ron::from_str(&text)?;
    Ok(file.index)
}

/// Writes the index to `path`, replacing any existing file only once writing succeeded.
pub fn save_index<T, P>(index: &T, path: P) -> Result<(), BaldaError>
where
    T: PersistedIndex,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let partial = path.with_extension("partial");
    let file = IndexFile {
        format_version: FORMAT_VERSION,
        kind: T::KIND.to_string(),
        index,
    };
    let mut writer = BufWriter::new(File::create(&partial)?);
    ron::ser::to_writer(&mut writer, &file)?;
    writer.flush()?;
    fs::rename(&partial, path)?;
    Ok(())
}

/// Loads the index from `index_path`, or rebuilds it from the word list at `words_path`.
///
/// Any failure to load (a missing file, a corrupt file, another format version or index kind) is
/// logged and answered by rebuilding the index with `build`, then writing it back to
/// `index_path`. A failure to write is logged too, since the rebuilt index is still usable.
///
/// Only a failure to read the word list itself is returned as an error.
pub fn load_or_build<T, P, Q, F>(index_path: P, words_path: Q, build: F) -> Result<T, BaldaError>
where
    T: PersistedIndex,
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnOnce(&WordBank) -> T,
{
    let index_path = index_path.as_ref();
    let start = Instant::now();
    match load_index(index_path) {
        Ok(index) => {
            info!(
                "Loaded {} dictionary index from {} in {:.3}s",
                T::KIND,
                index_path.display(),
                start.elapsed().as_secs_f64()
            );
            return Ok(index);
        }
        Err(error) => warn!(
            "Could not load dictionary index from {}, rebuilding it: {}",
            index_path.display(),
            error
        ),
    }

    let bank = WordBank::from_reader(BufReader::new(File::open(words_path)?))?;
    let index = build(&bank);
    if let Err(error) = save_index(&index, index_path) {
        warn!(
            "Could not save dictionary index to {}: {}",
            index_path.display(),
            error
        );
    }
    Ok(index)
}
