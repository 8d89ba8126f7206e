//! On-disk layout of a compressed unit.
//!
//! A unit lives under `<dir>/encoded/` as three co-located files:
//! - `data.huff`: serialized tree
//! - `data.bin`: packed encoded bits
//! - `data.pad`: a single byte holding the pad count
//!
//! Input and output files are read and written whole. Text mode maps
//! UTF-8 files to UTF-16 code units; raw mode maps bytes one to one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use huffpack_core::{decoder, Error, PackedArtifact, Result, Symbol};

use crate::config::InputMode;

pub const ENCODED_DIR: &str = "encoded";
pub const TREE_FILE: &str = "data.huff";
pub const DATA_FILE: &str = "data.bin";
pub const PAD_FILE: &str = "data.pad";

/// Directory holding the three artifact files for `dir`.
pub fn encoded_dir(dir: &Path) -> PathBuf {
    dir.join(ENCODED_DIR)
}

/// Write the three artifact files, creating `<dir>/encoded/` if needed.
pub fn write_artifact(dir: &Path, artifact: &PackedArtifact) -> Result<()> {
    let out = encoded_dir(dir);
    fs::create_dir_all(&out)?;

    fs::write(out.join(TREE_FILE), &artifact.tree)?;
    fs::write(out.join(DATA_FILE), &artifact.data)?;
    fs::write(out.join(PAD_FILE), [artifact.padding])?;

    log::debug!(
        "wrote {} ({} + 1 + {} bytes)",
        out.display(),
        artifact.tree.len(),
        artifact.data.len()
    );
    Ok(())
}

/// Read the three artifact files back.
///
/// # Errors
/// `Error::Io` if a file is missing, or if the pad file is not exactly
/// one byte.
pub fn read_artifact(dir: &Path) -> Result<PackedArtifact> {
    let src = encoded_dir(dir);

    let tree = fs::read(src.join(TREE_FILE))?;
    let data = fs::read(src.join(DATA_FILE))?;
    let pad = fs::read(src.join(PAD_FILE))?;

    let &[padding] = pad.as_slice() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{PAD_FILE} must hold exactly one byte, found {}", pad.len()),
        )
        .into());
    };

    Ok(PackedArtifact { tree, padding, data })
}

/// Read an input file as symbols. Returns the symbols and the file size.
pub fn read_input(path: &Path, mode: InputMode) -> Result<(Vec<Symbol>, u64)> {
    let bytes = fs::read(path)?;
    let len = bytes.len() as u64;

    let symbols = match mode {
        InputMode::Raw => bytes.into_iter().map(Symbol::from).collect(),
        InputMode::Text => {
            let text = String::from_utf8(bytes).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not UTF-8 ({e}); use --raw for binary files", path.display()),
                )
            })?;
            text.encode_utf16().collect()
        }
    };

    Ok((symbols, len))
}

/// Write decoded symbols to `path`. Returns the number of bytes written.
///
/// # Errors
/// - `DecodeError::InvalidText` in text mode if the symbols are not valid UTF-16
/// - `Error::Config` in raw mode if a symbol does not fit in a byte
pub fn write_output(path: &Path, symbols: &[Symbol], mode: InputMode) -> Result<u64> {
    let bytes = match mode {
        InputMode::Text => decoder::symbols_to_string(symbols)?.into_bytes(),
        InputMode::Raw => symbols
            .iter()
            .map(|&s| {
                u8::try_from(s).map_err(|_| {
                    Error::Config(format!(
                        "decoded symbol {s:#06x} does not fit in a byte; decompress without --raw"
                    ))
                })
            })
            .collect::<Result<Vec<u8>>>()?,
    };

    fs::write(path, &bytes)?;
    Ok(bytes.len() as u64)
}
