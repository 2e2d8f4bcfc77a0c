use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::warn;

use super::convert::ConvertError;

/// Canonical name of a bundle directory under the output root.
pub const BUNDLE_DIR_NAME: &str = "Converted_PDFs";

/// Reserve a fresh bundle directory under `output_root`.
///
/// Tries the canonical name first, then `_1`, `_2`, … until a name is free.
/// Reservation happens through `create_dir`, so two workers racing for the
/// same suffix cannot both win; the loser moves on to the next one. Existing
/// directories are never deleted or renamed.
pub fn reserve_bundle_dir(output_root: &Path) -> Result<PathBuf, ConvertError> {
    let mut counter = 0usize;
    loop {
        let name = if counter == 0 {
            BUNDLE_DIR_NAME.to_string()
        } else {
            format!("{BUNDLE_DIR_NAME}_{counter}")
        };
        let candidate = output_root.join(name);
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => counter += 1,
            Err(err) => {
                return Err(ConvertError::Filesystem {
                    path: candidate,
                    source: err,
                })
            }
        }
    }
}

/// Write the transcript verbatim as UTF-8 next to the audio artifact.
pub fn write_transcript(dir: &Path, base_name: &str, text: &str) -> Result<PathBuf, ConvertError> {
    let path = dir.join(format!("{base_name}.txt"));
    fs::write(&path, text).map_err(|err| ConvertError::Filesystem {
        path: path.clone(),
        source: err,
    })?;
    Ok(path)
}

/// Remove a half-written bundle so a reserved name never points at a
/// partial result. Best-effort: a failed cleanup is logged, not propagated.
pub fn discard_partial(dir: &Path) {
    if let Err(err) = fs::remove_dir_all(dir) {
        warn!(
            "failed to clean up partial bundle {}: {err}",
            dir.display()
        );
    }
}
