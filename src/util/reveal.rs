use std::path::Path;
use std::process::Command;

use log::warn;

/// Open `path` in the platform file manager. Failures are logged and
/// otherwise ignored: revealing a folder is a convenience, never a step the
/// pipeline depends on.
pub fn open_in_file_manager(path: &Path) {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    if which::which(opener).is_err() {
        warn!("{opener} is not available, cannot open {}", path.display());
        return;
    }

    if let Err(err) = Command::new(opener).arg(path).spawn() {
        warn!("failed to open {} with {opener}: {err}", path.display());
    }
}
