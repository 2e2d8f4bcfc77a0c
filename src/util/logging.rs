use std::path::PathBuf;

use flexi_logger::{Age, Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<()> = OnceCell::new();

/// Start the file logger once. Log lines at info and above are duplicated
/// to stderr so the CLI stays informative without redirection.
pub fn init() -> anyhow::Result<()> {
    LOGGER.get_or_try_init(|| {
        let log_dir = log_dir();
        std::fs::create_dir_all(&log_dir)?;
        Logger::try_with_env_or_str("info")?
            .log_to_file(FileSpec::default().directory(&log_dir).basename("narrator"))
            .rotate(
                Criterion::AgeOrSize(Age::Day, 10_000_000),
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            )
            .duplicate_to_stderr(Duplicate::Info)
            .start()?;
        Ok::<(), anyhow::Error>(())
    })?;
    Ok(())
}

fn log_dir() -> PathBuf {
    std::env::var_os("NARRATOR_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn init_creates_the_log_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        std::env::set_var("NARRATOR_LOG_DIR", &dir);
        init().unwrap();
        assert!(dir.exists());
        std::env::remove_var("NARRATOR_LOG_DIR");
    }
}
