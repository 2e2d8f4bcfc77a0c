use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pdf-narrator")]
#[command(about = "Convert PDF documents into narrated audio with transcripts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a PDF file, or every PDF directly inside a folder
    Convert {
        /// PDF file or folder of PDFs
        source: PathBuf,

        /// Output root directory; defaults next to the source
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Open the produced directory in the file manager afterwards
        #[arg(long)]
        reveal: bool,

        /// Print one JSON object per job instead of plain lines
        #[arg(long)]
        json: bool,

        /// Play the first produced narration when conversion finishes
        #[arg(long)]
        play: bool,
    },
    /// Play a narrated audio file with transport controls on stdin
    Play {
        /// Audio file to load
        audio: PathBuf,
    },
}

impl Command {
    /// Output root for a convert run: explicit flag, else the folder the
    /// source lives in (the source itself when it is a folder).
    pub fn resolve_output_root(source: &std::path::Path, out: Option<PathBuf>) -> PathBuf {
        if let Some(out) = out {
            return out;
        }
        if source.is_dir() {
            source.to_path_buf()
        } else {
            source
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(|parent| parent.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }
}
