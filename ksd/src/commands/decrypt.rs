use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Decrypt downloaded subtitle files.
#[derive(Debug, Clone, Args)]
#[clap(long_about = "Decrypt downloaded subtitle files.\n\n\
Each file is decrypted to a .srt file next to it and the encrypted file is removed. \
Files which are already plaintext are copied unchanged.")]
pub struct Decrypt {
    /// .txt | .txt1 | .txt2 | .txt3 | .srt
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Extension used to pick the first key to try.
    /// By default the extension of each file is used.
    #[arg(long)]
    pub ext: Option<String>,

    /// Keep encrypted files after decrypting them.
    #[arg(long)]
    pub keep: bool,
}

impl Decrypt {
    pub fn execute(self) -> Result<()> {
        let mut failed = 0;

        for file in &self.files {
            if let Err(e) = self.decrypt(file) {
                warn!("Failed to decrypt {}: {}", file.to_string_lossy(), e);
                failed += 1;
            }
        }

        if failed > 0 {
            bail!("{} of {} files couldn't be decrypted.", failed, self.files.len());
        }

        Ok(())
    }

    fn decrypt(&self, file: &Path) -> Result<()> {
        let ext = match &self.ext {
            Some(x) => x.to_owned(),
            None => crate::downloader::extension(&file.to_string_lossy()),
        };
        let text = fs::read_to_string(file)?;
        let decrypted = ksd_crypt::decrypt_text(&text, &ext);
        let output = file.with_extension("srt");

        fs::write(&output, &decrypted.text)?;

        if !self.keep && output != file {
            fs::remove_file(file)?;
        }

        if decrypted.unrecovered > 0 {
            warn!(
                "{} lines of {} could not be decrypted",
                decrypted.unrecovered,
                output.to_string_lossy()
            );
        }

        info!(
            "{} {}",
            if decrypted.encrypted {
                "Decrypted".bold().green()
            } else {
                "Copied".bold().cyan()
            },
            output.to_string_lossy()
        );
        Ok(())
    }
}
