use crate::utils;
use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug)]
pub struct WrittenSubtitle {
    pub path: PathBuf,
    pub unrecovered: usize,
}

/// `directory/<title>/Episode_<number>`
pub fn episode_dir(directory: &Path, title: &str, number: u32) -> PathBuf {
    directory
        .join(utils::sanitize(title))
        .join(format!("Episode_{}", number))
}

/// Lower cased extension of the url path including its dot, or an empty string.
pub fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|x| format!(".{}", x.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Store a downloaded subtitle as `<label>.srt` inside `folder`.
///
/// The raw download is written first as `<label><ext>` and removed once the
/// decrypted file has been written.
pub async fn write_subtitle(
    folder: &Path,
    label: &str,
    ext: &str,
    data: &[u8],
) -> Result<WrittenSubtitle> {
    let label = utils::sanitize(label);
    let raw_path = folder.join(format!("{}{}", label, ext));
    let path = folder.join(format!("{}.srt", label));

    fs::write(&raw_path, data).await?;

    if raw_path == path {
        return Ok(WrittenSubtitle {
            path,
            unrecovered: 0,
        });
    }

    let text = String::from_utf8_lossy(data);
    let decrypted = ksd_crypt::decrypt_text(&text, ext);

    if decrypted.unrecovered > 0 {
        warn!(
            "{} lines of {} could not be decrypted",
            decrypted.unrecovered,
            path.to_string_lossy()
        );
    } else if !decrypted.encrypted {
        debug!("{} is not encrypted", raw_path.to_string_lossy());
    }

    fs::write(&path, decrypted.text).await?;
    fs::remove_file(&raw_path).await?;

    Ok(WrittenSubtitle {
        path,
        unrecovered: decrypted.unrecovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("/subs/2024/ep1.en.TXT1"), ".txt1");
        assert_eq!(extension("/subs/ep1.srt"), ".srt");
        assert_eq!(extension("/subs/ep1"), "");
    }

    #[test]
    fn test_episode_dir() {
        assert_eq!(
            episode_dir(Path::new("dramas"), "Love/War", 3),
            Path::new("dramas").join("Love-War").join("Episode_3")
        );
    }

    #[tokio::test]
    async fn test_write_plain_srt() {
        let dir = tempfile::tempdir().unwrap();
        let data = b"1\n00:00:01,000 --> 00:00:02,000\nHi\n";
        let written = write_subtitle(dir.path(), "English", ".srt", data)
            .await
            .unwrap();

        assert_eq!(written.path, dir.path().join("English.srt"));
        assert_eq!(std::fs::read(&written.path).unwrap(), data);
    }

    #[tokio::test]
    async fn test_write_removes_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = b"1\n00:00:01,000 --> 00:00:02,000\nAlready plain\n";
        let written = write_subtitle(dir.path(), "Indonesia", ".txt", data)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&written.path).unwrap(), data);
        assert!(!dir.path().join("Indonesia.txt").exists());
    }
}
