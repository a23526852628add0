use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

/// Kinds of downloadable content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Script,
    VideoScript,
    TranslatedScript,
    Audio,
}

impl DownloadKind {
    /// Suffix used in download file names
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::VideoScript => "video_script",
            Self::TranslatedScript => "translated_script",
            Self::Audio => "audio",
        }
    }

    /// MIME type sent with the download
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Audio => "audio/mpeg",
            _ => "text/plain; charset=utf-8",
        }
    }
}

impl std::str::FromStr for DownloadKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "script" => Ok(Self::Script),
            "video_script" | "video-script" => Ok(Self::VideoScript),
            "translated_script" | "translated-script" => Ok(Self::TranslatedScript),
            "audio" => Ok(Self::Audio),
            _ => Err(anyhow::anyhow!("Unknown download kind: {}", s)),
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: "{topic}_{kind}.txt" with spaces replaced, or "output.mp3" for audio
    pub fn download_file_name(topic: &str, kind: DownloadKind) -> String {
        if kind == DownloadKind::Audio {
            return "output.mp3".to_string();
        }

        let stem: String = topic
            .trim()
            .chars()
            .map(|c| match c {
                ' ' => '_',
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        if stem.is_empty() {
            format!("{}.txt", kind.suffix())
        } else {
            format!("{}_{}.txt", stem, kind.suffix())
        }
    }

    /// Read a file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write content to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Save downloadable content into a directory under its download name
    pub fn save_download<P: AsRef<Path>>(
        dir: P,
        topic: &str,
        kind: DownloadKind,
        content: &[u8],
    ) -> Result<PathBuf> {
        let path = dir.as_ref().join(Self::download_file_name(topic, kind));
        Self::write_to_file(&path, content)?;
        Ok(path)
    }

    /// Write bytes to a temporary file that is deleted when the handle drops
    pub fn stage_temp_file(content: &[u8], suffix: &str) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("eduscript_")
            .suffix(suffix)
            .tempfile()
            .context("Failed to create temporary file")?;
        file.write_all(content)
            .context("Failed to write temporary file")?;
        file.flush().context("Failed to flush temporary file")?;
        Ok(file)
    }
}
