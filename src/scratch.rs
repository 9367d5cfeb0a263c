use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::MediaExtension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter {
    All,
    Audio,
    Video,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::All
    }
}

impl FileFilter {
    pub const ALL: [FileFilter; 3] = [Self::All, Self::Audio, Self::Video];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::Audio => "Áudio",
            Self::Video => "Vídeo",
        }
    }

    #[cfg(test)]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    pub fn localization_key(self) -> &'static str {
        match self {
            Self::All => "filter-all",
            Self::Audio => "filter-audio",
            Self::Video => "filter-video",
        }
    }

    pub fn extensions(self) -> &'static [MediaExtension] {
        match self {
            Self::All => &[MediaExtension::Mp3, MediaExtension::Mp4],
            Self::Audio => &[MediaExtension::Mp3],
            Self::Video => &[MediaExtension::Mp4],
        }
    }

    pub fn accepts(self, extension: MediaExtension) -> bool {
        self.extensions().contains(&extension)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchFile {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub extension: MediaExtension,
}

impl ScratchFile {
    /// Describes a single media file, e.g. the output of a finished download.
    pub fn open(path: &Path) -> io::Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaExtension::from_extension)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not an mp3/mp4 file: {}", path.display()),
                )
            })?;
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            extension,
        })
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn mime_type(&self) -> &'static str {
        self.extension.mime_type()
    }
}

/// The shared directory downloads land in.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list(&self, filter: FileFilter) -> io::Result<Vec<ScratchFile>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Skipping unreadable scratch entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let Some(extension) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(MediaExtension::from_extension)
            else {
                continue;
            };
            if !filter.accepts(extension) {
                continue;
            }

            // Files can vanish between read_dir and stat.
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            files.push(ScratchFile {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                size_bytes: metadata.len(),
                extension,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Streams a listed file to `destination`, returning the bytes copied.
    pub fn export(&self, file: &ScratchFile, destination: &Path) -> io::Result<u64> {
        let mut reader = BufReader::new(File::open(&file.path)?);
        let mut writer = BufWriter::new(File::create(destination)?);
        let copied = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        log::info!("Exported {} to {}", file.name, destination.display());
        Ok(copied)
    }

    /// Best-effort removal; returns how many files were actually deleted.
    pub fn delete_all(&self, files: &[ScratchFile]) -> usize {
        let mut removed = 0;
        for file in files {
            match fs::remove_file(&file.path) {
                Ok(()) => removed += 1,
                Err(e) => log::debug!("Could not remove {}: {}", file.path.display(), e),
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_with(names: &[&str]) -> (tempfile::TempDir, ScratchDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in names {
            fs::write(dir.path().join(name), b"0123456789").expect("write");
        }
        let scratch = ScratchDir::new(dir.path());
        (dir, scratch)
    }

    fn names(files: &[ScratchFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn filters_by_category_label() {
        let (_dir, scratch) = scratch_with(&["a.mp3", "b.mp4", "c.txt"]);

        let audio = FileFilter::from_label("Áudio").unwrap();
        assert_eq!(names(&scratch.list(audio).unwrap()), vec!["a.mp3"]);

        let all = FileFilter::from_label("Todos").unwrap();
        assert_eq!(names(&scratch.list(all).unwrap()), vec!["a.mp3", "b.mp4"]);

        let video = FileFilter::from_label("Vídeo").unwrap();
        assert_eq!(names(&scratch.list(video).unwrap()), vec!["b.mp4"]);
    }

    #[test]
    fn skips_directories_with_media_names() {
        let (dir, scratch) = scratch_with(&["a.mp3"]);
        fs::create_dir(dir.path().join("folder.mp4")).unwrap();
        assert_eq!(names(&scratch.list(FileFilter::All).unwrap()), vec!["a.mp3"]);
    }

    #[test]
    fn reports_size_and_mime() {
        let (_dir, scratch) = scratch_with(&["song.mp3", "clip.mp4"]);
        let files = scratch.list(FileFilter::All).unwrap();
        assert_eq!(files[0].name, "clip.mp4");
        assert_eq!(files[0].mime_type(), "video/mp4");
        assert_eq!(files[1].mime_type(), "audio/mpeg");
        assert_eq!(files[1].size_bytes, 10);
        assert!((files[1].size_mb() - 10.0 / 1_048_576.0).abs() < f64::EPSILON);
    }

    #[test]
    fn opens_single_media_file() {
        let (dir, _scratch) = scratch_with(&["song.mp3", "notes.txt"]);
        let file = ScratchFile::open(&dir.path().join("song.mp3")).unwrap();
        assert_eq!(file.name, "song.mp3");
        assert_eq!(file.extension, MediaExtension::Mp3);
        assert!(ScratchFile::open(&dir.path().join("notes.txt")).is_err());
        assert!(ScratchFile::open(&dir.path().join("gone.mp4")).is_err());
    }

    #[test]
    fn export_copies_bytes() {
        let (_dir, scratch) = scratch_with(&["a.mp3"]);
        let out = tempfile::tempdir().expect("tempdir");
        let files = scratch.list(FileFilter::Audio).unwrap();
        let destination = out.path().join("copy.mp3");

        let copied = scratch.export(&files[0], &destination).unwrap();
        assert_eq!(copied, 10);
        assert_eq!(fs::read(destination).unwrap(), b"0123456789");
    }

    #[test]
    fn delete_continues_past_missing_files() {
        let (dir, scratch) = scratch_with(&["a.mp3", "b.mp4", "c.mp4"]);
        let files = scratch.list(FileFilter::All).unwrap();
        fs::remove_file(dir.path().join("b.mp4")).unwrap();

        assert_eq!(scratch.delete_all(&files), 2);
        assert!(scratch.list(FileFilter::All).unwrap().is_empty());

        // Running it again is harmless.
        assert_eq!(scratch.delete_all(&files), 0);
    }

    #[test]
    fn delete_leaves_unlisted_files() {
        let (dir, scratch) = scratch_with(&["a.mp3", "b.mp4", "notes.txt"]);
        let audio = scratch.list(FileFilter::Audio).unwrap();
        scratch.delete_all(&audio);
        assert!(dir.path().join("b.mp4").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
