use std::path::PathBuf;

use crate::scratch::FileFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityLabel {
    High,
    Medium,
    Low,
    AudioOnly,
}

impl Default for QualityLabel {
    fn default() -> Self {
        Self::High
    }
}

impl QualityLabel {
    pub const ALL: [QualityLabel; 4] = [Self::High, Self::Medium, Self::Low, Self::AudioOnly];

    /// Label understood by the format table in `options`.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "Alta (1080p/720p)",
            Self::Medium => "Média (480p)",
            Self::Low => "Baixa (360p)",
            Self::AudioOnly => "Somente Áudio",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.label() == label)
    }

    pub fn localization_key(self) -> &'static str {
        match self {
            Self::High => "quality-high",
            Self::Medium => "quality-medium",
            Self::Low => "quality-low",
            Self::AudioOnly => "quality-audio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaExtension {
    Mp3,
    Mp4,
}

impl MediaExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 => "video/mp4",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: QualityLabel,
    pub audio_only: bool,
}

impl DownloadRequest {
    /// Audio-only follows the quality choice unless set explicitly.
    pub fn new(url: impl Into<String>, quality: QualityLabel) -> Self {
        Self {
            url: url.into(),
            quality,
            audio_only: quality == QualityLabel::AudioOnly,
        }
    }

    pub fn with_audio_only(mut self, audio_only: bool) -> Self {
        self.audio_only = audio_only;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    pub extension: MediaExtension,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

impl DownloadResult {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.title, self.extension.as_str())
    }
}

/// Messages sent from the download worker to the UI thread.
#[derive(Debug, Clone)]
pub enum StatusMessage {
    Progress(f32),
    Status(String),
    Error(String),
    Finished(Option<DownloadResult>),
}

#[derive(Default)]
pub struct AppState {
    pub url: String,
    pub quality: QualityLabel,
    pub audio_only: bool,
    pub is_downloading: bool,
    pub progress: f32,
    pub status: String,
    pub warning: Option<String>,
    pub errors: Vec<String>,
    pub result: Option<DownloadResult>,
    pub file_filter: FileFilter,
    pub confirm_delete: bool,
}
