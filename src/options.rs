use crate::models::{MediaExtension, QualityLabel};

pub const AUDIO_FORMAT: &str = "bestaudio/best";
pub const FALLBACK_FORMAT: &str = "best";

fn video_selector(quality: QualityLabel) -> Option<&'static str> {
    match quality {
        QualityLabel::High => Some("bestvideo[height<=1080]+bestaudio/best"),
        QualityLabel::Medium => Some("bestvideo[height<=480]+bestaudio/best"),
        QualityLabel::Low => Some("bestvideo[height<=360]+bestaudio/best"),
        QualityLabel::AudioOnly => None,
    }
}

/// A post-processing step handed to the engine, executed through ffmpeg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    ExtractAudio { codec: String, quality: String },
    ConvertVideo { format: String },
}

impl PostProcessor {
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::ExtractAudio { codec, quality } => vec![
                "-x".to_string(),
                "--audio-format".to_string(),
                codec.clone(),
                "--audio-quality".to_string(),
                format!("{}K", quality),
            ],
            Self::ConvertVideo { format } => vec!["--recode-video".to_string(), format.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format_selector: String,
    pub postprocessors: Vec<PostProcessor>,
    pub merge_output_format: Option<String>,
    pub extension: MediaExtension,
}

impl DownloadOptions {
    pub fn new(quality: QualityLabel, audio_only: bool, audio_quality: &str) -> Self {
        Self::for_label(quality.label(), audio_only, audio_quality)
    }

    /// Maps a quality label to engine options. Unknown labels fall back to
    /// the `best` selector.
    pub fn for_label(label: &str, audio_only: bool, audio_quality: &str) -> Self {
        if audio_only {
            return Self {
                format_selector: AUDIO_FORMAT.to_string(),
                postprocessors: vec![PostProcessor::ExtractAudio {
                    codec: MediaExtension::Mp3.as_str().to_string(),
                    quality: audio_quality.to_string(),
                }],
                merge_output_format: None,
                extension: MediaExtension::Mp3,
            };
        }

        let format_selector = match QualityLabel::from_label(label).and_then(video_selector) {
            Some(selector) => selector.to_string(),
            None => {
                log::warn!(
                    "No format selector for quality label {:?}, using {:?}",
                    label,
                    FALLBACK_FORMAT
                );
                FALLBACK_FORMAT.to_string()
            }
        };

        Self {
            format_selector,
            postprocessors: vec![PostProcessor::ConvertVideo {
                format: MediaExtension::Mp4.as_str().to_string(),
            }],
            merge_output_format: Some(MediaExtension::Mp4.as_str().to_string()),
            extension: MediaExtension::Mp4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_labels_map_to_exact_selectors() {
        let cases = [
            (QualityLabel::High, "bestvideo[height<=1080]+bestaudio/best"),
            (QualityLabel::Medium, "bestvideo[height<=480]+bestaudio/best"),
            (QualityLabel::Low, "bestvideo[height<=360]+bestaudio/best"),
        ];
        for (quality, expected) in cases {
            let options = DownloadOptions::new(quality, false, "192");
            assert_eq!(options.format_selector, expected);
            assert_eq!(options.extension, MediaExtension::Mp4);
            assert_eq!(options.merge_output_format.as_deref(), Some("mp4"));
            assert_eq!(
                options.postprocessors,
                vec![PostProcessor::ConvertVideo { format: "mp4".into() }]
            );
        }
    }

    #[test]
    fn unknown_label_falls_back_to_best() {
        let options = DownloadOptions::for_label("Ultra (4K)", false, "192");
        assert_eq!(options.format_selector, "best");
        assert_eq!(options.extension, MediaExtension::Mp4);

        // The audio label only means something together with the audio flag.
        let options = DownloadOptions::new(QualityLabel::AudioOnly, false, "192");
        assert_eq!(options.format_selector, "best");
    }

    #[test]
    fn audio_only_always_extracts_mp3() {
        for quality in QualityLabel::ALL {
            let options = DownloadOptions::new(quality, true, "192");
            assert_eq!(options.format_selector, AUDIO_FORMAT);
            assert_eq!(options.extension, MediaExtension::Mp3);
            assert_eq!(options.merge_output_format, None);
            assert_eq!(
                options.postprocessors,
                vec![PostProcessor::ExtractAudio {
                    codec: "mp3".into(),
                    quality: "192".into(),
                }]
            );
        }
        let options = DownloadOptions::for_label("whatever", true, "192");
        assert_eq!(options.extension, MediaExtension::Mp3);
    }

    #[test]
    fn postprocessors_render_engine_flags() {
        let audio = PostProcessor::ExtractAudio {
            codec: "mp3".into(),
            quality: "192".into(),
        };
        assert_eq!(
            audio.to_args(),
            vec!["-x", "--audio-format", "mp3", "--audio-quality", "192K"]
        );
        let video = PostProcessor::ConvertVideo { format: "mp4".into() };
        assert_eq!(video.to_args(), vec!["--recode-video", "mp4"]);
    }
}
