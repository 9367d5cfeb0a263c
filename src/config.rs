use std::env;
use std::path::{Path, PathBuf};

pub const HTTP_CHUNK_SIZE: u64 = 1_048_576;
pub const AUDIO_QUALITY: &str = "192";

const SCRATCH_DIR_VAR: &str = "TUBEGRAB_SCRATCH_DIR";
const YTDLP_VAR: &str = "TUBEGRAB_YTDLP";
const FFMPEG_FALLBACK_VAR: &str = "TUBEGRAB_FFMPEG_FALLBACK";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory downloads are written to and browsed from.
    pub scratch_dir: PathBuf,
    pub ytdlp_program: PathBuf,
    /// ffmpeg binary used when none is found on the search path.
    pub ffmpeg_fallback: PathBuf,
    pub http_chunk_size: u64,
    pub audio_quality: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let scratch_dir = env::var_os(SCRATCH_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        let ytdlp_program = env::var_os(YTDLP_VAR)
            .map(PathBuf::from)
            .or_else(|| which::which("yt-dlp").ok())
            .unwrap_or_else(|| PathBuf::from("yt-dlp"));

        let ffmpeg_fallback = env::var_os(FFMPEG_FALLBACK_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_ffmpeg_fallback);

        Self {
            scratch_dir,
            ytdlp_program,
            ffmpeg_fallback,
            http_chunk_size: HTTP_CHUNK_SIZE,
            audio_quality: AUDIO_QUALITY.to_string(),
        }
    }

    pub fn with_scratch_dir(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            ytdlp_program: PathBuf::from("yt-dlp"),
            ffmpeg_fallback: default_ffmpeg_fallback(),
            http_chunk_size: HTTP_CHUNK_SIZE,
            audio_quality: AUDIO_QUALITY.to_string(),
        }
    }
}

fn ffmpeg_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    }
}

/// `<exe dir>/ffmpeg/bin/ffmpeg`, the layout of a bundled ffmpeg build.
pub fn default_ffmpeg_fallback() -> PathBuf {
    let base = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| env::current_dir().unwrap_or_default());
    base.join("ffmpeg").join("bin").join(ffmpeg_binary_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_scratch_dir_is_kept() {
        let config = AppConfig::with_scratch_dir("/srv/scratch");
        assert_eq!(config.scratch_dir, PathBuf::from("/srv/scratch"));
        assert_eq!(config.http_chunk_size, 1_048_576);
        assert_eq!(config.audio_quality, "192");
    }

    #[test]
    fn fallback_points_into_bundled_layout() {
        let fallback = default_ffmpeg_fallback();
        assert_eq!(
            fallback.file_name().and_then(|n| n.to_str()),
            Some(ffmpeg_binary_name())
        );
        assert!(fallback.parent().unwrap().ends_with("ffmpeg/bin"));
    }
}
