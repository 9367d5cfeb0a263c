use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::{DownloadError, Result};
use crate::localizations::Localizations;
use crate::models::{DownloadRequest, DownloadResult};
use crate::options::{DownloadOptions, PostProcessor};
use crate::progress::{
    ProgressAdapter, ProgressEvent, ProgressPayload, ProgressSink, ProgressStatus, PROGRESS_TEMPLATE,
};

/// Prefix of the metadata line printed once the file is in place.
pub const META_PREFIX: &str = "tubegrab-meta ";
const META_TEMPLATE: &str = "after_move:tubegrab-meta %(.{title,thumbnail,filepath})j";

/// Drops playlist and tracking parameters by cutting at the first `&`.
pub fn clean_url(url: &str) -> String {
    url.trim().split('&').next().unwrap_or_default().to_string()
}

/// Directory holding ffmpeg: the search path first, then the bundled fallback.
pub fn resolve_ffmpeg_location(fallback: &Path) -> Option<PathBuf> {
    resolve_ffmpeg_location_with(|| which::which("ffmpeg").ok(), fallback)
}

pub fn resolve_ffmpeg_location_with(
    lookup: impl Fn() -> Option<PathBuf>,
    fallback: &Path,
) -> Option<PathBuf> {
    if let Some(system) = lookup() {
        return system.parent().map(Path::to_path_buf);
    }
    if fallback.is_file() {
        return fallback.parent().map(Path::to_path_buf);
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    pub url: String,
    pub format_selector: String,
    pub output_template: PathBuf,
    pub postprocessors: Vec<PostProcessor>,
    pub merge_output_format: Option<String>,
    pub quiet: bool,
    pub no_warnings: bool,
    pub no_playlist: bool,
    pub http_chunk_size: u64,
    pub ffmpeg_location: Option<PathBuf>,
}

/// Metadata the engine reports for a finished download.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Final location as written by the engine, after filename sanitizing.
    #[serde(default)]
    pub filepath: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(ProgressPayload),
    Log(String),
}

/// An extraction engine. Events are delivered on the calling thread before
/// `extract` returns.
pub trait Extractor {
    fn extract(
        &self,
        job: &ExtractionJob,
        on_event: &mut dyn FnMut(EngineEvent),
    ) -> Result<MediaInfo>;
}

/// Only engine lines carrying an errno or an explicit error marker reach the user.
pub struct EngineLogFilter {
    template: String,
}

impl EngineLogFilter {
    pub fn new(localizer: &Localizations) -> Self {
        Self {
            template: localizer
                .lookup_single_language("internal-error")
                .unwrap_or_else(|| "Internal error: {message}".to_string()),
        }
    }

    pub fn accept(&self, line: &str) -> Option<String> {
        if line.contains("[Errno") || line.contains("ERROR:") {
            Some(self.template.replace("{message}", line.trim()))
        } else {
            log::trace!("engine: {}", line);
            None
        }
    }
}

pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(job: &ExtractionJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            job.format_selector.clone().into(),
            "-o".into(),
            job.output_template.clone().into_os_string(),
        ];

        for postprocessor in &job.postprocessors {
            args.extend(postprocessor.to_args().into_iter().map(OsString::from));
        }
        if let Some(container) = &job.merge_output_format {
            args.push("--merge-output-format".into());
            args.push(container.into());
        }
        if job.quiet {
            args.push("--quiet".into());
        }
        if job.no_warnings {
            args.push("--no-warnings".into());
        }
        if job.no_playlist {
            args.push("--no-playlist".into());
        }

        args.extend(
            [
                "--newline",
                "--progress",
                "--progress-template",
                PROGRESS_TEMPLATE,
                "--no-simulate",
                "--print",
                META_TEMPLATE,
                "--http-chunk-size",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(job.http_chunk_size.to_string().into());

        if let Some(location) = &job.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(location.clone().into_os_string());
        }

        args.push("--".into());
        args.push(job.url.clone().into());
        args
    }
}

fn read_lossy_line<R: BufRead>(reader: &mut R, buffer: &mut Vec<u8>) -> io::Result<Option<String>> {
    buffer.clear();
    if reader.read_until(b'\n', buffer)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buffer);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn forward_lines<R: Read + Send + 'static>(stream: R, tx: Sender<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buffer = Vec::new();
        loop {
            match read_lossy_line(&mut reader, &mut buffer) {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::debug!("Stopped reading engine output: {}", e);
                    break;
                }
            }
        }
    })
}

impl Extractor for YtDlp {
    fn extract(
        &self,
        job: &ExtractionJob,
        on_event: &mut dyn FnMut(EngineEvent),
    ) -> Result<MediaInfo> {
        let mut command = Command::new(&self.program);
        command
            .args(Self::args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("Engine command: {:?}", command);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                DownloadError::EngineNotFound(self.program.display().to_string())
            } else {
                DownloadError::Spawn(e)
            }
        })?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let mut info = None;
        let mut metadata_error = None;
        let mut last_error = None;

        for line in rx {
            if let Some(payload) = ProgressPayload::parse_line(&line) {
                on_event(EngineEvent::Progress(payload));
                continue;
            }
            if let Some(json) = line.trim_start().strip_prefix(META_PREFIX) {
                match serde_json::from_str::<MediaInfo>(json) {
                    Ok(parsed) => info = Some(parsed),
                    Err(e) => metadata_error = Some(e),
                }
                continue;
            }
            if line.contains("ERROR:") {
                last_error = Some(line.trim().to_string());
            }
            on_event(EngineEvent::Log(line));
        }

        for reader in readers {
            let _ = reader.join();
        }
        let status = child.wait()?;

        if !status.success() {
            return Err(DownloadError::EngineFailed {
                code: status.code(),
                message: last_error.unwrap_or_else(|| status.to_string()),
            });
        }
        if let Some(e) = metadata_error {
            return Err(e.into());
        }
        info.ok_or(DownloadError::MissingMetadata)
    }
}

/// Runs one engine invocation per request and turns its outcome into a
/// `DownloadResult`. Failures never escape `download`.
pub struct Downloader<E: Extractor> {
    extractor: E,
    config: AppConfig,
    localizer: Localizations,
}

impl<E: Extractor> Downloader<E> {
    pub fn new(extractor: E, config: AppConfig, localizer: Localizations) -> Self {
        Self {
            extractor,
            config,
            localizer,
        }
    }

    pub fn download(
        &self,
        request: &DownloadRequest,
        sink: &mut dyn ProgressSink,
    ) -> Option<DownloadResult> {
        match self.try_download(request, sink) {
            Ok(result) => {
                log::info!("Downloaded {:?} to {}", result.title, result.file_path.display());
                Some(result)
            }
            Err(e) => {
                log::warn!("Download of {} failed: {}", request.url, e);
                sink.report_error(
                    self.localizer
                        .lookup_with("processing-error", &[("message", e.to_string().as_str())]),
                );
                None
            }
        }
    }

    fn try_download(
        &self,
        request: &DownloadRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<DownloadResult> {
        let url = clean_url(&request.url);
        if url.is_empty() {
            return Err(DownloadError::EmptyUrl);
        }

        let options = DownloadOptions::new(
            request.quality,
            request.audio_only,
            &self.config.audio_quality,
        );
        let job = ExtractionJob {
            url,
            format_selector: options.format_selector.clone(),
            output_template: self.config.scratch_dir.join("%(title)s.%(ext)s"),
            postprocessors: options.postprocessors.clone(),
            merge_output_format: options.merge_output_format.clone(),
            quiet: true,
            no_warnings: true,
            no_playlist: true,
            http_chunk_size: self.config.http_chunk_size,
            ffmpeg_location: resolve_ffmpeg_location(&self.config.ffmpeg_fallback),
        };

        let adapter = ProgressAdapter::new(&self.localizer);
        let log_filter = EngineLogFilter::new(&self.localizer);

        let info = self.extractor.extract(&job, &mut |event: EngineEvent| match event {
            EngineEvent::Progress(payload) => match adapter.handle(&payload, &mut *sink) {
                Some(ProgressEvent {
                    status: ProgressStatus::Downloading,
                    percent,
                    rate_text,
                    eta_text,
                }) => log::debug!("{:.1}% at {} (ETA {})", percent * 100.0, rate_text, eta_text),
                Some(ProgressEvent {
                    status: ProgressStatus::Finished,
                    ..
                }) => log::debug!("transfer finished, post-processing"),
                None => {}
            },
            EngineEvent::Log(line) => {
                if let Some(message) = log_filter.accept(&line) {
                    sink.report_error(message);
                }
            }
        })?;

        let extension = options.extension;
        let mut file_path = self
            .config
            .scratch_dir
            .join(format!("{}.{}", info.title, extension.as_str()));
        // The engine swaps characters such as `|` or `:` for look-alikes.
        if !file_path.exists() {
            if let Some(reported) = info.filepath.filter(|path| path.is_file()) {
                log::info!(
                    "{} not found, using engine path {}",
                    file_path.display(),
                    reported.display()
                );
                file_path = reported;
            }
        }

        Ok(DownloadResult {
            file_path,
            extension,
            title: info.title,
            thumbnail_url: info.thumbnail.filter(|url| !url.is_empty()),
        })
    }
}
