use lazy_static::lazy_static;
use regex::Regex;

use crate::localizations::Localizations;

/// Marker the engine's progress template starts every line with.
pub const PROGRESS_PREFIX: &str = "tubegrab-progress|";

/// yt-dlp `--progress-template` producing lines `parse_line` understands.
pub const PROGRESS_TEMPLATE: &str = "download:tubegrab-progress|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s";

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x1f\x7f-\x{9f}]+").unwrap();
}

/// Drops terminal escapes and non-printable characters from an engine string.
pub fn clean_display(raw: &str) -> String {
    let without_escapes = ANSI_ESCAPE.replace_all(raw, "");
    CONTROL_CHARS
        .replace_all(&without_escapes, "")
        .trim()
        .to_string()
}

/// Raw status callback data, as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressPayload {
    pub status: String,
    pub downloaded_bytes: Option<f64>,
    pub total_bytes: Option<f64>,
    pub total_bytes_estimate: Option<f64>,
    pub percent_str: String,
    pub speed_str: String,
    pub eta_str: String,
}

fn parse_counter(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "NA" || raw == "None" {
        return None;
    }
    raw.parse::<f64>().ok()
}

impl ProgressPayload {
    pub fn parse_line(line: &str) -> Option<Self> {
        let rest = line.trim_start().strip_prefix(PROGRESS_PREFIX)?;
        let parts: Vec<&str> = rest.splitn(7, '|').collect();
        if parts.len() < 7 {
            return None;
        }

        let text = |raw: &str| if raw.trim() == "NA" { String::new() } else { raw.to_string() };

        Some(Self {
            status: parts[0].trim().to_string(),
            downloaded_bytes: parse_counter(parts[1]),
            total_bytes: parse_counter(parts[2]),
            total_bytes_estimate: parse_counter(parts[3]),
            percent_str: text(parts[4]),
            speed_str: text(parts[5]),
            eta_str: text(parts[6]),
        })
    }

    /// Downloaded fraction in `[0, 1]`. A missing or zero total counts as 1 byte.
    pub fn fraction(&self) -> f32 {
        let total = self
            .total_bytes
            .filter(|t| *t > 0.0)
            .or(self.total_bytes_estimate.filter(|t| *t > 0.0))
            .unwrap_or(1.0);
        let downloaded = self.downloaded_bytes.unwrap_or(0.0).max(0.0);
        (downloaded / total).min(1.0) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Downloading,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub percent: f32,
    pub rate_text: String,
    pub eta_text: String,
}

/// Where progress and user-facing messages end up.
pub trait ProgressSink {
    fn set_progress(&mut self, fraction: f32);
    fn set_status(&mut self, text: String);
    fn report_error(&mut self, message: String);
}

pub struct ProgressAdapter {
    line_template: String,
    finalizing: String,
}

impl ProgressAdapter {
    pub fn new(localizer: &Localizations) -> Self {
        Self {
            line_template: localizer
                .lookup_single_language("progress-line")
                .unwrap_or_else(|| "{percent} downloaded | {speed} | ETA: {eta}".to_string()),
            finalizing: localizer
                .lookup_single_language("status-finalizing")
                .unwrap_or_else(|| "Finalizing...".to_string()),
        }
    }

    pub fn handle(
        &self,
        payload: &ProgressPayload,
        sink: &mut dyn ProgressSink,
    ) -> Option<ProgressEvent> {
        match payload.status.as_str() {
            "downloading" => {
                let percent = payload.fraction();
                let percent_text = clean_display(&payload.percent_str);
                let rate_text = clean_display(&payload.speed_str);
                let eta_text = clean_display(&payload.eta_str);

                sink.set_progress(percent);
                sink.set_status(
                    self.line_template
                        .replace("{percent}", &percent_text)
                        .replace("{speed}", &rate_text)
                        .replace("{eta}", &eta_text),
                );

                Some(ProgressEvent {
                    status: ProgressStatus::Downloading,
                    percent,
                    rate_text,
                    eta_text,
                })
            }
            "finished" => {
                sink.set_progress(1.0);
                sink.set_status(self.finalizing.clone());
                Some(ProgressEvent {
                    status: ProgressStatus::Finished,
                    percent: 1.0,
                    rate_text: String::new(),
                    eta_text: String::new(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub progress: Vec<f32>,
        pub status: Vec<String>,
        pub errors: Vec<String>,
    }

    impl ProgressSink for RecordingSink {
        fn set_progress(&mut self, fraction: f32) {
            self.progress.push(fraction);
        }

        fn set_status(&mut self, text: String) {
            self.status.push(text);
        }

        fn report_error(&mut self, message: String) {
            self.errors.push(message);
        }
    }

    fn downloading(downloaded: Option<f64>, total: Option<f64>) -> ProgressPayload {
        ProgressPayload {
            status: "downloading".into(),
            downloaded_bytes: downloaded,
            total_bytes: total,
            ..Default::default()
        }
    }

    fn adapter() -> ProgressAdapter {
        ProgressAdapter::new(&Localizations::for_language("pt-BR"))
    }

    #[test]
    fn half_downloaded_is_exactly_half() {
        let mut sink = RecordingSink::default();
        let event = adapter()
            .handle(&downloading(Some(50.0), Some(100.0)), &mut sink)
            .unwrap();
        assert_eq!(event.percent, 0.5);
        assert_eq!(sink.progress, vec![0.5]);
    }

    #[test]
    fn zero_or_missing_total_does_not_divide_by_zero() {
        assert_eq!(downloading(Some(0.0), Some(0.0)).fraction(), 0.0);
        assert_eq!(downloading(None, None).fraction(), 0.0);
        assert_eq!(downloading(Some(4096.0), None).fraction(), 1.0);

        let estimated = ProgressPayload {
            total_bytes_estimate: Some(200.0),
            ..downloading(Some(50.0), Some(0.0))
        };
        assert_eq!(estimated.fraction(), 0.25);
    }

    #[test]
    fn strips_escape_and_control_characters() {
        assert_eq!(clean_display("1.2MB/s\x1b[0m"), "1.2MB/s");
        assert_eq!(clean_display("\x1b[0;94m 42.0%\x1b[0m"), "42.0%");
        assert_eq!(clean_display("00:12\r\n"), "00:12");
        assert_eq!(clean_display("\u{85}3.1KiB/s"), "3.1KiB/s");
    }

    #[test]
    fn downloading_status_line_is_cleaned() {
        let payload = ProgressPayload {
            percent_str: "\x1b[0;94m 50.0%\x1b[0m".into(),
            speed_str: "1.2MB/s\x1b[0m".into(),
            eta_str: "\x1b[0;33m00:05\x1b[0m".into(),
            ..downloading(Some(50.0), Some(100.0))
        };
        let mut sink = RecordingSink::default();
        let event = adapter().handle(&payload, &mut sink).unwrap();
        assert_eq!(event.rate_text, "1.2MB/s");
        assert_eq!(event.eta_text, "00:05");
        assert_eq!(sink.status, vec!["50.0% baixado | 1.2MB/s | ETA: 00:05"]);
    }

    #[test]
    fn finished_forces_full_progress() {
        let payload = ProgressPayload {
            status: "finished".into(),
            downloaded_bytes: Some(10.0),
            total_bytes: Some(100.0),
            ..Default::default()
        };
        let mut sink = RecordingSink::default();
        let event = adapter().handle(&payload, &mut sink).unwrap();
        assert_eq!(event.status, ProgressStatus::Finished);
        assert_eq!(sink.progress, vec![1.0]);
        assert_eq!(sink.status, vec!["Finalizando..."]);
    }

    #[test]
    fn other_statuses_are_ignored() {
        let payload = ProgressPayload {
            status: "error".into(),
            ..Default::default()
        };
        let mut sink = RecordingSink::default();
        assert!(adapter().handle(&payload, &mut sink).is_none());
        assert!(sink.progress.is_empty());
        assert!(sink.status.is_empty());
    }

    #[test]
    fn parses_template_lines() {
        let line = "tubegrab-progress|downloading|512|1024|NA| 50.0%|2.00MiB/s|00:01";
        let payload = ProgressPayload::parse_line(line).unwrap();
        assert_eq!(payload.status, "downloading");
        assert_eq!(payload.downloaded_bytes, Some(512.0));
        assert_eq!(payload.total_bytes, Some(1024.0));
        assert_eq!(payload.total_bytes_estimate, None);
        assert_eq!(payload.percent_str, " 50.0%");
        assert_eq!(payload.eta_str, "00:01");

        let estimate = "tubegrab-progress|downloading|10|NA|2048.0|NA|NA|NA";
        let payload = ProgressPayload::parse_line(estimate).unwrap();
        assert_eq!(payload.total_bytes_estimate, Some(2048.0));
        assert_eq!(payload.speed_str, "");

        assert!(ProgressPayload::parse_line("[download] 50.0% of 1MiB").is_none());
        assert!(ProgressPayload::parse_line("tubegrab-progress|downloading|1").is_none());
    }
}
