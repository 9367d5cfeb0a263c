use eframe::egui::{self, ColorImage, TextureOptions};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::config::AppConfig;
use crate::download::{Downloader, YtDlp};
use crate::localizations::Localizations;
use crate::models::{AppState, DownloadRequest, StatusMessage};
use crate::progress::ProgressSink;
use crate::scratch::{ScratchDir, ScratchFile};
use crate::theme::*;
use crate::thumbnail;
use crate::ui::{self, SidebarAction};

/// Forwards worker-thread progress to the UI and wakes it up.
struct ChannelSink {
    tx: Sender<StatusMessage>,
    ctx: egui::Context,
}

impl ChannelSink {
    fn send(&self, message: StatusMessage) {
        if self.tx.send(message).is_ok() {
            self.ctx.request_repaint();
        }
    }
}

impl ProgressSink for ChannelSink {
    fn set_progress(&mut self, fraction: f32) {
        self.send(StatusMessage::Progress(fraction));
    }

    fn set_status(&mut self, text: String) {
        self.send(StatusMessage::Status(text));
    }

    fn report_error(&mut self, message: String) {
        self.send(StatusMessage::Error(message));
    }
}

pub struct TubegrabApp {
    pub state: AppState,
    config: AppConfig,
    scratch: ScratchDir,
    scratch_files: Vec<ScratchFile>,
    localizer: Localizations,
    status_sender: Sender<StatusMessage>,
    status_receiver: Receiver<StatusMessage>,
    thumbnail_sender: Sender<ColorImage>,
    thumbnail_receiver: Receiver<ColorImage>,
    thumbnail: Option<egui::TextureHandle>,
}

impl TubegrabApp {
    pub fn new(config: AppConfig, localizer: Localizations) -> Self {
        let (status_sender, status_receiver) = mpsc::channel();
        let (thumbnail_sender, thumbnail_receiver) = mpsc::channel();

        let mut state = AppState::default();
        state.status = localizer
            .lookup_single_language("status-ready")
            .unwrap_or_else(|| "Ready".to_string());

        let mut app = Self {
            state,
            scratch: ScratchDir::new(config.scratch_dir.clone()),
            config,
            scratch_files: Vec::new(),
            localizer,
            status_sender,
            status_receiver,
            thumbnail_sender,
            thumbnail_receiver,
            thumbnail: None,
        };
        app.refresh_scratch_files();
        app
    }

    pub fn refresh_scratch_files(&mut self) {
        self.scratch_files = match self.scratch.list(self.state.file_filter) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Cannot list {}: {}", self.scratch.root().display(), e);
                Vec::new()
            }
        };
    }

    pub fn start_download(&mut self, ctx: &egui::Context) {
        // One download at a time; further requests are ignored until it ends.
        if self.state.is_downloading {
            return;
        }

        self.state.warning = None;
        if self.state.url.trim().is_empty() {
            self.state.warning = Some(
                self.localizer
                    .lookup_single_language("enter-url")
                    .unwrap_or_else(|| "Please enter a URL".to_string()),
            );
            return;
        }

        self.state.is_downloading = true;
        self.state.progress = 0.0;
        self.state.errors.clear();
        self.state.result = None;
        self.thumbnail = None;
        self.state.status = self
            .localizer
            .lookup_single_language("status-starting")
            .unwrap_or_else(|| "Starting download...".to_string());

        let request = DownloadRequest::new(self.state.url.clone(), self.state.quality)
            .with_audio_only(self.state.audio_only);
        let config = self.config.clone();
        let language = self.localizer.current_language().to_string();
        let tx = self.status_sender.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let extractor = YtDlp::new(config.ytdlp_program.clone());
            let downloader = Downloader::new(extractor, config, Localizations::for_language(&language));
            let mut sink = ChannelSink {
                tx: tx.clone(),
                ctx: ctx.clone(),
            };
            let result = downloader.download(&request, &mut sink);
            let _ = tx.send(StatusMessage::Finished(result));
            ctx.request_repaint();
        });
    }

    fn process_status_updates(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.status_receiver.try_recv() {
            match message {
                StatusMessage::Progress(fraction) => self.state.progress = fraction,
                StatusMessage::Status(text) => self.state.status = text,
                StatusMessage::Error(text) => self.state.errors.push(text),
                StatusMessage::Finished(result) => {
                    self.state.is_downloading = false;
                    let result = match result {
                        Some(result) if !result.file_path.exists() => {
                            log::warn!("Download output missing: {}", result.file_path.display());
                            let message = self.localizer.lookup_with(
                                "output-missing",
                                &[("path", result.file_path.display().to_string().as_str())],
                            );
                            self.state.status = message.clone();
                            self.state.errors.push(message);
                            None
                        }
                        other => other,
                    };
                    if let Some(result) = &result {
                        self.state.status = self
                            .localizer
                            .lookup_single_language("status-complete")
                            .unwrap_or_else(|| "Download complete".to_string());
                        if let Some(url) = result.thumbnail_url.clone() {
                            self.fetch_thumbnail(url, ctx);
                        }
                    }
                    self.state.result = result;
                    self.refresh_scratch_files();
                }
            }
        }

        while let Ok(image) = self.thumbnail_receiver.try_recv() {
            self.thumbnail = Some(ctx.load_texture("thumbnail", image, TextureOptions::default()));
        }
    }

    fn fetch_thumbnail(&self, url: String, ctx: &egui::Context) {
        let tx = self.thumbnail_sender.clone();
        let ctx = ctx.clone();
        thread::spawn(move || match thumbnail::fetch_thumbnail(&url) {
            Ok(image) => {
                if tx.send(image).is_ok() {
                    ctx.request_repaint();
                }
            }
            Err(e) => log::warn!("Thumbnail unavailable: {:#}", e),
        });
    }

    /// Lets the user pick a destination and streams the file there.
    fn save_copy(&mut self, file: &ScratchFile) {
        let mut dialog = rfd::FileDialog::new()
            .set_file_name(&file.name)
            .add_filter(file.mime_type(), &[file.extension.as_str()]);
        if let Some(dir) = dirs::download_dir() {
            dialog = dialog.set_directory(dir);
        }

        let Some(destination) = dialog.save_file() else {
            return;
        };
        if let Err(e) = self.scratch.export(file, &destination) {
            self.state.errors.push(format!("{}: {}", destination.display(), e));
        }
    }

    fn save_result(&mut self, path: &Path) {
        match ScratchFile::open(path) {
            Ok(file) => self.save_copy(&file),
            Err(e) => self.state.errors.push(format!("{}: {}", path.display(), e)),
        }
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        self.process_status_updates(ctx);

        let action = egui::SidePanel::left("scratch")
            .default_width(SIDEBAR_WIDTH)
            .show(ctx, |ui| {
                ui::render_scratch_sidebar(ui, &mut self.state, &self.scratch_files, &self.localizer)
            })
            .inner;

        match action {
            SidebarAction::None => {}
            SidebarAction::FilterChanged => self.refresh_scratch_files(),
            SidebarAction::Save(index) => {
                if let Some(file) = self.scratch_files.get(index).cloned() {
                    self.save_copy(&file);
                }
            }
            SidebarAction::DeleteAll => {
                let removed = self.scratch.delete_all(&self.scratch_files);
                log::info!("Removed {} of {} scratch files", removed, self.scratch_files.len());
                self.state.confirm_delete = false;
                self.refresh_scratch_files();
            }
        }

        let mut save_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(
                self.localizer
                    .lookup_single_language("app-title")
                    .unwrap_or_else(|| "YouTube Downloader".to_string()),
            );
            ui.add_space(16.0);

            let url_response = ui::render_url_input(ui, &mut self.state, &self.localizer);
            if url_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.start_download(ctx);
            }

            ui.add_space(10.0);
            ui::render_quality_selector(ui, &mut self.state, &self.localizer);
            ui.add_space(10.0);

            let label = self
                .localizer
                .lookup_single_language("download-button")
                .unwrap_or_else(|| "Download".to_string());
            if ui
                .add_enabled(
                    !self.state.is_downloading,
                    ui::primary_button(label, PRIMARY_BUTTON_BG),
                )
                .clicked()
            {
                self.start_download(ctx);
            }

            ui.add_space(16.0);
            ui::render_status(ui, &self.state);

            if let Some(result) = &self.state.result {
                ui.add_space(16.0);
                save_requested =
                    ui::render_result(ui, result, self.thumbnail.as_ref(), &self.localizer);
            }
        });

        if save_requested {
            if let Some(path) = self.state.result.as_ref().map(|r| r.file_path.clone()) {
                self.save_result(&path);
            }
        }
    }
}

impl eframe::App for TubegrabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_ui(ctx);
    }
}
