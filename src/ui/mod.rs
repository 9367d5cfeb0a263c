use eframe::egui::{self, RichText, Stroke};

use crate::localizations::Localizations;
use crate::models::{AppState, DownloadResult, QualityLabel};
use crate::scratch::{FileFilter, ScratchFile};
use crate::theme::*;

const VLC_DOWNLOAD_URL: &str = "https://get.videolan.org/vlc/3.0.21/win32/vlc-3.0.21-win32.exe";

/// What the user asked for in the scratch sidebar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    None,
    FilterChanged,
    Save(usize),
    DeleteAll,
}

fn text(localizer: &Localizations, key: &str, fallback: &str) -> String {
    localizer
        .lookup_single_language(key)
        .unwrap_or_else(|| fallback.to_string())
}

pub fn primary_button(label: String, fill: egui::Color32) -> impl egui::Widget {
    egui::Button::new(
        RichText::new(label)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_MAIN_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(fill)
    .rounding(ROUNDING_BUTTON)
    .stroke(Stroke::new(1.0, BORDER_COLOR))
}

pub fn render_url_input(ui: &mut egui::Ui, state: &mut AppState, localizer: &Localizations) -> egui::Response {
    ui.label(text(localizer, "url-label", "Video URL:"));

    egui::Frame::group(ui.style())
        .fill(INPUT_BG)
        .stroke(Stroke::new(1.0, egui::Color32::LIGHT_GRAY))
        .rounding(4.0)
        .show(ui, |ui| {
            ui.add_sized(
                [ui.available_width(), 32.0],
                egui::TextEdit::singleline(&mut state.url)
                    .hint_text(text(localizer, "url-placeholder", "Enter video URL"))
                    .font(egui::FontId::proportional(16.0)),
            )
        })
        .inner
}

/// Quality picker plus the audio-only checkbox. Picking a quality resets the
/// checkbox to match it.
pub fn render_quality_selector(ui: &mut egui::Ui, state: &mut AppState, localizer: &Localizations) {
    ui.horizontal(|ui| {
        ui.label(text(localizer, "quality-label", "Quality:"));

        let before = state.quality;
        egui::ComboBox::from_id_source("quality")
            .selected_text(text(localizer, state.quality.localization_key(), state.quality.label()))
            .width(200.0)
            .show_ui(ui, |ui| {
                for quality in QualityLabel::ALL {
                    ui.selectable_value(
                        &mut state.quality,
                        quality,
                        text(localizer, quality.localization_key(), quality.label()),
                    );
                }
            });

        if state.quality != before {
            state.audio_only = state.quality == QualityLabel::AudioOnly;
        }
    });

    ui.checkbox(
        &mut state.audio_only,
        text(localizer, "audio-only", "Download audio only (MP3)"),
    );
}

pub fn render_status(ui: &mut egui::Ui, state: &AppState) {
    egui::Frame::group(ui.style())
        .fill(STATUS_BG)
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical(|ui| {
                if let Some(warning) = &state.warning {
                    ui.label(RichText::new(warning).color(TEXT_WARNING));
                }
                for error in &state.errors {
                    ui.label(RichText::new(error).color(TEXT_ERROR));
                }

                ui.label(RichText::new(&state.status).color(TEXT_STATUS));

                if state.is_downloading || state.progress > 0.0 {
                    ui.add_space(6.0);
                    ui.add(egui::ProgressBar::new(state.progress).show_percentage());
                }
            });
        });
}

/// Shows a finished download. Returns true when the user asks to save it.
pub fn render_result(
    ui: &mut egui::Ui,
    result: &DownloadResult,
    thumbnail: Option<&egui::TextureHandle>,
    localizer: &Localizations,
) -> bool {
    ui.heading(format!("🌟 {}", result.title));

    if let Some(texture) = thumbnail {
        ui.add(egui::Image::new(texture).max_width(THUMBNAIL_WIDTH));
    }

    ui.label(
        RichText::new(localizer.lookup_with(
            "saved-to",
            &[("path", result.file_path.display().to_string().as_str())],
        ))
        .color(SECONDARY_TEXT),
    );

    ui.add(primary_button(
        text(localizer, "save-result", "Save file"),
        PRIMARY_BUTTON_BG,
    ))
    .on_hover_text(format!("{} ({})", result.file_name(), result.extension.mime_type()))
    .clicked()
}

pub fn render_scratch_sidebar(
    ui: &mut egui::Ui,
    state: &mut AppState,
    files: &[ScratchFile],
    localizer: &Localizations,
) -> SidebarAction {
    let mut action = SidebarAction::None;

    ui.heading(text(localizer, "sidebar-title", "Files available for download"));
    ui.add_space(6.0);

    ui.label(text(localizer, "filter-label", "Filter by:"));
    for filter in FileFilter::ALL {
        let label = text(localizer, filter.localization_key(), filter.label());
        if ui.radio_value(&mut state.file_filter, filter, label).changed() {
            action = SidebarAction::FilterChanged;
        }
    }
    ui.add_space(6.0);

    if files.is_empty() {
        ui.label(RichText::new(text(localizer, "no-files", "No files found.")).color(SECONDARY_TEXT));
    } else {
        egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
            for (index, file) in files.iter().enumerate() {
                let size = format!("{:.2}", file.size_mb());
                let label = localizer.lookup_with("save-file", &[("name", file.name.as_str()), ("size", size.as_str())]);
                if ui.button(label).on_hover_text(file.mime_type()).clicked() {
                    action = SidebarAction::Save(index);
                }
            }
        });
    }

    ui.separator();
    if !files.is_empty() {
        ui.checkbox(
            &mut state.confirm_delete,
            text(localizer, "confirm-delete", "Confirm deleting every file"),
        );
        if state.confirm_delete
            && ui
                .add(primary_button(
                    text(localizer, "delete-button", "Clear files now"),
                    DANGER_BUTTON_BG,
                ))
                .clicked()
        {
            action = SidebarAction::DeleteAll;
        }
    }

    ui.separator();
    ui.label(RichText::new(text(localizer, "vlc-title", "Install VLC Player")).strong());
    ui.hyperlink_to("VLC (Windows 32-bit)", VLC_DOWNLOAD_URL);

    action
}
