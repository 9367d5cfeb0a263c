use egui::{Color32, Vec2};

// Buttons
pub const PRIMARY_BUTTON_BG: Color32 = Color32::from_rgb(76, 154, 255);
pub const DANGER_BUTTON_BG: Color32 = Color32::from_rgb(214, 69, 65);
pub const BUTTON_MAIN_TEXT: Color32 = Color32::from_rgb(255, 255, 255);

// Text
pub const SECONDARY_TEXT: Color32 = Color32::from_rgb(138, 138, 143);
pub const TEXT_ERROR: Color32 = Color32::from_rgb(200, 30, 30);
pub const TEXT_WARNING: Color32 = Color32::from_rgb(196, 132, 0);
pub const TEXT_STATUS: Color32 = Color32::DARK_GRAY;

// Surfaces
pub const INPUT_BG: Color32 = Color32::from_rgb(250, 250, 250);
pub const STATUS_BG: Color32 = Color32::from_rgb(248, 248, 248);
pub const BORDER_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 67, 15);

// Sizing & Spacing
pub const ROUNDING_FRAME: f32 = 8.0;
pub const ROUNDING_BUTTON: f32 = 6.0;
pub const MIN_SIZE_BUTTON: Vec2 = Vec2::new(160.0, 40.0);
pub const THUMBNAIL_WIDTH: f32 = 320.0;
pub const SIDEBAR_WIDTH: f32 = 300.0;

pub const BUTTON_FONT_SIZE: f32 = 16.0;
