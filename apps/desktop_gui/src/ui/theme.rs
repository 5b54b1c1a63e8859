use egui::{Color32, Stroke};
use shared::domain::{BadgePalette, CategoryClass};

pub const ACCENT: Color32 = Color32::from_rgb(20, 184, 166);
pub const ACCENT_DARK: Color32 = Color32::from_rgb(13, 148, 136);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(75, 85, 99);

pub const SUCCESS_FILL: Color32 = Color32::from_rgb(240, 253, 244);
pub const SUCCESS_STROKE: Color32 = Color32::from_rgb(74, 222, 128);
pub const SUCCESS_TEXT: Color32 = Color32::from_rgb(22, 101, 52);

pub const ERROR_FILL: Color32 = Color32::from_rgb(254, 242, 242);
pub const ERROR_STROKE: Color32 = Color32::from_rgb(248, 113, 113);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(153, 27, 27);

pub const ACTIVE_DOT: Color32 = Color32::from_rgb(74, 222, 128);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeStyle {
    pub fill: Color32,
    pub text: Color32,
    pub stroke: Stroke,
}

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

pub fn badge_style(class: CategoryClass) -> BadgeStyle {
    let BadgePalette {
        background,
        text,
        border,
    } = class.palette();
    BadgeStyle {
        fill: rgb(background),
        text: rgb(text),
        stroke: Stroke::new(1.0, rgb(border)),
    }
}
