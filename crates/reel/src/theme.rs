use eframe::egui::Color32;

/// Palette and type scale for the player window.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color32,
    pub card_background: Color32,
    pub card_border: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    /// Highlights, initials badge and hovered controls.
    pub accent: Color32,
    pub badge_text: Color32,
    pub control_background: Color32,
    pub title_size: f32,
    pub name_size: f32,
    pub highlight_size: f32,
    pub body_size: f32,
    pub badge_size: f32,
}

const TITLE_SIZE: f32 = 40.0;
const NAME_SIZE: f32 = 20.0;
const HIGHLIGHT_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 16.0;
const BADGE_SIZE: f32 = 18.0;

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color32::from_rgb(0x17, 0x18, 0x1C),
            card_background: Color32::from_rgb(0x24, 0x26, 0x2C),
            card_border: Color32::from_rgb(0x34, 0x37, 0x3F),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            badge_text: Color32::WHITE,
            control_background: Color32::from_rgb(0x30, 0x33, 0x3A),
            title_size: TITLE_SIZE,
            name_size: NAME_SIZE,
            highlight_size: HIGHLIGHT_SIZE,
            body_size: BODY_SIZE,
            badge_size: BADGE_SIZE,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color32::from_rgb(0xFA, 0xFA, 0xF7),
            card_background: Color32::WHITE,
            card_border: Color32::from_rgb(0xE4, 0xE4, 0xE0),
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            badge_text: Color32::WHITE,
            control_background: Color32::WHITE,
            title_size: TITLE_SIZE,
            name_size: NAME_SIZE,
            highlight_size: HIGHLIGHT_SIZE,
            body_size: BODY_SIZE,
            badge_size: BADGE_SIZE,
        }
    }

    /// Unknown names fall back to light.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            other => {
                tracing::warn!(theme = other, "unknown theme; using light");
                Self::light()
            }
        }
    }

    pub fn toggled(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn faded(color: Color32, opacity: f32) -> Color32 {
        color.gamma_multiply(opacity.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let theme = Theme::from_name("dark");
        assert_eq!(theme.toggled(), Theme::light());
        assert_eq!(theme.toggled().toggled(), theme);
    }

    #[test]
    fn test_unknown_name_is_light() {
        assert_eq!(Theme::from_name("solarized").name, "light");
    }

    #[test]
    fn test_faded_clamps() {
        assert_eq!(Theme::faded(Color32::WHITE, 1.5), Color32::WHITE);
        assert_eq!(Theme::faded(Color32::WHITE, -1.0), Color32::TRANSPARENT);
    }
}
