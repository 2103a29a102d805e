//! Tray icon selection.

/// Desktop theme the icon has to stand out against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconTheme {
    /// Light taskbar: black logo.
    Light,
    /// Dark taskbar: white logo.
    #[default]
    Dark,
}

impl IconTheme {
    /// Reads the current desktop theme. Falls back to dark.
    pub fn detect() -> Self {
        if system_uses_light_theme() {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

/// Pixel size of the embedded icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Small16,
    Large32,
}

/// One of the four embedded logo images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconVariant {
    pub theme: IconTheme,
    pub size: IconSize,
}

impl IconVariant {
    /// Picks the image for a theme and a display scale factor.
    pub fn select(theme: IconTheme, scale_factor: f64) -> Self {
        let size = if scale_factor >= 1.5 {
            IconSize::Large32
        } else {
            IconSize::Small16
        };
        Self { theme, size }
    }

    /// Resource name of the embedded image.
    pub fn resource_name(&self) -> &'static str {
        match (self.theme, self.size) {
            (IconTheme::Light, IconSize::Small16) => "LOGO_BLACK_16",
            (IconTheme::Light, IconSize::Large32) => "LOGO_BLACK_32",
            (IconTheme::Dark, IconSize::Small16) => "LOGO_WHITE_16",
            (IconTheme::Dark, IconSize::Large32) => "LOGO_WHITE_32",
        }
    }
}

#[cfg(target_os = "windows")]
fn system_uses_light_theme() -> bool {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey(r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize")
        .and_then(|key| key.get_value::<u32, _>("SystemUsesLightTheme"))
        .is_ok_and(|value| value == 1)
}

#[cfg(not(target_os = "windows"))]
fn system_uses_light_theme() -> bool {
    false
}
