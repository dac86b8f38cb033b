//! Colors and options controlling how a card is drawn.

use crate::enums::Theme;
use std::fmt;
use std::str::FromStr;
use serde::Deserialize;

/// Widths above this are clamped.
pub const MAX_BORDER_WIDTH: f32 = 10.0;
/// Border width when none is given, and the stroke used for widths that can't be drawn.
pub const DEFAULT_BORDER_WIDTH: f32 = 1.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            3 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                let expand = |nibble: u32| (nibble as u8 & 0xF) * 0x11;

                Some(Self::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            },
            6 => Some(Self::hex(u32::from_str_radix(digits, 16).ok()?)),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Every color used on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub title: Color,
    pub sub_title: Color,
    pub text: Color,
    pub username: Color,
    pub id: Color,
    /// Current library value.
    pub current_price: Color,
    /// Initial library value.
    pub initial_price: Color,
    pub divider: Color,
    pub border: Color,
    pub progress_background: Color,
    pub progress_fill: Color,
}

impl Palette {
    /// Steam's own client colors.
    pub const STEAM: Self = Self {
        background: Color::hex(0x1b2838),
        title: Color::hex(0xffffff),
        sub_title: Color::hex(0x8f98a0),
        text: Color::hex(0xc7d5e0),
        username: Color::hex(0xffffff),
        id: Color::hex(0x8f98a0),
        current_price: Color::hex(0xa4d007),
        initial_price: Color::hex(0x66c0f4),
        divider: Color::hex(0x2a475e),
        border: Color::hex(0x66c0f4),
        progress_background: Color::hex(0x2a475e),
        progress_fill: Color::hex(0x66c0f4),
    };

    pub const DARK: Self = Self {
        background: Color::hex(0x0d1117),
        title: Color::hex(0xf0f6fc),
        sub_title: Color::hex(0x8b949e),
        text: Color::hex(0xc9d1d9),
        username: Color::hex(0xffffff),
        id: Color::hex(0x8b949e),
        current_price: Color::hex(0x3fb950),
        initial_price: Color::hex(0x58a6ff),
        divider: Color::hex(0x30363d),
        border: Color::hex(0x30363d),
        progress_background: Color::hex(0x21262d),
        progress_fill: Color::hex(0x58a6ff),
    };

    pub const LIGHT: Self = Self {
        background: Color::hex(0xffffff),
        title: Color::hex(0x1f2328),
        sub_title: Color::hex(0x656d76),
        text: Color::hex(0x1f2328),
        username: Color::hex(0x0d1117),
        id: Color::hex(0x656d76),
        current_price: Color::hex(0x1a7f37),
        initial_price: Color::hex(0x0969da),
        divider: Color::hex(0xd0d7de),
        border: Color::hex(0xd0d7de),
        progress_background: Color::hex(0xeaeef2),
        progress_fill: Color::hex(0x0969da),
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::STEAM
    }
}

impl From<Theme> for Palette {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::DARK,
            Theme::Light => Self::LIGHT,
        }
    }
}

/// Rendering options as given in the query string. Values are kept raw and interpreted by
/// [`RenderConfig::from_overrides`].
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RenderOverrides {
    pub bg_color: Option<String>,
    pub title_color: Option<String>,
    pub sub_title_color: Option<String>,
    pub text_color: Option<String>,
    pub username_color: Option<String>,
    pub id_color: Option<String>,
    pub cp_color: Option<String>,
    pub ip_color: Option<String>,
    pub div_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<String>,
    pub progbar_bg: Option<String>,
    pub progbar_color: Option<String>,
    pub hide_border: Option<String>,
    pub theme: Option<String>,
}

/// Resolved options for drawing a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub palette: Palette,
    /// As requested, after clamping. May be NaN or non-positive; see [`effective_stroke_width`].
    pub border_width: f32,
    pub hide_border: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            border_width: DEFAULT_BORDER_WIDTH,
            hide_border: false,
        }
    }
}

impl RenderConfig {
    /// Applies each color override that parses, then the theme. A recognized theme replaces the
    /// entire palette, including colors given individually.
    pub fn from_overrides(overrides: &RenderOverrides) -> Self {
        let mut palette = Palette::default();
        let colors = [
            (&overrides.bg_color, &mut palette.background),
            (&overrides.title_color, &mut palette.title),
            (&overrides.sub_title_color, &mut palette.sub_title),
            (&overrides.text_color, &mut palette.text),
            (&overrides.username_color, &mut palette.username),
            (&overrides.id_color, &mut palette.id),
            (&overrides.cp_color, &mut palette.current_price),
            (&overrides.ip_color, &mut palette.initial_price),
            (&overrides.div_color, &mut palette.divider),
            (&overrides.border_color, &mut palette.border),
            (&overrides.progbar_bg, &mut palette.progress_background),
            (&overrides.progbar_color, &mut palette.progress_fill),
        ];

        for (value, color) in colors {
            if let Some(parsed) = value.as_deref().and_then(Color::parse) {
                *color = parsed;
            }
        }

        let theme = overrides.theme
            .as_deref()
            .and_then(|theme| Theme::from_str(theme.trim()).ok());

        if let Some(theme) = theme {
            palette = Palette::from(theme);
        }

        Self {
            palette,
            border_width: border_width_from(overrides.border_width.as_deref()),
            hide_border: matches!(
                overrides.hide_border.as_deref().map(str::trim),
                Some("true" | "1"),
            ),
        }
    }

    /// Width the border is stroked with.
    pub fn stroke_width(&self) -> f32 {
        effective_stroke_width(self.border_width)
    }
}

/// Interprets a requested border width: absent is the default, numbers are capped at
/// [`MAX_BORDER_WIDTH`] and anything else is NaN.
pub fn border_width_from(raw: Option<&str>) -> f32 {
    let Some(raw) = raw else {
        return DEFAULT_BORDER_WIDTH;
    };

    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|width| !width.is_nan())
        .map_or(f32::NAN, |width| width.min(MAX_BORDER_WIDTH))
}

/// Widths that can't be stroked (NaN, zero, negative) leave the default width in place.
pub fn effective_stroke_width(width: f32) -> f32 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        DEFAULT_BORDER_WIDTH
    }
}
