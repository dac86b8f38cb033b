//! Drawing stat cards.
//!
//! A card is composed as an SVG document from pure layout helpers in [`geometry`] and [`text`],
//! then rasterized to PNG.

pub mod assets;
pub mod config;
pub mod geometry;
mod svg;
pub mod text;

pub use assets::{Assets, Icon};
pub use config::{
    border_width_from,
    effective_stroke_width,
    Color,
    Palette,
    RenderConfig,
    RenderOverrides,
};
pub use svg::svg_to_png_bytes;

use crate::avatar::CachedImage;
use crate::currency::group_thousands;
use crate::error::RenderError;
use crate::library::{LibraryOutcome, LibraryTotals};
use crate::profile::Profile;
use crate::time::{time_ago, time_since, ServerTime};
use geometry::{avatar_placement, progress_bar, Rect, RoundRect};
use text::{escape_xml, truncate_chars, truncate_to_width, FontWeight};
use std::sync::Arc;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const CARD_WIDTH: u32 = 705;
pub const CARD_HEIGHT: u32 = 385;

const NAME_MAX_WIDTH: f32 = 180.0;
const LOCATION_MAX_CHARS: usize = 22;
const AVATAR_FRAME: Rect = Rect::new(25.0, 25.0, 130.0, 130.0);
const DIVIDER_X: f32 = 260.0;
const PANEL: Rect = Rect::new(285.0, 25.0, 395.0, 335.0);
const PROGRESS_AREA: Rect = Rect::new(285.0, 300.0, 395.0, 16.0);
const STAT_COLUMNS: [f32; 3] = [285.0, 420.0, 555.0];
const STAT_ROWS: [f32; 3] = [95.0, 160.0, 225.0];
const ICON_SIZE: f32 = 16.0;
const WATERMARK_TEXT: &str = "steam-stat-card";
const WATERMARK_OPACITY: f32 = 0.3;

/// Everything a single card shows.
#[derive(Debug, Clone, Copy)]
pub struct Card<'a> {
    pub profile: &'a Profile,
    pub library: &'a LibraryOutcome,
    /// Drawn only when present.
    pub avatar: Option<&'a CachedImage>,
    pub config: &'a RenderConfig,
    /// Relative times are measured from here.
    pub now: ServerTime,
}

/// Builds an SVG document element by element.
struct SvgWriter<'a> {
    out: String,
    font_family: &'a str,
}

struct TextStyle {
    size: f32,
    weight: FontWeight,
    color: Color,
    anchor: &'static str,
    opacity: Option<f32>,
}

impl TextStyle {
    fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            color,
            anchor: "start",
            opacity: None,
        }
    }

    fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    fn anchor(mut self, anchor: &'static str) -> Self {
        self.anchor = anchor;
        self
    }

    fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

impl<'a> SvgWriter<'a> {
    fn new(width: u32, height: u32, font_family: &'a str) -> Self {
        let mut out = String::with_capacity(16 * 1024);

        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
        ));

        Self {
            out,
            font_family,
        }
    }

    fn rect(&mut self, rect: Rect, fill: Color) {
        self.out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"/>"#,
            rect.x, rect.y, rect.width, rect.height,
        ));
    }

    fn round_rect(&mut self, shape: &RoundRect, fill: Color) {
        self.out.push_str(&format!(r#"<path d="{}" fill="{fill}"/>"#, shape.path_data()));
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Color, width: f32) {
        self.out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{stroke}" stroke-width="{width}"/>"#,
            rect.x, rect.y, rect.width, rect.height,
        ));
    }

    fn text(&mut self, x: f32, y: f32, style: &TextStyle, content: &str) {
        let opacity = style.opacity
            .map(|opacity| format!(r#" fill-opacity="{opacity}""#))
            .unwrap_or_default();

        self.out.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-family="{}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}"{opacity}>{}</text>"#,
            escape_xml(self.font_family),
            style.size,
            style.weight.as_svg(),
            style.color,
            style.anchor,
            escape_xml(content),
        ));
    }

    fn image(&mut self, rect: Rect, href: &str, extra: &str) {
        self.out.push_str(&format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"{extra}/>"#,
            rect.x, rect.y, rect.width, rect.height, escape_xml(href),
        ));
    }

    fn raw(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    fn finish(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }
}

/// Draws cards with a fixed set of [`Assets`].
#[derive(Debug, Clone)]
pub struct CardRenderer {
    assets: Arc<Assets>,
}

impl CardRenderer {
    pub fn new(assets: Arc<Assets>) -> Self {
        Self {
            assets,
        }
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Renders `card` as a PNG.
    pub fn render(&self, card: &Card<'_>) -> Result<Vec<u8>, RenderError> {
        let svg = self.build_svg(card);
        let Color { r, g, b } = card.config.palette.background;

        svg_to_png_bytes(&svg, self.assets.fontdb(), [r, g, b])
    }

    /// Lays out `card` as an SVG document.
    pub fn build_svg(&self, card: &Card<'_>) -> String {
        let font_family = self.assets.font_family();
        let palette = &card.config.palette;
        let mut svg = SvgWriter::new(CARD_WIDTH, CARD_HEIGHT, &font_family);

        svg.rect(Rect::new(0.0, 0.0, CARD_WIDTH as f32, CARD_HEIGHT as f32), palette.background);
        self.draw_watermark(&mut svg, palette);
        self.draw_identity(&mut svg, card);
        svg.rect(Rect::new(DIVIDER_X, PANEL.y, 1.0, PANEL.height), palette.divider);
        self.draw_statistics(&mut svg, card.library, palette);

        if let Some(avatar) = card.avatar {
            draw_avatar(&mut svg, avatar);
        }

        if !card.config.hide_border {
            svg.stroke_rect(
                Rect::new(0.0, 0.0, CARD_WIDTH as f32, CARD_HEIGHT as f32),
                palette.border,
                card.config.stroke_width(),
            );
        }

        svg.finish()
    }

    fn draw_watermark(&self, svg: &mut SvgWriter<'_>, palette: &Palette) {
        let image = Rect::new(
            CARD_WIDTH as f32 - 20.0 - ICON_SIZE,
            CARD_HEIGHT as f32 - 12.0 - ICON_SIZE,
            ICON_SIZE,
            ICON_SIZE,
        );
        let style = TextStyle::new(11.0, palette.text)
            .anchor("end")
            .opacity(WATERMARK_OPACITY);

        svg.text(image.x - 6.0, image.bottom() - 3.0, &style, WATERMARK_TEXT);

        if let Some(watermark) = self.assets.watermark() {
            svg.image(image, watermark, &format!(r#" opacity="{WATERMARK_OPACITY}""#));
        }
    }

    fn draw_identity(&self, svg: &mut SvgWriter<'_>, card: &Card<'_>) {
        let palette = &card.config.palette;
        let profile = card.profile;
        let measurer = self.assets.measurer();
        let name_style = TextStyle::new(26.0, palette.username).bold();
        let name = truncate_to_width(&profile.display_name, NAME_MAX_WIDTH, |text| {
            measurer.measure(text, name_style.size, name_style.weight)
        });

        svg.text(AVATAR_FRAME.x, 190.0, &name_style, &name);
        svg.text(
            AVATAR_FRAME.x,
            212.0,
            &TextStyle::new(13.0, palette.id),
            &u64::from(profile.steamid).to_string(),
        );

        let location = profile.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(|location| truncate_chars(location, LOCATION_MAX_CHARS))
            .unwrap_or_else(|| "Unknown".into());
        let last_seen = match profile.last_seen {
            Some(last_seen) => format!("Last seen {}", time_ago(last_seen, card.now)),
            None => "Last seen never".into(),
        };
        let joined = match profile.created {
            Some(created) => format!("Joined {} ago", time_since(created, card.now)),
            None => "Joined Unknown".into(),
        };
        let details = [
            (Icon::Location, location, 245.0),
            (Icon::LastSeen, last_seen, 275.0),
            (Icon::Joined, joined, 305.0),
        ];
        let style = TextStyle::new(14.0, palette.text);

        for (icon, detail, y) in details {
            if let Some(uri) = self.assets.icon(icon) {
                svg.image(Rect::new(AVATAR_FRAME.x, y - 13.0, ICON_SIZE, ICON_SIZE), uri, "");
            }

            svg.text(AVATAR_FRAME.x + ICON_SIZE + 8.0, y, &style, &detail);
        }
    }

    fn draw_statistics(&self, svg: &mut SvgWriter<'_>, library: &LibraryOutcome, palette: &Palette) {
        let title_x = match self.assets.icon(Icon::Stats) {
            Some(uri) => {
                svg.image(Rect::new(PANEL.x, 30.0, 20.0, 20.0), uri, "");
                PANEL.x + 28.0
            },
            None => PANEL.x,
        };

        svg.text(title_x, 47.0, &TextStyle::new(18.0, palette.title).bold(), "Library Stats");
        svg.rect(Rect::new(PANEL.x, 65.0, PANEL.width, 1.0), palette.divider);

        match library {
            LibraryOutcome::Totals(totals) => draw_totals(svg, totals, palette),
            LibraryOutcome::Restricted => {
                let center = PANEL.x + PANEL.width / 2.0;

                svg.text(
                    center,
                    200.0,
                    &TextStyle::new(22.0, palette.title).bold().anchor("middle"),
                    "Private Games List",
                );
                svg.text(
                    center,
                    226.0,
                    &TextStyle::new(13.0, palette.sub_title).anchor("middle"),
                    "Set game details to public in your Steam privacy settings",
                );
            },
        }
    }
}

fn draw_totals(svg: &mut SvgWriter<'_>, totals: &LibraryTotals, palette: &Palette) {
    let blocks = [
        ("Current Value", totals.current_value.clone(), palette.current_price),
        ("Initial Value", totals.initial_value.clone(), palette.initial_price),
        ("Total Games", group_thousands(totals.total_game_count as u64), palette.text),
        ("Avg. Price", totals.average_price.clone(), palette.text),
        ("Price / Hour", totals.price_per_hour.clone(), palette.text),
        ("Avg. Playtime", totals.average_playtime_hours.clone(), palette.text),
        ("Total Playtime", totals.total_playtime_hours.clone(), palette.text),
    ];
    let label_style = TextStyle::new(12.0, palette.sub_title);

    for (i, (label, value, color)) in blocks.into_iter().enumerate() {
        let x = STAT_COLUMNS[i % STAT_COLUMNS.len()];
        let y = STAT_ROWS[i / STAT_COLUMNS.len()];

        svg.text(x, y, &label_style, label);
        svg.text(x, y + 25.0, &TextStyle::new(18.0, color).bold(), &value);
    }

    let Some(bar) = progress_bar(PROGRESS_AREA, totals.played_count, totals.total_game_count) else {
        return;
    };
    let percent = (totals.played_count as f64 * 100.0 / totals.total_game_count as f64).round();

    svg.text(
        PANEL.x,
        PROGRESS_AREA.y - 10.0,
        &TextStyle::new(13.0, palette.text),
        &format!(
            "{} of {} games played ({percent}%)",
            group_thousands(totals.played_count as u64),
            group_thousands(totals.total_game_count as u64),
        ),
    );
    svg.text(
        PANEL.right(),
        PROGRESS_AREA.y - 10.0,
        &TextStyle::new(13.0, palette.sub_title).anchor("end"),
        &totals.total_playtime_precise,
    );
    svg.round_rect(&bar.track, palette.progress_background);

    if let Some(fill) = &bar.fill {
        svg.round_rect(fill, palette.progress_fill);
    }
}

fn draw_avatar(svg: &mut SvgWriter<'_>, avatar: &CachedImage) {
    let placement = avatar_placement(AVATAR_FRAME, avatar.width, avatar.height);
    let href = format!("data:{};base64,{}", avatar.mime, STANDARD.encode(&avatar.data));

    svg.raw(&format!(
        r#"<defs><clipPath id="avatar-clip"><path d="{}"/></clipPath></defs>"#,
        placement.clip.path_data(),
    ));
    svg.image(placement.image, &href, r#" clip-path="url(#avatar-clip)""#);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ProfileVisibility;
    use crate::library::{LibraryTotals, PlaytimeSummary, PriceSums};
    use chrono::TimeZone;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use bytes::Bytes;
    use steamid_ng::SteamID;

    fn now() -> ServerTime {
        chrono::Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn profile() -> Profile {
        Profile {
            steamid: SteamID::from(76561197960287930),
            display_name: "Rabscuttle <script>".into(),
            visibility: ProfileVisibility::Public,
            avatar_url: None,
            last_seen: Some(now() - chrono::Duration::hours(3)),
            created: Some(chrono::Utc.with_ymd_and_hms(2003, 9, 12, 0, 0, 0).unwrap()),
            country_code: Some("US".into()),
            online_state: Some("online".into()),
            location: Some("Bellevue, Washington, United States".into()),
        }
    }

    fn totals(played: usize, unplayed: usize) -> LibraryOutcome {
        LibraryOutcome::Totals(LibraryTotals::compute(
            PlaytimeSummary {
                played,
                unplayed,
                total_minutes: 6_000,
            },
            PriceSums {
                current: 12_345,
                initial: 23_456,
                priced: 3,
            },
        ))
    }

    fn renderer() -> CardRenderer {
        CardRenderer::new(Arc::new(Assets::load(&std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))))
    }

    fn render(library: &LibraryOutcome, config: &RenderConfig, avatar: Option<&CachedImage>) -> RgbaImage {
        let profile = profile();
        let png = renderer().render(&Card {
            profile: &profile,
            library,
            avatar,
            config,
            now: now(),
        }).unwrap();

        image::load_from_memory(&png).unwrap().to_rgba8()
    }

    fn rgba(color: Color) -> [u8; 4] {
        [color.r, color.g, color.b, 255]
    }

    #[test]
    fn svg_contains_escaped_details() {
        let profile = profile();
        let config = RenderConfig::default();
        let library = totals(2, 1);
        let svg = renderer().build_svg(&Card {
            profile: &profile,
            library: &library,
            avatar: None,
            config: &config,
            now: now(),
        });

        assert!(svg.contains("Rabscuttle &lt;script&gt;"));
        assert!(svg.contains("76561197960287930"));
        assert!(svg.contains("Bellevue, Washington, …"));
        assert!(svg.contains("Last seen 3 hours ago"));
        assert!(svg.contains("Joined 21 years ago"));
        assert!(svg.contains("$123.45"));
        assert!(svg.contains("2 of 3 games played (67%)"));
        assert!(!svg.contains("Private Games List"));
    }

    #[test]
    fn missing_details_have_placeholders() {
        let profile = Profile {
            location: None,
            last_seen: None,
            created: None,
            ..profile()
        };
        let config = RenderConfig::default();
        let svg = renderer().build_svg(&Card {
            profile: &profile,
            library: &LibraryOutcome::Restricted,
            avatar: None,
            config: &config,
            now: now(),
        });

        assert!(svg.contains(">Unknown<"));
        assert!(svg.contains("Last seen never"));
        assert!(svg.contains("Joined Unknown"));
        assert!(svg.contains("Private Games List"));
    }

    #[test]
    fn renders_card_size() {
        let image = render(&totals(2, 1), &RenderConfig::default(), None);

        assert_eq!(image.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
        assert_eq!(image.get_pixel(200, 370).0, rgba(Palette::STEAM.background));
    }

    fn drawn_pixels(image: &RgbaImage, x: std::ops::Range<u32>, y: std::ops::Range<u32>, background: Color) -> usize {
        y.flat_map(|y| x.clone().map(move |x| (x, y)))
            .filter(|(x, y)| image.get_pixel(*x, *y).0 != rgba(background))
            .count()
    }

    #[test]
    fn long_names_fit_name_width() {
        let renderer = renderer();
        let measurer = renderer.assets().measurer();
        let measure = |text: &str| measurer.measure(text, 26.0, FontWeight::Bold);
        let name = "Rabscuttle the Magnificent Destroyer of Worlds";

        assert!(measurer.has_fonts());
        assert!(measure(name) > NAME_MAX_WIDTH);

        let truncated = truncate_to_width(name, NAME_MAX_WIDTH, measure);
        let kept = truncated.trim_end_matches('…').chars().count();
        let one_more = name.chars().take(kept + 1).collect::<String>() + "…";

        assert!(truncated.ends_with('…'));
        assert!(measure(&truncated) <= NAME_MAX_WIDTH);
        assert!(measure(&one_more) > NAME_MAX_WIDTH);
    }

    #[test]
    fn draws_name_and_private_message() {
        let image = render(&LibraryOutcome::Restricted, &RenderConfig::default(), None);
        let background = Palette::STEAM.background;

        assert!(drawn_pixels(&image, 25..220, 165..195, background) > 100);
        assert!(drawn_pixels(&image, 330..640, 180..205, background) > 100);
    }

    #[test]
    fn draws_progress_fill() {
        let image = render(&totals(3, 0), &RenderConfig::default(), None);

        assert_eq!(image.get_pixel(300, 308).0, rgba(Palette::STEAM.progress_fill));
    }

    #[test]
    fn skips_progress_bar_without_games() {
        let image = render(&totals(0, 0), &RenderConfig::default(), None);

        assert_eq!(image.get_pixel(300, 308).0, rgba(Palette::STEAM.background));
    }

    #[test]
    fn restricted_library_has_no_progress_bar() {
        let image = render(&LibraryOutcome::Restricted, &RenderConfig::default(), None);

        assert_eq!(image.get_pixel(300, 308).0, rgba(Palette::STEAM.background));
    }

    #[test]
    fn border_can_be_hidden() {
        let config = RenderConfig {
            border_width: 4.0,
            ..RenderConfig::default()
        };
        let image = render(&LibraryOutcome::Restricted, &config, None);

        assert_eq!(image.get_pixel(0, 200).0, rgba(Palette::STEAM.border));

        let hidden = RenderConfig {
            hide_border: true,
            ..config
        };
        let image = render(&LibraryOutcome::Restricted, &hidden, None);

        assert_eq!(image.get_pixel(0, 200).0, rgba(Palette::STEAM.background));
    }

    #[test]
    fn draws_clipped_avatar() {
        let mut png = Cursor::new(Vec::new());

        RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255]))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();

        let avatar = CachedImage::decode(Bytes::from(png.into_inner())).unwrap();
        let image = render(&LibraryOutcome::Restricted, &RenderConfig::default(), Some(&avatar));

        // Center of the avatar frame is drawn, its corner is clipped away.
        assert_eq!(image.get_pixel(90, 90).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(28, 28).0, rgba(Palette::STEAM.background));
    }
}
