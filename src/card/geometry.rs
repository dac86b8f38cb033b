//! Shapes and placement on the card. Nothing in here draws.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A rectangle with rounded corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRect {
    pub rect: Rect,
    /// Never more than half the shorter side.
    pub radius: f32,
}

impl RoundRect {
    pub fn new(rect: Rect, radius: f32) -> Self {
        let max_radius = (rect.width.min(rect.height) / 2.0).max(0.0);

        Self {
            rect,
            radius: radius.clamp(0.0, max_radius),
        }
    }

    /// SVG path data tracing the outline clockwise from the end of the top-left corner.
    pub fn path_data(&self) -> String {
        let Rect { x, y, width, height } = self.rect;
        let r = self.radius;
        let mut path = String::with_capacity(160);

        // Writing to a String can't fail.
        let _ = write!(path, "M{} {}", x + r, y);
        let _ = write!(path, "H{}", x + width - r);
        let _ = write!(path, "A{r} {r} 0 0 1 {} {}", x + width, y + r);
        let _ = write!(path, "V{}", y + height - r);
        let _ = write!(path, "A{r} {r} 0 0 1 {} {}", x + width - r, y + height);
        let _ = write!(path, "H{}", x + r);
        let _ = write!(path, "A{r} {r} 0 0 1 {} {}", x, y + height - r);
        let _ = write!(path, "V{}", y + r);
        let _ = write!(path, "A{r} {r} 0 0 1 {} {}Z", x + r, y);

        path
    }
}

/// Filled width of a progress bar, `floor(bar_width * played / total)`. `None` when there is
/// nothing to show progress of.
pub fn progress_fill_width(bar_width: u32, played: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }

    let filled = u64::from(bar_width) * played.min(total) as u64 / total as u64;

    Some(filled as u32)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    pub track: RoundRect,
    /// `None` when nothing has been played.
    pub fill: Option<RoundRect>,
}

/// Lays out a fully rounded progress bar in `area`. `None` when `total` is 0.
pub fn progress_bar(area: Rect, played: usize, total: usize) -> Option<ProgressBar> {
    let filled = progress_fill_width(area.width as u32, played, total)?;
    let radius = area.height / 2.0;
    let fill = (filled > 0).then(|| RoundRect::new(
        Rect::new(area.x, area.y, filled as f32, area.height),
        radius,
    ));

    Some(ProgressBar {
        track: RoundRect::new(area, radius),
        fill,
    })
}

/// Scales `width`×`height` to the largest size fitting in `max_width`×`max_height` with the same
/// aspect ratio.
pub fn fit_within(width: u32, height: u32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (0.0, 0.0);
    }

    let (width, height) = (width as f32, height as f32);

    if width * max_height >= height * max_width {
        (max_width, height * max_width / width)
    } else {
        (width * max_height / height, max_height)
    }
}

/// Where the avatar is drawn and how it is clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarPlacement {
    pub image: Rect,
    pub clip: RoundRect,
}

/// Fits an image into `frame`, centered, clipped with a corner radius of half its scaled width.
pub fn avatar_placement(frame: Rect, width: u32, height: u32) -> AvatarPlacement {
    let (scaled_width, scaled_height) = fit_within(width, height, frame.width, frame.height);
    let image = Rect::new(
        frame.x + (frame.width - scaled_width) / 2.0,
        frame.y + (frame.height - scaled_height) / 2.0,
        scaled_width,
        scaled_height,
    );

    AvatarPlacement {
        image,
        clip: RoundRect::new(image, scaled_width / 2.0),
    }
}
