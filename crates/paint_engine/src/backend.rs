//! Collaborator traits for the paint core
//!
//! The core never touches pixels or image assets itself. Everything it needs
//! from the surrounding renderer comes through the two traits here: image
//! metadata lookup during generation, and the raw blit primitives during the
//! draw phase. Implementations live outside this crate (software rasteriser,
//! GPU sprite batcher, test mocks).

use crate::foundation::math::ScreenXY;
use crate::paint::primitive::{ImageId, MessageId};

/// Screen-space region currently being rendered, plus its zoom level.
///
/// Primitives whose footprint lies entirely outside the region are discarded
/// during generation. Zoom level 0 is full scale; level `n` renders at
/// `1 / 2^n` scale and draw positions snap to the matching pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRegion {
    /// Left edge in screen pixels
    pub x: i32,
    /// Top edge in screen pixels
    pub y: i32,
    /// Width in screen pixels
    pub width: i32,
    /// Height in screen pixels
    pub height: i32,
    /// Zoom level (0 = full scale)
    pub zoom_level: u8,
}

impl ClipRegion {
    /// Create a clip region at full zoom
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            zoom_level: 0,
        }
    }

    /// Create a clip region at a reduced zoom level
    #[must_use]
    pub fn with_zoom(x: i32, y: i32, width: i32, height: i32, zoom_level: u8) -> Self {
        Self {
            x,
            y,
            width,
            height,
            zoom_level,
        }
    }

    /// Right edge (exclusive) in screen pixels
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive) in screen pixels
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Screen-space footprint metadata for one image in the sprite atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteExtent {
    /// Horizontal draw offset relative to the primitive position
    pub x_offset: i32,
    /// Vertical draw offset relative to the primitive position
    pub y_offset: i32,
    /// Width of the image in pixels
    pub width: i32,
    /// Height of the image in pixels
    pub height: i32,
}

/// Read-only sprite metadata lookup.
///
/// Implementations must be safe for concurrent reads: multiple paint
/// sessions (one per viewport tile) may query the table from separate
/// threads while generating.
pub trait ImageTable: Sync {
    /// Footprint of the image with the given atlas index, or `None` if the
    /// index has no backing image description.
    fn sprite_extent(&self, image_index: u32) -> Option<SpriteExtent>;
}

/// Raw drawing primitives consumed by the draw dispatcher.
///
/// All positions are absolute screen coordinates; clipping against the
/// region is the implementation's responsibility.
pub trait DrawBackend {
    /// Blit a sprite at the given position
    fn draw_sprite(&mut self, clip: &ClipRegion, image: ImageId, pos: ScreenXY, tertiary_colour: u8);

    /// Blit a sprite through the mask of a second colour image
    fn draw_sprite_masked(
        &mut self,
        clip: &ClipRegion,
        image: ImageId,
        pos: ScreenXY,
        colour_image: ImageId,
    );

    /// Draw a one-pixel line between two screen points in a palette colour
    fn draw_line(&mut self, clip: &ClipRegion, start: ScreenXY, end: ScreenXY, colour: u8);

    /// Format a message template with its numeric arguments
    fn format_message(&self, message: MessageId, args: &[i32; 4]) -> String;

    /// Draw already-formatted text with a per-glyph vertical offset table
    fn draw_text_with_y_offsets(
        &mut self,
        clip: &ClipRegion,
        text: &str,
        pos: ScreenXY,
        y_offsets: &[i8],
        force_sprite_font: bool,
    );

    /// Whether the active locale renders text with a TrueType font
    fn uses_true_type_font(&self) -> bool {
        false
    }

    /// Whether the fallback bitmap font can represent the locale's currency
    /// glyphs
    fn sprite_font_supports_currency(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_region_edges() {
        let clip = ClipRegion::new(10, 20, 100, 50);
        assert_eq!(clip.right(), 110);
        assert_eq!(clip.bottom(), 70);
        assert_eq!(clip.zoom_level, 0);
    }

    #[test]
    fn test_clip_region_with_zoom() {
        let clip = ClipRegion::with_zoom(0, 0, 64, 48, 2);
        assert_eq!(clip.zoom_level, 2);
    }
}
