//! Paint primitive types
//!
//! One frame of output is built from three primitive kinds: depth-sorted
//! sprite primitives, attached decorations drawn at fixed offsets from their
//! parent, and screen-space text labels drawn after all geometry. All of
//! them live in the session arena and link to each other through slotmap
//! keys rather than references.

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::foundation::math::{ScreenXY, WorldXY};

new_key_type! {
    /// Arena key for a [`SpritePrimitive`]
    pub struct SpriteKey;

    /// Arena key for an [`AttachedPrimitive`]
    pub struct AttachedKey;

    /// Arena key for a [`TextPrimitive`]
    pub struct TextKey;
}

/// Packed image reference: atlas index in the low bits, palette remap and
/// translucency modifiers in the high bits.
pub type ImageId = u32;

/// Identifier of a text message template
pub type MessageId = u16;

/// Mask extracting the atlas index from an [`ImageId`]
pub const IMAGE_INDEX_MASK: ImageId = 0x7FFFF;

/// Image modifier bit marking the sprite as translucent
pub const IMAGE_FLAG_TRANSPARENT: ImageId = 1 << 30;

const TRANSPARENT_PRIMARY_COLOUR: ImageId = 17; // bright yellow
const TRANSPARENT_SECONDARY_COLOUR: ImageId = 1; // grey

/// Modifier bits applied to a sprite rendered in see-through mode
pub const SEE_THROUGH_IMAGE_FLAGS: ImageId =
    IMAGE_FLAG_TRANSPARENT | (TRANSPARENT_PRIMARY_COLOUR << 19) | (TRANSPARENT_SECONDARY_COLOUR << 24);

/// Opaque handle to the world content that emitted a primitive.
///
/// Carried through untouched for downstream hit-testing; the paint core
/// never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub u64);

bitflags! {
    /// Per-primitive draw flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrimitiveFlags: u8 {
        /// Blit through the mask of the primitive's colour image
        const MASKED = 1 << 0;
    }
}

bitflags! {
    /// Transient sort state used by the depth-order arranger.
    ///
    /// Only meaningful inside one arrangement window; values are rewritten
    /// each time a window is processed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct QuadrantFlags: u8 {
        /// Entry belongs to the window's own quadrant or the one after it
        /// and has not been resolved yet
        const IDENTICAL = 1 << 0;
        /// Entry belongs to a quadrant beyond the window; scanning stops here
        const BIGGER = 1 << 1;
        /// Entry is a reorder candidate for the window
        const NEXT = 1 << 2;
    }
}

bitflags! {
    /// Viewport view flags: see-through toggles and debug toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewFlags: u32 {
        /// Render ride sprites translucent
        const SEETHROUGH_RIDES = 1 << 0;
        /// Render scenery, large scenery and walls translucent
        const SEETHROUGH_SCENERY = 1 << 1;
        /// Render footpaths, path items and banners translucent
        const SEETHROUGH_PATHS = 1 << 2;
        /// Viewport is underground; render walls translucent
        const UNDERGROUND_INSIDE = 1 << 3;
        /// Draw wireframe bounding boxes around primitives at full zoom
        const BOUNDING_BOXES = 1 << 4;
    }
}

/// Classification of the world content a primitive represents.
///
/// Drives the see-through colour filter, the debug wireframe palette and
/// downstream hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionKind {
    /// No classification
    #[default]
    None,
    /// Terrain surface
    Terrain,
    /// Free-standing entity (guest, staff, vehicle)
    Entity,
    /// Ride track or building
    Ride,
    /// Water surface
    Water,
    /// Small scenery item
    Scenery,
    /// Footpath surface
    Footpath,
    /// Item placed on a footpath
    FootpathItem,
    /// Park entrance
    ParkEntrance,
    /// Wall or fence
    Wall,
    /// Multi-tile scenery
    LargeScenery,
    /// Map label
    Label,
    /// Banner sign
    Banner,
}

impl InteractionKind {
    /// Palette colour used for this classification's debug wireframe
    #[must_use]
    pub fn debug_colour(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Terrain => 102,
            Self::Entity => 114,
            Self::Ride => 229,
            Self::Water => 126,
            Self::Scenery => 138,
            Self::Footpath => 150,
            Self::FootpathItem => 162,
            Self::ParkEntrance => 174,
            Self::Wall => 186,
            Self::LargeScenery => 198,
            Self::Label => 210,
            Self::Banner => 222,
        }
    }
}

/// Rotated 3D bounding box of a sprite primitive, in world units.
///
/// `x..x_end` etc. span the box after camera rotation; never mutated once
/// the primitive is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintBounds {
    /// Minimum x
    pub x: i32,
    /// Minimum y
    pub y: i32,
    /// Minimum z
    pub z: i32,
    /// Maximum x
    pub x_end: i32,
    /// Maximum y
    pub y_end: i32,
    /// Maximum z
    pub z_end: i32,
}

/// One depth-sorted drawable sprite ("paint entry")
#[derive(Debug, Clone)]
pub struct SpritePrimitive {
    /// Image to blit
    pub image_id: ImageId,
    /// Colour image used when [`PrimitiveFlags::MASKED`] is set
    pub colour_image_id: ImageId,
    /// Screen position at full zoom
    pub screen_pos: ScreenXY,
    /// Rotated 3D bounding box
    pub bounds: PaintBounds,
    /// Draw flags
    pub flags: PrimitiveFlags,
    /// World-content classification
    pub kind: InteractionKind,
    /// Tertiary palette colour forwarded to the blitter
    pub tertiary_colour: u8,
    /// Spatial bucket this primitive was hashed into
    pub quadrant_index: u16,
    /// Child primitive drawn by single-descent recursion, not depth-sorted
    pub child: Option<SpriteKey>,
    /// Head of the attached decoration chain
    pub attached_head: Option<AttachedKey>,
    /// Map column that emitted this primitive (opaque to the core)
    pub map_position: WorldXY,
    /// World-content handle for hit-testing (opaque to the core)
    pub source: Option<SourceHandle>,
    pub(crate) next_quadrant: Option<SpriteKey>,
    pub(crate) quadrant_flags: QuadrantFlags,
}

/// Decoration drawn at a fixed screen offset from its owning sprite.
///
/// Attached primitives are never depth-sorted on their own; they inherit
/// their parent's position in the draw order.
#[derive(Debug, Clone)]
pub struct AttachedPrimitive {
    /// Image to blit
    pub image_id: ImageId,
    /// Colour image used when [`PrimitiveFlags::MASKED`] is set
    pub colour_image_id: ImageId,
    /// Offset from the parent's screen position
    pub offset: ScreenXY,
    /// Draw flags
    pub flags: PrimitiveFlags,
    pub(crate) next: Option<AttachedKey>,
}

/// Screen-space text label (e.g. floating currency text).
///
/// Drawn after all geometry in insertion order, never depth-sorted.
#[derive(Debug, Clone)]
pub struct TextPrimitive {
    /// Message template to format
    pub message: MessageId,
    /// Numeric template arguments
    pub args: [i32; 4],
    /// Projected screen position
    pub screen_pos: ScreenXY,
    /// Per-glyph vertical offset table
    pub y_offsets: Vec<i8>,
    pub(crate) next: Option<TextKey>,
}
