//! Projection and bounding-box construction
//!
//! Turns a caller-supplied 3D offset plus bounding box into a fully formed
//! sprite primitive: rotated screen position, rotated 3D bounds, viewport
//! culling. Also home of the quadrant bucketer's position hash. Everything
//! here is a pure function of its inputs and the session's read-only render
//! context; capacity is the caller's precondition, not checked here.

use crate::backend::{ClipRegion, ImageTable, SpriteExtent};
use crate::foundation::math::{
    project_to_screen, rotate_xy, rotate_xyz, Rotation, ScreenXY, WorldXY, WorldXYZ, TILE_SIZE,
};
use crate::paint::arena::MAX_PAINT_QUADRANTS;
use crate::paint::primitive::{
    ImageId, InteractionKind, PaintBounds, PrimitiveFlags, QuadrantFlags, SourceHandle,
    SpritePrimitive, IMAGE_INDEX_MASK,
};
use crate::paint::session::RenderContext;

/// Whether the image's screen footprint intersects the clip region.
///
/// All four half-plane tests must pass; touching by a single pixel counts
/// as intersecting.
fn image_within_clip(pos: ScreenXY, extent: &SpriteExtent, clip: &ClipRegion) -> bool {
    let left = pos.x + extent.x_offset;
    let top = pos.y + extent.y_offset;
    let right = left + extent.width;
    let bottom = top + extent.height;

    right > clip.x && bottom > clip.y && left < clip.right() && top < clip.bottom()
}

/// Rotate a bounding-box size into rotation-0 space.
///
/// Two of the three axes shrink by one unit depending on rotation; this
/// compensates for half-open versus closed interval semantics after the
/// 90-degree rotation.
fn rotate_bound_box_size(size: WorldXYZ, rotation: Rotation) -> WorldXYZ {
    let mut size = size;
    match rotation {
        Rotation::R0 => {
            size.x -= 1;
            size.y -= 1;
            rotate_xyz(size, Rotation::R0)
        }
        Rotation::R1 => {
            size.x -= 1;
            rotate_xyz(size, Rotation::R3)
        }
        Rotation::R2 => rotate_xyz(size, Rotation::R2),
        Rotation::R3 => {
            size.y -= 1;
            rotate_xyz(size, Rotation::R1)
        }
    }
}

/// Inputs describing the world content a primitive is built for, captured
/// from the session's collaborator state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrimitiveOrigin {
    pub anchor: WorldXY,
    pub map_position: WorldXY,
    pub kind: InteractionKind,
    pub source: Option<SourceHandle>,
}

/// Build a sprite primitive candidate, or `None` when the image has no
/// metadata or its footprint cannot affect the clip region.
pub(crate) fn build_sprite_primitive(
    ctx: &RenderContext,
    images: &dyn ImageTable,
    image_id: ImageId,
    offset: WorldXYZ,
    bound_box_size: WorldXYZ,
    bound_box_offset: WorldXYZ,
    origin: &PrimitiveOrigin,
) -> Option<SpritePrimitive> {
    let extent = images.sprite_extent(image_id & IMAGE_INDEX_MASK)?;

    let inverse = ctx.rotation.inverse();
    let mut world_pos = rotate_xyz(offset, inverse);
    world_pos.x += origin.anchor.x;
    world_pos.y += origin.anchor.y;

    let screen_pos = project_to_screen(ctx.rotation, world_pos);
    if !image_within_clip(screen_pos, &extent, &ctx.clip) {
        return None;
    }

    let rot_bb_offset = rotate_xyz(bound_box_offset, inverse);
    let rot_bb_size = rotate_bound_box_size(bound_box_size, ctx.rotation);

    let bounds = PaintBounds {
        x: rot_bb_offset.x + origin.anchor.x,
        y: rot_bb_offset.y + origin.anchor.y,
        z: rot_bb_offset.z,
        x_end: rot_bb_size.x + rot_bb_offset.x + origin.anchor.x,
        y_end: rot_bb_size.y + rot_bb_offset.y + origin.anchor.y,
        z_end: rot_bb_size.z + rot_bb_offset.z,
    };

    Some(SpritePrimitive {
        image_id,
        colour_image_id: 0,
        screen_pos,
        bounds,
        flags: PrimitiveFlags::empty(),
        kind: origin.kind,
        tertiary_colour: 0,
        quadrant_index: 0,
        child: None,
        attached_head: None,
        map_position: origin.map_position,
        source: origin.source,
        next_quadrant: None,
        quadrant_flags: QuadrantFlags::empty(),
    })
}

/// Spatial hash of a rotated bounding-box origin.
///
/// The rotation-dependent offset keeps the hash non-negative and monotonic
/// across rotations so adjacent-bucket comparisons stay meaningful.
pub(crate) fn position_hash(bounds_origin: WorldXY, rotation: Rotation) -> i32 {
    let mut pos = rotate_xy(bounds_origin, rotation);
    match rotation {
        Rotation::R0 => {}
        Rotation::R1 | Rotation::R3 => pos.x += 0x2000,
        Rotation::R2 => pos.x += 0x4000,
    }
    pos.x + pos.y
}

/// Bucket index for a rotated bounding-box origin; clamping guarantees a
/// valid index, so bucketing has no failure path.
pub(crate) fn quadrant_index(bounds_origin: WorldXY, rotation: Rotation) -> u16 {
    let hash = position_hash(bounds_origin, rotation);
    (hash / TILE_SIZE).clamp(0, MAX_PAINT_QUADRANTS as i32 - 1) as u16
}
