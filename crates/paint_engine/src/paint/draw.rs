//! Draw dispatch
//!
//! Walks the arranged chain and turns every primitive into backend blit
//! calls. Each root primitive either descends into its child chain or walks
//! its attached decorations; attached primitives inherit the parent's
//! classification and tertiary colour. The see-through view modes rewrite
//! image modifier bits here, at the last moment, so the sorted geometry is
//! unaffected by them.

use crate::backend::DrawBackend;
use crate::foundation::math::{floor_align, project_to_screen, ScreenXY, WorldXYZ};
use crate::paint::primitive::{
    ImageId, InteractionKind, PrimitiveFlags, SpriteKey, SpritePrimitive, ViewFlags,
    IMAGE_INDEX_MASK, SEE_THROUGH_IMAGE_FLAGS,
};
use crate::paint::session::PaintSession;

/// Snap a screen position to the pixel grid of the given zoom level.
///
/// At zoom `n` the backend renders at `1 / 2^n` scale, so positions are
/// aligned down to multiples of `2^n` to keep sprites on whole device
/// pixels.
fn snap_to_zoom(pos: ScreenXY, zoom_level: u8) -> ScreenXY {
    if zoom_level == 0 {
        return pos;
    }
    let step = 1 << zoom_level;
    ScreenXY::new(floor_align(pos.x, step), floor_align(pos.y, step))
}

/// Apply the active see-through view modes to an image reference.
///
/// A see-through primitive keeps its atlas index but swaps all modifier
/// bits for the fixed translucent remap.
fn colourify_image(image_id: ImageId, kind: InteractionKind, view_flags: ViewFlags) -> ImageId {
    let see_through = match kind {
        InteractionKind::Ride => view_flags.contains(ViewFlags::SEETHROUGH_RIDES),
        InteractionKind::Scenery | InteractionKind::LargeScenery => {
            view_flags.contains(ViewFlags::SEETHROUGH_SCENERY)
        }
        InteractionKind::Wall => {
            view_flags.intersects(ViewFlags::SEETHROUGH_SCENERY | ViewFlags::UNDERGROUND_INSIDE)
        }
        InteractionKind::Footpath | InteractionKind::FootpathItem | InteractionKind::Banner => {
            view_flags.contains(ViewFlags::SEETHROUGH_PATHS)
        }
        _ => false,
    };

    if see_through {
        (image_id & IMAGE_INDEX_MASK) | SEE_THROUGH_IMAGE_FLAGS
    } else {
        image_id
    }
}

/// Dispatch every root primitive of the arranged chain, in order.
pub(crate) fn draw_chain(session: &PaintSession<'_>, backend: &mut dyn DrawBackend) {
    let mut cursor = session.arena.paint_head;
    while let Some(key) = cursor {
        draw_primitive(session, backend, key);
        cursor = session.arena.sprites[key].next_quadrant;
    }
}

fn draw_primitive(session: &PaintSession<'_>, backend: &mut dyn DrawBackend, key: SpriteKey) {
    let ctx = session.context();
    let ps = &session.arena.sprites[key];

    let pos = snap_to_zoom(ps.screen_pos, ctx.clip.zoom_level);
    let image = colourify_image(ps.image_id, ps.kind, ctx.view_flags);

    if ctx.view_flags.contains(ViewFlags::BOUNDING_BOXES) && ctx.clip.zoom_level == 0 {
        blit_with_bounding_box(session, backend, ps, image, pos);
    } else {
        blit(backend, &ctx.clip, ps, image, pos);
    }

    if let Some(child) = ps.child {
        draw_primitive(session, backend, child);
    } else {
        draw_attached(session, backend, ps);
    }
}

fn blit(
    backend: &mut dyn DrawBackend,
    clip: &crate::backend::ClipRegion,
    ps: &SpritePrimitive,
    image: ImageId,
    pos: ScreenXY,
) {
    if ps.flags.contains(PrimitiveFlags::MASKED) {
        backend.draw_sprite_masked(clip, image, pos, ps.colour_image_id);
    } else {
        backend.draw_sprite(clip, image, pos, ps.tertiary_colour);
    }
}

/// Blit the sprite interleaved with its wireframe bounding box.
///
/// Edges behind the sprite are drawn before it and the front edges after,
/// so the wireframe reads as a 3D cage around the image.
fn blit_with_bounding_box(
    session: &PaintSession<'_>,
    backend: &mut dyn DrawBackend,
    ps: &SpritePrimitive,
    image: ImageId,
    pos: ScreenXY,
) {
    let ctx = session.context();
    let clip = &ctx.clip;
    let colour = ps.kind.debug_colour();
    let b = &ps.bounds;

    let corner = |x: i32, y: i32, z: i32| project_to_screen(ctx.rotation, WorldXYZ::new(x, y, z));
    let front_top = corner(b.x_end, b.y_end, b.z_end);
    let front_bottom = corner(b.x_end, b.y_end, b.z);
    let left_top = corner(b.x, b.y_end, b.z_end);
    let left_bottom = corner(b.x, b.y_end, b.z);
    let right_top = corner(b.x_end, b.y, b.z_end);
    let right_bottom = corner(b.x_end, b.y, b.z);
    let back_top = corner(b.x, b.y, b.z_end);
    let back_bottom = corner(b.x, b.y, b.z);

    // Bottom square.
    backend.draw_line(clip, front_bottom, left_bottom, colour);
    backend.draw_line(clip, back_bottom, left_bottom, colour);
    backend.draw_line(clip, back_bottom, right_bottom, colour);
    backend.draw_line(clip, front_bottom, right_bottom, colour);

    // Vertical back and side edges.
    backend.draw_line(clip, back_top, back_bottom, colour);
    backend.draw_line(clip, left_top, left_bottom, colour);
    backend.draw_line(clip, right_top, right_bottom, colour);

    // Rear half of the top square.
    backend.draw_line(clip, back_top, left_top, colour);
    backend.draw_line(clip, back_top, right_top, colour);

    blit(backend, clip, ps, image, pos);

    // Front vertical edge and the front half of the top square.
    backend.draw_line(clip, front_top, front_bottom, colour);
    backend.draw_line(clip, front_top, left_top, colour);
    backend.draw_line(clip, front_top, right_top, colour);
}

/// Attached decorations are positioned off the raw parent coordinates;
/// only the parent itself snaps to the zoom grid.
fn draw_attached(session: &PaintSession<'_>, backend: &mut dyn DrawBackend, ps: &SpritePrimitive) {
    let ctx = session.context();
    let mut cursor = ps.attached_head;
    while let Some(key) = cursor {
        let attached = &session.arena.attached[key];
        let pos = ps.screen_pos + attached.offset;
        let image = colourify_image(attached.image_id, ps.kind, ctx.view_flags);

        if attached.flags.contains(PrimitiveFlags::MASKED) {
            backend.draw_sprite_masked(&ctx.clip, image, pos, attached.colour_image_id);
        } else {
            backend.draw_sprite(&ctx.clip, image, pos, ps.tertiary_colour);
        }

        cursor = attached.next;
    }
}
