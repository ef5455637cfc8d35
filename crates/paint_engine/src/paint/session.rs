//! Paint session state and the primitive-creation operations
//!
//! A session owns the scratch arena for one viewport render and exposes the
//! operations world-content emitters call while the scan driver walks the
//! map: add a root/orphan/child sprite, attach decorations to the previous
//! primitive, emit a floating text label. Generation, arrangement and
//! drawing for one session happen strictly in that order on one thread;
//! separate sessions are independent and may run on separate threads
//! against the same read-only world state.

use crate::backend::{ClipRegion, DrawBackend, ImageTable};
use crate::foundation::math::{project_to_screen, Rotation, ScreenXY, WorldXY, WorldXYZ};
use crate::paint::arena::PaintArena;
use crate::paint::primitive::{
    AttachedPrimitive, ImageId, InteractionKind, MessageId, PrimitiveFlags, SourceHandle, SpriteKey,
    SpritePrimitive, TextPrimitive, ViewFlags,
};
use crate::paint::projection::{self, PrimitiveOrigin};
use crate::paint::scan::WorldSource;
use crate::paint::{arrange, draw, scan, text};

/// Read-only camera and viewport state for one render pass.
///
/// Threaded explicitly through every operation instead of living in
/// globals, so per-viewport sessions can run in parallel.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Camera rotation (one of four isometric orientations)
    pub rotation: Rotation,
    /// Active clip rectangle and zoom level
    pub clip: ClipRegion,
    /// See-through and debug toggles
    pub view_flags: ViewFlags,
}

/// One frame-scoped paint session.
///
/// Lifecycle: acquired for a viewport render, populated during the scan
/// phase, arranged exactly once, drawn exactly once, then released. No
/// primitive key survives past the owning session's reset.
pub struct PaintSession<'a> {
    images: &'a dyn ImageTable,
    ctx: RenderContext,
    pub(crate) arena: PaintArena,
    last_ps: Option<SpriteKey>,
    last_attached: Option<crate::paint::primitive::AttachedKey>,
    sprite_position: WorldXY,
    map_position: WorldXY,
    interaction: InteractionKind,
    source: Option<SourceHandle>,
}

impl<'a> PaintSession<'a> {
    /// Create a session over an arena and render context
    #[must_use]
    pub fn new(images: &'a dyn ImageTable, ctx: RenderContext, arena: PaintArena) -> Self {
        Self {
            images,
            ctx,
            arena,
            last_ps: None,
            last_attached: None,
            sprite_position: WorldXY::new(0, 0),
            map_position: WorldXY::new(0, 0),
            interaction: InteractionKind::None,
            source: None,
        }
    }

    /// Take the arena back out of the session (for pooling)
    #[must_use]
    pub(crate) fn into_arena(self) -> PaintArena {
        self.arena
    }

    /// The session's render context
    #[must_use]
    pub fn context(&self) -> RenderContext {
        self.ctx
    }

    /// Set the world anchor position subsequent primitives are relative to
    pub fn set_sprite_position(&mut self, anchor: WorldXY) {
        self.sprite_position = anchor;
    }

    /// Set the map column recorded on subsequent primitives
    pub fn set_map_position(&mut self, map_position: WorldXY) {
        self.map_position = map_position;
    }

    /// Set the classification recorded on subsequent primitives
    pub fn set_interaction_kind(&mut self, kind: InteractionKind) {
        self.interaction = kind;
    }

    /// Set the world-content handle recorded on subsequent primitives
    pub fn set_source(&mut self, source: Option<SourceHandle>) {
        self.source = source;
    }

    fn primitive_origin(&self) -> PrimitiveOrigin {
        PrimitiveOrigin {
            anchor: self.sprite_position,
            map_position: self.map_position,
            kind: self.interaction,
            source: self.source,
        }
    }

    fn alloc_root(&mut self, primitive: SpritePrimitive) -> Option<SpriteKey> {
        let key = self.arena.alloc_sprite(primitive)?;
        self.last_ps = Some(key);
        Some(key)
    }

    /// Create a root sprite primitive and bucket it for depth sorting.
    ///
    /// Fails with `None` on arena exhaustion, missing image metadata, or
    /// full clip rejection; all three mean "nothing further to draw with
    /// this handle" and are recovered by omission.
    pub fn add_image_as_parent(
        &mut self,
        image_id: ImageId,
        offset: WorldXYZ,
        bound_box_size: WorldXYZ,
    ) -> Option<SpriteKey> {
        self.add_image_as_parent_with_offset(image_id, offset, bound_box_size, WorldXYZ::zeros())
    }

    /// [`Self::add_image_as_parent`] with an explicit bounding-box offset
    pub fn add_image_as_parent_with_offset(
        &mut self,
        image_id: ImageId,
        offset: WorldXYZ,
        bound_box_size: WorldXYZ,
        bound_box_offset: WorldXYZ,
    ) -> Option<SpriteKey> {
        self.last_ps = None;
        self.last_attached = None;

        if self.arena.sprite_pool_full() {
            return None;
        }
        let primitive = projection::build_sprite_primitive(
            &self.ctx,
            self.images,
            image_id,
            offset,
            bound_box_size,
            bound_box_offset,
            &self.primitive_origin(),
        )?;
        let key = self.alloc_root(primitive)?;
        self.insert_into_quadrant(key);
        Some(key)
    }

    /// Create a sprite primitive without bucketing it.
    ///
    /// The caller takes over linking: either insert it into a quadrant via
    /// [`Self::insert_into_quadrant`] or wire it as another primitive's
    /// child. Discarding the result leaks the pool slot for the frame.
    #[must_use]
    pub fn add_image_as_orphan(
        &mut self,
        image_id: ImageId,
        offset: WorldXYZ,
        bound_box_size: WorldXYZ,
        bound_box_offset: WorldXYZ,
    ) -> Option<SpriteKey> {
        self.last_ps = None;
        self.last_attached = None;

        if self.arena.sprite_pool_full() {
            return None;
        }
        let primitive = projection::build_sprite_primitive(
            &self.ctx,
            self.images,
            image_id,
            offset,
            bound_box_size,
            bound_box_offset,
            &self.primitive_origin(),
        )?;
        self.alloc_root(primitive)
    }

    /// Create a sprite primitive as the descent child of the most recently
    /// created primitive, or as a new root when none exists yet.
    pub fn add_image_as_child(
        &mut self,
        image_id: ImageId,
        offset: WorldXYZ,
        bound_box_size: WorldXYZ,
        bound_box_offset: WorldXYZ,
    ) -> Option<SpriteKey> {
        let Some(parent) = self.last_ps else {
            return self.add_image_as_parent_with_offset(
                image_id,
                offset,
                bound_box_size,
                bound_box_offset,
            );
        };

        if self.arena.sprite_pool_full() {
            return None;
        }
        let primitive = projection::build_sprite_primitive(
            &self.ctx,
            self.images,
            image_id,
            offset,
            bound_box_size,
            bound_box_offset,
            &self.primitive_origin(),
        )?;
        let key = self.alloc_root(primitive)?;
        self.arena.sprites[parent].child = Some(key);
        Some(key)
    }

    /// Attach a decoration to the most recently created sprite primitive.
    ///
    /// The new decoration becomes the head of the parent's attachment
    /// chain. Fails when no primitive exists in the current call sequence
    /// or the pool is exhausted.
    pub fn attach_to_previous(&mut self, image_id: ImageId, offset: ScreenXY) -> bool {
        if self.arena.attached_pool_full() {
            return false;
        }
        let Some(master) = self.last_ps else {
            return false;
        };

        let old_head = self.arena.sprites[master].attached_head;
        let Some(key) = self.arena.alloc_attached(AttachedPrimitive {
            image_id,
            colour_image_id: 0,
            offset,
            flags: PrimitiveFlags::empty(),
            next: old_head,
        }) else {
            return false;
        };
        self.arena.sprites[master].attached_head = Some(key);
        self.last_attached = Some(key);
        true
    }

    /// Append a decoration after the most recently attached one, falling
    /// back to [`Self::attach_to_previous`] when none exists yet.
    pub fn attach_to_previous_attached(&mut self, image_id: ImageId, offset: ScreenXY) -> bool {
        let Some(previous) = self.last_attached else {
            return self.attach_to_previous(image_id, offset);
        };

        if self.arena.attached_pool_full() {
            return false;
        }
        let Some(key) = self.arena.alloc_attached(AttachedPrimitive {
            image_id,
            colour_image_id: 0,
            offset,
            flags: PrimitiveFlags::empty(),
            next: None,
        }) else {
            return false;
        };
        self.arena.attached[previous].next = Some(key);
        self.last_attached = Some(key);
        true
    }

    /// Emit a floating text label (e.g. a currency amount) at the current
    /// anchor position. Returns `false` when the text pool is exhausted.
    pub fn add_floating_text(
        &mut self,
        amount: i32,
        message: MessageId,
        world_y: i32,
        world_z: i32,
        y_offsets: &[i8],
        offset_x: i32,
        rotation: Rotation,
    ) -> bool {
        if self.arena.text_pool_full() {
            return false;
        }

        let position = WorldXYZ::new(self.sprite_position.x, self.sprite_position.y, world_z);
        let coord = project_to_screen(rotation, position);

        self.arena
            .alloc_text(TextPrimitive {
                message,
                args: [amount, world_y, 0, 0],
                screen_pos: ScreenXY::new(coord.x + offset_x, coord.y),
                y_offsets: y_offsets.to_vec(),
                next: None,
            })
            .is_some()
    }

    /// Hash a primitive into its spatial bucket (LIFO head insert) and
    /// widen the occupied bucket range. The bucket index is immutable once
    /// set.
    pub fn insert_into_quadrant(&mut self, key: SpriteKey) {
        let bounds = self.arena.sprites[key].bounds;
        let index = projection::quadrant_index(WorldXY::new(bounds.x, bounds.y), self.ctx.rotation);
        self.arena.sprites[key].quadrant_index = index;
        self.arena.link_into_quadrant(key);
    }

    /// Scan every map column that can affect the clip rectangle, invoking
    /// the world emitters for each (generation phase)
    pub fn generate(&mut self, world: &dyn WorldSource) {
        scan::generate(self, world);
        log::debug!(
            "generated {} sprites, {} attached, {} text (quadrants {:?})",
            self.arena.sprite_count(),
            self.arena.attached_count(),
            self.arena.text_count(),
            self.arena.quadrant_range,
        );
    }

    /// Merge all buckets into one chain and resolve the total draw order
    /// (arrangement phase, run exactly once per session)
    pub fn arrange(&mut self) {
        arrange::arrange(&mut self.arena, self.ctx.rotation);
        log::debug!("arranged {} sprites", self.arena.sprite_count());
    }

    /// Walk the arranged chain and dispatch every primitive to the backend
    /// (draw phase)
    pub fn draw(&self, backend: &mut dyn DrawBackend) {
        draw::draw_chain(self, backend);
    }

    /// Draw the text label overlay, independently of the sprite chain
    pub fn draw_text(&self, backend: &mut dyn DrawBackend) {
        text::draw_text_chain(self, backend);
    }

    /// Look up a sprite primitive by key
    #[must_use]
    pub fn sprite(&self, key: SpriteKey) -> Option<&SpritePrimitive> {
        self.arena.sprites.get(key)
    }

    /// Mutable access to a created primitive, e.g. to set the masked flag
    /// or colours. Bounds and bucket index must not be modified after
    /// insertion.
    #[must_use]
    pub fn sprite_mut(&mut self, key: SpriteKey) -> Option<&mut SpritePrimitive> {
        self.arena.sprites.get_mut(key)
    }

    /// Sprites in final draw order; meaningful after [`Self::arrange`]
    pub fn ordered_sprites(&self) -> impl Iterator<Item = (SpriteKey, &SpritePrimitive)> + '_ {
        std::iter::successors(self.arena.paint_head, move |key| {
            self.arena.sprites[*key].next_quadrant
        })
        .map(move |key| (key, &self.arena.sprites[key]))
    }

    /// Occupied bucket index range, `None` while no primitive exists
    #[must_use]
    pub fn quadrant_range(&self) -> Option<(usize, usize)> {
        self.arena.quadrant_range
    }

    /// Number of live sprite primitives
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.arena.sprite_count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::SpriteExtent;
    use crate::config::PaintConfig;

    /// Image table where every index maps to a 10x10 image at offset (0,0)
    pub(crate) struct TestImages;

    impl ImageTable for TestImages {
        fn sprite_extent(&self, _image_index: u32) -> Option<SpriteExtent> {
            Some(SpriteExtent {
                x_offset: 0,
                y_offset: 0,
                width: 10,
                height: 10,
            })
        }
    }

    pub(crate) fn test_context(rotation: Rotation) -> RenderContext {
        RenderContext {
            rotation,
            clip: ClipRegion::new(-1000, -1000, 2000, 2000),
            view_flags: ViewFlags::empty(),
        }
    }

    pub(crate) fn test_session(images: &dyn ImageTable) -> PaintSession<'_> {
        PaintSession::new(
            images,
            test_context(Rotation::R0),
            PaintArena::new(&PaintConfig::default()),
        )
    }

    fn bb() -> WorldXYZ {
        WorldXYZ::new(10, 10, 10)
    }

    #[test]
    fn test_parent_is_bucketed_and_becomes_last() {
        let images = TestImages;
        let mut session = test_session(&images);
        let key = session
            .add_image_as_parent(1, WorldXYZ::new(0, 0, 0), bb())
            .unwrap();
        assert!(session.quadrant_range().is_some());
        // A child now chains onto this primitive.
        let child = session
            .add_image_as_child(2, WorldXYZ::new(0, 0, 0), bb(), WorldXYZ::zeros())
            .unwrap();
        assert_eq!(session.sprite(key).unwrap().child, Some(child));
    }

    #[test]
    fn test_orphan_is_not_bucketed() {
        let images = TestImages;
        let mut session = test_session(&images);
        let key = session
            .add_image_as_orphan(1, WorldXYZ::new(0, 0, 0), bb(), WorldXYZ::zeros())
            .unwrap();
        assert!(session.quadrant_range().is_none());

        session.insert_into_quadrant(key);
        assert!(session.quadrant_range().is_some());
    }

    #[test]
    fn test_child_without_parent_becomes_root() {
        let images = TestImages;
        let mut session = test_session(&images);
        let key = session
            .add_image_as_child(1, WorldXYZ::new(0, 0, 0), bb(), WorldXYZ::zeros())
            .unwrap();
        assert!(session.sprite(key).unwrap().child.is_none());
        assert!(session.quadrant_range().is_some());
    }

    #[test]
    fn test_attach_without_primitive_fails() {
        let images = TestImages;
        let mut session = test_session(&images);
        assert!(!session.attach_to_previous(1, ScreenXY::new(0, 0)));
        // attach-to-last-attached falls back to attach-to-previous, which
        // also has no antecedent, so it fails too.
        assert!(!session.attach_to_previous_attached(1, ScreenXY::new(0, 0)));
    }

    #[test]
    fn test_attach_chain_order() {
        let images = TestImages;
        let mut session = test_session(&images);
        let parent = session
            .add_image_as_parent(1, WorldXYZ::new(0, 0, 0), bb())
            .unwrap();

        // First decoration becomes the head; the fallback path is taken for
        // the second call's predecessor.
        assert!(session.attach_to_previous(10, ScreenXY::new(1, 2)));
        assert!(session.attach_to_previous_attached(11, ScreenXY::new(3, 4)));

        let head = session.sprite(parent).unwrap().attached_head.unwrap();
        let first = &session.arena.attached[head];
        assert_eq!(first.image_id, 10);
        let second = &session.arena.attached[first.next.unwrap()];
        assert_eq!(second.image_id, 11);
        assert!(second.next.is_none());
    }

    #[test]
    fn test_attach_prepends_to_existing_chain() {
        let images = TestImages;
        let mut session = test_session(&images);
        let parent = session
            .add_image_as_parent(1, WorldXYZ::new(0, 0, 0), bb())
            .unwrap();
        assert!(session.attach_to_previous(10, ScreenXY::new(0, 0)));
        assert!(session.attach_to_previous(11, ScreenXY::new(0, 0)));

        // attach_to_previous always inserts at the head.
        let head = session.sprite(parent).unwrap().attached_head.unwrap();
        assert_eq!(session.arena.attached[head].image_id, 11);
    }

    #[test]
    fn test_parent_resets_attachment_cursor() {
        let images = TestImages;
        let mut session = test_session(&images);
        session
            .add_image_as_parent(1, WorldXYZ::new(0, 0, 0), bb())
            .unwrap();
        assert!(session.attach_to_previous(10, ScreenXY::new(0, 0)));

        let second = session
            .add_image_as_parent(2, WorldXYZ::new(0, 0, 0), bb())
            .unwrap();
        // The attachment lands on the new primitive, not the first one.
        assert!(session.attach_to_previous_attached(12, ScreenXY::new(0, 0)));
        assert!(session.sprite(second).unwrap().attached_head.is_some());
    }

    #[test]
    fn test_floating_text_projection() {
        let images = TestImages;
        let mut session = test_session(&images);
        session.set_sprite_position(WorldXY::new(32, 64));
        assert!(session.add_floating_text(150, 7, 5, 16, &[0, -1, -2], 4, Rotation::R0));

        let key = session.arena.text_head.unwrap();
        let ps = &session.arena.text[key];
        assert_eq!(ps.message, 7);
        assert_eq!(ps.args, [150, 5, 0, 0]);
        // project_to_screen(R0, (32, 64, 16)) = (32, 32), plus offset_x.
        assert_eq!(ps.screen_pos, ScreenXY::new(36, 32));
        assert_eq!(ps.y_offsets, vec![0, -1, -2]);
    }

    #[test]
    fn test_sessions_can_move_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<PaintSession<'static>>();
    }

    #[test]
    fn test_quadrant_monotonicity() {
        let images = TestImages;
        let mut session = test_session(&images);
        for i in 0..20 {
            session.set_sprite_position(WorldXY::new(i * 32, i * 48));
            session
                .add_image_as_parent(1, WorldXYZ::new(0, 0, 0), bb())
                .unwrap();
        }
        let (back, front) = session.quadrant_range().unwrap();
        assert!(back <= front);
        for (_, ps) in session.arena.sprites.iter() {
            let index = ps.quadrant_index as usize;
            assert!(back <= index && index <= front);
            assert!(index < crate::paint::arena::MAX_PAINT_QUADRANTS);
        }
    }
}
