//! Frame-scoped scratch memory for one paint session
//!
//! Three capacity-bounded slotmap pools (sprites, attached decorations,
//! text labels) plus the quadrant bucket table. The arena is reset at the
//! start of each frame's generation phase and never grows; allocation
//! failure is a normal, checked condition that callers degrade on, not a
//! fault.

use slotmap::SlotMap;

use crate::config::PaintConfig;
use crate::paint::primitive::{
    AttachedKey, AttachedPrimitive, SpriteKey, SpritePrimitive, TextKey, TextPrimitive,
};

/// Number of spatial buckets in the quadrant table
pub const MAX_PAINT_QUADRANTS: usize = 512;

/// Fixed-capacity pools and bucket table backing one render pass
#[derive(Debug)]
pub struct PaintArena {
    pub(crate) sprites: SlotMap<SpriteKey, SpritePrimitive>,
    pub(crate) attached: SlotMap<AttachedKey, AttachedPrimitive>,
    pub(crate) text: SlotMap<TextKey, TextPrimitive>,
    sprite_capacity: usize,
    attached_capacity: usize,
    text_capacity: usize,
    /// Bucket heads; each list is LIFO (last inserted drawn first within a
    /// bucket until arrangement resolves the order)
    pub(crate) quadrants: Vec<Option<SpriteKey>>,
    /// Occupied bucket index range, `None` while no primitive exists
    pub(crate) quadrant_range: Option<(usize, usize)>,
    /// Head of the merged draw chain, valid after arrangement
    pub(crate) paint_head: Option<SpriteKey>,
    /// Text label chain, insertion order
    pub(crate) text_head: Option<TextKey>,
    pub(crate) text_tail: Option<TextKey>,
}

impl PaintArena {
    /// Create an arena with the capacities from `config`
    #[must_use]
    pub fn new(config: &PaintConfig) -> Self {
        Self {
            sprites: SlotMap::with_capacity_and_key(config.sprite_capacity),
            attached: SlotMap::with_capacity_and_key(config.attached_capacity),
            text: SlotMap::with_capacity_and_key(config.text_capacity),
            sprite_capacity: config.sprite_capacity,
            attached_capacity: config.attached_capacity,
            text_capacity: config.text_capacity,
            quadrants: vec![None; MAX_PAINT_QUADRANTS],
            quadrant_range: None,
            paint_head: None,
            text_head: None,
            text_tail: None,
        }
    }

    /// Reset all pools and the bucket table for a new frame.
    ///
    /// Every key handed out before the reset becomes invalid.
    pub fn reset(&mut self) {
        self.sprites.clear();
        self.attached.clear();
        self.text.clear();
        self.quadrants.fill(None);
        self.quadrant_range = None;
        self.paint_head = None;
        self.text_head = None;
        self.text_tail = None;
    }

    /// Whether the sprite pool is exhausted
    #[must_use]
    pub fn sprite_pool_full(&self) -> bool {
        self.sprites.len() >= self.sprite_capacity
    }

    /// Whether the attached-primitive pool is exhausted
    #[must_use]
    pub fn attached_pool_full(&self) -> bool {
        self.attached.len() >= self.attached_capacity
    }

    /// Whether the text pool is exhausted
    #[must_use]
    pub fn text_pool_full(&self) -> bool {
        self.text.len() >= self.text_capacity
    }

    /// Allocate a sprite primitive; `None` when the pool is exhausted
    pub fn alloc_sprite(&mut self, primitive: SpritePrimitive) -> Option<SpriteKey> {
        if self.sprite_pool_full() {
            log::trace!("sprite pool exhausted ({} entries)", self.sprite_capacity);
            return None;
        }
        Some(self.sprites.insert(primitive))
    }

    /// Allocate an attached primitive; `None` when the pool is exhausted
    pub fn alloc_attached(&mut self, primitive: AttachedPrimitive) -> Option<AttachedKey> {
        if self.attached_pool_full() {
            log::trace!("attached pool exhausted ({} entries)", self.attached_capacity);
            return None;
        }
        Some(self.attached.insert(primitive))
    }

    /// Allocate a text primitive and append it to the label chain; `None`
    /// when the pool is exhausted
    pub fn alloc_text(&mut self, primitive: TextPrimitive) -> Option<TextKey> {
        if self.text_pool_full() {
            log::trace!("text pool exhausted ({} entries)", self.text_capacity);
            return None;
        }
        let key = self.text.insert(primitive);
        match self.text_tail {
            Some(tail) => self.text[tail].next = Some(key),
            None => self.text_head = Some(key),
        }
        self.text_tail = Some(key);
        Some(key)
    }

    /// Thread a sprite into its bucket's LIFO list and widen the occupied
    /// bucket range. The bucket index must already be stored on the sprite.
    pub(crate) fn link_into_quadrant(&mut self, key: SpriteKey) {
        let index = self.sprites[key].quadrant_index as usize;
        debug_assert!(index < MAX_PAINT_QUADRANTS);
        self.sprites[key].next_quadrant = self.quadrants[index];
        self.quadrants[index] = Some(key);
        self.quadrant_range = Some(match self.quadrant_range {
            Some((back, front)) => (back.min(index), front.max(index)),
            None => (index, index),
        });
    }

    /// Number of live sprite primitives
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Number of live attached primitives
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Number of live text primitives
    #[must_use]
    pub fn text_count(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{ScreenXY, WorldXY};
    use crate::paint::primitive::{InteractionKind, PaintBounds, PrimitiveFlags, QuadrantFlags};

    fn test_sprite() -> SpritePrimitive {
        SpritePrimitive {
            image_id: 1,
            colour_image_id: 0,
            screen_pos: ScreenXY::new(0, 0),
            bounds: PaintBounds::default(),
            flags: PrimitiveFlags::empty(),
            kind: InteractionKind::Terrain,
            tertiary_colour: 0,
            quadrant_index: 0,
            child: None,
            attached_head: None,
            map_position: WorldXY::new(0, 0),
            source: None,
            next_quadrant: None,
            quadrant_flags: QuadrantFlags::empty(),
        }
    }

    fn small_config() -> PaintConfig {
        PaintConfig {
            sprite_capacity: 3,
            attached_capacity: 2,
            text_capacity: 1,
        }
    }

    #[test]
    fn test_sprite_pool_capacity_bound() {
        let mut arena = PaintArena::new(&small_config());
        for _ in 0..3 {
            assert!(arena.alloc_sprite(test_sprite()).is_some());
        }
        // The pool is exactly full now; the next attempt must fail without
        // changing any state.
        assert!(arena.sprite_pool_full());
        assert!(arena.alloc_sprite(test_sprite()).is_none());
        assert_eq!(arena.sprite_count(), 3);
    }

    #[test]
    fn test_reset_empties_all_pools() {
        let mut arena = PaintArena::new(&small_config());
        let key = arena.alloc_sprite(test_sprite()).unwrap();
        arena.sprites[key].quadrant_index = 5;
        arena.link_into_quadrant(key);
        arena
            .alloc_text(TextPrimitive {
                message: 0,
                args: [0; 4],
                screen_pos: ScreenXY::new(0, 0),
                y_offsets: Vec::new(),
                next: None,
            })
            .unwrap();

        arena.reset();
        assert_eq!(arena.sprite_count(), 0);
        assert_eq!(arena.text_count(), 0);
        assert!(arena.quadrant_range.is_none());
        assert!(arena.quadrants.iter().all(Option::is_none));
        assert!(arena.text_head.is_none());
    }

    #[test]
    fn test_quadrant_lists_are_lifo() {
        let mut arena = PaintArena::new(&small_config());
        let a = arena.alloc_sprite(test_sprite()).unwrap();
        let b = arena.alloc_sprite(test_sprite()).unwrap();
        arena.sprites[a].quadrant_index = 7;
        arena.sprites[b].quadrant_index = 7;
        arena.link_into_quadrant(a);
        arena.link_into_quadrant(b);

        // Last inserted is found first.
        assert_eq!(arena.quadrants[7], Some(b));
        assert_eq!(arena.sprites[b].next_quadrant, Some(a));
        assert_eq!(arena.quadrant_range, Some((7, 7)));
    }

    #[test]
    fn test_text_chain_keeps_insertion_order() {
        let mut arena = PaintArena::new(&PaintConfig::default());
        let make = |message| TextPrimitive {
            message,
            args: [0; 4],
            screen_pos: ScreenXY::new(0, 0),
            y_offsets: Vec::new(),
            next: None,
        };
        let first = arena.alloc_text(make(1)).unwrap();
        let second = arena.alloc_text(make(2)).unwrap();
        assert_eq!(arena.text_head, Some(first));
        assert_eq!(arena.text[first].next, Some(second));
        assert_eq!(arena.text_tail, Some(second));
    }
}
