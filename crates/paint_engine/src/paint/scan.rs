//! World scan driver
//!
//! Visits every 32-unit map column whose projection could overlap the clip
//! rectangle, in a rotation-dependent diagonal staircase order, and invokes
//! the external emission collaborators for each. Columns are visited exactly
//! once per pattern; collaborators are free to emit nothing for a column.

use crate::foundation::math::{Rotation, WorldXY, TILE_SIZE};
use crate::paint::session::PaintSession;

/// World-content emitters invoked per visited map column.
///
/// Implementations hold read-only world state and must be safe for
/// concurrent reads so parallel per-viewport sessions can share them; each
/// callback may call back into the session's primitive-creation operations
/// zero or more times.
pub trait WorldSource: Sync {
    /// Emit primitives for the tile stack at `origin`
    fn paint_tile_column(&self, session: &mut PaintSession<'_>, origin: WorldXY);

    /// Emit primitives for free-standing entities at `origin`
    fn paint_entities(&self, session: &mut PaintSession<'_>, origin: WorldXY);
}

const COLUMN_MASK: i32 = !(TILE_SIZE - 1);

/// Walk the staircase of map columns covering the clip rectangle.
///
/// The four patterns are mirror/rotations of one another, one per camera
/// orientation; each step visits the current column, a diagonal neighbour
/// and the column one step along the primary axis before advancing.
pub(crate) fn generate(session: &mut PaintSession<'_>, world: &dyn WorldSource) {
    let clip = session.context().clip;
    let rotation = session.context().rotation;

    let screen = WorldXY::new(clip.x & COLUMN_MASK, (clip.y - 16) & COLUMN_MASK);
    let half_x = screen.x >> 1;
    let num_vertical_quadrants = (clip.height + 2128) >> 5;

    // Invert the isometric projection to find the starting column for this
    // rotation, then re-quantise to the column grid.
    let (start_x, start_y) = match rotation {
        Rotation::R0 => (screen.y - half_x, screen.y + half_x),
        Rotation::R1 => (-screen.y - half_x, screen.y - half_x - 16),
        Rotation::R2 => (-screen.y + half_x, -screen.y - half_x),
        Rotation::R3 => (screen.y + half_x, -screen.y + half_x - 16),
    };
    let mut column = WorldXY::new(start_x & COLUMN_MASK, start_y & COLUMN_MASK);

    for _ in 0..num_vertical_quadrants {
        match rotation {
            Rotation::R0 => {
                world.paint_tile_column(session, column);
                world.paint_entities(session, column);

                world.paint_entities(session, WorldXY::new(column.x - 32, column.y + 32));

                world.paint_tile_column(session, WorldXY::new(column.x, column.y + 32));
                world.paint_entities(session, WorldXY::new(column.x, column.y + 32));

                column.x += 32;
                world.paint_entities(session, column);

                column.y += 32;
            }
            Rotation::R1 => {
                world.paint_tile_column(session, column);
                world.paint_entities(session, column);

                world.paint_entities(session, WorldXY::new(column.x - 32, column.y - 32));

                world.paint_tile_column(session, WorldXY::new(column.x - 32, column.y));
                world.paint_entities(session, WorldXY::new(column.x - 32, column.y));

                column.y += 32;
                world.paint_entities(session, column);

                column.x -= 32;
            }
            Rotation::R2 => {
                world.paint_tile_column(session, column);
                world.paint_entities(session, column);

                world.paint_entities(session, WorldXY::new(column.x + 32, column.y - 32));

                world.paint_tile_column(session, WorldXY::new(column.x, column.y - 32));
                world.paint_entities(session, WorldXY::new(column.x, column.y - 32));

                column.x -= 32;
                world.paint_entities(session, column);

                column.y -= 32;
            }
            Rotation::R3 => {
                world.paint_tile_column(session, column);
                world.paint_entities(session, column);

                world.paint_entities(session, WorldXY::new(column.x + 32, column.y + 32));

                world.paint_tile_column(session, WorldXY::new(column.x + 32, column.y));
                world.paint_entities(session, WorldXY::new(column.x + 32, column.y));

                column.y -= 32;
                world.paint_entities(session, column);

                column.x += 32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ClipRegion;
    use crate::paint::arena::PaintArena;
    use crate::paint::primitive::ViewFlags;
    use crate::paint::session::tests::TestImages;
    use crate::paint::session::RenderContext;
    use crate::config::PaintConfig;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Visit {
        Tile(i32, i32),
        Entities(i32, i32),
    }

    struct RecordingWorld {
        visits: Mutex<Vec<Visit>>,
    }

    impl RecordingWorld {
        fn new() -> Self {
            Self {
                visits: Mutex::new(Vec::new()),
            }
        }
    }

    impl WorldSource for RecordingWorld {
        fn paint_tile_column(&self, _session: &mut PaintSession<'_>, origin: WorldXY) {
            self.visits.lock().unwrap().push(Visit::Tile(origin.x, origin.y));
        }

        fn paint_entities(&self, _session: &mut PaintSession<'_>, origin: WorldXY) {
            self.visits.lock().unwrap().push(Visit::Entities(origin.x, origin.y));
        }
    }

    fn run(rotation: Rotation, clip: ClipRegion) -> Vec<Visit> {
        let images = TestImages;
        let ctx = RenderContext {
            rotation,
            clip,
            view_flags: ViewFlags::empty(),
        };
        let mut session = PaintSession::new(&images, ctx, PaintArena::new(&PaintConfig::default()));
        let world = RecordingWorld::new();
        generate(&mut session, &world);
        world.visits.into_inner().unwrap()
    }

    #[test]
    fn test_rotation_zero_staircase() {
        // clip (0,16) quantises to screen (0,0); start column is (0,0).
        let visits = run(Rotation::R0, ClipRegion::new(0, 16, 32, 64));
        let expected_steps = (64 + 2128) >> 5;
        assert_eq!(visits.len(), 6 * expected_steps as usize);
        assert_eq!(
            &visits[..6],
            &[
                Visit::Tile(0, 0),
                Visit::Entities(0, 0),
                Visit::Entities(-32, 32),
                Visit::Tile(0, 32),
                Visit::Entities(0, 32),
                Visit::Entities(32, 0),
            ]
        );
        // The staircase advanced one tile along both axes.
        assert_eq!(visits[6], Visit::Tile(32, 32));
    }

    #[test]
    fn test_rotation_one_staircase() {
        let visits = run(Rotation::R1, ClipRegion::new(0, 16, 32, 64));
        // start: x = -0 - 0 = 0, y = 0 - 0 - 16 = -16 -> quantised -32.
        assert_eq!(
            &visits[..6],
            &[
                Visit::Tile(0, -32),
                Visit::Entities(0, -32),
                Visit::Entities(-32, -64),
                Visit::Tile(-32, -32),
                Visit::Entities(-32, -32),
                Visit::Entities(0, 0),
            ]
        );
        assert_eq!(visits[6], Visit::Tile(-32, 0));
    }

    #[test]
    fn test_each_rotation_visits_same_count() {
        let clip = ClipRegion::new(64, 128, 96, 96);
        let count = run(Rotation::R0, clip).len();
        for rotation in [Rotation::R1, Rotation::R2, Rotation::R3] {
            assert_eq!(run(rotation, clip).len(), count);
        }
    }

    #[test]
    fn test_columns_visited_once_per_tile_pass() {
        // Tile columns (as opposed to entity sweeps) must not repeat.
        let visits = run(Rotation::R2, ClipRegion::new(0, 0, 64, 128));
        let mut tiles: Vec<(i32, i32)> = visits
            .iter()
            .filter_map(|v| match v {
                Visit::Tile(x, y) => Some((*x, *y)),
                Visit::Entities(..) => None,
            })
            .collect();
        let total = tiles.len();
        tiles.sort_unstable();
        tiles.dedup();
        assert_eq!(tiles.len(), total);
    }
}
