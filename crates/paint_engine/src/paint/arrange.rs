//! Depth-order arrangement
//!
//! Merges all populated quadrant buckets into a single chain and resolves a
//! total draw order that respects 3D occlusion. The pass works one bucket
//! window at a time: entries of quadrant `i` are compared against entries
//! of quadrants `i` and `i + 1`, and any entry that must be drawn earlier
//! is spliced forward in place. Boxes farther apart than one bucket cannot
//! occlude under the 32-unit discretisation, so windowed resolution is
//! sufficient and the pass stays close to linear in practice.

use crate::foundation::math::Rotation;
use crate::paint::arena::PaintArena;
use crate::paint::primitive::{PaintBounds, QuadrantFlags, SpriteKey};

/// Which of the x/y axes flip their comparison direction per rotation.
///
/// The four rotation-specific dominance tests differ only in which screen
/// quadrant counts as "behind"; that is data, not control flow.
const ROTATION_AXIS_FLIP: [[bool; 2]; 4] = [
    [false, false],
    [true, false],
    [true, true],
    [false, true],
];

/// Rotation-specific bounding-box dominance test.
///
/// Returns `true` when `current` must be drawn before `initial`: the
/// initial box's far corner dominates the current box's near corner on all
/// three axes, and the reverse containment does not also hold. The reverse
/// check is what keeps mutually-dominant pairs (e.g. identical boxes) from
/// being swapped back and forth forever; such pairs keep their existing
/// order.
pub(crate) fn check_bounding_box(
    rotation: Rotation,
    initial: &PaintBounds,
    current: &PaintBounds,
) -> bool {
    let [flip_x, flip_y] = ROTATION_AXIS_FLIP[rotation.index() as usize];

    let x_forward = if flip_x {
        initial.x_end < current.x
    } else {
        initial.x_end >= current.x
    };
    let y_forward = if flip_y {
        initial.y_end < current.y
    } else {
        initial.y_end >= current.y
    };
    let x_reverse = if flip_x {
        initial.x >= current.x_end
    } else {
        initial.x < current.x_end
    };
    let y_reverse = if flip_y {
        initial.y >= current.y_end
    } else {
        initial.y < current.y_end
    };

    initial.z_end >= current.z
        && y_forward
        && x_forward
        && !(initial.z < current.z_end && y_reverse && x_reverse)
}

/// Position in the merged chain: either the sentinel head or a node.
///
/// The head owns the first `next` link, so splices right at the front of
/// the chain need no special casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(SpriteKey),
}

fn next_of(arena: &PaintArena, cursor: Cursor) -> Option<SpriteKey> {
    match cursor {
        Cursor::Head => arena.paint_head,
        Cursor::Node(key) => arena.sprites[key].next_quadrant,
    }
}

fn set_next(arena: &mut PaintArena, cursor: Cursor, next: Option<SpriteKey>) {
    match cursor {
        Cursor::Head => arena.paint_head = next,
        Cursor::Node(key) => arena.sprites[key].next_quadrant = next,
    }
}

/// Merge all buckets and resolve the total draw order.
///
/// Runs exactly once per session, after generation. The result is a
/// permutation of the generated primitives threaded through `paint_head`.
pub(crate) fn arrange(arena: &mut PaintArena, rotation: Rotation) {
    arena.paint_head = None;

    let Some((back, front)) = arena.quadrant_range else {
        return;
    };

    // Step 1: concatenate every non-empty bucket, ascending bucket index,
    // each keeping its internal LIFO order.
    let mut tail = Cursor::Head;
    for index in back..=front {
        let Some(head) = arena.quadrants[index] else {
            continue;
        };
        set_next(arena, tail, Some(head));
        let mut last = head;
        while let Some(next) = arena.sprites[last].next_quadrant {
            last = next;
        }
        tail = Cursor::Node(last);
    }

    // Step 2: resolve every adjacent bucket window. The first window also
    // treats its own-bucket entries as reorder candidates.
    let mut cache = arrange_window(arena, Cursor::Head, back as u16, QuadrantFlags::NEXT, rotation);
    for index in (back + 1)..front {
        cache = arrange_window(arena, cache, index as u16, QuadrantFlags::empty(), rotation);
    }
}

/// Resolve the window anchored at `quadrant_index`, starting the search at
/// `start`. Returns the node to start the next window's search from.
fn arrange_window(
    arena: &mut PaintArena,
    start: Cursor,
    quadrant_index: u16,
    own_bucket_flag: QuadrantFlags,
    rotation: Rotation,
) -> Cursor {
    // Skip ahead to the node preceding this window's first entry.
    let mut before_window = start;
    loop {
        let Some(next) = next_of(arena, before_window) else {
            return before_window;
        };
        if arena.sprites[next].quadrant_index >= quadrant_index {
            break;
        }
        before_window = Cursor::Node(next);
    }

    // The next window starts its search here instead of re-walking the
    // whole chain.
    let cache = before_window;

    // Tag every entry of this window relative to the anchor quadrant.
    // Entries already spliced ahead from a lower bucket keep their stale
    // flags: they were resolved by an earlier window and must not become
    // subjects again, only leftover candidates.
    let mut cursor = before_window;
    while let Some(key) = next_of(arena, cursor) {
        let entry_index = arena.sprites[key].quadrant_index;
        if entry_index > quadrant_index + 1 {
            arena.sprites[key].quadrant_flags = QuadrantFlags::BIGGER;
            break;
        }
        if entry_index == quadrant_index + 1 {
            arena.sprites[key].quadrant_flags = QuadrantFlags::NEXT | QuadrantFlags::IDENTICAL;
        } else if entry_index == quadrant_index {
            arena.sprites[key].quadrant_flags = own_bucket_flag | QuadrantFlags::IDENTICAL;
        }
        cursor = Cursor::Node(key);
    }

    // Resolve each unprocessed entry S in turn: scan forward from S and
    // splice every candidate T that must be drawn before it to the slot
    // just ahead of S.
    let mut position = before_window;
    loop {
        let subject = loop {
            let Some(next) = next_of(arena, position) else {
                return cache;
            };
            let flags = arena.sprites[next].quadrant_flags;
            if flags.contains(QuadrantFlags::BIGGER) {
                return cache;
            }
            if flags.contains(QuadrantFlags::IDENTICAL) {
                break next;
            }
            position = Cursor::Node(next);
        };

        arena.sprites[subject].quadrant_flags.remove(QuadrantFlags::IDENTICAL);
        let splice_point = position;
        let subject_bounds = arena.sprites[subject].bounds;

        let mut prev = subject;
        loop {
            let Some(candidate) = arena.sprites[prev].next_quadrant else {
                break;
            };
            let flags = arena.sprites[candidate].quadrant_flags;
            if flags.contains(QuadrantFlags::BIGGER) {
                break;
            }
            if !flags.contains(QuadrantFlags::NEXT) {
                prev = candidate;
                continue;
            }

            let candidate_bounds = arena.sprites[candidate].bounds;
            if check_bounding_box(rotation, &subject_bounds, &candidate_bounds) {
                // Unlink the candidate and re-insert it just before the
                // subject; the scan continues from the same predecessor.
                let after = arena.sprites[candidate].next_quadrant;
                arena.sprites[prev].next_quadrant = after;
                let displaced = next_of(arena, splice_point);
                set_next(arena, splice_point, Some(candidate));
                arena.sprites[candidate].next_quadrant = displaced;
            } else {
                prev = candidate;
            }
        }

        position = splice_point;
    }
}
