//! Paint pipeline: generation, arrangement, draw dispatch
//!
//! One frame flows through four phases in order: [`scan`] walks the map
//! columns visible in the clip region and lets world emitters create
//! primitives, [`arrange`] resolves the total draw order, [`draw`] turns
//! the ordered chain into backend blits, and [`text`] paints the label
//! overlay on top. [`session::PaintSession`] carries the state between
//! phases; [`painter::Painter`] pools the backing arenas across frames.

pub mod arena;
pub(crate) mod arrange;
pub(crate) mod draw;
pub mod painter;
pub mod primitive;
pub(crate) mod projection;
pub mod scan;
pub mod session;
pub(crate) mod text;

pub use arena::{PaintArena, MAX_PAINT_QUADRANTS};
pub use painter::Painter;
pub use primitive::{
    AttachedKey, AttachedPrimitive, ImageId, InteractionKind, MessageId, PaintBounds,
    PrimitiveFlags, SourceHandle, SpriteKey, SpritePrimitive, TextKey, TextPrimitive, ViewFlags,
};
pub use scan::WorldSource;
pub use session::{PaintSession, RenderContext};
