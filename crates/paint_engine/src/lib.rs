//! Per-frame visibility, depth ordering and draw dispatch for an isometric
//! 2.5D tile renderer.
//!
//! The engine takes world content described as sprite primitives with 3D
//! bounding boxes and produces backend draw calls in a painter's-algorithm
//! order that respects occlusion between boxes. It owns no pixels and no
//! assets; image metadata and blitting are supplied through the
//! [`backend::ImageTable`] and [`backend::DrawBackend`] traits.
//!
//! A frame is rendered in four phases, driven through a
//! [`paint::PaintSession`]:
//!
//! 1. **Generate** - walk the map columns covering the clip region
//!    ([`paint::WorldSource`]) while emitters add primitives.
//! 2. **Arrange** - bucket primitives spatially, then resolve a total draw
//!    order with a windowed bounding-box dominance pass.
//! 3. **Draw** - dispatch the ordered chain (with children, attached
//!    decorations, see-through recolouring and optional debug wireframes).
//! 4. **Text** - paint floating text labels over everything.
//!
//! Sessions are independent and `Send`; render parallel viewport tiles by
//! acquiring one session per tile from a [`paint::Painter`].
//!
//! ```no_run
//! use paint_engine::backend::ClipRegion;
//! use paint_engine::foundation::math::Rotation;
//! use paint_engine::paint::{Painter, RenderContext, ViewFlags};
//! # use paint_engine::backend::{DrawBackend, ImageTable};
//! # fn demo(images: &dyn ImageTable, world: &dyn paint_engine::paint::WorldSource,
//! #         backend: &mut dyn DrawBackend) {
//! let mut painter = Painter::new(paint_engine::config::PaintConfig::default());
//! let ctx = RenderContext {
//!     rotation: Rotation::R0,
//!     clip: ClipRegion::new(0, 0, 1280, 720),
//!     view_flags: ViewFlags::empty(),
//! };
//! let mut session = painter.acquire(images, ctx);
//! session.generate(world);
//! session.arrange();
//! session.draw(backend);
//! session.draw_text(backend);
//! painter.release(session);
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod foundation;
pub mod paint;

pub use backend::{ClipRegion, DrawBackend, ImageTable, SpriteExtent};
pub use config::PaintConfig;
pub use paint::{PaintSession, Painter, RenderContext, ViewFlags, WorldSource};

/// Common imports for engine users
pub mod prelude {
    pub use crate::backend::{ClipRegion, DrawBackend, ImageTable, SpriteExtent};
    pub use crate::config::PaintConfig;
    pub use crate::foundation::math::{Rotation, ScreenXY, WorldXY, WorldXYZ};
    pub use crate::paint::{
        InteractionKind, PaintSession, Painter, RenderContext, SpriteKey, ViewFlags, WorldSource,
    };
}
