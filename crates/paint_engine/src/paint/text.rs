//! Text label overlay
//!
//! Floating text labels are formatted and drawn after all geometry, in
//! insertion order. Labels carry a per-glyph vertical offset table so the
//! text can wobble along its baseline; when the active locale uses a
//! TrueType font that cannot be offset per glyph, the backend is asked to
//! fall back to the sprite font, but only if that font can represent the
//! locale's currency glyphs.

use crate::backend::DrawBackend;
use crate::paint::session::PaintSession;

pub(crate) fn draw_text_chain(session: &PaintSession<'_>, backend: &mut dyn DrawBackend) {
    let clip = session.context().clip;
    let force_sprite_font =
        backend.uses_true_type_font() && backend.sprite_font_supports_currency();

    let mut cursor = session.arena.text_head;
    while let Some(key) = cursor {
        let label = &session.arena.text[key];
        let text = backend.format_message(label.message, &label.args);
        backend.draw_text_with_y_offsets(
            &clip,
            &text,
            label.screen_pos,
            &label.y_offsets,
            force_sprite_font,
        );
        cursor = label.next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ClipRegion;
    use crate::foundation::math::{Rotation, ScreenXY, WorldXY};
    use crate::paint::primitive::{ImageId, MessageId};
    use crate::paint::session::tests::{test_session, TestImages};

    #[derive(Debug, PartialEq, Eq)]
    struct TextCall {
        text: String,
        pos: ScreenXY,
        y_offsets: Vec<i8>,
        force_sprite_font: bool,
    }

    struct TextBackend {
        true_type: bool,
        currency_ok: bool,
        calls: Vec<TextCall>,
    }

    impl TextBackend {
        fn new(true_type: bool, currency_ok: bool) -> Self {
            Self {
                true_type,
                currency_ok,
                calls: Vec::new(),
            }
        }
    }

    impl DrawBackend for TextBackend {
        fn draw_sprite(&mut self, _: &ClipRegion, _: ImageId, _: ScreenXY, _: u8) {}

        fn draw_sprite_masked(&mut self, _: &ClipRegion, _: ImageId, _: ScreenXY, _: ImageId) {}

        fn draw_line(&mut self, _: &ClipRegion, _: ScreenXY, _: ScreenXY, _: u8) {}

        fn format_message(&self, message: MessageId, args: &[i32; 4]) -> String {
            format!("msg{}:{}", message, args[0])
        }

        fn draw_text_with_y_offsets(
            &mut self,
            _clip: &ClipRegion,
            text: &str,
            pos: ScreenXY,
            y_offsets: &[i8],
            force_sprite_font: bool,
        ) {
            self.calls.push(TextCall {
                text: text.to_owned(),
                pos,
                y_offsets: y_offsets.to_vec(),
                force_sprite_font,
            });
        }

        fn uses_true_type_font(&self) -> bool {
            self.true_type
        }

        fn sprite_font_supports_currency(&self) -> bool {
            self.currency_ok
        }
    }

    #[test]
    fn test_labels_drawn_in_insertion_order() {
        let images = TestImages;
        let mut session = test_session(&images);
        session.set_sprite_position(WorldXY::new(32, 64));
        assert!(session.add_floating_text(150, 3, 5, 16, &[0, 1, 0], 4, Rotation::R0));
        session.set_sprite_position(WorldXY::new(0, 0));
        assert!(session.add_floating_text(-20, 4, 0, 0, &[], 0, Rotation::R0));

        let mut backend = TextBackend::new(false, true);
        session.draw_text(&mut backend);

        assert_eq!(
            backend.calls,
            vec![
                TextCall {
                    text: "msg3:150".to_owned(),
                    pos: ScreenXY::new(36, 32),
                    y_offsets: vec![0, 1, 0],
                    force_sprite_font: false,
                },
                TextCall {
                    text: "msg4:-20".to_owned(),
                    pos: ScreenXY::new(0, 0),
                    y_offsets: vec![],
                    force_sprite_font: false,
                },
            ]
        );
    }

    #[test]
    fn test_sprite_font_forced_only_with_currency_support() {
        let images = TestImages;
        let mut session = test_session(&images);
        assert!(session.add_floating_text(1, 1, 0, 0, &[], 0, Rotation::R0));

        let mut backend = TextBackend::new(true, true);
        session.draw_text(&mut backend);
        assert!(backend.calls[0].force_sprite_font);

        let mut backend = TextBackend::new(true, false);
        session.draw_text(&mut backend);
        assert!(!backend.calls[0].force_sprite_font);

        let mut backend = TextBackend::new(false, true);
        session.draw_text(&mut backend);
        assert!(!backend.calls[0].force_sprite_font);
    }
}
