use egui::{emath::TSTransform, Align2, Color32, FontId, Pos2, Rect};

use crate::assets::Asset;

/// The drawable surface the core paints through. Wraps a painter the host
/// has already configured; the canvas never touches the underlying device
/// context setup, it only issues draw calls in playfield coordinates and
/// maps them to the screen with `transform`.
pub struct Canvas<'a> {
    painter: &'a egui::Painter,
    transform: TSTransform,
    background: Color32,
}

impl<'a> Canvas<'a> {
    pub fn new(painter: &'a egui::Painter, transform: TSTransform, background: Color32) -> Self {
        Self {
            painter,
            transform,
            background,
        }
    }

    /// Erases a playfield region back to the background colour.
    pub fn clear(&self, region: Rect) {
        self.painter
            .rect_filled(self.to_screen(region), 0.0, self.background);
    }

    pub fn draw_image(&self, asset: &Asset, pos: Pos2) {
        let rect = self.to_screen(Rect::from_min_size(pos, asset.size));
        let uv = Rect::from_min_max(egui::pos2(0., 0.), egui::pos2(1., 1.));

        self.painter
            .image(asset.texture.id(), rect, uv, Color32::WHITE);
    }

    /// Centered text, anchored at its baseline.
    pub fn draw_text(&self, text: &str, pos: Pos2, size: f32, color: Color32) {
        self.painter.text(
            self.transform.mul_pos(pos),
            Align2::CENTER_BOTTOM,
            text,
            FontId::proportional(size * self.transform.scaling),
            color,
        );
    }

    /// Small filled markers, used by the debug overlay for world points and
    /// recent contacts.
    pub fn draw_points(&self, points: &[Pos2]) {
        for p in points {
            self.painter
                .circle_filled(self.transform.mul_pos(*p), 2.0, Color32::RED);
        }
    }

    fn to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(
            self.transform.mul_pos(rect.min),
            self.transform.mul_pos(rect.max),
        )
    }
}
