use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    self, Align2, Color32, FontId, Label, Mesh, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2,
};

use crate::color;
use crate::data::charts::{DashboardCharts, NO_DATA_MESSAGE};
use crate::data::model::Pillar;

/// Donut hole as a fraction of the outer radius.
const DONUT_HOLE: f32 = 0.45;

/// Placeholder panel for an empty filter result.
pub fn no_data(ui: &mut Ui, height: f32) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_size(egui::vec2(ui.available_width(), height));
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(NO_DATA_MESSAGE).color(Color32::GRAY));
        });
    });
}

/// A bordered card with a bold title and the wrapped theme text.
pub fn theme_card(ui: &mut Ui, title: &str, topic: &str, stroke: Color32, height: f32) {
    egui::Frame::group(ui.style())
        .fill(color::CARD_FILL)
        .stroke(Stroke::new(2.0, stroke))
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), height));
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(title).strong().size(16.0).color(Color32::WHITE));
                ui.add_space(6.0);
                ui.add(Label::new(RichText::new(topic).size(15.0).color(Color32::WHITE)).wrap());
            });
        });
}

// ---------------------------------------------------------------------------
// Composition donut
// ---------------------------------------------------------------------------

/// Pie of the mean E/S/G percentage-of-report with a 45% hole, starting at
/// twelve o'clock and running clockwise.
pub fn composition_donut(ui: &mut Ui, charts: &DashboardCharts, height: f32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong("Average ESG Composition (Selected Years)");
    });

    let legend_height = 24.0;
    let size = egui::vec2(ui.available_width(), (height - legend_height).max(80.0));
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    let center = rect.center();
    let outer = 0.45 * rect.width().min(rect.height());
    let inner = outer * DONUT_HOLE;
    let shares = charts.composition_shares();

    let mut mesh = Mesh::default();
    let mut labels = Vec::new();
    let mut start = -FRAC_PI_2;
    for pillar in Pillar::ALL {
        let share = *shares.get(pillar) as f32;
        if share <= 0.0 {
            continue;
        }
        let sweep = share * TAU;
        donut_slice(&mut mesh, center, inner, outer, start, sweep, color::pillar_color(pillar));
        let mid = center + Vec2::angled(start + sweep / 2.0) * (inner + outer) / 2.0;
        labels.push((mid, format!("{:.1}%", share * 100.0)));
        start += sweep;
    }

    if mesh.is_empty() {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            "no percentages reported",
            FontId::proportional(13.0),
            Color32::GRAY,
        );
    } else {
        painter.add(Shape::mesh(mesh));
        for (pos, text) in labels {
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }
    }

    response.on_hover_text(
        Pillar::ALL
            .iter()
            .map(|&p| match charts.composition.get(p) {
                Some(v) => format!("{p}: {v:.2}% of report on average"),
                None => format!("{p}: not reported"),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    );

    ui.horizontal(|ui: &mut Ui| {
        for pillar in Pillar::ALL {
            ui.label(RichText::new("■").color(color::pillar_color(pillar)));
            ui.label(pillar.code());
        }
    });
}

/// Append a ring segment as a triangle strip between the two radii.
fn donut_slice(
    mesh: &mut Mesh,
    center: Pos2,
    inner: f32,
    outer: f32,
    start: f32,
    sweep: f32,
    fill: Color32,
) {
    let steps = ((sweep / TAU) * 128.0).ceil().max(1.0) as u32;
    let base = mesh.vertices.len() as u32;

    for i in 0..=steps {
        let dir = Vec2::angled(start + sweep * i as f32 / steps as f32);
        mesh.colored_vertex(center + dir * outer, fill);
        mesh.colored_vertex(center + dir * inner, fill);
    }
    for i in 0..steps {
        let o0 = base + 2 * i;
        let (i0, o1, i1) = (o0 + 1, o0 + 2, o0 + 3);
        mesh.add_triangle(o0, i0, o1);
        mesh.add_triangle(i0, i1, o1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donut_slice_geometry() {
        let mut mesh = Mesh::default();
        let center = Pos2::new(50.0, 50.0);
        donut_slice(&mut mesh, center, 10.0, 20.0, -FRAC_PI_2, TAU / 4.0, Color32::RED);

        // 32 steps for a quarter turn → 33 vertex pairs, two triangles per step
        assert_eq!(mesh.vertices.len(), 66);
        assert_eq!(mesh.indices.len(), 32 * 2 * 3);
        for (i, v) in mesh.vertices.iter().enumerate() {
            let r = (v.pos - center).length();
            let expected = if i % 2 == 0 { 20.0 } else { 10.0 };
            assert!((r - expected).abs() < 1e-3);
        }
        // starts at twelve o'clock
        assert!((mesh.vertices[0].pos.y - 30.0).abs() < 1e-3);
    }
}
