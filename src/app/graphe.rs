// src/app/graphe.rs
//
// Canevas du graphe (painter egui).
// Le canevas est redessiné entièrement à chaque frame à partir de la courbe
// stockée dans l’état : rien ne s’accumule d’un tracé à l’autre.

use eframe::egui::{self, pos2, Align2, Color32, FontId, Pos2, Rect, Stroke};

use super::theme::Palette;
use crate::noyau::trace::graduations;
use crate::noyau::Courbe;

const GRILLE: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
const AXES: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);
const COURBE: Color32 = Color32::from_rgb(0x21, 0x96, 0xf3);

/// Fenêtre vide, avant tout tracé.
const FENETRE_VIDE: (f64, f64, f64, f64) = (-10.0, 10.0, -1.0, 1.0);

/// Repère mathématique -> écran (y vers le haut).
/// Tout est calculé en f64 : seule la position finale, dans la zone, passe en f32.
struct Repere {
    zone: Rect,
    x: (f64, f64),
    y: (f64, f64),
}

/// Position relative de `v` dans [a, b] ; moitiés pour ne pas déborder sur b - a.
fn relatif(v: f64, (a, b): (f64, f64)) -> f64 {
    (v * 0.5 - a * 0.5) / (b * 0.5 - a * 0.5)
}

impl Repere {
    fn vers_ecran(&self, x: f64, y: f64) -> Pos2 {
        let tx = relatif(x, self.x) as f32;
        let ty = relatif(y, self.y) as f32;
        pos2(
            self.zone.left() + tx * self.zone.width(),
            self.zone.bottom() - ty * self.zone.height(),
        )
    }
}

/// Dessine la zone du graphe ; `courbe` = (points, x_min, x_max).
pub fn canevas(ui: &mut egui::Ui, courbe: Option<&(Courbe, f64, f64)>, palette: &Palette) {
    let taille = egui::vec2(ui.available_width(), ui.available_height().max(260.0));
    let (reponse, painter) = ui.allocate_painter(taille, egui::Sense::hover());
    let zone = reponse.rect;

    painter.rect_filled(zone, 4.0, Color32::WHITE);

    let courbe = courbe.filter(|(c, _, _)| !c.is_empty());
    let (x_min, x_max, y_min, y_max) = match courbe {
        Some((c, a, b)) => {
            let (y_min, y_max) = c.cadre_y();
            (*a, *b, y_min, y_max)
        }
        None => FENETRE_VIDE,
    };

    let repere = Repere {
        zone: zone.shrink(2.0),
        x: (x_min, x_max),
        y: (y_min, y_max),
    };
    let ecran = |x: f64, y: f64| repere.vers_ecran(x, y);

    /* ---- grille ---- */
    let fin = Stroke::new(1.0, GRILLE);
    for gx in graduations(x_min, x_max) {
        painter.line_segment([ecran(gx, y_min), ecran(gx, y_max)], fin);
    }
    for gy in graduations(y_min, y_max) {
        painter.line_segment([ecran(x_min, gy), ecran(x_max, gy)], fin);
    }

    /* ---- axes ---- */
    let axe = Stroke::new(1.0, AXES);
    if (x_min..=x_max).contains(&0.0) {
        painter.line_segment([ecran(0.0, y_min), ecran(0.0, y_max)], axe);
    }
    if (y_min..=y_max).contains(&0.0) {
        painter.line_segment([ecran(x_min, 0.0), ecran(x_max, 0.0)], axe);
    }

    /* ---- courbe (un trait par morceau continu) ---- */
    if let Some((c, _, _)) = courbe {
        for segment in c.segments() {
            let points: Vec<Pos2> = segment.iter().map(|&(x, y)| ecran(x, y)).collect();
            if points.len() == 1 {
                painter.circle_filled(points[0], 1.5, COURBE);
            } else {
                painter.add(egui::Shape::line(points, Stroke::new(2.0, COURBE)));
            }
        }
    }

    /* ---- bornes affichées dans les coins ---- */
    let police = FontId::proportional(11.0);
    let coin = zone.shrink(6.0);
    painter.text(coin.left_bottom(), Align2::LEFT_BOTTOM, format!("{x_min}"), police.clone(), palette.historique);
    painter.text(coin.right_bottom(), Align2::RIGHT_BOTTOM, format!("{x_max}"), police.clone(), palette.historique);
    painter.text(coin.left_top(), Align2::LEFT_TOP, format!("{y_max:.3}"), police, palette.historique);
}
