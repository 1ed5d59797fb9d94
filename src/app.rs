// src/app.rs
//
// Application bureau (eframe)
// ---------------------------
// - etat.rs   : AppCalc, toutes les actions (sans egui)
// - vue.rs    : écran, pavé, thèmes, solveur, mode graphe
// - graphe.rs : canevas de la courbe
// - theme.rs  : palettes clair / sombre / pastel

pub mod etat;
pub mod graphe;
pub mod theme;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement l’entrée
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.effacer_entree();
        }

        ctx.set_visuals(self.theme.visuels());

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
