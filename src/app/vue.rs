// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// - Écran : ligne d’historique + entrée (Enter évalue)
// - Pavé 5 colonnes, couleurs par famille de touches (thème)
// - Ligne des thèmes, solveur repliable
// - Mode graphe : f(x), X Min, X Max, Tracer / Effacer / Retour + canevas

use eframe::egui::{self, RichText};

use super::etat::{AppCalc, Mode};
use super::graphe;
use super::theme::{Couleurs, Palette, Theme};

const HAUTEUR_TOUCHE: f32 = 44.0;
const ESPACE: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Famille {
    Chiffre,
    Operation,
    Egal,
    Effacer,
    Fonction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Inserer(&'static str),
    Effacer,
    RetourArriere,
    Egal,
    MemoireEffacer,
    MemoireRappeler,
    MemoireAjouter,
    MemoireSoustraire,
    Graphe,
}

struct Touche {
    libelle: &'static str,
    action: Action,
    famille: Famille,
    colonnes: u8,
}

const fn t(libelle: &'static str, action: Action, famille: Famille) -> Touche {
    Touche {
        libelle,
        action,
        famille,
        colonnes: 1,
    }
}

const fn ins(libelle: &'static str, texte: &'static str, famille: Famille) -> Touche {
    t(libelle, Action::Inserer(texte), famille)
}

use Famille::{Chiffre, Effacer, Egal, Fonction, Operation};

const CLAVIER: [&[Touche]; 7] = [
    &[
        t("MC", Action::MemoireEffacer, Fonction),
        t("MR", Action::MemoireRappeler, Fonction),
        t("M+", Action::MemoireAjouter, Fonction),
        t("M-", Action::MemoireSoustraire, Fonction),
        t("C", Action::Effacer, Effacer),
    ],
    &[
        ins("x²", "**2", Fonction),
        ins("x³", "**3", Fonction),
        ins("x^y", "**", Fonction),
        ins("√", "sqrt(", Fonction),
        t("⌫", Action::RetourArriere, Effacer),
    ],
    &[
        ins("n!", "factorial(", Fonction),
        ins("(", "(", Operation),
        ins(")", ")", Operation),
        ins("%", "%", Operation),
        ins("÷", "/", Operation),
    ],
    &[
        ins("7", "7", Chiffre),
        ins("8", "8", Chiffre),
        ins("9", "9", Chiffre),
        ins("×", "*", Operation),
        ins("ⁿ√x", "nthroot(", Fonction),
    ],
    &[
        ins("4", "4", Chiffre),
        ins("5", "5", Chiffre),
        ins("6", "6", Chiffre),
        ins("−", "-", Operation),
        ins("log", "log10(", Fonction),
    ],
    &[
        ins("1", "1", Chiffre),
        ins("2", "2", Chiffre),
        ins("3", "3", Chiffre),
        ins("+", "+", Operation),
        ins("ln", "log(", Fonction),
    ],
    &[
        Touche {
            libelle: "0",
            action: Action::Inserer("0"),
            famille: Chiffre,
            colonnes: 2,
        },
        ins(".", ".", Chiffre),
        t("=", Action::Egal, Egal),
        t("📊", Action::Graphe, Fonction),
    ],
];

impl Famille {
    fn couleurs(self, p: &Palette) -> Couleurs {
        match self {
            Famille::Chiffre => p.chiffre,
            Famille::Operation => p.operation,
            Famille::Egal => p.egal,
            Famille::Effacer => p.effacer,
            Famille::Fonction => p.fonction,
        }
    }
}

/// Bouton coloré ; le survol éclaircit le fond.
fn bouton(ui: &mut egui::Ui, libelle: &str, c: Couleurs, taille: egui::Vec2) -> egui::Response {
    ui.scope(|ui| {
        let w = &mut ui.visuals_mut().widgets;
        w.inactive.weak_bg_fill = c.fond;
        w.hovered.weak_bg_fill = c.survol();
        w.active.weak_bg_fill = c.survol();
        ui.add_sized(taille, egui::Button::new(RichText::new(libelle).size(18.0).color(c.texte)))
    })
    .inner
}

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(ESPACE, ESPACE);

        match self.mode {
            Mode::Calculatrice => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.ui_ecran(ui);
                        ui.add_space(8.0);
                        self.ui_clavier(ui);
                        ui.add_space(8.0);
                        self.ui_themes(ui);
                        ui.add_space(4.0);
                        self.ui_solveur(ui);
                    });
            }
            Mode::Graphe => self.ui_graphe(ui),
        }
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        let p = self.theme.palette();

        egui::Frame::new()
            .fill(p.ecran)
            .inner_margin(egui::Margin::same(10))
            .corner_radius(6.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    ui.label(RichText::new(&self.historique).size(14.0).color(p.historique));

                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.entree)
                            .id_salt("entree_calc")
                            .hint_text("0")
                            .horizontal_align(egui::Align::Max)
                            .font(egui::FontId::proportional(30.0))
                            .text_color(p.ecran_texte)
                            .frame(false)
                            .desired_width(f32::INFINITY),
                    );

                    if self.focus_entree {
                        resp.request_focus();
                        self.focus_entree = false;
                    }
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        self.evaluer();
                    }
                });
            });

        if !self.erreur.is_empty() {
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_clavier(&mut self, ui: &mut egui::Ui) {
        let p = *self.theme.palette();
        let largeur = ((ui.available_width() - 4.0 * ESPACE) / 5.0).max(40.0);

        for rangee in CLAVIER {
            ui.horizontal(|ui| {
                for touche in rangee {
                    let n = f32::from(touche.colonnes);
                    let taille = egui::vec2(largeur * n + ESPACE * (n - 1.0), HAUTEUR_TOUCHE);
                    if bouton(ui, touche.libelle, touche.famille.couleurs(&p), taille).clicked() {
                        self.executer(touche.action);
                    }
                }
            });
        }
    }

    fn executer(&mut self, action: Action) {
        match action {
            Action::Inserer(texte) => self.ajouter(texte),
            Action::Effacer => self.effacer(),
            Action::RetourArriere => self.retour_arriere(),
            Action::Egal => self.evaluer(),
            Action::MemoireEffacer => self.memoire_effacer(),
            Action::MemoireRappeler => self.memoire_rappeler(),
            Action::MemoireAjouter => self.memoire_ajouter(),
            Action::MemoireSoustraire => self.memoire_soustraire(),
            Action::Graphe => self.passer_en_graphe(),
        }
    }

    fn ui_themes(&mut self, ui: &mut egui::Ui) {
        let p = *self.theme.palette();
        ui.horizontal(|ui| {
            ui.label("Thème :");
            for theme in Theme::TOUS {
                if bouton(ui, theme.nom(), p.fonction, egui::vec2(72.0, 28.0)).clicked() {
                    self.choisir_theme(theme);
                }
            }
        });
    }

    fn ui_solveur(&mut self, ui: &mut egui::Ui) {
        let p = *self.theme.palette();
        egui::CollapsingHeader::new("Solveur d’équations (variable x)")
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.solveur.equation)
                            .id_salt("equation")
                            .desired_width(ui.available_width() - 90.0),
                    );
                    if bouton(ui, "Résoudre", p.egal, egui::vec2(84.0, 26.0)).clicked() {
                        self.resoudre_equation();
                    }
                });
                if !self.solveur.resultat.is_empty() {
                    ui.label(RichText::new(&self.solveur.resultat).monospace());
                }
            });
    }

    fn ui_graphe(&mut self, ui: &mut egui::Ui) {
        let p = *self.theme.palette();

        ui.horizontal(|ui| {
            ui.label("f(x) =");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.graphe.fonction)
                    .id_salt("fonction")
                    .desired_width(f32::INFINITY),
            );
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.tracer_graphe();
            }
        });

        ui.horizontal(|ui| {
            ui.label("X Min :");
            ui.add(egui::TextEdit::singleline(&mut self.graphe.x_min).desired_width(50.0));
            ui.label("X Max :");
            ui.add(egui::TextEdit::singleline(&mut self.graphe.x_max).desired_width(50.0));
        });

        ui.horizontal(|ui| {
            if bouton(ui, "Tracer", p.egal, egui::vec2(80.0, 30.0)).clicked() {
                self.tracer_graphe();
            }
            if bouton(ui, "Effacer", p.effacer, egui::vec2(80.0, 30.0)).clicked() {
                self.effacer_graphe();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if bouton(ui, "Calculatrice", p.fonction, egui::vec2(110.0, 30.0)).clicked() {
                    self.retour_calculatrice();
                }
            });
        });

        if !self.graphe.erreur.is_empty() {
            ui.colored_label(ui.visuals().error_fg_color, &self.graphe.erreur);
        }

        ui.add_space(4.0);
        graphe::canevas(ui, self.graphe.courbe.as_ref(), &p);
    }
}
