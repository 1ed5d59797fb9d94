//! src/app/etat.rs
//!
//! État de l’application bureau (sans vue).
//!
//! Tout ce que l’écran affiche vit ici : entrée, ligne d’historique, mémoire,
//! thème, mode (calculatrice / graphe), champs du graphe et du solveur.
//! La vue lit ces champs et n’agit que par les méthodes ci-dessous.

use tracing::debug;

use super::theme::Theme;
use crate::noyau::{
    calculer, format_solution, resoudre, Contexte, Courbe, DemandeTrace, ErreurCalc, Valeur,
};

/// Motifs retirés d’un coup par ⌫ (les plus longs d’abord : "log10(" avant "log(").
const MOTIFS_EFFACABLES: [&str; 12] = [
    "factorial(",
    "nthroot(",
    "log10(",
    "sqrt(",
    "log(",
    "sin(",
    "cos(",
    "tan(",
    "exp(",
    "abs(",
    "**",
    "pi",
];

pub const FONCTION_DEFAUT: &str = "sin(x)";
pub const X_MIN_DEFAUT: &str = "-10";
pub const X_MAX_DEFAUT: &str = "10";
pub const EQUATION_DEFAUT: &str = "x**2 = 9";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Calculatrice,
    Graphe,
}

/// Panneau graphe : textes saisis + dernière courbe tracée.
#[derive(Clone, Debug, PartialEq)]
pub struct Graphe {
    pub fonction: String,
    pub x_min: String,
    pub x_max: String,
    /// Courbe affichée avec ses bornes ; remplacée à chaque tracé.
    pub courbe: Option<(Courbe, f64, f64)>,
    pub erreur: String,
}

impl Default for Graphe {
    fn default() -> Self {
        Self {
            fonction: FONCTION_DEFAUT.to_string(),
            x_min: X_MIN_DEFAUT.to_string(),
            x_max: X_MAX_DEFAUT.to_string(),
            courbe: None,
            erreur: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Solveur {
    pub equation: String,
    pub resultat: String,
}

impl Default for Solveur {
    fn default() -> Self {
        Self {
            equation: EQUATION_DEFAUT.to_string(),
            resultat: String::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- calculatrice ---
    pub entree: String,
    pub historique: String, // "3+4*2 =" après une évaluation
    pub erreur: String,
    pub memoire: Valeur,

    // --- présentation ---
    pub theme: Theme,
    pub mode: Mode,

    // --- graphe + solveur ---
    pub graphe: Graphe,
    pub solveur: Solveur,

    // Permet à la vue de redonner le focus à l’entrée après un clic sur une touche.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            historique: String::new(),
            erreur: String::new(),
            memoire: Valeur::entier(0),
            theme: Theme::default(),
            mode: Mode::default(),
            graphe: Graphe::default(),
            solveur: Solveur::default(),
            focus_entree: true,
        }
    }
}

impl AppCalc {
    /* ------------------------ Saisie ------------------------ */

    /// Ajoute un morceau tel quel ("7", "**2", "sqrt(", …).
    pub fn ajouter(&mut self, morceau: &str) {
        self.entree.push_str(morceau);
        self.erreur.clear();
        self.focus_entree = true;
    }

    /// C : efface l’entrée et la ligne d’historique.
    pub fn effacer(&mut self) {
        self.entree.clear();
        self.historique.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    /// ESC : efface seulement l’entrée.
    pub fn effacer_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// ⌫ “intelligent” : retire d’un coup un nom de fonction complet ("sqrt(")
    /// ou l’opérateur "**", sinon un seul caractère.
    pub fn retour_arriere(&mut self) {
        let motif = MOTIFS_EFFACABLES
            .iter()
            .find(|m| self.entree.ends_with(*m));

        match motif {
            Some(m) => {
                let reste = self.entree.len() - m.len();
                self.entree.truncate(reste);
            }
            None => {
                self.entree.pop();
            }
        }
        self.erreur.clear();
        self.focus_entree = true;
    }

    /* ------------------------ Évaluation ------------------------ */

    /// = : l’expression passe dans l’historique, le résultat la remplace.
    /// En cas d’erreur l’entrée est conservée.
    pub fn evaluer(&mut self) {
        let expression = self.entree.trim().to_string();
        if expression.is_empty() {
            return;
        }

        match calculer(&expression, Contexte::Bureau) {
            Ok(v) => {
                self.historique = format!("{expression} =");
                self.entree = v.to_string();
                self.erreur.clear();
            }
            Err(e) => self.erreur = e.to_string(),
        }
        self.focus_entree = true;
    }

    /* ------------------------ Mémoire ------------------------ */

    /// MC
    pub fn memoire_effacer(&mut self) {
        self.memoire = Valeur::entier(0);
    }

    /// MR : ajoute la valeur en mémoire à l’entrée.
    pub fn memoire_rappeler(&mut self) {
        let texte = self.memoire.to_string();
        self.ajouter(&texte);
    }

    /// M+
    pub fn memoire_ajouter(&mut self) {
        self.memoire_combiner(|m, v| m.add(v));
    }

    /// M-
    pub fn memoire_soustraire(&mut self) {
        self.memoire_combiner(|m, v| m.sub(v));
    }

    fn memoire_combiner(&mut self, op: impl Fn(&Valeur, &Valeur) -> Result<Valeur, ErreurCalc>) {
        if self.entree.trim().is_empty() {
            return;
        }
        let r = calculer(&self.entree, Contexte::Bureau).and_then(|v| op(&self.memoire, &v));
        match r {
            Ok(m) => {
                debug!(memoire = %m, "mémoire mise à jour");
                self.memoire = m;
                self.erreur.clear();
            }
            Err(e) => self.erreur = e.to_string(),
        }
        self.focus_entree = true;
    }

    /* ------------------------ Thème + mode ------------------------ */

    pub fn choisir_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn passer_en_graphe(&mut self) {
        self.mode = Mode::Graphe;
    }

    pub fn retour_calculatrice(&mut self) {
        self.mode = Mode::Calculatrice;
        self.focus_entree = true;
    }

    /* ------------------------ Graphe ------------------------ */

    /// Plot : relit les bornes, échantillonne, remplace la courbe affichée.
    /// Sur erreur, la courbe précédente reste à l’écran.
    pub fn tracer_graphe(&mut self) {
        match self.nouvelle_courbe() {
            Ok(c) => {
                self.graphe.courbe = Some(c);
                self.graphe.erreur.clear();
            }
            Err(e) => self.graphe.erreur = e.to_string(),
        }
    }

    fn nouvelle_courbe(&self) -> Result<(Courbe, f64, f64), ErreurCalc> {
        let borne = |texte: &str| {
            texte.trim().parse::<f64>().map_err(|_| {
                ErreurCalc::intervalle(format!("entrez des nombres valides pour X Min et X Max ({texte:?})"))
            })
        };
        let demande = DemandeTrace {
            fonction: self.graphe.fonction.clone(),
            x_min: borne(&self.graphe.x_min)?,
            x_max: borne(&self.graphe.x_max)?,
        };
        let courbe = demande.executer()?;
        Ok((courbe, demande.x_min, demande.x_max))
    }

    /// Clear
    pub fn effacer_graphe(&mut self) {
        self.graphe.courbe = None;
        self.graphe.erreur.clear();
    }

    /* ------------------------ Solveur ------------------------ */

    pub fn resoudre_equation(&mut self) {
        self.solveur.resultat = match resoudre(&self.solveur.equation) {
            Ok(racines) => format_solution(&racines),
            Err(ErreurCalc::AucuneRacine(intervalle)) => {
                format!("Aucune solution trouvée {intervalle}")
            }
            Err(e) => format!("Erreur : {e}"),
        };
    }
}
