// src/noyau/trace.rs
//
// Échantillonnage d’une fonction de x pour le tracé (bureau + web).
// - linspace inclusif : n points, extrémités exactes
// - une seule évaluation vecteur sur tout le tableau
// - les NaN (points indéfinis) sont conservés : segments() coupe la courbe
//   à ces endroits, aucun moteur de rendu ne relie à travers un trou.

use tracing::debug;

use super::erreurs::{ErreurCalc, Resultat};
use super::eval::evaluer_vecteur;
use super::normalisation::{normaliser, Contexte};
use super::table::TableSymboles;

/// Nombre de points d’une courbe.
pub const NB_ECHANTILLONS: usize = 1000;

/// Demande de tracé (texte brut + bornes).
#[derive(Clone, Debug, PartialEq)]
pub struct DemandeTrace {
    pub fonction: String,
    pub x_min: f64,
    pub x_max: f64,
}

impl DemandeTrace {
    pub fn executer(&self) -> Resultat<Courbe> {
        tracer(&self.fonction, self.x_min, self.x_max)
    }
}

/// Courbe échantillonnée : xs[i] -> ys[i] (ys[i] peut être NaN).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Courbe {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Courbe {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Morceaux continus (sans NaN). Un point isolé forme un morceau d’un point.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut out = Vec::new();
        let mut courant: Vec<(f64, f64)> = Vec::new();

        for (x, y) in self.points() {
            if y.is_finite() {
                courant.push((x, y));
            } else if !courant.is_empty() {
                out.push(std::mem::take(&mut courant));
            }
        }
        if !courant.is_empty() {
            out.push(courant);
        }

        out
    }

    /// (min, max) des y finis ; None si la courbe est entièrement indéfinie.
    pub fn bornes_y(&self) -> Option<(f64, f64)> {
        self.ys
            .iter()
            .copied()
            .filter(|y| y.is_finite())
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((a, b)) => Some((a.min(y), b.max(y))),
            })
    }

    /// Fenêtre verticale d’affichage : y finis + 5 % de marge,
    /// ±1 autour d’une courbe plate, [-1, 1] si rien n’est défini.
    pub fn cadre_y(&self) -> (f64, f64) {
        match self.bornes_y() {
            None => (-1.0, 1.0),
            Some((a, b)) if a == b => (a - 1.0, b + 1.0),
            Some((a, b)) => {
                // 0.05 * (b - a) déborde quand b - a dépasse f64::MAX
                let marge = 0.05 * b - 0.05 * a;
                ((a - marge).max(f64::MIN), (b + marge).min(f64::MAX))
            }
        }
    }
}

/// Nombre visé de graduations par axe.
const GRADUATIONS: f64 = 10.0;

/// Pas “rond” (1, 2 ou 5 × 10^k) juste au-dessus de `brut`.
fn pas_rond(brut: f64) -> f64 {
    let puissance = 10f64.powf(brut.log10().floor());
    let r = brut / puissance;
    // tolérance : 0.1 / 0.1 ne vaut pas toujours exactement 1
    let facteur = if r <= 1.0 + 1e-9 {
        1.0
    } else if r <= 2.0 + 1e-9 {
        2.0
    } else if r <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };
    facteur * puissance
}

/// Graduations (multiples du pas rond) comprises dans [min, max].
/// Partagées par le canevas egui et le rendu PNG.
pub fn graduations(min: f64, max: f64) -> Vec<f64> {
    let brut = max / GRADUATIONS - min / GRADUATIONS;
    if !brut.is_finite() || brut <= 0.0 {
        return Vec::new();
    }
    let pas = pas_rond(brut);
    let premier = (min / pas).ceil() as i64;
    let dernier = (max / pas).floor() as i64;
    (premier..=dernier).map(|k| k as f64 * pas).collect()
}

/// n valeurs régulièrement espacées sur [debut, fin], extrémités incluses.
pub fn linspace(debut: f64, fin: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![debut],
        _ => {
            // combinaison convexe : fin - debut peut déborder près de f64::MAX
            let d = (n - 1) as f64;
            let mut xs: Vec<f64> = (0..n)
                .map(|i| {
                    let t = i as f64 / d;
                    debut * (1.0 - t) + fin * t
                })
                .collect();
            // dernière valeur exacte (pas d’erreur d’arrondi cumulée)
            if let Some(dernier) = xs.last_mut() {
                *dernier = fin;
            }
            xs
        }
    }
}

/// Échantillonne une expression canonique sur [x_min, x_max].
pub fn echantillonner(canon: &str, x_min: f64, x_max: f64, n: usize) -> Resultat<Courbe> {
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(ErreurCalc::intervalle("les bornes doivent être finies"));
    }
    if x_min >= x_max {
        return Err(ErreurCalc::intervalle(format!(
            "x_min ({x_min}) doit être strictement inférieur à x_max ({x_max})"
        )));
    }
    if n < 2 {
        return Err(ErreurCalc::intervalle("il faut au moins deux points"));
    }

    let xs = linspace(x_min, x_max, n);
    let ys = evaluer_vecteur(canon, &TableSymboles::trace(), &xs)?;

    let indefinis = ys.iter().filter(|y| y.is_nan()).count();
    debug!(canon, x_min, x_max, n, indefinis, "échantillonnage");

    Ok(Courbe { xs, ys })
}

/// Entrée brute -> courbe de NB_ECHANTILLONS points.
pub fn tracer(brut: &str, x_min: f64, x_max: f64) -> Resultat<Courbe> {
    let canon = normaliser(brut, Contexte::Trace);
    echantillonner(&canon, x_min, x_max, NB_ECHANTILLONS)
}
