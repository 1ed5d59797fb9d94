// src/noyau/solveur.rs
//
// Résolution d’une équation en x.
// - "g = d" -> (g)-(d) ; sans '=' : g = 0
// - polynôme de degré 2 (détecté sur l’arbre) : formule fermée stable,
//   racines complexes possibles
// - sinon : méthode de Brent sur [-BORNE_SOLVEUR, BORNE_SOLVEUR]
//
// Le degré vient de la structure de l’arbre, pas du texte : "x*x - 9 = 0",
// "(x-3)(x+3)" ou "x^2 = 9" sont tous reconnus.

use std::fmt;

use num_traits::ToPrimitive;
use tracing::debug;

use super::erreurs::{ErreurCalc, Resultat};
use super::eval::{compiler, evaluer_arbre};
use super::expr::Expr;
use super::normalisation::{normaliser, Contexte};
use super::table::TableSymboles;
use super::valeur::format_reel;

/// Intervalle de recherche de Brent : [-BORNE_SOLVEUR, BORNE_SOLVEUR].
pub const BORNE_SOLVEUR: f64 = 100.0;

/// Au-delà, l’extraction polynomiale abandonne (Brent prend le relais).
const DEGRE_MAX: usize = 8;

/* ---- tolérances de Brent (mêmes valeurs que brentq) ---- */
const BRENT_XTOL: f64 = 2e-12;
const BRENT_RTOL: f64 = 4.0 * f64::EPSILON;
const BRENT_ITERATIONS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Racine {
    Reelle(f64),
    Complexe { re: f64, im: f64 },
}

/// Résout `equation` (texte brut, notation humaine acceptée).
pub fn resoudre(equation: &str) -> Resultat<Vec<Racine>> {
    let membres: Vec<&str> = equation.split('=').collect();
    let (gauche, droite) = match membres.as_slice() {
        [g] => (*g, "0"),
        [g, d] => (*g, *d),
        _ => return Err(ErreurCalc::expression("un seul '=' est permis")),
    };
    if gauche.trim().is_empty() || droite.trim().is_empty() {
        return Err(ErreurCalc::expression("membre d’équation vide"));
    }

    let canon = normaliser(&format!("({gauche})-({droite})"), Contexte::Bureau);
    let expr = compiler(&canon, &TableSymboles::scalaire().avec_variable())?;

    if let Some(coeffs) = polynome(&expr) {
        if let [c, b, a] = coeffs.as_slice() {
            debug!(a, b, c, "équation du second degré");
            return Ok(quadratique(*a, *b, *c));
        }
    }

    let f = |x: f64| {
        evaluer_arbre(&expr, Some(x))
            .and_then(|v| v.en_f64())
            .unwrap_or(f64::NAN)
    };
    let x = brent(f, -BORNE_SOLVEUR, BORNE_SOLVEUR)?;
    debug!(x, "racine par Brent");
    Ok(vec![Racine::Reelle(x)])
}

/* ------------------------ Extraction polynomiale ------------------------ */

/// Coefficients (degré croissant, sans zéros de tête) si `e` est un polynôme en x.
fn polynome(e: &Expr) -> Option<Vec<f64>> {
    let mut p = coefficients(e)?;
    while p.len() > 1 && p.last() == Some(&0.0) {
        p.pop();
    }
    Some(p)
}

fn coefficients(e: &Expr) -> Option<Vec<f64>> {
    use Expr::*;

    // sous-arbre sans x : une constante
    if !e.contient_var() {
        let v = evaluer_arbre(e, None).ok()?.en_f64().ok()?;
        return Some(vec![v]);
    }

    match e {
        Var => Some(vec![0.0, 1.0]),
        Neg(a) => Some(coefficients(a)?.into_iter().map(|c| -c).collect()),
        Add(a, b) => Some(additionner(&coefficients(a)?, &coefficients(b)?, 1.0)),
        Sub(a, b) => Some(additionner(&coefficients(a)?, &coefficients(b)?, -1.0)),
        Mul(a, b) => multiplier(&coefficients(a)?, &coefficients(b)?),
        Div(a, b) if !b.contient_var() => {
            let d = evaluer_arbre(b, None).ok()?.en_f64().ok()?;
            if d == 0.0 {
                return None;
            }
            Some(coefficients(a)?.into_iter().map(|c| c / d).collect())
        }
        Pow(a, b) if !b.contient_var() => {
            let n = evaluer_arbre(b, None).ok()?.en_entier()?;
            let n = n.to_usize().filter(|n| *n <= DEGRE_MAX)?;
            let base = coefficients(a)?;
            let mut acc = vec![1.0];
            for _ in 0..n {
                acc = multiplier(&acc, &base)?;
            }
            Some(acc)
        }
        _ => None,
    }
}

fn additionner(p: &[f64], q: &[f64], signe: f64) -> Vec<f64> {
    let n = p.len().max(q.len());
    (0..n)
        .map(|i| p.get(i).copied().unwrap_or(0.0) + signe * q.get(i).copied().unwrap_or(0.0))
        .collect()
}

fn multiplier(p: &[f64], q: &[f64]) -> Option<Vec<f64>> {
    let degre = (p.len() - 1) + (q.len() - 1);
    if degre > DEGRE_MAX {
        return None;
    }
    let mut r = vec![0.0; degre + 1];
    for (i, a) in p.iter().enumerate() {
        for (j, b) in q.iter().enumerate() {
            r[i + j] += a * b;
        }
    }
    Some(r)
}

/* ------------------------ Second degré ------------------------ */

/// a x² + b x + c = 0, a != 0. Forme stable : q = -(b + signe(b)·√Δ)/2.
fn quadratique(a: f64, b: f64, c: f64) -> Vec<Racine> {
    let delta = b * b - 4.0 * a * c;

    if delta < 0.0 {
        let re = -b / (2.0 * a) + 0.0;
        let im = ((-delta).sqrt() / (2.0 * a)).abs();
        return vec![Racine::Complexe { re, im }, Racine::Complexe { re, im: -im }];
    }

    let q = -0.5 * (b + b.signum() * delta.sqrt());
    let (r1, r2) = if q == 0.0 {
        (0.0, 0.0)
    } else {
        (q / a + 0.0, c / q + 0.0)
    };

    vec![Racine::Reelle(r1.max(r2)), Racine::Reelle(r1.min(r2))]
}

/* ------------------------ Brent ------------------------ */

/// Racine de `f` sur [a, b] : méthode de Brent (interpolation + bissection).
/// Exige un changement de signe aux bornes.
pub fn brent(f: impl Fn(f64) -> f64, a: f64, b: f64) -> Resultat<f64> {
    let hors_intervalle =
        || ErreurCalc::AucuneRacine(format!("dans [{}, {}]", format_court(a), format_court(b)));

    let (mut xpre, mut xcur) = (a, b);
    let (mut fpre, mut fcur) = (f(xpre), f(xcur));

    if fpre.is_nan() || fcur.is_nan() {
        return Err(hors_intervalle());
    }
    if fpre == 0.0 {
        return Ok(xpre);
    }
    if fcur == 0.0 {
        return Ok(xcur);
    }
    if fpre.is_sign_negative() == fcur.is_sign_negative() {
        return Err(hors_intervalle());
    }

    let (mut xblk, mut fblk) = (0.0_f64, 0.0_f64);
    let (mut spre, mut scur) = (0.0_f64, 0.0_f64);

    for _ in 0..BRENT_ITERATIONS {
        if fpre != 0.0 && fcur != 0.0 && fpre.is_sign_negative() != fcur.is_sign_negative() {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;
            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (BRENT_XTOL + BRENT_RTOL * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            return Ok(xcur);
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // interpolation linéaire
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // interpolation quadratique inverse
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }

        fcur = f(xcur);
        if fcur.is_nan() {
            return Err(ErreurCalc::AucuneRacine(format!(
                "fonction indéfinie en x = {}",
                format_reel(xcur)
            )));
        }
    }

    Err(ErreurCalc::AucuneRacine(format!(
        "pas de convergence en {BRENT_ITERATIONS} itérations"
    )))
}

/* ------------------------ Affichage ------------------------ */

fn arrondi4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

/// Nombre “court” : entier sans ".0" (pour les complexes : (1+2j)).
fn format_court(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{}", v as i64)
    } else {
        format_reel(v)
    }
}

impl fmt::Display for Racine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Racine::Reelle(v) => f.write_str(&format_reel(arrondi4(v))),
            Racine::Complexe { re, im } => {
                let (re, im) = (arrondi4(re), arrondi4(im));
                if re == 0.0 && re.is_sign_positive() {
                    write!(f, "{}j", format_court(im))
                } else {
                    let signe = if im.is_sign_negative() { '-' } else { '+' };
                    write!(f, "({}{}{}j)", format_court(re), signe, format_court(im.abs()))
                }
            }
        }
    }
}

/// Texte du panneau solveur : "Solutions: x = 3.0, -3.0" ou "Solution: x ≈ 2.5".
pub fn format_solution(racines: &[Racine]) -> String {
    let textes: Vec<String> = racines.iter().map(|r| r.to_string()).collect();
    match textes.as_slice() {
        [seule] => format!("Solution: x ≈ {seule}"),
        _ => format!("Solutions: x = {}", textes.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::{brent, format_solution, polynome, resoudre, Racine};
    use crate::noyau::erreurs::ErreurCalc;
    use crate::noyau::eval::compiler;
    use crate::noyau::table::TableSymboles;

    fn coeffs(canon: &str) -> Option<Vec<f64>> {
        let e = compiler(canon, &TableSymboles::scalaire().avec_variable()).unwrap();
        polynome(&e)
    }

    fn reelle(r: &Racine) -> f64 {
        match r {
            Racine::Reelle(v) => *v,
            autre => panic!("racine complexe inattendue: {autre:?}"),
        }
    }

    #[test]
    fn carre_egal_neuf() {
        let r = resoudre("x**2 = 9").unwrap();
        assert_eq!(r, vec![Racine::Reelle(3.0), Racine::Reelle(-3.0)]);
        assert_eq!(format_solution(&r), "Solutions: x = 3.0, -3.0");
    }

    #[test]
    fn second_degre_sous_toutes_les_formes() {
        for eq in ["x^2 = 9", "x*x - 9", "(x-3)(x+3) = 0", "2x^2 = 18", "9 = x**2"] {
            let r = resoudre(eq).unwrap_or_else(|e| panic!("{eq}: {e}"));
            assert_eq!(r.len(), 2, "{eq}");
            assert!((reelle(&r[0]) - 3.0).abs() < 1e-12, "{eq}");
            assert!((reelle(&r[1]) + 3.0).abs() < 1e-12, "{eq}");
        }
    }

    #[test]
    fn racines_complexes() {
        // x² + 2x + 5 = 0 -> -1 ± 2j
        let r = resoudre("x**2 + 2x + 5 = 0").unwrap();
        assert_eq!(
            r,
            vec![
                Racine::Complexe { re: -1.0, im: 2.0 },
                Racine::Complexe { re: -1.0, im: -2.0 }
            ]
        );
        assert_eq!(format_solution(&r), "Solutions: x = (-1+2j), (-1-2j)");

        let r = resoudre("x**2 + 4 = 0").unwrap();
        assert_eq!(format_solution(&r), "Solutions: x = 2j, -2j");
    }

    #[test]
    fn racine_double() {
        let r = resoudre("x**2 = 0").unwrap();
        assert_eq!(r, vec![Racine::Reelle(0.0), Racine::Reelle(0.0)]);
    }

    #[test]
    fn lineaire_par_brent() {
        let r = resoudre("2x + 1 = 6").unwrap();
        assert_eq!(r.len(), 1);
        assert!((reelle(&r[0]) - 2.5).abs() < 1e-9);
        assert_eq!(format_solution(&r), "Solution: x ≈ 2.5");
    }

    #[test]
    fn transcendante_par_brent() {
        // cos(x) = x : x ≈ 0.7391
        let r = resoudre("cos(x) = x").unwrap();
        assert_eq!(format_solution(&r), "Solution: x ≈ 0.7391");

        let r = resoudre("x**3 - 8").unwrap();
        assert!((reelle(&r[0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pas_de_racine() {
        assert!(matches!(resoudre("exp(x) = -1"), Err(ErreurCalc::AucuneRacine(_))));
        assert!(matches!(resoudre("x = 500"), Err(ErreurCalc::AucuneRacine(_))));
        assert!(matches!(resoudre("sqrt(x) = 2"), Err(ErreurCalc::AucuneRacine(_))));
    }

    #[test]
    fn equations_mal_formees() {
        for eq in ["x = 1 = 2", "= 3", "x +", "y = 2"] {
            assert!(
                matches!(resoudre(eq), Err(ErreurCalc::Expression(_))),
                "{eq:?}"
            );
        }
    }

    #[test]
    fn extraction_polynomiale() {
        assert_eq!(coeffs("x**2 - 9"), Some(vec![-9.0, 0.0, 1.0]));
        assert_eq!(coeffs("(x+1)**3"), Some(vec![1.0, 3.0, 3.0, 1.0]));
        assert_eq!(coeffs("x/2 + pi - pi"), Some(vec![0.0, 0.5]));
        assert_eq!(coeffs("x**2 - x**2 + x"), Some(vec![0.0, 1.0]));
        assert_eq!(coeffs("sin(x)"), None);
        assert_eq!(coeffs("1/x"), None);
        assert_eq!(coeffs("x**0.5"), None);
        assert_eq!(coeffs("x**20"), None);
    }

    #[test]
    fn brent_direct() {
        let x = brent(|x| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!((x - 2f64.sqrt()).abs() < 1e-11);
        assert!(brent(|x| x * x + 1.0, -1.0, 1.0).is_err());
        assert_eq!(brent(|x| x, 0.0, 1.0).unwrap(), 0.0);
    }
}
