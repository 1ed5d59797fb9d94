//! Noyau : évaluation (pipeline sûr)
//!
//! canon -> tokenize -> RPN -> Expr (noms résolus par la table) -> évaluation
//!
//! Deux modes sur le même arbre :
//! - scalaire : Valeur (entier exact ou réel), erreur de domaine si indéfini ;
//! - vecteur  : une colonne f64 par nœud, un seul passage ; indéfini => NaN.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};
use tracing::debug;

use super::erreurs::{ErreurCalc, Resultat};
use super::expr::Expr;
use super::jetons::tokenize;
use super::normalisation::{normaliser, Contexte};
use super::rpn::{from_rpn, to_rpn};
use super::table::{Fonction, TableSymboles};
use super::valeur::{div_reelle, mod_reel, puissance_reelle, reel, Valeur};

/// Garde-fou : factorial(n) refusé au-delà.
pub const FACTORIELLE_MAX: u64 = 5000;

/// Garde-fous de taille (l’évaluation est récursive).
const JETONS_MAX: usize = 4096;
const PROFONDEUR_MAX: usize = 500;

/* ------------------------ Compilation ------------------------ */

/// Construit l’arbre d’une expression canonique, noms résolus contre `table`.
pub fn compiler(canon: &str, table: &TableSymboles) -> Resultat<Expr> {
    let s = canon.trim();
    if s.is_empty() {
        return Err(ErreurCalc::expression("entrée vide"));
    }

    let jetons = tokenize(s)?;
    if jetons.len() > JETONS_MAX {
        return Err(ErreurCalc::expression("expression trop longue"));
    }

    let rpn = to_rpn(&jetons)?;
    let expr = from_rpn(&rpn, table)?;

    if expr.profondeur() > PROFONDEUR_MAX {
        return Err(ErreurCalc::expression("expression trop imbriquée"));
    }

    debug!(arbre = %expr, "expression compilée");
    Ok(expr)
}

/* ------------------------ Mode scalaire ------------------------ */

/// Évalue `canon` en un seul nombre. `x` lie la variable si la table l’accepte.
pub fn evaluer_scalaire(canon: &str, table: &TableSymboles, x: Option<f64>) -> Resultat<Valeur> {
    let expr = compiler(canon, table)?;
    evaluer_arbre(&expr, x)
}

/// Évaluation scalaire d’un arbre déjà compilé (réutilisée par le solveur).
pub fn evaluer_arbre(expr: &Expr, x: Option<f64>) -> Resultat<Valeur> {
    use Expr::*;

    match expr {
        Nombre(v) => Ok(v.clone()),
        Const(c) => Ok(Valeur::Reel(c.valeur())),
        Var => x
            .map(Valeur::Reel)
            .ok_or_else(|| ErreurCalc::expression("la variable x n’a pas de valeur ici")),

        Neg(a) => Ok(evaluer_arbre(a, x)?.neg()),

        Add(a, b) => evaluer_arbre(a, x)?.add(&evaluer_arbre(b, x)?),
        Sub(a, b) => evaluer_arbre(a, x)?.sub(&evaluer_arbre(b, x)?),
        Mul(a, b) => evaluer_arbre(a, x)?.mul(&evaluer_arbre(b, x)?),
        Div(a, b) => evaluer_arbre(a, x)?.div(&evaluer_arbre(b, x)?),
        Mod(a, b) => evaluer_arbre(a, x)?.modulo(&evaluer_arbre(b, x)?),
        Pow(a, b) => evaluer_arbre(a, x)?.puissance(&evaluer_arbre(b, x)?),

        Appel(f, args) => {
            let vals = args
                .iter()
                .map(|a| evaluer_arbre(a, x))
                .collect::<Resultat<Vec<_>>>()?;
            appliquer_scalaire(*f, &vals)
        }
    }
}

/// abs / factorial gardent les entiers ; le reste passe par les réels.
fn appliquer_scalaire(f: Fonction, args: &[Valeur]) -> Resultat<Valeur> {
    match (f, args) {
        (Fonction::Abs, [Valeur::Entier(n)]) => Ok(Valeur::Entier(n.abs())),
        (Fonction::Factorielle, [v]) => factorielle(v).map(Valeur::Entier),
        (_, [a]) => reel(fonction_reelle(f, &[a.en_f64()?])?),
        (_, [a, b]) => reel(fonction_reelle(f, &[a.en_f64()?, b.en_f64()?])?),
        _ => Err(ErreurCalc::expression(format!(
            "{} : nombre d’arguments invalide",
            f.nom()
        ))),
    }
}

fn factorielle(v: &Valeur) -> Resultat<BigInt> {
    let n = v
        .en_entier()
        .ok_or_else(|| ErreurCalc::domaine("factorial n’accepte que des entiers"))?;
    if n.is_negative() {
        return Err(ErreurCalc::domaine("factorial d’un nombre négatif"));
    }
    let n = n
        .to_u64()
        .filter(|n| *n <= FACTORIELLE_MAX)
        .ok_or_else(|| ErreurCalc::domaine(format!("factorial limité à {FACTORIELLE_MAX}")))?;

    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= k;
    }
    Ok(acc)
}

/* ------------------------ Fonctions réelles (partagées) ------------------------ */

/// Implémentation réelle de chaque fonction de la table.
/// Domaine violé => Err ; le mode vecteur le transforme en NaN.
pub fn fonction_reelle(f: Fonction, args: &[f64]) -> Resultat<f64> {
    match (f, args) {
        (Fonction::Sin, [v]) => Ok(v.sin()),
        (Fonction::Cos, [v]) => Ok(v.cos()),
        (Fonction::Tan, [v]) => Ok(v.tan()),
        (Fonction::Exp, [v]) => Ok(v.exp()),
        (Fonction::Abs, [v]) => Ok(v.abs()),

        (Fonction::Sqrt, [v]) => {
            if *v < 0.0 {
                return Err(ErreurCalc::domaine("racine carrée d’un nombre négatif"));
            }
            Ok(v.sqrt())
        }

        (Fonction::Log, [v]) | (Fonction::Log10, [v]) => {
            if *v <= 0.0 {
                return Err(ErreurCalc::domaine("logarithme d’un nombre non positif"));
            }
            Ok(if f == Fonction::Log { v.ln() } else { v.log10() })
        }

        (Fonction::Factorielle, [v]) => {
            let n = factorielle(&Valeur::Reel(*v))?;
            n.to_f64()
                .filter(|r| r.is_finite())
                .ok_or_else(|| ErreurCalc::domaine("dépassement numérique"))
        }

        (Fonction::RacineN, [v, n]) => racine_n(*v, *n),

        _ => Err(ErreurCalc::expression(format!(
            "{} : nombre d’arguments invalide",
            f.nom()
        ))),
    }
}

/// nthroot(v, n) : racine n-ième réelle (impair => défini pour v < 0).
fn racine_n(v: f64, n: f64) -> Resultat<f64> {
    if n == 0.0 {
        return Err(ErreurCalc::domaine("racine de degré zéro"));
    }
    if v < 0.0 {
        let impair = n.fract() == 0.0 && n % 2.0 != 0.0;
        if !impair {
            return Err(ErreurCalc::domaine(
                "racine paire (ou non entière) d’un nombre négatif",
            ));
        }
        return Ok(-(-v).powf(1.0 / n));
    }
    puissance_reelle(v, 1.0 / n)
}

/* ------------------------ Mode vecteur ------------------------ */

/// Colonne de valeurs : une constante n’est pas recopiée n fois.
#[derive(Clone, Debug)]
enum Colonne {
    Uniforme(f64),
    Valeurs(Vec<f64>),
}

// NaN est absorbant : un point indéfini le reste (NaN**0 vaudrait 1 sinon).
impl Colonne {
    fn appliquer(self, op: impl Fn(f64) -> f64) -> Colonne {
        let op = |v: f64| if v.is_nan() { f64::NAN } else { op(v) };
        match self {
            Colonne::Uniforme(v) => Colonne::Uniforme(op(v)),
            Colonne::Valeurs(vs) => Colonne::Valeurs(vs.into_iter().map(op).collect()),
        }
    }

    fn combiner(self, autre: Colonne, op: impl Fn(f64, f64) -> f64) -> Colonne {
        use Colonne::*;
        let op = |a: f64, b: f64| {
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else {
                op(a, b)
            }
        };
        match (self, autre) {
            (Uniforme(a), Uniforme(b)) => Uniforme(op(a, b)),
            (Uniforme(a), Valeurs(bs)) => Valeurs(bs.into_iter().map(|b| op(a, b)).collect()),
            (Valeurs(a_s), Uniforme(b)) => Valeurs(a_s.into_iter().map(|a| op(a, b)).collect()),
            (Valeurs(a_s), Valeurs(bs)) => {
                Valeurs(a_s.into_iter().zip(bs).map(|(a, b)| op(a, b)).collect())
            }
        }
    }

    fn en_vec(self, n: usize) -> Vec<f64> {
        match self {
            Colonne::Uniforme(v) => vec![v; n],
            Colonne::Valeurs(vs) => vs,
        }
    }
}

/// Indéfini ou non fini => NaN.
fn nan_si_indefini(r: Resultat<f64>) -> f64 {
    match r {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

/// Évalue `canon` en tout point de `xs` (même longueur). Jamais d’erreur de domaine.
pub fn evaluer_vecteur(canon: &str, table: &TableSymboles, xs: &[f64]) -> Resultat<Vec<f64>> {
    let expr = compiler(canon, table)?;
    Ok(colonne(&expr, xs).en_vec(xs.len()))
}

fn colonne(expr: &Expr, xs: &[f64]) -> Colonne {
    use Expr::*;

    match expr {
        Nombre(v) => Colonne::Uniforme(nan_si_indefini(v.en_f64())),
        Const(c) => Colonne::Uniforme(c.valeur()),
        Var => Colonne::Valeurs(xs.to_vec()),

        Neg(a) => colonne(a, xs).appliquer(|v| -v),

        Add(a, b) => colonne(a, xs).combiner(colonne(b, xs), |p, q| nan_si_indefini(Ok(p + q))),
        Sub(a, b) => colonne(a, xs).combiner(colonne(b, xs), |p, q| nan_si_indefini(Ok(p - q))),
        Mul(a, b) => colonne(a, xs).combiner(colonne(b, xs), |p, q| nan_si_indefini(Ok(p * q))),
        Div(a, b) => colonne(a, xs).combiner(colonne(b, xs), |p, q| nan_si_indefini(div_reelle(p, q))),
        Mod(a, b) => colonne(a, xs).combiner(colonne(b, xs), |p, q| nan_si_indefini(mod_reel(p, q))),
        Pow(a, b) => colonne(a, xs).combiner(colonne(b, xs), |p, q| {
            nan_si_indefini(puissance_reelle(p, q))
        }),

        Appel(f, args) => {
            let f = *f;
            match args.as_slice() {
                [a] => colonne(a, xs).appliquer(|v| nan_si_indefini(fonction_reelle(f, &[v]))),
                [a, b] => colonne(a, xs).combiner(colonne(b, xs), |p, q| {
                    nan_si_indefini(fonction_reelle(f, &[p, q]))
                }),
                _ => Colonne::Uniforme(f64::NAN),
            }
        }
    }
}

/* ------------------------ API calculatrice ------------------------ */

/// Entrée brute de la calculatrice -> valeur (normalisation selon le contexte).
pub fn calculer(brut: &str, contexte: Contexte) -> Resultat<Valeur> {
    let canon = normaliser(brut, contexte);
    let r = evaluer_scalaire(&canon, &TableSymboles::scalaire(), None);
    if let Err(e) = &r {
        debug!(canon = %canon, erreur = %e, "évaluation refusée");
    }
    r
}

#[cfg(test)]
mod tests {
    use super::{calculer, compiler, evaluer_scalaire, evaluer_vecteur};
    use crate::noyau::erreurs::ErreurCalc;
    use crate::noyau::normalisation::Contexte;
    use crate::noyau::table::TableSymboles;

    fn ok(s: &str) -> String {
        calculer(s, Contexte::Bureau)
            .unwrap_or_else(|e| panic!("calculer({s:?}) erreur: {e}"))
            .to_string()
    }

    fn approx(s: &str) -> f64 {
        calculer(s, Contexte::Bureau)
            .and_then(|v| v.en_f64())
            .unwrap_or_else(|e| panic!("calculer({s:?}) erreur: {e}"))
    }

    fn domaine(s: &str) -> bool {
        matches!(calculer(s, Contexte::Bureau), Err(ErreurCalc::Domaine(_)))
    }

    #[test]
    fn arithmetique_de_base() {
        assert_eq!(ok("3+4*2"), "11");
        assert_eq!(ok("(3+4)*2"), "14");
        assert_eq!(ok("7 % 3"), "1");
        assert_eq!(ok("10/4"), "2.5");
        assert_eq!(ok("2(3+1)"), "8");
        assert_eq!(ok("1.5 + 1"), "2.5");
    }

    #[test]
    fn puissances_et_unaires() {
        assert_eq!(ok("2**10"), "1024");
        assert_eq!(ok("2^10"), "1024");
        assert_eq!(ok("-2**2"), "-4");
        assert_eq!(ok("2**-1"), "0.5");
        assert_eq!(ok("2**3**2"), "512");
        assert_eq!(ok("--3"), "3");
    }

    #[test]
    fn fonctions() {
        assert_eq!(ok("sqrt(16)"), "4.0");
        assert_eq!(ok("√(16)"), "4.0");
        assert_eq!(ok("abs(-3)"), "3");
        assert_eq!(ok("abs(-2.5)"), "2.5");
        assert_eq!(ok("factorial(5)"), "120");
        assert_eq!(ok("factorial(5.0)"), "120");
        assert_eq!(ok("log10(1000)"), "3.0");
        assert_eq!(ok("pi"), "3.141592653589793");
        assert!((approx("ln(e)") - 1.0).abs() < 1e-12);
        assert!((approx("nthroot(27, 3)") - 3.0).abs() < 1e-12);
        assert!((approx("nthroot(-8, 3)") + 2.0).abs() < 1e-12);
        assert!((approx("2sin(pi/6)") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn arbre_compile_lisible() {
        let t = TableSymboles::trace();
        assert_eq!(compiler("2+x*3", &t).unwrap().to_string(), "(2 + (x * 3))");
        assert_eq!(compiler("-x**2", &t).unwrap().to_string(), "(-(x ** 2))");
        assert_eq!(compiler("nthroot(x, 3)", &t).unwrap().to_string(), "nthroot(x, 3)");
    }

    #[test]
    fn notation_scientifique() {
        assert_eq!(ok("1e-05"), "1e-05");
        assert_eq!(ok("1e3"), "1000.0");
        assert_eq!(ok("2.5E-2"), "0.025");
        assert_eq!(ok("1e+16"), "1e+16");
        assert_eq!(ok("1e-05+1"), "1.00001");
        assert_eq!(calculer("2.5e-3", Contexte::Web).unwrap().to_string(), "0.0025");
        // sans chiffre derrière, e reste la constante
        assert!((approx("2e") - 2.0 * std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn pourcentage_web() {
        assert_eq!(calculer("5%", Contexte::Web).unwrap().to_string(), "0.05");
        assert_eq!(calculer("50%*8", Contexte::Web).unwrap().to_string(), "4.0");
    }

    #[test]
    fn erreurs_de_domaine() {
        for s in [
            "1/0",
            "5 % 0",
            "0**-1",
            "sqrt(-1)",
            "log(0)",
            "log10(-5)",
            "factorial(-1)",
            "factorial(2.5)",
            "factorial(100000)",
            "nthroot(-16, 2)",
            "nthroot(8, 0)",
            "exp(1000)",
            "(-8)**(1/3)",
        ] {
            assert!(domaine(s), "{s:?} devrait être une erreur de domaine");
        }
    }

    #[test]
    fn erreurs_d_expression() {
        for s in ["", "   ", "2x", "__import__(1)", "y", "3 +", "1 = 2"] {
            assert!(
                matches!(calculer(s, Contexte::Bureau), Err(ErreurCalc::Expression(_))),
                "{s:?} devrait être une erreur d’expression"
            );
        }
    }

    #[test]
    fn garde_fou_imbrication() {
        let s = format!("{}1", "-".repeat(2000));
        assert!(matches!(
            calculer(&s, Contexte::Bureau),
            Err(ErreurCalc::Expression(_))
        ));
    }

    #[test]
    fn variable_liee_ou_non() {
        let t = TableSymboles::trace();
        assert_eq!(evaluer_scalaire("x+1", &t, Some(2.0)).unwrap().to_string(), "3.0");
        assert!(matches!(
            evaluer_scalaire("x+1", &t, None),
            Err(ErreurCalc::Expression(_))
        ));
    }

    #[test]
    fn vecteur_nan_aux_points_indefinis() {
        let t = TableSymboles::trace();
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];

        let ys = evaluer_vecteur("1/x", &t, &xs).unwrap();
        assert_eq!(ys.len(), xs.len());
        assert_eq!(ys[0], -0.5);
        assert!(ys[2].is_nan());
        assert_eq!(ys[4], 0.5);

        let ys = evaluer_vecteur("sqrt(x)", &t, &xs).unwrap();
        assert!(ys[0].is_nan() && ys[1].is_nan());
        assert_eq!(ys[4], 2f64.sqrt());

        let ys = evaluer_vecteur("log(x)", &t, &xs).unwrap();
        assert!(ys[2].is_nan());
    }

    #[test]
    fn vecteur_constant_a_la_bonne_longueur() {
        let ys = evaluer_vecteur("2*pi", &TableSymboles::trace(), &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(ys, vec![2.0 * std::f64::consts::PI; 3]);
    }

    #[test]
    fn vecteur_egal_scalaire() {
        let t = TableSymboles::trace();
        let xs: Vec<f64> = (0..50).map(|i| -5.0 + 0.21 * i as f64).collect();
        for canon in ["x**2 + 3*x - sin(x)", "exp(x/3)*cos(x)", "abs(x)**0.5 - tan(x/4)"] {
            let ys = evaluer_vecteur(canon, &t, &xs).unwrap();
            for (x, y) in xs.iter().zip(&ys) {
                let s = evaluer_scalaire(canon, &t, Some(*x)).unwrap().en_f64().unwrap();
                assert!((s - y).abs() <= 1e-9 * s.abs().max(1.0), "{canon} en {x}");
            }
        }
    }

    #[test]
    fn vecteur_refuse_la_syntaxe_invalide() {
        let t = TableSymboles::trace();
        assert!(evaluer_vecteur("foo(x)", &t, &[1.0]).is_err());
        assert!(evaluer_vecteur("x % 2", &t, &[1.0]).is_err());
    }
}
