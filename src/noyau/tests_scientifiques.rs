//! Tests scientifiques (campagne) : propriétés du pipeline complet.
//!
//! But : vérifier les invariants de bout en bout sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - le mode vecteur rend NaN là où le scalaire rend une erreur de domaine ;
//!   partout ailleurs les deux doivent coïncider (tolérance relative 1e-9).
//! - les entiers restent exacts en scalaire ; un entier trop grand pour un f64
//!   devient NaN en vecteur (c’est le seul écart toléré hors domaine).

use std::time::{Duration, Instant};

use super::erreurs::ErreurCalc;
use super::eval::{calculer, evaluer_scalaire, evaluer_vecteur};
use super::normalisation::{normaliser, Contexte};
use super::solveur::{format_solution, resoudre};
use super::table::TableSymboles;
use super::trace::{linspace, tracer, NB_ECHANTILLONS};

fn ok(expr: &str, contexte: Contexte) -> String {
    calculer(expr, contexte)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .to_string()
}

fn proche(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Bout en bout ------------------------ */

#[test]
fn sci_bout_en_bout() {
    assert_eq!(ok("3+4*2", Contexte::Bureau), "11");
    assert_eq!(ok("sqrt(16)", Contexte::Bureau), "4.0");
    assert_eq!(ok("5%", Contexte::Web), "0.05");

    let c = tracer("sin(x)", -10.0, 10.0).unwrap();
    assert_eq!(c.len(), NB_ECHANTILLONS);
    assert!(c.ys.iter().all(|y| (-1.0..=1.0).contains(y)));

    let r = resoudre("x**2 = 9").unwrap();
    assert_eq!(format_solution(&r), "Solutions: x = 3.0, -3.0");
}

/* ------------------------ Normalisation ------------------------ */

#[test]
fn sci_multiplication_implicite_equivalente() {
    // la forme humaine s’évalue comme la forme écrite à la main
    let t = TableSymboles::trace();
    let paires = [
        ("2x", "2*x"),
        ("10x", "10*x"),
        ("sin(2x)", "sin(2*x)"),
        ("3x^2 + 2x - 1", "3*x**2 + 2*x - 1"),
        ("(x+1)(x-1)", "(x+1)*(x-1)"),
        ("2pi*x", "2*pi*x"),
        ("ln(x)2", "log(x)*2"),
    ];
    for (humain, manuel) in paires {
        let canon = normaliser(humain, Contexte::Trace);
        for x in [0.5, 1.5, 3.0] {
            let a = evaluer_scalaire(&canon, &t, Some(x))
                .and_then(|v| v.en_f64())
                .unwrap_or_else(|e| panic!("{humain:?} -> {canon:?} : {e}"));
            let b = evaluer_scalaire(manuel, &t, Some(x))
                .and_then(|v| v.en_f64())
                .unwrap_or_else(|e| panic!("{manuel:?} : {e}"));
            assert!(proche(a, b), "{humain:?} ({canon:?}) vs {manuel:?} en x={x}");
        }
    }
}

#[test]
fn sci_une_seule_etoile() {
    assert_eq!(normaliser("2x", Contexte::Trace).matches('*').count(), 1);
    assert_eq!(normaliser("10y", Contexte::Trace).matches('*').count(), 1);
}

/* ------------------------ Liste blanche ------------------------ */

#[test]
fn sci_noms_hors_liste_blanche() {
    let noms = ["__import__('os')", "open(1)", "eval(1)", "math.pi", "exit()", "asin(1)", "foo"];
    for s in noms {
        let r = calculer(s, Contexte::Bureau);
        assert!(
            matches!(r, Err(ErreurCalc::Expression(_))),
            "{s:?} aurait dû être refusé, obtenu {r:?}"
        );
    }
}

/* ------------------------ Scalaire vs vecteur ------------------------ */

#[test]
fn sci_vecteur_egal_scalaire_point_par_point() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let t = TableSymboles::trace();
    let xs = linspace(-7.5, 7.5, 61);
    let exprs = [
        "x**3 - 2*x + 1",
        "sin(x)/x",
        "sqrt(x) + log(x)",
        "tan(x)",
        "exp(-x**2/2)",
        "abs(x)**(1/3)",
        "log10(abs(x)) * cos(pi*x)",
        "(-x)**0.5",
    ];

    for canon in exprs {
        budget(t0, max);
        let ys = evaluer_vecteur(canon, &t, &xs).unwrap();
        assert_eq!(ys.len(), xs.len());

        for (x, y) in xs.iter().zip(&ys) {
            match evaluer_scalaire(canon, &t, Some(*x)).and_then(|v| v.en_f64()) {
                Ok(s) => assert!(proche(s, *y), "{canon} en x={x}: scalaire={s} vecteur={y}"),
                Err(e) => {
                    assert!(e.est_domaine(), "{canon} en x={x}: {e}");
                    assert!(y.is_nan(), "{canon} en x={x}: attendu NaN, obtenu {y}");
                }
            }
        }
    }
}

/* ------------------------ Sémantique entière ------------------------ */

#[test]
fn sci_entiers_exacts() {
    // 2**100 reste exact (pas de 1.2676506002282294e+30)
    assert_eq!(
        ok("2**100", Contexte::Bureau),
        "1267650600228229401496703205376"
    );
    assert_eq!(ok("factorial(25)", Contexte::Bureau), "15511210043330985984000000");
    assert_eq!(ok("-7 % 3", Contexte::Bureau), "2");
    assert_eq!(ok("7 % -3", Contexte::Bureau), "-2");
    assert_eq!(ok("7.5 % 2", Contexte::Bureau), "1.5");
    assert_eq!(ok("6/3", Contexte::Bureau), "2.0");
}

#[test]
fn sci_affichage_des_reels() {
    assert_eq!(ok("0.1+0.2", Contexte::Bureau), "0.30000000000000004");
    assert_eq!(ok("1/100000", Contexte::Bureau), "1e-05");
    assert_eq!(ok("10.0**16", Contexte::Bureau), "1e+16");
    assert_eq!(ok("1/4", Contexte::Bureau), "0.25");
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let expr = vec!["1"; 300].join(" + ");
    assert_eq!(ok(&expr, Contexte::Bureau), "300");
    budget(t0, max);
}

#[test]
fn sci_stress_parentheses_profondes() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    // les parenthèses seules n’ajoutent pas de profondeur à l’arbre
    let expr = format!("{}1{}", "(".repeat(400), ")".repeat(400));
    assert_eq!(ok(&expr, Contexte::Bureau), "1");

    // sqrt imbriqués : profondeur 60, valeur stable
    let mut expr = "1".to_string();
    for _ in 0..60 {
        expr = format!("sqrt({expr})");
    }
    assert_eq!(ok(&expr, Contexte::Bureau), "1.0");
    budget(t0, max);
}

#[test]
fn sci_stress_gros_entiers_bornes() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // refusé vite (garde-fou), pas calculé
    assert!(calculer("10**10**10", Contexte::Bureau).unwrap_err().est_domaine());
    assert!(calculer("factorial(10**6)", Contexte::Bureau).unwrap_err().est_domaine());

    // accepté : 100 chiffres
    let big = "9".repeat(100);
    let r = ok(&format!("{big} + 1"), Contexte::Bureau);
    assert_eq!(r, format!("1{}", "0".repeat(100)));
    budget(t0, max);
}

#[test]
fn sci_trace_ne_casse_pas_sur_les_asymptotes() {
    let c = tracer("tan(x)", -10.0, 10.0).unwrap();
    assert_eq!(c.len(), NB_ECHANTILLONS);
    assert!(c.ys.iter().all(|y| y.is_finite()));

    let c = tracer("1/(x-1)", 0.0, 2.0).unwrap();
    assert!(!c.segments().is_empty());
}
