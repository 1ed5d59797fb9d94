//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - seules deux familles d’erreurs sont permises : Expression et Domaine
//! - invariant clé : vecteur == scalaire, ou NaN là où le scalaire échoue

use std::time::{Duration, Instant};

use super::erreurs::ErreurCalc;
use super::eval::{calculer, evaluer_scalaire, evaluer_vecteur};
use super::normalisation::{normaliser, Contexte};
use super::solveur::resoudre;
use super::table::TableSymboles;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choisir<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.pick(options.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        3 => format!(".{}", 1 + rng.pick(9)),
        4 => format!("{}", 10 + rng.pick(990)),
        _ => rng.choisir(&["pi", "e"]).to_string(),
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    if rng.pick(3) == 0 {
        "x".to_string()
    } else {
        gen_nombre(rng)
    }
}

/// Expression canonique (pas de multiplication implicite).
fn gen_expr(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }

    let p = profondeur - 1;
    match rng.pick(10) {
        0 => gen_atome(rng),
        1 => format!("({}+{})", gen_expr(rng, p), gen_expr(rng, p)),
        2 => format!("({}-{})", gen_expr(rng, p), gen_expr(rng, p)),
        3 => format!("({}*{})", gen_expr(rng, p), gen_expr(rng, p)),
        4 => format!("({}/{})", gen_expr(rng, p), gen_expr(rng, p)),
        5 => {
            let base = gen_expr(rng, p);
            let exposant = rng.choisir(&["2", "3", "0.5", "-1", "x"]);
            format!("({base})**{exposant}")
        }
        6 => format!("-{}", gen_expr(rng, p)),
        _ => {
            let f = rng.choisir(&["sin", "cos", "tan", "exp", "sqrt", "log", "log10", "abs"]);
            format!("{f}({})", gen_expr(rng, p))
        }
    }
}

/// Entrée “humaine” : on supprime au hasard des '*' et on glisse des '^'.
fn humaniser(rng: &mut Rng, canon: &str) -> String {
    let mut out = String::with_capacity(canon.len());
    let mut it = canon.chars().peekable();
    while let Some(c) = it.next() {
        if c == '*' && it.peek() == Some(&'*') {
            it.next();
            out.push_str(if rng.coin() { "^" } else { "**" });
        } else if c == '*' && rng.coin() {
            // multiplication rendue implicite
        } else {
            out.push(c);
        }
    }
    out
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_vecteur_contre_scalaire() {
    let t0 = Instant::now();
    let max = Duration::from_millis(800);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let t = TableSymboles::trace();
    let xs = [-3.5, -1.0, -0.25, 0.0, 0.75, 2.0, 9.5];

    let mut vus_ok = 0usize;
    let mut vus_nan = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let canon = gen_expr(&mut rng, 4);
        let ys = evaluer_vecteur(&canon, &t, &xs)
            .unwrap_or_else(|e| panic!("syntaxe générée refusée: {canon:?} err={e}"));
        assert_eq!(ys.len(), xs.len());

        for (x, y) in xs.iter().zip(&ys) {
            match evaluer_scalaire(&canon, &t, Some(*x)).and_then(|v| v.en_f64()) {
                Ok(s) => {
                    let tol = 1e-9 * s.abs().max(1.0);
                    assert!((s - y).abs() <= tol, "{canon} en x={x}: {s} vs {y}");
                    vus_ok += 1;
                }
                Err(e) => {
                    assert!(e.est_domaine(), "erreur non attendue: {canon} en x={x}: {e}");
                    assert!(y.is_nan(), "{canon} en x={x}: attendu NaN, obtenu {y}");
                    vus_nan += 1;
                }
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(vus_ok > 100, "trop peu de succès: {vus_ok}");
    assert!(vus_nan > 0, "aucun point indéfini: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_normalisation_stable() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let t = TableSymboles::trace();

    for _ in 0..150 {
        budget(t0, max);

        let canon = gen_expr(&mut rng, 3);
        let humain = humaniser(&mut rng, &canon);

        for ctx in [Contexte::Bureau, Contexte::Trace] {
            let une = normaliser(&humain, ctx);
            assert_eq!(une, normaliser(&une, ctx), "idempotence: {humain:?}");
        }

        // jamais de panique ; une erreur est toujours typée
        match evaluer_scalaire(&normaliser(&humain, Contexte::Trace), &t, Some(1.25)) {
            Ok(_) | Err(ErreurCalc::Expression(_)) | Err(ErreurCalc::Domaine(_)) => {}
            Err(e) => panic!("erreur inattendue pour {humain:?}: {e}"),
        }
    }
}

#[test]
fn fuzz_safe_entrees_hostiles() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0x5EED_u64);
    let morceaux = [
        "(", ")", "+", "-", "*", "/", "%", "^", "**", ",", ".", "1", "x", "sin", "(", "e",
        "pi", "nthroot", "factorial", "=", "é", "√", "π", " ", "__", "0", "9e",
    ];

    for _ in 0..400 {
        budget(t0, max);

        let n = 1 + rng.pick(12) as usize;
        let s: String = (0..n).map(|_| rng.choisir(&morceaux)).collect();

        // aucun de ces appels ne doit paniquer
        for ctx in [Contexte::Bureau, Contexte::Web, Contexte::Trace] {
            let _ = calculer(&s, ctx);
        }
        let _ = resoudre(&s);
    }
}

#[test]
fn fuzz_safe_solveur_quadratiques() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut rng = Rng::new(0xFACE_u64);

    for _ in 0..60 {
        budget(t0, max);

        // (x - p)(x - q) = 0 avec p, q entiers : les racines doivent revenir
        let p = rng.pick(21) as i64 - 10;
        let q = rng.pick(21) as i64 - 10;
        let eq = format!("(x - ({p}))(x - ({q})) = 0");

        let r = resoudre(&eq).unwrap_or_else(|e| panic!("{eq}: {e}"));
        let mut obtenus: Vec<f64> = r
            .iter()
            .map(|r| match r {
                super::solveur::Racine::Reelle(v) => *v,
                autre => panic!("{eq}: racine complexe {autre:?}"),
            })
            .collect();
        obtenus.sort_by(|a, b| a.total_cmp(b));

        let mut attendus = [p as f64, q as f64];
        attendus.sort_by(|a, b| a.total_cmp(b));

        for (o, a) in obtenus.iter().zip(&attendus) {
            assert!((o - a).abs() < 1e-6, "{eq}: {obtenus:?}");
        }
    }
}
