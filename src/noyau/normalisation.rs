// src/noyau/normalisation.rs
//
// Normalisation de l’entrée (notation “humaine” -> forme canonique)
// ----------------------------------------------------------------
// Ordre (stable, sinon on recasse le texte déjà normalisé) :
//   1) protection des fonctions connues : "sin(" -> jeton privé (U+E000…)
//   2) multiplication implicite, en une seule passe gauche -> droite :
//        chiffre suivi d’une lettre/fonction   : 2x   -> 2*x,  2sin( -> 2*sin(
//        ')' suivi de lettre/chiffre/'('/fct   : )x   -> )*x,  )(    -> )*(
//        chiffre/identifiant suivi de '('     : 2(   -> 2*(,  x(    -> x*(
//      un littéral "1e-05" / "2.5E+3" est recopié tel quel (e n’y est pas la constante)
//   3) restauration des fonctions (alias : ln( -> log( )
//   4) '^' -> '**'
//   5) '%' -> '/100' (contexte Web seulement)
//
// La normalisation ne refuse rien : une entrée mal formée passe telle quelle,
// c’est l’évaluateur qui tranchera.

use tracing::debug;

/// Contexte d’appel : les front-ends ne traitent pas '%' de la même façon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contexte {
    /// Calculatrice bureau : '%' reste l’opérateur modulo.
    Bureau,
    /// Formulaire web /calculate : '%' = pourcentage (/100).
    Web,
    /// Tracé de fonction (bureau + web /plot).
    Trace,
}

/// Fonctions protégées contre la multiplication implicite.
/// Le nom restauré peut différer (alias) : ln( -> log(.
const FONCTIONS_PROTEGEES: [(&str, &str); 11] = [
    ("factorial", "factorial("),
    ("nthroot", "nthroot("),
    ("log10", "log10("),
    ("sqrt", "sqrt("),
    ("sin", "sin("),
    ("cos", "cos("),
    ("tan", "tan("),
    ("exp", "exp("),
    ("abs", "abs("),
    ("log", "log("),
    ("ln", "log("),
];

/// Jetons de la zone d’usage privé : un par entrée de FONCTIONS_PROTEGEES.
/// Le tokenizer refuse ces caractères, donc aucune collision possible avec l’entrée.
const JETONS: [char; 11] = [
    '\u{E000}', '\u{E001}', '\u{E002}', '\u{E003}', '\u{E004}', '\u{E005}', '\u{E006}',
    '\u{E007}', '\u{E008}', '\u{E009}', '\u{E00A}',
];

/// API publique : forme canonique de `entree` pour le contexte donné.
pub fn normaliser(entree: &str, contexte: Contexte) -> String {
    let protege = proteger_fonctions(entree);
    let avec_mul = inserer_multiplications(&protege);
    let restaure = restaurer_fonctions(&avec_mul);

    let mut canon = restaure.replace('^', "**");
    if contexte == Contexte::Web && canon.contains('%') {
        canon = canon.replace('%', "/100");
    }

    debug!(entree, canon = %canon, ?contexte, "normalisation");
    canon
}

/// Web /plot : si seule la variable `y` est utilisée, elle devient `x`.
/// Travaille sur les identifiants entiers (ne touche pas un `y` dans un autre nom).
pub fn variable_y_vers_x(entree: &str) -> String {
    let ids = identifiants(entree);
    let a_y = ids.iter().any(|(_, _, w)| w == "y");
    let a_x = ids.iter().any(|(_, _, w)| w == "x");
    if !a_y || a_x {
        return entree.to_string();
    }

    let mut out = String::with_capacity(entree.len());
    let mut dernier = 0;
    for (debut, fin, w) in ids {
        if w == "y" {
            out.push_str(&entree[dernier..debut]);
            out.push('x');
            dernier = fin;
        }
    }
    out.push_str(&entree[dernier..]);
    out
}

/* ------------------------ Étape 1 : protection ------------------------ */

fn est_car_identifiant(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn est_jeton(c: char) -> bool {
    JETONS.contains(&c)
}

fn proteger_fonctions(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    'boucle: while i < chars.len() {
        // frontière : pas de lettre juste avant ("asin(" n’est pas "sin(")
        let colle = i > 0 && (chars[i - 1].is_ascii_alphabetic() || chars[i - 1] == '_');
        if !colle {
            for (k, (nom, _)) in FONCTIONS_PROTEGEES.iter().enumerate() {
                if appel_a(&chars, i, nom) {
                    out.push(JETONS[k]);
                    i += nom.len() + 1; // nom + '('
                    continue 'boucle;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Vrai si `chars[i..]` commence par `nom(` (casse ignorée, le tokenizer met en minuscules).
fn appel_a(chars: &[char], i: usize, nom: &str) -> bool {
    let n = nom.len();
    if i + n >= chars.len() {
        return false;
    }
    nom.chars()
        .zip(&chars[i..i + n])
        .all(|(a, b)| a.eq_ignore_ascii_case(b))
        && chars[i + n] == '('
}

/* ------------------------ Étape 2 : multiplication implicite ------------------------ */

fn doit_inserer(a: char, b: char) -> bool {
    // chiffre suivi d’une lettre ou d’une fonction protégée
    if a.is_ascii_digit() && (b.is_ascii_alphabetic() || est_jeton(b)) {
        return true;
    }
    // ')' suivi d’un atome ou d’une ouverture
    if a == ')' && (b.is_ascii_alphanumeric() || b == '_' || b == '(' || est_jeton(b)) {
        return true;
    }
    // chiffre / identifiant suivi de '(' (les vraies fonctions sont déjà masquées)
    est_car_identifiant(a) && b == '('
}

fn inserer_multiplications(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        // un littéral se recopie d’un bloc : l’exposant de "1e-05" n’est pas la constante e
        let fin = if debut_nombre(&chars, i) { fin_nombre(&chars, i) } else { i + 1 };
        out.extend(&chars[i..fin]);
        if let Some(&suivant) = chars.get(fin) {
            if doit_inserer(chars[fin - 1], suivant) {
                out.push('*');
            }
        }
        i = fin;
    }

    out
}

/// Un nombre commence ici (et pas au milieu d’un identifiant comme `x2`).
fn debut_nombre(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    let amorce = c.is_ascii_digit()
        || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()));
    amorce && (i == 0 || !est_car_identifiant(chars[i - 1]))
}

/// Fin d’un littéral : chiffres, partie décimale, exposant `e[+-]chiffres`.
/// Même découpage que le tokenizer : "2e" et "2ex" s’arrêtent avant le `e`.
fn fin_nombre(chars: &[char], debut: usize) -> usize {
    let chiffres = |mut i: usize| {
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = chiffres(debut);
    if chars.get(i) == Some(&'.') {
        i = chiffres(i + 1);
    }
    if matches!(chars.get(i), Some('e' | 'E')) {
        let mut j = i + 1;
        if matches!(chars.get(j), Some('+' | '-')) {
            j += 1;
        }
        if chars.get(j).is_some_and(|d| d.is_ascii_digit()) {
            i = chiffres(j);
        }
    }
    i
}

/* ------------------------ Étape 3 : restauration ------------------------ */

fn restaurer_fonctions(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match JETONS.iter().position(|j| *j == c) {
            Some(k) => out.push_str(FONCTIONS_PROTEGEES[k].1),
            None => out.push(c),
        }
    }
    out
}

/* ------------------------ Identifiants (début, fin, mot) ------------------------ */

fn identifiants(s: &str) -> Vec<(usize, usize, String)> {
    let mut out = Vec::new();
    let mut it = s.char_indices().peekable();

    while let Some((i, c)) = it.next() {
        if c.is_ascii_digit() {
            // nombre : chiffres + point ("2y" garde y comme identifiant)
            while let Some(&(_, d)) = it.peek() {
                if d.is_ascii_digit() || d == '.' {
                    it.next();
                } else {
                    break;
                }
            }
            // exposant "e-05" : fait partie du nombre, pas un identifiant
            let mut essai = it.clone();
            if matches!(essai.next(), Some((_, 'e' | 'E'))) {
                if matches!(essai.peek(), Some((_, '+' | '-'))) {
                    essai.next();
                }
                if matches!(essai.peek(), Some((_, d)) if d.is_ascii_digit()) {
                    while matches!(essai.peek(), Some((_, d)) if d.is_ascii_digit()) {
                        essai.next();
                    }
                    it = essai;
                }
            }
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let mut fin = i + c.len_utf8();
            while let Some(&(j, d)) = it.peek() {
                if est_car_identifiant(d) {
                    fin = j + d.len_utf8();
                    it.next();
                } else {
                    break;
                }
            }
            out.push((i, fin, s[i..fin].to_string()));
        }
    }

    out
}
