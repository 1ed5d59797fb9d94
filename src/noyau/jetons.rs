// src/noyau/jetons.rs

use num_bigint::BigInt;

use super::erreurs::{ErreurCalc, Resultat};
use super::valeur::format_reel;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Entier(BigInt),
    Reel(f64),

    // Fonctions, constantes, variable : tout ce qui n’est pas nombre / opérateur.
    // NOTE: le parse (RPN->Expr) résout le nom contre la table des symboles.
    Ident(String),

    // Produit par to_rpn seulement : appel de fonction (nom, nombre d’arguments).
    Appel(String, usize),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow, // ** ou ^

    // Moins/plus unaires : produits par to_rpn seulement.
    Neg,
    Pos,

    LPar,
    RPar,
    Virgule,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers (ex: 12) et décimaux (ex: 1.5, .5, 2., 1e3, 2.5E-2)
/// - opérateurs + - * / % ** ^
/// - parenthèses ( ) et virgule (arguments)
/// - π (équivaut à ident("pi"))
/// - √ (équivaut à ident("sqrt"))
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs + ponctuation
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Pow),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // '*' ou '**'
        if c == '*' {
            if i + 1 < chars.len() && chars[i + 1] == '*' {
                out.push(Tok::Pow);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        // π et √ (symboles unicode des boutons)
        if c == 'π' {
            out.push(Tok::Ident("pi".to_string()));
            i += 1;
            continue;
        }
        if c == '√' {
            out.push(Tok::Ident("sqrt".to_string()));
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombre : entier, ou décimal si '.' / exposant
        if c.is_ascii_digit() || c == '.' {
            let (tok, suivant) = lire_nombre(&chars, i)?;
            out.push(tok);
            i = suivant;
            continue;
        }

        return Err(ErreurCalc::expression(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Lit un nombre à partir de `debut`. Renvoie le jeton et l’indice suivant.
fn lire_nombre(chars: &[char], debut: usize) -> Resultat<(Tok, usize)> {
    let mut i = debut;
    let mut decimal = false;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        decimal = true;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    // exposant seulement s’il est suivi d’au moins un chiffre (sinon "2e" = 2 puis e)
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            decimal = true;
            i = j;
        }
    }

    let texte: String = chars[debut..i].iter().collect();
    if texte == "." {
        return Err(ErreurCalc::expression("nombre invalide: '.'"));
    }

    if decimal {
        let v: f64 = texte
            .parse()
            .map_err(|_| ErreurCalc::expression(format!("nombre invalide: '{texte}'")))?;
        Ok((Tok::Reel(v), i))
    } else {
        let n = BigInt::parse_bytes(texte.as_bytes(), 10)
            .ok_or_else(|| ErreurCalc::expression(format!("nombre invalide: '{texte}'")))?;
        Ok((Tok::Entier(n), i))
    }
}

/// Format utilitaire (debug) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Entier(n) => n.to_string(),
            Tok::Reel(v) => format_reel(*v),
            Tok::Ident(name) => name.clone(),
            Tok::Appel(name, n) => format!("{name}/{n}"),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::Pow => "**".to_string(),
            Tok::Neg => "neg".to_string(),
            Tok::Pos => "pos".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Virgule => ",".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
