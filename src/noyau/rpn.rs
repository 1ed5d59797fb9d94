// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr en résolvant chaque nom contre la table
//
// Règles:
// - Ident(name) suivi de '(' => appel de fonction (arité comptée aux virgules)
// - Ident(name) sinon        => constante ou variable
// - '-' / '+' quand on n’attend PAS d’opérateur => unaire (Neg/Pos)
// - Priorités : + - < * / % < unaire < ** (associatif à droite)
//   donc -2**2 = -4 et 2**-1 = 0.5

use super::erreurs::{ErreurCalc, Resultat};
use super::expr::Expr;
use super::jetons::Tok;
use super::table::TableSymboles;
use super::valeur::Valeur;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash | Tok::Percent => 2,
        Tok::Neg | Tok::Pos => 3,
        Tok::Pow => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Pow | Tok::Neg | Tok::Pos)
}

fn est_operateur(t: &Tok) -> bool {
    precedence(t) > 0
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("nthroot"), LPar, Entier(27), Virgule, Entier(3), RPar]
///   rpn:    [Entier(27), Entier(3), Appel("nthroot", 2)]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // Une entrée par '(' ouverte : Some(nb_virgules) si c’est une parenthèse d’appel.
    let mut parentheses: Vec<Option<usize>> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter les unaires et les opérandes manquants.
    let mut prev_was_value = false;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Entier(_) | Tok::Reel(_) => {
                if prev_was_value {
                    return Err(ErreurCalc::expression("opérateur manquant entre deux valeurs"));
                }
                out.push(tok.clone());
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(ErreurCalc::expression("opérateur manquant entre deux valeurs"));
                }
                if matches!(tokens.get(i + 1), Some(Tok::LPar)) {
                    // appel : reste sur la pile jusqu’à sa parenthèse fermante
                    ops.push(Tok::Appel(name.clone(), 0));
                    prev_was_value = false;
                } else {
                    out.push(tok.clone());
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurCalc::expression("opérateur manquant avant '('"));
                }
                let appel = matches!(ops.last(), Some(Tok::Appel(_, _)));
                parentheses.push(if appel { Some(0) } else { None });
                ops.push(Tok::LPar);
                prev_was_value = false;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err(ErreurCalc::expression("argument manquant avant ','"));
                }
                match parentheses.last_mut() {
                    Some(Some(n)) => *n += 1,
                    _ => return Err(ErreurCalc::expression("virgule hors d’un appel de fonction")),
                }
                depiler_jusqu_a_parenthese(&mut ops, &mut out, false)?;
                prev_was_value = false;
            }

            Tok::RPar => {
                let kind = parentheses
                    .pop()
                    .ok_or_else(|| ErreurCalc::expression("parenthèse fermante en trop"))?;

                match kind {
                    None if !prev_was_value => {
                        return Err(ErreurCalc::expression("parenthèses vides"));
                    }
                    Some(n) if !prev_was_value && n > 0 => {
                        return Err(ErreurCalc::expression("argument manquant avant ')'"));
                    }
                    _ => {}
                }

                depiler_jusqu_a_parenthese(&mut ops, &mut out, true)?;

                // appel : on sort la fonction avec son nombre d’arguments
                if let Some(virgules) = kind {
                    let nb_args = if prev_was_value { virgules + 1 } else { 0 };
                    match ops.pop() {
                        Some(Tok::Appel(name, _)) => out.push(Tok::Appel(name, nb_args)),
                        _ => return Err(ErreurCalc::expression("appel de fonction mal formé")),
                    }
                }

                prev_was_value = true;
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // unaire : préfixe, on ne dépile rien
                ops.push(if matches!(tok, Tok::Minus) { Tok::Neg } else { Tok::Pos });
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::Pow => {
                if !prev_was_value {
                    return Err(ErreurCalc::expression(format!(
                        "opérande manquant avant '{}'",
                        super::jetons::format_tokens(std::slice::from_ref(tok))
                    )));
                }

                // dépile tant que la précédence/associativité l’exige
                // (jamais à travers une '(' ni une fonction en attente)
                while let Some(top) = ops.last() {
                    if !est_operateur(top) {
                        break;
                    }
                    let p_top = precedence(top);
                    let p_tok = precedence(tok);

                    let doit_pop = if is_right_associative(tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    match (doit_pop, ops.pop()) {
                        (true, Some(op)) => out.push(op),
                        (false, Some(op)) => {
                            ops.push(op);
                            break;
                        }
                        (_, None) => break,
                    }
                }

                ops.push(tok.clone());
                prev_was_value = false;
            }

            Tok::Neg | Tok::Pos | Tok::Appel(_, _) => {
                return Err(ErreurCalc::expression("jeton interne inattendu"));
            }
        }
    }

    if !tokens.is_empty() && !prev_was_value {
        return Err(ErreurCalc::expression("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ErreurCalc::expression("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

/// Dépile les opérateurs jusqu’à la '(' courante.
/// `retirer` : la '(' est consommée (')') ou laissée en place (',').
fn depiler_jusqu_a_parenthese(ops: &mut Vec<Tok>, out: &mut Vec<Tok>, retirer: bool) -> Resultat<()> {
    loop {
        match ops.pop() {
            Some(Tok::LPar) => {
                if !retirer {
                    ops.push(Tok::LPar);
                }
                return Ok(());
            }
            Some(op) => out.push(op),
            None => return Err(ErreurCalc::expression("parenthèses déséquilibrées")),
        }
    }
}

/// Construit une Expr à partir d’une RPN, en résolvant les noms contre `table`.
///
/// - Ident(name)    : constante (pi, e) ou variable x si la table l’accepte
/// - Appel(name, n) : fonction de la table, arité vérifiée
/// - tout autre nom : ErreurCalc::Expression (rien n’est résolu hors table)
pub fn from_rpn(rpn: &[Tok], table: &TableSymboles) -> Resultat<Expr> {
    let mut st: Vec<Expr> = Vec::new();

    for tok in rpn.iter() {
        match tok {
            Tok::Entier(n) => st.push(Expr::Nombre(Valeur::Entier(n.clone()))),
            Tok::Reel(v) => st.push(Expr::Nombre(Valeur::Reel(*v))),

            Tok::Ident(name) => {
                if let Some(c) = table.constante(name) {
                    st.push(Expr::Const(c));
                } else if table.accepte_variable(name) {
                    st.push(Expr::Var);
                } else if table.fonction(name).is_some() {
                    return Err(ErreurCalc::expression(format!(
                        "la fonction {name} doit être appelée avec des parenthèses"
                    )));
                } else {
                    return Err(ErreurCalc::expression(format!(
                        "nom inconnu : {name} (autorisés : {})",
                        table.noms().join(", ")
                    )));
                }
            }

            Tok::Appel(name, nb_args) => {
                let f = table.fonction(name).ok_or_else(|| {
                    ErreurCalc::expression(format!("fonction non autorisée : {name}"))
                })?;
                if f.arite() != *nb_args {
                    return Err(ErreurCalc::expression(format!(
                        "{name} attend {} argument(s), reçu {nb_args}",
                        f.arite()
                    )));
                }
                if st.len() < *nb_args {
                    return Err(ErreurCalc::expression("expression invalide"));
                }
                let args = st.split_off(st.len() - nb_args);
                st.push(Expr::Appel(f, args));
            }

            Tok::Neg | Tok::Pos => {
                let x = st.pop().ok_or_else(|| ErreurCalc::expression("expression invalide"))?;
                if matches!(tok, Tok::Neg) {
                    st.push(Expr::Neg(Box::new(x)));
                } else {
                    st.push(x);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::Pow => {
                let b = st.pop().ok_or_else(|| ErreurCalc::expression("expression invalide"))?;
                let a = st.pop().ok_or_else(|| ErreurCalc::expression("expression invalide"))?;

                let (a, b) = (Box::new(a), Box::new(b));
                let e = match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    Tok::Percent => {
                        if !table.modulo_autorise() {
                            return Err(ErreurCalc::expression("opérateur '%' non autorisé ici"));
                        }
                        Expr::Mod(a, b)
                    }
                    _ => Expr::Pow(a, b),
                };

                st.push(e);
            }

            Tok::LPar | Tok::RPar | Tok::Virgule => {
                return Err(ErreurCalc::expression("parenthèse inattendue en RPN"));
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(e), true) => Ok(e),
        _ => Err(ErreurCalc::expression("expression invalide")),
    }
}
