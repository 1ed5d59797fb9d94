// src/noyau/expr.rs
//
// Arbre d’évaluation (minimal, pas une grammaire complète).
// - Nombre : entier exact ou réel
// - Const  : pi, e (résolues via la table)
// - Var    : la variable libre x
// - Appel  : fonction de la table + arguments (arité déjà vérifiée au parse)
//
// IMPORTANT (SAFE):
// - un Expr ne peut contenir QUE des symboles résolus par TableSymboles ;
//   il n’existe pas de nœud “nom libre”.

use std::fmt;

use super::table::{Constante, Fonction, VARIABLE};
use super::valeur::Valeur;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(Valeur),
    Const(Constante),
    Var,

    Neg(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    Appel(Fonction, Vec<Expr>),
}

impl Expr {
    /// Détecte si l’expression dépend de x.
    /// Itératif + garde-fou : si l’arbre est trop gros, on répond true (prudent).
    pub fn contient_var(&self) -> bool {
        use Expr::*;

        const MAX_NOEUDS: usize = 200_000;

        let mut pile: Vec<&Expr> = Vec::with_capacity(32);
        pile.push(self);
        let mut visites: usize = 0;

        while let Some(e) = pile.pop() {
            visites += 1;
            if visites > MAX_NOEUDS {
                return true;
            }

            match e {
                Var => return true,
                Nombre(_) | Const(_) => {}
                Neg(x) => pile.push(x.as_ref()),
                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Mod(a, b) | Pow(a, b) => {
                    pile.push(a.as_ref());
                    pile.push(b.as_ref());
                }
                Appel(_, args) => pile.extend(args.iter()),
            }
        }

        false
    }

    /// Profondeur de l’arbre (itératif : pas de récursion sur une entrée hostile).
    pub fn profondeur(&self) -> usize {
        use Expr::*;

        let mut pile: Vec<(&Expr, usize)> = vec![(self, 1)];
        let mut max = 0;

        while let Some((e, p)) = pile.pop() {
            max = max.max(p);
            match e {
                Var | Nombre(_) | Const(_) => {}
                Neg(x) => pile.push((x.as_ref(), p + 1)),
                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Mod(a, b) | Pow(a, b) => {
                    pile.push((a.as_ref(), p + 1));
                    pile.push((b.as_ref(), p + 1));
                }
                Appel(_, args) => pile.extend(args.iter().map(|a| (a, p + 1))),
            }
        }

        max
    }
}

/// Affichage compact, entièrement parenthésé (debug / journal).
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Nombre(v) => write!(f, "{v}"),
            Const(c) => f.write_str(c.nom()),
            Var => f.write_str(VARIABLE),
            Neg(x) => write!(f, "(-{x})"),
            Add(a, b) => write!(f, "({a} + {b})"),
            Sub(a, b) => write!(f, "({a} - {b})"),
            Mul(a, b) => write!(f, "({a} * {b})"),
            Div(a, b) => write!(f, "({a} / {b})"),
            Mod(a, b) => write!(f, "({a} % {b})"),
            Pow(a, b) => write!(f, "({a} ** {b})"),
            Appel(fonction, args) => {
                write!(f, "{}(", fonction.nom())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}
