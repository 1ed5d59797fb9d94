//! Noyau de la calculatrice (sans UI, sans E/S)
//!
//! Organisation interne :
//! - normalisation.rs : notation humaine -> forme canonique (2x -> 2*x, ^ -> **)
//! - jetons.rs        : tokenisation
//! - rpn.rs           : shunting-yard + construction Expr (noms résolus)
//! - table.rs         : liste blanche des fonctions / constantes
//! - expr.rs          : arbre d’évaluation
//! - valeur.rs        : entier exact / réel, opérations et affichage
//! - eval.rs          : évaluation scalaire et vecteur
//! - trace.rs         : échantillonnage des courbes
//! - solveur.rs       : équations en x (second degré, Brent)
//! - erreurs.rs       : ErreurCalc

pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod normalisation;
pub mod rpn;
pub mod solveur;
pub mod table;
pub mod trace;
pub mod valeur;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreurs::ErreurCalc;
pub use eval::calculer;
pub use normalisation::{variable_y_vers_x, Contexte};
pub use solveur::{format_solution, resoudre};
pub use trace::{Courbe, DemandeTrace};
pub use valeur::Valeur;
