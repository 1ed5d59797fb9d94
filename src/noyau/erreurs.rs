// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - Expression   : entrée illisible ou hors liste blanche
// - Domaine      : opération indéfinie sur une syntaxe valide (√-1, 1/0, 3.5!)
// - Intervalle   : bornes de tracé invalides
// - AucuneRacine : le solveur ne trouve pas de changement de signe
//
// Chaque opération publique renvoie Result<_, ErreurCalc> ; la présentation
// (vue egui ou JSON) affiche simplement le message.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ErreurCalc {
    #[error("expression invalide : {0}")]
    Expression(String),

    #[error("erreur de domaine : {0}")]
    Domaine(String),

    #[error("intervalle invalide : {0}")]
    Intervalle(String),

    #[error("aucune racine trouvée : {0}")]
    AucuneRacine(String),
}

impl ErreurCalc {
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    pub fn domaine(msg: impl Into<String>) -> Self {
        Self::Domaine(msg.into())
    }

    pub fn intervalle(msg: impl Into<String>) -> Self {
        Self::Intervalle(msg.into())
    }

    /// Vrai pour les erreurs “mathématiques” (la syntaxe était correcte).
    pub fn est_domaine(&self) -> bool {
        matches!(self, Self::Domaine(_))
    }
}

pub type Resultat<T> = Result<T, ErreurCalc>;
