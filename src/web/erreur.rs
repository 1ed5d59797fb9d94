//! Erreurs de la couche web.
//!
//! Les erreurs de calcul ne passent PAS par ici : elles voyagent dans le corps
//! JSON (`error`) avec un statut 200. Seuls le démarrage du serveur et le rendu
//! PNG ont leurs propres types.

use std::net::SocketAddr;

use thiserror::Error;

/// Échecs du serveur lui-même (écoute, exécution).
#[derive(Debug, Error)]
pub enum ErreurServeur {
    #[error("impossible d’écouter sur {adresse} : {source}")]
    Ecoute {
        adresse: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("erreur d’entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}

/// Échecs du rendu d’une courbe en PNG.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErreurRendu {
    #[error("dessin impossible : {0}")]
    Dessin(String),

    #[error("fenêtre trop étendue pour le rendu (largeur hors des f64)")]
    Fenetre,

    #[error("tampon image invalide")]
    Tampon,

    #[error("encodage PNG impossible : {0}")]
    Encodage(String),
}

/// Tout ce qui peut faire échouer POST /plot ; le message part dans `error`.
#[derive(Debug, Error)]
pub enum ErreurTrace {
    #[error(transparent)]
    Calcul(#[from] crate::noyau::ErreurCalc),

    #[error(transparent)]
    Rendu(#[from] ErreurRendu),

    #[error("tâche de rendu interrompue : {0}")]
    Tache(String),
}
