//! Service web (axum) : la calculatrice derrière quatre routes.
//!
//! - GET  /           page HTML (formulaires + fetch)
//! - GET  /health     {status, version}
//! - POST /calculate  expression -> {result, error}
//! - POST /plot       function, x_min, x_max -> {image (PNG base64), error}
//!
//! Aucun état partagé : le routeur n’a pas de `State`.

pub mod erreur;
pub mod handlers;
pub mod modeles;
pub mod rendu;


use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ConfigServeur;
use erreur::ErreurServeur;
use handlers::{calculer_handler, index_handler, sante_handler, tracer_handler};

/// Routeur complet (sans écoute : testable tel quel).
pub fn routeur() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(sante_handler))
        .route("/calculate", post(calculer_handler))
        .route("/plot", post(tracer_handler))
        .layer(TraceLayer::new_for_http())
}

/// Écoute sur `config.adresse()` jusqu’à l’arrêt du processus.
pub async fn demarrer_serveur(config: ConfigServeur) -> Result<(), ErreurServeur> {
    let adresse = config.adresse();
    let ecouteur = tokio::net::TcpListener::bind(adresse)
        .await
        .map_err(|source| ErreurServeur::Ecoute { adresse, source })?;

    info!("calculatrice web sur http://{adresse}");
    axum::serve(ecouteur, routeur()).await?;
    Ok(())
}

/// Point d’entrée synchrone : construit le runtime tokio puis sert.
pub fn lancer(config: ConfigServeur) -> Result<(), ErreurServeur> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(demarrer_serveur(config))
}
