//! Handlers HTTP. Sans état : chaque requête est un calcul pur.
//!
//! Les erreurs de calcul répondent 200 avec `error` renseigné ; la page
//! affiche simplement le message.

use axum::response::Html;
use axum::{Form, Json};
use tracing::{debug, warn};

use super::erreur::ErreurTrace;
use super::modeles::{FormulaireCalcul, FormulaireTrace, ReponseCalcul, ReponseSante, ReponseTrace};
use super::rendu::png_base64;
use crate::noyau::{calculer, variable_y_vers_x, Contexte, DemandeTrace, ErreurCalc};

const PAGE: &str = include_str!("page.html");

/// GET /
pub async fn index_handler() -> Html<&'static str> {
    Html(PAGE)
}

/// GET /health
pub async fn sante_handler() -> Json<ReponseSante> {
    Json(ReponseSante {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /calculate
pub async fn calculer_handler(Form(form): Form<FormulaireCalcul>) -> Json<ReponseCalcul> {
    let reponse = match calculer(&form.expression, Contexte::Web) {
        Ok(v) => ReponseCalcul::succes(v.to_string()),
        Err(e) => {
            debug!(expression = %form.expression, domaine = e.est_domaine(), "calcul refusé : {e}");
            ReponseCalcul::echec(e)
        }
    };
    Json(reponse)
}

/// POST /plot
pub async fn tracer_handler(Form(form): Form<FormulaireTrace>) -> Json<ReponseTrace> {
    // échantillonnage + rendu : travail CPU, hors du pool async
    let resultat = tokio::task::spawn_blocking(move || tracer_en_base64(&form))
        .await
        .unwrap_or_else(|e| {
            warn!(erreur = %e, "rendu interrompu");
            Err(ErreurTrace::Tache(e.to_string()))
        });

    let reponse = match resultat {
        Ok(image) => ReponseTrace::succes(image),
        Err(e) => ReponseTrace::echec(e),
    };
    Json(reponse)
}

fn lire_borne(nom: &str, texte: &str) -> Result<f64, ErreurCalc> {
    texte
        .trim()
        .parse::<f64>()
        .map_err(|_| ErreurCalc::intervalle(format!("borne {nom} invalide : {texte:?}")))
}

fn tracer_en_base64(form: &FormulaireTrace) -> Result<String, ErreurTrace> {
    let demande = DemandeTrace {
        fonction: variable_y_vers_x(form.fonction()),
        x_min: lire_borne("x_min", form.x_min())?,
        x_max: lire_borne("x_max", form.x_max())?,
    };

    let courbe = demande.executer()?;
    debug!(fonction = %demande.fonction, points = courbe.len(), "tracé web");
    Ok(png_base64(&courbe, demande.x_min, demande.x_max)?)
}
