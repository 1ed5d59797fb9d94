// src/main.rs
//
// Calculatrice scientifique : point d’entrée
// -------------------------------------------
//   calculatrice            -> application bureau (eframe)
//   calculatrice web …      -> service HTTP (axum)
//
// Journal : tracing-subscriber, filtre RUST_LOG sinon info (debug avec --debug).

use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod noyau;
mod web;

use app::AppCalc;
use config::{Cli, Commande};
use web::erreur::ErreurServeur;

const TITRE_APP: &str = "Calculatrice scientifique";

#[derive(Debug, Error)]
enum ErreurLancement {
    #[error("application bureau : {0}")]
    Bureau(#[from] eframe::Error),

    #[error("service web : {0}")]
    Web(#[from] ErreurServeur),
}

fn initialiser_journal(debug: bool) {
    let defaut = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(defaut)))
        .init();
}

fn lancer_bureau() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([380.0, 640.0])
            .with_min_inner_size([340.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppCalc>::default())),
    )
}

fn executer(commande: Commande) -> Result<(), ErreurLancement> {
    match commande {
        Commande::Bureau { .. } => {
            info!("démarrage de l’application bureau");
            lancer_bureau()?;
        }
        Commande::Web(config) => web::lancer(config)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let commande = Cli::parse().commande();
    initialiser_journal(commande.debug());

    match executer(commande) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
