// src/config.rs
//
// Ligne de commande + variables d’environnement.
//   calculatrice                 -> application bureau
//   calculatrice bureau          -> idem
//   calculatrice web [--hote …] [--port …] [--debug]
//
// Valeurs par défaut : 127.0.0.1:5000, debug désactivé.

use std::net::{IpAddr, SocketAddr};

use clap::{Args, Parser, Subcommand};

pub const HOTE_DEFAUT: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);
pub const PORT_DEFAUT: u16 = 5000;

#[derive(Parser, Debug, Clone)]
#[command(name = "calculatrice")]
#[command(about = "Calculatrice scientifique : application bureau ou service web")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub commande: Option<Commande>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commande {
    /// Application bureau (par défaut)
    Bureau {
        /// Journal détaillé (niveau debug)
        #[arg(long, env = "CALC_DEBUG")]
        debug: bool,
    },
    /// Service web : /calculate, /plot
    Web(ConfigServeur),
}

impl Cli {
    /// Sans sous-commande : bureau.
    pub fn commande(&self) -> Commande {
        self.commande
            .clone()
            .unwrap_or(Commande::Bureau { debug: false })
    }
}

impl Commande {
    pub fn debug(&self) -> bool {
        match self {
            Commande::Bureau { debug } => *debug,
            Commande::Web(config) => config.debug,
        }
    }
}

/// Configuration du service web.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConfigServeur {
    /// Adresse d’écoute
    #[arg(long, env = "CALC_HOTE", default_value_t = HOTE_DEFAUT)]
    pub hote: IpAddr,

    /// Port d’écoute
    #[arg(long, short, env = "CALC_PORT", default_value_t = PORT_DEFAUT)]
    pub port: u16,

    /// Journal détaillé (niveau debug)
    #[arg(long, env = "CALC_DEBUG")]
    pub debug: bool,
}

impl Default for ConfigServeur {
    fn default() -> Self {
        Self {
            hote: HOTE_DEFAUT,
            port: PORT_DEFAUT,
            debug: false,
        }
    }
}

impl ConfigServeur {
    pub fn adresse(&self) -> SocketAddr {
        SocketAddr::from((self.hote, self.port))
    }
}
