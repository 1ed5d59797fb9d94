//! Formulaires reçus et réponses JSON du service web.

use serde::{Deserialize, Serialize};

/* ---- requêtes (application/x-www-form-urlencoded) ---- */

/// Corps de POST /calculate.
#[derive(Debug, Default, Deserialize)]
pub struct FormulaireCalcul {
    #[serde(default)]
    pub expression: String,
}

/// Corps de POST /plot. Les bornes restent du texte : leur lecture peut échouer
/// et l’échec doit revenir dans le JSON, pas en 422.
#[derive(Debug, Default, Deserialize)]
pub struct FormulaireTrace {
    pub function: Option<String>,
    pub x_min: Option<String>,
    pub x_max: Option<String>,
}

impl FormulaireTrace {
    pub fn fonction(&self) -> &str {
        self.function.as_deref().unwrap_or("x")
    }

    pub fn x_min(&self) -> &str {
        self.x_min.as_deref().unwrap_or("-10")
    }

    pub fn x_max(&self) -> &str {
        self.x_max.as_deref().unwrap_or("10")
    }
}

/* ---- réponses ---- */

/// `{result, error}` : exactement un des deux est non nul.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReponseCalcul {
    pub result: Option<String>,
    pub error: Option<String>,
}

impl ReponseCalcul {
    pub fn succes(result: String) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn echec(error: impl ToString) -> Self {
        Self {
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// `{image, error}` ; `image` est un PNG encodé en base64.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ReponseTrace {
    pub image: Option<String>,
    pub error: Option<String>,
}

impl ReponseTrace {
    pub fn succes(image: String) -> Self {
        Self {
            image: Some(image),
            error: None,
        }
    }

    pub fn echec(error: impl ToString) -> Self {
        Self {
            image: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReponseSante {
    pub status: &'static str,
    pub version: &'static str,
}
