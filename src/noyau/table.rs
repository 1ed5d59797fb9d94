// src/noyau/table.rs
//
// Table des symboles (liste blanche) : nom -> implémentation.
// C’est la SEULE porte d’entrée vers des fonctions : aucun nom hors table ne
// peut être résolu par le parse (rpn.rs), donc rien d’autre n’est atteignable.
//
// - trace()    : sin cos tan exp sqrt log log10 abs + pi e + variable x
// - scalaire() : idem + factorial + nthroot + opérateur '%' (sans variable)

/// Fonctions connues (dispatch explicite, pas de réflexion).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Exp,
    Sqrt,
    Log, // logarithme naturel
    Log10,
    Abs,
    Factorielle,
    RacineN, // nthroot(x, n)
}

impl Fonction {
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Exp => "exp",
            Fonction::Sqrt => "sqrt",
            Fonction::Log => "log",
            Fonction::Log10 => "log10",
            Fonction::Abs => "abs",
            Fonction::Factorielle => "factorial",
            Fonction::RacineN => "nthroot",
        }
    }

    /// Nombre d’arguments attendus.
    pub fn arite(self) -> usize {
        match self {
            Fonction::RacineN => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constante {
    Pi,
    E,
}

impl Constante {
    pub fn nom(self) -> &'static str {
        match self {
            Constante::Pi => "pi",
            Constante::E => "e",
        }
    }

    pub fn valeur(self) -> f64 {
        match self {
            Constante::Pi => std::f64::consts::PI,
            Constante::E => std::f64::consts::E,
        }
    }
}

const FONCTIONS_BASE: &[Fonction] = &[
    Fonction::Sin,
    Fonction::Cos,
    Fonction::Tan,
    Fonction::Exp,
    Fonction::Sqrt,
    Fonction::Log,
    Fonction::Log10,
    Fonction::Abs,
];

const FONCTIONS_SCALAIRES: &[Fonction] = &[
    Fonction::Sin,
    Fonction::Cos,
    Fonction::Tan,
    Fonction::Exp,
    Fonction::Sqrt,
    Fonction::Log,
    Fonction::Log10,
    Fonction::Abs,
    Fonction::Factorielle,
    Fonction::RacineN,
];

const CONSTANTES: &[Constante] = &[Constante::Pi, Constante::E];

/// Nom de l’unique variable libre.
pub const VARIABLE: &str = "x";

/// Contexte d’évaluation : fixe, lecture seule, construit par appel.
#[derive(Clone, Copy, Debug)]
pub struct TableSymboles {
    fonctions: &'static [Fonction],
    modulo: bool,
    variable: bool,
}

impl TableSymboles {
    /// Tracé : fonctions de base + variable x, pas de '%'.
    pub const fn trace() -> Self {
        Self {
            fonctions: FONCTIONS_BASE,
            modulo: false,
            variable: true,
        }
    }

    /// Calculatrice : fonctions de base + factorial + nthroot + '%', sans variable.
    pub const fn scalaire() -> Self {
        Self {
            fonctions: FONCTIONS_SCALAIRES,
            modulo: true,
            variable: false,
        }
    }

    /// Même table, avec la variable x liée (solveur).
    pub const fn avec_variable(self) -> Self {
        Self {
            variable: true,
            ..self
        }
    }

    pub fn fonction(&self, nom: &str) -> Option<Fonction> {
        self.fonctions.iter().copied().find(|f| f.nom() == nom)
    }

    pub fn constante(&self, nom: &str) -> Option<Constante> {
        CONSTANTES.iter().copied().find(|c| c.nom() == nom)
    }

    pub fn accepte_variable(&self, nom: &str) -> bool {
        self.variable && nom == VARIABLE
    }

    pub fn modulo_autorise(&self) -> bool {
        self.modulo
    }

    /// Noms exposés (pour l’aide / les messages).
    pub fn noms(&self) -> Vec<&'static str> {
        let mut v: Vec<&'static str> = self.fonctions.iter().map(|f| f.nom()).collect();
        v.extend(CONSTANTES.iter().map(|c| c.nom()));
        if self.variable {
            v.push(VARIABLE);
        }
        v
    }
}
