// src/noyau/valeur.rs
//
// Valeur scalaire : entier exact ou réel (f64).
// Sémantique reprise d’un évaluateur “classique” :
// - entier (+ - *) entier       => entier exact
// - '/'                         => toujours réel
// - entier ** entier (>= 0)     => entier exact (borné par BITS_MAX)
// - '%'                         => modulo “plancher” (signe du diviseur)
// - tout le reste               => réel ; non fini => erreur de domaine
//
// Les opérations réelles (div/mod/pow) sont exposées à part : le mode vecteur
// (eval.rs) les réutilise telles quelles, erreurs -> NaN.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use super::erreurs::{ErreurCalc, Resultat};

/// Garde-fou : taille max (en bits) d’un entier produit par '**'.
pub const BITS_MAX: u64 = 100_000;

#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Entier(BigInt),
    Reel(f64),
}

impl Valeur {
    pub fn entier(n: i64) -> Self {
        Valeur::Entier(BigInt::from(n))
    }

    /// Conversion vers f64 (un entier trop grand est une erreur, pas inf).
    pub fn en_f64(&self) -> Resultat<f64> {
        match self {
            Valeur::Reel(v) => Ok(*v),
            Valeur::Entier(n) => n
                .to_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ErreurCalc::domaine("entier trop grand pour un flottant")),
        }
    }

    /// Entier exact si la valeur est entière (3 ou 3.0), sinon None.
    pub fn en_entier(&self) -> Option<BigInt> {
        match self {
            Valeur::Entier(n) => Some(n.clone()),
            // v entier et fini : la conversion est exacte
            Valeur::Reel(v) if v.is_finite() && v.fract() == 0.0 => BigInt::from_f64(*v),
            Valeur::Reel(_) => None,
        }
    }

    pub fn neg(&self) -> Valeur {
        match self {
            Valeur::Entier(n) => Valeur::Entier(-n),
            Valeur::Reel(v) => Valeur::Reel(-v),
        }
    }

    pub fn add(&self, autre: &Valeur) -> Resultat<Valeur> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => Ok(Valeur::Entier(a + b)),
            _ => reel(self.en_f64()? + autre.en_f64()?),
        }
    }

    pub fn sub(&self, autre: &Valeur) -> Resultat<Valeur> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => Ok(Valeur::Entier(a - b)),
            _ => reel(self.en_f64()? - autre.en_f64()?),
        }
    }

    pub fn mul(&self, autre: &Valeur) -> Resultat<Valeur> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => Ok(Valeur::Entier(a * b)),
            _ => reel(self.en_f64()? * autre.en_f64()?),
        }
    }

    pub fn div(&self, autre: &Valeur) -> Resultat<Valeur> {
        if let Valeur::Entier(b) = autre {
            if b.is_zero() {
                return Err(ErreurCalc::domaine("division par zéro"));
            }
        }
        reel(div_reelle(self.en_f64()?, autre.en_f64()?)?)
    }

    pub fn modulo(&self, autre: &Valeur) -> Resultat<Valeur> {
        match (self, autre) {
            (Valeur::Entier(a), Valeur::Entier(b)) => {
                if b.is_zero() {
                    return Err(ErreurCalc::domaine("modulo par zéro"));
                }
                let mut r = a % b;
                if !r.is_zero() && (r.is_negative() != b.is_negative()) {
                    r += b;
                }
                Ok(Valeur::Entier(r))
            }
            _ => reel(mod_reel(self.en_f64()?, autre.en_f64()?)?),
        }
    }

    pub fn puissance(&self, autre: &Valeur) -> Resultat<Valeur> {
        if let (Valeur::Entier(a), Valeur::Entier(b)) = (self, autre) {
            if !b.is_negative() {
                return puissance_entiere(a, b).map(Valeur::Entier);
            }
        }
        reel(puissance_reelle(self.en_f64()?, autre.en_f64()?)?)
    }
}

/// Réel fini, sinon dépassement.
pub fn reel(v: f64) -> Resultat<Valeur> {
    if v.is_finite() {
        Ok(Valeur::Reel(v))
    } else {
        Err(ErreurCalc::domaine("dépassement numérique"))
    }
}

/* ------------------------ Opérations réelles (partagées scalaire/vecteur) ------------------------ */

pub fn div_reelle(a: f64, b: f64) -> Resultat<f64> {
    if b == 0.0 {
        return Err(ErreurCalc::domaine("division par zéro"));
    }
    Ok(a / b)
}

pub fn mod_reel(a: f64, b: f64) -> Resultat<f64> {
    if b == 0.0 {
        return Err(ErreurCalc::domaine("modulo par zéro"));
    }
    let mut r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        r += b;
    }
    Ok(r)
}

pub fn puissance_reelle(a: f64, b: f64) -> Resultat<f64> {
    if a == 0.0 && b < 0.0 {
        return Err(ErreurCalc::domaine("zéro élevé à une puissance négative"));
    }
    if a < 0.0 && b.fract() != 0.0 {
        return Err(ErreurCalc::domaine(
            "puissance fractionnaire d’un nombre négatif",
        ));
    }
    Ok(a.powf(b))
}

fn puissance_entiere(a: &BigInt, b: &BigInt) -> Resultat<BigInt> {
    // bases triviales : pas de garde-fou nécessaire
    if a.is_zero() {
        return Ok(if b.is_zero() { BigInt::one() } else { BigInt::zero() });
    }
    if a.is_one() {
        return Ok(BigInt::one());
    }
    if *a == BigInt::from(-1) {
        let pair = (b % 2u32).is_zero();
        return Ok(if pair { BigInt::one() } else { BigInt::from(-1) });
    }

    let exp = b
        .to_u32()
        .ok_or_else(|| ErreurCalc::domaine("exposant trop grand"))?;
    if a.bits().saturating_mul(u64::from(exp)) > BITS_MAX {
        return Err(ErreurCalc::domaine("résultat trop grand"));
    }
    Ok(a.pow(exp))
}

/* ------------------------ Affichage ------------------------ */

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valeur::Entier(n) => write!(f, "{n}"),
            Valeur::Reel(v) => f.write_str(&format_reel(*v)),
        }
    }
}

/// Réel “à la repr” : plus court aller-retour, toujours une partie décimale,
/// notation exponentielle hors de [1e-4, 1e16) : 4.0, 0.05, 1e-05, 1e+16.
pub fn format_reel(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let a = v.abs();
    if a != 0.0 && !(1e-4..1e16).contains(&a) {
        // "{:e}" donne "1.5e-5" / "1e16" : on ajoute le signe et 2 chiffres mini
        let s = format!("{v:e}");
        if let Some((mantisse, exp)) = s.split_once('e') {
            if let Ok(e) = exp.parse::<i32>() {
                let signe = if e < 0 { '-' } else { '+' };
                return format!("{mantisse}e{signe}{:02}", e.abs());
            }
        }
        return s;
    }

    let s = format!("{v}");
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}
