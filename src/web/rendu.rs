//! Rendu serveur d’une courbe : PNG 800×600 encodé en base64.
//!
//! Pas de texte (pas de police à embarquer) : fond clair, grille, axes en 0,
//! courbe bleue #2196f3 dessinée morceau par morceau (trous aux NaN).

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;

use super::erreur::ErreurRendu;
use crate::noyau::trace::graduations;
use crate::noyau::Courbe;

pub const LARGEUR: u32 = 800;
pub const HAUTEUR: u32 = 600;

const FOND: RGBColor = RGBColor(0xf5, 0xf5, 0xf5);
const ZONE: RGBColor = RGBColor(0xff, 0xff, 0xff);
const GRILLE: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);
const AXES: RGBColor = RGBColor(0x44, 0x44, 0x44);
const COURBE: RGBColor = RGBColor(0x21, 0x96, 0xf3);

fn dessin<E: std::fmt::Debug>(e: E) -> ErreurRendu {
    ErreurRendu::Dessin(format!("{e:?}"))
}

/// Courbe -> PNG (octets).
pub fn rendre_png(courbe: &Courbe, x_min: f64, x_max: f64) -> Result<Vec<u8>, ErreurRendu> {
    let (y_min, y_max) = courbe.cadre_y();
    // plotters travaille sur max - min : une étendue infinie rendrait une image vide
    if !(x_max - x_min).is_finite() || !(y_max - y_min).is_finite() {
        return Err(ErreurRendu::Fenetre);
    }
    let mut tampon = vec![0u8; (LARGEUR * HAUTEUR * 3) as usize];

    {
        let racine =
            BitMapBackend::with_buffer(&mut tampon, (LARGEUR, HAUTEUR)).into_drawing_area();
        racine.fill(&FOND).map_err(dessin)?;

        let mut graphe = ChartBuilder::on(&racine)
            .margin(30)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(dessin)?;

        graphe.plotting_area().fill(&ZONE).map_err(dessin)?;

        /* ---- grille ---- */
        for gx in graduations(x_min, x_max) {
            graphe
                .draw_series(LineSeries::new(vec![(gx, y_min), (gx, y_max)], &GRILLE))
                .map_err(dessin)?;
        }
        for gy in graduations(y_min, y_max) {
            graphe
                .draw_series(LineSeries::new(vec![(x_min, gy), (x_max, gy)], &GRILLE))
                .map_err(dessin)?;
        }

        /* ---- axes (seulement s’ils sont visibles) ---- */
        if (x_min..=x_max).contains(&0.0) {
            graphe
                .draw_series(LineSeries::new(vec![(0.0, y_min), (0.0, y_max)], &AXES))
                .map_err(dessin)?;
        }
        if (y_min..=y_max).contains(&0.0) {
            graphe
                .draw_series(LineSeries::new(vec![(x_min, 0.0), (x_max, 0.0)], &AXES))
                .map_err(dessin)?;
        }

        /* ---- courbe ---- */
        for segment in courbe.segments() {
            graphe
                .draw_series(LineSeries::new(segment, COURBE.stroke_width(2)))
                .map_err(dessin)?;
        }

        racine.present().map_err(dessin)?;
    }

    let image = RgbImage::from_raw(LARGEUR, HAUTEUR, tampon).ok_or(ErreurRendu::Tampon)?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ErreurRendu::Encodage(e.to_string()))?;

    Ok(png)
}

/// Courbe -> PNG -> base64 (champ `image` de /plot).
pub fn png_base64(courbe: &Courbe, x_min: f64, x_max: f64) -> Result<String, ErreurRendu> {
    let png = rendre_png(courbe, x_min, x_max)?;
    Ok(STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::{png_base64, rendre_png, HAUTEUR, LARGEUR};
    use crate::noyau::trace::tracer;
    use crate::web::erreur::ErreurRendu;

    const SIGNATURE_PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn png_valide() {
        let c = tracer("1/x", -5.0, 5.0).unwrap();
        let png = rendre_png(&c, -5.0, 5.0).unwrap();
        assert_eq!(&png[..8], &SIGNATURE_PNG);

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (LARGEUR, HAUTEUR));
    }

    #[test]
    fn png_meme_si_tout_est_indefini() {
        let c = tracer("sqrt(-1 - x**2)", -1.0, 1.0).unwrap();
        assert!(rendre_png(&c, -1.0, 1.0).is_ok());
    }

    #[test]
    fn fenetre_demesuree_refusee() {
        // y va de -1e308 à 1e308 : finis, mais leur écart ne l’est pas
        let c = tracer("10**303*x", -1e5, 1e5).unwrap();
        assert_eq!(rendre_png(&c, -1e5, 1e5), Err(ErreurRendu::Fenetre));

        let c = tracer("x", -1e308, 1e308).unwrap();
        assert_eq!(rendre_png(&c, -1e308, 1e308), Err(ErreurRendu::Fenetre));

        // grand mais représentable : on dessine
        let c = tracer("exp(x)", 0.0, 100.0).unwrap();
        assert!(rendre_png(&c, 0.0, 100.0).is_ok());
    }

    #[test]
    fn base64_sans_retour_a_la_ligne() {
        let c = tracer("x", 0.0, 1.0).unwrap();
        let b64 = png_base64(&c, 0.0, 1.0).unwrap();
        assert!(b64.starts_with("iVBORw0KGgo"));
        assert!(!b64.contains('\n'));
    }
}
