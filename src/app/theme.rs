//! src/app/theme.rs
//!
//! Thèmes de la calculatrice : clair, sombre, pastel.
//! Chaque famille de touches a un fond et un texte ; le survol éclaircit le fond de 15 %.

use eframe::egui::{self, Color32};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Clair,
    Sombre,
    Pastel,
}

/// Fond + texte d’une famille de touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Couleurs {
    pub fond: Color32,
    pub texte: Color32,
}

impl Couleurs {
    const fn new(fond: Color32, texte: Color32) -> Self {
        Self { fond, texte }
    }

    pub fn survol(&self) -> Color32 {
        eclaircir(self.fond, ECLAIRCISSEMENT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub fond: Color32,
    pub ecran: Color32,
    pub ecran_texte: Color32,
    pub historique: Color32,
    pub chiffre: Couleurs,
    pub operation: Couleurs,
    pub egal: Couleurs,
    pub effacer: Couleurs,
    pub fonction: Couleurs,
}

/// Survol des touches.
pub const ECLAIRCISSEMENT: f32 = 0.15;

const fn hex(rgb: u32) -> Color32 {
    Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

const CLAIR: Palette = Palette {
    fond: hex(0xf5f5f5),
    ecran: hex(0xf5f5f5),
    ecran_texte: hex(0x212121),
    historique: hex(0x9e9e9e),
    chiffre: Couleurs::new(hex(0xffffff), hex(0x212121)),
    operation: Couleurs::new(hex(0xe0e0e0), hex(0x212121)),
    egal: Couleurs::new(hex(0x2196f3), hex(0xffffff)),
    effacer: Couleurs::new(hex(0xf44336), hex(0xffffff)),
    fonction: Couleurs::new(hex(0x9575cd), hex(0xffffff)),
};

const SOMBRE: Palette = Palette {
    fond: hex(0x263238),
    ecran: hex(0x37474f),
    ecran_texte: hex(0xeceff1),
    historique: hex(0xb0bec5),
    chiffre: Couleurs::new(hex(0x455a64), hex(0xeceff1)),
    operation: Couleurs::new(hex(0x546e7a), hex(0xeceff1)),
    egal: Couleurs::new(hex(0x039be5), hex(0xffffff)),
    effacer: Couleurs::new(hex(0xe53935), hex(0xffffff)),
    fonction: Couleurs::new(hex(0x7e57c2), hex(0xffffff)),
};

const PASTEL: Palette = Palette {
    fond: hex(0xe8f5e9),
    ecran: hex(0xc8e6c9),
    ecran_texte: hex(0x2e7d32),
    historique: hex(0x81c784),
    chiffre: Couleurs::new(hex(0xf1f8e9), hex(0x33691e)),
    operation: Couleurs::new(hex(0xdcedc8), hex(0x33691e)),
    egal: Couleurs::new(hex(0x9ccc65), hex(0xffffff)),
    effacer: Couleurs::new(hex(0xef9a9a), hex(0xffffff)),
    fonction: Couleurs::new(hex(0xaed581), hex(0x33691e)),
};

impl Theme {
    pub const TOUS: [Theme; 3] = [Theme::Clair, Theme::Sombre, Theme::Pastel];

    pub fn nom(self) -> &'static str {
        match self {
            Theme::Clair => "Clair",
            Theme::Sombre => "Sombre",
            Theme::Pastel => "Pastel",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Clair => &CLAIR,
            Theme::Sombre => &SOMBRE,
            Theme::Pastel => &PASTEL,
        }
    }

    /// Visuels egui de base (fond des panneaux, texte, champs).
    pub fn visuels(self) -> egui::Visuals {
        let p = self.palette();
        let mut v = match self {
            Theme::Sombre => egui::Visuals::dark(),
            Theme::Clair | Theme::Pastel => egui::Visuals::light(),
        };
        v.panel_fill = p.fond;
        v.window_fill = p.fond;
        v.extreme_bg_color = p.chiffre.fond;
        v.override_text_color = Some(p.ecran_texte);
        v
    }
}

/// Chaque canal multiplié par (1 + quantite), tronqué, plafonné à 255.
pub fn eclaircir(c: Color32, quantite: f32) -> Color32 {
    let canal = |v: u8| ((v as f32 * (1.0 + quantite)) as u32).min(255) as u8;
    Color32::from_rgb(canal(c.r()), canal(c.g()), canal(c.b()))
}
