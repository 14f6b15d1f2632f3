// src/app.rs
//
// Calculatrice scientifique, module App (racine)
// ----------------------------------------------
//
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB), persistance comprise
//
// Important:
// - La gestion d’Entrée est faite dans vue.rs (au bon endroit: sur le champ).
// - Ici, on évite d’appeler des méthodes privées de vue.rs.

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

use etat::Theme;

impl AppCalc {
    /// Construit l’application en relisant les préférences persistées
    /// (mémoire, historique, thème, didacticiel) si un stockage existe.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: AppCalc = cc
            .storage
            .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
            .unwrap_or_default();

        if !app.historique.is_empty() || app.memoire != 0.0 {
            log::info!(
                "préférences restaurées : {} calculs en historique, M = {}",
                app.historique.len(),
                app.memoire
            );
        }

        // Le guide s’ouvre à chaque lancement tant qu’il n’a pas été désactivé.
        app.tutoriel_ouvert = !app.tutoriel_off;
        app.focus_entree = true;
        app
    }
}

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.theme {
            Theme::Jour => ctx.set_visuals(egui::Visuals::light()),
            Theme::Nuit => ctx.set_visuals(egui::Visuals::dark()),
        }

        // Raccourci clavier global minimal (safe natif + web) :
        // ESC = tout effacer (comme bouton "C").
        //
        // On NE gère PAS Enter ici:
        // - sur web/mobile, clavier incertain
        // - risque de double déclenchement
        // - la vue le fait déjà sur le champ d’entrée
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.effacer(); // méthode publique de etat.rs
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui); // méthode publique (dans vue.rs)
        });

        self.ui_tutoriel(ctx);
    }

    /// Sauvegarde périodique eframe (fichier natif, localStorage sur le web).
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
