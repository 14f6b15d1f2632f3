// src/app/vue.rs
//
// Vue (UI egui), natif et web.
// ----------------------------
// Objectifs :
// - Un seul AppCalc (etat.rs) pour natif + wasm
// - Clavier : Entrée évalue ; Backspace reste natif (le bouton DEL, lui,
//   retire les motifs entiers : "sin(", "pi", ...)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use std::time::Duration;

use eframe::egui;

use super::etat::{AppCalc, Calcul, SorteMessage, Theme};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.ui_entete(ui);
                ui.add_space(6.0);

                self.ui_affichages(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_boutons(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
            });
    }

    fn ui_entete(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Calculatrice scientifique");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let cible = match self.theme {
                    Theme::Jour => "Nuit",
                    Theme::Nuit => "Jour",
                };
                if ui.button(cible).on_hover_text("Basculer le thème").clicked() {
                    self.basculer_theme();
                }
                if ui
                    .button("Aide")
                    .on_hover_text("Rouvrir le guide de démarrage")
                    .clicked()
                {
                    self.tutoriel_ouvert = true;
                }
            });
        });
    }

    fn ui_affichages(&mut self, ui: &mut egui::Ui) {
        // Dernière expression évaluée, en retrait au-dessus de l’entrée.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let texte = if self.secondaire.is_empty() {
                " "
            } else {
                self.secondaire.as_str()
            };
            ui.weak(egui::RichText::new(texte).monospace());
        });

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: (50%+0.5)*2, sin(pi/4), 3!^2")
                .id_source("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton (pavé / fonctions / DEL / C / etc.), on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Entrée évalue ---
        // Un TextEdit à une ligne rend le focus sur Entrée, d’où lost_focus().
        let maintenant = ui.input(|i| i.time);
        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.eval_via_noyau(maintenant);
            self.focus_entree = true;
        }

        // Bandeau info / erreur, daté sur l’horloge egui.
        if let Some(m) = self.message_actif(maintenant) {
            let couleur = match m.sorte {
                SorteMessage::Info => ui.visuals().weak_text_color(),
                SorteMessage::Erreur => ui.visuals().error_fg_color,
            };
            ui.colored_label(couleur, &m.texte);
            let reste = (m.expire - maintenant).max(0.05);
            ui.ctx().request_repaint_after(Duration::from_secs_f64(reste));
        } else {
            // réserve la ligne pour éviter les sauts de mise en page
            ui.label(" ");
        }
    }

    fn ui_boutons(&mut self, ui: &mut egui::Ui) {
        // Mémoire
        ui.horizontal(|ui| {
            self.bouton_action(ui, "MC", "Efface la mémoire", Action::MemoireEfface);
            self.bouton_action(ui, "MR", "Rappelle la mémoire", Action::MemoireRappelle);
            self.bouton_action(ui, "MS", "Stocke le nombre affiché", Action::MemoireStocke);
            self.bouton_action(ui, "M+", "Ajoute le nombre affiché", Action::MemoireAjoute);

            if self.memoire != 0.0 {
                ui.separator();
                ui.weak(format!("M = {}", self.memoire));
            }
        });

        ui.add_space(6.0);

        // Fonctions scientifiques (insertion texte, évaluées par le noyau)
        egui::Grid::new("pave_fonctions")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "sin", "sin(");
                self.bouton_insert(ui, "cos", "cos(");
                self.bouton_insert(ui, "tan", "tan(");
                self.bouton_insert(ui, "√", "√(");
                ui.end_row();

                self.bouton_insert(ui, "asin", "asin(");
                self.bouton_insert(ui, "acos", "acos(");
                self.bouton_insert(ui, "atan", "atan(");
                self.bouton_insert(ui, "x²", "^2");
                ui.end_row();

                self.bouton_insert(ui, "log", "log(");
                self.bouton_insert(ui, "ln", "ln(");
                self.bouton_insert(ui, "^", "^");
                self.bouton_insert(ui, "x³", "^3");
                ui.end_row();

                self.bouton_insert(ui, "pi", "pi");
                self.bouton_insert(ui, "e", "e");
                self.bouton_insert(ui, "!", "!");
                self.bouton_insert(ui, "%", "%");
                ui.end_row();
            });

        ui.add_space(6.0);

        // Pavé numérique
        egui::Grid::new("pave_numerique")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton_insert(ui, "7", "7");
                self.bouton_insert(ui, "8", "8");
                self.bouton_insert(ui, "9", "9");
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                self.bouton_action(ui, "C", "Efface tout", Action::Effacer);
                ui.end_row();

                self.bouton_insert(ui, "4", "4");
                self.bouton_insert(ui, "5", "5");
                self.bouton_insert(ui, "6", "6");
                self.bouton_insert(ui, "×", "×");
                self.bouton_insert(ui, "÷", "÷");
                ui.end_row();

                self.bouton_insert(ui, "1", "1");
                self.bouton_insert(ui, "2", "2");
                self.bouton_insert(ui, "3", "3");
                self.bouton_insert(ui, "+", "+");
                self.bouton_insert(ui, "-", "-");
                ui.end_row();

                self.bouton_insert(ui, "0", "0");
                self.bouton_insert(ui, ".", ".");
                self.bouton_action(ui, "±", "Change le signe de l’expression", Action::BasculerSigne);
                self.bouton_insert(ui, "(", "(");
                self.bouton_insert(ui, ")", ")");
                ui.end_row();
            });

        ui.add_space(8.0);

        // "=" pleine largeur
        let egal = ui.add_sized([ui.available_width(), 34.0], egui::Button::new("="));
        if egal.clicked() {
            let maintenant = ui.input(|i| i.time);
            self.eval_via_noyau(maintenant);
            self.focus_entree = true;
        }
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Historique")
            .default_open(false)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.weak("aucun calcul pour l’instant");
                    return;
                }

                if ui.small_button("Vider l’historique").clicked() {
                    self.historique.clear();
                    return;
                }
                ui.add_space(4.0);

                let mut rappel: Option<String> = None;
                for (k, calcul) in self.historique.iter().enumerate() {
                    let ligne = format!("{} = {}", calcul.entree, calcul.resultat);
                    ui.push_id(k, |ui| {
                        let resp = ui
                            .selectable_label(false, egui::RichText::new(ligne).monospace())
                            .on_hover_text("Reprendre le résultat");
                        if resp.clicked() {
                            rappel = Some(calcul.resultat.clone());
                        }
                    });
                }
                if let Some(r) = rappel {
                    self.entree = r;
                    self.focus_entree = true;
                }
            });
    }

    /// Fenêtre d’aide, affichée au premier lancement (puis via le bouton Aide).
    pub fn ui_tutoriel(&mut self, ctx: &egui::Context) {
        if !self.tutoriel_ouvert {
            return;
        }

        let mut ouvert = true;
        egui::Window::new("Bien démarrer")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut ouvert)
            .show(ctx, |ui| {
                ui.label("Tapez une expression puis Entrée (ou =).");
                ui.label("Exemples : (50%+0.5)*2, sin(pi/4), 3!^2, 2^-3");
                ui.label("Les écritures usuelles sont comprises : ×, ÷, √, π, n!, %.");
                ui.label("DEL retire un symbole entier (\"sin(\", \"pi\", ...), C efface tout.");
                ui.label("MS stocke le nombre affiché, M+ l’additionne, MR le rappelle.");
                ui.add_space(6.0);
                ui.checkbox(&mut self.tutoriel_off, "Ne plus afficher au lancement");
                if ui.button("Compris").clicked() {
                    self.tutoriel_ouvert = false;
                }
            });
        self.tutoriel_ouvert = self.tutoriel_ouvert && ouvert;
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, texte: &str) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if resp.clicked() {
            self.inserer(texte);
        }
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::Effacer => self.effacer(),
                Action::Backspace => self.backspace_entree(),
                Action::BasculerSigne => self.basculer_signe(),
                Action::MemoireEfface => self.memoire_efface(),
                Action::MemoireRappelle => self.memoire_rappelle(),
                Action::MemoireStocke => self.memoire_stocke(),
                Action::MemoireAjoute => self.memoire_ajoute(),
            }
        }
    }

    /// Évalue l’entrée via le noyau, puis dépose résultat / message dans l’état UI.
    fn eval_via_noyau(&mut self, maintenant: f64) {
        let saisie = self.entree.trim().to_string();
        if saisie.is_empty() {
            self.set_message("rien à calculer", SorteMessage::Info, maintenant);
            self.focus_entree = true;
            return;
        }

        match crate::noyau::eval_expression(&saisie) {
            Ok(v) => {
                log::debug!("eval ok : {saisie:?} -> {v}");
                let resultat = v.to_string();
                self.secondaire = saisie.clone();
                self.entree = resultat.clone();
                self.pousser_historique(Calcul {
                    entree: saisie,
                    resultat,
                });
                self.set_message("calculé", SorteMessage::Info, maintenant);
            }
            Err(e) => {
                // L’entrée reste intacte : une faute ne vide jamais l’écran.
                log::warn!("eval refusée : {saisie:?} ({e})");
                self.set_message(e.to_string(), SorteMessage::Erreur, maintenant);
            }
        }
        self.focus_entree = true;
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Effacer,
    Backspace,
    BasculerSigne,
    MemoireEfface,
    MemoireRappelle,
    MemoireStocke,
    MemoireAjoute,
}
