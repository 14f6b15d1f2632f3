//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, mémoire, historique,
//! thème, messages éphémères) et offrir des opérations simples, sans logique
//! d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici (pas de noyau, pas de parsing d’expression).
//! - Actions déterministes, sans effet de bord caché.
//! - Les champs persistés (mémoire, historique, thème, didacticiel) sont
//!   sérialisés tels quels ; tout le reste est transitoire.

/// Durée d’affichage d’un message d’information (secondes).
const DUREE_INFO: f64 = 1.2;

/// Durée d’affichage d’un message d’erreur (secondes).
const DUREE_ERREUR: f64 = 1.6;

/// Garde-fou : l’historique est borné (anti-croissance infinie).
const MAX_HISTORIQUE: usize = 50;

/// Une ligne d’historique : l’expression saisie et son résultat.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Calcul {
    pub entree: String,
    pub resultat: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Theme {
    Jour,
    Nuit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SorteMessage {
    Info,
    Erreur,
}

/// Message éphémère (bandeau sous l’entrée), daté sur l’horloge egui.
#[derive(Clone, Debug)]
pub struct Message {
    pub texte: String,
    pub sorte: SorteMessage,
    pub expire: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppCalc {
    // --- préférences persistées ---
    pub memoire: f64,
    pub historique: Vec<Calcul>,
    pub theme: Theme,
    pub tutoriel_off: bool,

    // --- entrée utilisateur ---
    #[serde(skip)]
    pub entree: String,

    // --- affichage secondaire : dernière expression évaluée ---
    #[serde(skip)]
    pub secondaire: String,

    // --- message éphémère (info / erreur) ---
    #[serde(skip)]
    pub message: Option<Message>,

    // --- didacticiel (fenêtre) ---
    #[serde(skip)]
    pub tutoriel_ouvert: bool,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    #[serde(skip)]
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            memoire: 0.0,
            historique: Vec::new(),
            theme: Theme::Nuit, // nuit au premier lancement
            tutoriel_off: false,
            entree: String::new(),
            secondaire: String::new(),
            message: None,
            tutoriel_ouvert: false,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /* ------------------------ Saisie ------------------------ */

    /// Colle du texte en fin d’entrée (boutons chiffres / opérateurs / fonctions).
    /// Collage compact : aucun espace, le noyau refuse les blancs.
    pub fn inserer(&mut self, txt: &str) {
        self.entree.push_str(txt);
        self.focus_entree = true;
    }

    /// C : effacer l’entrée et l’affichage secondaire.
    pub fn effacer(&mut self) {
        self.entree.clear();
        self.secondaire.clear();
        self.focus_entree = true;
    }

    /// Retour arrière “token” : retire d’un coup les motifs insérés par les
    /// boutons (fonctions, constantes), sinon un seul caractère.
    pub fn backspace_entree(&mut self) {
        const MOTIFS: [&str; 10] = [
            "asin(", "acos(", "atan(", "sqrt(", "sin(", "cos(", "tan(", "log(", "ln(", "pi",
        ];

        if self.entree.is_empty() {
            return;
        }
        for motif in MOTIFS {
            if self.entree.ends_with(motif) {
                for _ in 0..motif.chars().count() {
                    self.entree.pop();
                }
                self.focus_entree = true;
                return;
            }
        }
        self.entree.pop();
        self.focus_entree = true;
    }

    /// ± : bascule le signe de l’expression entière (préfixe '-').
    pub fn basculer_signe(&mut self) {
        if let Some(reste) = self.entree.strip_prefix('-') {
            self.entree = reste.to_string();
        } else if !self.entree.is_empty() {
            self.entree.insert(0, '-');
        }
        self.focus_entree = true;
    }

    /* ------------------------ Mémoire (MC / MR / MS / M+) ------------------------ */

    /// Valeur numérique de l’affichage courant ; 0 si l’entrée n’est pas
    /// un nombre fini “nu” (une expression non évaluée ne compte pas).
    fn valeur_affichee(&self) -> f64 {
        self.entree
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// MC : efface la mémoire.
    pub fn memoire_efface(&mut self) {
        self.memoire = 0.0;
        self.focus_entree = true;
    }

    /// MR : rappelle la mémoire dans l’entrée (remplace l’affichage).
    pub fn memoire_rappelle(&mut self) {
        self.entree = self.memoire.to_string();
        self.focus_entree = true;
    }

    /// MS : stocke l’affichage courant.
    pub fn memoire_stocke(&mut self) {
        self.memoire = self.valeur_affichee();
        self.focus_entree = true;
    }

    /// M+ : additionne l’affichage courant à la mémoire.
    pub fn memoire_ajoute(&mut self) {
        self.memoire += self.valeur_affichee();
        self.focus_entree = true;
    }

    /* ------------------------ Historique ------------------------ */

    /// Insère en tête (le plus récent d’abord) et borne la taille.
    pub fn pousser_historique(&mut self, calcul: Calcul) {
        self.historique.insert(0, calcul);
        self.historique.truncate(MAX_HISTORIQUE);
    }

    /* ------------------------ Messages éphémères ------------------------ */

    /// Dépose un message daté ; l’entrée reste intacte (une faute ne vide
    /// jamais l’écran).
    pub fn set_message(&mut self, texte: impl Into<String>, sorte: SorteMessage, maintenant: f64) {
        let duree = match sorte {
            SorteMessage::Info => DUREE_INFO,
            SorteMessage::Erreur => DUREE_ERREUR,
        };
        self.message = Some(Message {
            texte: texte.into(),
            sorte,
            expire: maintenant + duree,
        });
    }

    /// Message encore visible à l’instant donné.
    pub fn message_actif(&self, maintenant: f64) -> Option<&Message> {
        self.message.as_ref().filter(|m| m.expire > maintenant)
    }

    /* ------------------------ Thème ------------------------ */

    pub fn basculer_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Jour => Theme::Nuit,
            Theme::Nuit => Theme::Jour,
        };
    }
}
