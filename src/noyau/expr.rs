// src/noyau/expr.rs
//
// AST numérique (f64) + interprète structurel.
// - Num : littéral ou constante déjà substituée (pi, e)
// - Fonc : application d'une fonction de la table
//
// IMPORTANT (SAFE):
// - Aucune exécution dynamique : l'arbre est la seule chose évaluée.
// - Les contrôles de domaine vivent dans la table (Fonction::applique) ;
//   la frontière du pipeline replie DomaineMath sur NonFini.
// - Les non-finis intermédiaires (1/0, débordements) traversent eval()
//   sans erreur : c'est la garde de finitude qui tranche, en sortie.

use super::erreur::{ErreurEval, ResultatEval};

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    Fonc(Fonction, Box<Expr>),
}

/// Table des fonctions unaires de l'évaluateur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log, // base 10
    Ln,  // base e
    Sqrt,
}

impl Fonction {
    /// Nom canonique -> entrée de la table (None : identifiant inconnu).
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        match nom {
            "sin" => Some(Fonction::Sin),
            "cos" => Some(Fonction::Cos),
            "tan" => Some(Fonction::Tan),
            "asin" => Some(Fonction::Asin),
            "acos" => Some(Fonction::Acos),
            "atan" => Some(Fonction::Atan),
            "log" => Some(Fonction::Log),
            "ln" => Some(Fonction::Ln),
            "sqrt" => Some(Fonction::Sqrt),
            _ => None,
        }
    }

    /// Application avec contrôle de domaine. Les angles sont en radians.
    pub fn applique(self, x: f64) -> ResultatEval<f64> {
        match self {
            Fonction::Sin => Ok(x.sin()),
            Fonction::Cos => Ok(x.cos()),
            Fonction::Tan => Ok(x.tan()),

            Fonction::Asin => {
                if !(-1.0..=1.0).contains(&x) {
                    return Err(ErreurEval::DomaineMath("asin hors de [-1, 1]"));
                }
                Ok(x.asin())
            }
            Fonction::Acos => {
                if !(-1.0..=1.0).contains(&x) {
                    return Err(ErreurEval::DomaineMath("acos hors de [-1, 1]"));
                }
                Ok(x.acos())
            }
            Fonction::Atan => Ok(x.atan()),

            Fonction::Log => {
                if x <= 0.0 {
                    return Err(ErreurEval::DomaineMath("log d'un nombre non positif"));
                }
                Ok(x.log10())
            }
            Fonction::Ln => {
                if x <= 0.0 {
                    return Err(ErreurEval::DomaineMath("ln d'un nombre non positif"));
                }
                Ok(x.ln())
            }

            Fonction::Sqrt => {
                if x < 0.0 {
                    return Err(ErreurEval::DomaineMath("racine carrée d'un nombre négatif"));
                }
                Ok(x.sqrt())
            }
        }
    }
}

impl Expr {
    /// Évaluation structurelle pure (aucun état, aucune E/S).
    pub fn eval(&self) -> ResultatEval<f64> {
        use Expr::*;

        match self {
            Num(v) => Ok(*v),

            Add(a, b) => Ok(a.eval()? + b.eval()?),
            Sub(a, b) => Ok(a.eval()? - b.eval()?),
            Mul(a, b) => Ok(a.eval()? * b.eval()?),
            Div(a, b) => Ok(a.eval()? / b.eval()?),
            Pow(a, b) => Ok(a.eval()?.powf(b.eval()?)),

            Fonc(f, x) => f.applique(x.eval()?),
        }
    }
}
