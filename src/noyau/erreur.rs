// src/noyau/erreur.rs
//
// Taxonomie fermée des erreurs du noyau.
// - CaractereInterdit : la garde de caractères refuse le texte réécrit,
//   l'évaluateur n'est jamais invoqué dessus
// - ExpressionMalformee : erreur de syntaxe de la grammaire canonique
// - DomaineMath : argument hors domaine d'une fonction de la table ;
//   se replie en NonFini à la frontière du pipeline
// - NonFini : résultat NaN ou infini (division par zéro, débordement
//   de factorielle, etc.)

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurEval {
    #[error("caractère interdit : '{0}'")]
    CaractereInterdit(char),

    #[error("expression malformée : {0}")]
    ExpressionMalformee(String),

    #[error("hors domaine : {0}")]
    DomaineMath(&'static str),

    #[error("résultat non fini")]
    NonFini,
}

impl ErreurEval {
    /// Raccourci interne pour les erreurs de syntaxe.
    pub(crate) fn malformee(msg: impl Into<String>) -> Self {
        ErreurEval::ExpressionMalformee(msg.into())
    }
}

pub type ResultatEval<T> = Result<T, ErreurEval>;
