//! Noyau d'évaluation (réécriture + grammaire canonique)
//!
//! Organisation interne :
//! - erreur.rs     : taxonomie fermée des erreurs (ErreurEval)
//! - reecriture.rs : passes lexicales (%, !, symboles, ^) + garde de caractères
//! - jetons.rs     : tokenisation de la grammaire canonique
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST f64 + table de fonctions + interprète
//! - eval.rs       : pipeline complet

pub mod erreur;
pub mod eval;
pub mod expr;
pub mod jetons;
pub mod reecriture;
pub mod rpn;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::ErreurEval;
pub use eval::eval_expression;
