//! Noyau : évaluation (pipeline réel)
//!
//! réécriture -> garde de caractères -> tokenize -> RPN -> Expr -> f64
//!            -> garde de finitude
//!
//! Le noyau est sans état et sans E/S : une chaîne entre, un f64 FINI sort,
//! ou une erreur de la taxonomie fermée (ErreurEval). Aucune exécution
//! dynamique : l'arbre Expr est la seule chose évaluée.

use super::erreur::{ErreurEval, ResultatEval};
use super::jetons::tokenize;
use super::reecriture::{garde_caracteres, reecrit};
use super::rpn::{from_rpn, to_rpn};

/// API publique : évalue une expression “riche” (symboles, %, !, ^) et
/// retourne sa valeur.
///
/// Politique d'erreurs :
/// - CaractereInterdit : le texte réécrit sort de l'ensemble admis ;
///   l'évaluateur n'a rien vu
/// - ExpressionMalformee : erreur de syntaxe de la grammaire canonique
/// - NonFini : résultat NaN ou infini ; les erreurs de domaine
///   (DomaineMath) se replient ici, à la frontière
pub fn eval_expression(brut: &str) -> ResultatEval<f64> {
    if brut.is_empty() {
        return Err(ErreurEval::malformee("entrée vide"));
    }

    // 1) Réécriture lexicale (totale) puis contrat de sortie
    let canonique = reecrit(brut);
    garde_caracteres(&canonique)?;

    // 2) Jetons
    let jetons = tokenize(&canonique)?;

    // 3) RPN
    let rpn = to_rpn(&jetons)?;

    // 4) AST (Expr)
    let expr = from_rpn(&rpn)?;

    // 5) Valeur + garde de finitude
    let valeur = match expr.eval() {
        Ok(v) => v,
        // hors domaine == résultat non fini, vu de l'extérieur
        Err(ErreurEval::DomaineMath(_)) => return Err(ErreurEval::NonFini),
        Err(e) => return Err(e),
    };

    if !valeur.is_finite() {
        return Err(ErreurEval::NonFini);
    }
    Ok(valeur)
}
