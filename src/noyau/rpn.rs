// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - si name est dans la table (sin, cos, ..., sqrt) ou "pow" => fonction,
//      qui DOIT être suivie de '(' (sinon: expression malformée)
//    - si name ∈ {pi, e} => constante (résolue au from_rpn)
//    - sinon => identifiant inconnu, refusé au from_rpn
// - Moins unaire:
//    - si '-' arrive quand on n’attend PAS une valeur, on pousse l’opérateur
//      préfixe Neg, SANS dépiler : "-x" => "x neg". Préfixe sous '^', donc
//      "-2^2" == -(2^2) mais "2/-3/4" == (2/(-3))/4.
// - Deux valeurs collées ("2(3)", "(1)(2)") => opérateur manquant
// - Virgule d’appel : un opérande plein de chaque côté, sinon "(2,)", "(,2)"
//   ou "pow(2,,3)" passeraient avec un argument fantôme
//
// NOTE:
// - Les fonctions sont traitées comme des opérateurs “collés” à leur argument
//   et sont sorties après la parenthèse fermante.

use super::erreur::{ErreurEval, ResultatEval};
use super::expr::{Expr, Fonction};
use super::jetons::Tok;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Caret | Tok::Neg => 3,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

/// Identificateurs reconnus comme fonctions (unaires, plus `pow` binaire).
fn is_fonction_ident(name: &str) -> bool {
    name == "pow" || Fonction::depuis_nom(name).is_some()
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Ident("pi"), Num(2), Slash, Ident("sin")]
pub fn to_rpn(tokens: &[Tok]) -> ResultatEval<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les valeurs collées.
    let mut prev_was_value = false;

    // un nom de fonction vient d’être empilé : '(' obligatoire juste après
    let mut fonction_en_attente = false;

    // le jeton précédent est une virgule : ')' interdite juste derrière
    let mut apres_virgule = false;

    for tok in tokens.iter().cloned() {
        if fonction_en_attente {
            if !matches!(tok, Tok::LPar) {
                return Err(ErreurEval::malformee("fonction sans parenthèse d’appel"));
            }
            fonction_en_attente = false;
        }

        let est_virgule = matches!(tok, Tok::Comma);

        match tok {
            Tok::Num(_) => {
                if prev_was_value {
                    return Err(ErreurEval::malformee("opérateur manquant"));
                }
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(ErreurEval::malformee("opérateur manquant"));
                }
                if is_fonction_ident(&name) {
                    // fonction : on la garde sur la pile (elle sortira après son argument)
                    ops.push(Tok::Ident(name));
                    fonction_en_attente = true;
                    prev_was_value = false;
                } else {
                    // constante (pi/e) ou inconnu : sortie directe, le from_rpn tranche
                    out.push(Tok::Ident(name));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurEval::malformee("opérateur manquant"));
                }
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::RPar => {
                // ",)" : dernier argument vide
                if apres_virgule {
                    return Err(ErreurEval::malformee("opérande vide autour d’une virgule"));
                }

                // dépile jusqu’à '('
                let mut ouvrante = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ouvrante = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouvrante {
                    return Err(ErreurEval::malformee("parenthèse fermante orpheline"));
                }

                // si une fonction est au sommet, on la sort aussi
                // (forme Clippy: pas de if-let imbriqué inutile)
                if let Some(Tok::Ident(name)) = ops.last() {
                    if is_fonction_ident(name.as_str()) {
                        out.push(ops.pop().unwrap());
                    }
                }

                prev_was_value = true;
            }

            Tok::Comma => {
                // un opérande plein doit précéder la virgule
                if !prev_was_value {
                    return Err(ErreurEval::malformee("opérande vide autour d’une virgule"));
                }

                // virgule d’appel : dépile jusqu’à '(' (qui reste en place)
                let mut dans_appel = false;
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) {
                        dans_appel = true;
                        break;
                    }
                    out.push(ops.pop().unwrap());
                }
                if !dans_appel {
                    return Err(ErreurEval::malformee("virgule hors d’un appel"));
                }
                prev_was_value = false;
            }

            Tok::Plus | Tok::Star | Tok::Slash | Tok::Caret => {
                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et on ne traverse pas une fonction (fonction reste collée à son argument)
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) {
                        break;
                    }
                    if let Tok::Ident(name) = top {
                        if is_fonction_ident(name.as_str()) {
                            break;
                        }
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&tok);

                    let doit_pop = if is_right_associative(&tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if doit_pop {
                        out.push(ops.pop().unwrap());
                    } else {
                        break;
                    }
                }

                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Minus => {
                if !prev_was_value {
                    // moins unaire : préfixe, poussé sans dépiler
                    // (un préfixe attend son opérande, il ne sort personne)
                    ops.push(Tok::Neg);
                    continue;
                }

                // moins binaire : même dépilage que + (associativité gauche)
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) {
                        break;
                    }
                    if let Tok::Ident(name) = top {
                        if is_fonction_ident(name.as_str()) {
                            break;
                        }
                    }
                    if precedence(top) >= precedence(&Tok::Minus) {
                        out.push(ops.pop().unwrap());
                    } else {
                        break;
                    }
                }

                ops.push(Tok::Minus);
                prev_was_value = false;
            }

            // interne : jamais présent dans l'entrée
            Tok::Neg => {
                return Err(ErreurEval::malformee("jeton inattendu"));
            }
        }

        // le préfixe Neg saute ce point par `continue` : "pow(2,-)" garde
        // son slot vide et tombe bien sur la garde ci-dessus
        apres_virgule = est_virgule;
    }

    if fonction_en_attente {
        return Err(ErreurEval::malformee("fonction sans parenthèse d’appel"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ErreurEval::malformee("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

// L'évaluation descend l'arbre en récursif : la profondeur est bornée ici,
// à la construction. Une somme plate de N termes fait un peigne de
// profondeur N, jamais rééquilibré ensuite.
pub(crate) const PROFONDEUR_MAX: usize = 2048;

/// Construit une Expr à partir d’une RPN.
///
/// - Ident(name):
///     - "pow" => puissance binaire (deux arguments dépilés)
///     - si name est dans la table => fonction unaire
///     - si name ∈ {pi, e} => constante substituée immédiatement
///     - sinon => identifiant inconnu, refusé
pub fn from_rpn(rpn: &[Tok]) -> ResultatEval<Expr> {
    // chaque entrée porte la profondeur de son sous-arbre
    let mut st: Vec<(Expr, usize)> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(v) => st.push((Expr::Num(v), 1)),

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let (b, pb) = st
                    .pop()
                    .ok_or_else(|| ErreurEval::malformee("expression invalide"))?;
                let (a, pa) = st
                    .pop()
                    .ok_or_else(|| ErreurEval::malformee("expression invalide"))?;

                let e = match tok {
                    Tok::Plus => Expr::Add(Box::new(a), Box::new(b)),
                    Tok::Minus => Expr::Sub(Box::new(a), Box::new(b)),
                    Tok::Star => Expr::Mul(Box::new(a), Box::new(b)),
                    Tok::Slash => Expr::Div(Box::new(a), Box::new(b)),
                    Tok::Caret => Expr::Pow(Box::new(a), Box::new(b)),
                    _ => unreachable!(),
                };

                st.push((e, 1 + pa.max(pb)));
            }

            // moins unaire : 0 - x
            Tok::Neg => {
                let (x, px) = st
                    .pop()
                    .ok_or_else(|| ErreurEval::malformee("expression invalide"))?;
                st.push((Expr::Sub(Box::new(Expr::Num(0.0)), Box::new(x)), 1 + px));
            }

            Tok::Ident(name) => {
                if name == "pow" {
                    let (b, pb) = st
                        .pop()
                        .ok_or_else(|| ErreurEval::malformee("fonction sans argument"))?;
                    let (a, pa) = st
                        .pop()
                        .ok_or_else(|| ErreurEval::malformee("fonction sans argument"))?;
                    st.push((Expr::Pow(Box::new(a), Box::new(b)), 1 + pa.max(pb)));
                } else if let Some(f) = Fonction::depuis_nom(name.as_str()) {
                    let (x, px) = st
                        .pop()
                        .ok_or_else(|| ErreurEval::malformee("fonction sans argument"))?;
                    st.push((Expr::Fonc(f, Box::new(x)), 1 + px));
                } else {
                    match name.as_str() {
                        "pi" => st.push((Expr::Num(std::f64::consts::PI), 1)),
                        "e" => st.push((Expr::Num(std::f64::consts::E), 1)),
                        _ => {
                            return Err(ErreurEval::malformee(format!(
                                "identifiant inconnu : '{name}'"
                            )))
                        }
                    }
                }
            }

            Tok::LPar | Tok::RPar | Tok::Comma => {
                return Err(ErreurEval::malformee("jeton inattendu en RPN"))
            }
        }

        // seul le sommet vient de grandir
        if let Some((_, p)) = st.last() {
            if *p > PROFONDEUR_MAX {
                return Err(ErreurEval::malformee("expression trop profonde"));
            }
        }
    }

    if st.len() != 1 {
        return Err(ErreurEval::malformee("expression invalide"));
    }
    Ok(st.pop().unwrap().0)
}
