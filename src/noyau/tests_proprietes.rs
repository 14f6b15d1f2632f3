//! Tests de propriétés (campagne) : lois du pipeline + robustesse + limites contrôlées.
//!
//! But : vérifier les CONTRATS, pas des valeurs isolées.
//! - la réécriture est idempotente en valeur (réécrire une sortie ne change rien)
//! - n% vaut exactement n/100, n! suit le produit itératif
//! - la garde de caractères tombe AVANT toute évaluation
//! - l'API ne rend jamais de non-fini côté Ok
//!
//! Notes (aligné avec l'état actuel du noyau) :
//! - Les sorties de réécriture sans '^' résiduel sont des points fixes textuels ;
//!   pour le reste on compare les VALEURS, pas les textes.
//! - Stress : bornes petites + budget temps, pour détecter les régressions
//!   sans faire chauffer la machine.

use std::time::{Duration, Instant};

use super::erreur::ErreurEval;
use super::eval_expression;
use super::jetons::{tokenize, Tok};
use super::reecriture::reecrit;
use super::rpn::PROFONDEUR_MAX;

fn eval_ok(expr: &str) -> f64 {
    eval_expression(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {max:?}");
    }
}

/* ------------------------ Idempotence de la réécriture ------------------------ */

#[test]
fn prop_reecriture_idempotente_en_valeur() {
    // réévaluer le texte réécrit doit donner la même valeur
    for s in [
        "50%",
        "5!",
        "2^10",
        "√(16)",
        "3!^2",
        "50+10%",
        "2×3÷4",
        "pi^2",
        "sqrt(16)^2+3!",
    ] {
        let une_fois = reecrit(s);
        let v1 = eval_ok(s);
        let v2 = eval_ok(&une_fois);
        assert_eq!(v1, v2, "idempotence en valeur cassée pour {s:?} -> {une_fois:?}");
    }
}

#[test]
fn prop_reecriture_point_fixe_textuel() {
    // une sortie sans '^' résiduel est déjà canonique
    for s in ["50%", "5!", "2^10", "√(16)", "3!^2"] {
        let une_fois = reecrit(s);
        if !une_fois.contains('^') {
            assert_eq!(reecrit(&une_fois), une_fois, "point fixe cassé pour {s:?}");
        }
    }
}

/* ------------------------ Lois du pourcentage et de la factorielle ------------------------ */

#[test]
fn prop_pourcent_vaut_division_par_cent() {
    for n in ["1", "2", "5", "10", "12.5", "50", "100", "250"] {
        let gauche = eval_ok(&format!("{n}%"));
        let droite = eval_ok(&format!("{n}/100"));
        assert_eq!(gauche, droite, "loi n% cassée pour n={n}");
    }
}

#[test]
fn prop_factorielle_suit_le_produit_iteratif() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut attendu = 1.0_f64;
    for n in 2..=20u32 {
        attendu *= f64::from(n);
        let v = eval_ok(&format!("{n}!"));
        assert_eq!(v, attendu, "loi factorielle cassée pour n={n}");
        budget(t0, max);
    }
}

/* ------------------------ Puissances : accord avec powf ------------------------ */

#[test]
fn prop_puissance_accord_powf() {
    for (a, b) in [
        (2.0_f64, 10.0_f64),
        (2.0, -1.0),
        (9.0, 0.5),
        (1.5, 3.0),
        (10.0, 6.0),
    ] {
        let v = eval_ok(&format!("{a}^{b}"));
        assert_eq!(v, a.powf(b), "accord powf cassé pour {a}^{b}");
    }
}

/* ------------------------ Ordre des gardes ------------------------ */

#[test]
fn prop_garde_caracteres_avant_tout_calcul() {
    // même si l'expression contient de quoi diviser par zéro, le caractère
    // interdit doit sortir en premier : rien n'est évalué
    for (s, c) in [("1/0+$", '$'), ("√(-1)&", '&'), ("x+1/0", 'x')] {
        match eval_expression(s) {
            Err(ErreurEval::CaractereInterdit(vu)) => assert_eq!(vu, c, "expr={s:?}"),
            autre => panic!("expr={s:?} => {autre:?}, attendu CaractereInterdit"),
        }
    }
}

#[test]
fn prop_syntaxe_avant_finitude() {
    // parenthèse ouverte + division par zéro : la syntaxe tranche d'abord
    assert!(matches!(
        eval_expression("(1/0"),
        Err(ErreurEval::ExpressionMalformee(_))
    ));
}

/* ------------------------ Moins unaire ------------------------ */

#[test]
fn prop_moins_unaire_en_chaine() {
    for k in 1..=6usize {
        let s = format!("{}5", "-".repeat(k));
        let attendu = if k % 2 == 0 { 5.0 } else { -5.0 };
        assert_eq!(eval_ok(&s), attendu, "chaîne de moins cassée pour {s:?}");
    }
}

/* ------------------------ Équivalences glyphes/ASCII ------------------------ */

#[test]
fn prop_glyphes_equivalents_ascii() {
    for (glyphe, ascii) in [
        ("√(7)", "sqrt(7)"),
        ("2×3÷4", "2*3/4"),
        ("π+1", "pi+1"),
        ("π×e", "pi*e"),
    ] {
        assert_eq!(eval_ok(glyphe), eval_ok(ascii), "{glyphe:?} != {ascii:?}");
    }
}

/* ------------------------ Contrat de finitude côté Ok ------------------------ */

#[test]
fn prop_ok_implique_fini() {
    for s in [
        "tan(pi/2)",
        "e^10",
        "170!",
        "2^1000",
        "1/3",
        "sin(100)",
        "atan(-50)",
    ] {
        if let Ok(v) = eval_expression(s) {
            assert!(v.is_finite(), "valeur non finie rendue pour {s:?}: {v}");
        }
    }
}

/* ------------------------ Grammaire canonique (jetons) ------------------------ */

#[test]
fn prop_jetons_forme_d_appel() {
    let jetons = tokenize("pow(2,10)").unwrap_or_else(|e| panic!("tokenize: {e}"));
    assert_eq!(
        jetons,
        vec![
            Tok::Ident("pow".into()),
            Tok::LPar,
            Tok::Num(2.0),
            Tok::Comma,
            Tok::Num(10.0),
            Tok::RPar
        ]
    );
}

#[test]
fn prop_jetons_nombres() {
    let jetons = tokenize(".5+12.25").unwrap_or_else(|e| panic!("tokenize: {e}"));
    assert_eq!(
        jetons,
        vec![Tok::Num(0.5), Tok::Plus, Tok::Num(12.25)]
    );
}

#[test]
fn prop_jetons_nombre_invalide() {
    assert!(matches!(
        tokenize("1.2.3"),
        Err(ErreurEval::ExpressionMalformee(_))
    ));
    assert!(matches!(
        tokenize("."),
        Err(ErreurEval::ExpressionMalformee(_))
    ));
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn prop_stress_somme_longue_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // 80 termes : assez pour détecter les régressions, sans exploser la pile
    // (l'AST d'une somme est en peigne, sa profondeur suit le nombre de termes)
    let mut expr = String::new();
    for k in 0..80 {
        if k > 0 {
            expr.push('+');
        }
        expr.push_str("0.5");
        budget(t0, max);
    }

    assert_eq!(eval_ok(&expr), 40.0);
}

#[test]
fn prop_stress_parentheses_profondes_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // les parenthèses ne créent pas de noeuds : profondeur textuelle 64, arbre plat
    let mut expr = String::from("5");
    for _ in 0..64 {
        expr = format!("({expr})");
        budget(t0, max);
    }

    assert_eq!(eval_ok(&expr), 5.0);
}

#[test]
fn prop_stress_factorielle_enorme_ne_gele_pas() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // le produit sature vers +inf en ~170 étapes puis s'arrête :
    // la magnitude du littéral ne dicte pas le temps de calcul
    assert_eq!(eval_expression("999999999!"), Err(ErreurEval::NonFini));
    budget(t0, max);
}

#[test]
fn prop_stress_somme_plate_enorme_refusee_net() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // un peigne de 1000 termes s'évalue encore
    let mut moyenne = String::from("1");
    for _ in 0..999 {
        moyenne.push_str("+1");
    }
    assert_eq!(eval_ok(&moyenne), 1000.0);
    budget(t0, max);

    // au-delà du plafond de profondeur : refus net avant toute évaluation,
    // la descente récursive reste bornée par le plafond
    let mut enorme = String::from("1");
    for _ in 0..(2 * PROFONDEUR_MAX) {
        enorme.push_str("+1");
    }
    assert!(matches!(
        eval_expression(&enorme),
        Err(ErreurEval::ExpressionMalformee(_))
    ));
    budget(t0, max);
}
