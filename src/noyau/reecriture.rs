// src/noyau/reecriture.rs
//
// Réécriture lexicale : abaisse la saisie « riche » (%, !, glyphes, ^)
// vers la grammaire canonique de l'évaluateur. Quatre passes, DANS CET
// ORDRE (chaque passe travaille sur le texte produit par la précédente) :
//   1. pourcentage : <nombre>%  ->  (<nombre>/100)
//   2. factorielle : <nombre>!  ->  valeur précalculée, parenthésée
//   3. symboles    : π √ × ÷    ->  pi sqrt * /  (+ repli de casse)
//   4. exposant    : <g>^<d>    ->  pow(<g>,<d>)
//
// Les passes sont totales : un texte non reconnu traverse tel quel et
// sera refusé plus loin (garde de caractères, puis analyseur).

use super::erreur::{ErreurEval, ResultatEval};

/* ------------------------ Nombres ------------------------ */

/// Longueur d'un littéral numérique (chiffres, puis option `.chiffres`)
/// à partir de `i`. Zéro si `chars[i]` n'est pas un chiffre.
fn long_nombre(chars: &[char], i: usize) -> usize {
    let mut j = i;
    while j < chars.len() && chars[j].is_ascii_digit() {
        j += 1;
    }
    if j == i {
        return 0;
    }
    if j < chars.len() && chars[j] == '.' {
        let mut k = j + 1;
        while k < chars.len() && chars[k].is_ascii_digit() {
            k += 1;
        }
        if k > j + 1 {
            j = k;
        }
    }
    j - i
}

/* ------------------------ Passe 1 : pourcentage ------------------------ */

/// `<nombre>%` devient `(<nombre>/100)`. Les courses de nombres sont
/// prises gloutonnement de gauche à droite ; un '%' sans nombre devant
/// traverse tel quel (refusé ensuite par l'analyseur).
fn passe_pourcent(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0usize;
    while i < chars.len() {
        let n = long_nombre(&chars, i);
        if n > 0 && i + n < chars.len() && chars[i + n] == '%' {
            out.push('(');
            out.extend(&chars[i..i + n]);
            out.push_str("/100)");
            i += n + 1;
        } else if n > 0 {
            out.extend(&chars[i..i + n]);
            i += n;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/* ------------------------ Passe 2 : factorielle ------------------------ */

/// Factorielle « calculatrice » :
/// - n est tronqué vers zéro avant calcul (2.9! == 2!)
/// - NaN si n < 0 (ou si n est déjà NaN)
/// - 1 pour 0 et 1
/// - produit itératif sinon, sans plafond : le débordement donne +inf,
///   refusé plus loin par la garde de finitude
pub fn factorielle(n: f64) -> f64 {
    let n = n.trunc();
    if n.is_nan() || n < 0.0 {
        return f64::NAN;
    }
    if n == 0.0 || n == 1.0 {
        return 1.0;
    }
    let mut res = 1.0_f64;
    let mut i = 2.0_f64;
    while i <= n {
        res *= i;
        if res.is_infinite() {
            // inf absorbe toutes les multiplications suivantes
            break;
        }
        i += 1.0;
    }
    res
}

/// Rend une valeur en texte sûr pour la grammaire canonique.
/// Fini -> décimal parenthésé ; non fini -> marqueur que la garde accepte
/// et que la frontière de finitude refusera.
fn texte_valeur(v: f64) -> String {
    if v.is_nan() {
        "(0/0)".to_string()
    } else if v.is_infinite() {
        if v > 0.0 {
            "(1/0)".to_string()
        } else {
            "(-1/0)".to_string()
        }
    } else {
        format!("({v})")
    }
}

/// `<nombre>!` devient la valeur de `factorielle(nombre)`, parenthésée.
/// Seul un LITTÉRAL est reconnu : `(5)!` ou `x!` laissent le '!' en place
/// (la garde de caractères le refusera).
fn passe_factorielle(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0usize;
    while i < chars.len() {
        let n = long_nombre(&chars, i);
        if n > 0 && i + n < chars.len() && chars[i + n] == '!' {
            let nombre: String = chars[i..i + n].iter().collect();
            // la grammaire du littéral garantit un f64 lisible
            let v = nombre.parse::<f64>().unwrap_or(f64::NAN);
            out.push_str(&texte_valeur(factorielle(v)));
            i += n + 1;
        } else if n > 0 {
            out.extend(&chars[i..i + n]);
            i += n;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/* ------------------------ Passe 3 : symboles ------------------------ */

/// Glyphes (π √ × ÷) vers leurs formes canoniques, et repli des
/// identifiants en minuscules. La correspondance se fait au glyphe entier
/// ou au mot entier, jamais sur une sous-chaîne. Un identifiant inconnu
/// traverse tel quel : c'est la garde ou l'analyseur qui tranche.
fn passe_symboles(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];

        match c {
            'π' => {
                out.push_str("pi");
                i += 1;
                continue;
            }
            '√' => {
                out.push_str("sqrt");
                i += 1;
                continue;
            }
            '×' => {
                out.push('*');
                i += 1;
                continue;
            }
            '÷' => {
                out.push('/');
                i += 1;
                continue;
            }
            _ => {}
        }

        if c.is_ascii_alphabetic() {
            let debut = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            let mot: String = chars[debut..i].iter().collect();
            out.push_str(&mot.to_ascii_lowercase());
            continue;
        }

        out.push(c);
        i += 1;
    }
    out
}

/* ------------------------ Passe 4 : exposant ------------------------ */

// Classes de caractères des courses d'opérandes de '^' :
// gauche : chiffres . ) e ; droite : chiffres . ( - e
fn classe_gauche(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ')' | 'e')
}

fn classe_droite(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '(' | '-' | 'e')
}

/// Début (inclus) de l'opérande gauche d'un '^' en position `j`.
/// `min` borne la remontée au texte non encore consommé par une expansion
/// précédente. Une course finissant sur ')' remonte à la '(' appariée,
/// plus un éventuel nom de fonction collé devant.
fn operande_gauche(chars: &[char], min: usize, j: usize) -> Option<usize> {
    if j == min {
        return None;
    }
    let fin = j;
    let mut i = j;
    while i > min && classe_gauche(chars[i - 1]) {
        i -= 1;
    }
    if i == fin {
        return None;
    }

    if chars[fin - 1] == ')' {
        let mut prof = 0i32;
        let mut k = fin;
        while k > min {
            k -= 1;
            match chars[k] {
                ')' => prof += 1,
                '(' => {
                    prof -= 1;
                    if prof == 0 {
                        // nom de fonction collé à la parenthèse ?
                        let mut f = k;
                        while f > min && chars[f - 1].is_ascii_alphabetic() {
                            f -= 1;
                        }
                        return Some(f);
                    }
                }
                _ => {}
            }
        }
        // parenthèses non appariées : on laisse le '^' en place
        return None;
    }

    Some(i)
}

/// Fin (exclue) de l'opérande droit d'un '^' en position `j`.
/// Un opérande commençant par '(' (après un '-' éventuel) est avalé
/// jusqu'à la ')' appariée.
fn operande_droite(chars: &[char], j: usize) -> Option<usize> {
    let debut = j + 1;
    let mut i = debut;
    while i < chars.len() && classe_droite(chars[i]) {
        if chars[i] == '(' {
            let mut prof = 0i32;
            let mut k = i;
            while k < chars.len() {
                match chars[k] {
                    '(' => prof += 1,
                    ')' => {
                        prof -= 1;
                        if prof == 0 {
                            return Some(k + 1);
                        }
                    }
                    _ => {}
                }
                k += 1;
            }
            // '(' jamais refermée : on laisse le '^' en place
            return None;
        }
        i += 1;
    }
    if i == debut {
        None
    } else {
        Some(i)
    }
}

/// `<gauche>^<droite>` devient `pow(<gauche>,<droite>)`. Balayage unique
/// de gauche à droite : `2^3^2` s'expanse en `pow(2,3)^2` (le '^' restant
/// attendra un prochain tour... du pipeline appelant, ou l'évaluateur,
/// qui possède un '^' natif). Un '^' sans opérande reconnu reste en place.
fn passe_exposant(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 16);
    let mut emis = 0usize; // tout ce qui précède `emis` est déjà dans `out`
    let mut j = 0usize;
    while j < chars.len() {
        if chars[j] != '^' {
            j += 1;
            continue;
        }

        let (g, d) = match (operande_gauche(&chars, emis, j), operande_droite(&chars, j)) {
            (Some(g), Some(d)) => (g, d),
            _ => {
                j += 1;
                continue;
            }
        };

        out.extend(&chars[emis..g]);
        out.push_str("pow(");
        out.extend(&chars[g..j]);
        out.push(',');
        out.extend(&chars[j + 1..d]);
        out.push(')');

        emis = d;
        j = d;
    }
    out.extend(&chars[emis..]);
    out
}

/* ------------------------ API du réécrivain ------------------------ */

/// Réécriture complète (passes 1 -> 4). Totale : ne refuse jamais ; la
/// garde de caractères est le contrat de sortie, appliqué par le pipeline.
pub fn reecrit(brut: &str) -> String {
    let s = passe_pourcent(brut);
    let s = passe_factorielle(&s);
    let s = passe_symboles(&s);
    passe_exposant(&s)
}

/// Lettres des noms que l'évaluateur connaît :
/// sin cos tan asin acos atan log ln sqrt pow pi e
const LETTRES_ADMISES: &str = "acegilnopqrstw";

/// Garde de caractères, contrat de sortie du réécrivain : chiffres,
/// `. + - * / ^ ( ) , %` et les lettres (sans casse) des noms admis.
/// Tout autre caractère est refusé AVANT l'évaluateur.
pub fn garde_caracteres(s: &str) -> ResultatEval<()> {
    for c in s.chars() {
        let ok = c.is_ascii_digit()
            || matches!(c, '.' | '+' | '-' | '*' | '/' | '^' | '(' | ')' | ',' | '%')
            || LETTRES_ADMISES.contains(c.to_ascii_lowercase());
        if !ok {
            return Err(ErreurEval::CaractereInterdit(c));
        }
    }
    Ok(())
}

/* ------------------------ Tests ------------------------ */
