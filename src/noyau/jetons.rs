// src/noyau/jetons.rs

use super::erreur::{ErreurEval, ResultatEval};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Fonctions + constantes (tout ce qui n’est pas opérateur / nombre)
    // NOTE: le parse (RPN->Expr) décidera si c’est une fonction (sin/cos/...)
    // ou une constante (pi/e).
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^
    Comma, // virgule d’appel : pow(a,b)

    // Moins unaire, produit par to_rpn (jamais par tokenize)
    Neg,

    LPar,
    RPar,
}

/// Tokenize une chaîne canonique (sortie du réécrivain) en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 0.5, .5)
/// - opérateurs + - * / ^ et la virgule d’appel
/// - parenthèses ( )
/// - identifiants ASCII [a-zA-Z]+ (normalisés en minuscules)
pub fn tokenize(s: &str) -> ResultatEval<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        // Parenthèses
        if c == '(' {
            out.push(Tok::LPar);
            i += 1;
            continue;
        }
        if c == ')' {
            out.push(Tok::RPar);
            i += 1;
            continue;
        }

        // Opérateurs
        match c {
            '+' => {
                out.push(Tok::Plus);
                i += 1;
                continue;
            }
            '-' => {
                out.push(Tok::Minus);
                i += 1;
                continue;
            }
            '*' => {
                out.push(Tok::Star);
                i += 1;
                continue;
            }
            '/' => {
                out.push(Tok::Slash);
                i += 1;
                continue;
            }
            '^' => {
                out.push(Tok::Caret);
                i += 1;
                continue;
            }
            ',' => {
                out.push(Tok::Comma);
                i += 1;
                continue;
            }
            _ => {}
        }

        // Identifiants ASCII : [a-zA-Z]+ (aucun nom de la table ne mélange
        // lettres et chiffres)
        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombre décimal : course de chiffres et de points, validée par le
        // parseur f64 (refuse "1.2.3", ".", etc.)
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let texte: String = chars[start..i].iter().collect();
            let v: f64 = texte
                .parse()
                .map_err(|_| ErreurEval::malformee(format!("nombre invalide : '{texte}'")))?;
            out.push(Tok::Num(v));
            continue;
        }

        return Err(ErreurEval::malformee(format!("caractère inattendu : '{c}'")));
    }

    Ok(out)
}
