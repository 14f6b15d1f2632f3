//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - les générateurs n'émettent QUE la grammaire admise : la seule erreur
//!   normale est NonFini (zéro au dénominateur, hors domaine, factorielle
//!   débordée) ; toute autre erreur est un bug du pipeline
//! - la soupe de caractères, elle, a le droit de tout produire : l'invariant
//!   est alors « jamais de panique, jamais de non-fini côté Ok »

use std::time::{Duration, Instant};

use super::erreur::ErreurEval;
use super::eval_expression;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {max:?}");
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn est_erreur_attendue(e: &ErreurEval) -> bool {
    matches!(e, ErreurEval::NonFini)
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    // petits littéraux, incluant 0 (les zéros au dénominateur sont voulus)
    const NOMBRES: [&str; 10] = ["0", "1", "2", "3", "5", "7", "10", "0.5", "1.5", "2.5"];
    NOMBRES[rng.pick(NOMBRES.len() as u32) as usize].to_string()
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(8) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "pi".to_string(),
        4 => "e".to_string(),
        5 => "π".to_string(),
        6 => format!("{}%", gen_nombre(rng)),
        // factorielle sur petit entier (reste finie)
        _ => format!("{}!", rng.pick(13)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(12) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}×{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}÷{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("(-{})", gen_expr(rng, depth - 1)),
        6 => {
            let f = match rng.pick(6) {
                0 => "sin",
                1 => "cos",
                2 => "tan",
                3 => "atan",
                4 => "log",
                _ => "ln",
            };
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
        7 => format!("√(({}))", gen_expr(rng, depth - 1)),
        8 => format!("asin(({}))", gen_expr(rng, depth - 1)),
        // puissances : opérande gauche fermé, droite courte
        9 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(4)),
        10 => format!("{}^-{}", gen_nombre(rng), 1 + rng.pick(3)),
        _ => format!("{}^{}", gen_nombre(rng), gen_nombre(rng)),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_grammaire_generee_jamais_refusee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        match eval_expression(&expr) {
            Ok(v) => {
                assert!(v.is_finite(), "non-fini côté Ok: expr={expr:?} v={v}");
                seen_ok += 1;
            }
            Err(e) => {
                // grammaire admise : jamais de CaractereInterdit ni de
                // malformée, seul NonFini est normal ici
                assert!(
                    est_erreur_attendue(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
            }
        }
    }

    // si presque tout échoue, le générateur ne balaye rien
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    // même seed => mêmes expressions => mêmes sorties, au bit près
    let mut rng_a = Rng::new(0xBADC0DE_u64);
    let mut rng_b = Rng::new(0xBADC0DE_u64);

    for _ in 0..100 {
        budget(t0, max);

        let ea = gen_expr(&mut rng_a, 4);
        let eb = gen_expr(&mut rng_b, 4);
        assert_eq!(ea, eb, "générateur non déterministe");

        let ra = eval_expression(&ea);
        let rb = eval_expression(&eb);
        assert_eq!(ra, rb, "évaluation non déterministe pour {ea:?}");
    }
}

#[test]
fn fuzz_safe_hasards_non_finis() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xFACADE_u64);

    // constructions qui DOIVENT finir en NonFini
    for _ in 0..40 {
        budget(t0, max);

        let expr = match rng.pick(4) {
            0 => format!("({})/(0)", gen_expr(&mut rng, 2)),
            1 => format!("√((0-{}))", 1 + rng.pick(9)),
            2 => format!("asin((2+{}))", rng.pick(5)),
            _ => "200!".to_string(),
        };

        // même un numérateur déjà NaN/inf garde le verdict : jamais Ok
        assert_eq!(
            eval_expression(&expr),
            Err(ErreurEval::NonFini),
            "expr={expr:?}"
        );
    }
}

#[test]
fn fuzz_safe_soupe_de_caracteres_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0x5EED_u64);

    const POOL: [char; 34] = [
        '0', '1', '2', '9', '.', '+', '-', '*', '/', '^', '(', ')', ',', '%', '!', '√', '×', '÷',
        'π', 'e', 's', 'i', 'n', 'c', 'o', 'g', 'l', 'q', 'r', 't', 'x', '#', ' ', '@',
    ];

    for _ in 0..250 {
        budget(t0, max);

        let len = 1 + rng.pick(24) as usize;
        let expr: String = (0..len)
            .map(|_| POOL[rng.pick(POOL.len() as u32) as usize])
            .collect();

        // l'invariant : jamais de panique, jamais de non-fini côté Ok
        if let Ok(v) = eval_expression(&expr) {
            assert!(v.is_finite(), "non-fini côté Ok: expr={expr:?} v={v}");
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let expr = somme_balancee("0.5", 800);
    budget(t0, max);

    // 800*(0.5) = 400, arbre en têtes équilibrées (profondeur ~log n)
    let v = eval_expression(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    assert_eq!(v, 400.0);
}
