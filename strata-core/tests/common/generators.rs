//! Stochastic generators for structural tests.
//!
//! Uses seeded RNG for reproducibility. Print the seed on failure so a
//! run can be replayed with `STRATA_TEST_SEED`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_core::{Token, TokenKind};

/// Seeded generator for reproducible stochastic tests.
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with a specific seed (for reproduction).
    pub fn new(seed: u64) -> Self {
        Gen {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from the environment or a random seed.
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("STRATA_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Random boolean with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random short lowercase identifier.
    pub fn name(&mut self) -> String {
        let len = self.rng.gen_range(1..=8);
        (0..len)
            .map(|_| self.rng.gen_range(b'a'..=b'z') as char)
            .collect()
    }

    /// Append one random subtree to a synthetic token array and record
    /// its extent (token count, self included) for every position.
    ///
    /// Byte ranges are left zero; structural walks never look at text.
    /// Object keys are String tokens with `size = 1`, as the tokenizer
    /// produces them.
    pub fn token_tree(&mut self, tokens: &mut Vec<Token>, extents: &mut Vec<usize>, depth: usize) {
        let scalar = depth == 0 || self.chance(0.4);
        if scalar {
            let kind = if self.chance(0.5) { TokenKind::String } else { TokenKind::Primitive };
            tokens.push(Token { kind, start: 0, end: 0, size: 0 });
            extents.push(1);
            return;
        }

        let at = tokens.len();
        if self.chance(0.5) {
            let pairs = self.rng.gen_range(0..4u32);
            tokens.push(Token { kind: TokenKind::Object, start: 0, end: 0, size: pairs });
            extents.push(0);
            for _ in 0..pairs {
                tokens.push(Token { kind: TokenKind::String, start: 0, end: 0, size: 1 });
                extents.push(1);
                self.token_tree(tokens, extents, depth - 1);
            }
        } else {
            let elements = self.rng.gen_range(0..4u32);
            tokens.push(Token { kind: TokenKind::Array, start: 0, end: 0, size: elements });
            extents.push(0);
            for _ in 0..elements {
                self.token_tree(tokens, extents, depth - 1);
            }
        }
        extents[at] = tokens.len() - at;
    }

    /// Random layout document text: nested node objects with a mix of
    /// core keys, factory keys, malformed scalars, and unknown keys.
    pub fn document(&mut self, depth: usize) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if self.chance(0.4) {
            let ty = if self.chance(0.5) { self.name() } else { "default".to_string() };
            pairs.push(format!("\"type\": \"{}\"", ty));
        }
        if self.chance(0.5) {
            pairs.push(format!("\"id\": \"{}\"", self.name()));
        }
        if self.chance(0.6) {
            // Sometimes a malformed frame: wrong length or a bad element.
            let frame = match self.rng.gen_range(0..4u32) {
                0 => "[1, 2]".to_string(),
                1 => "[1, \"x\", 3, 4]".to_string(),
                _ => {
                    let v: Vec<String> =
                        (0..4).map(|_| self.rng.gen_range(-50..200i32).to_string()).collect();
                    format!("[{}]", v.join(", "))
                }
            };
            pairs.push(format!("\"frame\": {}", frame));
        }
        if self.chance(0.4) {
            let color = if self.chance(0.8) {
                format!("\"#{:06x}\"", self.rng.gen_range(0..0x1000000u32))
            } else {
                "\"not-a-color\"".to_string()
            };
            pairs.push(format!("\"background\": {}", color));
        }
        if self.chance(0.3) {
            let clips = if self.chance(0.5) { "true" } else { "false" };
            pairs.push(format!("\"clips\": {}", clips));
        }
        if self.chance(0.3) {
            pairs.push(format!("\"{}\": [3, {{\"deep\": [1, 2]}}]", self.name()));
        }
        if depth > 0 && self.chance(0.7) {
            let count = self.rng.gen_range(0..3usize);
            let children: Vec<String> = (0..count).map(|_| self.document(depth - 1)).collect();
            pairs.push(format!("\"layers\": [{}]", children.join(", ")));
        }
        format!("{{{}}}", pairs.join(", "))
    }
}
