use super::model::{
    Dataset, FieldValue, Record, QUALITY_FIELD, TYPE_FIELD, WINE_PROPERTIES,
};
use crate::error::Result;

/// Number of records the dashboard synthesizes when no file is given.
pub const DEFAULT_SAMPLE_COUNT: usize = 1500;

const QUALITIES: [i64; 7] = [3, 4, 5, 6, 7, 8, 9];
const WINE_TYPES: [&str; 3] = ["Red", "White", "Rosé"];

/// How a numeric property is drawn: `base + uniform * span`.
enum Draw {
    /// Rounded to a number of decimals.
    Decimal { base: f64, span: f64, decimals: i32 },
    /// Floored to an integer.
    Whole { base: f64, span: f64 },
}

/// Generation rule per physicochemical property, in [`WINE_PROPERTIES`] order
/// (quality is drawn separately).
const RULES: [(&str, Draw); 11] = [
    ("fixed acidity", Draw::Decimal { base: 4.0, span: 10.0, decimals: 2 }),
    ("volatile acidity", Draw::Decimal { base: 0.1, span: 1.2, decimals: 3 }),
    ("citric acid", Draw::Decimal { base: 0.0, span: 0.8, decimals: 3 }),
    ("residual sugar", Draw::Decimal { base: 0.5, span: 15.0, decimals: 2 }),
    ("chlorides", Draw::Decimal { base: 0.01, span: 0.4, decimals: 3 }),
    ("free sulfur dioxide", Draw::Whole { base: 5.0, span: 60.0 }),
    ("total sulfur dioxide", Draw::Whole { base: 20.0, span: 250.0 }),
    ("density", Draw::Decimal { base: 0.99, span: 0.01, decimals: 4 }),
    ("pH", Draw::Decimal { base: 2.8, span: 1.5, decimals: 2 }),
    ("sulphates", Draw::Decimal { base: 0.3, span: 1.5, decimals: 2 }),
    ("alcohol", Draw::Decimal { base: 8.0, span: 7.0, decimals: 1 }),
];

/// Generate `count` wine records with uniformly drawn properties.
///
/// Deterministic for a given `seed`. Quality is uniform over 3–9 and
/// independent of the other properties, so correlations hover around zero.
pub fn generate(count: usize, seed: u64) -> Result<Dataset> {
    let mut rng = SimpleRng::new(seed);

    let records: Vec<Record> = (0..count)
        .map(|_| {
            let quality = QUALITIES[rng.below(QUALITIES.len())];
            let wine_type = WINE_TYPES[rng.below(WINE_TYPES.len())];

            let mut record = Record::new();
            for (name, draw) in &RULES {
                let value = match *draw {
                    Draw::Decimal { base, span, decimals } => {
                        FieldValue::Float(round_to(rng.next_f64() * span + base, decimals))
                    }
                    Draw::Whole { base, span } => {
                        FieldValue::Integer((rng.next_f64() * span + base).floor() as i64)
                    }
                };
                record.insert(*name, value);
            }
            record.insert(QUALITY_FIELD, quality);
            record.insert(TYPE_FIELD, wine_type);
            record
        })
        .collect();

    let fields = WINE_PROPERTIES
        .iter()
        .chain(std::iter::once(&TYPE_FIELD))
        .map(|f| f.to_string())
        .collect();
    Dataset::new(fields, records)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// xoshiro256** seeded through splitmix64; one stream per `generate` call.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut sm = seed;
        let mut splitmix = || {
            sm = sm.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = sm;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        };
        SimpleRng {
            state: [splitmix(), splitmix(), splitmix(), splitmix()],
        }
    }

    fn next_u64(&mut self) -> u64 {
        let [a, b, c, d] = &mut self.state;
        let out = b.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let shifted = *b << 17;
        *c ^= *a;
        *d ^= *b;
        *b ^= *c;
        *a ^= *d;
        *c ^= shifted;
        *d = d.rotate_left(45);
        out
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }
}
