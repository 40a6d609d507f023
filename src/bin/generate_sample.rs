use std::io::Write;

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const ROWS: usize = 200;
const MISSING_RATE: f64 = 0.05;

const SPECIES: [&str; 3] = ["adelie", "chinstrap", "gentoo"];
const ISLANDS: [&str; 3] = ["Biscoe", "Dream", "Torgersen"];

/// Blank out a cell now and then.
fn maybe_missing(rng: &mut SimpleRng, value: String) -> String {
    if rng.chance(MISSING_RATE) {
        String::new()
    } else {
        value
    }
}

fn main() -> Result<()> {
    let path = std::env::args().nth(1);
    let out: Box<dyn Write> = match &path {
        Some(p) => Box::new(
            std::fs::File::create(p).with_context(|| format!("Failed to create {p}"))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "id",
        "species",
        "island",
        "bill_length_mm",
        "flipper_length_mm",
        "body_mass_g",
        "year",
        "tagged",
    ])?;

    for id in 0..ROWS {
        let species_idx = (rng.next_u64() % SPECIES.len() as u64) as usize;
        let species = SPECIES[species_idx];
        // heavier species have longer flippers and bills
        let size = species_idx as f64;
        let mass = rng.gauss(3700.0 + 700.0 * size, 400.0);
        let flipper = 170.0 + mass / 100.0 + rng.gauss(0.0, 4.0);
        let bill = rng.gauss(39.0 + 4.0 * size, 2.5);
        let island = rng.pick(&ISLANDS).to_string();
        let tagged = rng.chance(0.3).to_string();

        let record = [
            id.to_string(),
            maybe_missing(&mut rng, species.to_string()),
            maybe_missing(&mut rng, island),
            maybe_missing(&mut rng, format!("{bill:.1}")),
            maybe_missing(&mut rng, format!("{flipper:.0}")),
            maybe_missing(&mut rng, format!("{mass:.0}")),
            (2007 + (rng.next_u64() % 3)).to_string(),
            maybe_missing(&mut rng, tagged),
        ];
        writer.write_record(&record)?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    if let Some(p) = path {
        eprintln!("Wrote {ROWS} rows to {p}");
    }
    Ok(())
}
