//! Evolve a byte-string population toward a text target.
//!
//! Run with: `cargo run --example evolve_text`

use evogen::{Bytes, Population};

fn main() {
    const TARGET: &[u8] = b"Hello, Rust!";

    let fitness = |genome: &mut Bytes| {
        let hits = genome.iter().zip(TARGET).filter(|(a, b)| a == b).count();
        hits as f32 / TARGET.len() as f32
    };

    let population = Population::new(256, fitness, Bytes::genesis(TARGET.len()));

    for generation in 1..=50_000 {
        let champion = population.evolve();
        if generation % 25 == 0 || champion.as_bytes() == TARGET {
            println!(
                "generation {generation:>6}: {}",
                String::from_utf8_lossy(champion.as_bytes())
            );
        }
        if champion.as_bytes() == TARGET {
            println!("solved in {generation} generations");
            return;
        }
    }

    println!("no perfect match within the generation budget");
}
