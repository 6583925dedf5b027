use displace_mph::{BuildConfig, Builder, MphError, Table};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;

const N_KEYS: usize = 1_000_000;
const GEN_SEED: u64 = 42;

fn main() -> Result<(), MphError> {
    println!("--- displace_mph test ---");
    println!("n = {N_KEYS}");

    // 1) Generate unique keys
    let t0 = Instant::now();
    let keys = gen_unique_keys(N_KEYS, GEN_SEED);
    let gen_s = t0.elapsed().as_secs_f64();
    println!(
        "gen:    {:>8.3} s   ({:.1} M keys/s)",
        gen_s,
        N_KEYS as f64 / gen_s / 1e6
    );

    // 2) Build
    let t1 = Instant::now();
    let table = Builder::new()
        .with_config(BuildConfig::default())
        .build(&keys)?;
    let build_s = t1.elapsed().as_secs_f64();
    println!(
        "build:  {:>8.3} s   ({:.1} M keys/s)",
        build_s,
        N_KEYS as f64 / build_s / 1e6
    );
    print_layout(&table);

    // 3) Lookup all keys
    let t2 = Instant::now();
    let mut acc: u64 = 0;
    let mut wrong = 0usize;
    for (i, k) in keys.iter().enumerate() {
        let idx = table.index(k);
        wrong += (idx as usize != i) as usize;
        acc ^= idx as u64;
    }
    let lookup_s = t2.elapsed().as_secs_f64();
    println!(
        "lookup: {:>8.3} s   ({:.1} M lookups/s)   (acc={acc}, wrong={wrong})",
        lookup_s,
        N_KEYS as f64 / lookup_s / 1e6
    );

    // 4) Persist
    let bytes = table.to_bytes()?;
    println!("bytes:  {} ({:.2} bytes/key)", bytes.len(), bytes.len() as f64 / N_KEYS as f64);

    println!("----------------------------------------------");
    println!("Total (gen + build + lookup): {:.3} s", gen_s + build_s + lookup_s);

    Ok(())
}

fn print_layout(table: &Table) {
    let raw = table.raw_seeds();
    let direct = raw.iter().filter(|&&s| s < 0).count();
    let max_seed = raw.iter().copied().max().unwrap_or(0);
    println!(
        "table:  size={} direct={} displaced={} max_seed={}",
        table.size(),
        direct,
        raw.len() - direct,
        max_seed
    );
}

/// Generate N unique 16-byte keys (raw bytes), deterministically.
fn gen_unique_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = HashSet::with_capacity(n * 2);
    let mut keys = Vec::with_capacity(n);
    while keys.len() < n {
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        if set.insert(buf) {
            keys.push(buf.to_vec());
        }
    }
    keys
}
