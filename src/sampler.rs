use log::debug;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::pool::SymbolPool;

/// Bytes pulled from the entropy source for every call to [`generate`].
pub const SEED_BYTES: usize = 128;

/// Longest password [`generate`] will draw.
pub const MAX_LENGTH: usize = 4096;
/// Most passwords [`generate`] will draw in one batch.
pub const MAX_COUNT: usize = 10_000;

/// Somewhere to read seed material from.
pub trait EntropySource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system's entropy source (getrandom, /dev/urandom, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))
    }
}

/// Draws `count` passwords of `length` symbols each from `pool`, seeded
/// once from the operating system.
pub fn generate(pool: &SymbolPool, length: usize, count: usize) -> Result<Vec<String>> {
    generate_with(&mut OsEntropy, pool, length, count)
}

/// Same as [`generate`] but seeded from the given source. Fails without
/// producing anything if the source can't be read.
pub fn generate_with<E: EntropySource>(
    source: &mut E,
    pool: &SymbolPool,
    length: usize,
    count: usize,
) -> Result<Vec<String>> {
    if pool.is_empty() {
        return Err(Error::InvalidArgument("symbol pool is empty".to_string()));
    }
    check_sizes(length, count)?;

    let mut rng = seeded_rng(source)?;
    let symbols = pool.symbols();
    let mut passwords = Vec::new();
    for _ in 0..count {
        let mut password = String::new();
        for _ in 0..length {
            password.push(symbols[rng.random_range(0..symbols.len())]);
        }
        passwords.push(password);
    }
    debug!("generated {} passwords of length {}", count, length);
    Ok(passwords)
}

/// Both sizes must be in `1..=MAX_LENGTH` and `1..=MAX_COUNT`.
pub fn check_sizes(length: usize, count: usize) -> Result<()> {
    check_length(length)?;
    check_count(count)
}

pub fn check_length(length: usize) -> Result<()> {
    in_range("length", length, MAX_LENGTH)
}

pub fn check_count(count: usize) -> Result<()> {
    in_range("count", count, MAX_COUNT)
}

fn in_range(what: &str, value: usize, max: usize) -> Result<()> {
    if value == 0 || value > max {
        return Err(Error::InvalidArgument(format!(
            "{what} should be a positive number no larger than {max}, got {value}"
        )));
    }
    Ok(())
}

fn seeded_rng<E: EntropySource>(source: &mut E) -> Result<StdRng> {
    let mut seed = [0u8; SEED_BYTES];
    source.fill(&mut seed)?;
    // StdRng takes 32 bytes, fold the whole read into it
    let condensed: [u8; 32] = Sha256::digest(seed).into();
    debug!("seeded generator from {} bytes of entropy", SEED_BYTES);
    Ok(StdRng::from_seed(condensed))
}
