//! Generation of NTT-friendly primes for the modulus chain.

use lhe_util::is_prime;

/// Generate a `num_bits`-bit prime, congruent to 1 mod `modulo`, strictly
/// smaller than `upper_bound`. Note that `num_bits` must belong to (10..=62),
/// and upper_bound must be <= 1 << num_bits.
pub fn generate_prime(num_bits: usize, modulo: u64, upper_bound: u64) -> Option<u64> {
    if !(10..=62).contains(&num_bits) || modulo == 0 || upper_bound < 2 {
        return None;
    }
    debug_assert!(
        (1u64 << num_bits) >= upper_bound,
        "upper_bound larger than number of bits"
    );

    let leading_zeros = (64 - num_bits) as u32;

    // Largest value below upper_bound that is congruent to 1 mod modulo.
    let mut tentative_prime = upper_bound - 1;
    let offset = (tentative_prime + modulo - 1) % modulo;
    if offset > tentative_prime {
        return None;
    }
    tentative_prime -= offset;

    while tentative_prime.leading_zeros() == leading_zeros
        && !is_prime(tentative_prime)
        && tentative_prime > modulo
    {
        tentative_prime -= modulo
    }

    if tentative_prime.leading_zeros() == leading_zeros && is_prime(tentative_prime) {
        Some(tentative_prime)
    } else {
        None
    }
}
