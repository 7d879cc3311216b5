use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default palette seed. Change the seed to get a different color palette.
pub const DEFAULT_SEED: u64 = 6;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Create a random color palette of `n_colors`.
///
/// The generator is owned and re-seeded on every call, so the same
/// `(n_colors, seed)` pair always produces the same sequence of colors.
/// Colors are assigned positionally; label content is never consulted.
pub fn random_color_palette(n_colors: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_colors)
        .map(|_| {
            let mut color = String::with_capacity(7);
            color.push('#');
            for _ in 0..6 {
                color.push(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char);
            }
            color
        })
        .collect()
}
