//! Sample input generation.
//!
//! Produces inputs with known statistical shape so the effect of byte
//! frequencies on code lengths is easy to see. Every profile is driven by a
//! seeded `ChaCha8Rng`, so a seed and size always reproduce the same bytes.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;

/// Shape of the generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Lowercase letters, spaces and punctuation
    Text,
    /// Geometric distribution: each byte value half as likely as the last
    Skewed,
    /// Long runs of a single byte
    Runs,
    /// Every byte value equally likely (incompressible)
    Uniform,
    /// 8 KiB blocks cycling through the other profiles at random
    Mixed,
}

const TEXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz .!,\n";

/// Generate `size_bytes` bytes of `profile` data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize, profile: Profile) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);
    fill(&mut rng, &mut data, size_bytes, profile);
    data
}

fn fill(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, count: usize, profile: Profile) {
    match profile {
        Profile::Text => {
            data.extend((0..count).map(|_| TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())]));
        }
        Profile::Skewed => {
            data.extend((0..count).map(|_| {
                let mut value = 0u8;
                while value < u8::MAX && rng.gen_bool(0.5) {
                    value += 1;
                }
                value
            }));
        }
        Profile::Runs => {
            let end = data.len() + count;
            while data.len() < end {
                let byte: u8 = rng.gen();
                let run = rng.gen_range(16..=512).min(end - data.len());
                data.extend(std::iter::repeat(byte).take(run));
            }
        }
        Profile::Uniform => {
            data.extend((0..count).map(|_| rng.gen::<u8>()));
        }
        Profile::Mixed => {
            const BLOCKS: [Profile; 4] = [Profile::Text, Profile::Skewed, Profile::Runs, Profile::Uniform];
            let mut remaining = count;
            while remaining > 0 {
                let block = remaining.min(8192);
                let choice = BLOCKS[rng.gen_range(0..BLOCKS.len())];
                fill(rng, data, block, choice);
                remaining -= block;
            }
        }
    }
}

/// Write generated data to a file.
pub fn write_sample_file(
    path: &std::path::Path,
    seed: u64,
    size_bytes: usize,
    profile: Profile,
) -> std::io::Result<()> {
    let data = generate_sample_data(seed, size_bytes, profile);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Profile; 5] = [
        Profile::Text,
        Profile::Skewed,
        Profile::Runs,
        Profile::Uniform,
        Profile::Mixed,
    ];

    #[test]
    fn test_exact_sizes() {
        for profile in ALL {
            for size in [0, 1, 100, 8193, 40000] {
                let data = generate_sample_data(999, size, profile);
                assert_eq!(data.len(), size, "{profile:?}");
            }
        }
    }

    #[test]
    fn test_determinism() {
        for profile in ALL {
            assert_eq!(
                generate_sample_data(12345, 5000, profile),
                generate_sample_data(12345, 5000, profile)
            );
        }
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(
            generate_sample_data(1, 1000, Profile::Uniform),
            generate_sample_data(2, 1000, Profile::Uniform)
        );
    }

    #[test]
    fn test_text_stays_in_alphabet() {
        let data = generate_sample_data(7, 2000, Profile::Text);
        assert!(data.iter().all(|byte| TEXT_ALPHABET.contains(byte)));
    }

    #[test]
    fn test_skewed_favors_low_values() {
        let data = generate_sample_data(3, 10000, Profile::Skewed);
        let zeros = data.iter().filter(|&&byte| byte == 0).count();
        let ones = data.iter().filter(|&&byte| byte == 1).count();
        assert!(zeros > ones);
        assert!(zeros > 4000);
    }

    #[test]
    fn test_profiles_round_trip() {
        for profile in ALL {
            let data = generate_sample_data(11, 20000, profile);
            let result = huffpuff_core::compress(&data);
            assert_eq!(huffpuff_core::decompress(&result).unwrap(), data);
        }
    }
}
