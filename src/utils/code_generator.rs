//! Short code generation.

/// Characters allowed in generated short codes.
const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest byte value accepted by rejection sampling. 248 is the greatest
/// multiple of 62 that fits in a byte; values above it would skew the
/// distribution toward the start of the alphabet.
const REJECTION_LIMIT: u8 = 248;

/// Generates a random short code of exactly `length` alphanumeric characters.
///
/// Entropy comes from the operating system RNG via `getrandom`. Bytes are
/// mapped onto the 62-character alphabet with rejection sampling, so every
/// character is uniformly distributed. The caller is responsible for
/// collision handling; two calls may produce the same code.
///
/// # Panics
///
/// Panics when the OS refuses to hand out random bytes, which indicates a
/// broken host rather than a recoverable condition.
pub fn generate_code(length: usize) -> String {
    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; 32];

    while code.len() < length {
        getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

        for &byte in &buffer {
            if byte < REJECTION_LIMIT {
                code.push(ALPHABET[(byte % 62) as usize] as char);
                if code.len() == length {
                    break;
                }
            }
        }
    }

    code
}
