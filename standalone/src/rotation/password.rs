//! Replacement password generation.

use rand::Rng;

/// Length of every generated password.
pub const PASSWORD_LENGTH: usize = 12;

/// Characters a generated password is drawn from.
///
/// `u`, `f`, `s`, `b`, `$`, `(` and `)` are left out so random output cannot
/// spell certain words.
pub const PASSWORD_ALPHABET: &str =
    "acdeghijklmnopqrtvwxyzACDEGHIJKLMNOPQRTVWXYZ0123456789.|~@^&";

/// Generate a replacement password from the thread-local RNG.
///
/// # Examples
///
/// ```
/// use standalone::rotation::{generate_password, PASSWORD_ALPHABET, PASSWORD_LENGTH};
///
/// let password = generate_password();
/// assert_eq!(password.len(), PASSWORD_LENGTH);
/// assert!(password.chars().all(|c| PASSWORD_ALPHABET.contains(c)));
/// ```
#[must_use]
pub fn generate_password() -> String {
    generate_password_with(&mut rand::thread_rng())
}

/// Generate a replacement password from the given RNG.
pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let alphabet = PASSWORD_ALPHABET.as_bytes();
    (0..PASSWORD_LENGTH)
        .map(|_| char::from(alphabet[rng.gen_range(0..alphabet.len())]))
        .collect()
}
