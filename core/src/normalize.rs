//! CPF normalization.

/// Reduces a raw CPF entry to its canonical form.
///
/// Keeps only the ASCII digits `0`-`9`, in their original order. Any input
/// is accepted; an entry without digits yields an empty string. The
/// operation is idempotent.
///
/// # Examples
///
/// ```
/// use cadastro_core::normalize_cpf;
///
/// assert_eq!(normalize_cpf("123.456.789-09"), "12345678909");
/// assert_eq!(normalize_cpf("n/a"), "");
/// ```
pub fn normalize_cpf(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Returns `true` if `id` is already in canonical (digit-only) form.
pub fn is_canonical(id: &str) -> bool {
    id.chars().all(|c| c.is_ascii_digit())
}
