/// Normalise un email pour les comparaisons (trim + minuscules).
/// Utilisé à l'écriture des inscriptions ET à la recherche par email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
        assert_eq!(normalize_email("a@b.c"), "a@b.c");
    }
}
