use rand::{rngs::OsRng, RngCore};

/// Lowercase every alphanumeric character, turn everything else into `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push('-');
        }
    }
    out
}

/// Candidate public link: slug plus an 8-hex-char random suffix. Uniqueness is
/// checked against the store by the caller, which regenerates on collision.
pub fn generate_unique_link(name: &str) -> String {
    let mut buf = [0u8; 4];
    OsRng.fill_bytes(&mut buf);
    format!("{}-{}", slugify(name), hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_replaces_separators() {
        assert_eq!(slugify("Jean Dupont"), "jean-dupont");
        assert_eq!(slugify("ACME & Co."), "acme---co-");
        assert_eq!(slugify("abc123"), "abc123");
    }

    #[test]
    fn slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Émile"), "émile");
    }

    #[test]
    fn unique_link_has_slug_and_hex_suffix() {
        let link = generate_unique_link("Jean Dupont");
        let (slug, suffix) = link.rsplit_once('-').expect("dash separator");
        assert_eq!(slug, "jean-dupont");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn suffixes_differ_between_calls() {
        assert_ne!(
            generate_unique_link("Jean Dupont"),
            generate_unique_link("Jean Dupont")
        );
    }
}
