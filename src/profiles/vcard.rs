use crate::profiles::repo_types::Profile;

/// Escape a field value per RFC 2426: backslash, semicolon, comma and
/// newlines. Plain values pass through untouched.
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Render a profile as a vCard 3.0 document, one line per field, `\n`-joined.
pub fn render(profile: &Profile) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape_value(&profile.name)),
        format!("TITLE:{}", escape_value(&profile.job)),
        format!("TEL;TYPE=CELL:{}", escape_value(&profile.phone)),
    ];

    if let Some(email) = &profile.email {
        lines.push(format!("EMAIL:{}", escape_value(email)));
    }
    if let Some(website) = &profile.website {
        lines.push(format!("URL:{}", escape_value(website)));
    }
    if let Some(address) = &profile.address {
        lines.push(format!("ADR:;;{};;;;", escape_value(address)));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_exact_document_for_plain_values() {
        let mut profile = Profile::stub("Jean Dupont", "CEO", "+33612345678");
        profile.email = Some("j@d.com".to_string());

        let card = render(&profile);
        assert_eq!(
            card,
            "BEGIN:VCARD\n\
             VERSION:3.0\n\
             FN:Jean Dupont\n\
             TITLE:CEO\n\
             TEL;TYPE=CELL:+33612345678\n\
             EMAIL:j@d.com\n\
             END:VCARD"
        );
    }

    #[test]
    fn exactly_one_vcard_block() {
        let profile = Profile::stub("Jean Dupont", "CEO", "+33612345678");
        let card = render(&profile);
        assert_eq!(card.matches("BEGIN:VCARD").count(), 1);
        assert_eq!(card.matches("END:VCARD").count(), 1);
        assert!(card.starts_with("BEGIN:VCARD\n"));
        assert!(card.ends_with("\nEND:VCARD"));
    }

    #[test]
    fn optional_fields_are_emitted_when_present() {
        let mut profile = Profile::stub("Jean Dupont", "CEO", "+33612345678");
        profile.website = Some("https://example.com".to_string());
        profile.address = Some("1 rue de Rivoli".to_string());

        let card = render(&profile);
        assert!(card.contains("URL:https://example.com"));
        assert!(card.contains("ADR:;;1 rue de Rivoli;;;;"));
        assert!(!card.contains("EMAIL:"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let mut profile = Profile::stub("Dupont; Jean", "R&D, Lead", "+33612345678");
        profile.address = Some("1 rue\ndu Bac".to_string());

        let card = render(&profile);
        assert!(card.contains("FN:Dupont\\; Jean"));
        assert!(card.contains("TITLE:R&D\\, Lead"));
        assert!(card.contains("ADR:;;1 rue\\ndu Bac;;;;"));
    }

    #[test]
    fn backslashes_are_escaped_first() {
        let profile = Profile::stub("A\\B", "CEO", "+33612345678");
        let card = render(&profile);
        assert!(card.contains("FN:A\\\\B"));
    }
}
