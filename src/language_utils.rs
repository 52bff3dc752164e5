use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for caption language tags
///
/// Caption files identify tracks with BCP 47 style tags such as `en-US` or
/// `fr`. Only the primary subtag is checked against ISO 639; region and
/// script subtags are accepted as long as they are well formed.
/// Resolve an ISO 639-2/B code to its ISO 639-2/T equivalent
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Primary language subtag of a tag (`en-US` -> `en`)
pub fn primary_subtag(tag: &str) -> &str {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
}

/// Look up the ISO 639 language for a tag's primary subtag
fn lookup(tag: &str) -> Option<Language> {
    let primary = primary_subtag(tag).to_lowercase();
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary)
            .or_else(|| bibliographic_to_terminology(&primary).and_then(Language::from_639_3)),
        _ => None,
    }
}

/// Validate that a tag is a usable language tag with a known primary language
pub fn validate_language_tag(tag: &str) -> Result<()> {
    let trimmed = tag.trim();
    let well_formed = !trimmed.is_empty()
        && trimmed
            .split(['-', '_'])
            .all(|part| !part.is_empty() && part.len() <= 8 && part.chars().all(|c| c.is_ascii_alphanumeric()));

    if !well_formed {
        return Err(anyhow!("Malformed language tag: {}", tag));
    }

    if lookup(trimmed).is_none() {
        return Err(anyhow!("Unknown primary language in tag: {}", tag));
    }

    Ok(())
}

/// Whether the tag's primary subtag is a known ISO 639 language
pub fn is_known_language(tag: &str) -> bool {
    lookup(tag).is_some()
}

/// Check whether two tags name the same track (tags compare case-insensitively)
pub fn language_tags_match(tag1: &str, tag2: &str) -> bool {
    tag1.trim().eq_ignore_ascii_case(tag2.trim())
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let lang = lookup(tag).ok_or_else(|| anyhow!("Unknown language tag: {}", tag))?;
    Ok(lang.to_name().to_string())
}
