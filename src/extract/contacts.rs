//! Email and phone number validation for `mailto:` / `tel:` hrefs

/// Smallest number of digits accepted as a phone number
const MIN_PHONE_DIGITS: usize = 7;

/// Largest number of digits accepted as a phone number (E.164 maximum)
const MAX_PHONE_DIGITS: usize = 15;

/// Characters allowed in the local part besides ASCII alphanumerics
const LOCAL_PART_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~.-";

/// Parses the part of a `mailto:` href that follows the scheme
///
/// Header fields (`?subject=...`) are ignored and comma-separated recipients
/// are split. Only syntactically valid addresses are returned.
pub fn parse_mailto(addresses: &str) -> Vec<String> {
    let recipients = addresses.split('?').next().unwrap_or_default();

    recipients
        .split(',')
        .map(str::trim)
        .filter(|candidate| is_valid_email(candidate))
        .map(str::to_string)
        .collect()
}

/// Parses the part of a `tel:` href that follows the scheme
pub fn parse_tel(number: &str) -> Option<String> {
    let number = number.trim();
    is_valid_phone(number).then(|| number.to_string())
}

/// Checks that an address has the shape `local-part@domain`
///
/// # Rules
///
/// - exactly one `@`, with text on both sides
/// - local part: up to 64 characters, alphanumerics or `!#$%&'*+/=?^_`{|}~.-`,
///   no leading, trailing or doubled dot
/// - domain: at least two dot-separated labels of alphanumerics and hyphens,
///   no label starting or ending with a hyphen, alphabetic top-level label of
///   two or more characters
pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    is_valid_local_part(local) && is_valid_email_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || LOCAL_PART_SPECIALS.contains(c))
}

fn is_valid_email_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld_ok = labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);

    labels_ok && tld_ok
}

/// Checks that a number has a phone shape: optional leading `+`, then digits only
pub fn is_valid_phone(number: &str) -> bool {
    let digits = number.strip_prefix('+').unwrap_or(number);

    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
}
