/// Country code applied to numbers entered without one
pub const DEFAULT_COUNTRY_CODE: &str = "+353";

/// Calling code digits for Ireland, whose national trunk prefix `0` is
/// replaced rather than kept
const IRELAND_CALLING_CODE: &str = "353";

/// Maximum number of digits in an E.164 number
const E164_MAX_DIGITS: usize = 15;

/// Towns recognised inside free-text addresses when no town field was given
const KNOWN_TOWNS: &[&str] = &[
    "armagh",
    "dungannon",
    "portadown",
    "lurgan",
    "craigavon",
    "moy",
    "loughgall",
    "richhill",
    "markethill",
    "keady",
    "crossmaglen",
    "newry",
    "belfast",
    "lisburn",
    "banbridge",
    "tandragee",
    "dublin",
    "cork",
    "galway",
    "limerick",
    "waterford",
];

/// Normalize a postcode or Eircode for comparison
///
/// Removes all whitespace and uppercases. Idempotent.
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Normalize a phone number to E.164 shape
///
/// Never fails: malformed input yields a `+`-prefixed digit string that may
/// still be invalid, see [`is_valid_e164`].
///
/// # Arguments
/// * `raw` - Free-text phone number
/// * `default_country_code` - Code applied to national numbers, e.g. `+353`
pub fn normalize_phone_number(raw: &str, default_country_code: &str) -> String {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if trimmed.starts_with('+') {
        return format!("+{}", digits);
    }

    let country_digits: String = default_country_code
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if country_digits == IRELAND_CALLING_CODE {
        if let Some(national) = digits.strip_prefix('0') {
            return format!("+{}{}", country_digits, national);
        }
    }

    if digits.starts_with(&country_digits) {
        format!("+{}", digits)
    } else {
        format!("+{}{}", country_digits, digits)
    }
}

/// Check that a string is `+` followed by 1-15 digits, the first non-zero
pub fn is_valid_e164(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('+') else {
        return false;
    };

    !digits.is_empty()
        && digits.len() <= E164_MAX_DIGITS
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

/// Whether a raw phone field holds any digits at all
#[inline]
pub fn has_phone_digits(raw: &str) -> bool {
    raw.chars().any(|c| c.is_ascii_digit())
}

/// Trim and lowercase a free-text field (names, emails, towns)
#[inline]
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Leading house number of an address, or an empty string
pub fn extract_house_number(address: Option<&str>) -> String {
    address
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}

/// Town for an address
///
/// Uses the explicit town field when present, otherwise the last known town
/// appearing as a whole word in the address, so "12 Belfast Road, Armagh"
/// resolves to the trailing town rather than the street name. Empty when
/// neither is found.
pub fn extract_town(address: Option<&str>, town: Option<&str>) -> String {
    let explicit = normalize_text(town.unwrap_or_default());
    if !explicit.is_empty() {
        return explicit;
    }

    let address = normalize_text(address.unwrap_or_default());
    address
        .rsplit(|c: char| !c.is_alphanumeric())
        .find(|word| KNOWN_TOWNS.contains(word))
        .map(str::to_string)
        .unwrap_or_default()
}
