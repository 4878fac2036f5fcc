/// Normalize a commander display name into EDHREC's URL slug.
///
/// Characters that are neither word characters nor whitespace are dropped,
/// the rest is lowercased and spaces become `-`.
///
/// ```
/// use edhrec_aggregator::slug::commander_slug;
///
/// assert_eq!(commander_slug("Atraxa, Praetors' Voice"), "atraxa-praetors-voice");
/// ```
pub fn commander_slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}
