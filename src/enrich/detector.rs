use url::Url;

/// First http(s) URL mentioned in free text, if any.
///
/// Handles the ways people paste links into a topic: bare, wrapped in `<>` or
/// `()`, as a markdown link, or followed by sentence punctuation.
pub fn first_url(text: &str) -> Option<Url> {
    text.split_whitespace().find_map(|token| {
        let candidate = candidate(token);
        let url = Url::parse(candidate).ok()?;
        matches!(url.scheme(), "http" | "https").then_some(url)
    })
}

fn candidate(token: &str) -> &str {
    if let Some(start) = token.find("](")
        && let Some(len) = token[start + 2..].find(')')
    {
        return &token[start + 2..start + 2 + len];
    }

    let stripped = token
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(token);
    let stripped = stripped
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(stripped);

    stripped.trim_end_matches(['.', ',', ';', '!', '?', ')'])
}
