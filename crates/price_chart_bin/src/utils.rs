pub fn sanitize_ticker(ticker: &str) -> String {
    ticker
        .trim()
        .chars()
        .take(20)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect::<String>()
        .to_uppercase()
}
