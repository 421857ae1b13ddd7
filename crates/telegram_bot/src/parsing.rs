use engine::Amount;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EntryInput {
    pub amount: Amount,
    pub note: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("invalid amount")]
    InvalidAmount,
}

/// Parses `"<amount> [note words...]"`.
///
/// The first whitespace-delimited token is the amount; the remaining tokens,
/// joined by single spaces, are the note (empty when absent).
pub(crate) fn parse_entry_input(input: &str) -> Result<EntryInput, ParseError> {
    let mut tokens = input.split_whitespace();
    let amount = tokens
        .next()
        .ok_or(ParseError::InvalidAmount)?
        .parse::<Amount>()
        .map_err(|_| ParseError::InvalidAmount)?;
    let note = tokens.collect::<Vec<_>>().join(" ");

    Ok(EntryInput { amount, note })
}
