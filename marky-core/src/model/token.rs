/// The reserved end-of-sentence token.
///
/// Never a key of the transition table; returned by sampling to signal
/// "stop generating".
pub const TERMINATOR: &str = "";

/// Case-folds a token. Surrounding whitespace is dropped, so a blank input
/// folds to the terminator.
pub fn fold(token: &str) -> String {
	token.trim().to_lowercase()
}

/// Returns `true` for the terminator (any blank string).
pub fn is_terminator(token: &str) -> bool {
	token.trim().is_empty()
}

/// Splits a line on runs of whitespace and case-folds every token.
///
/// When the token count is odd, one terminator is appended so that every
/// token takes part in a pair. An empty or blank line yields no tokens.
pub fn tokenize(sentence: &str) -> Vec<String> {
	let mut tokens: Vec<String> = sentence.split_whitespace().map(fold).collect();
	if tokens.len() % 2 == 1 {
		tokens.push(TERMINATOR.to_owned());
	}
	tokens
}
