use std::collections::HashSet;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Canonical comparison form: lower-cased, NFKC-normalized, every non letter/digit replaced
/// by a space, whitespace collapsed and trimmed.
pub fn normalize(input: &str) -> String {
	let mut normalized = String::with_capacity(input.len());

	// Fold before and after NFKC. Compatibility forms such as `Ⅸ` or `ℌ` decompose to
	// upper-case letters, and the output must be a fixed point.
	for ch in input.to_lowercase().nfkc().flat_map(char::to_lowercase) {
		if is_letter_or_digit(ch) {
			normalized.push(ch);
		} else {
			normalized.push(' ');
		}
	}

	let mut out = String::with_capacity(normalized.len());

	for token in normalized.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(token);
	}

	out
}

/// Combining marks carry the Alphabetic property (Arabic harakat among them) but are not
/// letters, so they separate tokens.
fn is_letter_or_digit(ch: char) -> bool {
	ch.is_alphanumeric() && !is_combining_mark(ch)
}

/// Splits an already normalized string into its ordered tokens.
pub fn tokenize(normalized: &str) -> Vec<&str> {
	normalized.split(' ').filter(|token| !token.is_empty()).collect()
}

pub fn token_set(normalized: &str) -> HashSet<&str> {
	tokenize(normalized).into_iter().collect()
}

/// Pads a normalized string with one space on each side for whole-token substring checks.
pub fn pad(normalized: &str) -> String {
	let mut out = String::with_capacity(normalized.len() + 2);

	out.push(' ');
	out.push_str(normalized);
	out.push(' ');

	out
}

#[cfg(test)]
mod tests {
	use super::{normalize, pad, token_set, tokenize};

	#[test]
	fn lowercases_and_strips_punctuation() {
		assert_eq!(normalize("  What CAUSES   pimples?!  "), "what causes pimples");
		assert_eq!(normalize("self-stimulation"), "self stimulation");
	}

	#[test]
	fn compatibility_forms_collapse() {
		assert_eq!(normalize("Ｆｕｌｌｗｉｄｔｈ"), "fullwidth");
		assert_eq!(normalize("ﬁne"), "fine");
		assert_eq!(normalize("Ⅸ"), "ix");
	}

	#[test]
	fn keeps_arabic_letters_and_digits() {
		assert_eq!(normalize("حب الشباب؟"), "حب الشباب");
		assert_eq!(normalize("dose: 500mg"), "dose 500mg");
	}

	#[test]
	fn harakat_split_tokens() {
		assert_eq!(normalize("مَرحبا"), "م رحبا");
		assert_eq!(normalize("شُكْراً"), "ش ك را");
		assert_eq!(tokenize(&normalize("مَرحبا")).len(), 2);
	}

	#[test]
	fn is_total_on_symbol_only_input() {
		assert_eq!(normalize(""), "");
		assert_eq!(normalize("?!... 🙂 --"), "");
	}

	#[test]
	fn is_idempotent() {
		for input in [
			"Hello, World!",
			"Ｆｕｌｌｗｉｄｔｈ Ⅻ ﬀ",
			"ما هو حب الشباب؟",
			"  tabs\tand\nnewlines ",
			"İstanbul ǅ ß",
			"",
		] {
			let once = normalize(input);

			assert_eq!(normalize(&once), once, "Not idempotent for {input:?}.");
		}
	}

	#[test]
	fn tokenizes_in_order_without_empties() {
		let normalized = normalize("does acne go away, acne?");

		assert_eq!(tokenize(&normalized), vec!["does", "acne", "go", "away", "acne"]);
		assert_eq!(token_set(&normalized).len(), 4);
		assert!(tokenize("").is_empty());
	}

	#[test]
	fn pads_with_single_spaces() {
		assert_eq!(pad("acne"), " acne ");
		assert_eq!(pad(""), "  ");
	}
}
