//! Amount and denomination parsing helpers.
//!
//! Chain amounts arrive as `<integer><denom>` with no separator, e.g.
//! `1000000000nund` or `500000ibc/DEADBEEF...`. Parsing scans the leading
//! digit run; everything after it is the denom. Malformed input degrades to a
//! zero amount, never an error.

/// Splits a raw `<integer><denom>` string into its numeric amount and denom.
pub fn split_amount_denom(raw: &str) -> (f64, String) {
	let digits_end = raw
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(raw.len());
	let (digits, denom) = raw.split_at(digits_end);
	(digits.parse().unwrap_or(0.0), denom.to_string())
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

/// Formats a value with two decimals and thousands separators,
/// e.g. `1234567.5` becomes `1,234,567.50`.
pub fn format_grouped(value: f64) -> String {
	let formatted = format!("{:.2}", value);
	let (int_part, frac_part) = match formatted.split_once('.') {
		Some(parts) => parts,
		None => (formatted.as_str(), "00"),
	};

	let (sign, digits) = match int_part.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", int_part),
	};

	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(c);
	}

	format!("{}{}.{}", sign, grouped, frac_part)
}

/// Stateful accumulator across the legs of a multi-leg transaction.
///
/// Each call parses one raw amount, adds it to the running total, and returns
/// the cumulative `<total><denom>` string; the final return value feeds the
/// "Total" line.
#[derive(Debug, Default)]
pub struct DenomTotaler {
	total: f64,
	denom: String,
}

impl DenomTotaler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, raw: &str) -> String {
		let (amount, denom) = split_amount_denom(raw);
		self.total += amount;
		if !denom.is_empty() {
			self.denom = denom;
		}
		self.current()
	}

	/// Cumulative `<total><denom>` without adding anything.
	pub fn current(&self) -> String {
		format!("{:.0}{}", self.total, self.denom)
	}
}
