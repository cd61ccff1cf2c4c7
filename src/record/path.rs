use std::fmt;

use crate::record::{RecastError, Result};

/// One step in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select a named record field.
	Field(String),
	/// Select a sequence element by zero-based index.
	Index(usize),
	/// Select a mapping entry by key.
	Key(String),
}

/// Location inside a record tree, e.g. `children[2].sheets["Q1"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
	/// Ordered sequence of path steps.
	pub steps: Vec<PathStep>,
}

impl FieldPath {
	/// Parse dotted field syntax with `[index]` and `["key"]` selectors.
	/// Inside a key, `\"` and `\\` escape a quote and a backslash.
	///
	/// A path may open with a selector (`[0].name`) to address top-level sequences and mappings.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = || RecastError::InvalidFieldPath { path: input.to_owned() };
		if input.is_empty() {
			return Err(invalid());
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut steps = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() && is_ident_byte(bytes[idx]) {
				idx += 1;
			}
			if idx > start {
				steps.push(PathStep::Field(input[start..idx].to_owned()));
			} else if start != 0 || bytes[idx] != b'[' {
				return Err(invalid());
			}

			while idx < bytes.len() && bytes[idx] == b'[' {
				idx += 1;
				if idx < bytes.len() && bytes[idx] == b'"' {
					idx += 1;
					let mut key = Vec::new();
					while idx < bytes.len() && bytes[idx] != b'"' {
						if bytes[idx] == b'\\' {
							idx += 1;
							if idx >= bytes.len() || !matches!(bytes[idx], b'"' | b'\\') {
								return Err(invalid());
							}
						}
						key.push(bytes[idx]);
						idx += 1;
					}
					if idx + 1 >= bytes.len() || bytes[idx + 1] != b']' {
						return Err(invalid());
					}
					let key = String::from_utf8(key).map_err(|_| invalid())?;
					steps.push(PathStep::Key(key));
					idx += 2;
					continue;
				}

				let n_start = idx;
				while idx < bytes.len() && bytes[idx].is_ascii_digit() {
					idx += 1;
				}
				if idx == n_start || idx >= bytes.len() || bytes[idx] != b']' {
					return Err(invalid());
				}
				let number = input[n_start..idx].parse::<usize>().map_err(|_| invalid())?;
				steps.push(PathStep::Index(number));
				idx += 1;
			}

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return Err(invalid());
				}
				idx += 1;
				if idx >= bytes.len() {
					return Err(invalid());
				}
			}
		}

		Ok(Self { steps })
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		render_steps(&self.steps, f)
	}
}

/// Render steps in the syntax accepted by [`FieldPath::parse`]; the root renders as `$`.
pub(crate) fn render_steps(steps: &[PathStep], f: &mut impl fmt::Write) -> fmt::Result {
	if steps.is_empty() {
		return f.write_str("$");
	}
	for (i, step) in steps.iter().enumerate() {
		match step {
			PathStep::Field(name) if i == 0 => f.write_str(name)?,
			PathStep::Field(name) => write!(f, ".{name}")?,
			PathStep::Index(index) => write!(f, "[{index}]")?,
			PathStep::Key(key) => {
				f.write_str("[\"")?;
				for ch in key.chars() {
					if matches!(ch, '"' | '\\') {
						f.write_char('\\')?;
					}
					f.write_char(ch)?;
				}
				f.write_str("\"]")?;
			}
		}
	}
	Ok(())
}

pub(crate) fn steps_to_string(steps: &[PathStep]) -> String {
	let mut out = String::new();
	let _ = render_steps(steps, &mut out);
	out
}

fn is_ident_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}
