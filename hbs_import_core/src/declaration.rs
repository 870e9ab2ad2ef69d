use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `{{import LocalName from "path/to/Component"}}`.
///
/// Keywords are case-insensitive, whitespace around tokens is free-form and
/// the path may be single or double quoted. The local name is captured as any
/// whitespace-free run so that malformed names are still found and can be
/// reported by [`is_valid_local_name`].
static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)\{\{\s*import\s+(\S+)\s+from\s+['"]([^'"]+)['"]\s*\}\}"#)
		.unwrap_or_else(|e| panic!("invalid import pattern: {e}"))
});

/// A single `{{import ...}}` directive found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
	/// The bareword the component is bound to, e.g. `FooBar`.
	pub local_name: String,
	/// The import path. Raw as written until
	/// [`resolve_declarations`](crate::resolve_declarations) rewrites
	/// relative paths.
	pub import_path: String,
	/// Whether `local_name` passes [`is_valid_local_name`].
	pub is_local_name_valid: bool,
	/// Byte range of the whole directive in the source content.
	pub span: Range<usize>,
}

impl ImportDeclaration {
	/// Returns `true` when the import path is relative to the importing
	/// template.
	pub fn is_relative(&self) -> bool {
		self.import_path.starts_with('.')
	}
}

/// Content with every import directive removed, together with the removed
/// declarations in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImports {
	pub body: String,
	pub declarations: Vec<ImportDeclaration>,
}

/// Scan `content` for import directives, left to right.
///
/// Every match is cut out of the returned body. Nothing else in the content is
/// touched.
pub fn extract_imports(content: &str) -> ExtractedImports {
	let mut body = String::with_capacity(content.len());
	let mut declarations = Vec::new();
	let mut last_end = 0;

	for captures in IMPORT_PATTERN.captures_iter(content) {
		let (Some(whole), Some(name), Some(path)) =
			(captures.get(0), captures.get(1), captures.get(2))
		else {
			continue;
		};

		body.push_str(&content[last_end..whole.start()]);
		last_end = whole.end();

		let local_name = name.as_str().to_string();
		declarations.push(ImportDeclaration {
			is_local_name_valid: is_valid_local_name(&local_name),
			local_name,
			import_path: path.as_str().to_string(),
			span: whole.range(),
		});
	}

	body.push_str(&content[last_end..]);

	ExtractedImports { body, declarations }
}

/// A local name is valid when it is made of ASCII letters and digits only and
/// its first character is already in upper form.
///
/// Digits have no case, so `1Foo` is accepted.
pub fn is_valid_local_name(name: &str) -> bool {
	let Some(first) = name.chars().next() else {
		return false;
	};

	if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
		return false;
	}

	first.to_ascii_uppercase() == first
}
