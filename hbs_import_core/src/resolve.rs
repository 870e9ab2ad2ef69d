//! Lexical path arithmetic for relative import paths.
//!
//! Nothing here touches the filesystem. Relative and absolute inputs are
//! treated as rooted at the same base, so `a/b` and `/a/b` resolve alike.

use crate::ImportDeclaration;

/// Replace platform separators with forward slashes.
pub fn normalize_slashes(path: &str) -> String {
	path.replace('\\', "/")
}

/// Resolve an import path as seen from the template at `relative_path` and
/// express it relative to `project_root`.
///
/// Only paths starting with `.` are rewritten. Anything else is an
/// addressable component name and is returned unchanged.
pub fn resolve_import_path(import_path: &str, relative_path: &str, project_root: &str) -> String {
	if !import_path.starts_with('.') {
		return import_path.to_string();
	}

	let mut target = segments(relative_path);
	// The template file itself; imports resolve from its directory.
	target.pop();
	push_segments(&mut target, import_path);

	let root = segments(project_root);
	relative_between(&root, &target)
}

/// Rewrite the import path of every declaration in place.
pub fn resolve_declarations(
	declarations: &mut [ImportDeclaration],
	relative_path: &str,
	project_root: &str,
) {
	for declaration in declarations {
		declaration.import_path =
			resolve_import_path(&declaration.import_path, relative_path, project_root);
	}
}

fn segments(path: &str) -> Vec<String> {
	let mut result = Vec::new();
	push_segments(&mut result, path);
	result
}

fn push_segments(stack: &mut Vec<String>, path: &str) {
	for segment in normalize_slashes(path).split('/') {
		match segment {
			"" | "." => {}
			".." => {
				stack.pop();
			}
			other => stack.push(other.to_string()),
		}
	}
}

/// The forward-slash path leading from `from` to `to`. Empty when both are
/// the same location.
fn relative_between(from: &[String], to: &[String]) -> String {
	let common = from
		.iter()
		.zip(to)
		.take_while(|(left, right)| left == right)
		.count();

	let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
	parts.extend(std::iter::repeat_n("..", from.len() - common));
	parts.extend(to[common..].iter().map(String::as_str));
	parts.join("/")
}
