//! Module text assembly

use crate::error::{CompilerError, CompilerResult};
use std::collections::HashSet;

/// Linear memory pages given to assembled modules
pub const DEFAULT_MEMORY_PAGES: u32 = 2;

/// Keep the first occurrence of every entry
fn dedup<'a>(items: &'a [String]) -> impl Iterator<Item = &'a String> {
    let mut seen = HashSet::new();
    items.iter().filter(move |item| seen.insert(item.as_str()))
}

/// Assemble module text
///
/// Imports come first, followed by the shared `$sp` global (initialized to
/// `-32`, the empty-stack pointer), linear memory exported as `memory`, the
/// function bodies and one export per name in `exports`.
pub fn build_module(
    funcs: &[String],
    imports: &[String],
    exports: &[String],
    memory_pages: u32,
) -> CompilerResult<String> {
    if exports.is_empty() {
        return Err(CompilerError::NoExports);
    }

    let mut lines: Vec<String> = dedup(imports).map(|import| import.trim().to_string()).collect();
    lines.push("(global $sp (mut i32) (i32.const -32))".to_string());
    lines.push(format!("(memory {})", memory_pages));
    lines.push("(export \"memory\" (memory 0))".to_string());
    lines.extend(dedup(funcs).map(|func| func.trim().to_string()));
    lines.extend(dedup(exports).map(|export| format!("(export \"{0}\" (func ${0}))", export)));

    let mut text = String::from("(module\n");
    for line in lines {
        text.push_str("  ");
        text.push_str(&line);
        text.push('\n');
    }
    text.push(')');
    Ok(text)
}
