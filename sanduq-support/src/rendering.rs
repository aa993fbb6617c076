//! Text rendering utilities for human-friendly error messages.
//!
//! Formats dependency chains and short type names for error output.

/// Renders a dependency chain as a readable string.
///
/// # Examples
/// ```
/// use sanduq_support::rendering::render_chain;
///
/// let chain = vec!["UserService", "UserRepo", "Database", "UserService"];
/// assert_eq!(render_chain(&chain), "UserService -> UserRepo -> Database -> UserService");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Strips module path segments from a fully-qualified type name.
///
/// Generic arguments are shortened segment by segment, so
/// `alloc::sync::Arc<myapp::Database>` becomes `Arc<Database>`.
///
/// # Examples
/// ```
/// use sanduq_support::rendering::short_type_name;
///
/// assert_eq!(short_type_name("myapp::services::UserService"), "UserService");
/// assert_eq!(short_type_name("i64"), "i64");
/// ```
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (i, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')') {
            out.push_str(last_segment(&full[segment_start..i]));
            out.push(ch);
            segment_start = i + ch.len_utf8();
        }
    }
    out.push_str(last_segment(&full[segment_start..]));
    out
}

fn last_segment(s: &str) -> &str {
    s.rsplit("::").next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_rendering() {
        let chain = vec!["A", "B", "A"];
        assert_eq!(render_chain(&chain), "A -> B -> A");
    }

    #[test]
    fn chain_rendering_single() {
        assert_eq!(render_chain(&["OnlyOne"]), "OnlyOne");
    }

    #[test]
    fn chain_rendering_empty() {
        let empty: Vec<String> = vec![];
        assert_eq!(render_chain(&empty), "");
    }

    #[test]
    fn short_name_plain() {
        assert_eq!(short_type_name("u32"), "u32");
        assert_eq!(short_type_name("my_crate::Foo"), "Foo");
    }

    #[test]
    fn short_name_generic() {
        assert_eq!(
            short_type_name("alloc::sync::Arc<my_crate::db::Database>"),
            "Arc<Database>"
        );
        assert_eq!(
            short_type_name("std::collections::HashMap<alloc::string::String, u64>"),
            "HashMap<String, u64>"
        );
    }
}
