//! Lightweight shape check for generated expressions.
//!
//! This is not a JavaScript parser. It checks the contract the fuzz driver
//! relies on when splicing output into a program: one parenthesized group (or
//! an immediately invoked `(...)()` form) with balanced brackets and closed
//! string literals.

/// True when `text` is a single self-contained parenthesized expression.
pub fn is_self_contained(text: &str) -> bool {
    if !text.starts_with('(') || !text.ends_with(')') {
        return false;
    }

    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    // Number of top-level groups seen; an IIFE has exactly two: `(f)` `()`.
    let mut groups = 0usize;

    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => {
                if stack.is_empty() {
                    groups += 1;
                }
                stack.push(c);
            }
            ')' | ']' | '}' => {
                let open = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(open) {
                    return false;
                }
            }
            _ if stack.is_empty() && !c.is_whitespace() => return false,
            _ => {}
        }
    }

    quote.is_none() && stack.is_empty() && (groups == 1 || is_iife(text, groups))
}

fn is_iife(text: &str, groups: usize) -> bool {
    groups == 2 && text.ends_with("()")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_parenthesized_and_iife_forms() {
        assert!(is_self_contained("(void gc())"));
        assert!(is_self_contained("(0)"));
        assert!(is_self_contained(
            "(function() { try { return (startgc(1)); } catch(e) { return undefined; } })()"
        ));
        assert!(is_self_contained("(gc(')'))"));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(!is_self_contained(""));
        assert!(!is_self_contained("0"));
        assert!(!is_self_contained("gc()"));
        assert!(!is_self_contained("(gc()"));
        assert!(!is_self_contained("(gc())(1)(2)"));
        assert!(!is_self_contained("(a) + (b)"));
        assert!(!is_self_contained("(gc('x)"));
        assert!(!is_self_contained("(gc(]))"));
    }
}
