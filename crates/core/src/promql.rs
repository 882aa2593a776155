use crate::defect::{Defect, DefectPath};

/// Lexical check of a single PromQL expression. Returns every applicable
/// defect in discovery order; never panics. This is deliberately not a
/// PromQL parser: it catches delimiter/quote damage and garbage bytes, not
/// semantic mistakes.
pub fn check(expr: &str) -> Vec<Defect> {
    let mut defects = Vec::new();

    if expr.trim().is_empty() {
        defects.push(lexical("empty expression"));
        return defects;
    }

    let mut delims = [
        DelimClass::new('(', ')', "parentheses", "()"),
        DelimClass::new('[', ']', "brackets", "[]"),
        DelimClass::new('{', '}', "braces", "{}"),
    ];
    let mut in_string: Option<char> = None;
    let mut escape = false;
    let mut control_reported = false;

    'scan: for (pos, ch) in expr.chars().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if ch == '\\' {
            escape = true;
            continue;
        }
        if let Some(quote) = in_string {
            if ch == quote {
                in_string = None;
            }
            continue;
        }
        // Backtick is treated as a string delimiter alongside ' and " so
        // anything inside it is opaque to the delimiter counters.
        if ch == '"' || ch == '\'' || ch == '`' {
            in_string = Some(ch);
            continue;
        }
        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            if !control_reported {
                control_reported = true;
                defects.push(lexical(format!("control character at position {pos}")));
            }
            continue;
        }
        for class in delims.iter_mut() {
            if ch == class.open {
                if !class.dead {
                    class.depth += 1;
                }
                continue 'scan;
            }
            if ch == class.close {
                if class.dead {
                    continue 'scan;
                }
                if class.depth == 0 {
                    // One defect per class, then stop counting it so a
                    // run of stray closers does not flood the report.
                    class.dead = true;
                    defects.push(lexical(format!(
                        "unmatched closing '{}' at position {pos}",
                        class.close
                    )));
                } else {
                    class.depth -= 1;
                }
                continue 'scan;
            }
        }
    }

    if in_string.is_some() {
        defects.push(lexical("unterminated string literal"));
    }
    for class in &delims {
        if !class.dead && class.depth > 0 {
            defects.push(lexical(format!(
                "unclosed {} {}, {} unmatched",
                class.plural, class.pair, class.depth
            )));
        }
    }

    let trimmed = expr.trim();
    if trimmed.starts_with(['=', '<', '>', '!']) {
        defects.push(lexical("expression starts with a comparison operator"));
    }
    if trimmed.ends_with(['=', '<', '>', '!']) {
        defects.push(lexical("expression ends with a comparison operator"));
    }

    defects
}

struct DelimClass {
    open: char,
    close: char,
    plural: &'static str,
    pair: &'static str,
    depth: usize,
    dead: bool,
}

impl DelimClass {
    fn new(open: char, close: char, plural: &'static str, pair: &'static str) -> Self {
        Self {
            open,
            close,
            plural,
            pair,
            depth: 0,
            dead: false,
        }
    }
}

fn lexical(message: impl Into<String>) -> Defect {
    Defect::lexical(DefectPath::document(), message)
}
