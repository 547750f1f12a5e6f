//! Condition guard rendering.
//!
//! A fragment is wrapped as a unit: a leading blank separator line stays outside the guard, nested `#if` lines open
//! in conjunct order and `#endif` lines close in reverse. Wrapping an empty fragment produces nothing, so a guard
//! never brackets an empty region.

use qapigen_schema::IfCond;

use super::c_emitter::CEmitter;

/// Wrap `fragment` in the preprocessor guard for `ifcond`.
///
/// ## Examples
///
/// ```rust
/// use qapigen::backend::ifcond::wrap;
/// use qapigen_schema::IfCond;
///
/// let text = wrap(&IfCond::new(["defined(CONFIG_X)"]), "\nvoid f(void);\n");
/// assert_eq!(text, "\n#if defined(CONFIG_X)\nvoid f(void);\n#endif /* defined(CONFIG_X) */\n");
/// ```
pub fn wrap(ifcond: &IfCond, fragment: &str) -> String {
    if fragment.is_empty() || ifcond.is_empty() {
        return fragment.to_string();
    }
    let (separator, body) = match fragment.strip_prefix('\n') {
        Some(rest) => ("\n", rest),
        None => ("", fragment),
    };

    let mut e = CEmitter::new();
    e.write(separator);
    for cond in ifcond.iter() {
        e.directive(&format!("if {}", cond));
    }
    e.write(body);
    for cond in ifcond.iter().rev() {
        e.directive(&format!("endif /* {} */", cond));
    }
    e.finish()
}
