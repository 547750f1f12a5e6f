//! Deterministic identifier derivation.
//!
//! Every C identifier in generated code is derived from a schema name through [`c_name`], so the spelling is stable
//! across runs and identical between the declaration and definition streams.

use crate::lang::c_keywords;

/// Mangle a schema name into a C identifier, protecting reserved words.
///
/// ## Parameters
/// - `name`: The schema spelling (e.g. `"query-status"`, `"__org.example_cmd"`).
///
/// ## Returns
/// - The C identifier: `.`, `-` and `+` become `_`; reserved words get a `q_` prefix.
///
/// ## Examples
/// ```rust
/// use qapigen_core::c_name;
///
/// assert_eq!(c_name("query-status"), "query_status");
/// assert_eq!(c_name("__org.example_cmd"), "__org_example_cmd");
/// assert_eq!(c_name("unix"), "q_unix");
/// ```
pub fn c_name(name: &str) -> String {
    let mangled = c_name_unprotected(name);
    if c_keywords::is_reserved(&mangled) {
        format!("q_{mangled}")
    } else {
        mangled
    }
}

/// Mangle a schema name into a C identifier fragment without keyword protection.
///
/// Used where the name is embedded in a longer identifier (`visit_type_<name>`, `<name>List`), so it can never
/// collide with a keyword on its own.
pub fn c_name_unprotected(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' | '-' | '+' => '_',
            other => other,
        })
        .collect()
}

/// Derive the basename of a generated unit.
///
/// ## Parameters
/// - `prefix`: User-supplied prefix prepended to every generated file (may be empty).
/// - `what`: The unit family (e.g. `"qapi-commands"`, `"qapi-types"`).
/// - `module`: The schema module the unit belongs to (e.g. `"qapi/block.json"`).
/// - `main_module`: The top-level schema module.
///
/// ## Returns
/// - `<prefix><what>` for the main module, `<prefix><what>-<stem>` otherwise.
///
/// ## Examples
/// ```rust
/// use qapigen_core::module_basename;
///
/// assert_eq!(module_basename("", "qapi-commands", "schema.json", "schema.json"), "qapi-commands");
/// assert_eq!(module_basename("utm-", "qapi-types", "qapi/block.json", "schema.json"), "utm-qapi-types-block");
/// ```
pub fn module_basename(prefix: &str, what: &str, module: &str, main_module: &str) -> String {
    let mut ret = format!("{prefix}{what}");
    if module != main_module {
        ret.push('-');
        ret.push_str(module_stem(module));
    }
    ret
}

/// File stem of a module path: directory and extension stripped.
fn module_stem(module: &str) -> &str {
    let file = module.rsplit('/').next().unwrap_or(module);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    }
}

/// Derive an include guard macro from a unit basename (`qapi-commands` -> `QAPI_COMMANDS_H`).
pub fn include_guard(basename: &str) -> String {
    let mut guard: String = basename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    guard.push_str("_H");
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_name_translates_separators() {
        assert_eq!(c_name("get-status"), "get_status");
        assert_eq!(c_name("a.b-c+d"), "a_b_c_d");
        assert_eq!(c_name("get_status"), "get_status");
    }

    #[test]
    fn test_c_name_protects_keywords() {
        assert_eq!(c_name("default"), "q_default");
        assert_eq!(c_name("bool"), "q_bool");
        assert_eq!(c_name("errno"), "q_errno");
        assert_eq!(c_name_unprotected("default"), "default");
    }

    #[test]
    fn test_c_name_preserves_case() {
        assert_eq!(c_name("StatusInfo"), "StatusInfo");
    }

    #[test]
    fn test_module_stem() {
        assert_eq!(module_stem("qapi/block-core.json"), "block-core");
        assert_eq!(module_stem("misc"), "misc");
        assert_eq!(module_stem(".hidden"), ".hidden");
    }

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard("qapi-commands"), "QAPI_COMMANDS_H");
        assert_eq!(include_guard("utm-qapi-commands-block"), "UTM_QAPI_COMMANDS_BLOCK_H");
    }
}
