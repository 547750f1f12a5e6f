use std::collections::HashMap;

use qapigen_core::lang::builtins::{self, BUILTIN_TYPES};
use qapigen_core::lang::c_keywords;

#[test]
fn builtin_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, builtins::BuiltinTypeId> = HashMap::new();

    for info in BUILTIN_TYPES {
        assert_eq!(
            builtins::from_str(info.canonical),
            Some(info.id),
            "builtin canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            builtins::info_for(info.id),
            info,
            "registry order does not match enum order for {:?}",
            info.id
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate builtin spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn builtin_param_types_only_differ_for_strings() {
    for info in BUILTIN_TYPES {
        if info.id == builtins::BuiltinTypeId::Str {
            assert_eq!(info.c_param_type, "const char *");
        } else {
            assert_eq!(info.c_type, info.c_param_type, "unexpected param type for {}", info.canonical);
        }
    }
}

#[test]
fn builtin_names_are_not_reserved() {
    // `bool` and `int` are C keywords, but builtin names are only spliced into longer identifiers
    for info in BUILTIN_TYPES {
        if !matches!(info.canonical, "bool" | "int") {
            assert!(
                !c_keywords::is_reserved(info.canonical),
                "builtin {} collides with a C keyword",
                info.canonical
            );
        }
    }
}
