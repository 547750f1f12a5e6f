//! C keyword vocabulary (for identifier protection in generated code).

/// C89 keywords.
pub const C89_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum", "extern",
    "float", "for", "goto", "if", "int", "long", "register", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
];

/// Keywords added by C99.
pub const C99_KEYWORDS: &[&str] = &["inline", "restrict", "_Bool", "_Complex", "_Imaginary"];

/// Keywords added by C11.
pub const C11_KEYWORDS: &[&str] = &[
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Generic",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

/// GCC extensions that behave like keywords.
pub const GCC_KEYWORDS: &[&str] = &["asm", "typeof"];

/// Identifiers that C++ reserves; generated headers may be included from C++.
pub const CPP_KEYWORDS: &[&str] = &[
    "bool", "catch", "class", "const_cast", "delete", "dynamic_cast", "explicit", "false", "friend", "mutable",
    "namespace", "new", "operator", "private", "protected", "public", "reinterpret_cast", "static_cast", "template",
    "this", "throw", "true", "try", "typeid", "typename", "using", "virtual", "wchar_t",
];

/// Names that system headers commonly define as macros.
pub const POLLUTED_WORDS: &[&str] = &["unix", "errno", "mips", "sparc", "i386", "linux"];

/// Check whether an identifier must be protected when used as a C name.
pub fn is_reserved(name: &str) -> bool {
    [C89_KEYWORDS, C99_KEYWORDS, C11_KEYWORDS, GCC_KEYWORDS, CPP_KEYWORDS, POLLUTED_WORDS]
        .iter()
        .any(|words| words.contains(&name))
}
