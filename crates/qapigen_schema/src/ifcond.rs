//! Build-time condition guards.

use std::fmt;

/// A conjunction of preprocessor expressions gating a declaration or definition.
///
/// An empty condition means "always compiled". Conjuncts keep their declaration order, which is also the nesting
/// order of the rendered `#if` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IfCond(Vec<String>);

impl IfCond {
    /// The unconditional guard.
    pub fn always() -> Self {
        Self(Vec::new())
    }

    /// Build a guard from conjuncts, dropping blanks and exact duplicates.
    pub fn new<I, S>(conds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for cond in conds {
            let cond = cond.into().trim().to_string();
            if !cond.is_empty() && !out.contains(&cond) {
                out.push(cond);
            }
        }
        Self(out)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Conjuncts of `other` that this guard does not imply.
    ///
    /// Implication is syntactic: a conjunct is implied when this guard carries the identical expression.
    ///
    /// ## Examples
    /// ```rust
    /// use qapigen_schema::IfCond;
    ///
    /// let cmd = IfCond::new(["defined(CONFIG_A)", "defined(CONFIG_B)"]);
    /// let ty = IfCond::new(["defined(CONFIG_A)", "defined(CONFIG_C)"]);
    /// assert_eq!(cmd.missing(&ty), vec!["defined(CONFIG_C)"]);
    /// ```
    pub fn missing<'a>(&self, other: &'a IfCond) -> Vec<&'a str> {
        other.iter().filter(|c| !self.0.iter().any(|own| own == c)).collect()
    }

}

impl fmt::Display for IfCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        write!(f, "{}", self.0.join(" && "))
    }
}
