//! Pattern lexicons with macro expansion.
//!
//! Macro files define named alternatives, one per line:
//!
//! ```text
//! @BE={be,being,been,am,is,are,was,were}
//! ```
//!
//! Rule files hold one regular expression per line and refer to a macro as
//! `(@BE)`. Every rule is expanded into one regex per combination of macro
//! options before compiling, so `(@BE) (@NEG) sure` with 8 and 2 options
//! yields 16 regexes. A text's score for a lexicon is the number of expanded
//! regexes that match it at least once.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

fn macro_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(@[A-Za-z0-9_]+\)").expect("static regex"))
}

/// Nested macro substitutions allowed while expanding one rule.
pub const MAX_MACRO_DEPTH: usize = 32;

/// Named macro alternatives, keyed by their reference form `(@NAME)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
    macros: BTreeMap<String, Vec<String>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `@NAME={...}` definitions from a macro file. Other lines are
    /// ignored.
    pub fn extend_from(&mut self, content: &str, source: &Path) -> Result<()> {
        for (idx, line) in content.lines().enumerate() {
            if !line.starts_with('@') {
                continue;
            }
            let line = line.trim();
            let malformed = || Error::lexicon(source, idx + 1, format!("malformed macro `{line}`"));

            let (name, body) = line.split_once('=').ok_or_else(malformed)?;
            let options = body
                .strip_prefix('{')
                .and_then(|b| b.split('}').next())
                .filter(|_| body.contains('}'))
                .ok_or_else(malformed)?;

            self.macros.insert(
                format!("({})", name.trim()),
                options.split(',').map(str::to_string).collect(),
            );
        }
        Ok(())
    }

    pub fn insert(&mut self, name: &str, options: &[&str]) {
        self.macros.insert(
            format!("(@{})", name.trim_start_matches('@')),
            options.iter().map(|o| o.to_string()).collect(),
        );
    }

    pub fn get(&self, reference: &str) -> Option<&[String]> {
        self.macros.get(reference).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Expand every macro reference in `rule`.
    ///
    /// Returns an error message naming the unknown reference, or the rule
    /// when expansion nests deeper than [`MAX_MACRO_DEPTH`] (a macro that
    /// refers to itself).
    pub fn expand(&self, rule: &str) -> std::result::Result<Vec<String>, String> {
        self.expand_at(rule, 0)
    }

    fn expand_at(&self, rule: &str, depth: usize) -> std::result::Result<Vec<String>, String> {
        let Some(found) = macro_reference().find(rule) else {
            return Ok(vec![rule.to_string()]);
        };
        if depth >= MAX_MACRO_DEPTH {
            return Err(format!("macro expansion deeper than {MAX_MACRO_DEPTH} in `{rule}`"));
        }
        let reference = found.as_str();
        let options = self
            .get(reference)
            .ok_or_else(|| format!("unknown macro {reference}"))?;

        let mut expanded = Vec::new();
        for option in options {
            expanded.extend(self.expand_at(&rule.replace(reference, option), depth + 1)?);
        }
        Ok(expanded)
    }
}

/// A compiled rule file.
#[derive(Debug, Clone)]
pub struct PatternLexicon {
    name: String,
    patterns: Vec<Regex>,
}

impl PatternLexicon {
    /// Compile a rule file. Blank lines, `#` comments and `@` macro
    /// definitions are skipped.
    pub fn compile(name: &str, content: &str, macros: &MacroTable, source: &Path) -> Result<Self> {
        let mut patterns = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('@') {
                continue;
            }
            let expanded = macros
                .expand(line)
                .map_err(|message| Error::lexicon(source, idx + 1, message))?;
            for rule in expanded {
                let regex = Regex::new(&rule)
                    .map_err(|e| Error::lexicon(source, idx + 1, format!("invalid pattern: {e}")))?;
                patterns.push(regex);
            }
        }
        Ok(PatternLexicon {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of patterns matching `text` at least once.
    pub fn count(&self, text: &str) -> usize {
        self.patterns.iter().filter(|re| re.is_match(text)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macros() -> MacroTable {
        let mut table = MacroTable::new();
        table
            .extend_from(
                "# modal macros\n@BE={be,is,are}\n@NEG={not,never}\nignored line\n",
                Path::new("modals.tff"),
            )
            .unwrap();
        table
    }

    #[test]
    fn test_macro_definitions() {
        let table = macros();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("(@BE)").unwrap(), ["be", "is", "are"]);
    }

    #[test]
    fn test_expansion_covers_every_combination() {
        let expanded = macros().expand(r"\b(@BE) (@NEG) sure\b").unwrap();
        assert_eq!(expanded.len(), 6);
        assert!(expanded.contains(&r"\bis never sure\b".to_string()));
        assert!(expanded.iter().all(|r| !r.contains('@')));
    }

    #[test]
    fn test_compile_and_count() {
        let rules = "#doubt\n\n\\bi (@BE) (@NEG) sure\\b\n\\bdoubtful\\b\n";
        let lex = PatternLexicon::compile("doubt", rules, &macros(), Path::new("doubt.tff")).unwrap();
        assert_eq!(lex.len(), 7);
        assert_eq!(lex.name(), "doubt");
        assert_eq!(lex.count("well i are not sure, and i be never sure"), 2);
        assert_eq!(lex.count("i am doubtful, doubtful indeed"), 1);
        assert_eq!(lex.count(""), 0);
    }

    #[test]
    fn test_unknown_macro_is_fatal() {
        let err = PatternLexicon::compile("x", "(@MISSING) thing", &macros(), Path::new("x.tff"))
            .unwrap_err();
        assert!(err.to_string().contains("(@MISSING)"));
    }

    #[test]
    fn test_self_referencing_macro_is_fatal() {
        let mut table = macros();
        table.insert("LOOP", &["again (@LOOP)", "done"]);
        let err = PatternLexicon::compile("x", "\\b(@LOOP)\\b", &table, Path::new("x.tff")).unwrap_err();
        assert!(matches!(err, Error::Lexicon { line: 1, .. }));
        assert!(err.to_string().contains("deeper than"));
    }

    #[test]
    fn test_malformed_macro_is_fatal() {
        let mut table = MacroTable::new();
        assert!(table.extend_from("@BROKEN=be,is", Path::new("m.tff")).is_err());
    }

    #[test]
    fn test_invalid_regex_is_fatal() {
        let err = PatternLexicon::compile("x", "unclosed (group", &macros(), Path::new("x.tff"))
            .unwrap_err();
        assert!(matches!(err, Error::Lexicon { line: 1, .. }));
    }
}
