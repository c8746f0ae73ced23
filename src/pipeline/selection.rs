//! Named feature blocks and which of them go into the dataset.
//!
//! A row is laid out as the user blocks followed by, for the pro side and
//! then the con side, the linguistic blocks and the TF-IDF block. Excluded
//! blocks are left out of the row entirely.

use super::config::FeatureToggle;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Voter blocks in row order. `persuade` is filled in per fold, so it takes
/// no columns in the assembled matrix.
pub const USER_BLOCKS: &[(&str, usize)] = &[
    ("persuade", 0),
    ("opinion", 2),
    ("pol_ideology", 2),
    ("rel_ideology", 2),
    ("decidedness", 1),
    ("undecidedness", 1),
    ("gender", 4),
];

/// Linguistic blocks of one side, in the order the extractor emits them.
/// `arg_lex` and `tfidf` widths depend on the loaded lexicons and vectorizer.
pub const SIDE_BLOCKS: &[(&str, usize)] = &[
    ("length", 1),
    ("ref_opp", 1),
    ("politeness", 1),
    ("evidence", 1),
    ("sentiment", 3),
    ("subjectivity", 4),
    ("swear", 1),
    ("connotation", 2),
    ("pronouns", 3),
    ("modals", 9),
    ("spelling", 1),
    ("numbers", 1),
    ("excl_marks", 1),
    ("questions", 1),
    ("type_ratio", 1),
    ("links", 1),
    ("arg_lex", 17),
];

pub const TFIDF_BLOCK: &str = "tfidf";

/// A block with its resolved width and inclusion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: &'static str,
    pub width: usize,
    pub include: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSelection {
    pub user: Vec<Block>,
    /// Linguistic blocks followed by the TF-IDF block
    pub side: Vec<Block>,
}

impl FeatureSelection {
    /// Resolve toggles against the canonical layout.
    ///
    /// Unknown names and widths that disagree with the layout are
    /// configuration errors. Blocks without a toggle are included.
    pub fn new(toggles: &[FeatureToggle], arg_lex_width: usize, tfidf_width: usize) -> Result<Self> {
        let mut user: Vec<Block> = USER_BLOCKS
            .iter()
            .map(|&(name, width)| Block { name, width, include: true })
            .collect();
        let mut side: Vec<Block> = SIDE_BLOCKS
            .iter()
            .map(|&(name, width)| Block {
                name,
                width: if name == "arg_lex" { arg_lex_width } else { width },
                include: true,
            })
            .collect();
        side.push(Block {
            name: TFIDF_BLOCK,
            width: tfidf_width,
            include: true,
        });

        let mut seen = BTreeSet::new();
        for toggle in toggles {
            if !seen.insert(toggle.name.as_str()) {
                return Err(Error::Config(format!("feature `{}` listed twice", toggle.name)));
            }
            let block = user
                .iter_mut()
                .chain(side.iter_mut())
                .find(|b| b.name == toggle.name)
                .ok_or_else(|| Error::Config(format!("unknown feature `{}`", toggle.name)))?;
            if let Some(width) = toggle.width {
                if width != block.width {
                    return Err(Error::Config(format!(
                        "feature `{}` has width {}, not {width}",
                        block.name, block.width
                    )));
                }
            }
            block.include = toggle.include;
        }

        Ok(FeatureSelection { user, side })
    }

    pub fn includes(&self, name: &str) -> bool {
        self.user
            .iter()
            .chain(&self.side)
            .any(|b| b.name == name && b.include)
    }

    /// Columns in an assembled row (excluding the per-fold `persuade` column).
    pub fn width(&self) -> usize {
        let user: usize = self.user.iter().filter(|b| b.include).map(|b| b.width).sum();
        let side: usize = self.side.iter().filter(|b| b.include).map(|b| b.width).sum();
        user + 2 * side
    }

    /// Width of the linguistic vector one side produces.
    pub fn linguistic_width(&self) -> usize {
        self.side
            .iter()
            .filter(|b| b.name != TFIDF_BLOCK)
            .map(|b| b.width)
            .sum()
    }

    /// Keep the included linguistic blocks of one side's full vector.
    pub fn select_linguistic(&self, side: &[f64], row: &mut Vec<f64>) {
        let mut offset = 0;
        for block in self.side.iter().filter(|b| b.name != TFIDF_BLOCK) {
            if block.include {
                row.extend_from_slice(&side[offset..offset + block.width]);
            }
            offset += block.width;
        }
    }

    /// Column names of an assembled row, `pro.` / `con.` prefixed per side.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for block in self.user.iter().filter(|b| b.include) {
            names.extend((0..block.width).map(|i| format!("{}[{i}]", block.name)));
        }
        for prefix in ["pro", "con"] {
            for block in self.side.iter().filter(|b| b.include) {
                names.extend((0..block.width).map(|i| format!("{prefix}.{}[{i}]", block.name)));
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(name: &str, include: bool, width: Option<usize>) -> FeatureToggle {
        FeatureToggle {
            name: name.to_string(),
            include,
            width,
        }
    }

    #[test]
    fn test_full_layout_width() {
        let sel = FeatureSelection::new(&[], 17, 50).unwrap();
        assert_eq!(sel.linguistic_width(), 49);
        assert_eq!(sel.width(), 12 + 2 * (49 + 50));
        assert_eq!(sel.column_names().len(), sel.width());
    }

    #[test]
    fn test_exclusion_by_omission() {
        let sel = FeatureSelection::new(
            &[toggle("tfidf", false, None), toggle("gender", false, Some(4)), toggle("modals", false, None)],
            17,
            50,
        )
        .unwrap();
        assert_eq!(sel.width(), 8 + 2 * 40);
        assert!(!sel.includes("tfidf"));
        assert!(sel.includes("opinion"));

        let side: Vec<f64> = (0..49).map(f64::from).collect();
        let mut row = Vec::new();
        sel.select_linguistic(&side, &mut row);
        assert_eq!(row.len(), 40);
        assert_eq!(row[16], 16.0); // last `pronouns` column
        assert_eq!(row[17], 26.0); // `spelling` follows with modals removed
    }

    #[test]
    fn test_bad_toggles() {
        assert!(FeatureSelection::new(&[toggle("colour", true, None)], 17, 50).is_err());
        assert!(FeatureSelection::new(&[toggle("modals", true, Some(8))], 17, 50).is_err());
        assert!(FeatureSelection::new(&[toggle("tfidf", true, None), toggle("tfidf", false, None)], 17, 50).is_err());
    }
}
