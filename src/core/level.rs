//! Refinement-level selection by member name.
//!
//! Member names are split into tokens on `.` and `_`. The third token's
//! trailing character, when alphabetic, is the level suffix:
//!
//! ```text
//! box_0000_a.zst  -> ["box", "0000", "a", "zst"]  -> level 'a'
//! box_0000_1.zst  -> ["box", "0000", "1", "zst"]  -> unleveled
//! ```

use crate::util::{Error, Result};

/// Level suffix carried by a member name, `None` for unleveled members.
///
/// Fails with [`Error::InvalidMemberName`] when the name has fewer than
/// three tokens or the third token is empty.
pub fn level_suffix(name: &str) -> Result<Option<char>> {
    let normalized = name.replace('.', "_");
    let last = normalized
        .split('_')
        .nth(2)
        .and_then(|token| token.chars().last())
        .ok_or_else(|| Error::InvalidMemberName(name.to_string()))?;
    Ok(last.is_alphabetic().then_some(last))
}

/// The refinement level requested by the caller.
///
/// The empty selector picks members without a level suffix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LevelSelector(String);

impl LevelSelector {
    pub fn new(level: impl Into<String>) -> Self {
        Self(level.into())
    }

    /// Selector for members without a level suffix.
    pub fn unleveled() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_unleveled(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a suffix equals this selector, comparing both as strings.
    pub fn accepts(&self, suffix: Option<char>) -> bool {
        match suffix {
            None => self.0.is_empty(),
            Some(c) => {
                let mut chars = self.0.chars();
                chars.next() == Some(c) && chars.next().is_none()
            }
        }
    }

    /// Whether the member called `name` belongs to the selected level.
    pub fn matches(&self, name: &str) -> Result<bool> {
        Ok(self.accepts(level_suffix(name)?))
    }
}

impl From<&str> for LevelSelector {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Option<char>> for LevelSelector {
    fn from(c: Option<char>) -> Self {
        c.map(|c| Self(c.to_string())).unwrap_or_default()
    }
}

impl std::fmt::Display for LevelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "(unleveled)")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_suffix() {
        assert_eq!(level_suffix("box_0000_a.zst").unwrap(), Some('a'));
        assert_eq!(level_suffix("box_0000_1.zst").unwrap(), None);
        assert_eq!(level_suffix("box.0000.12b.vtk.zst").unwrap(), Some('b'));
        assert_eq!(level_suffix("ham_rl_3c_it").unwrap(), Some('c'));
    }

    #[test]
    fn test_invalid_names() {
        for name in ["box.zst", "box", "box__", "box_0000_.zst"] {
            assert!(
                matches!(level_suffix(name), Err(Error::InvalidMemberName(_))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_unleveled_selector() {
        let sel = LevelSelector::unleveled();
        assert!(sel.matches("box_0000_1.zst").unwrap());
        assert!(!sel.matches("box_0000_a.zst").unwrap());
    }

    #[test]
    fn test_leveled_selector() {
        let sel = LevelSelector::from("a");
        assert!(sel.matches("box_0000_a.zst").unwrap());
        assert!(!sel.matches("box_0000_b.zst").unwrap());
        assert!(!sel.matches("box_0000_1.zst").unwrap());
        assert!(!LevelSelector::from("ab").matches("box_0000_a.zst").unwrap());
    }

    #[test]
    fn test_from_suffix() {
        assert_eq!(LevelSelector::from(Some('c')).as_str(), "c");
        assert!(LevelSelector::from(None).is_unleveled());
        assert_eq!(LevelSelector::unleveled().to_string(), "(unleveled)");
    }
}
