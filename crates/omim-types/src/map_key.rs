//! OMIM phenotype mapping key.
//!
//! Every disorder line of the morbid map ends with a single character in
//! parentheses describing how the disorder was placed on the gene map.

use std::fmt;

/// Phenotype mapping key from the morbid map file.
///
/// # Examples
///
/// ```
/// use omim_types::MapKey;
///
/// let key = MapKey::from_char('3');
/// assert_eq!(key, MapKey::MolecularBasis);
/// assert_eq!(key.to_string(), "(3)");
/// assert_eq!(MapKey::from_char('x'), MapKey::Other('x'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapKey {
    /// (1) The disorder was positioned by mapping of the wildtype gene.
    Association,
    /// (2) The disorder itself was mapped, usually by linkage.
    Linkage,
    /// (3) The molecular basis of the disorder is known.
    MolecularBasis,
    /// (4) A contiguous gene deletion or duplication syndrome.
    ChromosomalRearrangement,
    /// Any other single-character token.
    Other(char),
}

impl MapKey {
    /// Creates a MapKey from the character between the parentheses.
    pub fn from_char(c: char) -> Self {
        match c {
            '1' => Self::Association,
            '2' => Self::Linkage,
            '3' => Self::MolecularBasis,
            '4' => Self::ChromosomalRearrangement,
            other => Self::Other(other),
        }
    }

    /// Returns the character this key is written as.
    pub fn as_char(self) -> char {
        match self {
            Self::Association => '1',
            Self::Linkage => '2',
            Self::MolecularBasis => '3',
            Self::ChromosomalRearrangement => '4',
            Self::Other(c) => c,
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        for c in ['1', '2', '3', '4'] {
            let key = MapKey::from_char(c);
            assert!(!matches!(key, MapKey::Other(_)));
            assert_eq!(key.as_char(), c);
        }
    }

    #[test]
    fn test_ordering_groups_known_keys_first() {
        let mut keys = vec![MapKey::Other('?'), MapKey::MolecularBasis, MapKey::Association];
        keys.sort();
        assert_eq!(
            keys,
            vec![MapKey::Association, MapKey::MolecularBasis, MapKey::Other('?')]
        );
    }
}
