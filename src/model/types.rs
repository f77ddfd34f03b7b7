//! The object type dictionary.
//!
//! The dictionary maps detector class names to type codes. It is loaded once,
//! before any counter is built, and then passed by reference into counter
//! constructors; the set of valid codes defines the key space of every tally
//! table and never changes while counting.

use std::collections::BTreeMap;

use super::ids::TypeCode;
use crate::error::LaneCountError;

/// An immutable, bidirectional `name <-> code` mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDictionary {
    by_code: BTreeMap<TypeCode, String>,
    by_name: BTreeMap<String, TypeCode>,
}

impl TypeDictionary {
    /// Builds a dictionary from `(name, code)` pairs.
    ///
    /// # Errors
    /// Returns [`LaneCountError::DuplicateTypeCode`] if two names share a code.
    /// A repeated name keeps its last code.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, LaneCountError>
    where
        I: IntoIterator<Item = (S, TypeCode)>,
        S: Into<String>,
    {
        let mut by_name: BTreeMap<String, TypeCode> = BTreeMap::new();
        for (name, code) in pairs {
            by_name.insert(name.into(), code);
        }

        let mut by_code: BTreeMap<TypeCode, String> = BTreeMap::new();
        for (name, code) in &by_name {
            if let Some(first) = by_code.get(code) {
                return Err(LaneCountError::DuplicateTypeCode {
                    code: *code,
                    first: first.clone(),
                    second: name.clone(),
                });
            }
            by_code.insert(*code, name.clone());
        }

        Ok(Self { by_code, by_name })
    }

    /// Returns true if `code` is a configured type.
    #[inline]
    pub fn contains(&self, code: TypeCode) -> bool {
        self.by_code.contains_key(&code)
    }

    pub fn name_of(&self, code: TypeCode) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn code_of(&self, name: &str) -> Option<TypeCode> {
        self.by_name.get(name).copied()
    }

    /// All configured codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = TypeCode> + '_ {
        self.by_code.keys().copied()
    }

    /// `(code, name)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeCode, &str)> + '_ {
        self.by_code.iter().map(|(code, name)| (*code, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        let types =
            TypeDictionary::from_pairs([("car", TypeCode(2)), ("bus", TypeCode(5))]).expect("build");
        assert_eq!(types.len(), 2);
        assert!(types.contains(TypeCode(2)));
        assert!(!types.contains(TypeCode(3)));
        assert_eq!(types.name_of(TypeCode(5)), Some("bus"));
        assert_eq!(types.code_of("car"), Some(TypeCode(2)));
        let codes: Vec<TypeCode> = types.codes().collect();
        assert_eq!(codes, vec![TypeCode(2), TypeCode(5)]);
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let err = TypeDictionary::from_pairs([("car", TypeCode(2)), ("van", TypeCode(2))])
            .unwrap_err();
        assert!(matches!(
            err,
            LaneCountError::DuplicateTypeCode { code, .. } if code == TypeCode(2)
        ));
    }
}
