//! Fixed, ordered letter sequences that sheet slots are bound to.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum AlphabetError {
    #[error("alphabet has no letters")]
    Empty,
    #[error("duplicate letter id `{0}`")]
    DuplicateId(String),
    #[error("letter id must be non-empty and free of path separators (got `{0}`)")]
    InvalidId(String),
    #[error("unknown builtin alphabet `{0}`")]
    UnknownBuiltin(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One alphabet slot: a file-name-safe identifier plus an optional code point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub id: String,
    #[serde(default)]
    pub code_point: Option<char>,
}

impl Letter {
    pub fn new(id: impl Into<String>, code_point: Option<char>) -> Self {
        Self {
            id: id.into(),
            code_point,
        }
    }
}

/// Ordered letter sequence. Slot `i` of a segmented sheet is bound to letter `i`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Alphabet {
    letters: Vec<Letter>,
}

impl<'de> Deserialize<'de> for Alphabet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let letters = Vec::<Letter>::deserialize(deserializer)?;
        Alphabet::new(letters).map_err(serde::de::Error::custom)
    }
}

const HEBREW: [(&str, char); 27] = [
    ("alef", '\u{05D0}'),
    ("bet", '\u{05D1}'),
    ("gimel", '\u{05D2}'),
    ("dalet", '\u{05D3}'),
    ("he", '\u{05D4}'),
    ("vav", '\u{05D5}'),
    ("zayin", '\u{05D6}'),
    ("het", '\u{05D7}'),
    ("tet", '\u{05D8}'),
    ("yod", '\u{05D9}'),
    ("kaf", '\u{05DB}'),
    ("lamed", '\u{05DC}'),
    ("mem", '\u{05DE}'),
    ("nun", '\u{05E0}'),
    ("samekh", '\u{05E1}'),
    ("ayin", '\u{05E2}'),
    ("pe", '\u{05E4}'),
    ("tsadi", '\u{05E6}'),
    ("qof", '\u{05E7}'),
    ("resh", '\u{05E8}'),
    ("shin", '\u{05E9}'),
    ("tav", '\u{05EA}'),
    ("final_kaf", '\u{05DA}'),
    ("final_mem", '\u{05DD}'),
    ("final_nun", '\u{05DF}'),
    ("final_pe", '\u{05E3}'),
    ("final_tsadi", '\u{05E5}'),
];

impl Alphabet {
    /// Validate and wrap a letter sequence.
    pub fn new(letters: Vec<Letter>) -> Result<Self, AlphabetError> {
        if letters.is_empty() {
            return Err(AlphabetError::Empty);
        }
        let mut seen = HashSet::with_capacity(letters.len());
        for letter in &letters {
            let id = letter.id.as_str();
            if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
                return Err(AlphabetError::InvalidId(letter.id.clone()));
            }
            if !seen.insert(id) {
                return Err(AlphabetError::DuplicateId(letter.id.clone()));
            }
        }
        Ok(Self { letters })
    }

    /// Alphabet of bare identifiers without code points.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ids.into_iter().map(|id| Letter::new(id, None)).collect())
    }

    /// The 22 Hebrew letters followed by the 5 final forms.
    pub fn hebrew() -> Self {
        Self {
            letters: HEBREW
                .iter()
                .map(|&(id, c)| Letter::new(id, Some(c)))
                .collect(),
        }
    }

    /// Look up a builtin alphabet by name.
    pub fn builtin(name: &str) -> Result<Self, AlphabetError> {
        match name.to_ascii_lowercase().as_str() {
            "hebrew" => Ok(Self::hebrew()),
            _ => Err(AlphabetError::UnknownBuiltin(name.to_string())),
        }
    }

    /// Load a JSON array of `{ "id": ..., "code_point": ... }` entries.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AlphabetError> {
        let raw = fs::read_to_string(path)?;
        let letters: Vec<Letter> = serde_json::from_str(&raw)?;
        Self::new(letters)
    }

    /// Number of slots (the target region count).
    #[inline]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Letter> {
        self.letters.get(slot)
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Letter> {
        self.letters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_has_27_unique_slots() {
        let abc = Alphabet::hebrew();
        assert_eq!(abc.len(), 27);
        assert_eq!(abc.get(0).unwrap().id, "alef");
        assert_eq!(abc.get(26).unwrap().code_point, Some('\u{05E5}'));
        assert!(Alphabet::new(abc.letters().to_vec()).is_ok());
    }

    #[test]
    fn rejects_empty_duplicate_and_path_like_ids() {
        assert!(matches!(
            Alphabet::new(Vec::new()),
            Err(AlphabetError::Empty)
        ));
        assert!(matches!(
            Alphabet::from_ids(["a", "b", "a"]),
            Err(AlphabetError::DuplicateId(id)) if id == "a"
        ));
        assert!(matches!(
            Alphabet::from_ids(["a", "../b"]),
            Err(AlphabetError::InvalidId(_))
        ));
    }

    #[test]
    fn json_round_trip_validates() {
        let json = r#"[{"id":"a","code_point":"a"},{"id":"b"}]"#;
        let abc: Alphabet = serde_json::from_str(json).unwrap();
        assert_eq!(abc.len(), 2);
        assert_eq!(abc.get(1).unwrap().code_point, None);

        let dup = r#"[{"id":"a"},{"id":"a"}]"#;
        assert!(serde_json::from_str::<Alphabet>(dup).is_err());
    }

    #[test]
    fn builtin_lookup_is_case_insensitive() {
        assert_eq!(Alphabet::builtin("Hebrew").unwrap().len(), 27);
        assert!(matches!(
            Alphabet::builtin("klingon"),
            Err(AlphabetError::UnknownBuiltin(_))
        ));
    }
}
