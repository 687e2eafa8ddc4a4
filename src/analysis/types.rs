//! Composite comparison types and their combination enumeration

use log::warn;
use std::fmt;

use crate::analysis::features::BaseType;
use crate::io::configuration::{ALL_TYPE_LETTERS, COLOR_ONLY_LETTER};
use crate::io::error::{Result, invalid_parameter};

/// One matching key: a set of base letters, or the standalone color-only type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompositeType {
    /// Non-empty, duplicate-free base letters in the order they were given
    Letters(Vec<BaseType>),
    /// Flat mean-color fill, never combined with letters
    ColorOnly,
}

impl CompositeType {
    /// Build a letter combination
    ///
    /// # Errors
    ///
    /// Returns an error if `letters` is empty or repeats a letter
    pub fn from_base_types(letters: Vec<BaseType>) -> Result<Self> {
        if letters.is_empty() {
            return Err(invalid_parameter(
                "type",
                &"",
                &"at least one comparison letter is required",
            ));
        }
        for (index, letter) in letters.iter().enumerate() {
            if letters.iter().skip(index + 1).any(|other| other == letter) {
                return Err(invalid_parameter("type", &letter, &"letters may appear only once"));
            }
        }
        Ok(Self::Letters(letters))
    }

    /// Parse a strict type string such as `"lg"` or `"c"`
    ///
    /// # Errors
    ///
    /// Returns [`crate::RebuildError::InvalidType`] for unknown letters and an
    /// invalid parameter error for empty strings, duplicates, or `c` combined
    /// with other letters
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() == 1 && text.starts_with(COLOR_ONLY_LETTER) {
            return Ok(Self::ColorOnly);
        }
        if text.contains(COLOR_ONLY_LETTER) {
            return Err(invalid_parameter(
                "type",
                &text,
                &"color-only cannot be combined with other letters",
            ));
        }
        let letters = text
            .chars()
            .map(BaseType::from_letter)
            .collect::<Result<Vec<_>>>()?;
        Self::from_base_types(letters)
    }

    /// True for the color-only type
    pub const fn is_color_only(&self) -> bool {
        matches!(self, Self::ColorOnly)
    }

    /// Base letters of the type, empty for color-only
    pub fn base_types(&self) -> &[BaseType] {
        match self {
            Self::Letters(letters) => letters,
            Self::ColorOnly => &[],
        }
    }
}

impl fmt::Display for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letters(letters) => letters.iter().try_for_each(|letter| write!(f, "{letter}")),
            Self::ColorOnly => write!(f, "{COLOR_ONLY_LETTER}"),
        }
    }
}

/// Keep the recognised, first-seen letters of a user type string
///
/// Invalid and duplicate letters are dropped with a warning instead of
/// failing the run.
pub fn filter_letters(text: &str) -> Vec<BaseType> {
    let mut kept: Vec<BaseType> = Vec::new();
    for letter in text.chars() {
        match BaseType::from_letter(letter) {
            Ok(base) if kept.contains(&base) => {
                warn!("Duplicate type '{letter}' ignored");
            }
            Ok(base) => kept.push(base),
            Err(_) => {
                warn!("Invalid type '{letter}' ignored");
            }
        }
    }
    kept
}

/// Every non-empty combination of `letters`
///
/// Ordered by combination size, then by letter position, so `[l, g]` yields
/// `l`, `g`, `lg`.
pub fn combinations(letters: &[BaseType]) -> Vec<CompositeType> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(letters.len());
    for size in 1..=letters.len() {
        collect_combinations(letters, size, 0, &mut current, &mut result);
    }
    result
}

fn collect_combinations(
    letters: &[BaseType],
    size: usize,
    start: usize,
    current: &mut Vec<BaseType>,
    result: &mut Vec<CompositeType>,
) {
    if current.len() == size {
        result.push(CompositeType::Letters(current.clone()));
        return;
    }
    for (index, &letter) in letters.iter().enumerate().skip(start) {
        current.push(letter);
        collect_combinations(letters, size, index + 1, current, result);
        current.pop();
    }
}

/// Expand a user type string into the composite types to render
///
/// With no usable letters and color-only off, every combination of
/// `lhsvrgb` (127 types) is produced. Color-only is appended as its own
/// type and never merged into a letter combination.
pub fn expand_types(text: &str, color_only: bool) -> Vec<CompositeType> {
    let letters = filter_letters(text);

    let mut types = if letters.is_empty() {
        if color_only {
            Vec::new()
        } else {
            combinations(&filter_letters(ALL_TYPE_LETTERS))
        }
    } else {
        combinations(&letters)
    };

    if color_only {
        types.push(CompositeType::ColorOnly);
    }
    types
}
