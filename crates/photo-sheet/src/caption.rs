//! Caption text for caption-bearing prints.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::MAX_CAPTION_CHARS;
use crate::types::{CaptionFieldErrors, SheetError, ValidationError};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionError {
    #[error("must be {} characters or less", MAX_CAPTION_CHARS)]
    TooLong,
    #[error("cannot contain line breaks or tabs")]
    InvalidCharacter,
}

/// Validate a single caption. Empty captions are valid.
pub fn validate(text: &str) -> Result<(), CaptionError> {
    if text.chars().count() > MAX_CAPTION_CHARS {
        return Err(CaptionError::TooLong);
    }
    if text.contains(['\n', '\r', '\t']) {
        return Err(CaptionError::InvalidCharacter);
    }
    Ok(())
}

/// Validate two captions independently; both results are reported.
pub fn validate_set(text1: &str, text2: &str) -> CaptionFieldErrors {
    CaptionFieldErrors {
        text1: validate(text1).err(),
        text2: validate(text2).err(),
    }
}

/// Font styles the compositing service can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FontId {
    #[default]
    Default,
    #[cfg_attr(feature = "serde", serde(rename = "handwriting_01"))]
    Handwriting1,
    #[cfg_attr(feature = "serde", serde(rename = "handwriting_02"))]
    Handwriting2,
    #[cfg_attr(feature = "serde", serde(rename = "script_01"))]
    Script1,
    #[cfg_attr(feature = "serde", serde(rename = "script_02"))]
    Script2,
    #[cfg_attr(feature = "serde", serde(rename = "elegant_01"))]
    Elegant,
    #[cfg_attr(feature = "serde", serde(rename = "playful_01"))]
    Playful,
    #[cfg_attr(feature = "serde", serde(rename = "vintage_01"))]
    Vintage,
    #[cfg_attr(feature = "serde", serde(rename = "modern_01"))]
    Modern,
    #[cfg_attr(feature = "serde", serde(rename = "casual_01"))]
    Casual,
    #[cfg_attr(feature = "serde", serde(rename = "artistic_01"))]
    Artistic,
}

impl FontId {
    pub const ALL: &[Self] = &[
        Self::Default,
        Self::Handwriting1,
        Self::Handwriting2,
        Self::Script1,
        Self::Script2,
        Self::Elegant,
        Self::Playful,
        Self::Vintage,
        Self::Modern,
        Self::Casual,
        Self::Artistic,
    ];

    /// Identifier understood by the compositing service
    pub fn name(self) -> &'static str {
        match self {
            FontId::Default => "default",
            FontId::Handwriting1 => "handwriting_01",
            FontId::Handwriting2 => "handwriting_02",
            FontId::Script1 => "script_01",
            FontId::Script2 => "script_02",
            FontId::Elegant => "elegant_01",
            FontId::Playful => "playful_01",
            FontId::Vintage => "vintage_01",
            FontId::Modern => "modern_01",
            FontId::Casual => "casual_01",
            FontId::Artistic => "artistic_01",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FontId::Default => "Default",
            FontId::Handwriting1 => "Handwriting 1",
            FontId::Handwriting2 => "Handwriting 2",
            FontId::Script1 => "Script 1",
            FontId::Script2 => "Script 2",
            FontId::Elegant => "Elegant",
            FontId::Playful => "Playful",
            FontId::Vintage => "Vintage",
            FontId::Modern => "Modern",
            FontId::Casual => "Casual",
            FontId::Artistic => "Artistic",
        }
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontId {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontId::ALL
            .iter()
            .copied()
            .find(|font| font.name() == s)
            .ok_or_else(|| ValidationError::UnknownFont(s.to_string()).into())
    }
}

/// The two captions of a caption sheet plus their font
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptionSet {
    pub text1: String,
    pub text2: String,
    pub font: FontId,
}

impl CaptionSet {
    pub fn new(text1: impl Into<String>, text2: impl Into<String>, font: FontId) -> Self {
        Self {
            text1: text1.into(),
            text2: text2.into(),
            font,
        }
    }

    /// Validate both fields independently.
    pub fn field_errors(&self) -> CaptionFieldErrors {
        validate_set(&self.text1, &self.text2)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Captions(errors))
        }
    }

    /// Copy the first caption into the second and re-validate the copy.
    pub fn copy_first_to_second(&mut self) -> Result<(), CaptionError> {
        self.text2 = self.text1.clone();
        validate(&self.text2)
    }

    pub fn clear(&mut self) {
        self.text1.clear();
        self.text2.clear();
    }
}
