//! Query language value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidLanguageError;

/// All languages the voice backend understands
pub const ALL_LANGUAGES: &[Language] = &[
    Language::English,
    Language::Hindi,
    Language::Tamil,
    Language::Telugu,
    Language::Marathi,
];

/// Language of a spoken query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Telugu,
    Marathi,
}

impl Language {
    /// Language code sent to the backend
    pub const fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Tamil => "ta",
            Self::Telugu => "te",
            Self::Marathi => "mr",
        }
    }

    /// English name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Tamil => "Tamil",
            Self::Telugu => "Telugu",
            Self::Marathi => "Marathi",
        }
    }

    /// Name written in the language itself
    pub const fn native_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "हिन्दी",
            Self::Tamil => "தமிழ்",
            Self::Telugu => "తెలుగు",
            Self::Marathi => "मराठी",
        }
    }

    /// Label used in language listings, e.g. "हिन्दी (Hindi)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.native_name(), self.name())
    }
}

impl FromStr for Language {
    type Err = InvalidLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "hi" | "hindi" => Ok(Self::Hindi),
            "ta" | "tamil" => Ok(Self::Tamil),
            "te" | "telugu" => Ok(Self::Telugu),
            "mr" | "marathi" => Ok(Self::Marathi),
            _ => Err(InvalidLanguageError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("hi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!("Tamil".parse::<Language>().unwrap(), Language::Tamil);
        assert_eq!(" TE ".parse::<Language>().unwrap(), Language::Telugu);
    }

    #[test]
    fn rejects_unknown_code() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert_eq!(err.input, "fr");
    }

    #[test]
    fn display_is_backend_code() {
        for language in ALL_LANGUAGES {
            assert_eq!(language.to_string(), language.code());
            assert_eq!(language.code().parse::<Language>().unwrap(), *language);
        }
    }

    #[test]
    fn default_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn label_shows_native_and_english() {
        assert_eq!(Language::Marathi.label(), "मराठी (Marathi)");
    }
}
