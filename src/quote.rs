//! Data exchanged between the request and result screens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category label used when no category was selected.
pub const RANDOM_CATEGORY: &str = "random";

/// A mood category the user can pick on the request screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Comfort,
    Motivation,
    Happiness,
    Challenge,
    Success,
    Love,
    Wisdom,
    Peace,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Comfort,
        Category::Motivation,
        Category::Happiness,
        Category::Challenge,
        Category::Success,
        Category::Love,
        Category::Wisdom,
        Category::Peace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Comfort => "comfort",
            Category::Motivation => "motivation",
            Category::Happiness => "happiness",
            Category::Challenge => "challenge",
            Category::Success => "success",
            Category::Love => "love",
            Category::Wisdom => "wisdom",
            Category::Peace => "peace",
        }
    }

    /// Short blurb shown next to the category on the request screen.
    pub fn tagline(&self) -> &'static str {
        match self {
            Category::Comfort => "for the hard days",
            Category::Motivation => "get moving",
            Category::Happiness => "small joys",
            Category::Challenge => "try the hard thing",
            Category::Success => "keep going",
            Category::Love => "warm hearts",
            Category::Wisdom => "think it over",
            Category::Peace => "slow down",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One quote + cat image, as produced by a quote source.
///
/// Every field is optional on the way in: the result screen renders
/// whatever is present and substitutes placeholders for the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// The `{success, data}` wrapper used by the webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QuoteResult>,
}

/// What the handoff slot can hold: the webhook envelope verbatim or a flat result.
#[derive(Debug, Clone, PartialEq)]
pub enum Handoff {
    /// Envelope with `success: true` and a payload, or a flat result.
    Quote(QuoteResult),
    /// Envelope reporting that the original request failed.
    Failed,
}

impl Handoff {
    /// Classify a stored JSON value.
    ///
    /// An object is only treated as an envelope when it carries both a
    /// `success` key and a non-null `data` payload, and only an explicit
    /// `success: false` counts as failure. Anything else is read as a flat
    /// result, field by field.
    pub fn from_value(value: serde_json::Value) -> Self {
        let data = value.get("data").filter(|d| !d.is_null());

        match (value.get("success"), data) {
            (Some(serde_json::Value::Bool(false)), Some(_)) => Handoff::Failed,
            (Some(_), Some(data)) => Handoff::Quote(QuoteResult::from_loose(data)),
            _ => Handoff::Quote(QuoteResult::from_loose(&value)),
        }
    }

    /// Parse the raw slot contents. Only malformed JSON is an error.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        Ok(Self::from_value(serde_json::from_str(raw)?))
    }
}

impl QuoteResult {
    /// Read whatever fields are usable from an arbitrary JSON value.
    ///
    /// Strings are taken as-is and numbers by their text. Other types, and
    /// any value that isn't an object, leave the field missing.
    pub fn from_loose(value: &serde_json::Value) -> Self {
        let field = |name: &str| match value.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        QuoteResult {
            quote: field("quote"),
            author: field("author"),
            image_url: field("imageUrl"),
            category: field("category"),
            timestamp: field("timestamp"),
        }
    }
}
