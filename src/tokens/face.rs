//! Card types and front-face content.
//!
//! The engine never interprets card types - they're opaque caller-defined
//! identifiers. The front face of a token is populated by the caller's
//! render callback; without one, the face falls back to the type's text.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Opaque card type identifier.
///
/// The engine only stores and compares types; meaning lives with the
/// caller. Textual so the render fallback can show something sensible.
///
/// ```
/// use card_stage::CardType;
///
/// let ace: CardType = "Ace".into();
/// assert_eq!(ace.as_str(), "Ace");
/// assert_eq!(format!("{}", ace), "Ace");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardType(pub String);

impl CardType {
    /// Create a new card type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The type as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Front-facing surface of a token.
///
/// The render callback receives this and fills in whatever the embedder's
/// presentation needs: a label, plus free-form string attributes (art
/// handle, accent color, badge text - the engine doesn't interpret them).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    label: Option<String>,
    #[serde(default)]
    attributes: FxHashMap<String, String>,
}

impl CardFace {
    /// Create an empty face.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the face label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    /// Current label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Set a free-form attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Look up an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Clear all content.
    pub fn clear(&mut self) {
        self.label = None;
        self.attributes.clear();
    }

    /// Whether the face has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.attributes.is_empty()
    }
}

/// Callback that populates a token's front face whenever its type is set.
pub type CardRenderer = Box<dyn FnMut(&mut CardFace, &CardType)>;
