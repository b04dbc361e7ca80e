use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_ENTITY_LEN: usize = 64;

/// Identifier of the thing being analysed: a ticker such as `AAPL.US`, a
/// keyword, or a hashtag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Trim and validate an identifier. Case is preserved.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyEntityId);
        }

        let len = trimmed.chars().count();
        if len > MAX_ENTITY_LEN {
            return Err(ValidationError::EntityIdTooLong {
                len,
                max: MAX_ENTITY_LEN,
            });
        }

        if let Some(index) = trimmed.chars().position(char::is_control) {
            return Err(ValidationError::EntityIdInvalidChar { index });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_case() {
        let parsed = EntityId::parse(" #SkinCare ").expect("entity should parse");
        assert_eq!(parsed.as_str(), "#SkinCare");
    }

    #[test]
    fn rejects_empty() {
        let err = EntityId::parse("   ").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyEntityId));
    }

    #[test]
    fn rejects_control_characters() {
        let err = EntityId::parse("AAPL\u{7}.US").expect_err("must fail");
        assert!(matches!(err, ValidationError::EntityIdInvalidChar { index: 4 }));
    }

    #[test]
    fn rejects_overlong_ids() {
        let err = EntityId::parse(&"x".repeat(65)).expect_err("must fail");
        assert!(matches!(err, ValidationError::EntityIdTooLong { len: 65, .. }));
    }
}
