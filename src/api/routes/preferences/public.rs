//! Public types for the preferences API
use serde::{Deserialize, Serialize};

use crate::catalog::Language;
use crate::store::Theme;

/// Partial update. Only the fields present are changed.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    /// `null` clears the selection, a missing field leaves it alone
    #[serde(default, with = "double_option")]
    pub governorate: Option<Option<String>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ThemeResponse {
    pub theme: Theme,
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Option<String>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.as_ref().and_then(|v| v.as_ref()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<String>>, D::Error> {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}
