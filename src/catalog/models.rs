//! Core catalog types shared by the session, discovery and the API.
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Ar,
    It,
    De,
    Ru,
    Zh,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Fr,
        Language::Ar,
        Language::It,
        Language::De,
        Language::Ru,
        Language::Zh,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Ar => "ar",
            Language::It => "it",
            Language::De => "de",
            Language::Ru => "ru",
            Language::Zh => "zh",
        }
    }

    /// BCP 47 locale handed to speech capture.
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Fr => "fr-FR",
            Language::Ar => "ar-SA",
            Language::It => "it-IT",
            Language::De => "de-DE",
            Language::Ru => "ru-RU",
            Language::Zh => "zh-CN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code() == s.trim().to_lowercase())
            .ok_or(anyhow!("Unsupported language: {}", s))
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Heritage,
    Restaurants,
    Cafes,
    Hotels,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Heritage,
        Category::Restaurants,
        Category::Cafes,
        Category::Hotels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Heritage => "heritage",
            Category::Restaurants => "restaurants",
            Category::Cafes => "cafes",
            Category::Hotels => "hotels",
        }
    }

    /// How the category reads inside a prompt.
    pub fn describe(&self) -> &'static str {
        match self {
            Category::Heritage => "heritage sites and landmarks",
            Category::Restaurants => "restaurants",
            Category::Cafes => "cafés",
            Category::Hotels => "hotels",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or(anyhow!("Unknown category: {}", s))
    }
}

/// A string translated into every supported language. Missing
/// translations deserialize as empty strings and fall back to English
/// on lookup.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct LocalizedString {
    pub en: String,
    pub fr: String,
    pub ar: String,
    pub it: String,
    pub de: String,
    pub ru: String,
    pub zh: String,
}

impl LocalizedString {
    pub fn new(en: &str, fr: &str, ar: &str) -> Self {
        Self {
            en: en.to_string(),
            fr: fr.to_string(),
            ar: ar.to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, language: Language) -> &str {
        let value = match language {
            Language::En => &self.en,
            Language::Fr => &self.fr,
            Language::Ar => &self.ar,
            Language::It => &self.it,
            Language::De => &self.de,
            Language::Ru => &self.ru,
            Language::Zh => &self.zh,
        };
        if value.trim().is_empty() {
            &self.en
        } else {
            value
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: LocalizedString,
    #[serde(default)]
    pub images: Vec<String>,
    pub short_description: LocalizedString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<LocalizedString>,
    pub rating: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub google_maps_url: String,
    #[serde(default)]
    pub ai_generated: bool,
}

impl Place {
    /// The long description, or the short one when a place has none.
    pub fn description(&self, language: Language) -> &str {
        self.long_description
            .as_ref()
            .map(|d| d.get(language))
            .unwrap_or_else(|| self.short_description.get(language))
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Governorate {
    pub id: String,
    pub name: LocalizedString,
    pub heritage: Vec<Place>,
    pub restaurants: Vec<Place>,
    pub cafes: Vec<Place>,
    pub hotels: Vec<Place>,
}

impl Governorate {
    pub fn places(&self, category: Category) -> &[Place] {
        match category {
            Category::Heritage => &self.heritage,
            Category::Restaurants => &self.restaurants,
            Category::Cafes => &self.cafes,
            Category::Hotels => &self.hotels,
        }
    }
}
