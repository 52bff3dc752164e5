/*!
 * Style attributes and the class-based style registry.
 */

use serde::{Deserialize, Serialize};

use crate::language_utils;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Start,
    End,
}

impl Alignment {
    /// Parse a CSS `text-align` / TTML `tts:textAlign` value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" | "centre" | "middle" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    /// Keyword shared by CSS and TTML
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// The recognized style keys of a styled span or caption
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleAttributes {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italics: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl StyleAttributes {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italics() -> Self {
        Self {
            italics: true,
            ..Self::default()
        }
    }

    pub fn underline() -> Self {
        Self {
            underline: true,
            ..Self::default()
        }
    }

    /// True when no attribute is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `other` on top of `self`; set attributes in `other` win
    pub fn merge(&mut self, other: &StyleAttributes) {
        self.bold |= other.bold;
        self.italics |= other.italics;
        self.underline |= other.underline;
        if other.font_color.is_some() {
            self.font_color.clone_from(&other.font_color);
        }
        if other.font_family.is_some() {
            self.font_family.clone_from(&other.font_family);
        }
        if other.alignment.is_some() {
            self.alignment = other.alignment;
        }
    }

    /// Apply one CSS declaration. Returns false when the property is not a
    /// recognized style key, so the caller can keep it elsewhere.
    pub fn apply_css_property(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "font-weight" => {
                self.bold = value.eq_ignore_ascii_case("bold")
                    || value.parse::<u16>().is_ok_and(|weight| weight >= 600);
                true
            }
            "font-style" => {
                self.italics = value.eq_ignore_ascii_case("italic")
                    || value.eq_ignore_ascii_case("oblique");
                true
            }
            "text-decoration" => {
                self.underline = value.to_ascii_lowercase().contains("underline");
                true
            }
            "color" => {
                self.font_color = Some(value.to_string());
                true
            }
            "font-family" => {
                self.font_family = Some(value.to_string());
                true
            }
            "text-align" => match Alignment::parse(value) {
                Some(alignment) => {
                    self.alignment = Some(alignment);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// CSS declarations for the set attributes, in a fixed order
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        let mut declarations = Vec::new();
        if let Some(color) = &self.font_color {
            declarations.push(("color", color.clone()));
        }
        if let Some(family) = &self.font_family {
            declarations.push(("font-family", family.clone()));
        }
        if self.bold {
            declarations.push(("font-weight", "bold".to_string()));
        }
        if self.italics {
            declarations.push(("font-style", "italic".to_string()));
        }
        if self.underline {
            declarations.push(("text-decoration", "underline".to_string()));
        }
        if let Some(alignment) = self.alignment {
            declarations.push(("text-align", alignment.keyword().to_string()));
        }
        declarations
    }
}

/// One class rule: `.name { lang: xx; color: ...; }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Class name without the leading dot
    pub class_name: String,

    /// Language the class stands for, if it declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Recognized style attributes
    #[serde(default)]
    pub attributes: StyleAttributes,

    /// Unrecognized declarations, kept verbatim for re-serialization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl StyleRule {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            language: None,
            attributes: StyleAttributes::default(),
            extra: Vec::new(),
        }
    }

    /// The synthetic rule that declares a language under its own tag
    pub fn for_language(language: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            ..Self::new(language)
        }
    }

    pub fn with_class_name(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn with_attributes(mut self, attributes: StyleAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Whether this rule declares the given language
    pub fn declares(&self, language: &str) -> bool {
        self.language
            .as_deref()
            .is_some_and(|lang| language_utils::language_tags_match(lang, language))
    }
}

/// Class name to style mapping, in declaration order.
///
/// Class names are matched case-insensitively, as lenient markup readers
/// encounter `Class=ENCC` next to `.encc` rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRegistry {
    rules: Vec<StyleRule>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule, replacing any rule with the same class name
    pub fn insert(&mut self, rule: StyleRule) {
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.class_name.eq_ignore_ascii_case(&rule.class_name))
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn get(&self, class_name: &str) -> Option<&StyleRule> {
        self.rules
            .iter()
            .find(|rule| rule.class_name.eq_ignore_ascii_case(class_name))
    }

    /// Language declared by a class
    pub fn language_of(&self, class_name: &str) -> Option<&str> {
        self.get(class_name).and_then(|rule| rule.language.as_deref())
    }

    /// All classes that declare the given language
    pub fn classes_for_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a StyleRule> + 'a {
        self.rules.iter().filter(move |rule| rule.declares(language))
    }

    /// Whether any class declares the language
    pub fn has_language(&self, language: &str) -> bool {
        self.classes_for_language(language).next().is_some()
    }

    /// Make sure some class declares `language`, adding `.{language} {lang: {language};}`
    /// when none does. Returns true when the registry changed.
    ///
    /// A rule already named after the language without declaring one adopts
    /// the language and keeps its attributes. When that name is taken by a
    /// rule for another language, the new rule gets a numbered class name.
    pub fn ensure_language(&mut self, language: &str) -> bool {
        if self.has_language(language) {
            return false;
        }

        let same_name = self
            .rules
            .iter()
            .position(|rule| rule.class_name.eq_ignore_ascii_case(language));
        let class_name = match same_name {
            None => language.to_string(),
            Some(index) if self.rules[index].language.is_none() => {
                self.rules[index].language = Some(language.to_string());
                return true;
            }
            Some(_) => (2..)
                .map(|n| format!("{}-{}", language, n))
                .find(|candidate| self.get(candidate).is_none())
                .unwrap_or_else(|| language.to_string()),
        };
        self.rules.push(StyleRule::for_language(language).with_class_name(&class_name));
        true
    }

    /// Distinct languages declared by the registry, in declaration order
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for language in self.rules.iter().filter_map(|rule| rule.language.as_deref()) {
            if !languages
                .iter()
                .any(|seen| language_utils::language_tags_match(seen, language))
            {
                languages.push(language);
            }
        }
        languages
    }

    /// Keep only the rules for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&StyleRule) -> bool) {
        self.rules.retain(keep);
    }

    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
