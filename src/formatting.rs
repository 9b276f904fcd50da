// src/formatting.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The fixed label of the line printed after a notification goes out.
pub const CONFIRMATION_TEMPLATE: &str = "Notification sent:";

/// A trait for rendering a localized line from a template and its arguments.
pub trait MessageFormatter: Send + Sync {
    fn format_line(&self, template: &str, args: &[&str]) -> String;
}

/// Languages the built-in catalog knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    English,
    German,
    French,
    Spanish,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::German => "de",
            Locale::French => "fr",
            Locale::Spanish => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts a language tag such as `en`, `en-US` or `de_DE`; only the
    /// primary language subtag is considered.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Locale::English),
            "de" => Ok(Locale::German),
            "fr" => Ok(Locale::French),
            "es" => Ok(Locale::Spanish),
            _ => Err(format!("unsupported locale: {}", s)),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag().to_string()
    }
}

/// Translations of message templates, keyed by locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<(Locale, String), String>,
}

impl Catalog {
    /// An empty catalog; every lookup falls back to the template itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// The translations shipped with the binary.
    pub fn builtin() -> Self {
        Self::new()
            .with_translation(Locale::German, CONFIRMATION_TEMPLATE, "Benachrichtigung gesendet:")
            .with_translation(Locale::French, CONFIRMATION_TEMPLATE, "Notification envoyée :")
            .with_translation(Locale::Spanish, CONFIRMATION_TEMPLATE, "Notificación enviada:")
    }

    pub fn with_translation(mut self, locale: Locale, template: &str, translated: &str) -> Self {
        self.entries
            .insert((locale, template.to_string()), translated.to_string());
        self
    }

    pub fn lookup<'a>(&'a self, locale: Locale, template: &'a str) -> &'a str {
        self.entries
            .get(&(locale, template.to_string()))
            .map(String::as_str)
            .unwrap_or(template)
    }
}

/// Prints templates in one locale, joining arguments with single spaces.
#[derive(Debug, Clone)]
pub struct LocalePrinter {
    locale: Locale,
    catalog: Catalog,
}

impl LocalePrinter {
    pub fn new(locale: Locale) -> Self {
        Self::with_catalog(locale, Catalog::builtin())
    }

    pub fn with_catalog(locale: Locale, catalog: Catalog) -> Self {
        Self { locale, catalog }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl MessageFormatter for LocalePrinter {
    fn format_line(&self, template: &str, args: &[&str]) -> String {
        let mut line = self.catalog.lookup(self.locale, template).to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
