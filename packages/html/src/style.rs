//! Inline `style` attribute handling
//!
//! Declarations keep their original order; setting an existing property
//! updates it in place.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarations {
    entries: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key: value; key: value`. Malformed declarations are skipped.
    pub fn parse(style: &str) -> Self {
        let mut declarations = Self::new();
        for declaration in style.split(';') {
            let Some((key, value)) = declaration.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if !key.is_empty() && !value.is_empty() {
                declarations.set(key, value);
            }
        }
        declarations
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(key, _)| key == property)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}
