//! Persisted stroke styles.
//!
//! The style table is stored as plain text, one style per line:
//!
//! ```text
//! red, 255, 0, 0, 1
//! black, 0, 0, 0, 1
//! ```
//!
//! Fields are `name, r, g, b, stroke width`. Blank lines are ignored and
//! whitespace around each field is trimmed.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Conventional file name of the style table.
pub const SETTINGS_FILE_NAME: &str = "settings.csv";

/// Errors from reading or writing the style table.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed as a style.
    #[error("invalid style on line {line}: {reason}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Create a color.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    /// CSS functional notation, e.g. `rgb(255,0,0)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Stroke style of one export group.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Group name, also the prefix of emitted path ids.
    pub name: String,
    /// Stroke color.
    pub color: Rgb,
    /// Stroke width in SVG user units.
    pub stroke_width: f64,
}

impl Style {
    /// Create a style.
    pub fn new(name: impl Into<String>, color: Rgb, stroke_width: f64) -> Self {
        Self {
            name: name.into(),
            color,
            stroke_width,
        }
    }
}

/// Ordered list of export styles. Group `i` of an export uses style `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    styles: Vec<Style>,
}

impl StyleTable {
    /// Create a table from styles.
    pub fn new(styles: Vec<Style>) -> Self {
        Self { styles }
    }

    /// The built-in table: a red cut group and a black engrave group.
    pub fn defaults() -> Self {
        Self::new(vec![
            Style::new("red", Rgb::new(255, 0, 0), 1.0),
            Style::new("black", Rgb::new(0, 0, 0), 1.0),
        ])
    }

    /// Parse the settings text format.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let mut styles = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let line = idx + 1;
            let invalid = |reason: String| SettingsError::InvalidLine { line, reason };

            let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
            let [name, r, g, b, width] = fields[..] else {
                return Err(invalid(format!("expected 5 fields, found {}", fields.len())));
            };
            if name.is_empty() {
                return Err(invalid("empty style name".to_string()));
            }

            let channel = |label: &str, v: &str| {
                v.parse::<u8>()
                    .map_err(|e| invalid(format!("{label} channel {v:?}: {e}")))
            };
            let color = Rgb::new(channel("red", r)?, channel("green", g)?, channel("blue", b)?);
            let stroke_width = width
                .parse::<f64>()
                .map_err(|e| invalid(format!("stroke width {width:?}: {e}")))?;

            styles.push(Style::new(name, color, stroke_width));
        }

        Ok(Self::new(styles))
    }

    /// Render in the settings text format, one style per line.
    pub fn to_text(&self) -> String {
        self.styles
            .iter()
            .map(|s| {
                format!(
                    "{}, {}, {}, {}, {}",
                    s.name, s.color.r, s.color.g, s.color.b, s.stroke_width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Read a table from a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Read a table, falling back to [`StyleTable::defaults`] on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "using default styles");
                Self::defaults()
            }
        }
    }

    /// Write the table to a settings file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Overwrite a settings file with the defaults and return them.
    pub fn reset(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let table = Self::defaults();
        table.save(path)?;
        Ok(table)
    }

    /// All styles in order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Style of group `index`.
    pub fn get(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the table has no styles.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DEFAULT_TEXT: &str = "red, 255, 0, 0, 1\nblack, 0, 0, 0, 1";

    #[test]
    fn test_default_table_text() {
        assert_eq!(StyleTable::defaults().to_text(), DEFAULT_TEXT);
        assert_eq!(StyleTable::parse(DEFAULT_TEXT).unwrap(), StyleTable::defaults());
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let table = StyleTable::parse("\n  cut ,10,20 , 30,0.25 \n\n engrave, 1, 2, 3, 2\n").unwrap();
        assert_eq!(table.len(), 2);
        let cut = table.get(0).unwrap();
        assert_eq!(cut.name, "cut");
        assert_eq!(cut.color, Rgb::new(10, 20, 30));
        assert_relative_eq!(cut.stroke_width, 0.25);
        assert_eq!(table.get(1).unwrap().name, "engrave");
    }

    #[test]
    fn test_round_trip() {
        let table = StyleTable::new(vec![
            Style::new("blue", Rgb::new(0, 0, 255), 0.1),
            Style::new("green", Rgb::new(0, 128, 0), 2.5),
        ]);
        let text = table.to_text();
        assert_eq!(text, "blue, 0, 0, 255, 0.1\ngreen, 0, 128, 0, 2.5");
        assert_eq!(StyleTable::parse(&text).unwrap(), table);
    }

    #[test]
    fn test_parse_errors() {
        let err = StyleTable::parse("red, 255, 0, 0, 1\nblue, 0, 0").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidLine { line: 2, .. }), "{err}");

        let err = StyleTable::parse("red, 256, 0, 0, 1").unwrap_err();
        assert!(err.to_string().contains("red channel"), "{err}");

        let err = StyleTable::parse("red, 255, 0, 0, thick").unwrap_err();
        assert!(err.to_string().contains("stroke width"), "{err}");

        assert!(StyleTable::parse(" , 1, 2, 3, 1").is_err());
    }

    #[test]
    fn test_empty_text_is_empty_table() {
        let table = StyleTable::parse("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.to_text(), "");
    }

    #[test]
    fn test_save_load_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let custom = StyleTable::new(vec![Style::new("score", Rgb::new(0, 0, 255), 0.5)]);
        custom.save(&path).unwrap();
        assert_eq!(StyleTable::load(&path).unwrap(), custom);

        let reset = StyleTable::reset(&path).unwrap();
        assert_eq!(reset, StyleTable::defaults());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_TEXT);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert_eq!(StyleTable::load_or_default(&missing), StyleTable::defaults());

        let broken = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&broken, "not a style").unwrap();
        assert_eq!(StyleTable::load_or_default(&broken), StyleTable::defaults());
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(255, 0, 0).to_string(), "rgb(255,0,0)");
    }
}
