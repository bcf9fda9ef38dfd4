//! Large block glyphs for the clock face.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::duration::{Hms, UnitVisibility};

pub const GLYPH_HEIGHT: usize = 8;

/// Space appended after every glyph, including the last.
const GUTTER: &str = "  ";

pub const GLYPH_CHARS: [char; 11] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':'];

const BUILTIN: [(char, [&str; GLYPH_HEIGHT]); 11] = [
    ('0', [
        " ######### ",
        "###     ###",
        "###     ###",
        "###     ###",
        "###     ###",
        "###     ###",
        "###     ###",
        " ######### ",
    ]),
    ('1', [
        "    ###    ",
        "  #####    ",
        "    ###    ",
        "    ###    ",
        "    ###    ",
        "    ###    ",
        "    ###    ",
        "###########",
    ]),
    ('2', [
        " ######### ",
        "###     ###",
        "        ###",
        "      ###  ",
        "    ###    ",
        "  ###      ",
        " ###       ",
        "###########",
    ]),
    ('3', [
        "###########",
        "        ###",
        "        ###",
        "  #########",
        "        ###",
        "        ###",
        "        ###",
        "###########",
    ]),
    ('4', [
        "     ##### ",
        "    ###### ",
        "   ### ### ",
        "  ###  ### ",
        " ###   ### ",
        "###########",
        "       ### ",
        "       ### ",
    ]),
    ('5', [
        "###########",
        "###        ",
        "###        ",
        "###########",
        "        ###",
        "        ###",
        "###     ###",
        " ######### ",
    ]),
    ('6', [
        "  #########",
        " ###       ",
        "###        ",
        "###########",
        "###     ###",
        "###     ###",
        "###     ###",
        " ######### ",
    ]),
    ('7', [
        "###########",
        "        ###",
        "       ### ",
        "      ###  ",
        "     ###   ",
        "    ###    ",
        "   ###     ",
        "   ###     ",
    ]),
    ('8', [
        " ######### ",
        "###     ###",
        "###     ###",
        " ######### ",
        "###     ###",
        "###     ###",
        "###     ###",
        " ######### ",
    ]),
    ('9', [
        " ######### ",
        "###     ###",
        "###     ###",
        "###     ###",
        " ##########",
        "        ###",
        "       ### ",
        "########   ",
    ]),
    (':', [
        "           ",
        "    ###    ",
        "    ###    ",
        "           ",
        "           ",
        "    ###    ",
        "    ###    ",
        "           ",
    ]),
];

/// Maps clock characters to fixed-height blocks of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTable {
    glyphs: HashMap<char, Vec<String>>,
    blank: Vec<String>,
}

impl Default for GlyphTable {
    fn default() -> Self {
        let glyphs: HashMap<char, Vec<String>> = BUILTIN
            .iter()
            .map(|(c, rows)| (*c, rows.iter().map(|r| r.to_string()).collect()))
            .collect();
        Self::from_glyphs(glyphs)
    }
}

impl GlyphTable {
    /// Built-in table with valid user entries layered on top.
    ///
    /// Entries must be keyed by a single clock character, hold a list of
    /// exactly [`GLYPH_HEIGHT`] strings, and keep every row at one display
    /// width. Anything else keeps the built-in glyph for that character only.
    pub fn with_overrides(overrides: &Map<String, Value>) -> Self {
        let mut glyphs = Self::default().glyphs;
        for (key, value) in overrides {
            match validate(key, value) {
                Ok((c, rows)) => {
                    glyphs.insert(c, rows);
                }
                Err(reason) => warn!(glyph = %key, "ignoring custom glyph: {reason}"),
            }
        }
        Self::from_glyphs(glyphs)
    }

    fn from_glyphs(glyphs: HashMap<char, Vec<String>>) -> Self {
        let width = glyphs
            .get(&'0')
            .and_then(|rows| rows.first())
            .map_or(11, |row| row.width());
        GlyphTable {
            glyphs,
            blank: vec![" ".repeat(width); GLYPH_HEIGHT],
        }
    }

    pub fn glyph(&self, c: char) -> &[String] {
        self.glyphs.get(&c).unwrap_or(&self.blank)
    }

    /// Renders the visible units as [`GLYPH_HEIGHT`] rows, each glyph followed by a gutter.
    pub fn render(&self, hms: Hms, visibility: UnitVisibility) -> Vec<String> {
        let text = hms.format(visibility);
        let mut lines = vec![String::new(); GLYPH_HEIGHT];
        for c in text.chars() {
            for (line, row) in lines.iter_mut().zip(self.glyph(c)) {
                line.push_str(row);
                line.push_str(GUTTER);
            }
        }
        lines
    }
}

/// Built-in glyphs in clock-character order, for writing the config template.
pub fn builtin_entries() -> BTreeMap<String, Vec<String>> {
    BUILTIN
        .iter()
        .map(|(c, rows)| (c.to_string(), rows.iter().map(|r| r.to_string()).collect()))
        .collect()
}

fn validate(key: &str, value: &Value) -> Result<(char, Vec<String>), String> {
    let mut chars = key.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) if GLYPH_CHARS.contains(&c) => c,
        _ => return Err(format!("'{key}' is not one of 0-9 or ':'")),
    };
    let Value::Array(items) = value else {
        return Err("expected a list of rows".to_string());
    };
    let rows: Vec<String> = items
        .iter()
        .map(|row| row.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| "every row must be a string".to_string())?;
    if rows.len() != GLYPH_HEIGHT {
        return Err(format!("expected {GLYPH_HEIGHT} rows, found {}", rows.len()));
    }
    let width = rows[0].width();
    if rows.iter().any(|row| row.width() != width) {
        return Err("rows differ in width".to_string());
    }
    Ok((c, rows))
}
