//! Text layout of the countdown box.
//!
//! Everything here produces plain lines addressed by screen row; drawing them
//! is the console's job. The glyph band sits at a fixed row so that updates can
//! rewrite it in place without clearing the screen.

use chrono::{DateTime, Local};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::glyphs::GLYPH_HEIGHT;

/// Interior width of the box, between the `|` borders.
pub const BORDER_WIDTH: usize = 115;

/// Columns rewritten on every glyph-band row.
pub const LINE_BUDGET: usize = 120;

/// First screen row of the glyph band.
pub const GLYPH_TOP_ROW: u16 = 8;

/// Left margin before the box border.
const MARGIN: &str = "  ";

const STOP_HINT: &str = "Press Ctrl+C to stop";

pub fn timestamp(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// The frame drawn once per run: header with the initial time, an empty glyph
/// band, and a footer with start and end timestamps.
pub fn static_lines(initial: &str, start: &str, end: &str) -> Vec<String> {
    let mut lines = header(&format!(">>>  C O U N T D O W N  [ {initial} ]  <<<"));
    lines.extend(std::iter::repeat_n(String::new(), GLYPH_HEIGHT));
    lines.extend([String::new(), String::new(), border()]);

    let labels_len = "Start time:".len() + "End time:".len() + STOP_HINT.len();
    let spare = BORDER_WIDTH.saturating_sub(labels_len);
    let left = spare / 2;
    lines.push(boxed(&format!(
        "Start time:{}{STOP_HINT}{}End time:",
        " ".repeat(left),
        " ".repeat(spare - left)
    )));

    let gap = BORDER_WIDTH.saturating_sub(start.width() + end.width());
    lines.push(boxed(&format!("{start}{}{end}", " ".repeat(gap))));
    lines.push(border());
    lines
}

/// The glyph band rows, centered in the box and padded to [`LINE_BUDGET`] so a
/// narrower clock fully overwrites a wider one.
pub fn glyph_band(glyph_lines: &[String]) -> Vec<String> {
    let width = glyph_lines.first().map_or(0, |l| l.width());
    let offset = MARGIN.len() + 1 + BORDER_WIDTH.saturating_sub(width) / 2;
    glyph_lines
        .iter()
        .map(|line| {
            let content = line.trim_end();
            let mut full = " ".repeat(offset);
            full.push_str(content);
            let used = full.width();
            full.push_str(&" ".repeat(LINE_BUDGET.saturating_sub(used)));
            truncate_to_width(&full, LINE_BUDGET)
        })
        .collect()
}

/// The frame that replaces everything once the countdown expires.
pub fn finished_lines(looping: bool, zero_glyphs: &[String]) -> Vec<String> {
    let title = if looping {
        ">>>  R E S T A R T I N G . . .  <<<"
    } else {
        ">>>  T I M E ' S   U P !  <<<"
    };
    let mut lines = header(title);
    lines.extend(glyph_band(zero_glyphs));
    lines.extend([
        String::new(),
        String::new(),
        border(),
        boxed(""),
        border(),
    ]);
    lines
}

fn header(title: &str) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        border(),
        boxed(""),
        boxed(&center(title)),
        boxed(""),
        border(),
    ];
    while lines.len() < GLYPH_TOP_ROW as usize {
        lines.push(String::new());
    }
    lines
}

fn border() -> String {
    format!("{MARGIN}+{}+", "=".repeat(BORDER_WIDTH))
}

fn boxed(content: &str) -> String {
    let fill = BORDER_WIDTH.saturating_sub(content.width());
    format!("{MARGIN}|{content}{}|", " ".repeat(fill))
}

fn center(text: &str) -> String {
    let padding = BORDER_WIDTH.saturating_sub(text.width()) / 2;
    format!("{}{text}", " ".repeat(padding))
}

fn truncate_to_width(text: &str, max: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= max
        })
        .collect()
}
