//! Chat bubble formatting.
//!
//! Only the markers the chat service itself emits are understood: `**bold**`,
//! `### Header:`, lines starting with `• ` or `- `, and line breaks. The rules
//! run in a fixed order and the line break rule must stay last.

use crate::session::Turn;
use regex::Regex;
use std::sync::OnceLock;

const BOLD_OPEN: char = '\u{E000}';
const BOLD_CLOSE: char = '\u{E001}';
const HEADER_OPEN: char = '\u{E002}';
const HEADER_CLOSE: char = '\u{E003}';
const BULLET_OPEN: char = '\u{E004}';
const BULLET_CLOSE: char = '\u{E005}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Bold,
    Header,
    Bullet,
    DashBullet,
    LineBreak,
}

pub const RULES: [Rule; 5] = [
    Rule::Bold,
    Rule::Header,
    Rule::Bullet,
    Rule::DashBullet,
    Rule::LineBreak,
];

impl Rule {
    fn pattern(self) -> &'static Regex {
        static PATTERNS: OnceLock<[Regex; 5]> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            [
                r"(?R)\*\*(.*?)\*\*",
                r"(?R)### (.*?):",
                r"(?mR)^• (.*)$",
                r"(?mR)^- (.*)$",
                r"\n",
            ]
            .map(|pattern| Regex::new(pattern).expect("formatting pattern is valid"))
        });
        &patterns[self as usize]
    }

    fn html(self) -> &'static str {
        match self {
            Self::Bold => "<b>${1}</b>",
            Self::Header => {
                "<h4 style=\"margin: 10px 0 5px 0; font-weight: bold; color: #2c5aa0;\">${1}:</h4>"
            }
            Self::Bullet | Self::DashBullet => {
                "<div style=\"margin: 5px 0; padding-left: 15px;\">• ${1}</div>"
            }
            Self::LineBreak => "<br>",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Bold => "\u{E000}${1}\u{E001}",
            Self::Header => "\u{E002}${1}:\u{E003}",
            Self::Bullet | Self::DashBullet => "\u{E004}• ${1}\u{E005}",
            Self::LineBreak => "\n",
        }
    }
}

fn apply_rules(text: &str, replacement: fn(Rule) -> &'static str) -> String {
    RULES.iter().fold(text.to_string(), |acc, rule| {
        rule.pattern()
            .replace_all(&acc, replacement(*rule))
            .into_owned()
    })
}

/// HTML exactly as the web widget renders a bubble.
pub fn to_html(text: &str) -> String {
    apply_rules(text, Rule::html)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub bullet: bool,
    pub spans: Vec<Span>,
}

/// Structured form of [`to_html`] for native rendering.
pub fn to_lines(text: &str) -> Vec<Line> {
    let cleaned: String = text
        .chars()
        .filter(|ch| !('\u{E000}'..='\u{E005}').contains(ch))
        .collect();
    let marked = apply_rules(&cleaned, Rule::marker);

    marked.split('\n').map(parse_line).collect()
}

fn parse_line(raw: &str) -> Line {
    let mut line = Line::default();
    let mut bold = false;
    let mut header = false;
    let mut buffer = String::new();

    let flush = |buffer: &mut String, line: &mut Line, bold: bool, header: bool| {
        if !buffer.is_empty() {
            line.spans.push(Span {
                text: std::mem::take(buffer),
                bold,
                header,
            });
        }
    };

    for ch in raw.chars() {
        match ch {
            BOLD_OPEN | BOLD_CLOSE => {
                flush(&mut buffer, &mut line, bold, header);
                bold = ch == BOLD_OPEN;
            }
            HEADER_OPEN | HEADER_CLOSE => {
                flush(&mut buffer, &mut line, bold, header);
                header = ch == HEADER_OPEN;
            }
            BULLET_OPEN => line.bullet = true,
            BULLET_CLOSE => {}
            _ => buffer.push(ch),
        }
    }
    flush(&mut buffer, &mut line, bold, header);
    line
}

/// Conversation as the web widget's message list markup.
pub fn transcript_html<'a>(turns: impl IntoIterator<Item = &'a Turn>) -> String {
    turns
        .into_iter()
        .map(|turn| {
            format!(
                "<div class=\"palms-message {}\">{}</div>",
                turn.author.css_class(),
                to_html(&turn.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
