//! Lays out plain text with `#` headings onto streamed pages.
//!
//! `#`, `##`, ... lines become headings and outline entries at that depth,
//! `---` forces a page break and every other line is body text, wrapped to
//! the page's content area.

use streampdf::{Document, Font, OutlineOptions, PageOptions, Result, Sink};
use tracing::{debug, trace};

const BODY_SIZE: f64 = 11.0;
const LEADING: f64 = 1.4;
/// Average glyph width of the standard Latin fonts as a fraction of the size.
const AVERAGE_GLYPH_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Heading { level: usize, title: &'a str },
    PageBreak,
    Body(&'a str),
    Blank,
}

pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed == "---" {
        return Line::PageBreak;
    }
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    let rest = &trimmed[level..];
    // `#tag` is body text; a heading marker is followed by whitespace
    if level > 0 && rest.starts_with(char::is_whitespace) {
        let title = rest.trim();
        if !title.is_empty() {
            return Line::Heading { level, title };
        }
    }
    Line::Body(trimmed)
}

fn heading_font(level: usize) -> (Font, f64) {
    match level {
        1 => (Font::HelveticaBold, 20.0),
        2 => (Font::HelveticaBold, 15.0),
        _ => (Font::HelveticaBoldOblique, 12.0),
    }
}

/// Splits `text` into lines of at most `max_chars` characters, breaking at
/// spaces where possible.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// What a render produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderSummary {
    pub pages: usize,
    pub headings: usize,
    pub lines: usize,
}

/// Writes text into a document, adding pages as the cursor runs off the
/// bottom margin.
pub struct TextRenderer<'a, S: Sink> {
    doc: &'a mut Document<S>,
    options: PageOptions,
    cursor: Option<f64>,
    // whether each open outline level already has an entry
    levels: Vec<bool>,
    summary: RenderSummary,
}

impl<'a, S: Sink> TextRenderer<'a, S> {
    pub fn new(doc: &'a mut Document<S>, options: PageOptions) -> Self {
        Self {
            doc,
            options,
            cursor: None,
            levels: vec![false],
            summary: RenderSummary::default(),
        }
    }

    pub fn render(mut self, source: &str) -> Result<RenderSummary> {
        for line in source.lines() {
            match classify(line) {
                Line::Heading { level, title } => self.heading(level, title)?,
                Line::PageBreak => self.new_page()?,
                Line::Body(text) => self.body(text)?,
                Line::Blank => {
                    if let Some(y) = self.cursor {
                        self.cursor = Some(y - BODY_SIZE * LEADING);
                    }
                }
            }
        }
        if self.summary.pages == 0 {
            self.new_page()?;
        }
        debug!(
            pages = self.summary.pages,
            headings = self.summary.headings,
            lines = self.summary.lines,
            "text rendered"
        );
        Ok(self.summary)
    }

    fn new_page(&mut self) -> Result<()> {
        self.doc.add_page(self.options)?;
        let (_, height) = self.options.dimensions();
        self.cursor = Some(height - self.options.margins.top);
        self.summary.pages += 1;
        Ok(())
    }

    /// Returns the baseline for a line of `size`, starting a page if needed.
    fn baseline(&mut self, size: f64) -> Result<f64> {
        let bottom = self.options.margins.bottom;
        match self.cursor {
            Some(y) if y - size >= bottom => {
                self.cursor = Some(y - size * LEADING);
                Ok(y - size)
            }
            _ => {
                self.new_page()?;
                let top = self.cursor.unwrap_or(bottom);
                self.cursor = Some(top - size * LEADING);
                Ok(top - size)
            }
        }
    }

    fn max_chars(&self, size: f64) -> usize {
        let (width, _) = self.options.dimensions();
        let margins = self.options.margins;
        let usable = width - margins.left - margins.right;
        (usable / (size * AVERAGE_GLYPH_WIDTH)).floor().max(1.0) as usize
    }

    fn heading(&mut self, level: usize, title: &str) -> Result<()> {
        let (font, size) = heading_font(level);
        let y = self.baseline(size)?;
        self.doc
            .font(font, size)
            .text(title, self.options.margins.left, y)?;
        self.outline(level - 1, title)?;
        self.summary.headings += 1;
        Ok(())
    }

    fn outline(&mut self, depth: usize, title: &str) -> Result<()> {
        if self.doc.outlines().is_none() {
            return Ok(());
        }
        while self.levels.len() - 1 > depth {
            self.doc.exit_outline_level()?;
            self.levels.pop();
        }
        // a heading that skips levels nests one level deeper at most
        while self.levels.len() - 1 < depth && self.levels.last() == Some(&true) {
            self.doc.enter_outline_level()?;
            self.levels.push(false);
        }

        trace!(title, depth = self.levels.len() - 1, "outline entry");
        self.doc.add_outline(title, None, OutlineOptions::default())?;
        if let Some(last) = self.levels.last_mut() {
            *last = true;
        }
        Ok(())
    }

    fn body(&mut self, text: &str) -> Result<()> {
        for line in wrap(text, self.max_chars(BODY_SIZE)) {
            let y = self.baseline(BODY_SIZE)?;
            self.doc
                .font(Font::Helvetica, BODY_SIZE)
                .text(&line, self.options.margins.left, y)?;
            self.summary.lines += 1;
        }
        Ok(())
    }
}
