//! Flow layout over a token stream.
//!
//! Layout is a left fold of [`LayoutState::step`] over the tokens. Tags
//! move the cursor and change the current [`Style`] through the
//! [`TAG_EFFECTS`] table; text runs are split into words and placed
//! left to right, wrapping at the viewport width. The result is a flat
//! display list of positioned words, a hit-region per linked word, and
//! the total content height.

mod measure;

use ember_types::Color;
use serde::Deserialize;

pub use measure::{SimpleTextMeasurer, TextMeasurer};

use crate::style::{FontWeight, Style};
use crate::tokenizer::Token;

// -------------------------------------------------------------------
// Configuration
// -------------------------------------------------------------------

/// Layout metrics. All distances are in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub left_margin: i32,
    pub top_margin: i32,
    pub bottom_margin: i32,
    pub font_family: String,
    pub base_font_size: u16,
    pub h1_font_size: u16,
    pub h2_font_size: u16,
    /// Line height as a multiple of the current font size.
    pub line_height_multiplier: f32,
    pub paragraph_spacing: i32,
    pub h1_spacing: i32,
    pub h2_spacing: i32,
    pub word_spacing: i32,
    /// Height of a link's clickable box, independent of font size.
    pub link_hit_height: i32,
    pub text_color: Color,
    pub link_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_margin: 20,
            top_margin: 20,
            bottom_margin: 20,
            font_family: "sans-serif".to_string(),
            base_font_size: 16,
            h1_font_size: 32,
            h2_font_size: 24,
            line_height_multiplier: 1.75,
            paragraph_spacing: 10,
            h1_spacing: 10,
            h2_spacing: 6,
            word_spacing: 10,
            link_hit_height: 20,
            text_color: Color::BLACK,
            link_color: Color::rgb(0, 102, 204),
        }
    }
}

impl LayoutConfig {
    /// Style in effect at the start of every document.
    pub fn base_style(&self) -> Style {
        Style::base(&self.font_family, self.base_font_size, self.text_color)
    }

    /// Height of one line of text at `font_size`.
    pub fn line_height(&self, font_size: u16) -> i32 {
        (f32::from(font_size) * self.line_height_multiplier).round() as i32
    }

    fn spacing(&self, spacing: Spacing) -> i32 {
        match spacing {
            Spacing::None => 0,
            Spacing::Paragraph => self.paragraph_spacing,
            Spacing::Heading1 => self.h1_spacing,
            Spacing::Heading2 => self.h2_spacing,
        }
    }
}

// -------------------------------------------------------------------
// Output types
// -------------------------------------------------------------------

/// One positioned word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    /// Measured width of `text` under `style`.
    pub width: i32,
    pub text: String,
    pub style: Style,
}

/// Clickable box for one linked word, in content coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub url: String,
}

impl LinkRegion {
    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

/// Everything the renderer needs to draw one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutResult {
    pub fragments: Vec<Fragment>,
    pub links: Vec<LinkRegion>,
    pub content_height: i32,
}

impl LayoutResult {
    /// The single-line page shown when a load fails. The message is one
    /// unwrapped fragment.
    pub fn error(message: &str, config: &LayoutConfig, measurer: &dyn TextMeasurer) -> Self {
        let style = config.base_style();
        let text = format!("Error loading page: {message}");
        let measured = measurer.measure_text(&text, style.font_size, style.font_weight);
        Self {
            fragments: vec![Fragment {
                x: config.left_margin,
                y: config.top_margin,
                width: i32::try_from(measured).unwrap_or(i32::MAX),
                text,
                style,
            }],
            links: Vec::new(),
            content_height: 0,
        }
    }

    pub fn hit_test(&self, x: i32, y: i32) -> Option<&str> {
        hit_test(&self.links, x, y)
    }
}

/// URL of the first region containing the content-space point.
pub fn hit_test(links: &[LinkRegion], x: i32, y: i32) -> Option<&str> {
    links
        .iter()
        .find(|r| r.contains(x, y))
        .map(|r| r.url.as_str())
}

// -------------------------------------------------------------------
// Tag effects
// -------------------------------------------------------------------

/// Extra vertical space added after a line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    None,
    Paragraph,
    Heading1,
    Heading2,
}

/// Change to the current style, applied after any line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleChange {
    Heading1,
    Heading2,
    RestoreFont,
    Bold,
    NormalWeight,
    OpenLink,
    CloseLink,
}

#[derive(Debug, Clone, Copy)]
struct TagEffect {
    line_break: Option<Spacing>,
    change: Option<StyleChange>,
}

impl TagEffect {
    const fn new_line(spacing: Spacing) -> Self {
        Self {
            line_break: Some(spacing),
            change: None,
        }
    }

    const fn style(change: StyleChange) -> Self {
        Self {
            line_break: None,
            change: Some(change),
        }
    }

    const fn both(spacing: Spacing, change: StyleChange) -> Self {
        Self {
            line_break: Some(spacing),
            change: Some(change),
        }
    }
}

/// Normalised tag name → effect. Tags not listed here do nothing.
///
/// The line break always comes before the style change. For `</h1>`
/// and `</h2>` that reverses "restore the body font, then break": the
/// line that ends a heading advances by the heading's line height, not
/// the body's. The break into a heading uses the body line height.
const TAG_EFFECTS: &[(&str, TagEffect)] = &[
    ("p", TagEffect::new_line(Spacing::Paragraph)),
    ("/p", TagEffect::new_line(Spacing::Paragraph)),
    ("br", TagEffect::new_line(Spacing::None)),
    ("h1", TagEffect::both(Spacing::Heading1, StyleChange::Heading1)),
    ("/h1", TagEffect::both(Spacing::Heading1, StyleChange::RestoreFont)),
    ("h2", TagEffect::both(Spacing::Heading2, StyleChange::Heading2)),
    ("/h2", TagEffect::both(Spacing::Heading2, StyleChange::RestoreFont)),
    ("b", TagEffect::style(StyleChange::Bold)),
    ("/b", TagEffect::style(StyleChange::NormalWeight)),
    ("strong", TagEffect::style(StyleChange::Bold)),
    ("/strong", TagEffect::style(StyleChange::NormalWeight)),
    ("a", TagEffect::style(StyleChange::OpenLink)),
    ("/a", TagEffect::style(StyleChange::CloseLink)),
];

fn tag_effect(name: &str) -> Option<TagEffect> {
    TAG_EFFECTS
        .iter()
        .find(|(tag, _)| *tag == name)
        .map(|(_, effect)| *effect)
}

// -------------------------------------------------------------------
// The fold
// -------------------------------------------------------------------

/// Inputs that stay fixed for a whole layout pass.
pub struct LayoutContext<'a> {
    pub config: &'a LayoutConfig,
    pub measurer: &'a dyn TextMeasurer,
    pub max_width: i32,
}

/// Output of a single step.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Emitted {
    pub fragments: Vec<Fragment>,
    pub links: Vec<LinkRegion>,
}

/// Cursor and style threaded through the fold.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    pub x: i32,
    pub y: i32,
    pub style: Style,
    /// Largest fragment y so far; `None` until a word is placed.
    pub max_y: Option<i32>,
}

impl LayoutState {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            x: config.left_margin,
            y: config.top_margin,
            style: config.base_style(),
            max_y: None,
        }
    }

    /// Consume one token.
    pub fn step(self, token: &Token, cx: &LayoutContext<'_>) -> (Self, Emitted) {
        match token {
            Token::Tag(_) => (self.apply_tag(token, cx.config), Emitted::default()),
            Token::Text(text) => self.place_words(text, cx),
        }
    }

    fn apply_tag(mut self, token: &Token, config: &LayoutConfig) -> Self {
        let Some(effect) = token.tag_name().as_deref().and_then(tag_effect) else {
            return self;
        };

        let href = match effect.change {
            Some(StyleChange::OpenLink) => match token.attribute("href") {
                Some(href) => Some(href),
                // `<a>` without a target is inert.
                None => return self,
            },
            _ => None,
        };

        if let Some(spacing) = effect.line_break {
            self = self.new_line(config, config.spacing(spacing));
        }

        let style = &mut self.style;
        match effect.change {
            Some(StyleChange::Heading1) => {
                style.font_size = config.h1_font_size;
                style.font_weight = FontWeight::Bold;
            },
            Some(StyleChange::Heading2) => {
                style.font_size = config.h2_font_size;
                style.font_weight = FontWeight::Bold;
            },
            Some(StyleChange::RestoreFont) => {
                style.font_size = config.base_font_size;
                style.font_weight = FontWeight::Normal;
            },
            Some(StyleChange::Bold) => style.font_weight = FontWeight::Bold,
            Some(StyleChange::NormalWeight) => style.font_weight = FontWeight::Normal,
            Some(StyleChange::OpenLink) => {
                style.link = href;
                style.color = config.link_color;
                style.underline = true;
            },
            Some(StyleChange::CloseLink) => {
                style.link = None;
                style.color = config.text_color;
                style.underline = false;
            },
            None => {},
        }
        self
    }

    fn new_line(mut self, config: &LayoutConfig, extra: i32) -> Self {
        self.x = config.left_margin;
        self.y += config.line_height(self.style.font_size) + extra;
        self
    }

    fn place_words(mut self, text: &str, cx: &LayoutContext<'_>) -> (Self, Emitted) {
        let config = cx.config;
        let mut out = Emitted::default();

        for word in text.split_whitespace() {
            let measured =
                cx.measurer
                    .measure_text(word, self.style.font_size, self.style.font_weight);
            let width = i32::try_from(measured).unwrap_or(i32::MAX);

            // A word alone on its line stays put even if it overflows.
            if self.x.saturating_add(width) > cx.max_width && self.x > config.left_margin {
                self = self.new_line(config, 0);
            }

            out.fragments.push(Fragment {
                x: self.x,
                y: self.y,
                width,
                text: word.to_string(),
                style: self.style.clone(),
            });
            if let Some(url) = &self.style.link {
                out.links.push(LinkRegion {
                    x1: self.x,
                    y1: self.y,
                    x2: self.x.saturating_add(width),
                    y2: self.y + config.link_hit_height,
                    url: url.clone(),
                });
            }

            self.max_y = Some(self.max_y.map_or(self.y, |m| m.max(self.y)));
            self.x = self
                .x
                .saturating_add(width)
                .saturating_add(config.word_spacing);
        }
        (self, out)
    }
}

/// Lay out `tokens` with the default metrics.
pub fn layout(tokens: &[Token], max_width: i32, measurer: &dyn TextMeasurer) -> LayoutResult {
    layout_with(tokens, max_width, measurer, &LayoutConfig::default())
}

/// Lay out `tokens` in a viewport `max_width` pixels wide.
pub fn layout_with(
    tokens: &[Token],
    max_width: i32,
    measurer: &dyn TextMeasurer,
    config: &LayoutConfig,
) -> LayoutResult {
    let cx = LayoutContext {
        config,
        measurer,
        max_width,
    };

    let (state, mut result) = tokens.iter().fold(
        (LayoutState::new(config), LayoutResult::default()),
        |(state, mut acc), token| {
            let (next, emitted) = state.step(token, &cx);
            acc.fragments.extend(emitted.fragments);
            acc.links.extend(emitted.links);
            (next, acc)
        },
    );

    result.content_height = state.max_y.map_or(0, |y| y + config.bottom_margin);
    result
}
