//! Tolerant markup tokenizer.
//!
//! Splits raw HTML into a flat sequence of [`Token::Tag`] and
//! [`Token::Text`] runs. There is no tree, no entity decoding and no
//! attribute parsing up front; attributes are looked up on demand with
//! [`Token::attribute`].
//!
//! `<script>` and `<style>` payloads are dropped. Only the exact,
//! attribute-free markers are recognised (case-insensitively): a
//! `<script src=...>` opener is an ordinary tag and its body is text.

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

/// A single token, carrying its raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Everything from `<` through the matching `>`, inclusive.
    Tag(String),
    /// A run of characters between tags. Not split into words.
    Text(String),
}

impl Token {
    /// Lower-cased first word of a tag, without the angle brackets or a
    /// self-closing `/`. End tags keep their leading `/`.
    ///
    /// `<A HREF="x">` → `a`, `</P>` → `/p`, `<br/>` → `br`.
    /// Returns `None` for text tokens.
    pub fn tag_name(&self) -> Option<String> {
        let Token::Tag(raw) = self else {
            return None;
        };
        let raw = raw.as_str();
        let inner = raw.strip_prefix('<').unwrap_or(raw);
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        let first = inner.split_whitespace().next().unwrap_or("");
        let first = if first.len() > 1 {
            first.strip_suffix('/').unwrap_or(first)
        } else {
            first
        };
        Some(first.to_ascii_lowercase())
    }

    /// Value of the first `name="..."` in a tag. The attribute name is
    /// matched case-insensitively; only double quotes delimit values.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let Token::Tag(raw) = self else {
            return None;
        };
        let needle = format!("{}=\"", name.to_ascii_lowercase());
        let lowered = raw.to_ascii_lowercase();

        let mut search_from = 0;
        while let Some(offset) = lowered[search_from..].find(&needle) {
            let start = search_from + offset;
            // Must not be the tail of a longer attribute name (`data-href`).
            let boundary = lowered[..start]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || c == '<');
            let value_start = start + needle.len();
            if boundary {
                let value_len = raw[value_start..].find('"')?;
                return Some(raw[value_start..value_start + value_len].to_string());
            }
            search_from = value_start;
        }
        None
    }
}

/// Trimmed text of the first `<title>...</title>` pair.
pub fn extract_title(tokens: &[Token]) -> Option<String> {
    let open = tokens
        .iter()
        .position(|t| t.tag_name().as_deref() == Some("title"))?;

    let mut title = String::new();
    for token in &tokens[open + 1..] {
        match token {
            Token::Text(text) => title.push_str(text),
            Token::Tag(_) if token.tag_name().as_deref() == Some("/title") => {
                let trimmed = title.split_whitespace().collect::<Vec<_>>().join(" ");
                return (!trimmed.is_empty()).then_some(trimmed);
            },
            Token::Tag(_) => {},
        }
    }
    None
}

/// Tokenize `html` in one pass.
pub fn tokenize(html: &str) -> Vec<Token> {
    Tokenizer::new(html).tokenize()
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

const SCRIPT_OPEN: &str = "<script>";
const SCRIPT_CLOSE: &str = "</script>";
const STYLE_OPEN: &str = "<style>";
const STYLE_CLOSE: &str = "</style>";

/// Character-at-a-time scanner.
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    text: String,
    /// `Some` while accumulating a tag.
    tag: Option<String>,
    in_script: bool,
    in_style: bool,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            text: String::new(),
            tag: None,
            in_script: false,
            in_style: false,
        }
    }

    /// Run to the end of input and return the tokens.
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.pos < self.input.len() {
            if self.tag.is_none() && self.raw_text_marker() {
                continue;
            }
            if self.in_script || self.in_style {
                self.pos += 1;
                continue;
            }

            let c = self.input[self.pos];
            self.pos += 1;
            match self.tag.as_mut() {
                Some(tag) => {
                    tag.push(c);
                    if c == '>' {
                        let raw = std::mem::take(tag);
                        self.tag = None;
                        self.tokens.push(Token::Tag(raw));
                    }
                },
                None if c == '<' => {
                    self.flush_text();
                    self.tag = Some(String::from('<'));
                },
                None => self.text.push(c),
            }
        }

        // An open tag at EOF is dropped along with everything it swallowed.
        if self.tag.is_none() && !self.in_script && !self.in_style {
            self.flush_text();
        }
        self.tokens
    }

    /// Consume a script/style marker at the cursor, updating the skip
    /// flags. Returns `true` if one was consumed.
    fn raw_text_marker(&mut self) -> bool {
        let markers: [(&str, fn(&mut Self)); 4] = [
            (SCRIPT_OPEN, |t| t.in_script = true),
            (SCRIPT_CLOSE, |t| t.in_script = false),
            (STYLE_OPEN, |t| t.in_style = true),
            (STYLE_CLOSE, |t| t.in_style = false),
        ];
        for (marker, apply) in markers {
            if self.starts_with_ci(marker) {
                if !self.in_script && !self.in_style {
                    self.flush_text();
                }
                apply(self);
                self.pos += marker.chars().count();
                return true;
            }
        }
        false
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn starts_with_ci(&self, s: &str) -> bool {
        let mut i = self.pos;
        for expected in s.chars() {
            match self.input.get(i) {
                Some(c) if c.eq_ignore_ascii_case(&expected) => i += 1,
                _ => return false,
            }
        }
        true
    }
}
