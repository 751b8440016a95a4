//! HTML tokenizer using logos
//!
//! HTML lexing is context dependent: markup outside a tag and attribute
//! syntax inside a start tag use different token sets. Two logos lexers
//! cover the two modes and [`Tokenizer`] morphs between them.

use crate::dom::is_raw_text_tag;
use logos::{Lexer, Logos};
use std::borrow::Cow;

/// Tokens outside of a start tag
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum ContentToken<'src> {
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"<![a-zA-Z][^>]*>")]
    Doctype,

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim_end()
    })]
    CloseTag(&'src str),

    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*", |lex| &lex.slice()[1..])]
    OpenTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    // A `<` that does not start markup is plain text
    #[token("<")]
    Lt,
}

/// Tokens inside a start tag (between the tag name and `>`)
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TagToken<'src> {
    #[regex(r#"[^ \t\r\n\f"'<>/=]+"#, |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    DoubleQuoted(&'src str),

    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    SingleQuoted(&'src str),

    #[token(">")]
    End,

    #[token("/>")]
    SelfClose,

    #[token("/")]
    Slash,
}

fn lex_comment<'src>(lex: &mut Lexer<'src, ContentToken<'src>>) -> &'src str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            &rest[..end]
        }
        None => {
            // Unterminated comment swallows the rest of the input
            lex.bump(rest.len());
            rest
        }
    }
}

/// High-level token produced by [`Tokenizer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken<'src> {
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag(String),
    Text(Cow<'src, str>),
    Comment(&'src str),
    Doctype,
}

/// Streaming tokenizer over an HTML fragment
///
/// Never fails: input that does not form markup is surfaced as text.
pub struct Tokenizer<'src> {
    lexer: Option<Lexer<'src, ContentToken<'src>>>,
    raw_text_until: Option<String>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Some(ContentToken::lexer(source)),
            raw_text_until: None,
        }
    }

    fn read_raw_text(&mut self, tag: &str) -> Option<HtmlToken<'src>> {
        let lexer = self.lexer.as_mut()?;
        let rest = lexer.remainder();
        let close = format!("</{}", tag);
        let end = rest
            .to_ascii_lowercase()
            .find(&close)
            .unwrap_or(rest.len());
        lexer.bump(end);
        if end == 0 {
            None
        } else {
            Some(HtmlToken::Text(Cow::Borrowed(&rest[..end])))
        }
    }

    fn read_start_tag(&mut self, name: &'src str) -> Option<HtmlToken<'src>> {
        let tag_lexer = self.lexer.take()?.morph::<TagToken<'src>>();
        let (attributes, self_closing, content_lexer) = read_attributes(tag_lexer);
        self.lexer = Some(content_lexer);

        let name = name.to_ascii_lowercase();
        if !self_closing && is_raw_text_tag(&name) {
            self.raw_text_until = Some(name.clone());
        }

        Some(HtmlToken::StartTag {
            name,
            attributes,
            self_closing,
        })
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = HtmlToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tag) = self.raw_text_until.take() {
            if let Some(text) = self.read_raw_text(&tag) {
                return Some(text);
            }
        }

        loop {
            let token = self.lexer.as_mut()?.next()?;
            let token = match token {
                Ok(ContentToken::Text(text)) => HtmlToken::Text(decode_entities(text)),
                Ok(ContentToken::Lt) => HtmlToken::Text(Cow::Borrowed("<")),
                Ok(ContentToken::OpenTag(name)) => return self.read_start_tag(name),
                Ok(ContentToken::CloseTag(name)) => HtmlToken::EndTag(name.to_ascii_lowercase()),
                Ok(ContentToken::Comment(content)) => HtmlToken::Comment(content),
                Ok(ContentToken::Doctype) => HtmlToken::Doctype,
                Err(()) => continue,
            };
            return Some(token);
        }
    }
}

fn read_attributes<'src>(
    mut lexer: Lexer<'src, TagToken<'src>>,
) -> (Vec<(String, String)>, bool, Lexer<'src, ContentToken<'src>>) {
    let mut attributes = Vec::new();
    let mut pending: Option<&'src str> = None;
    let mut expect_value = false;
    let mut self_closing = false;

    while let Some(token) = lexer.next() {
        match token {
            Ok(TagToken::Name(text)) => {
                if expect_value {
                    if let Some(name) = pending.take() {
                        push_attribute(&mut attributes, name, text);
                    }
                    expect_value = false;
                } else if let Some(previous) = pending.replace(text) {
                    push_attribute(&mut attributes, previous, "");
                }
            }
            Ok(TagToken::Eq) => expect_value = pending.is_some(),
            Ok(TagToken::DoubleQuoted(value)) | Ok(TagToken::SingleQuoted(value)) => {
                if expect_value {
                    if let Some(name) = pending.take() {
                        push_attribute(&mut attributes, name, value);
                    }
                }
                expect_value = false;
            }
            Ok(TagToken::End) => break,
            Ok(TagToken::SelfClose) => {
                self_closing = true;
                break;
            }
            Ok(TagToken::Slash) | Err(()) => {}
        }
    }

    if let Some(name) = pending {
        push_attribute(&mut attributes, name, "");
    }

    (attributes, self_closing, lexer.morph())
}

fn push_attribute(attributes: &mut Vec<(String, String)>, name: &str, value: &str) {
    attributes.push((name.to_ascii_lowercase(), decode_entities(value).into_owned()));
}

/// Decode character references (`&amp;`, `&#39;`, `&#x27;`, ...)
///
/// Unknown references are kept verbatim.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = entity.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
