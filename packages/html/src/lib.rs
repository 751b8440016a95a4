//! # Stencil HTML
//!
//! A small DOM model standing in for the browser DOM, used for rendering
//! document nodes and for HTML interchange.
//!
//! - [`dom`]: `HtmlNode` / `HtmlElement` values
//! - [`lexer`]: logos tokenizer (content and tag modes)
//! - [`parser`]: lenient fragment parser, never fails on malformed input
//! - [`serializer`]: compact or pretty HTML output
//! - [`style`]: ordered inline style declarations

pub mod dom;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod style;


pub use dom::{is_void_tag, HtmlElement, HtmlNode};
pub use error::HtmlError;
pub use lexer::{decode_entities, HtmlToken, Tokenizer};
pub use parser::{parse_document, parse_element, parse_fragment};
pub use serializer::{element_to_html, to_html, SerializeOptions};
pub use style::StyleDeclarations;
