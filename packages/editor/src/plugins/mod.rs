//! Built-in editor plugins

mod inline_style;

pub use inline_style::{merge_format_into_style, InlineStylePlugin};
