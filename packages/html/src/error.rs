use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HtmlError {
    #[error("No element found in input")]
    NoElement,

    #[error("Expected a single root element, found several")]
    MultipleRoots,

    #[error("Expected an element, found text: {0:?}")]
    UnexpectedText(String),
}
