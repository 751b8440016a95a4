pub mod catalog;
pub mod export;
pub mod import;
pub mod insert;
pub mod new;

pub use catalog::{catalog, CatalogArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use insert::{insert, InsertArgs};
pub use new::{new_document, NewArgs};
