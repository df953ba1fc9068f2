mod export;
mod form;
pub mod helpers;
mod table;

pub use export::{document as export_document, spreadsheet as export_spreadsheet};
pub use form::{form, submit};
pub use table::{clear, delete, list};
