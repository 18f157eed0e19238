pub(crate) mod document;
pub(crate) mod greeting;
pub(crate) mod pages;

pub(crate) use document::{LetterDocument, PageMode};
pub(crate) use pages::{join_pages, split_pages};
