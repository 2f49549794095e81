mod archive;
mod article;
mod report;

pub use archive::{ArchiveReference, RawRecord};
pub use article::{CandidateArticle, NewArticle, StoredArticle, UNKNOWN_SOURCE};
pub use report::{FileOutcome, FileReport, RunReport};
