use std::path::PathBuf;
use thiserror::Error;

/// The input workbook could not be read. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum InputFileError {
    #[error("cannot open workbook {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a readable xlsx package: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("workbook part missing: {0}")]
    MissingPart(String),

    #[error("malformed XML in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },
}
