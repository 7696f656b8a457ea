use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { file: String, message: String },
    /// A required column is missing from the header row.
    MissingColumn { file: String, column: String },
    /// A field holds a value the loader cannot use.
    BadValue {
        file: String,
        record: String,
        field: String,
        value: String,
    },
    /// The named worksheet does not exist in the workbook.
    UnknownSheet { file: String, sheet: String },
    /// The file parsed but produced no records.
    Empty { file: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { file, message } => write!(f, "cannot read {file}: {message}"),
            Self::MissingColumn { file, column } => {
                write!(f, "{file}: missing column '{column}'")
            }
            Self::BadValue { file, record, field, value } => {
                write!(f, "{file}, record '{record}': bad {field} value '{value}'")
            }
            Self::UnknownSheet { file, sheet } => {
                write!(f, "{file}: no worksheet named '{sheet}'")
            }
            Self::Empty { file } => write!(f, "{file}: no records"),
        }
    }
}

impl std::error::Error for IoError {}
