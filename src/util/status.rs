use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    Ok,
    NotFound,
    Corruption,
    NotSupported,
    InvalidArgument,
    IOError,
    Incomplete,
    Aborted,
    Busy,
    /// A merge entry was read but no merge operator is configured.
    MergeOperatorMissing,
    /// The configured merge operator rejected its input.
    MergeOperatorFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn ok() -> Self {
        Status {
            code: Code::Ok,
            message: None,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status::with_code(Code::NotFound, msg)
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Status::with_code(Code::Corruption, msg)
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Status::with_code(Code::NotSupported, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status::with_code(Code::InvalidArgument, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Status::with_code(Code::IOError, msg)
    }

    pub fn aborted(msg: impl Into<String>) -> Self {
        Status::with_code(Code::Aborted, msg)
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Status::with_code(Code::Busy, msg)
    }

    pub fn merge_operator_missing(msg: impl Into<String>) -> Self {
        Status::with_code(Code::MergeOperatorMissing, msg)
    }

    pub fn merge_operator_failed(msg: impl Into<String>) -> Self {
        Status::with_code(Code::MergeOperatorFailed, msg)
    }

    fn with_code(code: Code, msg: impl Into<String>) -> Self {
        Status {
            code,
            message: Some(msg.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_corruption(&self) -> bool {
        self.code == Code::Corruption
    }

    pub fn is_io_error(&self) -> bool {
        self.code == Code::IOError
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_merge_operator_missing(&self) -> bool {
        self.code == Code::MergeOperatorMissing
    }

    pub fn is_merge_operator_failed(&self) -> bool {
        self.code == Code::MergeOperatorFailed
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `Ok(())` for an ok status, otherwise the status itself as the error.
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::corruption(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Status>;
