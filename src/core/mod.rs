pub mod error;
pub mod types;
pub mod value;

pub use error::{CommandError, Result};
pub use types::{ExecutionType, ParamType, ReturnKind, format_signature};
pub use value::Value;
