// fieldrule - declarative field validation for request records
//
// Rules are attached to struct fields with `#[rule(...)]` and checked with
// `Verify::verify`, which returns the first violated rule's own message.

// Re-export the engine
pub use fieldrule_core::*;

// Re-export the derive macro (same name as the trait, different namespace)
pub use fieldrule_macro::Verify;

// Re-export optional crates
#[cfg(feature = "log")]
pub use fieldrule_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        FieldValue, IntoFieldValue, PipeError, RuleDefinitionError, RuleKind, ValidationError,
        Verify, VerifyError, VerifyPipe, audit, verify,
    };
}
