/// Errors that can occur in ECS operations.
///
/// Every failure here is deterministic given the same call sequence; nothing
/// is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value of type `{0}` does not support cloning")]
    NotCloneable(&'static str),

    #[error("value of type `{0}` does not support equality comparison")]
    NotComparable(&'static str),

    #[error("no resource of type `{0}` in this world")]
    ResourceNotFound(&'static str),
}
