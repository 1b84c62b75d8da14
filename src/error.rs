/// The ways in which a Spritz operation can fail.
///
/// The engine itself is total on well-typed input. The only failures are
/// arguments outside of their domain, and running out of memory for output.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A number could not be represented as a non-negative integer.
    #[error("argument is not a representable non-negative integer")]
    InvalidArgument,
    /// Allocating the output buffer failed.
    #[error("failed to allocate output buffer")]
    OutOfMemory,
}
