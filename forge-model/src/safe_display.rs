/// Distinguishes the full diagnostic [`std::fmt::Display`] output of an error from a message
/// that is safe to hand back to a less-trusted caller (no internal paths, credential identities,
/// or repository-internal detail).
///
/// Every error enum surfaced across a crate boundary in this workspace implements this trait
/// alongside `std::error::Error`.
pub trait SafeDisplay {
    fn to_safe_string(&self) -> String;
}
