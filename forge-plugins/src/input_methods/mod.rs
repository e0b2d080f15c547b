pub mod file;
pub mod utf8;

pub use file::FileInputMethod;
pub use utf8::Utf8InputMethod;
