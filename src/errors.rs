use crate::constants::Constant;
use thiserror::Error;

/// Errors surfaced while building or serializing a class file.
///
/// The serializer itself never validates model content; the only failures it
/// can hit are the underlying byte sink refusing a write and the constant
/// pool running out of `u16` index space.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("constant pool cannot fit {constant:?} at offset {offset}")]
    ConstantPoolOverflow { constant: Constant, offset: u16 },
}
