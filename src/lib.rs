//! Build and serialize JVM class files
//!
//! ### Simple example
//!
//! Consider the following simple Java class:
//!
//! ```java,ignore,no_run
//! public class Greeter {
//! }
//! ```
//!
//! Generating an analogous class file can be done as follows:
//!
//! ```
//! use classforge::{
//!     names, Attribute, AttributeInfo, ClassAccessFlags, ClassFile, ConstantPool, Version,
//! };
//!
//! # fn generate_class() -> Result<(), classforge::Error> {
//! // Build up the constant pool
//! let mut constants = ConstantPool::new();
//! let this_name = constants.get_utf8("me/example/Greeter")?;
//! let this_class = constants.get_class(this_name)?;
//! let object_name = constants.get_utf8("java/lang/Object")?;
//! let super_class = constants.get_class(object_name)?;
//! let source_file_name = constants.get_utf8(names::SOURCE_FILE)?;
//! let source_file = constants.get_utf8("Greeter.java")?;
//!
//! // Assemble the class
//! let class_file = ClassFile {
//!     version: Version::JAVA17,
//!     constants,
//!     access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
//!     this_class,
//!     super_class: Some(super_class),
//!     interfaces: vec![],
//!     fields: vec![],
//!     methods: vec![],
//!     attributes: vec![Attribute::new(
//!         source_file_name,
//!         AttributeInfo::SourceFile(source_file),
//!     )],
//! };
//!
//! // Finally, encode the class into bytes
//! let mut class_bytes: Vec<u8> = vec![];
//! class_file.write(&mut class_bytes)?;
//! assert_eq!(&class_bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! # Ok(())
//! # }
//! # generate_class().unwrap();
//! ```

mod access_flags;
mod annotation;
mod attribute;
mod attribute_writer;
mod class;
mod constants;
mod errors;
mod instruction;
mod serialize;
mod stack_map;
mod version;

pub use access_flags::*;
pub use annotation::*;
pub use attribute::*;
pub use attribute_writer::*;
pub use class::*;
pub use constants::*;
pub use errors::*;
pub use instruction::*;
pub use serialize::*;
pub use stack_map::*;
pub use version::*;

/// Result alias defaulting to this crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
