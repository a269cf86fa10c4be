//! Bit sets for the `access_flags` fields of the class file format.
//!
//! Masks appear on the class itself, on each field and method, on
//! `InnerClasses` entries, and throughout the `Module` attribute. Every set
//! hits the wire as its raw `u16` mask.

use crate::serialize::Serialize;
use bitflags::bitflags;
use byteorder::WriteBytesExt;
use std::io::Result;

bitflags! {
    /// Modifiers of the class or interface declaration itself (JVMS table
    /// 4.1-B). `SUPER` is historical and set by every modern compiler;
    /// `MODULE` marks a `module-info` file that declares no class at all.
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// Modifiers of a field declaration (JVMS table 4.5-A)
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// Modifiers of a method declaration (JVMS table 4.6-A)
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

bitflags! {
    /// Modifiers the compiler recorded for a nested class in its
    /// `InnerClasses` entry (JVMS table 4.7.6-A)
    pub struct InnerClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// Properties of the module a `Module` attribute describes
    /// (JVMS §4.7.25)
    pub struct ModuleFlags: u16 {
        const OPEN = 0x0020;
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// Properties of one `requires` entry of a `Module` attribute
    pub struct RequiresFlags: u16 {
        const TRANSITIVE = 0x0020;
        const STATIC_PHASE = 0x0040;
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// Properties of one `exports` entry of a `Module` attribute
    pub struct ExportsFlags: u16 {
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// Properties of one `opens` entry of a `Module` attribute
    pub struct OpensFlags: u16 {
        const SYNTHETIC = 0x1000;
        const MANDATED = 0x8000;
    }
}

macro_rules! serialize_as_mask {
    ($($flags:ident),+ $(,)?) => {
        $(
            impl Serialize for $flags {
                fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
                    self.bits().serialize(writer)
                }
            }
        )+
    };
}

serialize_as_mask!(
    ClassAccessFlags,
    FieldAccessFlags,
    MethodAccessFlags,
    InnerClassAccessFlags,
    ModuleFlags,
    RequiresFlags,
    ExportsFlags,
    OpensFlags,
);
