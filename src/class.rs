use crate::access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
use crate::attribute::Attribute;
use crate::attribute_writer::AttributeWriter;
use crate::constants::{or_zero, ClassConstantIndex, ConstantPool, Utf8ConstantIndex};
use crate::errors::Error;
use crate::instruction::InstructionWriter;
use crate::serialize::Serialize;
use crate::version::Version;
use byteorder::WriteBytesExt;
use log::trace;
use std::fs;
use std::path::Path;

/// Representation of the [`class` file format of the JVM][0]
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html
#[derive(Debug)]
pub struct ClassFile {
    pub version: Version,
    pub constants: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: ClassConstantIndex,

    /// Absent only for `java.lang.Object` (and, by convention, module-info
    /// class files)
    pub super_class: Option<ClassConstantIndex>,

    pub interfaces: Vec<ClassConstantIndex>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Magic header bytes that go at the front of the serialized class file
    const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

    /// Serialize the class file, encoding method bodies with
    /// [`FallbackInstructionWriter`](crate::instruction::FallbackInstructionWriter)
    pub fn write<W: WriteBytesExt>(&self, writer: &mut W) -> Result<(), Error> {
        self.write_with(writer, &mut AttributeWriter::new())
    }

    /// Serialize the class file through a caller-supplied attribute writer
    pub fn write_with<W: WriteBytesExt, I: InstructionWriter>(
        &self,
        writer: &mut W,
        attribute_writer: &mut AttributeWriter<I>,
    ) -> Result<(), Error> {
        trace!("writing class file (constant pool count {})", self.constants.count());
        writer.write_all(&ClassFile::MAGIC)?;
        self.version.serialize(writer)?;
        self.constants.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        or_zero(self.super_class).serialize(writer)?;
        self.interfaces.serialize(writer)?;

        (self.fields.len() as u16).serialize(writer)?;
        for field in &self.fields {
            trace!("writing field (name_index {})", field.name.0 .0);
            field.access_flags.serialize(writer)?;
            field.name.serialize(writer)?;
            field.descriptor.serialize(writer)?;
            write_attributes(writer, attribute_writer, &field.attributes)?;
        }

        (self.methods.len() as u16).serialize(writer)?;
        for method in &self.methods {
            trace!("writing method (name_index {})", method.name.0 .0);
            method.access_flags.serialize(writer)?;
            method.name.serialize(writer)?;
            method.descriptor.serialize(writer)?;
            write_attributes(writer, attribute_writer, &method.attributes)?;
        }

        write_attributes(writer, attribute_writer, &self.attributes)?;
        Ok(())
    }

    /// Save the class file to disk
    pub fn save_to_path<P: AsRef<Path>>(
        &self,
        path: P,
        create_missing_directories: bool,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        if create_missing_directories {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut class_file = fs::File::create(path)?;
        self.write(&mut class_file)
    }
}

fn write_attributes<W: WriteBytesExt, I: InstructionWriter>(
    writer: &mut W,
    attribute_writer: &mut AttributeWriter<I>,
    attributes: &[Attribute],
) -> Result<(), Error> {
    (attributes.len() as u16).serialize(writer)?;
    for attribute in attributes {
        let bytes = attribute_writer.write_attribute(attribute)?;
        writer.write_all(&bytes)?;
    }
    Ok(())
}

/// Field declared by a class or interface
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.5
#[derive(Debug)]
pub struct Field {
    pub access_flags: FieldAccessFlags,
    pub name: Utf8ConstantIndex,
    pub descriptor: Utf8ConstantIndex,
    pub attributes: Vec<Attribute>,
}

/// Method declared by a class or interface
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.6
#[derive(Debug)]
pub struct Method {
    pub access_flags: MethodAccessFlags,
    pub name: Utf8ConstantIndex,
    pub descriptor: Utf8ConstantIndex,
    pub attributes: Vec<Attribute>,
}
