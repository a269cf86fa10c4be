use crate::constants::{ConstantIndex, Utf8ConstantIndex};
use crate::serialize::Serialize;
use byteorder::WriteBytesExt;
use std::io::Result;

/// One annotation: the field descriptor of its type plus named element
/// values, kept in declaration order
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.16
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub type_descriptor: Utf8ConstantIndex,
    pub element_values: Vec<ElementValuePair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementValuePair {
    pub name: Utf8ConstantIndex,
    pub value: ElementValue,
}

/// Value of one annotation element
///
/// Serialized as a tag byte followed by a tag-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    /// A primitive or string constant. The tag is one of `B C D F I J S Z s`
    /// and picks how the JVM interprets the pool entry.
    Primitive { tag: u8, value: ConstantIndex },

    /// An enum constant, named by its type descriptor and constant name.
    /// Tag: `e`
    Enum {
        type_descriptor: Utf8ConstantIndex,
        const_name: Utf8ConstantIndex,
    },

    /// A class literal, as a return descriptor. Tag: `c`
    Class(Utf8ConstantIndex),

    /// A nested annotation. Tag: `@`
    Annotation(Annotation),

    /// An array of values. Tag: `[`
    Array(Vec<ElementValue>),
}

impl ElementValue {
    /// Tag byte leading the serialized form
    pub fn tag(&self) -> u8 {
        match self {
            ElementValue::Primitive { tag, .. } => *tag,
            ElementValue::Enum { .. } => b'e',
            ElementValue::Class(_) => b'c',
            ElementValue::Annotation(_) => b'@',
            ElementValue::Array(_) => b'[',
        }
    }

    /// Number of bytes the serialized form occupies
    pub(crate) fn length(&self) -> u32 {
        match self {
            ElementValue::Primitive { .. } => 3,
            ElementValue::Enum { .. } => 5,
            ElementValue::Class(_) => 3,
            ElementValue::Annotation(annotation) => 1 + annotation.length(),
            ElementValue::Array(values) => {
                3 + values.iter().map(ElementValue::length).sum::<u32>()
            }
        }
    }
}

impl Annotation {
    /// Number of bytes the serialized annotation occupies
    pub(crate) fn length(&self) -> u32 {
        4 + self
            .element_values
            .iter()
            .map(|pair| 2 + pair.value.length())
            .sum::<u32>()
    }
}

/// An annotation applied to a *use* of a type rather than a declaration
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.20
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub target_info: TargetInfo,
    pub type_path: Vec<TypePathElement>,
    pub annotation: Annotation,
}

impl TypeAnnotation {
    pub(crate) fn length(&self) -> u32 {
        self.target_info.length() + 1 + 2 * self.type_path.len() as u32 + self.annotation.length()
    }
}

/// One step of the path from an outer type to the annotated inner type
/// (into an array element, a nested type, a wildcard bound, or a type
/// argument)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypePathElement {
    pub kind: u8,
    pub argument_index: u8,
}

/// Where a type annotation applies, keyed by the leading `target_type` byte
///
/// Variants whose `target_type` ranges over several values store the byte
/// directly; single-valued variants produce it from [`TargetInfo::target_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetInfo {
    /// Type parameter declaration of a class (0x00) or method (0x01)
    TypeParameter { target_type: u8, index: u8 },

    /// Supertype in an `extends` or `implements` clause. Tag: 0x10
    SuperType { index: u16 },

    /// Bound of a type parameter of a class (0x11) or method (0x12)
    TypeParameterBound {
        target_type: u8,
        type_parameter: u8,
        bound: u8,
    },

    /// Field declaration (0x13), method return (0x14), or receiver (0x15);
    /// no payload
    Empty { target_type: u8 },

    /// Formal parameter declaration. Tag: 0x16
    FormalParameter { index: u8 },

    /// Type in a `throws` clause. Tag: 0x17
    Throws { index: u16 },

    /// Local variable (0x40) or resource variable (0x41) declaration, with
    /// the live ranges of the variable
    LocalVariable {
        target_type: u8,
        table: Vec<LocalVariableTarget>,
    },

    /// Type in an exception handler. Tag: 0x42
    Catch { index: u16 },

    /// Type in an `instanceof` (0x43), `new` (0x44), method-reference `::new`
    /// (0x45) or method-reference identifier (0x46) expression
    Offset { target_type: u8, offset: u16 },

    /// Type argument of a cast (0x47) or of a generic call or reference
    /// (0x48-0x4B)
    TypeArgument {
        target_type: u8,
        offset: u16,
        index: u8,
    },
}

/// One live range of an annotated local variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariableTarget {
    pub start_pc: u16,
    pub length: u16,
    pub index: u16,
}

impl TargetInfo {
    /// The `target_type` byte leading the serialized form
    pub fn target_type(&self) -> u8 {
        match self {
            TargetInfo::TypeParameter { target_type, .. } => *target_type,
            TargetInfo::SuperType { .. } => 0x10,
            TargetInfo::TypeParameterBound { target_type, .. } => *target_type,
            TargetInfo::Empty { target_type } => *target_type,
            TargetInfo::FormalParameter { .. } => 0x16,
            TargetInfo::Throws { .. } => 0x17,
            TargetInfo::LocalVariable { target_type, .. } => *target_type,
            TargetInfo::Catch { .. } => 0x42,
            TargetInfo::Offset { target_type, .. } => *target_type,
            TargetInfo::TypeArgument { target_type, .. } => *target_type,
        }
    }

    /// Number of bytes the serialized form occupies, `target_type` included
    pub(crate) fn length(&self) -> u32 {
        match self {
            TargetInfo::TypeParameter { .. } => 2,
            TargetInfo::SuperType { .. } => 3,
            TargetInfo::TypeParameterBound { .. } => 3,
            TargetInfo::Empty { .. } => 1,
            TargetInfo::FormalParameter { .. } => 2,
            TargetInfo::Throws { .. } => 3,
            TargetInfo::LocalVariable { table, .. } => 3 + 6 * table.len() as u32,
            TargetInfo::Catch { .. } => 3,
            TargetInfo::Offset { .. } => 3,
            TargetInfo::TypeArgument { .. } => 4,
        }
    }
}

/// Streams annotation trees into an output sink.
///
/// The attribute serializer hands this writer its own buffer, so annotation
/// bytes land directly inside the attribute body being assembled.
pub struct AnnotationWriter<'a, W: WriteBytesExt> {
    out: &'a mut W,
}

impl<'a, W: WriteBytesExt> AnnotationWriter<'a, W> {
    pub fn new(out: &'a mut W) -> AnnotationWriter<'a, W> {
        AnnotationWriter { out }
    }

    /// Body of a `RuntimeVisibleAnnotations` / `RuntimeInvisibleAnnotations`
    /// attribute: `u16` count then each annotation
    pub fn write_annotations(&mut self, annotations: &[Annotation]) -> Result<()> {
        (annotations.len() as u16).serialize(self.out)?;
        for annotation in annotations {
            self.write_annotation(annotation)?;
        }
        Ok(())
    }

    /// Body of a `Runtime*ParameterAnnotations` attribute. The parameter
    /// count is a single byte.
    pub fn write_parameter_annotations(&mut self, parameters: &[Vec<Annotation>]) -> Result<()> {
        (parameters.len() as u8).serialize(self.out)?;
        for annotations in parameters {
            self.write_annotations(annotations)?;
        }
        Ok(())
    }

    /// Body of a `Runtime*TypeAnnotations` attribute
    pub fn write_type_annotations(&mut self, annotations: &[TypeAnnotation]) -> Result<()> {
        (annotations.len() as u16).serialize(self.out)?;
        for annotation in annotations {
            self.write_type_annotation(annotation)?;
        }
        Ok(())
    }

    /// Body of an `AnnotationDefault` attribute: the bare element value
    pub fn write_annotation_default(&mut self, value: &ElementValue) -> Result<()> {
        self.write_element_value(value)
    }

    fn write_annotation(&mut self, annotation: &Annotation) -> Result<()> {
        annotation.type_descriptor.serialize(self.out)?;
        (annotation.element_values.len() as u16).serialize(self.out)?;
        for pair in &annotation.element_values {
            pair.name.serialize(self.out)?;
            self.write_element_value(&pair.value)?;
        }
        Ok(())
    }

    fn write_element_value(&mut self, value: &ElementValue) -> Result<()> {
        value.tag().serialize(self.out)?;
        match value {
            ElementValue::Primitive { value, .. } => value.serialize(self.out)?,
            ElementValue::Enum {
                type_descriptor,
                const_name,
            } => {
                type_descriptor.serialize(self.out)?;
                const_name.serialize(self.out)?;
            }
            ElementValue::Class(descriptor) => descriptor.serialize(self.out)?,
            ElementValue::Annotation(nested) => self.write_annotation(nested)?,
            ElementValue::Array(values) => {
                (values.len() as u16).serialize(self.out)?;
                for value in values {
                    self.write_element_value(value)?;
                }
            }
        };
        Ok(())
    }

    fn write_type_annotation(&mut self, annotation: &TypeAnnotation) -> Result<()> {
        annotation.target_info.target_type().serialize(self.out)?;
        match &annotation.target_info {
            TargetInfo::TypeParameter { index, .. } => index.serialize(self.out)?,
            TargetInfo::SuperType { index } => index.serialize(self.out)?,
            TargetInfo::TypeParameterBound {
                type_parameter,
                bound,
                ..
            } => {
                type_parameter.serialize(self.out)?;
                bound.serialize(self.out)?;
            }
            TargetInfo::Empty { .. } => {}
            TargetInfo::FormalParameter { index } => index.serialize(self.out)?,
            TargetInfo::Throws { index } => index.serialize(self.out)?,
            TargetInfo::LocalVariable { table, .. } => {
                (table.len() as u16).serialize(self.out)?;
                for entry in table {
                    entry.start_pc.serialize(self.out)?;
                    entry.length.serialize(self.out)?;
                    entry.index.serialize(self.out)?;
                }
            }
            TargetInfo::Catch { index } => index.serialize(self.out)?,
            TargetInfo::Offset { offset, .. } => offset.serialize(self.out)?,
            TargetInfo::TypeArgument { offset, index, .. } => {
                offset.serialize(self.out)?;
                index.serialize(self.out)?;
            }
        };

        (annotation.type_path.len() as u8).serialize(self.out)?;
        for element in &annotation.type_path {
            element.kind.serialize(self.out)?;
            element.argument_index.serialize(self.out)?;
        }

        self.write_annotation(&annotation.annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(index: u16) -> Utf8ConstantIndex {
        Utf8ConstantIndex(ConstantIndex(index))
    }

    #[test]
    fn simple_annotation() {
        let annotation = Annotation {
            type_descriptor: utf8(3),
            element_values: vec![ElementValuePair {
                name: utf8(4),
                value: ElementValue::Primitive {
                    tag: b'I',
                    value: ConstantIndex(5),
                },
            }],
        };

        let mut bytes = vec![];
        AnnotationWriter::new(&mut bytes)
            .write_annotations(&[annotation.clone()])
            .unwrap();
        assert_eq!(
            bytes,
            vec![0x00, 0x01, 0x00, 0x03, 0x00, 0x01, 0x00, 0x04, b'I', 0x00, 0x05]
        );
        assert_eq!(bytes.len() as u32, 2 + annotation.length());
    }

    #[test]
    fn nested_values_report_their_length() {
        let value = ElementValue::Array(vec![
            ElementValue::Enum {
                type_descriptor: utf8(6),
                const_name: utf8(7),
            },
            ElementValue::Class(utf8(8)),
        ]);

        let mut bytes = vec![];
        AnnotationWriter::new(&mut bytes)
            .write_annotation_default(&value)
            .unwrap();
        assert_eq!(
            bytes,
            vec![b'[', 0x00, 0x02, b'e', 0x00, 0x06, 0x00, 0x07, b'c', 0x00, 0x08]
        );
        assert_eq!(bytes.len() as u32, value.length());
    }

    #[test]
    fn parameter_annotations_use_a_byte_count() {
        let annotation = Annotation {
            type_descriptor: utf8(3),
            element_values: vec![],
        };

        let mut bytes = vec![];
        AnnotationWriter::new(&mut bytes)
            .write_parameter_annotations(&[vec![], vec![annotation]])
            .unwrap();
        assert_eq!(
            bytes,
            vec![0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x03, 0x00, 0x00]
        );
    }

    #[test]
    fn type_annotation_on_a_field() {
        let annotation = TypeAnnotation {
            target_info: TargetInfo::Empty { target_type: 0x13 },
            type_path: vec![],
            annotation: Annotation {
                type_descriptor: utf8(3),
                element_values: vec![],
            },
        };

        let mut bytes = vec![];
        AnnotationWriter::new(&mut bytes)
            .write_type_annotations(&[annotation.clone()])
            .unwrap();
        assert_eq!(bytes, vec![0x00, 0x01, 0x13, 0x00, 0x00, 0x03, 0x00, 0x00]);
        assert_eq!(bytes.len() as u32, 2 + annotation.length());
    }

    #[test]
    fn type_annotation_on_a_local_variable() {
        let annotation = TypeAnnotation {
            target_info: TargetInfo::LocalVariable {
                target_type: 0x40,
                table: vec![LocalVariableTarget {
                    start_pc: 2,
                    length: 10,
                    index: 1,
                }],
            },
            type_path: vec![TypePathElement {
                kind: 0,
                argument_index: 0,
            }],
            annotation: Annotation {
                type_descriptor: utf8(9),
                element_values: vec![],
            },
        };

        let mut bytes = vec![];
        AnnotationWriter::new(&mut bytes)
            .write_type_annotations(&[annotation.clone()])
            .unwrap();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x01, // count
                0x40, 0x00, 0x01, 0x00, 0x02, 0x00, 0x0A, 0x00, 0x01, // target
                0x01, 0x00, 0x00, // type path
                0x00, 0x09, 0x00, 0x00, // annotation
            ]
        );
        assert_eq!(bytes.len() as u32, 2 + annotation.length());
    }
}
