use crate::access_flags::{ExportsFlags, InnerClassAccessFlags, ModuleFlags, OpensFlags, RequiresFlags};
use crate::annotation::{Annotation, ElementValue, TypeAnnotation};
use crate::constants::{
    ClassConstantIndex, ConstantIndex, ModuleConstantIndex, NameAndTypeConstantIndex,
    PackageConstantIndex, Utf8ConstantIndex,
};
use crate::instruction::Instruction;
use crate::stack_map::StackMapFrame;

/// Names of the standard attributes, as they appear in the constant pool
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7-300
pub mod names {
    pub const BOOTSTRAP_METHODS: &str = "BootstrapMethods";
    pub const CODE: &str = "Code";
    pub const CONSTANT_VALUE: &str = "ConstantValue";
    pub const ENCLOSING_METHOD: &str = "EnclosingMethod";
    pub const EXCEPTIONS: &str = "Exceptions";
    pub const INNER_CLASSES: &str = "InnerClasses";
    pub const LINE_NUMBER_TABLE: &str = "LineNumberTable";
    pub const LOCAL_VARIABLE_TABLE: &str = "LocalVariableTable";
    pub const LOCAL_VARIABLE_TYPE_TABLE: &str = "LocalVariableTypeTable";
    pub const MODULE: &str = "Module";
    pub const MODULE_HASHES: &str = "ModuleHashes";
    pub const MODULE_PACKAGES: &str = "ModulePackages";
    pub const MODULE_TARGET: &str = "ModuleTarget";
    pub const NEST_HOST: &str = "NestHost";
    pub const NEST_MEMBERS: &str = "NestMembers";
    pub const PERMITTED_SUBCLASSES: &str = "PermittedSubclasses";
    pub const RECORD: &str = "Record";
    pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
    pub const RUNTIME_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";
    pub const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeVisibleParameterAnnotations";
    pub const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &str =
        "RuntimeInvisibleParameterAnnotations";
    pub const RUNTIME_VISIBLE_TYPE_ANNOTATIONS: &str = "RuntimeVisibleTypeAnnotations";
    pub const RUNTIME_INVISIBLE_TYPE_ANNOTATIONS: &str = "RuntimeInvisibleTypeAnnotations";
    pub const ANNOTATION_DEFAULT: &str = "AnnotationDefault";
    pub const SIGNATURE: &str = "Signature";
    pub const SOURCE_DEBUG_EXTENSION: &str = "SourceDebugExtension";
    pub const SOURCE_FILE: &str = "SourceFile";
    pub const STACK_MAP_TABLE: &str = "StackMapTable";

    // Standard names whose attributes carry no body bytes in this model
    pub const CHARACTER_RANGE_TABLE: &str = "CharacterRangeTable";
    pub const COMPILATION_ID: &str = "CompilationID";
    pub const DEPRECATED: &str = "Deprecated";
    pub const METHOD_PARAMETERS: &str = "MethodParameters";
    pub const MODULE_MAIN_CLASS: &str = "ModuleMainClass";
    pub const MODULE_RESOLUTION: &str = "ModuleResolution";
    pub const SOURCE_ID: &str = "SourceID";
    pub const SYNTHETIC: &str = "Synthetic";
}

/// An attribute attached to a class, field, method, `Code` block or record
/// component
///
/// The name lives in the constant pool; which body layout gets emitted is
/// decided by the [`AttributeInfo`] variant. Keeping the two separate means
/// the same body shape can serve several names (the four annotation
/// visibility pairs differ only in their name entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: Utf8ConstantIndex,
    pub info: AttributeInfo,
}

impl Attribute {
    pub fn new(name: Utf8ConstantIndex, info: AttributeInfo) -> Attribute {
        Attribute { name, info }
    }
}

/// Body of an attribute, one variant per standard layout
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeInfo {
    BootstrapMethods(Vec<BootstrapMethod>),
    Code(CodeAttribute),
    ConstantValue(ConstantIndex),
    EnclosingMethod(EnclosingMethod),
    Exceptions(Vec<ClassConstantIndex>),
    InnerClasses(Vec<InnerClass>),
    LineNumberTable(Vec<LineNumber>),
    LocalVariableTable(Vec<LocalVariable>),
    LocalVariableTypeTable(Vec<LocalVariableType>),
    Module(Box<ModuleAttribute>),
    ModuleHashes(ModuleHashes),
    ModulePackages(Vec<PackageConstantIndex>),
    ModuleTarget(Utf8ConstantIndex),
    NestHost(ClassConstantIndex),
    NestMembers(Vec<ClassConstantIndex>),
    PermittedSubclasses(Vec<ClassConstantIndex>),
    Record(Vec<RecordComponent>),

    /// Body of `RuntimeVisibleAnnotations` and `RuntimeInvisibleAnnotations`
    Annotations(Vec<Annotation>),

    /// Body of `RuntimeVisibleParameterAnnotations` and its invisible twin;
    /// one annotation list per formal parameter
    ParameterAnnotations(Vec<Vec<Annotation>>),

    /// Body of `RuntimeVisibleTypeAnnotations` and its invisible twin
    TypeAnnotations(Vec<TypeAnnotation>),

    AnnotationDefault(ElementValue),
    Signature(Utf8ConstantIndex),

    /// Extended debugging information; the payload is an opaque modified
    /// UTF-8 buffer emitted without an inner length field (the attribute
    /// length frames it)
    SourceDebugExtension(Vec<u8>),

    SourceFile(Utf8ConstantIndex),
    StackMapTable(Vec<StackMapFrame>),

    /// Attributes that are all name and no body (`Deprecated`, `Synthetic`,
    /// and the other marker names in [`names`])
    Empty,

    /// Any attribute this crate does not model structurally; the payload is
    /// echoed verbatim, which keeps unknown attributes round-tripping
    Raw(Vec<u8>),
}

/// One entry of the `BootstrapMethods` attribute: a method handle plus its
/// static arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethod {
    pub bootstrap_method: ConstantIndex,
    pub bootstrap_arguments: Vec<ConstantIndex>,
}

/// Body of the `Code` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub instructions: Vec<Instruction>,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// Start of the protected range (inclusive)
    pub start_pc: u16,

    /// End of the protected range (exclusive)
    pub end_pc: u16,

    /// Start of the handler
    pub handler_pc: u16,

    /// Class of exceptions the handler covers; absent for a `finally`
    /// handler, which catches everything
    pub catch_type: Option<ClassConstantIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnclosingMethod {
    pub class: ClassConstantIndex,

    /// Absent when the class is not enclosed by a method or constructor
    /// (a class declared in a static or instance initializer, say)
    pub method: Option<NameAndTypeConstantIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerClass {
    pub inner_class: ClassConstantIndex,

    /// Absent for local and anonymous classes
    pub outer_class: Option<ClassConstantIndex>,

    /// Absent for anonymous classes
    pub inner_name: Option<Utf8ConstantIndex>,

    pub access_flags: InnerClassAccessFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariable {
    pub start_pc: u16,
    pub length: u16,
    pub name: Utf8ConstantIndex,
    pub descriptor: Utf8ConstantIndex,
    pub index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariableType {
    pub start_pc: u16,
    pub length: u16,
    pub name: Utf8ConstantIndex,
    pub signature: Utf8ConstantIndex,
    pub index: u16,
}

/// Body of the `Module` attribute
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.25
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAttribute {
    pub module: ModuleConstantIndex,
    pub flags: ModuleFlags,
    pub version: Option<Utf8ConstantIndex>,
    pub requires: Vec<Requires>,
    pub exports: Vec<Exports>,
    pub opens: Vec<Opens>,
    pub uses: Vec<ClassConstantIndex>,
    pub provides: Vec<Provides>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requires {
    pub module: ModuleConstantIndex,
    pub flags: RequiresFlags,
    pub version: Option<Utf8ConstantIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exports {
    pub package: PackageConstantIndex,
    pub flags: ExportsFlags,
    pub to: Vec<ModuleConstantIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opens {
    pub package: PackageConstantIndex,
    pub flags: OpensFlags,
    pub to: Vec<ModuleConstantIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provides {
    pub service: ClassConstantIndex,
    pub with: Vec<ClassConstantIndex>,
}

/// Body of the JDK's `ModuleHashes` attribute
///
/// Entries keep their insertion order; the attribute round-trips only if the
/// order is preserved, so the model is a plain sequence rather than a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHashes {
    pub algorithm: Utf8ConstantIndex,
    pub hashes: Vec<ModuleHash>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHash {
    pub module: Utf8ConstantIndex,
    pub hash: Vec<u8>,
}

/// One component of the `Record` attribute, with its own attribute list
/// (`Signature` and annotations, typically)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordComponent {
    pub name: Utf8ConstantIndex,
    pub descriptor: Utf8ConstantIndex,
    pub attributes: Vec<Attribute>,
}

impl Attribute {
    /// Total serialized size: the 6-byte header plus the body
    pub(crate) fn full_length(&self) -> u32 {
        6 + self.info.internal_length()
    }
}

impl AttributeInfo {
    /// Number of body bytes the serializer will emit for this attribute,
    /// excluding the `name_index` + `attribute_length` header.
    ///
    /// The serializer writes this value into the header before emitting the
    /// body, so every formula here must agree with the corresponding
    /// emitter; a debug assertion in the writer checks that they do.
    pub fn internal_length(&self) -> u32 {
        match self {
            AttributeInfo::BootstrapMethods(methods) => {
                2 + methods
                    .iter()
                    .map(|m| 4 + 2 * m.bootstrap_arguments.len() as u32)
                    .sum::<u32>()
            }
            AttributeInfo::Code(code) => {
                let code_length: u32 = code.instructions.iter().map(Instruction::width).sum();
                let sub_attributes: u32 = code.attributes.iter().map(Attribute::full_length).sum();
                12 + code_length
                    + 8 * code.exception_table.len() as u32
                    + sub_attributes
            }
            AttributeInfo::ConstantValue(_) => 2,
            AttributeInfo::EnclosingMethod(_) => 4,
            AttributeInfo::Exceptions(entries) => 2 + 2 * entries.len() as u32,
            AttributeInfo::InnerClasses(entries) => 2 + 8 * entries.len() as u32,
            AttributeInfo::LineNumberTable(entries) => 2 + 4 * entries.len() as u32,
            AttributeInfo::LocalVariableTable(entries) => 2 + 10 * entries.len() as u32,
            AttributeInfo::LocalVariableTypeTable(entries) => 2 + 10 * entries.len() as u32,
            AttributeInfo::Module(module) => {
                let requires = 2 + 6 * module.requires.len() as u32;
                let exports = 2 + module
                    .exports
                    .iter()
                    .map(|e| 6 + 2 * e.to.len() as u32)
                    .sum::<u32>();
                let opens = 2 + module
                    .opens
                    .iter()
                    .map(|o| 6 + 2 * o.to.len() as u32)
                    .sum::<u32>();
                let uses = 2 + 2 * module.uses.len() as u32;
                let provides = 2 + module
                    .provides
                    .iter()
                    .map(|p| 4 + 2 * p.with.len() as u32)
                    .sum::<u32>();
                6 + requires + exports + opens + uses + provides
            }
            AttributeInfo::ModuleHashes(hashes) => {
                4 + hashes
                    .hashes
                    .iter()
                    .map(|h| 4 + h.hash.len() as u32)
                    .sum::<u32>()
            }
            AttributeInfo::ModulePackages(packages) => 2 + 2 * packages.len() as u32,
            AttributeInfo::ModuleTarget(_) => 2,
            AttributeInfo::NestHost(_) => 2,
            AttributeInfo::NestMembers(members) => 2 + 2 * members.len() as u32,
            AttributeInfo::PermittedSubclasses(classes) => 2 + 2 * classes.len() as u32,
            AttributeInfo::Record(components) => {
                2 + components
                    .iter()
                    .map(|c| {
                        6 + c
                            .attributes
                            .iter()
                            .map(Attribute::full_length)
                            .sum::<u32>()
                    })
                    .sum::<u32>()
            }
            AttributeInfo::Annotations(annotations) => {
                2 + annotations.iter().map(Annotation::length).sum::<u32>()
            }
            AttributeInfo::ParameterAnnotations(parameters) => {
                1 + parameters
                    .iter()
                    .map(|annotations| {
                        2 + annotations.iter().map(Annotation::length).sum::<u32>()
                    })
                    .sum::<u32>()
            }
            AttributeInfo::TypeAnnotations(annotations) => {
                2 + annotations.iter().map(TypeAnnotation::length).sum::<u32>()
            }
            AttributeInfo::AnnotationDefault(value) => value.length(),
            AttributeInfo::Signature(_) => 2,
            AttributeInfo::SourceDebugExtension(data) => data.len() as u32,
            AttributeInfo::SourceFile(_) => 2,
            AttributeInfo::StackMapTable(frames) => {
                2 + frames.iter().map(StackMapFrame::length).sum::<u32>()
            }
            AttributeInfo::Empty => 0,
            AttributeInfo::Raw(data) => data.len() as u32,
        }
    }
}
