use crate::errors::Error;
use crate::serialize::Serialize;
use byteorder::WriteBytesExt;
use std::borrow::{Borrow, Cow};
use std::collections::HashMap;

/// Index of an entry in the constant pool.
///
/// Valid indices start at 1. Index 0 never refers to an entry; optional
/// pool references are modelled as `Option<...>` and collapse to 0 only at
/// serialization time (see [`or_zero`]).
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ConstantIndex(pub u16);

/// Index known to refer to a `CONSTANT_Utf8_info` entry
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Utf8ConstantIndex(pub ConstantIndex);

/// Index known to refer to a `CONSTANT_Class_info` entry
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ClassConstantIndex(pub ConstantIndex);

/// Index known to refer to a `CONSTANT_String_info` entry
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct StringConstantIndex(pub ConstantIndex);

/// Index known to refer to a `CONSTANT_NameAndType_info` entry
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct NameAndTypeConstantIndex(pub ConstantIndex);

/// Index known to refer to a `CONSTANT_Module_info` entry
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ModuleConstantIndex(pub ConstantIndex);

/// Index known to refer to a `CONSTANT_Package_info` entry
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct PackageConstantIndex(pub ConstantIndex);

impl From<Utf8ConstantIndex> for ConstantIndex {
    fn from(index: Utf8ConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<ClassConstantIndex> for ConstantIndex {
    fn from(index: ClassConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<StringConstantIndex> for ConstantIndex {
    fn from(index: StringConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<NameAndTypeConstantIndex> for ConstantIndex {
    fn from(index: NameAndTypeConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<ModuleConstantIndex> for ConstantIndex {
    fn from(index: ModuleConstantIndex) -> ConstantIndex {
        index.0
    }
}
impl From<PackageConstantIndex> for ConstantIndex {
    fn from(index: PackageConstantIndex) -> ConstantIndex {
        index.0
    }
}

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for Utf8ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for ClassConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for StringConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for NameAndTypeConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for ModuleConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}
impl Serialize for PackageConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

/// Pool index of an optional entry, with 0 standing in for "no entry".
///
/// The class file format reserves index 0 for exactly this purpose: fields
/// like `catch_type` or the outer class of an `InnerClasses` entry use it to
/// mean the slot is empty.
pub fn or_zero<I: Into<ConstantIndex>>(entry: Option<I>) -> ConstantIndex {
    match entry {
        Some(index) => index.into(),
        None => ConstantIndex(0),
    }
}

/// Entries of the constant pool
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone)]
pub enum Constant {
    /// Class or an interface
    Class(Utf8ConstantIndex),

    /// Field
    FieldRef(ClassConstantIndex, NameAndTypeConstantIndex),

    /// Method (this combines `Methodref` and `InterfaceMethodref`)
    MethodRef {
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    },

    /// Constant object of type `java.lang.String`
    String(Utf8ConstantIndex),

    /// Constant primitive of type `int`
    Integer(i32),

    /// Constant primitive of type `float`
    Float(f32),

    /// Constant primitive of type `long`
    Long(i64),

    /// Constant primitive of type `double`
    Double(f64),

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    },

    /// Constant raw string value
    ///
    /// Despite the name, the encoding is not quite UTF-8: the null character
    /// and supplementary characters are encoded differently (see
    /// [`encode_modified_utf8`]).
    Utf8(String),

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle {
        handle_kind: HandleKind,

        /// Depending on the handle kind, this points to different things:
        ///
        ///   - `FieldRef` for `GetField`, `GetStatic`, `PutField`, `PutStatic`
        ///   - `MethodRef` for the rest
        member: ConstantIndex,
    },

    /// Method type
    MethodType { descriptor: Utf8ConstantIndex },

    /// Dynamically-computed constant
    Dynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        name_and_type: NameAndTypeConstantIndex,
    },

    /// Dynamically-computed call site
    InvokeDynamic {
        /// Index into the `BootstrapMethods` attribute
        bootstrap_method: u16,
        method_descriptor: NameAndTypeConstantIndex,
    },

    /// Module (only valid in class files with the `MODULE` access flag)
    Module(Utf8ConstantIndex),

    /// Package exported or opened by a module
    Package(Utf8ConstantIndex),
}

impl Constant {
    /// Number of pool slots the entry occupies. Quoting the JVM
    /// specification:
    ///
    /// > All 8-byte constants take up two entries in the constant_pool table
    /// > of the class file. [...] In retrospect, making 8-byte constants take
    /// > two constant pool entries was a poor choice.
    fn width(&self) -> u16 {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(string) => {
                1u8.serialize(writer)?;
                let buffer: Vec<u8> = encode_modified_utf8(string);
                (buffer.len() as u16).serialize(writer)?;
                writer.write_all(&buffer)?;
            }
            Constant::Integer(integer) => {
                3u8.serialize(writer)?;
                integer.serialize(writer)?;
            }
            Constant::Float(float) => {
                4u8.serialize(writer)?;
                float.serialize(writer)?;
            }
            Constant::Long(long) => {
                5u8.serialize(writer)?;
                long.serialize(writer)?;
            }
            Constant::Double(double) => {
                6u8.serialize(writer)?;
                double.serialize(writer)?;
            }
            Constant::Class(name) => {
                7u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::String(utf8) => {
                8u8.serialize(writer)?;
                utf8.serialize(writer)?;
            }
            Constant::FieldRef(class, name_and_type) => {
                9u8.serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => {
                (if *is_interface { 11u8 } else { 10u8 }).serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::NameAndType { name, descriptor } => {
                12u8.serialize(writer)?;
                name.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::MethodHandle {
                handle_kind,
                member,
            } => {
                15u8.serialize(writer)?;
                handle_kind.serialize(writer)?;
                member.serialize(writer)?;
            }
            Constant::MethodType { descriptor } => {
                16u8.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::Dynamic {
                bootstrap_method,
                name_and_type,
            } => {
                17u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            } => {
                18u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                method_descriptor.serialize(writer)?;
            }
            Constant::Module(name) => {
                19u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::Package(name) => {
                20u8.serialize(writer)?;
                name.serialize(writer)?;
            }
        };
        Ok(())
    }
}

/// Type of method handle
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4.8
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum HandleKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl Serialize for HandleKind {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let byte: u8 = match self {
            HandleKind::GetField => 1,
            HandleKind::GetStatic => 2,
            HandleKind::PutField => 3,
            HandleKind::PutStatic => 4,
            HandleKind::InvokeVirtual => 5,
            HandleKind::InvokeStatic => 6,
            HandleKind::InvokeSpecial => 7,
            HandleKind::NewInvokeSpecial => 8,
            HandleKind::InvokeInterface => 9,
        };
        byte.serialize(writer)
    }
}

/// Constant pool builder
///
/// The pool is append only. Every `get_*` method hands back the index of an
/// existing equal entry when there is one, so callers never create
/// duplicates. Indexing starts at 1 and `Long`/`Double` entries burn two
/// slots.
#[derive(Debug)]
pub struct ConstantPool {
    constants: Vec<Constant>,
    next_index: u16,

    utf8s: HashMap<String, Utf8ConstantIndex>,
    classes: HashMap<Utf8ConstantIndex, ClassConstantIndex>,
    strings: HashMap<Utf8ConstantIndex, StringConstantIndex>,
    integers: HashMap<i32, ConstantIndex>,
    floats: HashMap<u32, ConstantIndex>,
    longs: HashMap<i64, ConstantIndex>,
    doubles: HashMap<u64, ConstantIndex>,
    name_and_types: HashMap<(Utf8ConstantIndex, Utf8ConstantIndex), NameAndTypeConstantIndex>,
    modules: HashMap<Utf8ConstantIndex, ModuleConstantIndex>,
    packages: HashMap<Utf8ConstantIndex, PackageConstantIndex>,
    method_handles: HashMap<(HandleKind, ConstantIndex), ConstantIndex>,
    method_types: HashMap<Utf8ConstantIndex, ConstantIndex>,
    dynamics: HashMap<(u16, NameAndTypeConstantIndex), ConstantIndex>,
    invoke_dynamics: HashMap<(u16, NameAndTypeConstantIndex), ConstantIndex>,
}

impl ConstantPool {
    /// Make a fresh empty constant pool
    pub fn new() -> ConstantPool {
        ConstantPool {
            constants: Vec::new(),
            next_index: 1,
            utf8s: HashMap::new(),
            classes: HashMap::new(),
            strings: HashMap::new(),
            integers: HashMap::new(),
            floats: HashMap::new(),
            longs: HashMap::new(),
            doubles: HashMap::new(),
            name_and_types: HashMap::new(),
            modules: HashMap::new(),
            packages: HashMap::new(),
            method_handles: HashMap::new(),
            method_types: HashMap::new(),
            dynamics: HashMap::new(),
            invoke_dynamics: HashMap::new(),
        }
    }

    /// Number of slots occupied so far, plus one (the value the class file
    /// header records as `constant_pool_count`)
    pub fn count(&self) -> u16 {
        self.next_index
    }

    /// Push a constant into the pool, provided there is space for it
    ///
    /// The largest valid index is 65535 and some constants take two slots.
    fn push_constant(&mut self, constant: Constant) -> Result<ConstantIndex, Error> {
        let offset = self.next_index;
        match offset.checked_add(constant.width()) {
            Some(next) => {
                self.constants.push(constant);
                self.next_index = next;
                Ok(ConstantIndex(offset))
            }
            None => Err(Error::ConstantPoolOverflow { constant, offset }),
        }
    }

    /// Get or insert a utf8 constant
    pub fn get_utf8<'a, S: Into<Cow<'a, str>>>(
        &mut self,
        utf8: S,
    ) -> Result<Utf8ConstantIndex, Error> {
        let cow = utf8.into();
        if let Some(idx) = self.utf8s.get::<str>(cow.borrow()) {
            Ok(*idx)
        } else {
            let owned = cow.into_owned();
            let constant = Constant::Utf8(owned.clone());
            let idx = Utf8ConstantIndex(self.push_constant(constant)?);
            self.utf8s.insert(owned, idx);
            Ok(idx)
        }
    }

    /// Get or insert a class constant
    pub fn get_class(&mut self, name: Utf8ConstantIndex) -> Result<ClassConstantIndex, Error> {
        if let Some(idx) = self.classes.get(&name) {
            Ok(*idx)
        } else {
            let idx = ClassConstantIndex(self.push_constant(Constant::Class(name))?);
            self.classes.insert(name, idx);
            Ok(idx)
        }
    }

    /// Get or insert a string constant
    pub fn get_string(&mut self, utf8: Utf8ConstantIndex) -> Result<StringConstantIndex, Error> {
        if let Some(idx) = self.strings.get(&utf8) {
            Ok(*idx)
        } else {
            let idx = StringConstantIndex(self.push_constant(Constant::String(utf8))?);
            self.strings.insert(utf8, idx);
            Ok(idx)
        }
    }

    /// Get or insert an `int` constant
    pub fn get_integer(&mut self, value: i32) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.integers.get(&value) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Integer(value))?;
            self.integers.insert(value, idx);
            Ok(idx)
        }
    }

    /// Get or insert a `float` constant (keyed on the bit pattern, so `NaN`
    /// payloads and signed zeros stay distinct)
    pub fn get_float(&mut self, value: f32) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.floats.get(&value.to_bits()) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Float(value))?;
            self.floats.insert(value.to_bits(), idx);
            Ok(idx)
        }
    }

    /// Get or insert a `long` constant
    pub fn get_long(&mut self, value: i64) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.longs.get(&value) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Long(value))?;
            self.longs.insert(value, idx);
            Ok(idx)
        }
    }

    /// Get or insert a `double` constant (keyed on the bit pattern)
    pub fn get_double(&mut self, value: f64) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.doubles.get(&value.to_bits()) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::Double(value))?;
            self.doubles.insert(value.to_bits(), idx);
            Ok(idx)
        }
    }

    /// Get or insert a name & type constant
    pub fn get_name_and_type(
        &mut self,
        name: Utf8ConstantIndex,
        descriptor: Utf8ConstantIndex,
    ) -> Result<NameAndTypeConstantIndex, Error> {
        let key = (name, descriptor);
        if let Some(idx) = self.name_and_types.get(&key) {
            Ok(*idx)
        } else {
            let constant = Constant::NameAndType { name, descriptor };
            let idx = NameAndTypeConstantIndex(self.push_constant(constant)?);
            self.name_and_types.insert(key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a field reference constant
    pub fn get_field_ref(
        &mut self,
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
    ) -> Result<ConstantIndex, Error> {
        // Field refs are rare enough per class that a lookup table isn't kept
        self.push_constant(Constant::FieldRef(class, name_and_type))
    }

    /// Get or insert a method reference constant
    pub fn get_method_ref(
        &mut self,
        class: ClassConstantIndex,
        name_and_type: NameAndTypeConstantIndex,
        is_interface: bool,
    ) -> Result<ConstantIndex, Error> {
        self.push_constant(Constant::MethodRef {
            class,
            name_and_type,
            is_interface,
        })
    }

    /// Get or insert a module constant
    pub fn get_module(&mut self, name: Utf8ConstantIndex) -> Result<ModuleConstantIndex, Error> {
        if let Some(idx) = self.modules.get(&name) {
            Ok(*idx)
        } else {
            let idx = ModuleConstantIndex(self.push_constant(Constant::Module(name))?);
            self.modules.insert(name, idx);
            Ok(idx)
        }
    }

    /// Get or insert a package constant
    pub fn get_package(&mut self, name: Utf8ConstantIndex) -> Result<PackageConstantIndex, Error> {
        if let Some(idx) = self.packages.get(&name) {
            Ok(*idx)
        } else {
            let idx = PackageConstantIndex(self.push_constant(Constant::Package(name))?);
            self.packages.insert(name, idx);
            Ok(idx)
        }
    }

    /// Get or insert a method handle constant
    pub fn get_method_handle(
        &mut self,
        handle_kind: HandleKind,
        member: ConstantIndex,
    ) -> Result<ConstantIndex, Error> {
        let key = (handle_kind, member);
        if let Some(idx) = self.method_handles.get(&key) {
            Ok(*idx)
        } else {
            let constant = Constant::MethodHandle {
                handle_kind,
                member,
            };
            let idx = self.push_constant(constant)?;
            self.method_handles.insert(key, idx);
            Ok(idx)
        }
    }

    /// Get or insert a method type constant
    pub fn get_method_type(&mut self, descriptor: Utf8ConstantIndex) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.method_types.get(&descriptor) {
            Ok(*idx)
        } else {
            let idx = self.push_constant(Constant::MethodType { descriptor })?;
            self.method_types.insert(descriptor, idx);
            Ok(idx)
        }
    }

    /// Get or insert a dynamically-computed constant
    pub fn get_dynamic(
        &mut self,
        bootstrap_method: u16,
        name_and_type: NameAndTypeConstantIndex,
    ) -> Result<ConstantIndex, Error> {
        let key = (bootstrap_method, name_and_type);
        if let Some(idx) = self.dynamics.get(&key) {
            Ok(*idx)
        } else {
            let constant = Constant::Dynamic {
                bootstrap_method,
                name_and_type,
            };
            let idx = self.push_constant(constant)?;
            self.dynamics.insert(key, idx);
            Ok(idx)
        }
    }

    /// Get or insert an invoke dynamic constant
    pub fn get_invoke_dynamic(
        &mut self,
        bootstrap_method: u16,
        method_descriptor: NameAndTypeConstantIndex,
    ) -> Result<ConstantIndex, Error> {
        let key = (bootstrap_method, method_descriptor);
        if let Some(idx) = self.invoke_dynamics.get(&key) {
            Ok(*idx)
        } else {
            let constant = Constant::InvokeDynamic {
                bootstrap_method,
                method_descriptor,
            };
            let idx = self.push_constant(constant)?;
            self.invoke_dynamics.insert(key, idx);
            Ok(idx)
        }
    }
}

impl Default for ConstantPool {
    fn default() -> ConstantPool {
        ConstantPool::new()
    }
}

impl Serialize for ConstantPool {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.next_index.serialize(writer)?;
        for constant in &self.constants {
            constant.serialize(writer)?;
        }
        Ok(())
    }
}

/// Modified UTF-8 format used for `CONSTANT_Utf8_info` payloads.
///
/// See [the `DataInput` documentation][0]. The differences from standard
/// UTF-8: the null character is encoded in the 2-byte form (so encoded
/// strings never contain a raw null byte), only the 1-, 2- and 3-byte forms
/// are used, and supplementary characters are encoded as surrogate pairs.
///
/// [0]: https://docs.oracle.com/en/java/javase/21/docs/api/java.base/java/io/DataInput.html#modified-utf-8
pub fn encode_modified_utf8(string: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = vec![];
    for c in string.chars() {
        // The null character gets the 2-byte form despite fitting in 1 byte
        let len: usize = if c == '\u{0000}' { 2 } else { c.len_utf8() };
        let code: u32 = c as u32;

        match len {
            1 => buffer.push(code as u8),
            2 => {
                buffer.push((code >> 6 & 0x1F) as u8 | 0b1100_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
            3 => {
                buffer.push((code >> 12 & 0x0F) as u8 | 0b1110_0000);
                buffer.push((code >> 6 & 0x3F) as u8 | 0b1000_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }

            // Supplementary characters become surrogate pairs
            _ => {
                buffer.push(0b1110_1101);
                buffer.push(((code >> 16 & 0x0F) as u8).wrapping_sub(1) & 0x0F | 0b1010_0000);
                buffer.push((code >> 10 & 0x3F) as u8 | 0b1000_0000);

                buffer.push(0b1110_1101);
                buffer.push(((code >> 6 & 0x1F) as u8) | 0b1011_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
        }
    }
    buffer
}

#[cfg(test)]
mod encode_modified_utf8_tests {
    use super::*;

    #[test]
    fn ascii_stays_ascii() {
        assert_eq!(encode_modified_utf8("Code"), vec![67, 111, 100, 101]);
        assert_eq!(
            encode_modified_utf8("java/lang/Object"),
            b"java/lang/Object".to_vec()
        );
    }

    #[test]
    fn null_character_uses_two_bytes() {
        assert_eq!(encode_modified_utf8("a\u{0000}b"), vec![0x61, 0xC0, 0x80, 0x62]);
    }

    #[test]
    fn two_and_three_byte_forms() {
        // U+041A U+043B U+0430 U+0441 U+0441 ("Класс")
        assert_eq!(
            encode_modified_utf8("Класс"),
            vec![0xD0, 0x9A, 0xD0, 0xBB, 0xD0, 0xB0, 0xD1, 0x81, 0xD1, 0x81]
        );
        // U+2260 (not equal to)
        assert_eq!(encode_modified_utf8("\u{2260}"), vec![0xE2, 0x89, 0xA0]);
    }

    #[test]
    fn supplementary_characters_become_surrogate_pairs() {
        // U+1F600 corresponds to the pair D83D DE00
        assert_eq!(
            encode_modified_utf8("\u{1F600}"),
            vec![0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]
        );
    }
}

#[cfg(test)]
mod constant_pool_tests {
    use super::*;

    #[test]
    fn utf8_entries_are_deduplicated() {
        let mut pool = ConstantPool::new();
        let first = pool.get_utf8("Code").unwrap();
        let second = pool.get_utf8("Code").unwrap();
        assert_eq!(first, second);
        assert_eq!(pool.count(), 2);
    }

    #[test]
    fn eight_byte_constants_take_two_slots() {
        let mut pool = ConstantPool::new();
        let long = pool.get_long(42).unwrap();
        let after = pool.get_integer(7).unwrap();
        assert_eq!(long, ConstantIndex(1));
        assert_eq!(after, ConstantIndex(3));
        assert_eq!(pool.count(), 4);
    }

    #[test]
    fn serialized_pool_starts_with_count() {
        let mut pool = ConstantPool::new();
        pool.get_utf8("A").unwrap();

        let mut bytes = vec![];
        pool.serialize(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0x00, 0x02, 0x01, 0x00, 0x01, 0x41]);
    }

    #[test]
    fn or_zero_collapses_missing_entries() {
        let some = Some(ClassConstantIndex(ConstantIndex(9)));
        assert_eq!(or_zero(some), ConstantIndex(9));
        assert_eq!(or_zero(None::<ClassConstantIndex>), ConstantIndex(0));
    }
}
