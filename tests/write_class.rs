use classforge::{
    names, Attribute, AttributeInfo, AttributeWriter, ClassAccessFlags, ClassFile, CodeAttribute,
    ConstantPool, Instruction, LineNumber, Method, MethodAccessFlags, Version,
};

#[test]
fn empty_class_with_source_file() {
    let mut constants = ConstantPool::new();
    let this_name = constants.get_utf8("Hello").unwrap();
    let this_class = constants.get_class(this_name).unwrap();
    let object_name = constants.get_utf8("java/lang/Object").unwrap();
    let super_class = constants.get_class(object_name).unwrap();
    let source_file_name = constants.get_utf8(names::SOURCE_FILE).unwrap();
    let source_file = constants.get_utf8("Hello.java").unwrap();

    let class_file = ClassFile {
        version: Version::JAVA8,
        constants,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class,
        super_class: Some(super_class),
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        attributes: vec![Attribute::new(
            source_file_name,
            AttributeInfo::SourceFile(source_file),
        )],
    };

    let mut bytes = vec![];
    class_file.write(&mut bytes).unwrap();

    let mut expected: Vec<u8> = vec![];
    expected.extend_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE]); // magic
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x34]); // minor, major
    expected.extend_from_slice(&[0x00, 0x07]); // constant pool count
    expected.extend_from_slice(&[0x01, 0x00, 0x05]); // 1: Utf8 "Hello"
    expected.extend_from_slice(b"Hello");
    expected.extend_from_slice(&[0x07, 0x00, 0x01]); // 2: Class
    expected.extend_from_slice(&[0x01, 0x00, 0x10]); // 3: Utf8 "java/lang/Object"
    expected.extend_from_slice(b"java/lang/Object");
    expected.extend_from_slice(&[0x07, 0x00, 0x03]); // 4: Class
    expected.extend_from_slice(&[0x01, 0x00, 0x0A]); // 5: Utf8 "SourceFile"
    expected.extend_from_slice(b"SourceFile");
    expected.extend_from_slice(&[0x01, 0x00, 0x0A]); // 6: Utf8 "Hello.java"
    expected.extend_from_slice(b"Hello.java");
    expected.extend_from_slice(&[0x00, 0x21]); // access flags
    expected.extend_from_slice(&[0x00, 0x02, 0x00, 0x04]); // this, super
    expected.extend_from_slice(&[0x00, 0x00]); // interfaces
    expected.extend_from_slice(&[0x00, 0x00]); // fields
    expected.extend_from_slice(&[0x00, 0x00]); // methods
    expected.extend_from_slice(&[0x00, 0x01]); // attribute count
    expected.extend_from_slice(&[0x00, 0x05, 0x00, 0x00, 0x00, 0x02, 0x00, 0x06]); // SourceFile

    assert_eq!(bytes, expected);
}

#[test]
fn method_bodies_embed_serialized_attributes() {
    let mut constants = ConstantPool::new();
    let this_name = constants.get_utf8("Main").unwrap();
    let this_class = constants.get_class(this_name).unwrap();
    let object_name = constants.get_utf8("java/lang/Object").unwrap();
    let super_class = constants.get_class(object_name).unwrap();
    let method_name = constants.get_utf8("answer").unwrap();
    let method_descriptor = constants.get_utf8("()I").unwrap();
    let code_name = constants.get_utf8(names::CODE).unwrap();
    let line_numbers_name = constants.get_utf8(names::LINE_NUMBER_TABLE).unwrap();

    let code = Attribute::new(
        code_name,
        AttributeInfo::Code(CodeAttribute {
            max_stack: 1,
            max_locals: 1,
            // bipush 42, ireturn
            instructions: vec![
                Instruction::with_operands(0x10, vec![42]),
                Instruction::new(0xAC),
            ],
            exception_table: vec![],
            attributes: vec![Attribute::new(
                line_numbers_name,
                AttributeInfo::LineNumberTable(vec![LineNumber {
                    start_pc: 0,
                    line: 3,
                }]),
            )],
        }),
    );

    let class_file = ClassFile {
        version: Version::JAVA17,
        constants,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class,
        super_class: Some(super_class),
        interfaces: vec![],
        fields: vec![],
        methods: vec![Method {
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
            name: method_name,
            descriptor: method_descriptor,
            attributes: vec![code.clone()],
        }],
        attributes: vec![],
    };

    let mut bytes = vec![];
    class_file.write(&mut bytes).unwrap();

    // The method's attribute list ends the file (bar the empty class
    // attribute list), and must hold exactly the dispatcher's output
    let code_bytes = AttributeWriter::new().write_attribute(&code).unwrap();
    let mut tail = code_bytes.clone();
    tail.extend_from_slice(&[0x00, 0x00]);
    assert!(bytes.ends_with(&tail));

    // The header length field frames the body exactly
    let length = u32::from_be_bytes([code_bytes[2], code_bytes[3], code_bytes[4], code_bytes[5]]);
    assert_eq!(code_bytes.len() as u32, 6 + length);
}
