use crate::annotation::AnnotationWriter;
use crate::attribute::{Attribute, AttributeInfo};
use crate::constants::or_zero;
use crate::instruction::{FallbackInstructionWriter, InstructionWriter};
use crate::serialize::Serialize;
use log::trace;
use std::io::{Result, Write};

/// Serializer for attributes.
///
/// One call to [`write_attribute`](AttributeWriter::write_attribute) yields
/// the complete on-disk form of one attribute: the `name_index` and
/// `attribute_length` header followed by the body laid out for that kind.
/// `Code` and `Record` bodies contain whole attributes of their own, which
/// the writer handles by calling itself and splicing the finished bytes into
/// the enclosing body.
///
/// Annotation trees are streamed through [`AnnotationWriter`] and method
/// bodies through the configured [`InstructionWriter`]; everything else is
/// emitted inline.
pub struct AttributeWriter<I = FallbackInstructionWriter> {
    instruction_writer: I,
}

impl AttributeWriter<FallbackInstructionWriter> {
    /// An attribute writer whose `Code` bodies are encoded by
    /// [`FallbackInstructionWriter`]
    pub fn new() -> AttributeWriter<FallbackInstructionWriter> {
        AttributeWriter::with_instruction_writer(FallbackInstructionWriter)
    }
}

impl Default for AttributeWriter<FallbackInstructionWriter> {
    fn default() -> AttributeWriter<FallbackInstructionWriter> {
        AttributeWriter::new()
    }
}

impl<I: InstructionWriter> AttributeWriter<I> {
    pub fn with_instruction_writer(instruction_writer: I) -> AttributeWriter<I> {
        AttributeWriter { instruction_writer }
    }

    /// Write one attribute to a fresh buffer.
    ///
    /// The header's length field is the model's own length computation; a
    /// disagreement between that and the bytes the body emitter actually
    /// produced means the model is broken, and trips an assertion in debug
    /// builds. In-memory buffers never fail, so the `Err` case only
    /// surfaces when a custom instruction writer does.
    pub fn write_attribute(&mut self, attribute: &Attribute) -> Result<Vec<u8>> {
        let mut out = Vec::new();

        // Unrecognized attributes carry their body verbatim
        if let AttributeInfo::Raw(data) = &attribute.info {
            trace!("writing raw attribute (name_index {})", attribute.name.0 .0);
            attribute.name.serialize(&mut out)?;
            (data.len() as u32).serialize(&mut out)?;
            out.write_all(data)?;
            return Ok(out);
        }

        trace!("writing attribute (name_index {})", attribute.name.0 .0);
        let internal_length = attribute.info.internal_length();
        attribute.name.serialize(&mut out)?;
        internal_length.serialize(&mut out)?;
        self.write_body(&attribute.info, &mut out)?;
        debug_assert_eq!(
            out.len(),
            6 + internal_length as usize,
            "attribute body length disagrees with its length computation"
        );
        Ok(out)
    }

    fn write_body(&mut self, info: &AttributeInfo, out: &mut Vec<u8>) -> Result<()> {
        match info {
            AttributeInfo::BootstrapMethods(methods) => {
                (methods.len() as u16).serialize(out)?;
                for method in methods {
                    method.bootstrap_method.serialize(out)?;
                    (method.bootstrap_arguments.len() as u16).serialize(out)?;
                    for argument in &method.bootstrap_arguments {
                        argument.serialize(out)?;
                    }
                }
            }

            AttributeInfo::Code(code) => {
                code.max_stack.serialize(out)?;
                code.max_locals.serialize(out)?;
                let code_bytes = self.instruction_writer.write_code(&code.instructions)?;
                (code_bytes.len() as u32).serialize(out)?;
                out.write_all(&code_bytes)?;
                (code.exception_table.len() as u16).serialize(out)?;
                for handler in &code.exception_table {
                    handler.start_pc.serialize(out)?;
                    handler.end_pc.serialize(out)?;
                    handler.handler_pc.serialize(out)?;
                    or_zero(handler.catch_type).serialize(out)?;
                }
                (code.attributes.len() as u16).serialize(out)?;
                for sub_attribute in &code.attributes {
                    let bytes = self.write_attribute(sub_attribute)?;
                    out.write_all(&bytes)?;
                }
            }

            AttributeInfo::ConstantValue(value) => {
                value.serialize(out)?;
            }

            AttributeInfo::EnclosingMethod(enclosing) => {
                enclosing.class.serialize(out)?;
                or_zero(enclosing.method).serialize(out)?;
            }

            AttributeInfo::Exceptions(entries) => {
                (entries.len() as u16).serialize(out)?;
                for class in entries {
                    class.serialize(out)?;
                }
            }

            AttributeInfo::InnerClasses(entries) => {
                (entries.len() as u16).serialize(out)?;
                for entry in entries {
                    entry.inner_class.serialize(out)?;
                    or_zero(entry.outer_class).serialize(out)?;
                    or_zero(entry.inner_name).serialize(out)?;
                    entry.access_flags.serialize(out)?;
                }
            }

            AttributeInfo::LineNumberTable(entries) => {
                (entries.len() as u16).serialize(out)?;
                for entry in entries {
                    entry.start_pc.serialize(out)?;
                    entry.line.serialize(out)?;
                }
            }

            AttributeInfo::LocalVariableTable(entries) => {
                (entries.len() as u16).serialize(out)?;
                for entry in entries {
                    entry.start_pc.serialize(out)?;
                    entry.length.serialize(out)?;
                    entry.name.serialize(out)?;
                    entry.descriptor.serialize(out)?;
                    entry.index.serialize(out)?;
                }
            }

            AttributeInfo::LocalVariableTypeTable(entries) => {
                (entries.len() as u16).serialize(out)?;
                for entry in entries {
                    entry.start_pc.serialize(out)?;
                    entry.length.serialize(out)?;
                    entry.name.serialize(out)?;
                    entry.signature.serialize(out)?;
                    entry.index.serialize(out)?;
                }
            }

            AttributeInfo::Module(module) => {
                module.module.serialize(out)?;
                module.flags.serialize(out)?;
                or_zero(module.version).serialize(out)?;
                // requires
                (module.requires.len() as u16).serialize(out)?;
                for requires in &module.requires {
                    requires.module.serialize(out)?;
                    requires.flags.serialize(out)?;
                    or_zero(requires.version).serialize(out)?;
                }
                // exports
                (module.exports.len() as u16).serialize(out)?;
                for exports in &module.exports {
                    exports.package.serialize(out)?;
                    exports.flags.serialize(out)?;
                    (exports.to.len() as u16).serialize(out)?;
                    for to in &exports.to {
                        to.serialize(out)?;
                    }
                }
                // opens
                (module.opens.len() as u16).serialize(out)?;
                for opens in &module.opens {
                    opens.package.serialize(out)?;
                    opens.flags.serialize(out)?;
                    (opens.to.len() as u16).serialize(out)?;
                    for to in &opens.to {
                        to.serialize(out)?;
                    }
                }
                // uses
                (module.uses.len() as u16).serialize(out)?;
                for service in &module.uses {
                    service.serialize(out)?;
                }
                // provides
                (module.provides.len() as u16).serialize(out)?;
                for provides in &module.provides {
                    provides.service.serialize(out)?;
                    (provides.with.len() as u16).serialize(out)?;
                    for implementation in &provides.with {
                        implementation.serialize(out)?;
                    }
                }
            }

            AttributeInfo::ModuleHashes(hashes) => {
                hashes.algorithm.serialize(out)?;
                (hashes.hashes.len() as u16).serialize(out)?;
                for entry in &hashes.hashes {
                    entry.module.serialize(out)?;
                    (entry.hash.len() as u16).serialize(out)?;
                    out.write_all(&entry.hash)?;
                }
            }

            AttributeInfo::ModulePackages(packages) => {
                (packages.len() as u16).serialize(out)?;
                for package in packages {
                    package.serialize(out)?;
                }
            }

            AttributeInfo::ModuleTarget(platform) => {
                platform.serialize(out)?;
            }

            AttributeInfo::NestHost(host) => {
                host.serialize(out)?;
            }

            AttributeInfo::NestMembers(members) => {
                (members.len() as u16).serialize(out)?;
                for member in members {
                    member.serialize(out)?;
                }
            }

            AttributeInfo::PermittedSubclasses(classes) => {
                (classes.len() as u16).serialize(out)?;
                for class in classes {
                    class.serialize(out)?;
                }
            }

            AttributeInfo::Record(components) => {
                (components.len() as u16).serialize(out)?;
                for component in components {
                    component.name.serialize(out)?;
                    component.descriptor.serialize(out)?;
                    (component.attributes.len() as u16).serialize(out)?;
                    for sub_attribute in &component.attributes {
                        let bytes = self.write_attribute(sub_attribute)?;
                        out.write_all(&bytes)?;
                    }
                }
            }

            AttributeInfo::Annotations(annotations) => {
                AnnotationWriter::new(out).write_annotations(annotations)?;
            }

            AttributeInfo::ParameterAnnotations(parameters) => {
                AnnotationWriter::new(out).write_parameter_annotations(parameters)?;
            }

            AttributeInfo::TypeAnnotations(annotations) => {
                AnnotationWriter::new(out).write_type_annotations(annotations)?;
            }

            AttributeInfo::AnnotationDefault(value) => {
                AnnotationWriter::new(out).write_annotation_default(value)?;
            }

            AttributeInfo::Signature(signature) => {
                signature.serialize(out)?;
            }

            // The attribute length already frames the payload, so the raw
            // bytes go out with no inner length field
            AttributeInfo::SourceDebugExtension(data) => {
                out.write_all(data)?;
            }

            AttributeInfo::SourceFile(filename) => {
                filename.serialize(out)?;
            }

            AttributeInfo::StackMapTable(frames) => {
                frames.serialize(out)?;
            }

            AttributeInfo::Empty => {}

            // Framed entirely in write_attribute
            AttributeInfo::Raw(_) => unreachable!("raw attributes never reach the body emitter"),
        };
        Ok(())
    }
}
