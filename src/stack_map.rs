use crate::constants::ClassConstantIndex;
use crate::serialize::Serialize;
use byteorder::WriteBytesExt;

/// Types tracked by the bytecode verifier
///
/// On disk these are a 1-byte tag optionally followed by a payload: an
/// `Object` carries the pool index of its class and an `Uninitialized`
/// carries the bytecode offset of the `new` instruction that produced it.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.4
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum VerificationType {
    Top,
    Integer,
    Float,
    Double,
    Long,
    Null,

    /// In a constructor, the `this` parameter starts out with this type and
    /// turns into an object type once `<init>` has been called
    UninitializedThis,

    /// Object type
    Object(ClassConstantIndex),

    /// Object on which `new` has been called but `<init>` has not
    Uninitialized(u16),
}

impl VerificationType {
    /// Tag byte leading the serialized form
    pub fn tag(&self) -> u8 {
        match self {
            VerificationType::Top => 0,
            VerificationType::Integer => 1,
            VerificationType::Float => 2,
            VerificationType::Double => 3,
            VerificationType::Long => 4,
            VerificationType::Null => 5,
            VerificationType::UninitializedThis => 6,
            VerificationType::Object(_) => 7,
            VerificationType::Uninitialized(_) => 8,
        }
    }

    /// Number of bytes the serialized form occupies
    pub(crate) fn length(&self) -> u32 {
        match self {
            VerificationType::Object(_) | VerificationType::Uninitialized(_) => 3,
            _ => 1,
        }
    }
}

impl Serialize for VerificationType {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.tag().serialize(writer)?;
        match self {
            VerificationType::Object(class) => class.serialize(writer)?,
            VerificationType::Uninitialized(offset) => offset.serialize(writer)?,
            _ => {}
        };
        Ok(())
    }
}

/// One frame of a `StackMapTable` attribute
///
/// Frames are delta-encoded: all but the first describe the verifier state
/// relative to the previous frame. The on-disk variant is picked by the
/// leading `frame_type` byte. Variants whose tag encodes extra information
/// (the offset delta of a `Same` frame, the number of locals appended by an
/// `Append` frame) store the tag byte directly; the writer trusts it and
/// never normalizes, so a stored tag inconsistent with the variant's payload
/// comes back out exactly as it went in.
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.4
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackMapFrame {
    /// Same locals as the previous frame, empty stack. The tag byte is the
    /// offset delta. Tags: 0-63
    Same { frame_type: u8 },

    /// Same locals as the previous frame, one item on the stack. The offset
    /// delta is the tag byte minus 64. Tags: 64-127
    SameLocalsOneStackItem {
        frame_type: u8,
        stack: VerificationType,
    },

    /// Same locals as the previous frame, one item on the stack, explicit
    /// offset delta. Tag: 247
    SameLocalsOneStackItemExtended {
        offset_delta: u16,
        stack: VerificationType,
    },

    /// Like the previous frame but without the last `251 - frame_type`
    /// locals, empty stack. Tags: 248-250
    Chop { frame_type: u8, offset_delta: u16 },

    /// Same locals as the previous frame, empty stack, explicit offset
    /// delta. Tag: 251
    SameFrameExtended { offset_delta: u16 },

    /// Like the previous frame but with `frame_type - 251` extra locals,
    /// empty stack. Tags: 252-254
    Append {
        frame_type: u8,
        offset_delta: u16,
        locals: Vec<VerificationType>,
    },

    /// Exactly the locals and stack listed. Tag: 255
    Full {
        offset_delta: u16,
        locals: Vec<VerificationType>,
        stack: Vec<VerificationType>,
    },
}

impl StackMapFrame {
    /// The discriminator byte leading the serialized frame
    pub fn frame_type(&self) -> u8 {
        match self {
            StackMapFrame::Same { frame_type } => *frame_type,
            StackMapFrame::SameLocalsOneStackItem { frame_type, .. } => *frame_type,
            StackMapFrame::SameLocalsOneStackItemExtended { .. } => 247,
            StackMapFrame::Chop { frame_type, .. } => *frame_type,
            StackMapFrame::SameFrameExtended { .. } => 251,
            StackMapFrame::Append { frame_type, .. } => *frame_type,
            StackMapFrame::Full { .. } => 255,
        }
    }

    /// Number of bytes the serialized frame occupies
    pub(crate) fn length(&self) -> u32 {
        match self {
            StackMapFrame::Same { .. } => 1,
            StackMapFrame::SameLocalsOneStackItem { stack, .. } => 1 + stack.length(),
            StackMapFrame::SameLocalsOneStackItemExtended { stack, .. } => 3 + stack.length(),
            StackMapFrame::Chop { .. } => 3,
            StackMapFrame::SameFrameExtended { .. } => 3,
            StackMapFrame::Append { locals, .. } => {
                3 + locals.iter().map(VerificationType::length).sum::<u32>()
            }
            StackMapFrame::Full { locals, stack, .. } => {
                7 + locals.iter().map(VerificationType::length).sum::<u32>()
                    + stack.iter().map(VerificationType::length).sum::<u32>()
            }
        }
    }
}

impl Serialize for StackMapFrame {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.frame_type().serialize(writer)?;
        match self {
            StackMapFrame::Same { .. } => {}

            StackMapFrame::SameLocalsOneStackItem { stack, .. } => {
                stack.serialize(writer)?;
            }

            StackMapFrame::SameLocalsOneStackItemExtended {
                offset_delta,
                stack,
            } => {
                offset_delta.serialize(writer)?;
                stack.serialize(writer)?;
            }

            StackMapFrame::Chop { offset_delta, .. } => {
                offset_delta.serialize(writer)?;
            }

            StackMapFrame::SameFrameExtended { offset_delta } => {
                offset_delta.serialize(writer)?;
            }

            // The number of appended locals is implied by the tag, so the
            // list goes out without a count prefix
            StackMapFrame::Append {
                offset_delta,
                locals,
                ..
            } => {
                offset_delta.serialize(writer)?;
                for local in locals {
                    local.serialize(writer)?;
                }
            }

            StackMapFrame::Full {
                offset_delta,
                locals,
                stack,
            } => {
                offset_delta.serialize(writer)?;
                locals.serialize(writer)?;
                stack.serialize(writer)?;
            }
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ConstantIndex;

    fn serialized(frame: StackMapFrame) -> Vec<u8> {
        let mut bytes = vec![];
        frame.serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len() as u32, frame.length());
        bytes
    }

    #[test]
    fn verification_type_tags() {
        let mut bytes = vec![];
        VerificationType::Top.serialize(&mut bytes).unwrap();
        VerificationType::Long.serialize(&mut bytes).unwrap();
        VerificationType::Object(ClassConstantIndex(ConstantIndex(9)))
            .serialize(&mut bytes)
            .unwrap();
        VerificationType::Uninitialized(0x1234)
            .serialize(&mut bytes)
            .unwrap();
        assert_eq!(bytes, vec![0, 4, 7, 0x00, 0x09, 8, 0x12, 0x34]);
    }

    #[test]
    fn same_frame_is_just_the_tag() {
        assert_eq!(serialized(StackMapFrame::Same { frame_type: 5 }), vec![5]);
    }

    #[test]
    fn one_stack_item_frame() {
        let frame = StackMapFrame::SameLocalsOneStackItem {
            frame_type: 70,
            stack: VerificationType::Integer,
        };
        assert_eq!(serialized(frame), vec![70, 1]);
    }

    #[test]
    fn one_stack_item_extended_frame() {
        let frame = StackMapFrame::SameLocalsOneStackItemExtended {
            offset_delta: 300,
            stack: VerificationType::Null,
        };
        assert_eq!(serialized(frame), vec![247, 0x01, 0x2C, 5]);
    }

    #[test]
    fn chop_and_extended_frames_carry_the_delta() {
        let chop = StackMapFrame::Chop {
            frame_type: 249,
            offset_delta: 3,
        };
        assert_eq!(serialized(chop), vec![249, 0x00, 0x03]);

        let extended = StackMapFrame::SameFrameExtended { offset_delta: 5 };
        assert_eq!(serialized(extended), vec![251, 0x00, 0x05]);
    }

    #[test]
    fn append_frame_lists_locals_without_a_count() {
        let frame = StackMapFrame::Append {
            frame_type: 253,
            offset_delta: 7,
            locals: vec![
                VerificationType::Long,
                VerificationType::Object(ClassConstantIndex(ConstantIndex(9))),
            ],
        };
        assert_eq!(serialized(frame), vec![253, 0x00, 0x07, 4, 7, 0x00, 0x09]);
    }

    #[test]
    fn full_frame_counts_entries_not_widths() {
        let frame = StackMapFrame::Full {
            offset_delta: 8,
            locals: vec![VerificationType::Double],
            stack: vec![],
        };
        // `Double` is one entry even though it fills two local slots
        assert_eq!(
            serialized(frame),
            vec![255, 0x00, 0x08, 0x00, 0x01, 3, 0x00, 0x00]
        );
    }

    #[test]
    fn empty_full_frame() {
        let frame = StackMapFrame::Full {
            offset_delta: 0,
            locals: vec![],
            stack: vec![],
        };
        assert_eq!(
            serialized(frame),
            vec![255, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }
}
