use crate::serialize::Serialize;
use byteorder::WriteBytesExt;
use std::io::Result;

/// Class file format version.
///
/// The pair sits right after the magic number and is the first thing a JVM
/// checks; a file whose major number is newer than the JVM understands is
/// rejected outright. The constants below name the majors of the
/// long-term-support releases.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    /// Java SE 8
    pub const JAVA8: Version = Version::of(52);

    /// Java SE 11
    pub const JAVA11: Version = Version::of(55);

    /// Java SE 17
    pub const JAVA17: Version = Version::of(61);

    /// Java SE 21
    pub const JAVA21: Version = Version::of(65);

    /// Version with the given major number and a zero minor
    pub const fn of(major: u16) -> Version {
        Version { major, minor: 0 }
    }
}

impl Serialize for Version {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        // The minor half is stored first
        self.minor.serialize(writer)?;
        self.major.serialize(writer)
    }
}
