use std::fmt::{Display, Formatter};

/// A `segment:offset` pair as the 8086 forms it before the bus sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address {
    pub segment: u16,
    pub offset: u16,
}

impl Address {
    pub fn new(segment: u16, offset: u16) -> Self {
        Self { segment, offset }
    }

    /// `segment * 16 + offset`.  Not masked, so the top of the address space yields up to 21
    /// bits.
    pub fn flat(&self) -> u32 {
        (u32::from(self.segment) << 4) + u32::from(self.offset)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04X}:{:04X}", self.segment, self.offset)
    }
}
