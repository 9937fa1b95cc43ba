//! L4 Atomic Layer: The scrollable view as seen by the engine

/// Vertical scroll position of a view, in the same units as velocity.
///
/// The engine never passes a negative offset. Clamping against the content
/// length is the surface's job.
pub trait ScrollSurface {
    fn offset(&self) -> i64;

    fn set_offset(&mut self, offset: i64);
}

/// Plain in-memory offset without an upper bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySurface {
    pub offset: i64,
}

impl MemorySurface {
    pub fn at(offset: i64) -> Self {
        Self { offset }
    }
}

impl ScrollSurface for MemorySurface {
    #[inline]
    fn offset(&self) -> i64 {
        self.offset
    }

    #[inline]
    fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }
}
