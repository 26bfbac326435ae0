//! Cursor byte buffer over one fixed region.
//!
//! Two independently advancing cursors (`read <= write`) over a region of
//! fixed capacity. The invariant `0 <= read <= write <= capacity` holds
//! before and after every operation; violating it is a programming error,
//! not a runtime condition to recover from, so the unchecked variants guard
//! it with `debug_assert!` only.

/// A FIFO byte queue with explicit read/write cursors over a fixed region.
///
/// Used by the socket entity to stage inbound/outbound framing data. The
/// overflow predicates are pure functions of the cursors and a proposed
/// length, and are always evaluated before the bounds-checked operations.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    read: usize,
    write: usize,
}

impl ByteBuffer {
    /// Creates a buffer owning a zeroed region of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: vec![0; capacity], read: 0, write: 0 }
    }

    /// Wraps an existing region, marking its first `len` bytes as unread.
    ///
    /// The region's full length becomes the buffer capacity.
    pub fn wrap(data: Vec<u8>, len: usize) -> Self {
        debug_assert!(len <= data.len(), "wrapped length exceeds region");
        Self { data, read: 0, write: len }
    }

    /// Total capacity of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of unread bytes between the cursors.
    pub fn readable(&self) -> usize {
        self.write - self.read
    }

    /// Number of bytes that can still be appended at the write cursor.
    pub fn writable(&self) -> usize {
        self.data.len() - self.write
    }

    /// Returns true when no unread bytes remain.
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// True iff consuming `len` bytes would pass the write cursor.
    pub fn overflow_read(&self, len: usize) -> bool {
        self.read + len > self.write
    }

    /// True iff appending `len` bytes would pass the end of the region.
    pub fn overflow_write(&self, len: usize) -> bool {
        self.write + len > self.data.len()
    }

    /// Restores both cursors to the base and clears the region.
    ///
    /// Not for hot paths; `defrag` reclaims space without touching the data.
    pub fn reset(&mut self) {
        self.read = 0;
        self.write = 0;
        self.data.fill(0);
    }

    /// Reclaims the consumed prefix of the region.
    ///
    /// If nothing is unread, both cursors collapse to the base. Otherwise the
    /// unread span slides down to the base and the write cursor retreats by
    /// the same delta. The write cursor never moves behind the read cursor.
    /// Idempotent.
    pub fn defrag(&mut self) {
        let len = self.readable();
        if len == 0 {
            self.read = 0;
            self.write = 0;
            return;
        }

        if self.read == 0 {
            return;
        }
        self.data.copy_within(self.read..self.write, 0);
        self.read = 0;
        self.write = len;
    }

    /// Advances the read cursor by `offset` without copying.
    ///
    /// Returns false (no mutation) if `offset` passes the write cursor.
    pub fn seek(&mut self, offset: usize) -> bool {
        if self.overflow_read(offset) {
            return false;
        }
        self.read += offset;
        true
    }

    /// Consumes `len` bytes, returning a view of them.
    ///
    /// Returns `None` (no mutation) if fewer than `len` bytes are unread.
    pub fn read(&mut self, len: usize) -> Option<&[u8]> {
        if self.overflow_read(len) {
            return None;
        }
        let start = self.read;
        self.read += len;
        Some(&self.data[start..start + len])
    }

    /// Consumes `len` bytes without the bounds check.
    ///
    /// Callers must have already proven `!overflow_read(len)`.
    pub fn read_unchecked(&mut self, len: usize) -> &[u8] {
        debug_assert!(!self.overflow_read(len), "read past write cursor");
        let start = self.read;
        self.read += len;
        &self.data[start..start + len]
    }

    /// Appends `bytes` at the write cursor.
    ///
    /// Returns false (no mutation) if the region cannot hold them.
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        if self.overflow_write(bytes.len()) {
            return false;
        }
        self.data[self.write..self.write + bytes.len()].copy_from_slice(bytes);
        self.write += bytes.len();
        true
    }

    /// Appends `bytes` without the bounds check.
    ///
    /// Callers must have already proven `!overflow_write(bytes.len())`.
    pub fn write_unchecked(&mut self, bytes: &[u8]) {
        debug_assert!(!self.overflow_write(bytes.len()), "write past end of region");
        self.data[self.write..self.write + bytes.len()].copy_from_slice(bytes);
        self.write += bytes.len();
    }

    /// Returns the unread span without consuming it.
    pub fn peek(&self) -> &[u8] {
        &self.data[self.read..self.write]
    }

    /// Moves every unread byte into `dst`, advancing this buffer's read
    /// cursor. Returns false (no mutation anywhere) when `dst` cannot hold
    /// the span or nothing is unread.
    pub fn copy_into(&mut self, dst: &mut ByteBuffer) -> bool {
        let len = self.readable();
        if len == 0 || dst.overflow_write(len) {
            return false;
        }
        dst.write_unchecked(&self.data[self.read..self.write]);
        self.read += len;
        true
    }

    /// Copies every unread byte into `dst` without advancing this buffer's
    /// read cursor.
    pub fn peek_copy_into(&self, dst: &mut ByteBuffer) -> bool {
        let len = self.readable();
        if len == 0 || dst.overflow_write(len) {
            return false;
        }
        dst.write_unchecked(&self.data[self.read..self.write]);
        true
    }

    /// Compares the head of the unread span against `needle`.
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.peek().starts_with(needle)
    }
}
