//! Serial receive ring: one producer, one reader.
//!
//! The receive channel (UART driver callback on target, the test on host)
//! writes bytes and publishes a monotonically increasing write cursor. The
//! console task drains "everything new since last time", in producer order,
//! even when the buffer offset wraps between two drains.
//!
//! ```text
//! RX channel ──write()──▶ [ ring of N bytes ] ──drain()──▶ line assembler
//!                         write_idx (atomic)    read_idx (reader-owned)
//! ```
//!
//! # Memory Ordering
//!
//! - Producer stores the bytes, then `write_idx` with `Release`
//! - Reader loads `write_idx` with `Acquire` before touching the bytes

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::RX_RING_SIZE;

/// Fixed-capacity receive ring.
pub struct RxRing<const N: usize = RX_RING_SIZE> {
    slots: UnsafeCell<[u8; N]>,

    /// Total bytes ever written (wraps at u32, offset = idx & MASK).
    write_idx: AtomicU32,
}

// SAFETY: single producer, single reader, coordinated through `write_idx`.
// The reader never borrows ring memory; it copies with volatile reads and
// re-checks the cursor.
unsafe impl<const N: usize> Sync for RxRing<N> {}
unsafe impl<const N: usize> Send for RxRing<N> {}

impl<const N: usize> RxRing<N> {
    const MASK: usize = N - 1;

    /// Create an empty ring.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "RX ring size must be power of 2");

        Self {
            slots: UnsafeCell::new([0; N]),
            write_idx: AtomicU32::new(0),
        }
    }

    /// Append received bytes. Producer context only.
    ///
    /// Never blocks. A reader that falls more than `N` bytes behind sees an
    /// overrun on its next drain.
    pub fn write(&self, bytes: &[u8]) {
        let mut write = self.write_idx.load(Ordering::Relaxed);
        let base = self.slots.get().cast::<u8>();

        for &b in bytes {
            // SAFETY: offset is masked into bounds; single producer.
            unsafe { base.add(write as usize & Self::MASK).write(b) };
            write = write.wrapping_add(1);
        }

        self.write_idx.store(write, Ordering::Release);
    }

    /// Monotonic write cursor.
    #[inline]
    pub fn write_head(&self) -> u32 {
        self.write_idx.load(Ordering::Acquire)
    }

    /// Write cursor as a buffer offset, the way DMA hardware reports it.
    #[inline]
    pub fn write_offset(&self) -> usize {
        self.write_head() as usize & Self::MASK
    }

    /// Get the buffer capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Copy `dst.len()` bytes starting at buffer offset `start`, wrapping.
    ///
    /// The producer may be writing meanwhile, so the copy can be torn. The
    /// caller re-checks the write head afterwards to find out.
    fn copy_out(&self, start: usize, dst: &mut [u8]) {
        let base = self.slots.get().cast::<u8>().cast_const();
        for (i, d) in dst.iter_mut().enumerate() {
            // SAFETY: offset is masked into bounds.
            *d = unsafe { base.add((start + i) & Self::MASK).read_volatile() };
        }
    }
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RxDrain {
    /// Nothing new.
    Empty,
    /// This many bytes were handed to the consumer.
    Consumed(usize),
    /// The producer lapped the reader; this many bytes were skipped and the
    /// reader resynced to the write head.
    Overrun { skipped: u32 },
}

/// Reader side of an [`RxRing`]. Owns the "last consumed" cursor.
pub struct RxReader<'a, const N: usize = RX_RING_SIZE> {
    ring: &'a RxRing<N>,
    read_idx: u32,
    overrun_bytes: u32,
}

impl<'a, const N: usize> RxReader<'a, N> {
    /// Start reading at the current write head.
    pub fn new(ring: &'a RxRing<N>) -> Self {
        Self {
            ring,
            read_idx: ring.write_head(),
            overrun_bytes: 0,
        }
    }

    /// Hand every byte written since the previous drain to `consume`.
    ///
    /// Without a wrap `consume` sees one span `[last, current)`. Across a wrap
    /// it sees `[last, N)` then `[0, current)`, in that order. The spans are a
    /// private copy, so the producer may keep writing while `consume` runs.
    ///
    /// If the producer got more than `N` bytes ahead, before or during the
    /// copy, nothing is consumed: the overwritten data cannot be put back in
    /// order, so it is dropped.
    pub fn drain(&mut self, mut consume: impl FnMut(&[u8])) -> RxDrain {
        let write = self.ring.write_head();
        let lag = write.wrapping_sub(self.read_idx);

        if lag == 0 {
            return RxDrain::Empty;
        }
        if lag > N as u32 {
            return self.overrun(write);
        }

        let last = self.read_idx as usize & RxRing::<N>::MASK;
        let len = lag as usize;
        let mut copy = [0u8; N];
        self.ring.copy_out(last, &mut copy[..len]);

        // Lapped mid-copy: the oldest bytes may already be overwritten.
        let head = self.ring.write_head();
        if head.wrapping_sub(self.read_idx) > N as u32 {
            return self.overrun(head);
        }
        self.read_idx = write;

        let first = len.min(N - last);
        consume(&copy[..first]);
        if first < len {
            consume(&copy[first..len]);
        }

        RxDrain::Consumed(len)
    }

    fn overrun(&mut self, head: u32) -> RxDrain {
        let skipped = head.wrapping_sub(self.read_idx);
        self.read_idx = head;
        self.overrun_bytes = self.overrun_bytes.saturating_add(skipped);
        RxDrain::Overrun { skipped }
    }

    /// Offset of the next byte to consume.
    #[inline]
    pub fn last_offset(&self) -> usize {
        self.read_idx as usize & RxRing::<N>::MASK
    }

    /// Bytes waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        self.ring.write_head().wrapping_sub(self.read_idx)
    }

    /// Total bytes lost to overruns since boot.
    #[inline]
    pub fn overrun_bytes(&self) -> u32 {
        self.overrun_bytes
    }
}
