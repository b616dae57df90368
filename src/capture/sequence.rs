//! Ordered keyframe storage with O(1) interior removal.
//!
//! Frames live in a flat arena; each slot links to its neighbours by index.
//! Removing a frame relinks its neighbours and tombstones the slot, so
//! handles to the remaining frames stay valid for the whole sweep.

use super::KeyFrame;

/// Handle to a frame stored in a [`CaptureSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

impl FrameId {
    /// Arena slot index (equals the frame's input position).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Slot {
    frame: KeyFrame,
    prev: Option<usize>,
    next: Option<usize>,
    removed: bool,
}

/// Doubly linked sequence of keyframes in capture order.
#[derive(Clone, Debug, Default)]
pub struct CaptureSequence {
    slots: Vec<Slot>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl CaptureSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sequence with room for `capacity` frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), ..Self::default() }
    }

    /// Append a frame at the end and return its handle.
    pub fn push_back(&mut self, frame: KeyFrame) -> FrameId {
        let idx = self.slots.len();
        self.slots.push(Slot { frame, prev: self.tail, next: None, removed: false });

        match self.tail {
            Some(tail) => self.slots[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;

        FrameId(idx)
    }

    /// Number of frames still in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no frames remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the first frame.
    #[inline]
    pub fn first(&self) -> Option<FrameId> {
        self.head.map(FrameId)
    }

    /// Handle of the last frame.
    #[inline]
    pub fn last(&self) -> Option<FrameId> {
        self.tail.map(FrameId)
    }

    /// Successor of a frame still in the sequence.
    pub fn next(&self, id: FrameId) -> Option<FrameId> {
        self.live(id).and_then(|slot| slot.next).map(FrameId)
    }

    /// Predecessor of a frame still in the sequence.
    pub fn prev(&self, id: FrameId) -> Option<FrameId> {
        self.live(id).and_then(|slot| slot.prev).map(FrameId)
    }

    /// Frame behind a handle, `None` once removed.
    pub fn get(&self, id: FrameId) -> Option<&KeyFrame> {
        self.live(id).map(|slot| &slot.frame)
    }

    /// Check whether a handle still refers to a frame in the sequence.
    pub fn contains(&self, id: FrameId) -> bool {
        self.live(id).is_some()
    }

    /// Unlink an interior frame and return it.
    ///
    /// The first and last frames are never removed; asking for them, or
    /// for a frame already gone, returns `None` and leaves the sequence
    /// untouched.
    pub fn remove(&mut self, id: FrameId) -> Option<KeyFrame> {
        let (prev, next) = {
            let slot = self.live(id)?;
            (slot.prev?, slot.next?)
        };

        self.slots[prev].next = Some(next);
        self.slots[next].prev = Some(prev);

        let slot = &mut self.slots[id.0];
        slot.removed = true;
        slot.prev = None;
        slot.next = None;
        self.len -= 1;

        Some(slot.frame)
    }

    /// Iterate over the remaining frames in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { seq: self, cursor: self.head, remaining: self.len }
    }

    fn live(&self, id: FrameId) -> Option<&Slot> {
        self.slots.get(id.0).filter(|slot| !slot.removed)
    }
}

impl FromIterator<KeyFrame> for CaptureSequence {
    fn from_iter<I: IntoIterator<Item = KeyFrame>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut seq = Self::with_capacity(iter.size_hint().0);
        for frame in iter {
            seq.push_back(frame);
        }
        seq
    }
}

impl<'a> IntoIterator for &'a CaptureSequence {
    type Item = &'a KeyFrame;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the frames of a [`CaptureSequence`].
pub struct Iter<'a> {
    seq: &'a CaptureSequence,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a KeyFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let seq = self.seq;
        let slot = &seq.slots[self.cursor?];
        self.cursor = slot.next;
        self.remaining -= 1;
        Some(&slot.frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
