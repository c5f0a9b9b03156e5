use glam::Vec3;
use std::collections::VecDeque;

/// A chronological history of recent positions for one trajectory.
///
/// Points are appended at the back and evicted from the front once the
/// buffer grows past the configured cap. The cap is passed on every
/// [`TrailBuffer::append`] rather than stored, so a live configuration
/// change takes effect on the very next append without reallocating.
///
/// A cap of `0` disables eviction and the buffer grows without bound.
#[derive(Debug, Clone, Default)]
pub struct TrailBuffer {
    points: VecDeque<Vec3>,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point and evicts the oldest points while over `cap`.
    ///
    /// In steady state this removes exactly one point per call. After the
    /// cap has been lowered, the first append trims the backlog in one go,
    /// so the length never exceeds the new cap afterwards.
    ///
    /// ### Parameters
    /// - `point` - Newest position, appended at the back.
    /// - `cap` - Maximum length to keep; `0` means unbounded.
    pub fn append(&mut self, point: Vec3, cap: usize) {
        self.points.push_back(point);
        if cap != 0 {
            while self.points.len() > cap {
                self.points.pop_front();
            }
        }
    }

    /// Removes every point; the allocation is kept.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recently appended point, if any.
    #[inline]
    pub fn last(&self) -> Option<Vec3> {
        self.points.back().copied()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    /// Rearranges the storage so the points form one slice, oldest first.
    pub fn make_contiguous(&mut self) -> &[Vec3] {
        self.points.make_contiguous()
    }
}
