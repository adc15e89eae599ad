//! Stacking counters and keyboard focus cycling.

/// Monotonic source of z-indices and focus sequence numbers.
///
/// `top` only ever grows, so an index handed out once is never handed out
/// again for the lifetime of the manager.
#[derive(Debug, Clone, Default)]
pub struct ZOrder {
    top: i64,
    focus_seq: u64,
}

impl ZOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The highest z-index ever assigned.
    pub fn top(&self) -> i64 {
        self.top
    }

    /// Return an index strictly above both `others_max` and anything assigned
    /// before.
    pub fn raise_above(&mut self, others_max: i64) -> i64 {
        self.top = self.top.max(others_max).saturating_add(1);
        self.top
    }

    /// Absorb an externally supplied index (layout restore) so later raises
    /// stay above it.
    pub fn observe(&mut self, z: i64) {
        self.top = self.top.max(z);
    }

    pub fn next_focus_seq(&mut self) -> u64 {
        self.focus_seq = self.focus_seq.saturating_add(1);
        self.focus_seq
    }
}

#[derive(Debug, Clone)]
pub struct FocusRing<T: Copy + Eq> {
    order: Vec<T>,
}

impl<T: Copy + Eq> FocusRing<T> {
    pub fn new(order: Vec<T>) -> Self {
        Self { order }
    }

    /// The member after (or before) `current`, wrapping around. A `current`
    /// outside the ring starts from the first member.
    pub fn step(&self, current: Option<T>, forward: bool) -> Option<T> {
        if self.order.is_empty() {
            return None;
        }
        let Some(idx) = current.and_then(|cur| self.order.iter().position(|item| *item == cur))
        else {
            return self.order.first().copied();
        };
        let step = if forward { 1isize } else { -1isize };
        let next = (idx as isize + step).rem_euclid(self.order.len() as isize) as usize;
        Some(self.order[next])
    }
}
