//! The VSIDS (Variable State Independent Decaying Sum) decision heuristic.
//!
//! A binary max-heap over per-variable activity. Conflict analysis bumps the
//! activity of every variable it resolves through; between conflicts all
//! activity decays so recent conflicts dominate the ordering.
//!
//! Decaying every stored activity on every conflict is wasteful, so instead
//! the bump amount itself grows by `1 / decay` each time and activities are
//! left alone; only their relative order matters, so this is equivalent up
//! to a common scale factor. That scale factor is clamped by rescaling
//! everything down whenever it would approach the `f32` range limit.
use ordered_float::OrderedFloat;

use satkit_formula::Var;

pub struct Vsids {
    activity: Vec<OrderedFloat<f32>>,
    heap: Vec<Var>,
    position: Vec<Option<usize>>,
    bump: f32,
    inv_decay: f32,
}

impl Default for Vsids {
    fn default() -> Vsids {
        Vsids {
            activity: Vec::new(),
            heap: Vec::new(),
            position: Vec::new(),
            bump: 1.0,
            inv_decay: 1.0 / 0.95,
        }
    }
}

impl Vsids {
    fn rescale_limit() -> f32 {
        f32::MAX / 16.0
    }

    pub fn set_var_count(&mut self, count: usize) {
        let old_count = self.activity.len();
        self.activity.resize(count, OrderedFloat(0.0));
        self.position.resize(count, None);
        for index in old_count..count {
            self.make_available(Var::from_index(index));
        }
    }

    pub fn set_decay(&mut self, decay: f32) {
        assert!(decay > 0.0 && decay < 1.0);
        self.inv_decay = 1.0 / decay;
    }

    /// Increases `var`'s activity and restores the heap property.
    pub fn bump(&mut self, var: Var) {
        let needs_rescale = {
            let activity = &mut self.activity[var.index()];
            activity.0 += self.bump;
            activity.0 >= Self::rescale_limit()
        };
        if needs_rescale {
            self.rescale();
        }
        if let Some(position) = self.position[var.index()] {
            self.sift_up(position);
        }
    }

    /// Grows the bump amount for the next conflict's activity bumps.
    pub fn decay(&mut self) {
        self.bump *= self.inv_decay;
        if self.bump >= Self::rescale_limit() {
            self.rescale();
        }
    }

    fn rescale(&mut self) {
        let factor = 1.0 / Self::rescale_limit();
        for activity in &mut self.activity {
            activity.0 *= factor;
        }
        self.bump *= factor;
    }

    /// Returns a variable to the heap, e.g. after it is unassigned by
    /// backtracking. No-op if already present.
    pub fn make_available(&mut self, var: Var) {
        if self.position[var.index()].is_some() {
            return;
        }
        let position = self.heap.len();
        self.position[var.index()] = Some(position);
        self.heap.push(var);
        self.sift_up(position);
    }

    fn sift_up(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        while pos != 0 {
            let parent_pos = (pos - 1) / 2;
            let parent_var = self.heap[parent_pos];
            if self.activity[parent_var.index()] >= self.activity[var.index()] {
                break;
            }
            self.heap.swap(pos, parent_pos);
            self.position[var.index()] = Some(parent_pos);
            self.position[parent_var.index()] = Some(pos);
            pos = parent_pos;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let mut largest = pos;
            let left = pos * 2 + 1;
            let right = pos * 2 + 2;
            if left < self.heap.len()
                && self.activity[self.heap[largest].index()] < self.activity[self.heap[left].index()]
            {
                largest = left;
            }
            if right < self.heap.len()
                && self.activity[self.heap[largest].index()] < self.activity[self.heap[right].index()]
            {
                largest = right;
            }
            if largest == pos {
                return;
            }
            self.heap.swap(pos, largest);
            self.position[self.heap[pos].index()] = Some(pos);
            self.position[self.heap[largest].index()] = Some(largest);
            pos = largest;
        }
    }
}

/// Pops the variable with the greatest activity off the heap. The caller is
/// responsible for calling [`Vsids::make_available`] again if the popped
/// variable turns out to already be assigned (from propagation) or is later
/// unassigned by backtracking.
impl Iterator for Vsids {
    type Item = Var;

    fn next(&mut self) -> Option<Var> {
        if self.heap.is_empty() {
            return None;
        }
        let var = self.heap.swap_remove(0);
        self.position[var.index()] = None;
        if !self.heap.is_empty() {
            self.position[self.heap[0].index()] = Some(0);
            self.sift_down(0);
        }
        Some(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_returns_highest_activity_first() {
        let mut vsids = Vsids::default();
        vsids.set_var_count(4);
        for _ in 0..4 {
            vsids.next();
        }
        for i in 0..4 {
            for _ in 0..i {
                vsids.bump(Var::from_index(i));
            }
        }
        for i in 0..4 {
            vsids.make_available(Var::from_index(i));
        }
        for i in (0..4).rev() {
            assert_eq!(vsids.next(), Some(Var::from_index(i)));
        }
        assert_eq!(vsids.next(), None);
    }

    #[test]
    fn decay_then_bump_reorders() {
        let mut vsids = Vsids::default();
        vsids.set_var_count(2);
        vsids.set_decay(0.5);
        for _ in 0..2 {
            vsids.next();
        }
        vsids.bump(Var::from_index(0));
        for _ in 0..3 {
            vsids.decay();
        }
        vsids.bump(Var::from_index(1));

        vsids.make_available(Var::from_index(0));
        vsids.make_available(Var::from_index(1));
        assert_eq!(vsids.next(), Some(Var::from_index(1)));
    }
}
