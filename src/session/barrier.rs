// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A join point over the per-card image loads. Cards without an image are
/// counted as loaded from the start. The barrier opens exactly once.
#[derive(Debug)]
pub struct ReadyBarrier {
    loaded: Vec<bool>,
    remaining: usize,
    opened: bool,
}

impl ReadyBarrier {
    /// `needs_load[i]` is true if card `i` has an image that must load.
    pub fn new(needs_load: &[bool]) -> Self {
        let loaded: Vec<bool> = needs_load.iter().map(|needs| !needs).collect();
        let remaining = needs_load.iter().filter(|needs| **needs).count();
        Self {
            loaded,
            remaining,
            opened: false,
        }
    }

    /// Record that card `index` has loaded. Returns true if this arrival
    /// opened the barrier. Repeated or out-of-range arrivals are ignored.
    pub fn arrive(&mut self, index: usize) -> bool {
        match self.loaded.get_mut(index) {
            Some(loaded) if !*loaded => {
                *loaded = true;
                self.remaining -= 1;
            }
            Some(_) => {
                log::debug!("Image for card {index} reported loaded twice.");
            }
            None => {
                log::warn!("Image load reported for unknown card {index}.");
            }
        }
        self.try_open()
    }

    /// Open the barrier if nothing is outstanding. Returns true only on the
    /// call that opens it.
    pub fn try_open(&mut self) -> bool {
        if self.remaining == 0 && !self.opened {
            self.opened = true;
            true
        } else {
            false
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_once_when_all_arrive() {
        let mut barrier = ReadyBarrier::new(&[true, false, true]);
        assert!(!barrier.try_open());
        assert!(barrier.is_loaded(1));
        assert!(!barrier.arrive(0));
        assert!(!barrier.is_open());
        assert!(barrier.arrive(2));
        assert!(barrier.is_open());
        assert!(!barrier.try_open());
        assert!(!barrier.arrive(2));
    }

    #[test]
    fn test_no_images_opens_immediately() {
        let mut barrier = ReadyBarrier::new(&[false, false]);
        assert!(barrier.try_open());
        assert!(!barrier.try_open());
    }

    #[test]
    fn test_duplicate_arrivals_are_not_counted() {
        let mut barrier = ReadyBarrier::new(&[true, true]);
        assert!(!barrier.arrive(0));
        assert!(!barrier.arrive(0));
        assert!(!barrier.is_open());
        assert!(barrier.arrive(1));
    }

    #[test]
    fn test_unknown_index_is_ignored() {
        let mut barrier = ReadyBarrier::new(&[true]);
        assert!(!barrier.arrive(7));
        assert!(!barrier.is_loaded(7));
        assert!(barrier.arrive(0));
    }
}
