//! Cyclic selection cursor for autocomplete candidates

/// Subscriber notified with the new index after every move
pub type SelectionObserver = Box<dyn FnMut(usize)>;

/// Cursor over `0..size` that wraps at both ends
///
/// Every move notifies all subscribers exactly once, even when the index does
/// not change (size 1). Resizing resets the index and does not notify.
pub struct CyclicSelector {
    size: usize,
    index: usize,
    observers: Vec<SelectionObserver>,
}

impl CyclicSelector {
    /// Creates a selector with a single slot
    pub fn new() -> Self {
        Self {
            size: 1,
            index: 0,
            observers: Vec::new(),
        }
    }

    /// Registers a change subscriber
    pub fn subscribe(&mut self, observer: impl FnMut(usize) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Sets the number of alternatives (minimum 1) and resets the index
    pub fn set_size(&mut self, size: usize) {
        self.size = size.max(1);
        self.index = 0;
    }

    /// Moves to the next slot, wrapping to 0 after the last
    pub fn move_forward(&mut self) -> usize {
        self.index = if self.index + 1 >= self.size {
            0
        } else {
            self.index + 1
        };
        self.notify();
        self.index
    }

    /// Moves to the previous slot, wrapping to the last after 0
    pub fn move_backward(&mut self) -> usize {
        self.index = if self.index == 0 {
            self.size - 1
        } else {
            self.index - 1
        };
        self.notify();
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn notify(&mut self) {
        let index = self.index;
        for observer in self.observers.iter_mut() {
            observer(index);
        }
    }
}

impl Default for CyclicSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CyclicSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyclicSelector")
            .field("size", &self.size)
            .field("index", &self.index)
            .field("observers", &self.observers.len())
            .finish()
    }
}
