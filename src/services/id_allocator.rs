//! Task id allocation.

/// Issues `"<prefix><n>"` ids with `n` strictly increasing from 1.
///
/// Takes `&mut self`: the broker owns the only instance and calls it while
/// holding its accept lock, so ids are unique and follow queue order.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    prefix: String,
    counter: u64,
}

impl IdAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> String {
        self.counter += 1;
        format!("{}{}", self.prefix, self.counter)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new("id-")
    }
}
