use reqwest::Url;

/// The application's visible location.
///
/// `replace` swaps the current entry in place; `push` adds a new one. Auth
/// parameters are always stripped with `replace` so going back does not
/// re-run the capture.
pub trait Location {
    fn current(&self) -> Url;

    fn replace(&mut self, url: Url);

    fn push(&mut self, url: Url);
}

/// In-process location with a navigable history stack.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<Url>,
}

impl MemoryLocation {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    /// Number of history entries, including the current one.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> Url {
        // `entries` is never empty: `new` seeds it and nothing pops.
        self.entries[self.entries.len() - 1].clone()
    }

    fn replace(&mut self, url: Url) {
        if let Some(last) = self.entries.last_mut() {
            *last = url;
        }
    }

    fn push(&mut self, url: Url) {
        self.entries.push(url);
    }
}
