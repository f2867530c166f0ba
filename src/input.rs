use std::collections::HashMap;

use egui::Key;

/// "Currently held" state per key. Written from the platform's event
/// snapshot, read exactly once per tick's input phase; everything runs on
/// one logical thread so no synchronization is needed.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashMap<Key, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.held.insert(key, down);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }
}

/// A zero-argument gameplay effect, run against the active scene while its
/// key is held.
pub type Action<S> = Box<dyn FnMut(&mut S)>;

/// Key-to-effect wiring. Append-only (no unregistration), and iterated in
/// registration order so the input phase is deterministic.
pub struct ActionRegistry<S> {
    entries: Vec<(Key, Action<S>)>,
}

impl<S> Default for ActionRegistry<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S> ActionRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: Key, action: Action<S>) {
        self.entries.push((key, action));
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut (Key, Action<S>)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
