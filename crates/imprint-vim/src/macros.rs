//! Macro recording and playback bookkeeping.
//!
//! Macros are stored as raw key presses and replayed through the engine's
//! normal dispatch, so a macro behaves exactly like typing its keys.

use std::collections::HashMap;

use crate::key::{KeyInput, format_keys};

#[derive(Debug, Clone, Default)]
pub struct MacroStore {
    macros: HashMap<char, Vec<KeyInput>>,
    recording: Option<char>,
    append: bool,
    buffer: Vec<KeyInput>,
    last_played: Option<char>,
}

impl MacroStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Letters name macros; an uppercase letter appends to its lowercase macro.
    pub fn is_valid_name(c: char) -> bool {
        c.is_ascii_alphabetic()
    }

    /// Begin recording into `name`. Returns false for an invalid name.
    pub fn start_recording(&mut self, name: char) -> bool {
        if !Self::is_valid_name(name) {
            return false;
        }
        self.recording = Some(name.to_ascii_lowercase());
        self.append = name.is_ascii_uppercase();
        self.buffer.clear();
        tracing::debug!(register = %name, "macro recording started");
        true
    }

    /// Stop recording and store the keys, minus the `q` that stopped it.
    ///
    /// Returns the register and the number of keys recorded.
    pub fn stop_recording(&mut self) -> Option<(char, usize)> {
        let name = self.recording.take()?;
        let mut keys = std::mem::take(&mut self.buffer);
        if keys.last().and_then(KeyInput::printable) == Some('q') {
            keys.pop();
        }

        let stored = self.macros.entry(name).or_default();
        if !self.append {
            stored.clear();
        }
        stored.extend(keys);
        let len = stored.len();
        tracing::debug!(
            register = %name,
            keys = %format_keys(stored.as_slice()),
            "macro recording stopped"
        );
        Some((name, len))
    }

    /// Append a key to the active recording (no-op when idle).
    pub fn record(&mut self, key: KeyInput) {
        if self.recording.is_some() {
            self.buffer.push(key);
        }
    }

    pub fn recording(&self) -> Option<char> {
        self.recording
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn get(&self, name: char) -> Option<&[KeyInput]> {
        self.macros
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .filter(|keys| !keys.is_empty())
    }

    /// Store a macro directly (e.g. loaded by the host).
    pub fn set(&mut self, name: char, keys: Vec<KeyInput>) {
        self.macros.insert(name.to_ascii_lowercase(), keys);
    }

    pub fn last_played(&self) -> Option<char> {
        self.last_played
    }

    pub fn set_last_played(&mut self, name: char) {
        self.last_played = Some(name.to_ascii_lowercase());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::parse_keys;

    fn record(store: &mut MacroStore, notation: &str) {
        for key in parse_keys(notation) {
            store.record(key);
        }
    }

    #[test]
    fn test_record_excludes_stop_key() {
        let mut store = MacroStore::new();
        assert!(store.start_recording('a'));
        record(&mut store, "dwq");
        assert_eq!(store.stop_recording(), Some(('a', 2)));
        assert_eq!(format_keys(store.get('a').unwrap()), "dw");
        assert!(!store.is_recording());
    }

    #[test]
    fn test_uppercase_appends() {
        let mut store = MacroStore::new();
        store.start_recording('a');
        record(&mut store, "xq");
        store.stop_recording();
        store.start_recording('A');
        record(&mut store, "jq");
        store.stop_recording();
        assert_eq!(format_keys(store.get('a').unwrap()), "xj");
    }

    #[test]
    fn test_rerecord_replaces() {
        let mut store = MacroStore::new();
        store.start_recording('b');
        record(&mut store, "xq");
        store.stop_recording();
        store.start_recording('b');
        record(&mut store, "yq");
        store.stop_recording();
        assert_eq!(format_keys(store.get('b').unwrap()), "y");
    }

    #[test]
    fn test_invalid_and_empty() {
        let mut store = MacroStore::new();
        assert!(!store.start_recording('1'));
        assert!(store.stop_recording().is_none());
        store.start_recording('c');
        record(&mut store, "q");
        store.stop_recording();
        assert!(store.get('c').is_none());
    }

    #[test]
    fn test_idle_keys_are_not_recorded() {
        let mut store = MacroStore::new();
        record(&mut store, "abc");
        store.start_recording('d');
        assert_eq!(store.stop_recording(), Some(('d', 0)));
    }
}
