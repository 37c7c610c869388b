//! Identifier generation.
//!
//! Generated defaults (the channel id, the `created_by` id) come from an
//! [`IdGenerator`] handed to the command at dispatch time, so every
//! invocation gets fresh values and tests can pin them.

use std::sync::Mutex;

pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Returns a fixed list of ids, then falls back to UUIDs.
#[derive(Debug, Default)]
pub struct FixedIds {
    queue: Mutex<Vec<String>>,
}

impl FixedIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: Vec<String> = ids.into_iter().map(Into::into).collect();
        queue.reverse();
        Self {
            queue: Mutex::new(queue),
        }
    }
}

impl IdGenerator for FixedIds {
    fn generate(&self) -> String {
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop())
            .unwrap_or_else(|| UuidGenerator.generate())
    }
}
