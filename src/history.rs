/// Bounded newest-first buffer of past readings
use std::collections::VecDeque;

use crate::models::SensorReading;

pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct ReadingHistory {
    entries: VecDeque<SensorReading>,
    capacity: usize,
}

impl ReadingHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ReadingHistory {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepend `reading`, evicting the oldest entry once over capacity
    pub fn push(&mut self, reading: SensorReading) {
        self.entries.push_front(reading);
        self.entries.truncate(self.capacity);
    }

    /// Newest reading, i.e. the current one
    pub fn latest(&self) -> Option<&SensorReading> {
        self.entries.front()
    }

    /// Readings newest-first
    pub fn iter(&self) -> impl Iterator<Item = &SensorReading> {
        self.entries.iter()
    }

    /// Up to `count` newest readings, newest-first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &SensorReading> {
        self.entries.iter().take(count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReadingHistory {
    fn default() -> Self {
        Self::new()
    }
}
