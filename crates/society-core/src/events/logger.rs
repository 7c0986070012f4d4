//! Event Logger
//!
//! Append-only JSONL event logging.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use society_events::{generate_event_id, EventKind, SocietyEvent};

/// Writes events to a JSONL file, one event per line
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
        })
    }

    /// Create a logger that discards events (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn log(&mut self, event: &SocietyEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(event)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, events: &[SocietyEvent]) -> std::io::Result<()> {
        for event in events {
            self.log(event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to flush event logger");
        }
    }
}

/// Events recorded since the last drain, with ids assigned on push
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<SocietyEvent>,
    next_event_id: u64,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    pub fn push(&mut self, tick: u64, kind: EventKind) {
        // Default leaves the counter at zero
        let sequence = self.next_event_id.max(1);
        self.next_event_id = sequence + 1;
        self.events.push(SocietyEvent {
            event_id: generate_event_id(sequence),
            tick,
            kind,
        });
    }

    pub fn drain(&mut self) -> Vec<SocietyEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop pending events; ids keep counting
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SocietyEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    fn removed(agent: &str) -> EventKind {
        EventKind::AgentRemoved {
            agent_id: agent.to_string(),
            age: 12,
        }
    }

    #[test]
    fn test_event_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut buffer = EventBuffer::new();
        buffer.push(3, removed("agent_1"));
        buffer.push(3, removed("agent_2"));

        {
            let mut logger = EventLogger::new(&path).unwrap();
            logger.log_batch(&buffer.drain()).unwrap();
            logger.flush().unwrap();
            assert_eq!(logger.event_count(), 2);
        }

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let parsed: SocietyEvent = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(parsed.event_id, "evt_00000002");
        assert_eq!(parsed.kind, removed("agent_2"));
    }

    #[test]
    fn test_null_logger() {
        let mut logger = EventLogger::null();
        let mut buffer = EventBuffer::new();
        buffer.push(1, removed("agent_0"));

        logger.log_batch(&buffer.drain()).unwrap();
        assert_eq!(logger.event_count(), 1);
    }

    #[test]
    fn test_buffer_ids_continue_across_drains() {
        let mut buffer = EventBuffer::default();
        buffer.push(1, removed("a"));
        let first = buffer.drain();
        buffer.push(2, removed("b"));
        let second = buffer.drain();

        assert_eq!(first[0].event_id, "evt_00000001");
        assert_eq!(second[0].event_id, "evt_00000002");
        assert!(buffer.is_empty());
    }
}
