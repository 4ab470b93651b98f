//! Text readout of the simulation's presentation events.
//!
//! The readout turns bus events into one-line messages, keeps the most recent
//! ones and logs each as it arrives.
use std::collections::VecDeque;

use game_core::{EntityKind, GameEvent};
use runtime::{Event, LifecycleEvent};

/// Severity of a readout line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageEntry {
    pub text: String,
    pub tick: Option<u64>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, tick: Option<u64>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            tick,
            level,
        }
    }
}

/// Circular buffer of the latest messages.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Consumes bus events into a [`MessageLog`].
pub struct Readout {
    log: MessageLog,
}

impl Readout {
    pub fn new(log: MessageLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Records the event's message, if it has one, and returns it.
    pub fn consume(&mut self, event: &Event) -> Option<&MessageEntry> {
        let entry = describe(event)?;
        match entry.level {
            MessageLevel::Info => tracing::info!(tick = entry.tick, "{}", entry.text),
            MessageLevel::Warning => tracing::warn!(tick = entry.tick, "{}", entry.text),
        }
        self.log.push(entry);
        self.log.recent(1).next()
    }
}

/// The readout line for a bus event. Clock events have none.
pub fn describe(event: &Event) -> Option<MessageEntry> {
    match event {
        Event::Game { tick, event } => {
            let (text, level) = describe_game(event);
            Some(MessageEntry::new(text, Some(tick.0), level))
        }
        Event::Lifecycle(lifecycle) => {
            let text = match lifecycle {
                LifecycleEvent::LevelStarted { rooms, inhabitants } => {
                    format!("You wake in a dungeon of {rooms} rooms and {inhabitants} creatures.")
                }
                LifecycleEvent::ResetScheduled { delay_frames, .. } => {
                    format!("The dungeon reshapes itself in {delay_frames} frames.")
                }
                LifecycleEvent::Reset => "Your magic fades. A new dungeon begins.".to_string(),
                LifecycleEvent::Stopped => "The simulation stopped.".to_string(),
            };
            Some(MessageEntry::new(text, None, MessageLevel::Info))
        }
        Event::Clock(_) => None,
    }
}

fn describe_game(event: &GameEvent) -> (String, MessageLevel) {
    let text = match event {
        GameEvent::LevelGenerated { rooms, .. } => format!("A level of {rooms} rooms was generated."),
        GameEvent::Damage { result, .. } => result.to_string(),
        GameEvent::MagicGained {
            amount, harvester, ..
        } => match harvester {
            EntityKind::Warlock => format!("You absorbed {amount:.1} magic."),
            other => format!("The {} drew {amount:.1} magic for you.", other.display_name()),
        },
        GameEvent::LevelUp {
            level,
            ability,
            max_health,
        } => format!(
            "You reached magic level {}! You learned {ability}. Max health is now {max_health:.0}.",
            level.index()
        ),
        GameEvent::Healed { amount, .. } => format!("You healed for {amount:.1}."),
        GameEvent::AbilityUsed {
            ability,
            remaining_magic,
        } => format!("You cast {ability}, {remaining_magic:.1} magic left."),
        GameEvent::EntityDestroyed { kind, .. } => match kind {
            EntityKind::Warlock => "The warlock falls.".to_string(),
            other => format!("The {} was destroyed.", other.display_name()),
        },
        GameEvent::PlayerDestroyed { .. } => {
            return ("You died.".to_string(), MessageLevel::Warning);
        }
        GameEvent::WorldErased { destroyed } => {
            format!("The eraser wiped out {destroyed} creatures.")
        }
    };
    (text, MessageLevel::Info)
}
