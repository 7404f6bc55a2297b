//! Plain-text rendering backend writing frames to any `Write` sink.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use crawl_core::{EnemyVariant, Event};
use crawl_rendering::{RenderingBackend, Scene};

/// Backend that prints each scene as an ASCII frame.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    sink: W,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) const fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Writes one message line per notable event.
    pub(crate) fn announce(&mut self, events: &[Event]) -> AnyResult<()> {
        for message in events.iter().filter_map(describe) {
            writeln!(self.sink, "{message}").context("failed to write message")?;
        }
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.sink
            .write_all(scene.to_ascii().as_bytes())
            .context("failed to write frame")?;
        writeln!(self.sink).context("failed to write frame")?;
        self.sink.flush().context("failed to flush frame")
    }
}

const fn variant_name(variant: EnemyVariant) -> &'static str {
    match variant {
        EnemyVariant::Elf => "elf",
        EnemyVariant::Dwarf => "dwarf",
        EnemyVariant::GoldenEye => "golden eye",
    }
}

fn describe(event: &Event) -> Option<String> {
    let message = match event {
        Event::AttackResolved { dealt, taken, .. } => {
            format!("You deal {dealt} damage and take {taken}.")
        }
        Event::EnemySlain {
            variant, xp_reward, ..
        } => format!("The {} dies. (+{xp_reward} xp)", variant_name(*variant)),
        Event::ItemLooted { item } => format!("You pick up {item:?}."),
        Event::TierAdvanced { level, .. } => format!("You reach level {level}!"),
        Event::PlayerDied { .. } => "You die. A new dungeon awaits.".to_owned(),
        _ => return None,
    };
    Some(message)
}
