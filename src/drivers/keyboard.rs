//! Filters raw terminal events down to what the host reacts to.
use crossterm::event::{Event, KeyEventKind, MouseEventKind};

#[derive(Debug, Default)]
pub struct EventNormalizer {
    esc_down: bool,
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` for events the host ignores: key releases, Windows key
    /// repeats of Esc, and pointer motion with no button held.
    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    if key.code == crossterm::event::KeyCode::Esc {
                        self.esc_down = false;
                    }
                    return None;
                }
                if cfg!(windows) && key.code == crossterm::event::KeyCode::Esc {
                    if self.esc_down {
                        return None;
                    }
                    self.esc_down = true;
                } else {
                    self.esc_down = false;
                }
                Some(Event::Key(key))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => None,
            other => Some(other),
        }
    }
}
