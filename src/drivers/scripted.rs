//! Drivers without a terminal: a pre-recorded event script and an in-memory
//! screen. Used by tests and the bench.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "event script exhausted"))
    }
}

pub struct HeadlessOutputDriver {
    terminal: Terminal<TestBackend>,
    frames: u64,
}

impl HeadlessOutputDriver {
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(Self {
            terminal,
            frames: 0,
        })
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal.backend_mut().resize(width, height);
    }
}

impl OutputDriver for HeadlessOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| f(UiFrame::new(frame)))
            .map_err(|err| io::Error::other(err.to_string()))?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::style::Style;

    #[test]
    fn script_runs_dry() {
        let mut driver = ScriptedInputDriver::new([Event::Key(KeyEvent::new(
            KeyCode::Esc,
            KeyModifiers::NONE,
        ))]);
        assert!(driver.poll(Duration::ZERO).expect("poll"));
        assert!(driver.read().is_ok());
        assert!(!driver.poll(Duration::ZERO).expect("poll"));
        assert!(driver.read().is_err());
    }

    #[test]
    fn headless_draw_lands_in_buffer() {
        let mut out = HeadlessOutputDriver::new(10, 2).expect("terminal");
        out.draw(|mut frame| frame.set_string(1, 1, "wall", Style::default()))
            .expect("draw");
        assert_eq!(out.frames(), 1);
        assert_eq!(out.buffer().cell((1, 1)).map(|c| c.symbol()), Some("w"));
    }
}
