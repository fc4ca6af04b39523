//! Terminal setup and teardown
//!
//! [`TerminalSession`] puts the terminal into raw mode on the alternate
//! screen and restores it when dropped, including on early returns.
//! Key events are read on a dedicated thread so the game loop never blocks.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal,
};

/// Events forwarded from the reader thread
#[derive(Debug, Clone)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

pub struct TerminalSession<W: Write> {
    out: W,
    events: Receiver<TerminalEvent>,
    keyboard_enhanced: bool,
    reader_alive: bool,
}

impl<W: Write> TerminalSession<W> {
    pub fn start(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Release events when the terminal supports them; others fall back to hold timeouts
        let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        log::info!("Keyboard enhancement: {}", keyboard_enhanced);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            loop {
                let forwarded = match event::read() {
                    Ok(Event::Key(key)) => TerminalEvent::Key(key),
                    Ok(Event::Resize(cols, rows)) => TerminalEvent::Resize(cols, rows),
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("Terminal event read failed: {}", e);
                        break;
                    }
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            out,
            events: rx,
            keyboard_enhanced,
            reader_alive: true,
        })
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Current terminal size in cells
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Next pending event without blocking
    pub fn poll(&mut self) -> Option<TerminalEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.reader_alive {
                    log::warn!("Terminal event reader stopped");
                    self.reader_alive = false;
                }
                None
            }
        }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
