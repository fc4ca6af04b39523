//! Crossterm presenter for [`Canvas`] frames

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{Color, Colors, Print, ResetColor, SetColors},
    terminal::{self, ClearType},
};

use super::canvas::Canvas;

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

/// Draws frames to a writer, skipping cells that match the previous frame
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    previous: Option<Canvas>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next frame to be drawn in full (after a resize, say)
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn present<W: Write>(&mut self, out: &mut W, frame: Canvas) -> io::Result<()> {
        let full = match &self.previous {
            Some(prev) => prev.cols != frame.cols || prev.rows != frame.rows,
            None => true,
        };
        if full {
            out.queue(terminal::Clear(ClearType::All))?;
        }

        let mut last_colors: Option<([u8; 3], [u8; 3])> = None;
        for row in 0..frame.rows {
            // Runs of changed cells are printed with a single MoveTo
            let mut cursor_at: Option<u16> = None;
            for col in 0..frame.cols {
                let Some(cell) = frame.get(col, row) else {
                    continue;
                };
                let unchanged = !full
                    && self
                        .previous
                        .as_ref()
                        .and_then(|prev| prev.get(col, row))
                        .is_some_and(|prev| prev == cell);
                if unchanged {
                    cursor_at = None;
                    continue;
                }
                if cursor_at != Some(col) {
                    out.queue(cursor::MoveTo(col, row))?;
                }
                if last_colors != Some((cell.fg, cell.bg)) {
                    out.queue(SetColors(Colors::new(rgb(cell.fg), rgb(cell.bg))))?;
                    last_colors = Some((cell.fg, cell.bg));
                }
                out.queue(Print(cell.ch))?;
                cursor_at = Some(col + 1);
            }
        }

        out.queue(ResetColor)?;
        out.flush()?;
        self.previous = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> Canvas {
        let mut canvas = Canvas::new(10, 2, [0, 0, 0]);
        canvas.text(0, 0, text, [255, 255, 255]);
        canvas
    }

    fn present(renderer: &mut TerminalRenderer, text: &str) -> String {
        let mut out = Vec::new();
        renderer.present(&mut out, frame(text)).unwrap();
        String::from_utf8_lossy(&out).to_string()
    }

    #[test]
    fn test_first_frame_draws_everything() {
        let mut renderer = TerminalRenderer::new();
        assert!(present(&mut renderer, "hello").contains("hello"));
    }

    #[test]
    fn test_unchanged_frame_writes_no_cells() {
        let mut renderer = TerminalRenderer::new();
        present(&mut renderer, "hello");
        let out = present(&mut renderer, "hello");
        assert!(!out.contains('h'));
        assert!(!out.contains('o'));
    }

    #[test]
    fn test_only_changed_cells_redrawn() {
        let mut renderer = TerminalRenderer::new();
        present(&mut renderer, "hello");
        let out = present(&mut renderer, "help!");
        assert!(out.contains("p!"));
        assert!(!out.contains("hel"));
    }

    #[test]
    fn test_invalidate_redraws() {
        let mut renderer = TerminalRenderer::new();
        present(&mut renderer, "hello");
        renderer.invalidate();
        assert!(present(&mut renderer, "hello").contains("hello"));
    }

    #[test]
    fn test_resize_redraws() {
        let mut renderer = TerminalRenderer::new();
        present(&mut renderer, "hello");
        let mut out = Vec::new();
        let mut bigger = Canvas::new(12, 3, [0, 0, 0]);
        bigger.text(0, 0, "hello", [255, 255, 255]);
        renderer.present(&mut out, bigger).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("hello"));
    }
}
