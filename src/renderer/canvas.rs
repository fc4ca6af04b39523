//! Cell grid rasterization for 2D primitives
//!
//! Field coordinates are scaled onto a grid of terminal cells. Nothing here
//! touches the terminal, so frames can be built and inspected in tests.

use crate::sim::{Field, GameState, Rect, RoundState};

pub const BACKGROUND: [u8; 3] = [20, 20, 20];
pub const PLAYER_COLOR: [u8; 3] = [0, 128, 255];
const TEXT: [u8; 3] = [255, 255, 255];
const TEXT_DIM: [u8; 3] = [200, 200, 200];
const OVERLAY: [u8; 3] = [0, 0, 0];
const GAME_OVER_COLOR: [u8; 3] = [255, 50, 50];

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: [u8; 3],
    pub bg: [u8; 3],
}

impl Cell {
    pub fn blank(bg: [u8; 3]) -> Self {
        Self { ch: ' ', fg: TEXT, bg }
    }
}

/// A frame of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, bg: [u8; 3]) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::blank(bg); cols as usize * rows as usize],
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn get_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.cols as usize + col as usize)
    }

    /// Paint the background of every cell in `[c0, c1) x [r0, r1)`
    pub fn fill(&mut self, c0: u16, r0: u16, c1: u16, r1: u16, color: [u8; 3]) {
        for row in r0..r1.min(self.rows) {
            for col in c0..c1.min(self.cols) {
                if let Some(cell) = self.get_mut(col, row) {
                    *cell = Cell::blank(color);
                }
            }
        }
    }

    /// Write text starting at `(col, row)`, keeping the existing background
    pub fn text(&mut self, col: u16, row: u16, text: &str, fg: [u8; 3]) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            if let Some(cell) = self.get_mut(col.saturating_add(offset), row) {
                cell.ch = ch;
                cell.fg = fg;
            }
        }
    }

    /// Write text centered horizontally on `row`
    pub fn text_centered(&mut self, row: u16, text: &str, fg: [u8; 3]) {
        let len = text.chars().count() as u16;
        let col = self.cols.saturating_sub(len) / 2;
        self.text(col, row, text, fg);
    }

    /// Characters of one row, for tests and debugging
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.get(col, row).map(|c| c.ch))
            .collect()
    }
}

/// Maps field coordinates onto the canvas
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub field: Field,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(field: Field, cols: u16, rows: u16) -> Self {
        Self { field, cols, rows }
    }

    /// Cell span `(c0, r0, c1, r1)` covered by a rectangle, or `None` if off canvas.
    ///
    /// Anything visible covers at least one cell.
    pub fn cells_for(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let span = |lo: f32, hi: f32, extent: f32, limit: u16| -> Option<(u16, u16)> {
            let cells = limit as f32;
            let start = (lo * cells / extent).floor();
            let end = (hi * cells / extent).ceil().max(start + 1.0);
            let start = start.max(0.0);
            let end = end.min(cells);
            (start < end).then_some((start as u16, end as u16))
        };

        let (c0, c1) = span(rect.left(), rect.right(), self.field.width, self.cols)?;
        let (r0, r1) = span(rect.top(), rect.bottom(), self.field.height, self.rows)?;
        Some((c0, r0, c1, r1))
    }

    pub fn fill_rect(&self, canvas: &mut Canvas, rect: &Rect, color: [u8; 3]) {
        if let Some((c0, r0, c1, r1)) = self.cells_for(rect) {
            canvas.fill(c0, r0, c1, r1, color);
        }
    }
}

/// Blend a particle color toward the background by `alpha`
fn fade(color: [u8; 3], alpha: f32) -> [u8; 3] {
    let mix = |c: u8, b: u8| (b as f32 + (c as f32 - b as f32) * alpha).round() as u8;
    [
        mix(color[0], BACKGROUND[0]),
        mix(color[1], BACKGROUND[1]),
        mix(color[2], BACKGROUND[2]),
    ]
}

/// Build a frame for the current round: entities, particles, HUD and overlays
pub fn draw_round(state: &GameState, cols: u16, rows: u16) -> Canvas {
    let mut canvas = Canvas::new(cols, rows, BACKGROUND);
    let viewport = Viewport::new(state.field, cols, rows);

    viewport.fill_rect(&mut canvas, &state.player.rect, PLAYER_COLOR);
    for enemy in &state.enemies {
        viewport.fill_rect(&mut canvas, &enemy.rect, enemy.tag().color());
    }
    for particle in &state.particles.particles {
        let rect = Rect::new(particle.pos.x, particle.pos.y, particle.size, particle.size);
        viewport.fill_rect(&mut canvas, &rect, fade(particle.color, particle.alpha()));
    }

    let stats = &state.stats;
    canvas.text(1, 0, &format!("Score: {}", stats.score), TEXT);
    canvas.text(1, 1, &format!("Highscore: {}", stats.highscore), TEXT_DIM);
    canvas.text(1, 2, &format!("Level: {}", stats.level), [200, 255, 200]);
    canvas.text(1, 3, &format!("Time: {}s", stats.time_survived), [200, 200, 255]);
    canvas.text(1, 4, &format!("Enemies: {}", state.enemies.len()), [255, 200, 200]);

    let mid = rows / 2;
    match state.phase {
        RoundState::Running => {}
        RoundState::Paused => {
            canvas.fill(0, mid.saturating_sub(2), cols, mid + 2, OVERLAY);
            canvas.text_centered(mid.saturating_sub(1), "PAUSED", TEXT);
            canvas.text_centered(mid, "Press P to continue", TEXT_DIM);
        }
        RoundState::GameOver => {
            canvas.fill(0, mid.saturating_sub(3), cols, mid + 3, OVERLAY);
            canvas.text_centered(mid.saturating_sub(2), "GAME OVER", GAME_OVER_COLOR);
            canvas.text_centered(mid, &format!("Final Score: {}", stats.score), TEXT);
            canvas.text_centered(mid + 2, "SPACE: restart | ESC: menu", TEXT_DIM);
        }
    }

    canvas
}

/// Build the title menu frame
pub fn draw_menu(cols: u16, rows: u16, highscore: u64) -> Canvas {
    let mut canvas = Canvas::new(cols, rows, BACKGROUND);
    let title_row = rows / 4;
    canvas.text_centered(title_row, "SQUARE DODGER", PLAYER_COLOR);
    canvas.text_centered(title_row + 2, &format!("Best: {}", highscore), [200, 200, 255]);

    let mid = rows / 2;
    canvas.text_centered(mid, "[ENTER] Play", TEXT);
    canvas.text_centered(mid + 2, "[ESC] Exit", TEXT);

    canvas.text_centered(
        rows.saturating_sub(2),
        "Arrows/WASD: move | P: pause | SPACE: restart | ESC: menu",
        [180, 180, 180],
    );
    canvas
}
