//! Layout and drawing: board, falling piece, score sidebar, flash effects.

use crate::board::Position as BoardPosition;
use crate::game::RenderCommand;
use crate::piece::Matrix;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// One board cell is two terminal columns by one row, so cells look square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;
const CELL_SYMBOL: &str = "█";

const SIDEBAR_WIDTH: u16 = 20;

const ROW_CLEAR_FLASH_MS: u32 = 250;
const WIPE_FLASH_MS: u32 = 700;

/// Board rect including its border, centred in `area` together with the sidebar.
fn board_outer_rect(area: Rect, cols: usize, rows: usize) -> Rect {
    let cols = u16::try_from(cols).unwrap_or(u16::MAX);
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);
    let w = cols.saturating_mul(CELL_WIDTH).saturating_add(2);
    let h = rows.saturating_mul(CELL_HEIGHT).saturating_add(2);
    let total_w = w.saturating_add(SIDEBAR_WIDTH);
    Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

/// Board cells only (inside the border).
pub fn board_inner_rect(area: Rect, cols: usize, rows: usize) -> Rect {
    let outer = board_outer_rect(area, cols, rows);
    Rect {
        x: outer.x.saturating_add(1),
        y: outer.y.saturating_add(1),
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Paint the filled cells of `rows` at `offset` (board coordinates) into `inner`.
/// Value 0 is skipped so the background shows through.
fn paint_cells<'a>(
    buf: &mut Buffer,
    inner: Rect,
    rows: impl Iterator<Item = &'a [u8]>,
    offset: BoardPosition,
    theme: &Theme,
) {
    for (dy, row) in rows.enumerate() {
        for (dx, &value) in row.iter().enumerate() {
            let Some(color) = theme.cell_color(value) else {
                continue;
            };
            let bx = offset.x + dx as i32;
            let by = offset.y + dy as i32;
            let (Ok(bx), Ok(by)) = (u16::try_from(bx), u16::try_from(by)) else {
                continue;
            };
            let x0 = inner.x.saturating_add(bx.saturating_mul(CELL_WIDTH));
            let y0 = inner.y.saturating_add(by.saturating_mul(CELL_HEIGHT));
            for x in x0..x0.saturating_add(CELL_WIDTH) {
                for y in y0..y0.saturating_add(CELL_HEIGHT) {
                    if !inner.contains(Position::new(x, y)) {
                        continue;
                    }
                    if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
                        cell.set_symbol(CELL_SYMBOL).set_fg(color).set_bg(theme.bg);
                    }
                }
            }
        }
    }
}

fn matrix_rows(matrix: &Matrix) -> impl Iterator<Item = &[u8]> {
    matrix.iter().map(Vec::as_slice)
}

/// Draw one frame: board, active piece, sidebar, then any running flash effect.
pub fn draw(
    frame: &mut Frame,
    view: &RenderCommand<'_>,
    theme: &Theme,
    score: u32,
    flash: &mut Option<Effect>,
    flash_delta: std::time::Duration,
) {
    let area = frame.area();
    let cols = view.board.width();
    let rows = view.board.height();
    let outer = board_outer_rect(area, cols, rows);
    let inner = board_inner_rect(area, cols, rows);

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .style(Style::default().bg(theme.bg))
        .title(Span::styled(" blockdrop ", Style::default().fg(theme.title).bold()))
        .render(outer, frame.buffer_mut());

    paint_cells(
        frame.buffer_mut(),
        inner,
        view.board.rows(),
        BoardPosition::default(),
        theme,
    );
    paint_cells(
        frame.buffer_mut(),
        inner,
        matrix_rows(&view.player.matrix),
        view.player.pos,
        theme,
    );

    let sidebar = Rect {
        x: outer.x.saturating_add(outer.width),
        y: outer.y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(outer.x - area.x + outer.width)),
        height: outer.height,
    };
    draw_sidebar(frame, sidebar, theme, score, view.player.kind.as_char());

    if let Some(effect) = flash {
        let delta = TfxDuration::from_millis(flash_delta.as_millis().min(u32::MAX as u128) as u32);
        frame.render_effect(effect, inner, delta);
        if effect.done() {
            *flash = None;
        }
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, theme: &Theme, score: u32, piece: char) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let label = Style::default().fg(theme.title).bold();
    let value = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(Span::styled("Score", label)),
        Line::from(Span::styled(score.to_string(), value)),
        Line::from(""),
        Line::from(Span::styled("Piece", label)),
        Line::from(Span::styled(piece.to_string(), value)),
        Line::from(""),
        Line::from(Span::styled("←/→  move", value)),
        Line::from(Span::styled("↓    drop", value)),
        Line::from(Span::styled("↑/q  rotate", value)),
        Line::from(Span::styled("w    rotate ccw", value)),
        Line::from(Span::styled("Esc  quit", value)),
    ];
    Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line)),
    )
    .render(area, frame.buffer_mut());
}

/// Short flash over the board after rows are swept.
pub fn row_clear_flash(theme: &Theme) -> Effect {
    fx::fade_from(theme.title, theme.title, (ROW_CLEAR_FLASH_MS, Interpolation::QuadOut))
}

/// Longer red flash after the board is wiped by a blocked spawn.
pub fn wipe_flash(theme: &Theme) -> Effect {
    let red = theme.cell_color(2).unwrap_or(Color::Red);
    fx::fade_from(red, red, (WIPE_FLASH_MS, Interpolation::SineOut))
}
