//! Game state: board, active piece, drop timer, score.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::GameConfig;
use crate::board::{Board, Position};
use crate::piece::{self, Direction, Matrix, PieceKind};

/// Default automatic drop interval in ms.
pub const DEFAULT_DROP_INTERVAL_MS: u64 = 1000;

/// A game command produced by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
}

/// Something that happened to the board since the last frame (drives effects).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    RowsCleared(u32),
    /// A new piece spawned into settled cells and the board was wiped.
    Wiped,
}

/// The falling piece and the running score.
#[derive(Debug, Clone)]
pub struct Player {
    pub kind: PieceKind,
    pub matrix: Matrix,
    pub pos: Position,
    pub score: u32,
}

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct RenderCommand<'a> {
    pub board: &'a Board,
    pub player: &'a Player,
    /// Score to publish, set after start-up and after every lock.
    pub score_update: Option<u32>,
    pub events: Vec<BoardEvent>,
}

#[derive(Debug)]
pub struct GameState {
    board: Board,
    player: Player,
    drop_counter: u64,
    drop_interval: u64,
    last_time: u64,
    rng: StdRng,
    pending_score: Option<u32>,
    events: Vec<BoardEvent>,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut state = Self {
            board: Board::new(config.width, config.height),
            player: Player {
                kind: PieceKind::T,
                matrix: PieceKind::T.matrix(),
                pos: Position::default(),
                score: 0,
            },
            drop_counter: 0,
            drop_interval: config.drop_interval_ms,
            last_time: 0,
            rng,
            pending_score: None,
            events: Vec::new(),
        };
        state.reset_player();
        state.pending_score = Some(state.player.score);
        state
    }

    /// Advance the clock to `now` (ms, monotonic), auto-dropping when the interval has passed.
    pub fn step(&mut self, now: u64) -> RenderCommand<'_> {
        let elapsed = now.saturating_sub(self.last_time);
        self.last_time = now;
        self.drop_counter += elapsed;
        if self.drop_counter > self.drop_interval {
            self.drop_piece();
        }
        let score_update = self.pending_score.take();
        let events = std::mem::take(&mut self.events);
        RenderCommand {
            board: &self.board,
            player: &self.player,
            score_update,
            events,
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => self.move_piece(-1),
            Command::MoveRight => self.move_piece(1),
            Command::SoftDrop => self.drop_piece(),
            Command::RotateCw => self.rotate_piece(Direction::Clockwise),
            Command::RotateCcw => self.rotate_piece(Direction::CounterClockwise),
        }
    }

    /// Shift sideways by `dx`; no-op if the target collides.
    pub fn move_piece(&mut self, dx: i32) {
        self.player.pos.x += dx;
        if self.board.collide(&self.player.matrix, self.player.pos) {
            self.player.pos.x -= dx;
        }
    }

    /// Move down one row, or lock the piece where it is if it can't.
    pub fn drop_piece(&mut self) {
        self.player.pos.y += 1;
        if self.board.collide(&self.player.matrix, self.player.pos) {
            self.player.pos.y -= 1;
            self.board.merge(&self.player.matrix, self.player.pos);
            // Spawn happens before the sweep, so a wipe sees the unswept stack.
            self.reset_player();
            let sweep = self.board.sweep();
            if sweep.rows_cleared > 0 {
                self.player.score += sweep.points;
                self.events.push(BoardEvent::RowsCleared(sweep.rows_cleared));
            }
            self.pending_score = Some(self.player.score);
        }
        self.drop_counter = 0;
    }

    /// Rotate with wall kicks: try x offsets +1, -2, +3, -4, ... until the piece fits.
    /// Gives up, leaving the piece as it was, once the next offset would exceed the
    /// rotated matrix's width.
    pub fn rotate_piece(&mut self, dir: Direction) {
        let candidate = piece::rotated(&self.player.matrix, dir);
        let limit = piece::width(&candidate) as i32;
        let mut pos = self.player.pos;
        let mut offset = 1i32;
        while self.board.collide(&candidate, pos) {
            pos.x += offset;
            offset = -(offset + offset.signum());
            if offset > limit {
                return;
            }
        }
        self.player.matrix = candidate;
        self.player.pos = pos;
    }

    /// Spawn a uniformly random piece at the top.
    pub fn reset_player(&mut self) {
        let kind: PieceKind = self.rng.random();
        self.spawn(kind);
    }

    /// Put `kind` at the spawn point; wipe the board if it is already blocked.
    pub fn spawn(&mut self, kind: PieceKind) {
        self.player.kind = kind;
        self.player.matrix = kind.matrix();
        self.player.pos = Position::new(
            (self.board.width() / 2) as i32 - (piece::width(&self.player.matrix) / 2) as i32,
            0,
        );
        if self.board.collide(&self.player.matrix, self.player.pos) {
            self.board.clear();
            self.events.push(BoardEvent::Wiped);
        }
    }
}
