use std::collections::VecDeque;
use std::time::Duration;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, tail at the front and head at the back
    pub body: VecDeque<Position>,
    /// Direction the next move will take
    pub direction: Direction,
    /// Direction of the last completed move
    pub heading: Direction,
}

impl Snake {
    /// Create a snake whose tail sits at `tail` and whose head lies
    /// `length - 1` cells further along `direction`.
    pub fn new(tail: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| tail.moved_by(dx * i, dy * i))
            .collect();

        Self {
            body,
            direction,
            heading: direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        *self.body.back().expect("snake body is never empty")
    }

    /// Get the tail position
    pub fn tail(&self) -> Position {
        *self.body.front().expect("snake body is never empty")
    }

    /// Cell the head will move into on the next tick
    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Check if `pos` hits the body. With `tail_moves` set the tail cell is
    /// skipped, since it is vacated on the same tick.
    pub fn collides_with_body(&self, pos: Position, tail_moves: bool) -> bool {
        let skip = usize::from(tail_moves);
        self.body.iter().skip(skip).any(|&cell| cell == pos)
    }

    /// Request a new direction. Reversals are refused, both against the
    /// pending direction and against the direction of the last move.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) || direction.is_opposite(self.heading) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Move snake in current direction, growing if should_grow is true
    pub fn advance(&mut self, should_grow: bool) {
        let new_head = self.next_head();
        self.body.push_back(new_head);
        self.heading = self.direction;

        if !should_grow {
            self.body.pop_front();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

/// Food on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
    /// Special food is worth more points
    pub special: bool,
}

impl Food {
    pub fn new(position: Position, special: bool) -> Self {
        Self { position, special }
    }

    pub fn normal(position: Position) -> Self {
        Self::new(position, false)
    }

    pub fn special(position: Position) -> Self {
        Self::new(position, true)
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Where a game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    GameOver(CollisionType),
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    /// Time between ticks; shrinks as food is eaten
    pub tick_interval: Duration,
    pub phase: Phase,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Food,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            tick_interval,
            phase: Phase::Running,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn collision(&self) -> Option<CollisionType> {
        match self.phase {
            Phase::GameOver(collision) => Some(collision),
            _ => None,
        }
    }

    /// Flip between running and paused. Returns false once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver(_) => return false,
        };
        true
    }

    /// Steer the snake; ignored once the game is over
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        self.snake.set_direction(direction)
    }
}
