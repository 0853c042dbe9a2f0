use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Terminal rows are about twice as tall as columns are wide
const ROW_ASPECT: i32 = 2;

/// Turns a left-button press/release pair into a swipe direction
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one mouse event; returns a direction when a swipe completes
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (start_col, start_row) = self.start.take()?;
                let dx = i32::from(event.column) - i32::from(start_col);
                let dy = (i32::from(event.row) - i32::from(start_row)) * ROW_ASPECT;
                Direction::from_swipe(dx, dy)
            }
            _ => None,
        }
    }
}
