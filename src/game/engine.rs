use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, Food, GameState, Phase, Position, Snake},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Duration;

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether the food eaten was special
    pub special_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepResult {
    /// Points scored this step
    pub points: u32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Whether the tick interval changed and the scheduler needs re-arming
    pub interval_changed: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { config, rng }
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            Position::new(0, 0),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.spawn_food(&snake, self.config.grid_width, self.config.grid_height);

        GameState::new(
            snake,
            food,
            self.config.grid_width,
            self.config.grid_height,
            self.config.base_tick_interval(),
        )
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        match state.phase {
            Phase::Running => {}
            Phase::Paused => return StepResult::default(),
            Phase::GameOver(_) => {
                return StepResult {
                    terminated: true,
                    ..Default::default()
                };
            }
        }

        let new_head = state.snake.next_head();
        let ate_food = new_head == state.food.position;

        if let Some(collision_type) = self.check_collision(state, new_head, ate_food) {
            state.phase = Phase::GameOver(collision_type);
            state.steps += 1;

            return StepResult {
                terminated: true,
                info: StepInfo {
                    collision_type: Some(collision_type),
                    ..Default::default()
                },
                ..Default::default()
            };
        }

        state.snake.advance(ate_food);
        state.steps += 1;

        if !ate_food {
            return StepResult::default();
        }

        let special_food = state.food.special;
        let points = if special_food {
            self.config.special_food_points
        } else {
            self.config.food_points
        };
        state.score += points;
        state.food = self.spawn_food(&state.snake, state.grid_width, state.grid_height);

        let next_interval = self.next_tick_interval(state.tick_interval);
        let interval_changed = next_interval != state.tick_interval;
        state.tick_interval = next_interval;

        StepResult {
            points,
            terminated: false,
            interval_changed,
            info: StepInfo {
                ate_food: true,
                special_food,
                collision_type: None,
            },
        }
    }

    /// Tick interval after one more food has been eaten
    pub fn next_tick_interval(&self, current: Duration) -> Duration {
        current
            .mul_f64(self.config.speedup_factor)
            .max(self.config.min_tick_interval())
    }

    /// Check if the new head position causes a collision. The tail only
    /// counts when the snake is about to grow, since otherwise it moves away.
    fn check_collision(
        &self,
        state: &GameState,
        pos: Position,
        growing: bool,
    ) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(pos, !growing) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food on a random free cell; any cell once the snake fills the grid
    pub fn spawn_food(&mut self, snake: &Snake, grid_width: usize, grid_height: usize) -> Food {
        let occupied: HashSet<Position> = snake.body.iter().copied().collect();
        let free: Vec<Position> = (0..grid_height as i32)
            .flat_map(|y| (0..grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        let position = match free.choose(&mut self.rng) {
            Some(&pos) => pos,
            None => Position::new(
                self.rng.gen_range(0..grid_width.max(1)) as i32,
                self.rng.gen_range(0..grid_height.max(1)) as i32,
            ),
        };
        let special = self.rng.gen_bool(self.config.special_food_chance);

        Food::new(position, special)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::SurfaceSize;

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(Some(42)))
    }

    fn body(state: &GameState) -> Vec<Position> {
        state.snake.body.iter().copied().collect()
    }

    #[test]
    fn test_reset() {
        let mut engine = seeded(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.tick_interval, Duration::from_millis(100));
        assert!(!state.is_occupied_by_snake(state.food.position));
    }

    #[test]
    fn test_single_tick_on_default_surface() {
        let config = GameConfig::from_surface(SurfaceSize::new(1200, 735), 67);
        let mut engine = seeded(config);
        let mut state = engine.reset();
        state.food = Food::normal(Position::new(10, 8));

        let expected_before: Vec<Position> = (0..5).map(|x| Position::new(x, 0)).collect();
        assert_eq!(body(&state), expected_before);

        let result = engine.step(&mut state);

        let expected_after: Vec<Position> = (1..6).map(|x| Position::new(x, 0)).collect();
        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(body(&state), expected_after);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();

        let eaten_at = state.snake.next_head();
        state.food = Food::normal(eaten_at);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state);

        assert!(result.info.ate_food);
        assert!(!result.info.special_food);
        assert_eq!(result.points, 1);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert_eq!(state.snake.head(), eaten_at);
        assert_ne!(state.food.position, eaten_at);
        assert!(!state.is_occupied_by_snake(state.food.position));
    }

    #[test]
    fn test_special_food_scores_three() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.food = Food::special(state.snake.next_head());

        let result = engine.step(&mut state);

        assert!(result.info.special_food);
        assert_eq!(result.points, 3);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_length_constant_without_food() {
        let mut engine = seeded(GameConfig::new(30, 5));
        let mut state = engine.reset();
        state.food = Food::normal(Position::new(0, 4));
        let initial_length = state.snake.len();

        for _ in 0..10 {
            engine.step(&mut state);
            assert_eq!(state.snake.len(), initial_length);
        }
    }

    #[test]
    fn test_eating_speeds_up() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.food = Food::normal(state.snake.next_head());

        let result = engine.step(&mut state);

        assert!(result.interval_changed);
        assert_eq!(state.tick_interval, Duration::from_millis(95));
    }

    #[test]
    fn test_speed_floor() {
        let engine = seeded(GameConfig::default());
        let floor = Duration::from_millis(50);

        let mut interval = Duration::from_millis(100);
        for _ in 0..100 {
            let next = engine.next_tick_interval(interval);
            assert!(next < interval || next == floor);
            assert!(next >= floor);
            interval = next;
        }
        assert_eq!(interval, floor);
        assert_eq!(engine.next_tick_interval(floor), floor);
    }

    #[test]
    fn test_eating_at_floor_keeps_interval() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.tick_interval = Duration::from_millis(50);
        state.food = Food::normal(state.snake.next_head());

        let result = engine.step(&mut state);

        assert!(result.info.ate_food);
        assert!(!result.interval_changed);
        assert_eq!(state.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_wall_collision_on_every_side() {
        let cases = [
            (Position::new(5, 2), Direction::Up),
            (Position::new(5, 7), Direction::Down),
            (Position::new(2, 5), Direction::Left),
            (Position::new(7, 5), Direction::Right),
        ];

        for (tail, direction) in cases {
            let mut engine = seeded(GameConfig::small());
            let mut state = GameState::new(
                Snake::new(tail, direction, 3),
                Food::normal(Position::new(5, 5)),
                10,
                10,
                Duration::from_millis(100),
            );
            let before = body(&state);

            let result = engine.step(&mut state);

            assert!(result.terminated, "{direction:?} should hit the wall");
            assert!(state.is_over());
            assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
            assert_eq!(body(&state), before);
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded(GameConfig::small());

        // Body: (2,5) .. (6,5), head at (6,5)
        let snake = Snake::new(Position::new(2, 5), Direction::Right, 5);
        let mut state = GameState::new(
            snake,
            Food::normal(Position::new(8, 8)),
            10,
            10,
            Duration::from_millis(100),
        );

        state.set_direction(Direction::Down);
        engine.step(&mut state);
        state.set_direction(Direction::Left);
        engine.step(&mut state);
        state.set_direction(Direction::Up);
        // (5,5) is still part of the body
        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(state.score, 0);
    }

    fn looped_snake() -> Snake {
        // Square loop with the head at (5,6) pointing up at the tail (5,5)
        let mut snake = Snake::new(Position::new(5, 5), Direction::Up, 1);
        snake.body = [(5, 5), (6, 5), (6, 6), (5, 6)]
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .collect();
        snake
    }

    #[test]
    fn test_following_the_tail_is_safe() {
        let mut engine = seeded(GameConfig::small());
        let mut state = GameState::new(
            looped_snake(),
            Food::normal(Position::new(0, 0)),
            10,
            10,
            Duration::from_millis(100),
        );

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_growing_into_the_tail_collides() {
        let mut engine = seeded(GameConfig::small());
        let mut state = GameState::new(
            looped_snake(),
            Food::normal(Position::new(5, 5)),
            10,
            10,
            Duration::from_millis(100),
        );

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_reverse_request_is_ignored() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();

        assert!(!state.set_direction(Direction::Left));
        engine.step(&mut state);

        assert_eq!(state.snake.direction, Direction::Right);
        assert!(state.is_running());
    }

    #[test]
    fn test_paused_game_does_not_move() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.toggle_pause();
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state, before);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.phase = Phase::GameOver(CollisionType::Wall);
        let steps_before = state.steps;

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(state.steps, steps_before);
    }

    #[test]
    fn test_reset_after_play() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.food = Food::special(state.snake.next_head());
        engine.step(&mut state);
        state.set_direction(Direction::Down);
        state.phase = Phase::GameOver(CollisionType::Wall);

        let state = engine.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.tick_interval, Duration::from_millis(100));
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.len(), 5);
        assert!(state.is_running());
    }

    #[test]
    fn test_food_fills_last_free_cell() {
        let mut engine = seeded(GameConfig::new(4, 1));
        let snake = Snake::new(Position::new(0, 0), Direction::Right, 2);
        let mut state = GameState::new(
            snake,
            Food::normal(Position::new(2, 0)),
            4,
            1,
            Duration::from_millis(100),
        );

        engine.step(&mut state);

        assert_eq!(state.food.position, Position::new(3, 0));
    }

    #[test]
    fn test_special_food_frequency() {
        let mut engine = seeded(GameConfig::default());
        let snake = Snake::new(Position::new(0, 0), Direction::Right, 5);

        let specials = (0..1000)
            .filter(|_| engine.spawn_food(&snake, 18, 11).special)
            .count();

        assert!((100..300).contains(&specials), "got {specials} specials");
    }

    #[test]
    fn test_special_food_chance_extremes() {
        let snake = Snake::new(Position::new(0, 0), Direction::Right, 5);

        let mut never = seeded(GameConfig {
            special_food_chance: 0.0,
            ..GameConfig::default()
        });
        assert!((0..100).all(|_| !never.spawn_food(&snake, 18, 11).special));

        let mut always = seeded(GameConfig {
            special_food_chance: 1.0,
            ..GameConfig::default()
        });
        assert!((0..100).all(|_| always.spawn_food(&snake, 18, 11).special));
    }
}
