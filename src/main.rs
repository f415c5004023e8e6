use arboard::Clipboard;
use gridsim::config::{Config, LoggingConfig, CONFIG_FILE};
use gridsim::{
    CellView, Direction, DisplayIndex, FilePlanner, GridPos, MoveDirection, SimulationMode, Simulator,
};
use log::{error, info};
use macroquad::prelude::*;
use std::path::Path;

const PANEL_WIDTH: f32 = 320.0;

/// Viewer state: the simulator plus what the operator has selected
struct VisState {
    sim: Simulator,
    planner: FilePlanner,
    cell_size: f32,
    background: Color,
    direction: Direction,
    /// Last blocking notice shown to the operator
    notice: Option<String>,
}

impl VisState {
    fn new(config: &Config) -> Self {
        VisState {
            sim: Simulator::new(config.grid(), config.simulator_options()),
            planner: FilePlanner::new(&config.planner.response_path),
            cell_size: config.grid.cell_size,
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
            direction: Direction::N,
            notice: None,
        }
    }

    fn report<T>(&mut self, result: Result<T, gridsim::SimError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.notice = None;
                Some(value)
            }
            Err(e) => {
                error!("{}", e);
                self.notice = Some(e.to_string());
                None
            }
        }
    }

    fn handle_click(&mut self, mouse_x: f32, mouse_y: f32) {
        let row = (mouse_y / self.cell_size) as i32;
        let col = (mouse_x / self.cell_size) as i32;
        let grid = self.sim.grid();
        let pos = grid.to_grid(DisplayIndex::new(row, col));
        if mouse_x < 0.0 || mouse_y < 0.0 || !grid.contains(pos) {
            return;
        }
        let result = self.sim.place_obstacle(pos.x, pos.y, self.direction);
        self.report(result);
    }

    fn cycle_direction(&mut self) {
        let index = Direction::ALL.iter().position(|&d| d == self.direction).unwrap_or(0);
        self.direction = Direction::ALL[(index + 1) % Direction::ALL.len()];
    }

    fn toggle_mode(&mut self) {
        let mode = match self.sim.mode() {
            SimulationMode::PathPlayback => SimulationMode::FreeDrive,
            SimulationMode::FreeDrive => SimulationMode::PathPlayback,
        };
        self.sim.set_mode(mode);
        self.notice = None;
    }

    fn start_simulation(&mut self) {
        let result = self.sim.start_simulation(&mut self.planner);
        self.report(result);
    }

    fn handle_keys(&mut self) {
        if is_key_pressed(KeyCode::D) {
            self.cycle_direction();
        }
        if is_key_pressed(KeyCode::M) {
            self.toggle_mode();
        }
        if is_key_pressed(KeyCode::R) {
            self.sim.reset();
            self.notice = None;
        }
        if is_key_pressed(KeyCode::C) {
            self.copy_to_clipboard();
        }

        match self.sim.mode() {
            SimulationMode::PathPlayback => {
                if is_key_pressed(KeyCode::Enter) {
                    self.start_simulation();
                }
                if self.sim.is_started() {
                    if is_key_pressed(KeyCode::Right) {
                        let result = self.sim.step_forward();
                        self.report(result);
                    }
                    if is_key_pressed(KeyCode::Left) {
                        let result = self.sim.step_backward();
                        self.report(result);
                    }
                }
            }
            SimulationMode::FreeDrive => {
                let commands = [
                    (KeyCode::Up, MoveDirection::Up),
                    (KeyCode::Down, MoveDirection::Down),
                    (KeyCode::Left, MoveDirection::Left),
                    (KeyCode::Right, MoveDirection::Right),
                ];
                for (key, direction) in commands {
                    if is_key_pressed(key) {
                        let result = self.sim.move_robot(direction);
                        self.report(result);
                    }
                }
            }
        }
    }

    fn copy_to_clipboard(&self) {
        let grid_string = self.sim.to_ascii();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&grid_string) {
                    error!("failed to copy to clipboard: {}", e);
                } else {
                    info!("grid layout copied to clipboard");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                error!("failed to access clipboard: {}", e);
            }
        }
    }

    fn draw(&self) {
        clear_background(self.background);
        let grid = self.sim.grid();

        for index in grid.display_cells() {
            let px = index.col as f32 * self.cell_size;
            let py = index.row as f32 * self.cell_size;
            let size = self.cell_size - 1.0;

            let view = self.sim.cell_view(index);
            let color = match view {
                CellView::Robot => Color::from_rgba(94, 234, 212, 255),
                CellView::Obstacle(_) => RED,
                CellView::Reserved | CellView::Empty => Color::from_rgba(243, 244, 246, 255),
            };
            draw_rectangle(px, py, size, size, color);

            if let CellView::Obstacle(direction) = view {
                let (x1, y1, x2, y2) = match direction {
                    Direction::N => (px, py, px + size, py),
                    Direction::S => (px, py + size, px + size, py + size),
                    Direction::E => (px + size, py, px + size, py + size),
                    Direction::W => (px, py, px, py + size),
                };
                draw_line(x1, y1, x2, y2, 4.0, YELLOW);
            }
        }

        self.draw_panel(grid.size as f32 * self.cell_size + 16.0);
    }

    fn draw_panel(&self, left: f32) {
        let state = self.sim.playback_state();
        let anchor: GridPos = self.sim.robot_anchor();
        let mut lines = vec![
            format!("Mode: {}", self.sim.mode().name()),
            format!("Obstacles: {}", self.sim.obstacles().count()),
            format!("Direction: {}", self.direction),
            format!("Robot: ({}, {})", anchor.x, anchor.y),
        ];
        if self.sim.mode() == SimulationMode::PathPlayback {
            lines.push(format!("Steps: {}", self.sim.path().step_label()));
            lines.push(format!("Progress: {:.0}%", self.sim.progress_fraction() * 100.0));
            if let Some(cost) = self.sim.last_cost() {
                lines.push(format!("Cost: {}", cost));
            }
            if !state.started {
                lines.push("Enter: start simulation".to_string());
            } else {
                lines.push("Left/Right: step".to_string());
            }
        } else {
            lines.push("Arrows: move robot".to_string());
        }
        lines.push("Click: add obstacle  D: direction".to_string());
        lines.push("M: mode  R: reset  C: copy  Esc: quit".to_string());

        for (i, line) in lines.iter().enumerate() {
            draw_text(line, left, 24.0 + i as f32 * 22.0, 20.0, WHITE);
        }
        if let Some(notice) = &self.notice {
            draw_text(notice, left, 24.0 + (lines.len() + 1) as f32 * 22.0, 18.0, ORANGE);
        }
    }
}

fn window_conf() -> Conf {
    // the logger is not installed yet; main reports any problem with the file
    let config = Config::read(Path::new(CONFIG_FILE)).ok().flatten().unwrap_or_default();
    let side = config.grid.size as f32 * config.grid.cell_size;
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: (side + PANEL_WIDTH) as i32,
        window_height: side.max(320.0) as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let loaded = Config::read(Path::new(CONFIG_FILE));
    let level = match &loaded {
        Ok(Some(config)) => config.logging.level.clone(),
        _ => LoggingConfig::default().level,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let config = Config::or_default(loaded);
    info!("grid {}x{}, {} mode", config.grid.size, config.grid.size, config.simulation.mode.name());

    let mut state = VisState::new(&config);

    loop {
        if is_mouse_button_pressed(MouseButton::Left) {
            let (mouse_x, mouse_y) = mouse_position();
            state.handle_click(mouse_x, mouse_y);
        }

        state.handle_keys();

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.draw();

        next_frame().await
    }
}
