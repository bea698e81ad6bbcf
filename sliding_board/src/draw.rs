use draw_a_box::{find_character, Weight};

use crate::{Board, Coordinate, Field, RobotsState};

/// Width per field in the string in number of characters.
pub const FIELD_DRAW_WIDTH: usize = 4;

/// Height per field in the string in number of characters.
pub const FIELD_DRAW_HEIGHT: usize = 2;

const ROBOT_LABELS: [&str; 3] = ["0", "1", "2"];

/// Creates a string representation of a board and, if given, the robots of `state`.
///
/// The outer frame is drawn heavy, the lines between cells light. Robots are labelled with their
/// index, blockers with `#`, the goal with `G` and the start with `S`.
pub fn draw_board(board: &Board, state: Option<RobotsState>) -> String {
    let canvas = create_board_string_vec(board, state);
    let mut output = String::new();

    for row in 0..canvas[0].len() {
        for col in &canvas {
            output.push_str(col[row]);
        }
        output.push('\n');
    }

    output
}

/// Returns the weight of a grid line, heavy if it lies on the frame.
fn line_weight(index: usize, last: usize) -> Weight {
    if index == 0 || index == last {
        Weight::Heavy
    } else {
        Weight::Light
    }
}

/// Returns the three characters drawn inside a cell.
fn cell_content(field: Field, robot: Option<usize>) -> [&'static str; 3] {
    let marker = match field {
        Field::Empty => " ",
        Field::Blocker => "#",
        Field::Start => "S",
        Field::Goal => "G",
    };
    match robot {
        Some(robot) if field == Field::Empty => [" ", ROBOT_LABELS[robot], " "],
        Some(robot) => [marker, ROBOT_LABELS[robot], " "],
        None => [" ", marker, " "],
    }
}

/// Creates the strings making up the board, indexed by `[column][row]` of the canvas.
pub fn create_board_string_vec(board: &Board, state: Option<RobotsState>) -> Vec<Vec<&'static str>> {
    let width = board.width();
    let height = board.height();
    let canvas_width = width * FIELD_DRAW_WIDTH + 1;
    let canvas_height = height * FIELD_DRAW_HEIGHT + 1;

    let mut canvas = vec![vec![" "; canvas_height]; canvas_width];

    // Set corners
    for i in 0..=width {
        for j in 0..=height {
            let vertical = line_weight(i, width);
            let horizontal = line_weight(j, height);
            let up = if j == 0 { Weight::Empty } else { vertical };
            let down = if j == height { Weight::Empty } else { vertical };
            let left = if i == 0 { Weight::Empty } else { horizontal };
            let right = if i == width { Weight::Empty } else { horizontal };
            canvas[i * FIELD_DRAW_WIDTH][j * FIELD_DRAW_HEIGHT] =
                find_character(up, right, down, left);
        }
    }

    // Set horizontal connections
    for j in 0..=height {
        let weight = line_weight(j, height);
        let line = find_character(Weight::Empty, weight, Weight::Empty, weight);
        for col in (0..canvas_width).filter(|col| col % FIELD_DRAW_WIDTH != 0) {
            canvas[col][j * FIELD_DRAW_HEIGHT] = line;
        }
    }

    // Set vertical connections
    for i in 0..=width {
        let weight = line_weight(i, width);
        let line = find_character(weight, Weight::Empty, weight, Weight::Empty);
        for row in (0..canvas_height).filter(|row| row % FIELD_DRAW_HEIGHT != 0) {
            canvas[i * FIELD_DRAW_WIDTH][row] = line;
        }
    }

    // Fill the cells
    for x in 0..width {
        for y in 0..height {
            let robot = state.and_then(|state| state.robot_at(x as Coordinate, y as Coordinate));
            let content = cell_content(board.fields()[x][y], robot);
            for (offset, &character) in content.iter().enumerate() {
                canvas[x * FIELD_DRAW_WIDTH + 1 + offset][y * FIELD_DRAW_HEIGHT + 1] = character;
            }
        }
    }

    canvas
}
