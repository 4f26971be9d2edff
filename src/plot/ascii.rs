//! ASCII plotting of a schedule for terminal output.
//!
//! Fixed-size character grid with deterministic output, so the rendering can be
//! pinned by golden tests.
//!
//! Plot elements:
//! - schedule entries: `o`
//! - the piecewise-linear path between them: `-`

use crate::domain::Sigmas;

/// Render `sigma` (y) against step index (x).
pub fn render_schedule_plot(sigmas: &Sigmas, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let last_step = sigmas.len().saturating_sub(1);
    let x_max = last_step.max(1) as f64;
    let (y_min, y_max) = y_range(sigmas).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let cells: Vec<(usize, usize)> = sigmas
        .iter()
        .enumerate()
        .map(|(step, &sigma)| {
            (
                map_x(step as f64, x_max, width),
                map_y(sigma, y_min, y_max, height),
            )
        })
        .collect();

    let mut grid = vec![vec![' '; width]; height];

    // Path first so the entries overlay it.
    if cells.len() >= 2 {
        for pair in cells.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            draw_line(&mut grid, x0, y0, x1, y1, '-');
        }
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = format!("Plot: step=[0, {last_step}] | sigma=[{y_min:.2}, {y_max:.2}]\n");
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn y_range(sigmas: &Sigmas) -> Option<(f64, f64)> {
    let min_y = sigmas.iter().copied().fold(f64::INFINITY, f64::min);
    let max_y = sigmas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(step: f64, x_max: f64, width: usize) -> usize {
    let u = (step / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Largest sigma on row 0.
    (height as f64 - 1.0 - u * (height as f64 - 1.0)).round() as usize
}

/// Integer line drawing (Bresenham). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let (mut x, mut y) = (x0 as isize, y0 as isize);
    let (x1, y1) = (x1 as isize, y1 as isize);

    let dx = (x1 - x).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let dy = -(y1 - y).abs();
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            if *cell == ' ' {
                *cell = ch;
            }
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
