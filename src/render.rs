use crate::grid::{Coord, Grid};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    pub passage: [f32; 4],
    pub wall: [f32; 4],
    pub highlight: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            passage: [1.0, 1.0, 1.0, 1.0],
            wall: [0.0, 0.0, 0.0, 1.0],
            highlight: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Palette {
    pub fn color_of(&self, passage: bool) -> [f32; 4] {
        if passage {
            self.passage
        } else {
            self.wall
        }
    }
}

/// Square cells, centred and letter-boxed in a `size` pixel surface.
/// Returns cell width and height in NDC plus the top left corner.
pub fn ndc_params(grid: &Grid, size: (u32, u32)) -> Option<(f32, f32, f32, f32)> {
    if size.0 == 0 || size.1 == 0 {
        return None;
    }

    let (surface_w, surface_h) = (size.0 as f32, size.1 as f32);
    let cell_px = (surface_w / grid.width() as f32).min(surface_h / grid.height() as f32);

    let cell_w = 2.0 * cell_px / surface_w;
    let cell_h = 2.0 * cell_px / surface_h;

    let left = -(cell_w * grid.width() as f32) / 2.0;
    let top = (cell_h * grid.height() as f32) / 2.0;

    Some((cell_w, cell_h, left, top))
}

/// Two triangles per cell, rows top to bottom.
pub fn grid_vertices(
    grid: &Grid,
    highlight: Option<Coord>,
    palette: &Palette,
    size: (u32, u32),
) -> Vec<Vertex> {
    let (cell_w, cell_h, left, top) = match ndc_params(grid, size) {
        Some(params) => params,
        None => return Vec::new(),
    };

    let mut verts = Vec::with_capacity(grid.width() * grid.height() * 6);
    for ((x, y), passage) in grid.cells() {
        let color = if highlight == Some((x, y)) {
            palette.highlight
        } else {
            palette.color_of(passage)
        };

        let low_x = left + x as f32 * cell_w;
        let up_x = low_x + cell_w;
        let up_y = top - y as f32 * cell_h;
        let low_y = up_y - cell_h;

        verts.extend_from_slice(&[
            // lower left triangle
            Vertex {
                position: [low_x, low_y],
                color,
            },
            Vertex {
                position: [up_x, low_y],
                color,
            },
            Vertex {
                position: [low_x, up_y],
                color,
            },
            // upper right triangle
            Vertex {
                position: [low_x, up_y],
                color,
            },
            Vertex {
                position: [up_x, low_y],
                color,
            },
            Vertex {
                position: [up_x, up_y],
                color,
            },
        ]);
    }

    verts
}
