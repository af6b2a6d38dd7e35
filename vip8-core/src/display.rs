use std::io;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome screen, one byte per pixel holding 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    cells: [u8; WIDTH * HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            cells: [0; WIDTH * HEIGHT],
        }
    }
}

impl Framebuffer {
    pub fn clear(&mut self) {
        self.cells = [0; WIDTH * HEIGHT];
    }

    /// Pixel at `(x, y)`, with both coordinates wrapped onto the screen.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.cells[Self::index(x, y)]
    }

    /// XORs one pixel on, wrapping both coordinates. Returns true when the
    /// pixel was already lit, i.e. the sprite collided with it.
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let cell = &mut self.cells[Self::index(x, y)];
        let collided = *cell == 1;
        *cell ^= 1;
        collided
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(WIDTH)
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == 1).count()
    }

    fn index(x: usize, y: usize) -> usize {
        (y % HEIGHT) * WIDTH + (x % WIDTH)
    }
}

/// Rendering collaborator: receives a frame whenever the draw flag was set.
pub trait Display {
    fn present(&mut self, framebuffer: &Framebuffer) -> io::Result<()>;
}
