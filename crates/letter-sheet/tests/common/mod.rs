#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::path::Path;

pub const CELL: u32 = 60;
pub const COLS: u32 = 9;
pub const ROWS: u32 = 3;

/// White sheet with a 20x20 black square in the first `filled` grid cells.
pub fn grid_sheet(filled: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(CELL * COLS, CELL * ROWS, Luma([255]));
    for i in 0..filled.min(COLS * ROWS) {
        let (x0, y0) = ((i % COLS) * CELL + 20, (i / COLS) * CELL + 20);
        for y in y0..y0 + 20 {
            for x in x0..x0 + 20 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    }
    img
}

pub fn write_sheet(path: &Path, filled: u32) {
    grid_sheet(filled).save(path).expect("save sheet");
}

pub fn count_files(dir: &Path, ext: &str) -> usize {
    std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == ext))
        .count()
}
