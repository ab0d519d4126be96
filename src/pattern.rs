//! Test patterns for checking a freshly initialized panel.

use itertools::iproduct;

use crate::command::consts::*;
use crate::display::FrameBuffer;

/// Fill `frame` with a checkerboard of 8x8 pixel squares. A byte covers 8 rows of one column,
/// so each square is one page tall and 8 columns wide.
pub fn checkerboard(frame: &mut FrameBuffer) {
    for (byte, (page, column)) in frame.iter_mut().zip(iproduct!(0..PAGES, 0..WIDTH)) {
        *byte = if (page & 1) ^ ((column >> 3) & 1) != 0 {
            0xFF
        } else {
            0x00
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(frame: &FrameBuffer, page: usize, column: usize) -> u8 {
        frame[page * WIDTH as usize + column]
    }

    #[test]
    fn checkerboard_squares() {
        let mut frame = [0x55u8; FRAME_SIZE];
        checkerboard(&mut frame);
        assert_eq!(at(&frame, 0, 0), 0x00);
        assert_eq!(at(&frame, 0, 7), 0x00);
        assert_eq!(at(&frame, 0, 8), 0xFF);
        assert_eq!(at(&frame, 1, 0), 0xFF);
        assert_eq!(at(&frame, 1, 8), 0x00);
        assert_eq!(at(&frame, 7, 127), 0x00);
        assert_eq!(at(&frame, 6, 127), 0xFF);
        assert_eq!(frame.iter().filter(|&&b| b == 0xFF).count(), FRAME_SIZE / 2);
        assert!(frame.iter().all(|&b| b == 0x00 || b == 0xFF));
    }
}
