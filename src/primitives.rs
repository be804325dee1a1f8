use core::convert::Infallible;
use core::mem::swap;

use embedded_hal::digital::OutputPin;
#[cfg(not(feature = "async"))]
use embedded_hal::spi::SpiDevice;
#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiDevice;

use crate::color::Color;
use crate::display::Ili9341;
use crate::{Error, Timer};

// Every shape bottoms out in single pixel writes. Public calls keep drawing
// past failed writes and report the first failure once they are done.
//
// Shape arithmetic runs in i64 so no i32 coordinate can overflow it; points
// are truncated to the 16-bit address registers when written.
#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Ili9341",),
    async(feature = "async", keep_self)
)]
impl<SPI, DC, RST, E, TIMER> Ili9341<SPI, DC, RST, TIMER>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    pub async fn pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), Error<E>> {
        self.plot(x, y, color).await;
        self.settle()
    }

    /// Bresenham line, both endpoints included.
    pub async fn line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) -> Result<(), Error<E>> {
        self.draw_line(x0.into(), y0.into(), x1.into(), y1.into(), color)
            .await;
        self.settle()
    }

    /// Vertical line of `len` pixels going down from `(x, y)`.
    pub async fn line_vertical(&mut self, x: i32, y: i32, len: i32, color: Color) -> Result<(), Error<E>> {
        self.draw_fast_vline(x.into(), y.into(), len.into(), color).await;
        self.settle()
    }

    /// Horizontal line of `len` pixels going right from `(x, y)`.
    pub async fn line_horizontal(&mut self, x: i32, y: i32, len: i32, color: Color) -> Result<(), Error<E>> {
        self.draw_fast_hline(x.into(), y.into(), len.into(), color).await;
        self.settle()
    }

    /// Triangle outline.
    #[allow(clippy::too_many_arguments)]
    pub async fn triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<(), Error<E>> {
        let (x0, y0, x1, y1, x2, y2) = (x0.into(), y0.into(), x1.into(), y1.into(), x2.into(), y2.into());
        self.draw_line(x0, y0, x1, y1, color).await;
        self.draw_line(x1, y1, x2, y2, color).await;
        self.draw_line(x0, y0, x2, y2, color).await;
        self.settle()
    }

    /// Rectangle outline. Corner pixels are written twice.
    pub async fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> Result<(), Error<E>> {
        let (x, y, w, h) = (i64::from(x), i64::from(y), i64::from(w), i64::from(h));
        self.draw_fast_hline(x, y, w, color).await;
        self.draw_fast_hline(x, y + h - 1, w, color).await;
        self.draw_fast_vline(x, y, h, color).await;
        self.draw_fast_vline(x + w - 1, y, h, color).await;
        self.settle()
    }

    pub async fn rect_filled(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> Result<(), Error<E>> {
        self.draw_fill_rect(x.into(), y.into(), w.into(), h.into(), color)
            .await;
        self.settle()
    }

    /// Midpoint circle outline.
    pub async fn circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) -> Result<(), Error<E>> {
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        self.put(x0, y0 + r, color).await;
        self.put(x0, y0 - r, color).await;
        self.put(x0 + r, y0, color).await;
        self.put(x0 - r, y0, color).await;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.put(x0 + x, y0 + y, color).await;
            self.put(x0 - x, y0 + y, color).await;
            self.put(x0 + x, y0 - y, color).await;
            self.put(x0 - x, y0 - y, color).await;
            self.put(x0 + y, y0 + x, color).await;
            self.put(x0 - y, y0 + x, color).await;
            self.put(x0 + y, y0 - x, color).await;
            self.put(x0 - y, y0 - x, color).await;
        }
        self.settle()
    }

    /// Filled circle from vertical spans.
    pub async fn circle_filled(&mut self, x0: i32, y0: i32, r: i32, color: Color) -> Result<(), Error<E>> {
        let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(r));
        let mut x = -r;
        let mut y = 0;
        let mut err = 2 - 2 * r;

        loop {
            self.draw_fast_vline(x0 - x, y0 - y, 2 * y, color).await;
            self.draw_fast_vline(x0 + x, y0 - y, 2 * y, color).await;

            let mut e2 = err;
            if e2 <= y {
                y += 1;
                err += y * 2 + 1;
                // Equator pixel coverage depends on this forced reset
                if -x == y && e2 <= x {
                    e2 = 0;
                }
            }
            if e2 > x {
                x += 1;
                err += x * 2 + 1;
            }
            if x > 0 {
                break;
            }
        }
        self.settle()
    }

    async fn put(&mut self, x: i64, y: i64, color: Color) {
        self.plot(x as i32, y as i32, color).await;
    }

    async fn draw_line(&mut self, mut x0: i64, mut y0: i64, mut x1: i64, mut y1: i64, color: Color) {
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            swap(&mut x0, &mut y0);
            swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            swap(&mut x0, &mut x1);
            swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let mut err = dx / 2;
        let ystep = if y0 < y1 { 1 } else { -1 };

        while x0 <= x1 {
            if steep {
                self.put(y0, x0, color).await;
            } else {
                self.put(x0, y0, color).await;
            }
            err -= dy;
            if err < 0 {
                y0 += ystep;
                err += dx;
            }
            x0 += 1;
        }
    }

    // A zero length still draws from `y - 1` to `y`, like any other line
    async fn draw_fast_vline(&mut self, x: i64, y: i64, len: i64, color: Color) {
        self.draw_line(x, y, x, y + len - 1, color).await;
    }

    async fn draw_fast_hline(&mut self, x: i64, y: i64, len: i64, color: Color) {
        self.draw_line(x, y, x + len - 1, y, color).await;
    }

    pub(crate) async fn draw_fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Color) {
        for column in x..x + w {
            self.draw_fast_vline(column, y, h, color).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use proptest::prelude::*;

    use super::*;
    use crate::mock;

    const RED: Color = Color(0xF800);

    #[test]
    fn test_pixel() {
        let (mut display, log) = mock::display();
        display.pixel(5, 6, RED).unwrap();
        assert_eq!(mock::pixels(&log), [(5, 6, 0xF800)]);
    }

    #[test]
    fn test_line_horizontal_and_diagonal() {
        let (mut display, log) = mock::display();
        display.line(0, 0, 3, 0, RED).unwrap();
        assert_eq!(mock::coverage(&log), [(0, 0), (1, 0), (2, 0), (3, 0)]);

        log.borrow_mut().clear();
        display.line(0, 0, 3, 3, RED).unwrap();
        assert_eq!(mock::coverage(&log), [(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_line_shallow_slope() {
        let (mut display, log) = mock::display();
        display.line(0, 0, 4, 2, RED).unwrap();
        // err starts at 2: steps at x=1 and x=3
        let points: Vec<(i32, i32)> = mock::pixels(&log).iter().map(|p| (p.0, p.1)).collect();
        assert_eq!(points, [(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]);
    }

    #[test]
    fn test_line_steep_plots_unswapped() {
        let (mut display, log) = mock::display();
        display.line(0, 0, 1, 3, RED).unwrap();
        let points: Vec<(i32, i32)> = mock::pixels(&log).iter().map(|p| (p.0, p.1)).collect();
        assert_eq!(points, [(0, 0), (0, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_fast_lines() {
        let (mut display, log) = mock::display();
        display.line_vertical(2, 3, 3, RED).unwrap();
        assert_eq!(mock::coverage(&log), [(2, 3), (2, 4), (2, 5)]);

        log.borrow_mut().clear();
        display.line_horizontal(2, 3, 2, RED).unwrap();
        assert_eq!(mock::coverage(&log), [(2, 3), (3, 3)]);
    }

    #[test]
    fn test_zero_length_line_reaches_back() {
        let (mut display, log) = mock::display();
        display.line_vertical(4, 4, 0, RED).unwrap();
        assert_eq!(mock::coverage(&log), [(4, 3), (4, 4)]);
    }

    #[test]
    fn test_rect_outline() {
        let (mut display, log) = mock::display();
        display.rect(10, 20, 4, 3, RED).unwrap();

        let pixels = mock::pixels(&log);
        assert_eq!(pixels.len(), 2 * 4 + 2 * 3);

        let coverage = mock::coverage(&log);
        assert_eq!(coverage.len(), 2 * 4 + 2 * 3 - 4);
        for corner in [(10, 20), (13, 20), (10, 22), (13, 22)] {
            assert_eq!(pixels.iter().filter(|p| (p.0, p.1) == corner).count(), 2);
        }
        assert!(!coverage.contains(&(11, 21)));
    }

    #[test]
    fn test_rect_filled_covers_area_once() {
        let (mut display, log) = mock::display();
        display.rect_filled(3, 4, 5, 6, RED).unwrap();

        let pixels = mock::pixels(&log);
        assert_eq!(pixels.len(), 5 * 6);
        let mut expected = Vec::new();
        for i in 3..8 {
            for j in 4..10 {
                expected.push((i, j));
            }
        }
        assert_eq!(mock::coverage(&log), expected);
        assert!(pixels.iter().all(|p| p.2 == 0xF800));
    }

    #[test]
    fn test_triangle_is_three_lines() {
        let (mut display, log) = mock::display();
        display.triangle(0, 0, 4, 0, 0, 4, RED).unwrap();
        let coverage = mock::coverage(&log);
        assert!(coverage.contains(&(2, 0)));
        assert!(coverage.contains(&(0, 2)));
        assert!(coverage.contains(&(2, 2)));
        assert!(!coverage.contains(&(1, 1)));
    }

    #[test]
    fn test_circle_zero_radius() {
        let (mut display, log) = mock::display();
        display.circle(7, 8, 0, RED).unwrap();
        assert_eq!(mock::pixels(&log), [(7, 8, 0xF800); 4]);
    }

    #[test]
    fn test_circle_radius_two() {
        let (mut display, log) = mock::display();
        display.circle(0, 0, 2, RED).unwrap();
        let expected = [
            (-2, -1),
            (-2, 0),
            (-2, 1),
            (-1, -2),
            (-1, 2),
            (0, -2),
            (0, 2),
            (1, -2),
            (1, 2),
            (2, -1),
            (2, 0),
            (2, 1),
        ];
        assert_eq!(mock::coverage(&log), expected);
    }

    #[test]
    fn test_circle_filled_radius_one() {
        let (mut display, log) = mock::display();
        display.circle_filled(5, 5, 1, RED).unwrap();
        // Zero length spans at the equator reach one pixel up
        assert_eq!(
            mock::coverage(&log),
            [(4, 4), (4, 5), (5, 4), (5, 5), (6, 4), (6, 5)]
        );
    }

    // Pixel order of a run of vertical spans `(x, y, len)`
    fn span_pixels(spans: &[(i32, i32, i32)]) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for &(x, y, len) in spans {
            let end = y + len - 1;
            for row in y.min(end)..=y.max(end) {
                out.push((x, row));
            }
        }
        out
    }

    #[test]
    fn test_circle_filled_equator_reset_radius_four() {
        let (mut display, log) = mock::display();
        display.circle_filled(50, 50, 4, RED).unwrap();
        // Without the forced reset an extra pair of (53|47, 47, 6) spans appears
        let spans = [
            (54, 50, 0),
            (46, 50, 0),
            (54, 49, 2),
            (46, 49, 2),
            (53, 48, 4),
            (47, 48, 4),
            (52, 47, 6),
            (48, 47, 6),
            (51, 46, 8),
            (49, 46, 8),
            (50, 46, 8),
            (50, 46, 8),
        ];
        let points: Vec<(i32, i32)> = mock::pixels(&log).iter().map(|p| (p.0, p.1)).collect();
        assert_eq!(points.len(), 60);
        assert_eq!(points, span_pixels(&spans));
    }

    #[test]
    fn test_circle_filled_equator_reset_radius_eleven() {
        let (mut display, log) = mock::display();
        display.circle_filled(50, 50, 11, RED).unwrap();
        let spans = [
            (61, 50, 0),
            (39, 50, 0),
            (61, 49, 2),
            (39, 49, 2),
            (61, 48, 4),
            (39, 48, 4),
            (61, 47, 6),
            (39, 47, 6),
            (60, 46, 8),
            (40, 46, 8),
            (60, 45, 10),
            (40, 45, 10),
            (59, 44, 12),
            (41, 44, 12),
            (58, 43, 14),
            (42, 43, 14),
            (57, 42, 16),
            (43, 42, 16),
            (56, 41, 18),
            (44, 41, 18),
            (55, 40, 20),
            (45, 40, 20),
            (54, 40, 20),
            (46, 40, 20),
            (53, 39, 22),
            (47, 39, 22),
            (52, 39, 22),
            (48, 39, 22),
            (51, 39, 22),
            (49, 39, 22),
            (50, 39, 22),
            (50, 39, 22),
        ];
        let points: Vec<(i32, i32)> = mock::pixels(&log).iter().map(|p| (p.0, p.1)).collect();
        assert_eq!(points.len(), 440);
        assert_eq!(points, span_pixels(&spans));
    }

    #[test]
    fn test_extreme_coordinates_truncate_to_registers() {
        let (mut display, log) = mock::display();
        display.circle(0, 0, i32::MIN, RED).unwrap();
        // Every cardinal point lands on a multiple of 0x10000
        assert_eq!(mock::pixels(&log), [(0, 0, 0xF800); 4]);

        log.borrow_mut().clear();
        display.rect_filled(i32::MAX - 1, 0, 3, 2, RED).unwrap();
        assert_eq!(
            mock::coverage(&log),
            [(-2, 0), (-2, 1), (-1, 0), (-1, 1), (0, 0), (0, 1)]
        );

        log.borrow_mut().clear();
        display.circle_filled(0, 0, i32::MIN, RED).unwrap();
        assert_eq!(mock::pixels(&log).len(), 4);
    }

    #[test]
    fn test_drawing_continues_past_failed_writes() {
        let (mut display, log) = mock::display();
        // Second pixel loses its first byte, the rest go through
        mock::fail_transfers(13..14);
        assert!(display.rect_filled(0, 0, 2, 2, RED).is_err());
        assert_eq!(mock::pixels(&log).len(), 3);
        assert_eq!(display.dropped_writes(), 1);

        display.pixel(9, 9, RED).unwrap();
    }

    fn mirrored(points: &[(i32, i32)], cx: i32, cy: i32, flip_x: bool, flip_y: bool) -> Vec<(i32, i32)> {
        let mut out: Vec<(i32, i32)> = points
            .iter()
            .map(|&(x, y)| {
                (
                    if flip_x { 2 * cx - x } else { x },
                    if flip_y { 2 * cy - y } else { y },
                )
            })
            .collect();
        out.sort_unstable();
        out
    }

    proptest! {
        #[test]
        fn prop_line_endpoint_symmetry(
            x0 in -50i32..200,
            y0 in -50i32..200,
            x1 in -50i32..200,
            y1 in -50i32..200
        ) {
            let (mut forward, forward_log) = mock::display();
            forward.line(x0, y0, x1, y1, RED).unwrap();
            let (mut backward, backward_log) = mock::display();
            backward.line(x1, y1, x0, y0, RED).unwrap();

            prop_assert_eq!(mock::coverage(&forward_log), mock::coverage(&backward_log));
            let covered = mock::coverage(&forward_log);
            prop_assert!(covered.contains(&(x0, y0)));
            prop_assert!(covered.contains(&(x1, y1)));
        }

        #[test]
        fn prop_circle_reflection_symmetry(
            cx in 0i32..100,
            cy in 0i32..100,
            r in 1i32..40
        ) {
            let (mut display, log) = mock::display();
            display.circle(cx, cy, r, RED).unwrap();
            let covered = mock::coverage(&log);

            prop_assert_eq!(&mirrored(&covered, cx, cy, true, false), &covered);
            prop_assert_eq!(&mirrored(&covered, cx, cy, false, true), &covered);
        }
    }
}
