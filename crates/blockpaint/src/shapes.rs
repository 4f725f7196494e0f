//! Bresenham-family drawing primitives.
//!
//! Every primitive plots through [`Surface::set_pixel`], so the same stroke
//! can go to the canonical [`Canvas`](crate::Canvas) or to a preview overlay,
//! and the block color rules apply to each plotted pixel. Strokes are clipped
//! to [`Surface::bounds`], so any `i32` coordinates are accepted.
//!
//! Algorithms follow Alois Zingl, "A Rasterizing Algorithm for Drawing Curves".

use crate::settings::Settings;

/// Something pixels can be painted onto.
pub trait Surface {
    /// Width and height in pixels. Strokes are clipped to this area.
    fn bounds(&self) -> (i32, i32);

    /// Paint one pixel. Off-surface coordinates are ignored.
    fn set_pixel(&mut self, px: i32, py: i32, color: u8, settings: &Settings);

    /// Flood the block under the pixel with one color.
    fn fill_block(&mut self, px: i32, py: i32, color: u8);
}

fn plot<S: Surface + ?Sized>(surface: &mut S, x: i64, y: i64, color: u8, settings: &Settings) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        surface.set_pixel(x, y, color, settings);
    }
}

// Incremental walkers run one step per pixel of radius. Past this size only
// the rows and columns the surface has are scanned.
fn walk_limit(bounds: (i32, i32)) -> i64 {
    2 * (i64::from(bounds.0) + i64::from(bounds.1))
}

/// Liang-Barsky clip against the surface grown by one pixel on every side.
/// Segments with both ends on the surface are returned unchanged.
fn clip_line(
    from: (i64, i64),
    to: (i64, i64),
    bounds: (i32, i32),
) -> Option<((i64, i64), (i64, i64))> {
    let (w, h) = (i64::from(bounds.0), i64::from(bounds.1));
    let inside = |(x, y): (i64, i64)| (0..w).contains(&x) && (0..h).contains(&y);
    if inside(from) && inside(to) {
        return Some((from, to));
    }

    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);
    let (min_x, max_x) = (-1.0, w as f64);
    let (min_y, max_y) = (-1.0, h as f64);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

/// Straight line including both end points.
pub fn line<S: Surface + ?Sized>(
    surface: &mut S,
    from: (i32, i32),
    to: (i32, i32),
    color: u8,
    settings: &Settings,
) {
    let from = (i64::from(from.0), i64::from(from.1));
    let to = (i64::from(to.0), i64::from(to.1));
    let Some(((mut x0, mut y0), (x1, y1))) = clip_line(from, to, surface.bounds()) else {
        return;
    };

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(surface, x0, y0, color, settings);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn distance(center: (i32, i32), edge: (i32, i32)) -> f64 {
    let dx = f64::from(center.0) - f64::from(edge.0);
    let dy = f64::from(center.1) - f64::from(edge.1);
    (dx * dx + dy * dy).sqrt()
}

/// Nearest and farthest distance from a point to the surface pixels.
fn reach(center: (i32, i32), bounds: (i32, i32)) -> (f64, f64) {
    let axis = |c: i32, len: i32| {
        let (c, hi) = (f64::from(c), f64::from(len - 1));
        let near = if c < 0.0 {
            -c
        } else if c > hi {
            c - hi
        } else {
            0.0
        };
        (near, c.abs().max((hi - c).abs()))
    };
    let (nx, fx) = axis(center.0, bounds.0);
    let (ny, fy) = axis(center.1, bounds.1);
    (nx.hypot(ny), fx.hypot(fy))
}

/// Ellipse outline by solving for each surface row and column it crosses.
fn scan_ellipse<S: Surface + ?Sized>(
    surface: &mut S,
    center: (f64, f64),
    radii: (f64, f64),
    color: u8,
    settings: &Settings,
) {
    let (w, h) = surface.bounds();
    let (cx, cy) = center;
    let (rx, ry) = radii;
    for py in 0..h {
        let t = (f64::from(py) - cy) / ry;
        if t.abs() <= 1.0 {
            let dx = rx * (1.0 - t * t).sqrt();
            for x in [cx - dx, cx + dx] {
                let x = x.round();
                if x >= 0.0 && x < f64::from(w) {
                    surface.set_pixel(x as i32, py, color, settings);
                }
            }
        }
    }
    for px in 0..w {
        let t = (f64::from(px) - cx) / rx;
        if t.abs() <= 1.0 {
            let dy = ry * (1.0 - t * t).sqrt();
            for y in [cy - dy, cy + dy] {
                let y = y.round();
                if y >= 0.0 && y < f64::from(h) {
                    surface.set_pixel(px, y as i32, color, settings);
                }
            }
        }
    }
}

/// Circle outline around `center` passing near `edge`.
pub fn circle<S: Surface + ?Sized>(
    surface: &mut S,
    center: (i32, i32),
    edge: (i32, i32),
    color: u8,
    settings: &Settings,
) {
    let bounds = surface.bounds();
    let radius = distance(center, edge).floor();
    let (near, far) = reach(center, bounds);
    if radius + 1.0 < near || radius > far + 1.0 {
        return;
    }

    let mut r = radius as i64;
    if r > walk_limit(bounds) {
        let center = (f64::from(center.0), f64::from(center.1));
        scan_ellipse(surface, center, (radius, radius), color, settings);
        return;
    }

    let (xm, ym) = (i64::from(center.0), i64::from(center.1));
    let mut x = -r;
    let mut y = 0;
    let mut err = 2 - 2 * r;

    loop {
        plot(surface, xm - x, ym + y, color, settings);
        plot(surface, xm - y, ym - x, color, settings);
        plot(surface, xm + x, ym - y, color, settings);
        plot(surface, xm + y, ym + x, color, settings);
        r = err;
        if r <= y {
            y += 1;
            err += y * 2 + 1;
        }
        if r > x || err > y {
            x += 1;
            err += x * 2 + 1;
        }
        if x >= 0 {
            break;
        }
    }
}

/// Solid disc around `center` reaching `edge`.
pub fn filled_circle<S: Surface + ?Sized>(
    surface: &mut S,
    center: (i32, i32),
    edge: (i32, i32),
    color: u8,
    settings: &Settings,
) {
    let (w, h) = surface.bounds();
    let (xm, ym) = (i64::from(center.0), i64::from(center.1));
    let radius = distance(center, edge).ceil();
    let r = radius as i64;

    let rows = (-r).max(-ym)..=r.min(i64::from(h) - 1 - ym);
    for y in rows {
        let yf = y as f64;
        let xx = (radius * radius - yf * yf).sqrt().round() as i64;
        for x in (-xx).max(-xm)..=xx.min(i64::from(w) - 1 - xm) {
            plot(surface, xm + x, ym + y, color, settings);
        }
    }
}

/// Ellipse outline inscribed in the rectangle spanned by two corners.
pub fn ellipse_rect<S: Surface + ?Sized>(
    surface: &mut S,
    corner0: (i32, i32),
    corner1: (i32, i32),
    color: u8,
    settings: &Settings,
) {
    let bounds = surface.bounds();
    let (mut x0, mut y0) = (i64::from(corner0.0), i64::from(corner0.1));
    let (mut x1, mut y1) = (i64::from(corner1.0), i64::from(corner1.1));
    let (w, h) = (i64::from(bounds.0), i64::from(bounds.1));
    if x0.max(x1) < 0 || x0.min(x1) >= w || y0.max(y1) < 0 || y0.min(y1) >= h {
        return;
    }

    let mut a = (x1 - x0).abs();
    let b = (y1 - y0).abs();
    if a.max(b) > walk_limit(bounds) {
        if a == 0 || b == 0 {
            line(surface, corner0, corner1, color, settings);
        } else {
            let center = ((x0 + x1) as f64 / 2.0, (y0 + y1) as f64 / 2.0);
            let radii = (a as f64 / 2.0, b as f64 / 2.0);
            scan_ellipse(surface, center, radii, color, settings);
        }
        return;
    }

    let mut b1 = b & 1;
    let mut dx = 4 * (1 - a) * b * b;
    let mut dy = 4 * (b1 + 1) * a * a;
    let mut err = dx + dy + b1 * a * a;

    if x0 > x1 {
        x0 = x1;
        x1 += a;
    }
    if y0 > y1 {
        y0 = y1;
    }
    y0 += (b + 1) / 2;
    y1 = y0 - b1;
    a *= 8 * a;
    b1 = 8 * b * b;

    loop {
        plot(surface, x1, y0, color, settings);
        plot(surface, x0, y0, color, settings);
        plot(surface, x0, y1, color, settings);
        plot(surface, x1, y1, color, settings);
        let e2 = 2 * err;
        if e2 <= dy {
            y0 += 1;
            y1 -= 1;
            dy += a;
            err += dy;
        }
        if e2 >= dx || 2 * err > dy {
            x0 += 1;
            x1 -= 1;
            dx += b1;
            err += dx;
        }
        if x0 > x1 {
            break;
        }
    }

    // flat ellipses stop too early, finish the tips
    while y0 - y1 < b {
        plot(surface, x0 - 1, y0, color, settings);
        plot(surface, x1 + 1, y0, color, settings);
        y0 += 1;
        plot(surface, x0 - 1, y1, color, settings);
        plot(surface, x1 + 1, y1, color, settings);
        y1 -= 1;
    }
}
