//! Coin pattern library
//!
//! Pure point-set generators. Every function returns offsets relative to a
//! center (or origin, for text); `World::spawn_coin_points` turns them into
//! coins. Nothing here knows about scrolling or scheduling.

use std::f32::consts::TAU;

use glam::Vec2;

/// Decorative pattern dropped into open space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GapPattern {
    Line { vertical: bool },
    Circle { radius: f32 },
    Diamond { size: f32 },
    Wave { width: f32 },
    /// `lift` shifts the whole heart down so it sits visually centered
    Heart { scale: f32, lift: f32 },
}

/// Patterns used between sets
pub const GAP_PATTERNS: [GapPattern; 6] = [
    GapPattern::Line { vertical: false },
    GapPattern::Line { vertical: true },
    GapPattern::Circle { radius: 54.0 },
    GapPattern::Diamond { size: 60.0 },
    GapPattern::Wave { width: 160.0 },
    GapPattern::Heart { scale: 1.4, lift: 0.0 },
];

/// Patterns placed inside a set's opening
pub const SET_PATTERNS: [GapPattern; 4] = [
    GapPattern::Line { vertical: false },
    GapPattern::Circle { radius: 54.0 },
    GapPattern::Wave { width: 220.0 },
    GapPattern::Heart { scale: 1.4, lift: 40.0 },
];

impl GapPattern {
    pub fn points(&self) -> Vec<Vec2> {
        match *self {
            GapPattern::Line { vertical } => line(vertical),
            GapPattern::Circle { radius } => circle(radius),
            GapPattern::Diamond { size } => diamond(size),
            GapPattern::Wave { width } => wave(width),
            GapPattern::Heart { scale, lift } => heart(scale)
                .into_iter()
                .map(|p| p + Vec2::new(0.0, lift))
                .collect(),
        }
    }
}

pub const LINE_COUNT: usize = 7;
pub const LINE_SPACING: f32 = 35.0;
pub const CIRCLE_COUNT: usize = 12;
pub const WAVE_COUNT: usize = 9;
pub const WAVE_AMP: f32 = 50.0;

/// Seven points centered on the origin
pub fn line(vertical: bool) -> Vec<Vec2> {
    let half = (LINE_COUNT / 2) as f32;
    (0..LINE_COUNT)
        .map(|i| {
            let d = (i as f32 - half) * LINE_SPACING;
            if vertical { Vec2::new(0.0, d) } else { Vec2::new(d, 0.0) }
        })
        .collect()
}

/// Twelve points evenly spaced by angle, starting at +x
pub fn circle(radius: f32) -> Vec<Vec2> {
    (0..CIRCLE_COUNT)
        .map(|i| {
            let angle = TAU * i as f32 / CIRCLE_COUNT as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Eight points: the four tips plus the four rounded shoulders
pub fn diamond(size: f32) -> Vec<Vec2> {
    let s = size;
    let k = size * 0.8;
    vec![
        Vec2::new(0.0, -s),
        Vec2::new(k, -k),
        Vec2::new(s, 0.0),
        Vec2::new(k, k),
        Vec2::new(0.0, s),
        Vec2::new(-k, k),
        Vec2::new(-s, 0.0),
        Vec2::new(-k, -k),
    ]
}

/// Nine points over one full sine period
pub fn wave(width: f32) -> Vec<Vec2> {
    let last = (WAVE_COUNT - 1) as f32;
    let step = width / last;
    (0..WAVE_COUNT)
        .map(|i| {
            let t = i as f32 / last * TAU;
            Vec2::new(-width / 2.0 + i as f32 * step, t.sin() * WAVE_AMP)
        })
        .collect()
}

const HEART: [(f32, f32); 13] = [
    (0.0, -10.0),
    (-10.0, -20.0),
    (-20.0, -25.0),
    (-25.0, -35.0),
    (-20.0, -45.0),
    (-10.0, -48.0),
    (0.0, -45.0),
    (10.0, -48.0),
    (20.0, -45.0),
    (25.0, -35.0),
    (20.0, -25.0),
    (10.0, -20.0),
    (0.0, -10.0),
];

/// Thirteen-point heart outline (the bottom tip is visited twice)
pub fn heart(scale: f32) -> Vec<Vec2> {
    HEART.iter().map(|&(x, y)| Vec2::new(x, y) * scale).collect()
}

/// Coin arc over a platform: alternating up/down, phase set by stair direction
pub fn arc_points(count: u32, spacing: f32, amp: f32, ascending: bool) -> Vec<Vec2> {
    let total = (count.saturating_sub(1)) as f32 * spacing;
    (0..count)
        .map(|i| {
            let even = i % 2 == 0;
            let dy = match (ascending, even) {
                (true, true) | (false, false) => amp,
                _ => -amp,
            };
            Vec2::new(-total / 2.0 + i as f32 * spacing, dy)
        })
        .collect()
}

/// Grid whose top row is centered on the origin
pub fn grid_points(cols: u32, rows: u32, spacing: f32) -> Vec<Vec2> {
    let x0 = -((cols.saturating_sub(1)) as f32 * spacing / 2.0);
    (0..rows)
        .flat_map(|r| (0..cols).map(move |c| Vec2::new(x0 + c as f32 * spacing, r as f32 * spacing)))
        .collect()
}

pub const GLYPH_COLS: usize = 5;
pub const GLYPH_ROWS: usize = 7;

type Glyph = [&'static str; GLYPH_ROWS];

const BLANK: Glyph = [".....", ".....", ".....", ".....", ".....", ".....", "....."];

fn glyph(ch: char) -> &'static Glyph {
    match ch.to_ascii_uppercase() {
        'A' => &[".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'B' => &["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."],
        'C' => &[".####", "#....", "#....", "#....", "#....", "#....", ".####"],
        'D' => &["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        'E' => &["#####", "#....", "###..", "#....", "#....", "#....", "#####"],
        'F' => &["#####", "#....", "#....", "####.", "#....", "#....", "#...."],
        'G' => &[".####", "#....", "#....", "#..##", "#...#", "#...#", ".###."],
        'H' => &["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'I' => &["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "#####"],
        'J' => &["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."],
        'K' => &["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"],
        'L' => &["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'M' => &["#...#", "##.##", "#.#.#", "#.#.#", "#...#", "#...#", "#...#"],
        'N' => &["#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#", "#...#"],
        'O' => &[".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'P' => &["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."],
        'Q' => &[".###.", "#...#", "#...#", "#...#", "#.#.#", "#..#.", ".##.#"],
        'R' => &["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'S' => &[".####", "#....", "#....", ".###.", "....#", "....#", "####."],
        'T' => &["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'U' => &["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'V' => &["#...#", "#...#", "#...#", "#...#", ".#.#.", ".#.#.", "..#.."],
        'W' => &["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "##.##", "#...#"],
        'X' => &["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"],
        'Y' => &["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."],
        'Z' => &["#####", "....#", "...#.", "..#..", ".#...", "#....", "#####"],
        '0' => &[".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
        '1' => &["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => &[".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => &["####.", "....#", "....#", ".###.", "....#", "....#", "####."],
        '4' => &["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
        '5' => &["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
        '6' => &[".###.", "#....", "#....", "####.", "#...#", "#...#", ".###."],
        '7' => &["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
        '8' => &[".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
        '9' => &[".###.", "#...#", "#...#", ".####", "....#", "....#", ".###."],
        '!' => &["..#..", "..#..", "..#..", "..#..", "..#..", ".....", "..#.."],
        _ => &BLANK,
    }
}

/// Coin positions for a line of text plus its advance width
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Offsets from the text origin (top-left of the first glyph)
    pub points: Vec<Vec2>,
    pub width: f32,
}

/// Lay out `text` in the 5x7 dot font; unknown characters render blank
pub fn text_points(text: &str, cell: f32, kern: f32) -> TextLayout {
    let mut points = Vec::new();
    let mut x = 0.0;
    for ch in text.chars() {
        let g = glyph(ch);
        for (r, row) in g.iter().enumerate() {
            for (c, dot) in row.bytes().enumerate() {
                if dot == b'#' {
                    points.push(Vec2::new(x + c as f32 * cell, r as f32 * cell));
                }
            }
        }
        x += GLYPH_COLS as f32 * cell + kern;
    }
    TextLayout { points, width: x }
}
