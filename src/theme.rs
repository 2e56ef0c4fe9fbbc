use ratatui::style::Color;

// Host palette. Accent colors go through `rgb_to_color` so terminals without
// truecolor get the nearest xterm-256 entry.

pub const ACCENT_RGB: (u8, u8, u8) = (255, 165, 0);
pub const SELECTION_RGB: (u8, u8, u8) = (56, 189, 248);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    if truecolor() {
        return Color::Rgb(rgb.0, rgb.1, rgb.2);
    }
    Color::Indexed(xterm_index(rgb))
}

fn truecolor() -> bool {
    std::env::var("COLORTERM").is_ok_and(|v| {
        let v = v.to_ascii_lowercase();
        v.contains("truecolor") || v.contains("24bit")
    })
}

/// Nearest entry of the 6x6x6 cube (16..=231) or the gray ramp (232..=255).
fn xterm_index((r, g, b): (u8, u8, u8)) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube = (
        LEVELS[r6 as usize],
        LEVELS[g6 as usize],
        LEVELS[b6 as usize],
    );
    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_step = ((avg as u16 * 23 + 127) / 255) as u8;
    let gray = (8 + gray_step as u16 * 10).min(255) as u8;
    if distance_sq((r, g, b), (gray, gray, gray)) < distance_sq((r, g, b), cube) {
        232 + gray_step
    } else {
        16 + 36 * r6 + 6 * g6 + b6
    }
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn selection() -> Color {
    rgb_to_color(SELECTION_RGB)
}

// Canvas frames
pub fn canvas_border() -> Color {
    Color::DarkGray
}
pub fn canvas_title() -> Color {
    Color::White
}
pub fn canvas_drop_target() -> Color {
    accent()
}

// Tiles
pub fn tile_border() -> Color {
    Color::Gray
}
pub fn tile_label() -> Color {
    Color::White
}
pub fn remove_control() -> Color {
    Color::LightRed
}

// Sidebar / status
pub fn sidebar_fg() -> Color {
    Color::Gray
}
pub fn sidebar_active_fg() -> Color {
    Color::Black
}
pub fn sidebar_active_bg() -> Color {
    accent()
}
pub fn status_bg() -> Color {
    Color::DarkGray
}
pub fn status_fg() -> Color {
    Color::White
}
pub fn notice_fg() -> Color {
    Color::LightYellow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_and_gray_extremes() {
        assert_eq!(xterm_index((255, 0, 0)), 196);
        assert_eq!(xterm_index((0, 0, 255)), 21);
        // mid gray is closer to the ramp than to the cube
        assert!((232..=255).contains(&xterm_index((128, 128, 128))));
    }

    #[test]
    fn accent_is_a_concrete_color() {
        assert!(matches!(accent(), Color::Rgb(..) | Color::Indexed(_)));
    }
}
