use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use ratatui::style::Color;

/// Colors for the debugger's four panes.
#[derive(Debug, Clone)]
pub struct Colors {
    pub tape_border: Color,
    pub tape_cell: Color,
    pub tape_cell_active: Color,
    pub tape_pointer: Color,

    pub output_border: Color,
    pub output_text: Color,

    pub code_border: Color,
    pub code_text: Color,
    pub code_active: Color,

    pub status_text: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            tape_border: Color::Gray,
            tape_cell: Color::White,
            tape_cell_active: Color::Yellow,
            tape_pointer: Color::Yellow,

            output_border: Color::Gray,
            output_text: Color::White,

            code_border: Color::Gray,
            code_text: Color::White,
            code_active: Color::Yellow,

            status_text: Color::White,
        }
    }
}

static COLORS: OnceLock<Colors> = OnceLock::new();

/// The process-wide color scheme: `{config_home}/bfi.toml` overrides on top
/// of the defaults, loaded once.
pub fn colors() -> &'static Colors {
    COLORS.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn load_from_toml() -> Option<Colors> {
    let base_dirs = BaseDirs::new().unwrap();
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bfi.toml");

    let content = fs::read_to_string(path).ok()?;
    Some(parse_colors_toml(&content))
}

/// Small hand-rolled parse: a `[colors]` section of `key = "value"` pairs,
/// values being `#RRGGBB` or a named color. Unknown keys are ignored.
fn parse_colors_toml(content: &str) -> Colors {
    let mut in_colors = false;
    let mut map: HashMap<&str, &str> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_colors = &line[1..line.len() - 1] == "colors";
            continue;
        }
        if !in_colors {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            map.insert(key.trim(), value);
        }
    }

    let mut cfg = Colors::default();

    macro_rules! set {
        ($field:ident) => {
            if let Some(c) = map.get(stringify!($field)).and_then(|s| parse_color(s)) {
                cfg.$field = c;
            }
        };
    }

    set!(tape_border);
    set!(tape_cell);
    set!(tape_cell_active);
    set!(tape_pointer);

    set!(output_border);
    set!(output_text);

    set!(code_border);
    set!(code_text);
    set!(code_active);

    set!(status_text);

    cfg
}

fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    Some(match s.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "dark_gray" | "darkgrey" | "dark_grey" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightmagenta" | "light_magenta" => Color::LightMagenta,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color("light_green"), Some(Color::LightGreen));
        assert_eq!(parse_color("  Cyan  "), Some(Color::Cyan));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("mauve"), None);
    }

    #[test]
    fn colors_section_overrides_only_named_keys() {
        let cfg = parse_colors_toml(
            r##"
[colors]
tape_pointer = "#ff0000"
status_text = "cyan"
not_a_key = "green"
"##,
        );
        assert_eq!(cfg.tape_pointer, Color::Rgb(255, 0, 0));
        assert_eq!(cfg.status_text, Color::Cyan);
        assert_eq!(cfg.tape_cell, Colors::default().tape_cell);
    }

    #[test]
    fn keys_outside_the_colors_section_are_ignored() {
        let cfg = parse_colors_toml("[other]\ntape_pointer = \"red\"\n");
        assert_eq!(cfg.tape_pointer, Colors::default().tape_pointer);
    }
}
