use crate::error::EditError;
use crate::scene::rgb_from_hex;

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("cyan", 0x00ffff),
    ("magenta", 0xff00ff),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("gray", 0x808080),
    ("grey", 0x808080),
];

/// Parse a CSS-style color: `#rrggbb`, `#rgb`, `rgb(r, g, b)` or a basic name.
pub fn parse_color(input: &str) -> Result<[f32; 3], EditError> {
    let s = input.trim().to_ascii_lowercase();
    let malformed = || EditError::MalformedColor(input.to_string());

    if let Some(hex) = s.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let value = match hex.len() {
            6 => u32::from_str_radix(hex, 16).map_err(|_| malformed())?,
            3 => {
                let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&doubled, 16).map_err(|_| malformed())?
            }
            _ => return Err(malformed()),
        };
        return Ok(rgb_from_hex(value));
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        let channels: Vec<u8> = body
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| malformed())?;
        let [r, g, b] = channels[..] else {
            return Err(malformed());
        };
        return Ok([r, g, b].map(|c| c as f32 / 255.0));
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == s)
        .map(|&(_, hex)| rgb_from_hex(hex))
        .ok_or_else(malformed)
}
