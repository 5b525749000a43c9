//! Hex color parsing shared by overlays and keying effects.

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` or `0x` optional)
/// into RGBA bytes.
pub fn parse_hex_color(raw: &str) -> Option<[u8; 4]> {
    let hex = raw.trim();
    let hex = hex
        .strip_prefix('#')
        .or_else(|| hex.strip_prefix("0x"))
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        6 => Some([
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            255,
        ]),
        8 => Some([
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        ]),
        _ => None,
    }
}

/// Format RGB bytes the way ffmpeg color options expect (`0xRRGGBB`).
pub fn to_ffmpeg_color(rgba: [u8; 4]) -> String {
    format!("0x{:02X}{:02X}{:02X}", rgba[0], rgba[1], rgba[2])
}
