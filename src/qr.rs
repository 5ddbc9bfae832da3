use std::io::Cursor;

use base64::Engine as _;
use image::{Rgb, RgbImage};
use qrcode::{Color, QrCode};

use crate::config::QrSettings;
use crate::error::Error;

/// Encode `url` as a QR PNG data URI, with the module colors and target
/// pixel size from `settings`. A four-module quiet zone is always included.
pub fn data_uri(url: &str, settings: &QrSettings) -> Result<String, Error> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| Error::Qr(e.to_string()))?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let dark = parse_hex(&settings.dark).unwrap_or([17, 24, 39]);
    let light = parse_hex(&settings.light).unwrap_or([255, 255, 255]);

    const QUIET: u32 = 4;
    let target = settings.size.max(32.0) as u32;
    let scale = (target / (modules + 2 * QUIET)).max(1);
    let dim = (modules + 2 * QUIET) * scale;

    let mut img = RgbImage::from_pixel(dim, dim, Rgb(light));
    for (i, color) in colors.iter().enumerate() {
        if !matches!(color, Color::Dark) {
            continue;
        }
        let mx = (i as u32 % modules + QUIET) * scale;
        let my = (i as u32 / modules + QUIET) * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(mx + dx, my + dy, Rgb(dark));
            }
        }
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| Error::Qr(e.to_string()))?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ))
}

fn parse_hex(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_a_png_data_uri() {
        let uri = data_uri(
            "https://example.invalid/contracts/2025-114",
            &QrSettings::default(),
        )
        .unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.len() > 100);
    }

    #[test]
    fn bad_hex_falls_back_to_defaults() {
        let settings = QrSettings {
            dark: "not-a-color".to_string(),
            ..QrSettings::default()
        };
        // Still renders; the color fallback is silent.
        assert!(data_uri("https://example.invalid/x", &settings).is_ok());
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#0f172a"), Some([15, 23, 42]));
        assert_eq!(parse_hex("0f172a"), None);
        assert_eq!(parse_hex("#zzz"), None);
    }
}
