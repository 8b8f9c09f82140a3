use crate::core::data::colour::Colour;

/// Six-sector HSV to RGB. `hue` is in degrees `[0, 360)`, `saturation` and
/// `value` in `[0, 1]`; channels come back in `[0, 1]`.
#[must_use]
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (f64, f64, f64) {
    if saturation <= 0.0 {
        return (value, value, value);
    }

    let sector_pos = hue / 60.0;
    let sector = sector_pos as i32;
    let f = sector_pos.fract();

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    match sector {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    }
}

#[must_use]
pub fn hsv_to_colour(hue: f64, saturation: f64, value: f64) -> Colour {
    let (r, g, b) = hsv_to_rgb(hue, saturation, value);

    Colour::rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
