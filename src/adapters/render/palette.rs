use image::Rgb;

/// Paleta por clase (la misma que usan los gráficos de Ultralytics).
const HEX: [&str; 20] = [
    "FF3838", "FF9D97", "FF701F", "FFB21D", "CFD231", "48F90A", "92CC17", "3DDB86", "1A9334", "00D4BB",
    "2C99A8", "00C2FF", "344593", "6473FF", "0018EC", "8438FF", "520085", "CB38FF", "FF95C8", "FF37C7",
];

pub fn class_color(class_id: usize) -> Rgb<u8> {
    hex_to_rgb(HEX[class_id % HEX.len()])
}

fn hex_to_rgb(hex: &str) -> Rgb<u8> {
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Rgb([channel(0), channel(2), channel(4)])
}
