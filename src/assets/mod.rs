/// Custom icon probing and decoding (PNG, GIF, SVG).
pub mod decode;
