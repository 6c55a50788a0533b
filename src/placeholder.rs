//! 占位图生成。
//!
//! 根据路径中的尺寸生成 SVG 占位图，例如 `/api/placeholder/400/300` 或 `/api/placeholder/400x300`。

use crate::error::{Error, Result};

/// 单边允许的最大像素
pub const MAX_SIDE: u32 = 4000;

const DEFAULT_BG: &str = "#e5e7eb";
const DEFAULT_FG: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// 占位图可选参数
#[derive(Debug, Default, serde::Deserialize)]
pub struct PlaceholderOptions {
    pub text: Option<String>,
    pub bg: Option<String>,
    pub fg: Option<String>,
}

fn parse_side(s: &str) -> Result<u32> {
    let side: u32 = s
        .trim()
        .parse()
        .map_err(|_| Error::bad_request(format!("invalid dimension: {}", s)))?;
    if side == 0 || side > MAX_SIDE {
        return Err(Error::bad_request(format!(
            "dimension out of range 1..={}: {}",
            MAX_SIDE, side
        )));
    }
    Ok(side)
}

/// 解析路径中的尺寸
///
/// 支持 `["400", "300"]`、`["400x300"]` 与 `["400"]`（正方形）。
pub fn parse_dimensions(segments: &[&str]) -> Result<Dimensions> {
    let segments: Vec<&str> = segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [single] => match single.split_once(['x', 'X']) {
            Some((w, h)) => Ok(Dimensions {
                width: parse_side(w)?,
                height: parse_side(h)?,
            }),
            None => {
                let side = parse_side(single)?;
                Ok(Dimensions {
                    width: side,
                    height: side,
                })
            }
        },
        [w, h] => Ok(Dimensions {
            width: parse_side(w)?,
            height: parse_side(h)?,
        }),
        _ => Err(Error::bad_request("expected /{width}/{height} or /{width}x{height}")),
    }
}

/// 校验十六进制颜色，允许省略 `#`
fn parse_color(color: Option<&str>, default: &'static str) -> Result<String> {
    let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(default.to_string());
    };

    let hex = color.strip_prefix('#').unwrap_or(color);
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_ascii_lowercase()))
    } else {
        Err(Error::bad_request(format!("invalid color: {}", color)))
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 生成 SVG 占位图
pub fn render_svg(dims: Dimensions, options: &PlaceholderOptions) -> Result<String> {
    let bg = parse_color(options.bg.as_deref(), DEFAULT_BG)?;
    let fg = parse_color(options.fg.as_deref(), DEFAULT_FG)?;

    let label = match options.text.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.chars().take(64).collect(),
        _ => format!("{}×{}", dims.width, dims.height),
    };

    let font_size = (dims.width.min(dims.height) / 8).clamp(8, 160);

    Ok(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<rect width="100%" height="100%" fill="{bg}"/>"#,
            r#"<text x="50%" y="50%" fill="{fg}" font-family="system-ui, sans-serif" font-size="{fs}" "#,
            r#"text-anchor="middle" dominant-baseline="middle">{label}</text>"#,
            "</svg>"
        ),
        w = dims.width,
        h = dims.height,
        bg = bg,
        fg = fg,
        fs = font_size,
        label = escape_text(&label),
    ))
}
