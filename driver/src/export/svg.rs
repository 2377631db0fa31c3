use anyhow::Context;
use mapcore::geometry::Point;
use mapcore::render::{DrawCommand, Rgba, Stroke, TextAlign};
use mapcore::Scene;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Serializes a scene as a standalone SVG document.
///
/// The document is sized at the backing resolution while the `viewBox`
/// keeps the scene's logical units, so a 2x scene is sharp but not larger.
pub fn scene_to_svg(scene: &Scene) -> String {
    let viewport = scene.viewport();
    let (backing_width, backing_height) = viewport.backing_size();
    let mut defs = String::new();
    let mut body = String::new();
    let mut gradients = 0usize;

    for command in scene.commands() {
        match command {
            DrawCommand::FillRect { rect, color } => {
                let _ = writeln!(
                    body,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
                    num(rect.origin.x),
                    num(rect.origin.y),
                    num(rect.size.width),
                    num(rect.size.height),
                    fill_attrs(Some(*color)),
                );
            }
            DrawCommand::Line { from, to, stroke } => {
                let _ = writeln!(
                    body,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
                    num(from.x),
                    num(from.y),
                    num(to.x),
                    num(to.y),
                    stroke_attrs(Some(stroke)),
                );
            }
            DrawCommand::Glow {
                center,
                radius,
                color,
            } => {
                let id = format!("glow{gradients}");
                gradients += 1;
                let _ = writeln!(
                    defs,
                    r#"    <radialGradient id="{id}"><stop offset="0" stop-color="{}" stop-opacity="{}"/><stop offset="1" stop-color="{}" stop-opacity="0"/></radialGradient>"#,
                    color.to_rgb_hex(),
                    num(color.alpha_f32()),
                    color.to_rgb_hex(),
                );
                let _ = writeln!(
                    body,
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="url(#{id})"/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                );
            }
            DrawCommand::Polyline { points, stroke } => {
                let _ = writeln!(
                    body,
                    r#"  <polyline points="{}" fill="none" {}/>"#,
                    points_attr(points),
                    stroke_attrs(Some(stroke)),
                );
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let _ = writeln!(
                    body,
                    r#"  <circle cx="{}" cy="{}" r="{}" {} {}/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    fill_attrs(*fill),
                    stroke_attrs(stroke.as_ref()),
                );
            }
            DrawCommand::RoundedRect {
                rect,
                radius,
                fill,
                stroke,
            } => {
                let _ = writeln!(
                    body,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{}" {} {}/>"#,
                    num(rect.origin.x),
                    num(rect.origin.y),
                    num(rect.size.width),
                    num(rect.size.height),
                    num(*radius),
                    fill_attrs(*fill),
                    stroke_attrs(stroke.as_ref()),
                );
            }
            DrawCommand::Text {
                content,
                position,
                size,
                color,
                bold,
                align,
                ..
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                };
                let weight = if *bold { "bold" } else { "normal" };
                let _ = writeln!(
                    body,
                    r#"  <text x="{}" y="{}" font-family="sans-serif" font-size="{}" font-weight="{weight}" text-anchor="{anchor}" dominant-baseline="middle" {}>{}</text>"#,
                    num(position.x),
                    num(position.y),
                    num(*size),
                    fill_attrs(Some(*color)),
                    escape(content),
                );
            }
        }
    }

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{backing_width}" height="{backing_height}" viewBox="0 0 {} {}">"#,
        num(viewport.width),
        num(viewport.height),
    );
    if !defs.is_empty() {
        svg.push_str("  <defs>\n");
        svg.push_str(&defs);
        svg.push_str("  </defs>\n");
    }
    svg.push_str(&body);
    svg.push_str("</svg>\n");
    svg
}

pub fn write_svg<P: AsRef<Path>>(scene: &Scene, path: P) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    fs::write(path_ref, scene_to_svg(scene))
        .with_context(|| format!("writing svg {}", path_ref.display()))?;
    log::info!("wrote {} ({} commands)", path_ref.display(), scene.commands().len());
    Ok(())
}

fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".into()
    } else {
        format!("{rounded}")
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fill_attrs(fill: Option<Rgba>) -> String {
    match fill {
        Some(color) if color.a == 0xFF => format!(r#"fill="{}""#, color.to_rgb_hex()),
        Some(color) => format!(
            r#"fill="{}" fill-opacity="{}""#,
            color.to_rgb_hex(),
            num(color.alpha_f32())
        ),
        None => r#"fill="none""#.into(),
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    let Some(stroke) = stroke else {
        return String::new();
    };
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{}""#,
        stroke.color.to_rgb_hex(),
        num(stroke.width)
    );
    if stroke.color.a != 0xFF {
        let _ = write!(attrs, r#" stroke-opacity="{}""#, num(stroke.color.alpha_f32()));
    }
    if let Some(dash) = &stroke.dash {
        let pattern = dash.iter().map(|d| num(*d)).collect::<Vec<_>>().join(" ");
        let _ = write!(attrs, r#" stroke-dasharray="{pattern}""#);
    }
    attrs
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
