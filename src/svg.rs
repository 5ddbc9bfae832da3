//! SVG emission for laid-out pages.
//!
//! Text is emitted with explicit direction handling: RTL elements set
//! `direction="rtl"` on the `<text>` node and wrap embedded Latin/digit
//! runs in `direction="ltr"` tspans, so numbers and dates inside Arabic
//! sentences keep their reading order on every renderer.

use std::fmt::Write as _;

use crate::bidi;
use crate::layout::{Anchor, Element, Page};

pub fn page_to_svg(page: &Page, font_family: &str) -> String {
    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{family}">"#,
        w = page.width,
        h = page.height,
        family = escape(font_family),
    );

    if let Some(background) = &page.background {
        let _ = write!(
            out,
            r#"<image href="{}" x="0" y="0" width="{}" height="{}" preserveAspectRatio="xMidYMid slice"/>"#,
            escape(background),
            page.width,
            page.height,
        );
    }

    for element in &page.elements {
        match element {
            Element::Rect(rect) => {
                let _ = write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    rect.fill.as_deref().map(escape).unwrap_or_else(|| "none".into()),
                );
                if let Some(stroke) = &rect.stroke {
                    let _ = write!(
                        out,
                        r#" stroke="{}" stroke-width="{}""#,
                        escape(stroke),
                        rect.stroke_width,
                    );
                }
                out.push_str("/>");
            }
            Element::Line(line) => {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                    line.x1,
                    line.y1,
                    line.x2,
                    line.y2,
                    escape(&line.stroke),
                    line.width,
                );
            }
            Element::Image(image) => {
                let _ = write!(
                    out,
                    r#"<image href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
                    escape(&image.href),
                    image.x,
                    image.y,
                    image.width,
                    image.height,
                );
            }
            Element::Text(text) => {
                let anchor = match text.anchor {
                    Anchor::Start => "start",
                    Anchor::Middle => "middle",
                    Anchor::End => "end",
                };
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}""#,
                    text.x,
                    text.y,
                    text.size,
                    text.weight,
                    escape(&text.color),
                    anchor,
                );
                if text.rtl {
                    out.push_str(r#" direction="rtl" xml:space="preserve">"#);
                    for fragment in bidi::segment(&text.text) {
                        if fragment.is_ltr() {
                            let _ = write!(
                                out,
                                r#"<tspan direction="ltr" unicode-bidi="embed">{}</tspan>"#,
                                escape(fragment.text()),
                            );
                        } else {
                            out.push_str(&escape(fragment.text()));
                        }
                    }
                    out.push_str("</text>");
                } else {
                    let _ = write!(out, ">{}</text>", escape(&text.text));
                }
            }
        }
    }

    out.push_str("</svg>");
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
