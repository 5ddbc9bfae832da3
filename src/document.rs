//! Print-document assembly.
//!
//! `assemble` is pure: page fragments plus resources in, one standalone
//! HTML string out. The single side-effecting step (showing the document)
//! lives behind [`crate::present::Presenter`].

use std::fmt::Write as _;

use base64::Engine as _;

/// A font to embed as an `@font-face` rule.
pub struct FontResource {
    pub family: String,
    pub weight: u16,
    /// `"truetype"` or `"opentype"`.
    pub format: &'static str,
    pub data: Vec<u8>,
}

#[derive(Default)]
pub struct Resources {
    pub fonts: Vec<FontResource>,
    pub extra_css: Option<String>,
}

pub struct DocumentOptions {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    /// Emit an on-load hook that waits for images and fonts, then opens
    /// the print dialog.
    pub auto_print: bool,
}

/// An assembled, standalone print document.
#[derive(Debug)]
pub struct PrintDocument {
    html: String,
}

impl PrintDocument {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

// Broken images are hidden client-side; the failure is best-effort and
// silent. Error events do not bubble, hence the capturing listener.
const HIDE_BROKEN_IMAGES: &str = "document.addEventListener('error',function(event){var t=event.target;if(t&&(t.tagName==='IMG'||t.tagName==='image')){t.style.display='none';}},true);";

const AUTO_PRINT: &str = "window.addEventListener('load',function(){(document.fonts&&document.fonts.ready?document.fonts.ready:Promise.resolve()).then(function(){window.print();});});";

/// Assemble page fragments into one standalone HTML document with fixed
/// page geometry, a page break after every fragment but the last, forced
/// color rendering, and `@font-face` rules for the given resources.
pub fn assemble(pages: &[String], resources: &Resources, options: &DocumentOptions) -> PrintDocument {
    let mut html = String::with_capacity(pages.iter().map(String::len).sum::<usize>() + 4096);

    html.push_str("<!doctype html><html lang=\"ar\" dir=\"rtl\"><head><meta charset=\"utf-8\"><title>");
    html.push_str(&escape(&options.title));
    html.push_str("</title><style>");

    let _ = write!(
        html,
        "@page{{size:{w}px {h}px;margin:0;}}html,body{{margin:0;padding:0;}}\
         .page{{width:{w}px;height:{h}px;overflow:hidden;page-break-after:always;\
         print-color-adjust:exact;-webkit-print-color-adjust:exact;}}\
         .page:last-child{{page-break-after:auto;}}",
        w = options.page_width,
        h = options.page_height,
    );

    for font in &resources.fonts {
        let mime = if font.format == "opentype" {
            "font/otf"
        } else {
            "font/ttf"
        };
        let _ = write!(
            html,
            "@font-face{{font-family:\"{}\";font-weight:{};src:url(data:{};base64,{}) format(\"{}\");}}",
            escape(&font.family),
            font.weight,
            mime,
            base64::engine::general_purpose::STANDARD.encode(&font.data),
            font.format,
        );
    }

    if let Some(css) = &resources.extra_css {
        html.push_str(css);
    }

    html.push_str("</style></head><body>");
    for page in pages {
        html.push_str("<div class=\"page\">");
        html.push_str(page);
        html.push_str("</div>");
    }

    html.push_str("<script>");
    html.push_str(HIDE_BROKEN_IMAGES);
    if options.auto_print {
        html.push_str(AUTO_PRINT);
    }
    html.push_str("</script></body></html>");

    PrintDocument { html }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
