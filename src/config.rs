//! Template configuration.
//!
//! Every knob the layout engine reads is an explicit field with a literal
//! default below. A settings JSON overlays individual fields onto these
//! defaults (`#[serde(default)]` throughout), so a partial file like
//! `{"table": {"rows_per_page": 10}}` changes exactly one thing.
//!
//! All geometry is in CSS pixels on a 300 dpi A4 canvas (2480 x 3508).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub page: PageSetup,
    pub fonts: FontSelection,
    pub section: SectionSettings,
    pub table: TableSettings,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            page: PageSetup::default(),
            fonts: FontSelection::default(),
            section: SectionSettings::default(),
            table: TableSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: 2480.0,
            height: 3508.0,
            margin_top: 140.0,
            margin_bottom: 160.0,
            margin_left: 160.0,
            margin_right: 160.0,
        }
    }
}

impl PageSetup {
    pub fn body_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn body_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontSelection {
    /// Family used for every text element. Arabic-capable by default.
    pub family: String,
    pub weight_normal: u16,
    pub weight_bold: u16,
}

impl Default for FontSelection {
    fn default() -> Self {
        Self {
            family: "Cairo".to_string(),
            weight_normal: 400,
            weight_bold: 700,
        }
    }
}

/// Positions and styles of the fixed contract-template sections.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SectionSettings {
    pub title_text: String,
    pub title_y: f32,
    pub title_size: f32,
    pub title_color: String,

    pub number_label: String,
    pub number_y: f32,
    pub number_size: f32,

    pub date_label: String,
    pub date_y: f32,
    pub date_size: f32,

    /// First party of the contract (the advertising company), a fixed
    /// template string; the second party comes from the job's customer.
    pub first_party: String,
    pub parties_y: f32,
    pub parties_size: f32,
    pub parties_line_height: f32,

    pub terms_y: f32,
    pub terms_width: f32,
    pub terms_size: f32,
    pub terms_line_height: f32,
    /// Vertical gap between consecutive terms.
    pub terms_spacing: f32,
    /// Horizontal gap between the term number and its first line.
    pub terms_number_gap: f32,
    pub terms_color: String,

    pub payments_heading: String,
    pub payments_size: f32,
    pub payments_line_height: f32,
    pub total_label: String,
    pub paid_label: String,

    pub signature_offset: f32,
    pub signature_size: f32,
    pub signature_first_label: String,
    pub signature_second_label: String,

    pub qr: QrSettings,

    /// Absolute URL of the page background artwork; omitted entirely when
    /// `None`.
    pub background_url: Option<String>,
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            title_text: "عقد إيجار مساحات إعلانية".to_string(),
            title_y: 300.0,
            title_size: 88.0,
            title_color: "#111827".to_string(),

            number_label: "رقم العقد".to_string(),
            number_y: 430.0,
            number_size: 52.0,

            date_label: "تاريخ التحرير".to_string(),
            date_y: 510.0,
            date_size: 44.0,

            first_party: "شركة الإعلان الحديث للدعاية والإعلان".to_string(),
            parties_y: 640.0,
            parties_size: 46.0,
            parties_line_height: 1.7,

            terms_y: 880.0,
            terms_width: 2020.0,
            terms_size: 42.0,
            terms_line_height: 1.6,
            terms_spacing: 34.0,
            terms_number_gap: 56.0,
            terms_color: "#1f2937".to_string(),

            payments_heading: "جدول الدفعات".to_string(),
            payments_size: 42.0,
            payments_line_height: 1.7,
            total_label: "إجمالي قيمة العقد".to_string(),
            paid_label: "المدفوع".to_string(),

            signature_offset: 420.0,
            signature_size: 46.0,
            signature_first_label: "الطرف الأول".to_string(),
            signature_second_label: "الطرف الثاني".to_string(),

            qr: QrSettings::default(),

            background_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Module colors as hex RGB.
    pub dark: String,
    pub light: String,
    /// The contract number is appended to this to form the encoded URL.
    pub base_url: String,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 200.0,
            size: 220.0,
            dark: "#111827".to_string(),
            light: "#ffffff".to_string(),
            base_url: "https://example.invalid/contracts/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnSetting {
    /// Which billboard field the column shows. Unknown keys render empty.
    pub key: String,
    pub label: String,
    pub width: f32,
}

impl Default for ColumnSetting {
    fn default() -> Self {
        Self {
            key: String::new(),
            label: String::new(),
            width: 200.0,
        }
    }
}

/// Table pages. The same instance parameterizes both the per-page preview
/// fragments and the assembled print document, so the two paths cannot
/// disagree on page boundaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Explicit column set. Empty (the default) means the rendered row
    /// type's own default columns apply.
    pub columns: Vec<ColumnSetting>,
    pub rows_per_page: usize,
    pub row_height: f32,
    pub header_height: f32,
    pub title_size: f32,
    pub header_size: f32,
    pub cell_size: f32,
    /// Inner left/right padding of every cell.
    pub cell_padding: f32,
    pub header_fill: String,
    pub header_text_color: String,
    pub zebra_fill: String,
    pub border_color: String,
    pub border_width: f32,
    pub cell_text_color: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows_per_page: 12,
            row_height: 96.0,
            header_height: 110.0,
            title_size: 64.0,
            header_size: 40.0,
            cell_size: 36.0,
            cell_padding: 24.0,
            header_fill: "#0f172a".to_string(),
            header_text_color: "#ffffff".to_string(),
            zebra_fill: "#f1f5f9".to_string(),
            border_color: "#94a3b8".to_string(),
            border_width: 2.0,
            cell_text_color: "#111827".to_string(),
        }
    }
}

impl ColumnSetting {
    pub fn new(key: &str, label: &str, width: f32) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            width,
        }
    }
}
