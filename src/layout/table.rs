use crate::config::{ColumnSetting, TemplateSettings};
use crate::measure::TextMeasurer;
use crate::model::{
    Billboard, FaceSide, InstallationStatus, InstallationTask, PrintTaskItem, Reprint,
    ReprintCause,
};
use crate::paginate::paginate;

use super::{
    Anchor, Element, LineElement, Page, RectElement, TextElement, fit_text, format_amount, has_rtl,
};

/// A record that can appear as one table row. `cell` maps a column key to
/// display text (unknown keys render empty); `default_columns` is the
/// column set used when the settings don't name one.
pub trait TableRow {
    fn cell(&self, key: &str) -> String;
    fn default_columns() -> Vec<ColumnSetting>;
}

impl TableRow for Billboard {
    fn cell(&self, key: &str) -> String {
        match key {
            "code" => self.code.clone(),
            "municipality" => self.municipality.clone(),
            "district" => self.district.clone(),
            "location" => self.location.clone(),
            "size_label" => self.size_label.clone(),
            "faces" => self.faces.to_string(),
            "monthly_price" => format_amount(self.monthly_price),
            _ => String::new(),
        }
    }

    fn default_columns() -> Vec<ColumnSetting> {
        vec![
            ColumnSetting::new("code", "الرمز", 220.0),
            ColumnSetting::new("municipality", "البلدية", 280.0),
            ColumnSetting::new("district", "المنطقة", 280.0),
            ColumnSetting::new("location", "الموقع", 620.0),
            ColumnSetting::new("size_label", "المقاس", 220.0),
            ColumnSetting::new("faces", "الأوجه", 160.0),
            ColumnSetting::new("monthly_price", "السعر الشهري", 380.0),
        ]
    }
}

fn side_label(side: FaceSide) -> &'static str {
    match side {
        FaceSide::A => "أ",
        FaceSide::B => "ب",
    }
}

impl TableRow for PrintTaskItem {
    fn cell(&self, key: &str) -> String {
        match key {
            "code" => self.billboard.code.clone(),
            "location" => self.billboard.location.clone(),
            "size_m" => format!("{}x{}", format_amount(self.width_m), format_amount(self.height_m)),
            "quantity" => self.quantity.to_string(),
            "faces" => self
                .faces
                .iter()
                .map(|f| side_label(f.side))
                .collect::<Vec<_>>()
                .join("/"),
            _ => String::new(),
        }
    }

    fn default_columns() -> Vec<ColumnSetting> {
        vec![
            ColumnSetting::new("code", "الرمز", 260.0),
            ColumnSetting::new("location", "الموقع", 760.0),
            ColumnSetting::new("size_m", "المقاس بالمتر", 360.0),
            ColumnSetting::new("faces", "الأوجه", 300.0),
            ColumnSetting::new("quantity", "الكمية", 240.0),
        ]
    }
}

impl TableRow for Reprint {
    fn cell(&self, key: &str) -> String {
        match key {
            "code" => self.billboard_code.clone(),
            "side" => side_label(self.side).to_string(),
            "cause" => match self.cause {
                ReprintCause::Customer => "على الزبون",
                ReprintCause::Loss => "هالك",
                ReprintCause::Printer => "على المطبعة",
            }
            .to_string(),
            "cost" => format_amount(self.cost),
            _ => String::new(),
        }
    }

    fn default_columns() -> Vec<ColumnSetting> {
        vec![
            ColumnSetting::new("code", "الرمز", 340.0),
            ColumnSetting::new("side", "الوجه", 260.0),
            ColumnSetting::new("cause", "السبب", 520.0),
            ColumnSetting::new("cost", "التكلفة", 400.0),
        ]
    }
}

impl TableRow for InstallationTask {
    fn cell(&self, key: &str) -> String {
        match key {
            "team" => self.team.name.clone(),
            "date" => self.date.clone(),
            "boards" => self.billboard_codes.len().to_string(),
            "status" => match self.status {
                InstallationStatus::Pending => "قيد التنفيذ",
                InstallationStatus::Done => "منجزة",
            }
            .to_string(),
            _ => String::new(),
        }
    }

    fn default_columns() -> Vec<ColumnSetting> {
        vec![
            ColumnSetting::new("team", "الفريق", 520.0),
            ColumnSetting::new("date", "التاريخ", 400.0),
            ColumnSetting::new("boards", "عدد اللوحات", 320.0),
            ColumnSetting::new("status", "الحالة", 380.0),
        ]
    }
}

/// Lay records out as fixed-size table pages: title, repeated header row,
/// at most `rows_per_page` rows per page, page footer. Columns run
/// right-to-left.
pub fn layout_table<R: TableRow + Clone>(
    title: &str,
    rows: &[R],
    settings: &TemplateSettings,
    measurer: &mut TextMeasurer,
) -> Vec<Page> {
    let setup = &settings.page;
    let t = &settings.table;
    let family = settings.fonts.family.as_str();
    let right = setup.width - setup.margin_right;

    let columns = if t.columns.is_empty() {
        R::default_columns()
    } else {
        t.columns.clone()
    };

    // Scale the configured column widths down when they overflow the body.
    let total_width: f32 = columns.iter().map(|c| c.width).sum();
    let scale = if total_width > setup.body_width() && total_width > 0.0 {
        let factor = setup.body_width() / total_width;
        log::debug!(
            "table columns overflow body width ({total_width:.0} px), scaling by {factor:.3}"
        );
        factor
    } else {
        1.0
    };
    let widths: Vec<f32> = columns.iter().map(|c| c.width * scale).collect();
    let table_width: f32 = widths.iter().sum();
    let table_left = right - table_width;

    let mut chunks = paginate(rows, t.rows_per_page);
    if chunks.is_empty() {
        chunks.push(Vec::new());
    }
    let page_count = chunks.len();

    let title_y = setup.margin_top + t.title_size;
    let table_top = title_y + t.title_size;

    let mut pages = Vec::with_capacity(page_count);
    for (page_index, chunk) in chunks.iter().enumerate() {
        let mut page = Page::new(setup, None);

        page.push(Element::Text(TextElement {
            x: setup.width / 2.0,
            y: title_y,
            rtl: has_rtl(title),
            text: title.to_string(),
            size: t.title_size,
            weight: settings.fonts.weight_bold,
            color: t.cell_text_color.clone(),
            anchor: Anchor::Middle,
        }));

        // Header band.
        page.push(Element::Rect(RectElement {
            x: table_left,
            y: table_top,
            width: table_width,
            height: t.header_height,
            fill: Some(t.header_fill.clone()),
            stroke: None,
            stroke_width: 0.0,
        }));
        let header_baseline = table_top + t.header_height / 2.0 + t.header_size * 0.35;
        let mut cum = 0.0;
        for (column, width) in columns.iter().zip(&widths) {
            page.push(Element::Text(TextElement {
                x: right - cum - width / 2.0,
                y: header_baseline,
                rtl: has_rtl(&column.label),
                text: column.label.clone(),
                size: t.header_size,
                weight: settings.fonts.weight_bold,
                color: t.header_text_color.clone(),
                anchor: Anchor::Middle,
            }));
            cum += width;
        }

        // Rows.
        for (row_index, row) in chunk.iter().enumerate() {
            let row_top = table_top + t.header_height + row_index as f32 * t.row_height;
            if row_index % 2 == 1 {
                page.push(Element::Rect(RectElement {
                    x: table_left,
                    y: row_top,
                    width: table_width,
                    height: t.row_height,
                    fill: Some(t.zebra_fill.clone()),
                    stroke: None,
                    stroke_width: 0.0,
                }));
            }
            let baseline = row_top + t.row_height / 2.0 + t.cell_size * 0.35;
            let mut cum = 0.0;
            for (column, width) in columns.iter().zip(&widths) {
                let value = row.cell(&column.key);
                let fitted = fit_text(
                    measurer,
                    &value,
                    (width - 2.0 * t.cell_padding).max(0.0),
                    t.cell_size,
                    family,
                    settings.fonts.weight_normal,
                );
                page.push(Element::Text(TextElement {
                    x: right - cum - width / 2.0,
                    y: baseline,
                    rtl: has_rtl(&fitted),
                    text: fitted,
                    size: t.cell_size,
                    weight: settings.fonts.weight_normal,
                    color: t.cell_text_color.clone(),
                    anchor: Anchor::Middle,
                }));
                cum += width;
            }
        }

        // Grid: horizontal rules per row boundary, vertical rules per
        // column boundary, drawn over the fills.
        let grid_bottom = table_top + t.header_height + chunk.len() as f32 * t.row_height;
        let mut rules = vec![table_top, table_top + t.header_height];
        for i in 1..=chunk.len() {
            rules.push(table_top + t.header_height + i as f32 * t.row_height);
        }
        for y in rules {
            page.push(Element::Line(LineElement {
                x1: table_left,
                y1: y,
                x2: right,
                y2: y,
                stroke: t.border_color.clone(),
                width: t.border_width,
            }));
        }
        let mut x = right;
        page.push(vertical_rule(x, table_top, grid_bottom, t.border_color.clone(), t.border_width));
        for width in &widths {
            x -= width;
            page.push(vertical_rule(x, table_top, grid_bottom, t.border_color.clone(), t.border_width));
        }

        page.push(Element::Text(TextElement {
            x: setup.width / 2.0,
            y: setup.body_bottom() + setup.margin_bottom * 0.5,
            rtl: true,
            text: format!("صفحة {} من {}", page_index + 1, page_count),
            size: t.cell_size,
            weight: settings.fonts.weight_normal,
            color: t.cell_text_color.clone(),
            anchor: Anchor::Middle,
        }));

        log::debug!(
            "table page {}/{}: {} rows",
            page_index + 1,
            page_count,
            chunk.len()
        );
        pages.push(page);
    }
    pages
}

fn vertical_rule(x: f32, top: f32, bottom: f32, stroke: String, width: f32) -> Element {
    Element::Line(LineElement {
        x1: x,
        y1: top,
        x2: x,
        y2: bottom,
        stroke,
        width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateSettings;
    use crate::measure::{FontMetrics, TextMeasurer};

    struct FixedAdvance;

    impl FontMetrics for FixedAdvance {
        fn measure(&self, text: &str, font_size: f32, _family: &str, _weight: u16) -> Option<f32> {
            Some(text.chars().count() as f32 * font_size * 0.5)
        }
    }

    fn boards(n: usize) -> Vec<Billboard> {
        (1..=n)
            .map(|i| Billboard {
                code: format!("TR-{i:03}"),
                municipality: "طرابلس".to_string(),
                district: "قرجي".to_string(),
                location: "الطريق الساحلي بالقرب من الجسر".to_string(),
                size_label: "4x12".to_string(),
                faces: 2,
                latitude: None,
                longitude: None,
                monthly_price: 1500.0,
                image_url: None,
            })
            .collect()
    }

    #[test]
    fn page_count_follows_pagination() {
        let settings = TemplateSettings::default();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_table("لوحات العقد", &boards(25), &settings, &mut m);
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn every_page_repeats_the_header_labels() {
        let settings = TemplateSettings::default();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_table("لوحات العقد", &boards(25), &settings, &mut m);
        for page in &pages {
            let header_hits = page
                .elements
                .iter()
                .filter(|e| matches!(e, Element::Text(t) if t.text == "الرمز"))
                .count();
            assert_eq!(header_hits, 1);
        }
    }

    #[test]
    fn footer_counts_pages() {
        let settings = TemplateSettings::default();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_table("لوحات", &boards(13), &settings, &mut m);
        let footer = pages[1].elements.iter().any(
            |e| matches!(e, Element::Text(t) if t.text == "صفحة 2 من 2"),
        );
        assert!(footer);
    }

    #[test]
    fn empty_input_still_renders_one_page() {
        let settings = TemplateSettings::default();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let none: Vec<Billboard> = Vec::new();
        let pages = layout_table("لوحات", &none, &settings, &mut m);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn long_cell_text_is_ellipsized() {
        let mut list = boards(1);
        list[0].location = "موقع ".repeat(60);
        let settings = TemplateSettings::default();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_table("لوحات", &list, &settings, &mut m);
        let truncated = pages[0]
            .elements
            .iter()
            .any(|e| matches!(e, Element::Text(t) if t.text.ends_with('…')));
        assert!(truncated);
    }

    #[test]
    fn explicit_columns_override_row_defaults() {
        let mut settings = TemplateSettings::default();
        settings.table.columns = vec![ColumnSetting::new("code", "الرمز", 400.0)];
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_table("لوحات", &boards(1), &settings, &mut m);
        let labels: Vec<&str> = pages[0]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(t) if t.text == "البلدية" => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert!(labels.is_empty(), "only the explicit column should render");
    }

    #[test]
    fn reprint_rows_use_their_own_columns() {
        let settings = TemplateSettings::default();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let reprints = vec![Reprint {
            billboard_code: "TR-001".to_string(),
            side: FaceSide::B,
            cause: ReprintCause::Loss,
            cost: 850.0,
        }];
        let pages = layout_table("تقرير إعادة الطباعة", &reprints, &settings, &mut m);
        let cells: Vec<&str> = pages[0]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert!(cells.contains(&"هالك"));
        assert!(cells.contains(&"ب"));
        assert!(cells.contains(&"850"));
    }
}
