use crate::config::{PageSetup, TemplateSettings};
use crate::error::Error;
use crate::measure::TextMeasurer;
use crate::model::{Contract, ContractTerm};
use crate::qr;
use crate::wrap::wrap_text;

use super::{Anchor, Element, ImageElement, Page, TextElement, format_amount, has_rtl};

/// Lay a contract out onto template pages: header sections, numbered
/// terms flowing across continuation pages, payment schedule, signatures,
/// and the QR verification code.
pub fn layout_contract(
    contract: &Contract,
    terms: &[ContractTerm],
    settings: &TemplateSettings,
    measurer: &mut TextMeasurer,
) -> Result<Vec<Page>, Error> {
    if contract.number.trim().is_empty() {
        return Err(Error::InvalidJob("contract number is empty".into()));
    }

    let setup = &settings.page;
    let s = &settings.section;
    let family = settings.fonts.family.as_str();
    let normal = settings.fonts.weight_normal;
    let bold = settings.fonts.weight_bold;
    let right = setup.width - setup.margin_right;
    let center = setup.width / 2.0;
    let background = s.background_url.as_ref();

    let mut pages: Vec<Page> = Vec::new();
    let mut page = Page::new(setup, background);

    let text = |x: f32, y: f32, content: String, size: f32, weight: u16, anchor: Anchor| {
        Element::Text(TextElement {
            x,
            y,
            rtl: has_rtl(&content),
            text: content,
            size,
            weight,
            color: s.terms_color.clone(),
            anchor,
        })
    };

    // Header block.
    page.push(Element::Text(TextElement {
        x: center,
        y: s.title_y,
        rtl: has_rtl(&s.title_text),
        text: s.title_text.clone(),
        size: s.title_size,
        weight: bold,
        color: s.title_color.clone(),
        anchor: Anchor::Middle,
    }));
    page.push(text(
        right,
        s.number_y,
        format!("{}: {}", s.number_label, contract.number),
        s.number_size,
        bold,
        Anchor::End,
    ));
    page.push(text(
        right,
        s.date_y,
        format!("{}: {}", s.date_label, contract.start_date),
        s.date_size,
        normal,
        Anchor::End,
    ));

    // Parties.
    let mut party_lines = vec![
        format!("{}: {}", s.signature_first_label, s.first_party),
        match &contract.customer.company {
            Some(company) => format!(
                "{}: {} ({})",
                s.signature_second_label, contract.customer.name, company
            ),
            None => format!("{}: {}", s.signature_second_label, contract.customer.name),
        },
    ];
    if let Some(phone) = &contract.customer.phone {
        party_lines.push(format!("هاتف: {phone}"));
    }
    let mut cursor = s.parties_y;
    for line in party_lines {
        page.push(text(right, cursor, line, s.parties_size, normal, Anchor::End));
        cursor += s.parties_size * s.parties_line_height;
    }

    // QR verification code, top-left corner of the first page.
    let url = format!("{}{}", s.qr.base_url, contract.number);
    page.push(Element::Image(ImageElement {
        x: s.qr.x,
        y: s.qr.y,
        width: s.qr.size,
        height: s.qr.size,
        href: qr::data_uri(&url, &s.qr)?,
    }));

    // Terms flow top-down from the configured origin; a line that does not
    // fit moves the whole flow to a continuation page.
    let mut ordered: Vec<&ContractTerm> = terms.iter().collect();
    ordered.sort_by_key(|t| t.ordinal);

    cursor = s.terms_y;
    for term in &ordered {
        let body = substitute(&term.body, contract);
        let size = term.font_size.unwrap_or(s.terms_size);
        let width = term.max_width.unwrap_or(s.terms_width);
        let line_height = size * s.terms_line_height;
        let lines = wrap_text(
            measurer,
            &body,
            width - s.terms_number_gap,
            size,
            family,
            normal,
        );
        for (i, line) in lines.iter().enumerate() {
            ensure_room(&mut pages, &mut page, &mut cursor, line_height, setup, background);
            if i == 0 {
                page.push(text(
                    right,
                    cursor,
                    format!("{}.", term.ordinal),
                    size,
                    bold,
                    Anchor::End,
                ));
            }
            page.push(text(
                right - s.terms_number_gap,
                cursor,
                line.clone(),
                size,
                normal,
                Anchor::End,
            ));
            cursor += line_height;
        }
        cursor += s.terms_spacing;
    }
    log::debug!(
        "contract {}: {} terms over {} page(s) so far",
        contract.number,
        ordered.len(),
        pages.len() + 1
    );

    // Payment schedule.
    if !contract.installments.is_empty() {
        let line_height = s.payments_size * s.payments_line_height;
        ensure_room(&mut pages, &mut page, &mut cursor, line_height * 2.0, setup, background);
        page.push(text(
            right,
            cursor,
            s.payments_heading.clone(),
            s.payments_size,
            bold,
            Anchor::End,
        ));
        cursor += line_height;
        for installment in &contract.installments {
            ensure_room(&mut pages, &mut page, &mut cursor, line_height, setup, background);
            page.push(text(
                right,
                cursor,
                format!(
                    "الدفعة {}: {} {} بتاريخ {}",
                    installment.ordinal,
                    format_amount(installment.amount),
                    contract.currency,
                    installment.due_date,
                ),
                s.payments_size,
                normal,
                Anchor::End,
            ));
            cursor += line_height;
        }
        ensure_room(&mut pages, &mut page, &mut cursor, line_height, setup, background);
        page.push(text(
            right,
            cursor,
            format!(
                "{}: {} {}",
                s.total_label,
                format_amount(contract.total_amount),
                contract.currency,
            ),
            s.payments_size,
            bold,
            Anchor::End,
        ));
        cursor += line_height;
        if contract.paid_amount > 0.0 {
            ensure_room(&mut pages, &mut page, &mut cursor, line_height, setup, background);
            page.push(text(
                right,
                cursor,
                format!(
                    "{}: {} {}",
                    s.paid_label,
                    format_amount(contract.paid_amount),
                    contract.currency,
                ),
                s.payments_size,
                normal,
                Anchor::End,
            ));
            cursor += line_height;
        }
    }

    // Signatures sit at a fixed offset from the bottom of the final page.
    let signature_y = setup.height - s.signature_offset;
    if cursor + s.signature_size * 2.0 > signature_y {
        pages.push(std::mem::replace(&mut page, Page::new(setup, background)));
    }
    page.push(text(
        setup.width * 0.72,
        signature_y,
        s.signature_first_label.clone(),
        s.signature_size,
        bold,
        Anchor::Middle,
    ));
    page.push(text(
        setup.width * 0.28,
        signature_y,
        s.signature_second_label.clone(),
        s.signature_size,
        bold,
        Anchor::Middle,
    ));

    pages.push(page);
    Ok(pages)
}

fn ensure_room(
    pages: &mut Vec<Page>,
    page: &mut Page,
    cursor: &mut f32,
    needed: f32,
    setup: &PageSetup,
    background: Option<&String>,
) {
    if *cursor + needed <= setup.body_bottom() {
        return;
    }
    pages.push(std::mem::replace(page, Page::new(setup, background)));
    *cursor = setup.margin_top;
}

/// Fill the known `{placeholder}` variables from the contract. Unknown
/// placeholders pass through untouched.
fn substitute(body: &str, contract: &Contract) -> String {
    let first_payment = contract
        .installments
        .first()
        .map(|i| format_amount(i.amount))
        .unwrap_or_default();
    body.replace("{customer}", &contract.customer.name)
        .replace(
            "{company}",
            contract.customer.company.as_deref().unwrap_or(""),
        )
        .replace("{contract_number}", &contract.number)
        .replace("{start_date}", &contract.start_date)
        .replace("{end_date}", &contract.end_date)
        .replace("{total}", &format_amount(contract.total_amount))
        .replace("{first_payment}", &first_payment)
        .replace(
            "{billboards_count}",
            &contract.billboards.len().to_string(),
        )
        .replace("{ad_type}", &contract.ad_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateSettings;
    use crate::measure::{FontMetrics, TextMeasurer};
    use crate::model::{Customer, PaymentInstallment};

    struct FixedAdvance;

    impl FontMetrics for FixedAdvance {
        fn measure(&self, text: &str, font_size: f32, _family: &str, _weight: u16) -> Option<f32> {
            Some(text.chars().count() as f32 * font_size * 0.5)
        }
    }

    fn contract() -> Contract {
        Contract {
            number: "2025-114".to_string(),
            customer: Customer {
                name: "شركة الواحة".to_string(),
                company: None,
                phone: None,
            },
            start_date: "2025-07-20".to_string(),
            end_date: "2026-07-19".to_string(),
            ad_type: "لوحات طرق".to_string(),
            total_amount: 52000.0,
            paid_amount: 0.0,
            currency: "د.ل".to_string(),
            installments: vec![PaymentInstallment {
                ordinal: 1,
                amount: 26000.0,
                due_date: "2025-07-20".to_string(),
            }],
            billboards: Vec::new(),
        }
    }

    #[test]
    fn substitution_fills_known_placeholders_only() {
        let c = contract();
        let out = substitute(
            "يلتزم {customer} بدفع {first_payment} {unknown} بتاريخ {start_date}",
            &c,
        );
        assert_eq!(
            out,
            "يلتزم شركة الواحة بدفع 26000 {unknown} بتاريخ 2025-07-20"
        );
    }

    #[test]
    fn empty_contract_number_is_rejected() {
        let mut c = contract();
        c.number = "  ".to_string();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let err = layout_contract(&c, &[], &TemplateSettings::default(), &mut m).unwrap_err();
        assert!(matches!(err, Error::InvalidJob(_)));
    }

    #[test]
    fn single_page_contract_has_qr_and_signatures() {
        let c = contract();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_contract(&c, &[], &TemplateSettings::default(), &mut m).unwrap();
        assert_eq!(pages.len(), 1);

        let has_qr = pages[0].elements.iter().any(|e| {
            matches!(e, Element::Image(img) if img.href.starts_with("data:image/png;base64,"))
        });
        assert!(has_qr);

        let signatures = pages[0]
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Text(t) if t.text == "الطرف الأول" || t.text == "الطرف الثاني"))
            .count();
        assert_eq!(signatures, 2);
    }

    #[test]
    fn long_term_flow_spills_to_continuation_pages() {
        let c = contract();
        let terms: Vec<ContractTerm> = (1..=40)
            .map(|i| ContractTerm {
                ordinal: i,
                body: "نص بند طويل يعاد مرارا حتى يتجاوز ارتفاع الصفحة المتاح للبنود".repeat(3),
                font_size: None,
                max_width: None,
            })
            .collect();
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_contract(&c, &terms, &TemplateSettings::default(), &mut m).unwrap();
        assert!(pages.len() > 1, "expected continuation pages");
        // Continuation pages carry term lines but no title.
        let later = &pages[1];
        assert!(!later.elements.is_empty());
    }

    #[test]
    fn terms_render_in_ordinal_order() {
        let c = contract();
        let terms = vec![
            ContractTerm {
                ordinal: 2,
                body: "البند الثاني".to_string(),
                font_size: None,
                max_width: None,
            },
            ContractTerm {
                ordinal: 1,
                body: "البند الأول".to_string(),
                font_size: None,
                max_width: None,
            },
        ];
        let mut m = TextMeasurer::new(Box::new(FixedAdvance));
        let pages = layout_contract(&c, &terms, &TemplateSettings::default(), &mut m).unwrap();
        let texts: Vec<&str> = pages[0]
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        let first = texts.iter().position(|t| *t == "البند الأول").unwrap();
        let second = texts.iter().position(|t| *t == "البند الثاني").unwrap();
        assert!(first < second);
    }
}
