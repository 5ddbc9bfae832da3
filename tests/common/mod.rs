#![allow(dead_code)]

use adpress::measure::{FontMetrics, TextMeasurer};
use adpress::model::{Billboard, Contract, ContractTerm, Customer, PaymentInstallment};

/// Deterministic stand-in for face metrics: every character advances by
/// `factor` em. Matches the engine's own no-font estimate at 0.5.
pub struct FixedAdvance(pub f32);

impl FontMetrics for FixedAdvance {
    fn measure(&self, text: &str, font_size: f32, _family: &str, _weight: u16) -> Option<f32> {
        Some(text.chars().count() as f32 * font_size * self.0)
    }
}

/// A provider with no faces at all; forces the estimated fallback path.
pub struct NoFonts;

impl FontMetrics for NoFonts {
    fn measure(&self, _text: &str, _size: f32, _family: &str, _weight: u16) -> Option<f32> {
        None
    }
}

pub fn measurer() -> TextMeasurer {
    TextMeasurer::new(Box::new(FixedAdvance(0.5)))
}

pub fn sample_contract() -> Contract {
    Contract {
        number: "2025-114".to_string(),
        customer: Customer {
            name: "شركة الواحة للمشروبات".to_string(),
            company: Some("الواحة".to_string()),
            phone: Some("0912345678".to_string()),
        },
        start_date: "2025-07-20".to_string(),
        end_date: "2026-07-19".to_string(),
        ad_type: "لوحات طرق رئيسية".to_string(),
        total_amount: 52000.0,
        paid_amount: 26000.0,
        currency: "د.ل".to_string(),
        installments: vec![
            PaymentInstallment {
                ordinal: 1,
                amount: 26000.0,
                due_date: "2025-07-20".to_string(),
            },
            PaymentInstallment {
                ordinal: 2,
                amount: 26000.0,
                due_date: "2026-01-20".to_string(),
            },
        ],
        billboards: sample_boards(3),
    }
}

pub fn sample_terms() -> Vec<ContractTerm> {
    vec![
        ContractTerm {
            ordinal: 1,
            body: "يلتزم الطرف الثاني {customer} بدفع دفعة أولى قدرها {first_payment} د.ل بتاريخ {start_date}".to_string(),
            font_size: None,
            max_width: None,
        },
        ContractTerm {
            ordinal: 2,
            body: "مدة العقد من {start_date} إلى {end_date} وتشمل {billboards_count} لوحة إعلانية".to_string(),
            font_size: None,
            max_width: None,
        },
        ContractTerm {
            ordinal: 3,
            body: "القيمة الإجمالية للعقد {total} د.ل تدفع حسب جدول الدفعات المرفق".to_string(),
            font_size: None,
            max_width: None,
        },
    ]
}

pub fn sample_boards(n: usize) -> Vec<Billboard> {
    (1..=n)
        .map(|i| Billboard {
            code: format!("TR-{i:03}"),
            municipality: "طرابلس".to_string(),
            district: "قرجي".to_string(),
            location: format!("الطريق الساحلي، النقطة {i}"),
            size_label: "4x12".to_string(),
            faces: 2,
            latitude: Some(32.87),
            longitude: Some(13.18),
            monthly_price: 1500.0,
            image_url: None,
        })
        .collect()
}
