use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Billboard {
    /// Inventory code, e.g. "TR-014". Shown verbatim in tables.
    pub code: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub location: String,
    /// Size label as sold, e.g. "4x12".
    #[serde(default)]
    pub size_label: String,
    #[serde(default = "default_faces")]
    pub faces: u8,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub monthly_price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_faces() -> u8 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInstallment {
    pub ordinal: u32,
    pub amount: f64,
    /// ISO date string, rendered verbatim.
    pub due_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contract {
    pub number: String,
    pub customer: Customer,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub ad_type: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub installments: Vec<PaymentInstallment>,
    #[serde(default)]
    pub billboards: Vec<Billboard>,
}

fn default_currency() -> String {
    "د.ل".to_string()
}

/// A numbered boilerplate clause. The body may contain `{placeholder}`
/// variables substituted from the contract at layout time.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractTerm {
    pub ordinal: u32,
    pub body: String,
    /// Per-term overrides; `None` means the template default applies.
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub max_width: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSide {
    A,
    B,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DesignFace {
    pub side: FaceSide,
    pub artwork_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrintTaskItem {
    pub billboard: Billboard,
    #[serde(default)]
    pub faces: Vec<DesignFace>,
    pub width_m: f64,
    pub height_m: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Printer {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrintTask {
    pub reference: String,
    pub printer: Printer,
    #[serde(default)]
    pub items: Vec<PrintTaskItem>,
    #[serde(default)]
    pub cost: f64,
}

/// Who absorbs the cost of redoing a print for a billboard face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReprintCause {
    Customer,
    Loss,
    Printer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reprint {
    pub billboard_code: String,
    pub side: FaceSide,
    pub cause: ReprintCause,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationTeam {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationStatus {
    Pending,
    Done,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationTask {
    pub team: InstallationTeam,
    pub date: String,
    #[serde(default)]
    pub billboard_codes: Vec<String>,
    #[serde(default = "default_installation_status")]
    pub status: InstallationStatus,
}

fn default_installation_status() -> InstallationStatus {
    InstallationStatus::Pending
}

/// Top-level job file: one document to render. The settings overlay is
/// optional; missing fields fall back to the template defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrintJob {
    Contract {
        contract: Contract,
        #[serde(default)]
        terms: Vec<ContractTerm>,
        #[serde(default)]
        settings: Option<crate::config::TemplateSettings>,
    },
    BillboardTable {
        title: String,
        billboards: Vec<Billboard>,
        #[serde(default)]
        settings: Option<crate::config::TemplateSettings>,
    },
    PrintTaskSheet {
        task: PrintTask,
        #[serde(default)]
        settings: Option<crate::config::TemplateSettings>,
    },
    ReprintReport {
        reprints: Vec<Reprint>,
        #[serde(default)]
        settings: Option<crate::config::TemplateSettings>,
    },
    InstallationSheet {
        tasks: Vec<InstallationTask>,
        #[serde(default)]
        settings: Option<crate::config::TemplateSettings>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_job_deserializes_with_defaults() {
        let json = r#"{
            "kind": "contract",
            "contract": {
                "number": "2025-114",
                "customer": { "name": "شركة الواحة" },
                "start_date": "2025-07-20",
                "end_date": "2026-07-19",
                "total_amount": 52000.0
            }
        }"#;
        let job: PrintJob = serde_json::from_str(json).unwrap();
        match job {
            PrintJob::Contract {
                contract,
                terms,
                settings,
            } => {
                assert_eq!(contract.number, "2025-114");
                assert_eq!(contract.currency, "د.ل");
                assert!(contract.billboards.is_empty());
                assert!(terms.is_empty());
                assert!(settings.is_none());
            }
            _ => panic!("expected contract job"),
        }
    }

    #[test]
    fn billboard_defaults_apply() {
        let b: Billboard = serde_json::from_str(r#"{ "code": "TR-014" }"#).unwrap();
        assert_eq!(b.faces, 2);
        assert_eq!(b.monthly_price, 0.0);
        assert!(b.image_url.is_none());
    }
}
