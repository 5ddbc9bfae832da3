//! Rendering engine for an outdoor-advertising rental business: lays
//! billboard contracts and billboard tables out onto fixed-size pages and
//! assembles them into standalone print-ready HTML documents.
//!
//! The pipeline is pure until the very end: measure → lay out → emit SVG
//! fragments → assemble, with the single side effect (showing the
//! document) behind [`present::Presenter`].

pub mod bidi;
pub mod config;
pub mod document;
mod error;
pub mod fonts;
pub mod layout;
pub mod measure;
pub mod model;
pub mod paginate;
pub mod present;
pub mod qr;
pub mod svg;
pub mod wrap;

pub use error::Error;

use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use config::TemplateSettings;
use document::{DocumentOptions, FontResource, PrintDocument, Resources};
use fonts::FontLibrary;
use layout::TableRow;
use measure::TextMeasurer;
use model::{Contract, ContractTerm, PrintJob};
use present::{FilePresenter, Presenter};

/// Owns the font library and the measurement cache for a rendering
/// session. The cache is the only state shared between documents; it is
/// never locked (single-threaded use) and can be dropped wholesale via
/// [`TextMeasurer::invalidate`] through [`Renderer::measurer`].
pub struct Renderer {
    library: Rc<FontLibrary>,
    measurer: TextMeasurer,
}

impl Renderer {
    pub fn new(library: FontLibrary) -> Self {
        let library = Rc::new(library);
        let measurer = TextMeasurer::new(Box::new(library.clone()));
        Self { library, measurer }
    }

    pub fn with_discovered_fonts() -> Self {
        Self::new(FontLibrary::discover())
    }

    pub fn measurer(&mut self) -> &mut TextMeasurer {
        &mut self.measurer
    }

    pub fn contract_document(
        &mut self,
        contract: &Contract,
        terms: &[ContractTerm],
        settings: &TemplateSettings,
    ) -> Result<PrintDocument, Error> {
        let t0 = Instant::now();
        let pages = layout::layout_contract(contract, terms, settings, &mut self.measurer)?;
        let t_layout = t0.elapsed();

        let fragments: Vec<String> = pages
            .iter()
            .map(|p| svg::page_to_svg(p, &settings.fonts.family))
            .collect();
        let document = document::assemble(
            &fragments,
            &self.resources(settings),
            &DocumentOptions {
                title: format!("عقد {}", contract.number),
                page_width: settings.page.width,
                page_height: settings.page.height,
                auto_print: true,
            },
        );

        log::info!(
            "Contract {}: layout={:.1}ms, assemble={:.1}ms, {} page(s), {} bytes",
            contract.number,
            t_layout.as_secs_f64() * 1000.0,
            (t0.elapsed() - t_layout).as_secs_f64() * 1000.0,
            pages.len(),
            document.html().len(),
        );
        Ok(document)
    }

    pub fn table_document<R: TableRow + Clone>(
        &mut self,
        title: &str,
        rows: &[R],
        settings: &TemplateSettings,
    ) -> Result<PrintDocument, Error> {
        let t0 = Instant::now();
        let pages = layout::layout_table(title, rows, settings, &mut self.measurer);
        let t_layout = t0.elapsed();

        let fragments: Vec<String> = pages
            .iter()
            .map(|p| svg::page_to_svg(p, &settings.fonts.family))
            .collect();
        let document = document::assemble(
            &fragments,
            &self.resources(settings),
            &DocumentOptions {
                title: title.to_string(),
                page_width: settings.page.width,
                page_height: settings.page.height,
                auto_print: true,
            },
        );

        log::info!(
            "Table \"{}\": layout={:.1}ms, assemble={:.1}ms, {} row(s) over {} page(s)",
            title,
            t_layout.as_secs_f64() * 1000.0,
            (t0.elapsed() - t_layout).as_secs_f64() * 1000.0,
            rows.len(),
            pages.len(),
        );
        Ok(document)
    }

    pub fn render_job(&mut self, job: &PrintJob) -> Result<PrintDocument, Error> {
        match job {
            PrintJob::Contract {
                contract,
                terms,
                settings,
            } => {
                let default = TemplateSettings::default();
                self.contract_document(contract, terms, settings.as_ref().unwrap_or(&default))
            }
            PrintJob::BillboardTable {
                title,
                billboards,
                settings,
            } => {
                if billboards.is_empty() {
                    return Err(Error::InvalidJob(
                        "billboard table job has no billboards".into(),
                    ));
                }
                let default = TemplateSettings::default();
                self.table_document(title, billboards, settings.as_ref().unwrap_or(&default))
            }
            PrintJob::PrintTaskSheet { task, settings } => {
                if task.items.is_empty() {
                    return Err(Error::InvalidJob("print task has no items".into()));
                }
                let default = TemplateSettings::default();
                let title = format!("مهمة طباعة {}", task.reference);
                self.table_document(&title, &task.items, settings.as_ref().unwrap_or(&default))
            }
            PrintJob::ReprintReport { reprints, settings } => {
                if reprints.is_empty() {
                    return Err(Error::InvalidJob("reprint report has no entries".into()));
                }
                let default = TemplateSettings::default();
                self.table_document(
                    "تقرير إعادة الطباعة",
                    reprints,
                    settings.as_ref().unwrap_or(&default),
                )
            }
            PrintJob::InstallationSheet { tasks, settings } => {
                if tasks.is_empty() {
                    return Err(Error::InvalidJob("installation sheet has no tasks".into()));
                }
                let default = TemplateSettings::default();
                self.table_document(
                    "جدول مهام التركيب",
                    tasks,
                    settings.as_ref().unwrap_or(&default),
                )
            }
        }
    }

    /// Embeddable faces for the configured family. When bold resolves to
    /// the same face as normal (weight fallback), it is emitted once.
    fn resources(&self, settings: &TemplateSettings) -> Resources {
        let family = settings.fonts.family.as_str();
        let mut fonts = Vec::new();

        let normal = self.library.font_data(family, settings.fonts.weight_normal);
        if let Some((data, format)) = normal {
            fonts.push(FontResource {
                family: family.to_string(),
                weight: settings.fonts.weight_normal,
                format,
                data: data.to_vec(),
            });
        }
        if let Some((data, format)) = self.library.font_data(family, settings.fonts.weight_bold) {
            let duplicate = normal.is_some_and(|(n, _)| std::ptr::eq(n.as_ptr(), data.as_ptr()));
            if !duplicate {
                fonts.push(FontResource {
                    family: family.to_string(),
                    weight: settings.fonts.weight_bold,
                    format,
                    data: data.to_vec(),
                });
            }
        }

        Resources {
            fonts,
            extra_css: None,
        }
    }
}

/// Load a job JSON file, render it with discovered fonts, and write the
/// document to `output`.
pub fn render_job_file(input: &Path, output: &Path) -> Result<(), Error> {
    let t0 = Instant::now();

    let text = std::fs::read_to_string(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, input.display())),
        ),
        _ => Error::Io(e),
    })?;
    let job: PrintJob = serde_json::from_str(&text)?;
    let t_parse = t0.elapsed();

    let mut renderer = Renderer::with_discovered_fonts();
    let document = renderer.render_job(&job)?;
    let t_render = t0.elapsed();

    FilePresenter::new(output).present(&document)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
    );

    Ok(())
}
