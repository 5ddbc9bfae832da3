use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use adpress::Error;
use adpress::Renderer;
use adpress::config::TemplateSettings;
use adpress::fonts::FontLibrary;
use adpress::model::PrintJob;
use adpress::present::{FilePresenter, Presenter, ViewerPresenter};

#[derive(Parser)]
#[command(
    name = "adpress",
    version,
    about = "Render billboard contracts and print tables into print-ready documents"
)]
struct Cli {
    /// Job description JSON.
    job: PathBuf,

    /// Output HTML path. Defaults to the job path with an .html extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Template settings overlay, applied when the job embeds none.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Extra font directory to index before rendering.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Open the rendered document in the system viewer.
    #[arg(long)]
    open: bool,

    /// Fail instead of falling back to estimated text widths.
    #[arg(long)]
    require_fonts: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut library = FontLibrary::discover();
    if let Some(dir) = &cli.fonts {
        library.register_dir(dir);
    }
    if cli.require_fonts && library.is_empty() {
        return Err(Error::Font(
            "no usable font faces found; set ADPRESS_FONTS or pass --fonts".into(),
        ));
    }

    let text = std::fs::read_to_string(&cli.job)?;
    let mut job: PrintJob = serde_json::from_str(&text)?;

    if let Some(path) = &cli.settings {
        let overlay: TemplateSettings = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let (PrintJob::Contract { settings, .. }
        | PrintJob::BillboardTable { settings, .. }
        | PrintJob::PrintTaskSheet { settings, .. }
        | PrintJob::ReprintReport { settings, .. }
        | PrintJob::InstallationSheet { settings, .. }) = &mut job;
        if settings.is_none() {
            *settings = Some(overlay);
        }
    }

    let mut renderer = Renderer::new(library);
    let document = renderer.render_job(&job)?;

    let output = cli.output.unwrap_or_else(|| cli.job.with_extension("html"));
    if cli.open {
        ViewerPresenter::at(&output).present(&document)
    } else {
        FilePresenter::new(&output).present(&document)
    }
}
