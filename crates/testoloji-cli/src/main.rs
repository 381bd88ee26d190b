use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use testoloji_crop::{
    CropOptions, CropSession, DirectoryUploader, DisplayPoint, DisplaySize, DraftOutcome,
    PageSource, RectDetector, SourceRect, WhitespaceDetector,
};
use testoloji_layout::{
    AnswerLetter, ColumnCount, Difficulty, LayoutOptions, Page, QuestionManifest, Template,
};

#[derive(Parser)]
#[command(name = "testoloji", about = "Exam question cropping and layout tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a question bank breaks into pages
    Paginate {
        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render a question bank to an exam PDF
    Render {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Fill the correct answer bubbles (answer copy)
        #[arg(long)]
        answers: bool,
    },

    /// Export the answer key as CSV
    AnswerKey {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Find question regions on a page image
    Detect {
        /// Page image (PNG or JPEG)
        #[arg(short, long)]
        image: PathBuf,

        /// Region to search as x,y,w,h in image pixels (default: whole page)
        #[arg(long)]
        region: Option<SourceRect>,

        /// Crop options JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Crop one question from a page image into a question bank
    Crop {
        /// Page image (PNG or JPEG)
        #[arg(short, long)]
        image: PathBuf,

        /// Selection as x,y,w,h in display pixels
        #[arg(long, value_parser = parse_display_rect)]
        rect: (f32, f32, f32, f32),

        /// Size the page was displayed at, as WxH
        #[arg(long, value_parser = parse_display_size)]
        display: DisplaySize,

        /// Page number within the source PDF
        #[arg(long, default_value = "1")]
        page: u32,

        /// Snap the selection to the surrounding ink
        #[arg(long)]
        magnet: bool,

        #[arg(long, value_enum)]
        answer: Option<AnswerArg>,

        /// Difficulty from 1 to 10
        #[arg(long)]
        difficulty: Option<u8>,

        /// Question bank directory
        #[arg(long)]
        output_dir: PathBuf,

        /// Crop options JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// Question manifest (questions.json)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Layout options JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of question columns
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    columns: Option<u8>,

    /// Space below each question in mm
    #[arg(long)]
    spacing: Option<f32>,

    #[arg(long, value_enum)]
    template: Option<TemplateArg>,

    /// Document title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateArg {
    Classic,
    Modern,
    Compact,
    Elegant,
    Exam,
    Osym,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnswerArg {
    A,
    B,
    C,
    D,
    E,
}

impl From<TemplateArg> for Template {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Classic => Self::Classic,
            TemplateArg::Modern => Self::Modern,
            TemplateArg::Compact => Self::Compact,
            TemplateArg::Elegant => Self::Elegant,
            TemplateArg::Exam => Self::Exam,
            TemplateArg::Osym => Self::Osym,
        }
    }
}

impl From<AnswerArg> for AnswerLetter {
    fn from(arg: AnswerArg) -> Self {
        match arg {
            AnswerArg::A => Self::A,
            AnswerArg::B => Self::B,
            AnswerArg::C => Self::C,
            AnswerArg::D => Self::D,
            AnswerArg::E => Self::E,
        }
    }
}

fn parse_display_rect(s: &str) -> std::result::Result<(f32, f32, f32, f32), String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("expected x,y,w,h: {e}"))?;
    match parts[..] {
        [x, y, w, h] if w >= 0.0 && h >= 0.0 => Ok((x, y, w, h)),
        _ => Err("expected x,y,w,h with non-negative size".to_string()),
    }
}

fn parse_display_size(s: &str) -> std::result::Result<DisplaySize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WxH".to_string())?;
    let size = DisplaySize::new(
        w.trim().parse().map_err(|e| format!("bad width: {e}"))?,
        h.trim().parse().map_err(|e| format!("bad height: {e}"))?,
    );
    if !size.is_valid() {
        return Err("display size must be positive".to_string());
    }
    Ok(size)
}

impl LayoutArgs {
    /// Load the manifest and options, with flags overriding the config file
    async fn load(&self) -> Result<(QuestionManifest, LayoutOptions)> {
        let manifest = QuestionManifest::load(&self.manifest)
            .await
            .with_context(|| format!("loading {}", self.manifest.display()))?;
        manifest.validate()?;

        let mut options = match &self.config {
            Some(path) => LayoutOptions::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => LayoutOptions::default(),
        };

        if let Some(columns) = self.columns {
            options.columns = ColumnCount::try_from(columns)?;
        }
        if let Some(spacing) = self.spacing {
            options.question_spacing_mm = spacing;
        }
        if let Some(template) = self.template {
            options.template = template.into();
        }
        if let Some(title) = self.title.clone().or_else(|| manifest.title.clone()) {
            options.title = title;
        }
        options.validate()?;

        Ok((manifest, options))
    }
}

async fn load_crop_options(config: Option<&Path>) -> Result<CropOptions> {
    Ok(match config {
        Some(path) => CropOptions::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => CropOptions::default(),
    })
}

fn print_breakdown(pages: &[Page]) {
    for (i, page) in pages.iter().enumerate() {
        let numbers = |column: &[testoloji_layout::PlacedQuestion]| {
            column
                .iter()
                .map(|q| q.number().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let test = page
            .project_index
            .map(|p| format!(" (test {})", p + 1))
            .unwrap_or_default();
        if page.right.is_empty() {
            println!("  Page {}{}: [{}]", i + 1, test, numbers(&page.left));
        } else {
            println!(
                "  Page {}{}: left [{}] right [{}]",
                i + 1,
                test,
                numbers(&page.left),
                numbers(&page.right)
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Paginate { layout } => {
            let (manifest, options) = layout.load().await?;
            let config = options.pagination_config();
            let pages = testoloji_layout::paginate(&manifest.questions, &config);
            let stats = testoloji_layout::calculate_statistics(&pages, &config);

            println!("Page breakdown ({} columns):", options.columns.count());
            print_breakdown(&pages);

            println!("Layout Statistics:");
            println!("  Questions: {}", stats.question_count);
            println!("  Pages: {}", stats.page_count);
            println!("  Tests: {}", stats.test_count);
            println!("  With answers: {}", stats.answered_count);
            if let Some(difficulty) = stats.average_difficulty {
                println!("  Average difficulty: {:.1}", difficulty);
            }
            if stats.oversized_count > 0 {
                println!("  Oversized questions: {}", stats.oversized_count);
            }
            println!("  Column fill: {:.0}%", stats.fill_ratio * 100.0);
        }

        Commands::Render {
            layout,
            output,
            answers,
        } => {
            let (manifest, mut options) = layout.load().await?;
            if answers {
                options.show_answer_bubbles = true;
                options.show_answers = true;
            }

            let doc = testoloji_layout::render_pdf(&manifest.questions, &options).await?;
            let page_count = doc.get_pages().len();
            testoloji_layout::save_pdf(doc, &output).await?;
            println!(
                "Rendered {} questions on {} pages → {}",
                manifest.questions.len(),
                page_count,
                output.display()
            );
        }

        Commands::AnswerKey { layout, output } => {
            let (manifest, options) = layout.load().await?;
            let pages = testoloji_layout::paginate(&manifest.questions, &options.pagination_config());
            let entries = testoloji_layout::answer_key(&pages);
            testoloji_layout::save_answer_key_csv(&entries, &output).await?;
            println!("Answer key for {} questions → {}", entries.len(), output.display());
        }

        Commands::Detect {
            image,
            region,
            config,
        } => {
            let options = load_crop_options(config.as_deref()).await?;
            let raster = image::open(&image)
                .with_context(|| format!("opening {}", image.display()))?
                .to_rgba8();
            let region =
                region.unwrap_or_else(|| SourceRect::new(0, 0, raster.width(), raster.height()));

            let detector = WhitespaceDetector::new(options.detector);
            let rects = tokio::task::spawn_blocking(move || detector.detect(&raster, region)).await??;
            println!("{}", serde_json::to_string_pretty(&rects)?);
        }

        Commands::Crop {
            image,
            rect,
            display,
            page,
            magnet,
            answer,
            difficulty,
            output_dir,
            config,
        } => {
            let mut options = load_crop_options(config.as_deref()).await?;
            options.magnet |= magnet;

            let raster = image::open(&image)
                .with_context(|| format!("opening {}", image.display()))?
                .to_rgba8();
            let pdf_name = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "page".to_string());

            let mut session = CropSession::new(options);
            session.open();
            session.open_page(PageSource::new(pdf_name, page), raster, display);

            let (x, y, w, h) = rect;
            session.begin_draft(DisplayPoint::new(x, y));
            session.update_draft(DisplayPoint::new(x + w, y + h));
            let crop = match session.finish_draft() {
                DraftOutcome::Selected(crop) => crop,
                _ => bail!("Selection {w}x{h} is too small or outside the page"),
            };

            session.set_answer(answer.map(Into::into));
            session.set_difficulty(difficulty.map(Difficulty::new).transpose()?);
            session.add_to_queue()?;

            let uploader = DirectoryUploader::new(&output_dir);
            session.upload_batch(&uploader).await?;
            for notice in session.take_notices() {
                log::debug!("{:?}: {}", notice.level, notice.message);
            }
            println!("Cropped {} → {}", crop, uploader.manifest_path().display());
        }
    }

    Ok(())
}
