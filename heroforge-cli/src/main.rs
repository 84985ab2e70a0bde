mod report;
mod script;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use heroforge_game::{BuildConfig, ForgeEngine, GenerationMethod, JsonSource};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use script::{FlagChoices, load_script, replay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// 3d6 / 2d6+6 rolls
    Roll,
    /// Spend a point budget above the minimums
    PointBuy,
    /// Free entry up to 21
    Manual,
}

impl From<MethodArg> for GenerationMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Roll => Self::Roll,
            MethodArg::PointBuy => Self::PointBuy,
            MethodArg::Manual => Self::Manual,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "heroforge", version = "0.1.0")]
#[command(about = "Build RPG characters from a rules catalog and print the resulting sheet")]
struct Args {
    /// Seed for every dice roll in the session
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Culture key, e.g. barbarian
    #[arg(long)]
    culture: Option<String>,

    /// Career key, e.g. warrior
    #[arg(long)]
    career: Option<String>,

    /// Age bracket key, e.g. adult
    #[arg(long)]
    age: Option<String>,

    /// Roll an age in years from the age bracket
    #[arg(long)]
    roll_age: bool,

    /// Characteristic generation method
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Roll starting money for the culture
    #[arg(long)]
    roll_money: bool,

    /// Social class for the money roll (implies --roll-money)
    #[arg(long)]
    social_class: Option<String>,

    /// JSON array of commands applied after the flags above
    #[arg(long)]
    script: Option<PathBuf>,

    /// Reference catalog JSON (defaults to the bundled catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Build config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Point-buy budget override
    #[arg(long)]
    budget: Option<i32>,

    /// Stop at the first rejected command and exit non-zero
    #[arg(long)]
    strict: bool,

    /// List catalog keys and exit
    #[arg(long)]
    list_catalog: bool,

    /// Output format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    format: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn flag_choices(&self) -> FlagChoices {
        FlagChoices {
            method: self.method.map(GenerationMethod::from),
            culture: self.culture.clone(),
            career: self.career.clone(),
            age: self.age.clone(),
            roll_age: self.roll_age,
            roll_money: self.roll_money,
            social_class: self.social_class.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = load_source(&args)?;
    let engine = ForgeEngine::new(source);
    let config = effective_config(engine.loader(), args.budget)?;
    let mut session = engine
        .create_session_with(args.seed, config)
        .context("failed to open build session")?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.list_catalog {
        write_catalog_listing(output_target.writer(), session.catalog())?;
        output_target.flush_inner()?;
        return Ok(());
    }

    let mut commands = args.flag_choices().commands();
    if let Some(path) = &args.script {
        commands.extend(load_script(path)?);
    }
    log::info!("replaying {} commands", commands.len());
    let rejected = replay(&mut session, commands, args.strict);
    let snapshot = session.snapshot();

    match args.format.as_str() {
        "json" => report::generate_json_report(&mut output_target, &snapshot, &rejected)?,
        _ => report::generate_console_report(&mut output_target, &snapshot, &rejected)?,
    }
    output_target.flush_inner()?;

    if args.strict && !rejected.is_empty() {
        bail!("{} command(s) rejected", rejected.len());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn read_optional(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|path| {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    })
    .transpose()
}

fn load_source(args: &Args) -> Result<JsonSource> {
    Ok(JsonSource {
        catalog: read_optional(args.catalog.as_deref())?,
        config: read_optional(args.config.as_deref())?,
    })
}

fn effective_config(source: &JsonSource, budget: Option<i32>) -> Result<BuildConfig> {
    use heroforge_game::CatalogLoader;

    let mut config = source.load_config().context("invalid build config")?;
    if let Some(budget) = budget {
        config = config.with_point_buy_budget(budget);
    }
    config.validate().context("invalid build config")?;
    Ok(config)
}

fn write_catalog_listing(
    out: &mut dyn Write,
    catalog: &heroforge_game::ReferenceCatalog,
) -> Result<()> {
    writeln!(out, "{}", "Cultures:".bold())?;
    for culture in &catalog.cultures {
        writeln!(out, "  {:20} - {}", culture.key, culture.name)?;
    }
    writeln!(out, "{}", "Careers:".bold())?;
    for career in &catalog.careers {
        writeln!(out, "  {:20} - {}", career.key, career.name)?;
    }
    writeln!(out, "{}", "Age brackets:".bold())?;
    for bracket in &catalog.age_brackets {
        writeln!(
            out,
            "  {:20} - {} (bonus {}, cap {})",
            bracket.key, bracket.name, bracket.bonus_points, bracket.skill_cap
        )?;
    }
    writeln!(out, "{}", "Equipment:".bold())?;
    for item in &catalog.equipment {
        writeln!(out, "  {:20} - {} ({})", item.key, item.name, item.cost)?;
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
