use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use stroop_core::{
    ConditionSummary, ModelConfig, ModelKind, Schedule, export_json, prepare, run,
    selection_changes,
};

#[derive(Parser)]
#[command(name = "stroop", about = "Semantic-pointer model of the Stroop task")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a model and score its responses
    Run {
        #[command(flatten)]
        model: ModelArgs,

        /// Simulated seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Write probes, similarities and outcomes to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Also print every change of the selected action
        #[arg(long)]
        timeline: bool,
    },

    /// Print the similarity matrix of the generated vocabulary
    Vocab {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print the trial sequence and its presentation windows
    Schedule {
        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print the default configuration of a model as TOML
    Config {
        #[arg(long, value_enum, default_value_t = ModelArg::Recurrent)]
        model: ModelArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    #[value(name = "feedforward", alias = "feed-forward")]
    FeedForward,
    Recurrent,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::FeedForward => ModelKind::FeedForward,
            ModelArg::Recurrent => ModelKind::Recurrent,
        }
    }
}

/// Options shared by every command that builds a model.
#[derive(Args)]
struct ModelArgs {
    /// Circuit to build (overrides the config file)
    #[arg(long, value_enum)]
    model: Option<ModelArg>,

    /// TOML file layered over the model defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the vocabulary and the trial sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trials to draw
    #[arg(long)]
    trials: Option<usize>,

    /// Vector dimensionality
    #[arg(long)]
    dimensions: Option<usize>,
}

fn load_config(args: &ModelArgs) -> Result<ModelConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ModelConfig::from_toml(&content)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ModelConfig::defaults(args.model.map(Into::into).unwrap_or_default()),
    };

    if let Some(model) = args.model {
        let kind = ModelKind::from(model);
        if kind != config.model {
            // Switching circuit keeps the shared keys but takes the new timing
            let defaults = ModelConfig::defaults(kind);
            config.model = kind;
            config.t_stim = defaults.t_stim;
            config.t_isi = defaults.t_isi;
            config.duration = defaults.duration;
            config.attention = defaults.attention;
        }
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if let Some(dimensions) = args.dimensions {
        config.dimensions = dimensions;
    }
    config.validate().context("invalid model configuration")?;
    Ok(config)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Run {
            model,
            duration,
            export,
            timeline,
        } => cmd_run(model, *duration, export.as_deref(), *timeline),
        Commands::Vocab { model } => cmd_vocab(model),
        Commands::Schedule { model } => cmd_schedule(model),
        Commands::Config { model } => cmd_config(*model),
    }
}

fn cmd_run(
    args: &ModelArgs,
    duration: Option<f64>,
    export: Option<&Path>,
    timeline: bool,
) -> Result<()> {
    let mut config = load_config(args)?;
    if let Some(duration) = duration {
        config.duration = duration;
    }
    let result = run(&config).context("simulation failed")?;

    println!("model:       {}", config.model.as_str());
    println!("dimensions:  {}", config.dimensions);
    println!("seed:        {}", config.seed);
    println!("steps:       {}", result.data.len());
    println!();

    if timeline {
        for (t, selection) in selection_changes(&result.data) {
            let name = selection
                .and_then(|i| result.actions.get(i))
                .map_or("-", String::as_str);
            println!("{t:>8.3}s  {name}");
        }
        println!();
    }

    println!(
        "{:<6} {:<6} {:<6} {:<9} {:<14} {:<11} rt",
        "trial", "word", "color", "expected", "responses", "outcome"
    );
    for o in &result.outcomes {
        let responses = if o.responses.is_empty() {
            "-".to_string()
        } else {
            o.responses.join(",")
        };
        let rt = o
            .reaction_time
            .map_or_else(|| "-".to_string(), |rt| format!("{rt:.3}"));
        println!(
            "{:<6} {:<6} {:<6} {:<9} {:<14} {:<11} {}",
            o.index,
            o.trial.word,
            o.trial.color,
            o.expected.as_deref().unwrap_or("-"),
            responses,
            o.outcome.as_str(),
            rt
        );
    }
    println!();

    print_condition("congruent", &result.summary.congruent);
    print_condition("incongruent", &result.summary.incongruent);
    if let Some(effect) = result.summary.interference() {
        println!("interference: {effect:+.3}s");
    }

    if let Some(path) = export {
        let json = export_json(&result).context("failed to serialize run")?;
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("exported to {}", path.display());
    }
    Ok(())
}

fn print_condition(label: &str, s: &ConditionSummary) {
    let accuracy = s
        .accuracy()
        .map_or_else(|| "-".to_string(), |a| format!("{:.2}", a));
    let rt = s
        .mean_reaction_time
        .map_or_else(|| "-".to_string(), |rt| format!("{rt:.3}s"));
    println!(
        "{label:<12} trials={} correct={} errors={} corrected={} none={} accuracy={accuracy} mean_rt={rt}",
        s.trials, s.correct, s.errors, s.corrected, s.no_response
    );
}

fn cmd_vocab(args: &ModelArgs) -> Result<()> {
    let config = load_config(args)?;
    let (vocab, _) = prepare(&config).context("failed to generate vocabulary")?;

    print!("{:<8}", "");
    for key in vocab.keys() {
        print!("{key:>8}");
    }
    println!();
    for key in vocab.keys() {
        let v = vocab.get(key)?;
        print!("{key:<8}");
        for sim in vocab.similarity(v) {
            print!("{sim:>8.3}");
        }
        println!();
    }
    Ok(())
}

fn cmd_schedule(args: &ModelArgs) -> Result<()> {
    let config = load_config(args)?;
    let (_, trials) = prepare(&config).context("failed to generate trials")?;
    let schedule = Schedule::new(config.t_stim, config.t_isi)?;
    let color_offset = match config.model {
        ModelKind::FeedForward => 0.0,
        ModelKind::Recurrent => config.recurrent.color_offset,
    };

    println!(
        "period: {:.3}s (stimulus {:.3}s, blank {:.3}s)",
        schedule.period(),
        config.t_stim,
        config.t_isi
    );
    println!(
        "{:<6} {:<6} {:<6} {:<10} {:<18} color",
        "trial", "word", "color", "congruent", "word"
    );
    for (n, trial) in trials.iter().enumerate() {
        let (word_on, word_off) = schedule.window(n, 0.0);
        let (color_on, color_off) = schedule.window(n, color_offset);
        println!(
            "{:<6} {:<6} {:<6} {:<10} {:<18} {:.3}-{:.3}",
            n,
            trial.word,
            trial.color,
            if trial.is_congruent() { "yes" } else { "no" },
            format!("{word_on:.3}-{word_off:.3}"),
            color_on,
            color_off
        );
    }
    println!(
        "trials: {} ({} congruent)",
        trials.len(),
        trials.congruent_count()
    );
    Ok(())
}

fn cmd_config(model: ModelArg) -> Result<()> {
    let toml = ModelConfig::defaults(model.into())
        .to_toml()
        .context("failed to serialize config")?;
    print!("{toml}");
    Ok(())
}
