//! stress-svm Command Line Interface
//!
//! Classifies a student's self-reported indicators into a stress level
//! using one of the trained back-ends stored as JSON artifacts.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use stress_svm::api::{Assessment, ClassifierKind, ClassifierSet, ModelPaths};
use stress_svm::core::{ClassifierError, Result, StressIndicators, FEATURE_NAMES};
use stress_svm::labels::{resolve_label, StressLevel};
use stress_svm::persistence::ModelArtifact;
use stress_svm::FeatureDataset;

#[derive(Parser)]
#[command(name = "stress-svm")]
#[command(about = "Student stress-level classification")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "stress-svm contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one student's indicators
    Predict(PredictArgs),
    /// Classify every row of a CSV file
    Batch(BatchArgs),
    /// Display model artifact information
    Info(InfoArgs),
    /// Describe the input features and stress categories
    Describe,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliClassifier {
    /// One-vs-rest RBF SVM (default)
    #[value(name = "svm")]
    Svm,
    /// Random forest
    #[value(name = "random-forest", alias = "rf")]
    RandomForest,
    /// k-nearest-neighbors
    #[value(name = "knn")]
    Knn,
}

impl From<CliClassifier> for ClassifierKind {
    fn from(cli: CliClassifier) -> Self {
        match cli {
            CliClassifier::Svm => ClassifierKind::Svm,
            CliClassifier::RandomForest => ClassifierKind::RandomForest,
            CliClassifier::Knn => ClassifierKind::Knn,
        }
    }
}

#[derive(Args)]
struct ModelArgs {
    /// Directory holding svm_model.json, rf_model.json and knn_model.json
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// SVM artifact (overrides --model-dir)
    #[arg(long)]
    svm: Option<PathBuf>,

    /// Random forest artifact (overrides --model-dir)
    #[arg(long)]
    forest: Option<PathBuf>,

    /// kNN artifact (overrides --model-dir)
    #[arg(long)]
    knn: Option<PathBuf>,

    /// RBF gamma, overriding the value stored in the SVM artifact
    #[arg(long)]
    gamma: Option<f64>,

    /// Classifier to use
    #[arg(short, long, value_enum, default_value = "svm")]
    classifier: CliClassifier,
}

impl ModelArgs {
    fn paths(&self) -> ModelPaths {
        let mut paths = ModelPaths::in_dir(&self.model_dir);
        if let Some(svm) = &self.svm {
            paths.svm = svm.clone();
        }
        if let Some(forest) = &self.forest {
            paths.random_forest = forest.clone();
        }
        if let Some(knn) = &self.knn {
            paths.knn = knn.clone();
        }
        paths
    }

    /// Load only the selected back-end
    fn load(&self) -> Result<(ClassifierSet, ClassifierKind)> {
        let kind = ClassifierKind::from(self.classifier);
        let paths = self.paths();
        let path = paths.path_for(kind);
        info!("Loading {kind} model from: {path:?}");

        let mut set = ClassifierSet::new();
        set.load_kind(kind, path, self.gamma)?;
        Ok((set, kind))
    }
}

#[derive(Args)]
struct PredictArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Self esteem (0-10)
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    self_esteem: f64,

    /// Depression (0-10)
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    depression: f64,

    /// Anxiety level (0-10)
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    anxiety: f64,

    /// Sleep quality (0-10)
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    sleep_quality: f64,

    /// Bullying (0-10)
    #[arg(long, default_value = "5.0", allow_negative_numbers = true)]
    bullying: f64,

    /// Show handling advice for the predicted level
    #[arg(long)]
    advice: bool,
}

#[derive(Args)]
struct BatchArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// CSV file with five feature columns and an optional label column
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report accuracy against the label column
    #[arg(long)]
    evaluate: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model artifact file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Predict(args) => predict_command(args),
        Commands::Batch(args) => batch_command(args),
        Commands::Info(args) => info_command(args),
        Commands::Describe => describe_command(),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn predict_command(args: PredictArgs) -> Result<()> {
    let indicators = StressIndicators::new(
        args.self_esteem,
        args.depression,
        args.anxiety,
        args.sleep_quality,
        args.bullying,
    );
    indicators.validate()?;

    let (classifiers, kind) = args.model.load()?;
    let assessment = classifiers.assess(kind, &indicators)?;
    info!("Predicted class {} with {kind}", assessment.class_id);

    print_assessment(&assessment, args.advice);
    Ok(())
}

fn print_assessment(assessment: &Assessment, advice: bool) {
    println!(
        "Predicted stress level: {} ({})",
        assessment.class_id, assessment.description
    );
    if let (true, Some(level)) = (advice, assessment.level) {
        println!("Signs: {}", level.signs());
        println!("Suggestions:");
        for item in level.advice() {
            println!("  - {item}");
        }
    }
}

fn batch_command(args: BatchArgs) -> Result<()> {
    info!("Loading prediction data from: {:?}", args.data);
    let dataset = FeatureDataset::from_file(&args.data)?;
    info!("Loaded {} samples", dataset.len());

    let (classifiers, kind) = args.model.load()?;
    let predictions = classifiers.predict(kind, dataset.samples())?;

    if let Some(output_path) = &args.output {
        let file = File::create(output_path).map_err(ClassifierError::IoError)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "# Predictions for {} samples", predictions.len())?;
        writeln!(writer, "# Format: sample_index class_id")?;
        for (i, class_id) in predictions.iter().enumerate() {
            writeln!(writer, "{i} {class_id}")?;
        }
        writer.flush()?;

        info!("Predictions saved to: {output_path:?}");
    } else {
        println!("# Predictions for {} samples", predictions.len());
        println!("# Format: sample_index class_id");
        for (i, class_id) in predictions.iter().enumerate() {
            println!("{i} {class_id}");
        }
    }

    if args.evaluate {
        match dataset.accuracy(&predictions) {
            Some(accuracy) => println!("Accuracy: {:.2}%", accuracy * 100.0),
            None => {
                return Err(ClassifierError::InvalidParameter(
                    "--evaluate requires a label column".to_string(),
                ))
            }
        }
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    let artifact = ModelArtifact::load_from_file(&args.model)?;
    print!("{}", artifact.summary());
    Ok(())
}

fn describe_command() -> Result<()> {
    println!("Input features (0-10):");
    for name in FEATURE_NAMES {
        println!("  - {name}");
    }
    println!();
    println!("Stress categories:");
    for level in StressLevel::ALL {
        println!("  {} -> {}", level.class_id(), resolve_label(level.class_id()));
        println!("       Signs: {}", level.signs());
        for item in level.advice() {
            println!("       - {item}");
        }
    }
    Ok(())
}
