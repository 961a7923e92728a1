use clap::{Parser, Subcommand, ValueEnum};
use triage_core::{
    config::triage_config_from_lookup,
    interpret_with,
    prompt::{self, PromptKind},
    LabelPolicy, SymptomReport, TriageService,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom triage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a priority label from model text, without calling upstream
    Interpret {
        /// Text as returned by the model
        text: String,
        /// Fall back to PRIORIDAD I for tokens other than I, II, III or IV
        #[arg(long)]
        strict: bool,
    },
    /// Print the prompt that would be sent upstream
    Prompt {
        /// Which template to fill
        #[arg(value_enum)]
        kind: PromptArg,
        /// Reported symptoms, in order
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Procedure the patient underwent
        #[arg(long)]
        operacion: Option<String>,
    },
    /// Classify symptoms using the configured upstream model
    Diagnose {
        /// Reported symptoms, in order
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Procedure the patient underwent
        #[arg(long)]
        operacion: Option<String>,
    },
    /// Ask the configured upstream model for post-operative recommendations
    FollowUp {
        /// Reported symptoms, in order
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Procedure the patient underwent
        #[arg(long)]
        operacion: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PromptArg {
    Diagnosis,
    FollowUp,
}

impl From<PromptArg> for PromptKind {
    fn from(arg: PromptArg) -> Self {
        match arg {
            PromptArg::Diagnosis => PromptKind::Diagnosis,
            PromptArg::FollowUp => PromptKind::FollowUp,
        }
    }
}

fn service_from_env() -> Result<TriageService, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cfg = triage_config_from_lookup(|key| std::env::var(key).ok())?;
    Ok(TriageService::from_config(&cfg)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Interpret { text, strict } => {
            let policy = if strict {
                LabelPolicy::Strict
            } else {
                LabelPolicy::Permissive
            };
            println!("{}", interpret_with(Some(text.as_str()), policy));
        }
        Commands::Prompt {
            kind,
            symptoms,
            operacion,
        } => {
            let report = SymptomReport::new(symptoms, operacion)?;
            println!("{}", prompt::build(kind.into(), &report));
        }
        Commands::Diagnose {
            symptoms,
            operacion,
        } => {
            let report = SymptomReport::new(symptoms, operacion)?;
            let label = service_from_env()?.diagnose(&report).await?;
            println!("{label}");
        }
        Commands::FollowUp {
            symptoms,
            operacion,
        } => {
            let report = SymptomReport::new(symptoms, operacion)?;
            let recommendations = service_from_env()?.follow_up(&report).await?;
            println!("{recommendations}");
        }
    }

    Ok(())
}
