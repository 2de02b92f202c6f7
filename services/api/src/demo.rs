use crate::infra::ArtifactArgs;
use bankconvert::config::{AppConfig, ArtifactConfig};
use bankconvert::error::AppError;
use bankconvert::subscription::{
    ContactDay, ContactMethod, ContactMonth, CreditDefault, CustomerProfile, Education,
    HousingLoan, Job, MaritalStatus, ModelContext, PersonalLoan, PredictionOutcome,
    PredictionService, PreviousOutcome, ProbabilitySource, ThresholdProvider,
};
use chrono::SecondsFormat;
use clap::Args;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// JSON file holding one customer profile. Reads stdin when omitted or "-".
    #[arg(long)]
    pub(crate) profile: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
    /// Print the human-readable summary instead of JSON
    #[arg(long)]
    pub(crate) summary: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ThresholdArgs {
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
    /// Write the resolved medians to this path as a thresholds artifact
    #[arg(long)]
    pub(crate) write: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        profile,
        artifacts,
        summary,
    } = args;

    let raw = match profile {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let profile: CustomerProfile = serde_json::from_str(&raw)?;

    let service = load_service(&artifacts.apply(AppConfig::load()?.artifacts))?;
    let outcome = service.predict(&profile)?;

    if summary {
        println!("{}", render_outcome("Customer", &profile, &outcome));
    } else {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }
    Ok(())
}

pub(crate) fn run_thresholds(args: ThresholdArgs) -> Result<(), AppError> {
    let config = args.artifacts.apply(AppConfig::load()?.artifacts);
    let resolved = ThresholdProvider::new(&config.thresholds_path, &config.dataset_path)
        .with_fallback(config.threshold_fallback)
        .resolve()?;

    println!("Economic thresholds ({})", resolved.source.label());
    println!("  emp.var.rate median: {}", resolved.thresholds.emp_median);
    println!("  nr.employed median:  {}", resolved.thresholds.nr_median);

    if let Some(path) = args.write {
        std::fs::write(&path, serde_json::to_vec_pretty(&resolved.thresholds)?)?;
        println!("  written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = load_service(&args.artifacts.apply(AppConfig::load()?.artifacts))?;
    let summary = service.context().summary();

    println!("Term-deposit subscription demo");
    println!(
        "Model: {} ({} features, thresholds from {})",
        summary.model,
        summary.n_features,
        service.context().threshold_source().label()
    );

    for (name, profile) in sample_profiles() {
        let outcome = service.predict(&profile)?;
        println!("\n{}", render_outcome(name, &profile, &outcome));
    }
    Ok(())
}

fn load_service(config: &ArtifactConfig) -> Result<PredictionService, AppError> {
    let context = ModelContext::load(config)?;
    Ok(PredictionService::new(Arc::new(context)))
}

pub(crate) fn sample_profiles() -> [(&'static str, CustomerProfile); 2] {
    let retiree = CustomerProfile {
        age: 70,
        job: Job::Retired,
        marital: MaritalStatus::Married,
        education: Education::UniversityDegree,
        default: CreditDefault::No,
        housing: HousingLoan::No,
        loan: PersonalLoan::No,
        contact: ContactMethod::Cellular,
        month: ContactMonth::Oct,
        day_of_week: ContactDay::Wed,
        pdays: 5,
        previous: 2,
        poutcome: PreviousOutcome::Success,
        emp_var_rate: -1.8,
        cons_price_idx: 92.893,
        cons_conf_idx: -46.2,
        euribor3m: 1.313,
        nr_employed: 5099.1,
    };
    let prospect = CustomerProfile {
        age: 41,
        job: Job::Technician,
        housing: HousingLoan::Yes,
        contact: ContactMethod::Telephone,
        month: ContactMonth::May,
        pdays: 999,
        previous: 0,
        poutcome: PreviousOutcome::Nonexistent,
        emp_var_rate: 1.1,
        cons_price_idx: 93.994,
        cons_conf_idx: -36.4,
        euribor3m: 4.857,
        nr_employed: 5191.0,
        ..retiree.clone()
    };

    [
        ("Returning retiree", retiree),
        ("First-time prospect", prospect),
    ]
}

pub(crate) fn render_outcome(
    name: &str,
    profile: &CustomerProfile,
    outcome: &PredictionOutcome,
) -> String {
    let probability = match outcome.probability_source {
        ProbabilitySource::Model => format!("{:.1}%", outcome.probability * 100.0),
        ProbabilitySource::Placeholder => {
            format!("{:.1}% (placeholder)", outcome.probability * 100.0)
        }
    };

    let mut lines = vec![
        format!("{name}: {}", outcome.label_text),
        format!(
            "  probability: {probability}, band {}",
            outcome.band.label()
        ),
        format!(
            "  engineered: age group {}, economy {}, recency {}",
            outcome.engineered.age_group,
            outcome.engineered.economic_condition,
            outcome.engineered.contact_recency
        ),
    ];

    for warning in &outcome.warnings {
        lines.push(format!("  warning: {warning}"));
    }
    lines.push("  recommendations:".to_string());
    for recommendation in &outcome.recommendations {
        lines.push(format!("    - {recommendation}"));
    }
    lines.push(format!("  last contact: {}", profile.last_contact_label()));
    lines.push(format!("  history: {}", outcome.insights.campaign_history));
    lines.push(format!("  economy: {}", outcome.insights.economic_context));
    lines.push(format!(
        "  evaluated at {}",
        outcome
            .evaluated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    lines.join("\n")
}
