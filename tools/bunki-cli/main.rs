use ahash::AHashMap;
use bunki::consistency::{check_survey, is_terminal_target, unreachable_sections};
use bunki::prelude::*;
use clap::Parser;
use std::fs;
use std::time::Instant;

/// Resolve survey section navigation from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the survey definition JSON file
    survey_path: String,
    /// Optional path to a JSON object of answers keyed by question id
    answers_path: Option<String>,

    /// Section the respondent just completed (defaults to the first section)
    #[arg(short, long)]
    from: Option<String>,

    /// Print the advisory consistency report instead of navigating
    #[arg(short, long)]
    check: bool,

    /// Preview the full path from the first section
    #[arg(short, long)]
    walk: bool,

    /// Evaluate conditions on questions missing from the survey as false
    #[arg(long)]
    fail_dangling: bool,

    /// Maximum number of sections visited by --walk
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let load_start = Instant::now();
    let survey = SurveyDefinition::from_file(&cli.survey_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load survey: {}", e)));
    let answers = match &cli.answers_path {
        Some(path) => load_answers(path),
        None => {
            println!("No answers file provided. Evaluating with no answers.");
            AHashMap::new()
        }
    };
    log::debug!("inputs loaded in {:?}", load_start.elapsed());

    if cli.check {
        run_check(&survey);
        return;
    }

    let policy = if cli.fail_dangling {
        DanglingReferencePolicy::FailCondition
    } else {
        DanglingReferencePolicy::TreatAsBlank
    };
    let navigator = Navigator::builder(survey)
        .dangling_reference_policy(policy)
        .max_walk_steps(cli.max_steps)
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid survey: {}", e)));

    if cli.walk {
        let path = navigator
            .walk(&answers)
            .unwrap_or_else(|e| exit_with_error(&format!("Walk failed: {}", e)));
        println!("\nPath: {} -> {}", path.join(" -> "), END_SURVEY);
        return;
    }

    let from = cli
        .from
        .or_else(|| navigator.survey().first_section().map(|s| s.id.clone()))
        .unwrap_or_else(|| exit_with_error("The survey has no sections."));

    let eval_start = Instant::now();
    let outcome = navigator
        .resolve(&from, &answers)
        .unwrap_or_else(|e| exit_with_error(&format!("Navigation failed: {}", e)));
    let eval_duration = eval_start.elapsed();

    println!("\nLeaving section '{}'", from);
    println!("  -> Next: {}", outcome.next);
    println!("  -> Reason: {}", outcome.reason);
    println!("  -> Resolved in {:?}", eval_duration);
}

fn load_answers(path: &str) -> AHashMap<String, serde_json::Value> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read answers file '{}': {}", path, e))
    });
    serde_json::from_str(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse answers JSON: {}", e)))
}

fn run_check(survey: &SurveyDefinition) {
    let issues = check_survey(survey);
    println!("\n--- Consistency Report ---");
    if issues.is_empty() {
        println!("No issues found.");
    }
    for issue in &issues {
        println!("  - {}", issue);
    }

    let unreachable = unreachable_sections(survey);
    if !unreachable.is_empty() {
        println!("\nUnreachable sections: {}", unreachable.join(", "));
    }

    let jump_only: Vec<&str> = survey
        .sections
        .iter()
        .filter(|s| is_terminal_target(&s.id, &survey.sections))
        .map(|s| s.id.as_str())
        .collect();
    if !jump_only.is_empty() {
        println!("Sections only entered by branching: {}", jump_only.join(", "));
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
