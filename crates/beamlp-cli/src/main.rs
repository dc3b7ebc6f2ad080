mod logging;
mod model_file;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use beamlp_solver::{Model, PivotRule, Solution, SolutionStatus, Solver};
use logging::{LogFormat, LoggingConfig};
use model_file::ModelFile;

#[derive(Parser)]
#[command(name = "beamlp")]
#[command(about = "Solve small linear programs such as radiation beam intensity plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log level filter, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the built-in radiation therapy beam model
    Beam {
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Solve a JSON model file and output the optimal solution
    Solve {
        /// The model file
        file: PathBuf,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Check a JSON model file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

#[derive(Args)]
struct SolverArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
    /// Maximum simplex pivots before giving up
    #[arg(long, default_value_t = 10000)]
    max_iterations: usize,
    /// Values below this magnitude are treated as zero
    #[arg(long, default_value_t = 1e-9, value_parser = parse_tolerance)]
    tolerance: f64,
    /// Entering column selection rule
    #[arg(long, value_enum, default_value_t = PivotRuleArg::Bland)]
    pivot_rule: PivotRuleArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PivotRuleArg {
    Bland,
    Dantzig,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let tol: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if tol.is_finite() && tol > 0.0 {
        Ok(tol)
    } else {
        Err(format!("tolerance must be positive and finite, got {}", s))
    }
}

impl SolverArgs {
    fn solver(&self) -> Solver {
        let rule = match self.pivot_rule {
            PivotRuleArg::Bland => PivotRule::Bland,
            PivotRuleArg::Dantzig => PivotRule::Dantzig,
        };
        Solver::new()
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance)
            .with_pivot_rule(rule)
    }
}

/// JSON output for a solve
#[derive(Serialize)]
struct Report<'a> {
    model: &'a str,
    status: SolutionStatus,
    /// Absent unless the objective is finite
    objective_value: Option<f64>,
    iterations: usize,
    values: Vec<VariableValue<'a>>,
}

#[derive(Serialize)]
struct VariableValue<'a> {
    name: &'a str,
    value: f64,
}

impl<'a> Report<'a> {
    fn new(label: &'a str, model: &'a Model, solution: &Solution) -> Self {
        let values = model
            .variables()
            .iter()
            .zip(&solution.values)
            .map(|(v, &value)| VariableValue { name: &v.name, value })
            .collect();
        Self {
            model: label,
            status: solution.status,
            objective_value: solution.objective_value.is_finite().then_some(solution.objective_value),
            iterations: solution.iterations,
            values,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
    }
    .init();

    match cli.command {
        Commands::Beam { solver } => {
            let beam = beamlp_solver::radiation_therapy();
            run_solve("radiation therapy", &beam.model, &solver);
        }
        Commands::Solve { file, solver } => {
            let model = load_model(&file);
            let label = file.display().to_string();
            run_solve(&label, &model, &solver);
        }
        Commands::Check { file } => {
            let model = load_model(&file);
            match model.validate() {
                Ok(()) => {
                    let objective = &model.objective().expression;
                    let names: Vec<&str> = objective
                        .terms()
                        .filter_map(|(var, _)| model.variable(var))
                        .map(|v| v.name.as_str())
                        .collect();

                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", model.num_variables());
                    println!("  {} constraints", model.num_constraints());
                    println!("  {} objective terms ({})", objective.len(), names.join(", "));
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_model(file: &Path) -> Model {
    let spec = match ModelFile::load(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };

    match spec.to_model() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Model error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_solve(label: &str, model: &Model, args: &SolverArgs) {
    let solver = args.solver();
    tracing::info!(
        max_iterations = solver.max_iterations(),
        tolerance = solver.tolerance(),
        pivot_rule = ?solver.pivot_rule(),
        "Solving {}",
        label
    );

    let solution = match solver.solve(model) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Solve error: {}", e);
            std::process::exit(1);
        }
    };

    match args.format {
        OutputFormat::Json => {
            let report = Report::new(label, model, &solution);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing solution: {}", e);
                    std::process::exit(1);
                }
            }
        }
        OutputFormat::Pretty => print_pretty(label, model, &solution),
    }

    if !solution.is_optimal() {
        std::process::exit(1);
    }
}

fn print_pretty(label: &str, model: &Model, solution: &Solution) {
    println!("Model: {}", label);
    println!("Status: {}", solution.status);

    match solution.status {
        SolutionStatus::Optimal => {
            println!("Objective: {:.4}", solution.objective_value);
            println!("Iterations: {}", solution.iterations);
            println!();
            println!("Variables:");
            for (v, value) in model.variables().iter().zip(&solution.values) {
                println!("  {:20} {:12.4}", v.name, value);
            }
        }
        SolutionStatus::Infeasible => {
            println!("No solution exists that satisfies all constraints.");
        }
        SolutionStatus::Unbounded => {
            println!("The problem has no finite optimal solution.");
        }
        SolutionStatus::IterationLimit => {
            println!("Gave up after {} pivots without a definitive answer.", solution.iterations);
        }
    }
}
