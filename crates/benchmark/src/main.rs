//! Panelcut Benchmark Runner CLI

use clap::{Parser, Subcommand, ValueEnum};
use panelcut_benchmark::{
    BenchmarkConfig, BenchmarkResult, BenchmarkRunner, Job, Method, SyntheticGenerator,
    SyntheticKind,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bench-runner")]
#[command(about = "Benchmark Runner for Panelcut")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in jobs and synthetic kinds
    List,

    /// Run benchmark on a built-in job
    Run {
        /// Job name (e.g., cabinet, wardrobe)
        #[arg(short, long)]
        job: String,

        #[command(flatten)]
        opts: RunOpts,
    },

    /// Run benchmark from a local JSON job file
    RunFile {
        /// Path to the JSON job file
        file: PathBuf,

        #[command(flatten)]
        opts: RunOpts,
    },

    /// Generate and run synthetic jobs
    Synthetic {
        /// Kind of job to generate
        #[arg(short, long, value_enum, default_value = "cabinet")]
        kind: KindArg,

        /// Size parameter (cabinets, units or part types)
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Generator seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Also write the generated job as JSON
        #[arg(long)]
        save_job: Option<PathBuf>,

        #[command(flatten)]
        opts: RunOpts,
    },
}

#[derive(clap::Args)]
struct RunOpts {
    /// Methods to benchmark
    #[arg(short, long, value_enum, default_values_t = vec![MethodArg::Legacy, MethodArg::Guillotine, MethodArg::Optimized, MethodArg::Annealed])]
    methods: Vec<MethodArg>,

    /// Annealing budget per run in milliseconds
    #[arg(short, long, default_value = "2000")]
    time_limit: u64,

    /// Number of annealing runs
    #[arg(short, long, default_value = "1")]
    runs: usize,

    /// Output file for results (JSON)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file for CSV results
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// Shelf packer, input order
    Legacy,
    /// Guillotine packer, input order
    Guillotine,
    /// Best of all sort orders
    Optimized,
    /// Simulated annealing refinement
    Annealed,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Legacy => Method::Legacy,
            MethodArg::Guillotine => Method::Guillotine,
            MethodArg::Optimized => Method::Optimized,
            MethodArg::Annealed => Method::Annealed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// Cabinet carcasses
    Cabinet,
    /// One repeated size
    Uniform,
    /// Long strips among medium panels
    TallStrip,
}

impl From<KindArg> for SyntheticKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Cabinet => SyntheticKind::Cabinet,
            KindArg::Uniform => SyntheticKind::Uniform,
            KindArg::TallStrip => SyntheticKind::TallStrip,
        }
    }
}

fn run_and_report(job: &Job, opts: RunOpts) -> anyhow::Result<()> {
    let methods: Vec<Method> = opts.methods.into_iter().map(Into::into).collect();
    let config = BenchmarkConfig::new()
        .with_methods(methods)
        .with_time_limit(opts.time_limit)
        .with_runs_per_config(opts.runs);

    let results = BenchmarkRunner::new(config).run_job(job);
    results.print_summary();
    print_comparison(&results);
    save(&results, opts.output.as_deref(), opts.csv.as_deref())?;

    let failures = results.runs.iter().filter(|r| !r.verified).count();
    if failures > 0 {
        anyhow::bail!("{} run(s) failed verification", failures);
    }
    Ok(())
}

fn print_comparison(results: &BenchmarkResult) {
    println!("Method Comparison:");
    println!("{:-<60}", "");
    for summary in results.summary_by_method() {
        println!(
            "  {:<12} runs={:<3} sheets={:<4} avg_yield={:.1}% avg_time={}ms",
            summary.method,
            summary.run_count,
            summary.total_sheets,
            summary.avg_yield * 100.0,
            summary.avg_time_ms
        );
    }
}

fn save(results: &BenchmarkResult, json: Option<&Path>, csv: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = json {
        results.save_json(path)?;
        println!("Results saved to: {}", path.display());
    }
    if let Some(path) = csv {
        results.save_csv(path)?;
        println!("CSV saved to: {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            println!("Built-in jobs:");
            println!("==============");
            for name in Job::builtin_names() {
                let job = Job::builtin(name)?;
                let info = job.info();
                println!(
                    "  - {:<12} {} units, {}",
                    name,
                    info.total_units,
                    job.description.unwrap_or_default()
                );
            }
            println!("\nSynthetic kinds:");
            for kind in SyntheticKind::ALL {
                println!("  - {}", kind);
            }
            println!("\nUse 'bench-runner run -j <JOB>' to run benchmarks");
        }

        Commands::Run { job, opts } => {
            let job = Job::builtin(&job)?;
            run_and_report(&job, opts)?;
        }

        Commands::RunFile { file, opts } => {
            let job = Job::load(&file)?;
            run_and_report(&job, opts)?;
        }

        Commands::Synthetic {
            kind,
            count,
            seed,
            save_job,
            opts,
        } => {
            let mut generator = SyntheticGenerator::with_seed(seed);
            let job = generator.generate(kind.into(), count);

            if let Some(path) = save_job {
                std::fs::write(&path, job.to_json()?)?;
                println!("Job saved to: {}", path.display());
            }
            run_and_report(&job, opts)?;
        }
    }

    Ok(())
}
