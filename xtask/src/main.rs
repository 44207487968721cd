use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride-hailing feed generator workspace",
    long_about = "A unified CLI for generating feeds, benchmarks,\n\
                  and CI checks in the feed generator workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full default feed (5 000 drivers, 10 000 requests)
    Generate {
        /// Output directory for the four artifacts
        #[arg(long, default_value = "output")]
        out_dir: String,
    },
    /// Generate a small seeded feed into target/sample-feed and inspect it
    Sample {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, sample run, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in feed_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Generate and inspect a small sample feed
    Sample,
    /// Run benchmarks
    Bench,
    /// Run check + sample + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

const SAMPLE_DIR: &str = "target/sample-feed";

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn feedgen(args: &[&str]) {
    let mut cargo_args = vec!["run", "-p", "feed_cli", "--release", "--"];
    cargo_args.extend_from_slice(args);
    run_cargo(&cargo_args);
}

fn sample_feed(seed: u64) {
    let seed = seed.to_string();
    step("Generate sample feed");
    feedgen(&[
        "generate",
        "--drivers",
        "200",
        "--requests",
        "500",
        "--seed",
        &seed,
        "--out-dir",
        SAMPLE_DIR,
    ]);

    for artifact in ["drivers.parquet", "passenger_requests.parquet"] {
        step(&format!("Inspect {artifact}"));
        let path = Path::new(SAMPLE_DIR).join(artifact);
        feedgen(&["inspect", &path.to_string_lossy()]);
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test feed_core");
    run_cargo(&["test", "-p", "feed_core"]);

    step("Test feed_cli");
    run_cargo(&["test", "-p", "feed_cli"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "feed_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { out_dir } => {
            feedgen(&["generate", "--out-dir", &out_dir]);
        }
        Commands::Sample { seed } => sample_feed(seed),
        Commands::Bench => ci_bench(),
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&["stash", "push", "-m", "Temporary stash for benchmark comparison"]);

            step("Running benchmark to create baseline");
            run_cargo(&[
                "bench",
                "--package",
                "feed_core",
                "--bench",
                "performance",
                "--",
                "--save-baseline",
                "main",
            ]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_cargo(&[
                "bench",
                "--package",
                "feed_core",
                "--bench",
                "performance",
                "--",
                "--baseline",
                "main",
            ]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Sample => sample_feed(42),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    sample_feed(42);
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "feed_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
