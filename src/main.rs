//! gosort CLI binary entry point.
//! Resolves configuration, runs the batch and prints the report.

use clap::Parser;
use gosort::batch::{self, BatchOptions, Excludes};
use gosort::cli::Cli;
use gosort::config;
use gosort::output::{self, Mode};
use gosort::pipeline::SortOptions;
use gosort::utils;

fn main() {
    let cli = Cli::parse();
    let eff = config::resolve_effective(&cli.overrides());

    if let Some(issue) = &eff.issue {
        eprintln!(
            "{} ignoring {}: {}",
            utils::note_prefix(&eff.output),
            utils::rel_to_wd(&issue.path),
            issue.message
        );
    }
    if let (Some(path), "human") = (&eff.config_path, eff.output.as_str()) {
        eprintln!(
            "{} using config {}",
            utils::info_prefix(&eff.output),
            utils::rel_to_wd(path)
        );
    }
    if eff.output != "human" && eff.output != "json" {
        eprintln!(
            "{} unknown output mode '{}' (expected human or json)",
            utils::error_prefix(&eff.output),
            eff.output
        );
        std::process::exit(2);
    }
    let exclude = match Excludes::new(&eff.root, &eff.exclude) {
        Ok(ex) => ex,
        Err(e) => {
            eprintln!("{} invalid exclude pattern: {}", utils::error_prefix(&eff.output), e);
            std::process::exit(2);
        }
    };

    // diff and check are read-only runs
    let write = eff.write && !eff.diff && !eff.check;
    let opts = BatchOptions {
        sort: SortOptions {
            entry_point: eff.entry_point.clone(),
            normalize: eff.normalize,
            tab_width: eff.tab_width,
        },
        write,
        skip_generated: eff.skip_generated,
        exclude,
    };

    let report = batch::run_batch(&cli.paths, &opts, &mut std::io::stdin().lock());
    let mode = Mode {
        write,
        list: eff.list,
        diff: eff.diff,
        check: eff.check,
    };
    output::print_report(&report, &eff.output, mode);
    std::process::exit(report.exit_code(eff.check));
}
