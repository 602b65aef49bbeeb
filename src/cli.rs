//! CLI argument parsing via `clap`.

use clap::Parser;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(
    name = "gosort",
    version,
    about = "Canonical top-level declaration order for Go files",
    long_about = "gosort reorders the top-level declarations of Go source files: grouped import/const/type/var declarations first, then the entry point, then functions by name. Comments travel with their declaration.\n\nConfiguration precedence: CLI > gosort.toml > defaults.",
    after_help = "Examples:\n  gosort main.go\n  gosort -l .\n  gosort --check --output json ./pkg\n  cat main.go | gosort -",
    arg_required_else_help = true
)]
/// Top-level CLI options.
pub struct Cli {
    /// Files or directories to process; `-` reads standard input
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,
    #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Write result to the source file instead of stdout")]
    pub write: bool,
    #[arg(short, long, action = clap::ArgAction::SetTrue, help = "List files whose declaration order differs")]
    pub list: bool,
    #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Show diffs instead of rewritten files (implies write=false)")]
    pub diff: bool,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if changes would occur (implies write=false)")]
    pub check: bool,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, value_name = "NAME", help = "Function sorted before all others (default: main)")]
    pub entry_point: Option<String>,
    #[arg(long, value_name = "N", help = "Columns per tab when re-indenting (default: 4)")]
    pub tab_width: Option<usize>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Keep spec order and indentation as written")]
    pub no_normalize: bool,
    #[arg(long, value_name = "DIR", help = "Start directory for gosort.toml discovery (default: current dir)")]
    pub config_root: Option<String>,
}

impl Cli {
    /// Flags as config overrides; unset switches defer to the config file.
    pub fn overrides(&self) -> Overrides {
        let flag = |on: bool| if on { Some(true) } else { None };
        Overrides {
            config_root: self.config_root.clone(),
            entry_point: self.entry_point.clone(),
            normalize: if self.no_normalize { Some(false) } else { None },
            tab_width: self.tab_width,
            output: self.output.clone(),
            write: flag(self.write),
            diff: flag(self.diff),
            check: flag(self.check),
            list: flag(self.list),
        }
    }
}
