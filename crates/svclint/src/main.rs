use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use svclint::diagnostics::{Diagnostic, Severity, Stage};
use svclint::lint;
use svclint::model;
use svclint_contracts::SVCLINT_REPORT_SCHEMA_VERSION;

#[derive(Parser)]
#[command(name = "svclint")]
#[command(about = "Service model linter.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    Lint {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        report_json: bool,
    },
}

#[derive(Debug, Serialize)]
struct SvclintToolReport {
    schema_version: &'static str,
    command: &'static str,
    ok: bool,
    r#in: String,
    diagnostics_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
    exit_code: u8,
}

fn main() -> std::process::ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Lint { input, report_json } => {
            let bytes = match std::fs::read(&input) {
                Ok(bytes) => bytes,
                Err(err) => {
                    if report_json {
                        let report = SvclintToolReport {
                            schema_version: SVCLINT_REPORT_SCHEMA_VERSION,
                            command: "lint",
                            ok: false,
                            r#in: input.display().to_string(),
                            diagnostics_count: 1,
                            diagnostics: vec![diagnostic_error(
                                "SVC-IO-READ-0001",
                                &format!("read input {}: {err}", input.display()),
                            )],
                            exit_code: 2,
                        };
                        print_json(&report)?;
                        return Ok(std::process::ExitCode::from(2));
                    }
                    return Err(err).with_context(|| format!("read input: {}", input.display()));
                }
            };

            let model = match model::parse_model_json(&bytes) {
                Ok(model) => model,
                Err(err) => {
                    if report_json {
                        let report = SvclintToolReport {
                            schema_version: SVCLINT_REPORT_SCHEMA_VERSION,
                            command: "lint",
                            ok: false,
                            r#in: input.display().to_string(),
                            diagnostics_count: 1,
                            diagnostics: vec![diagnostic_error(
                                "SVC-MODEL-PARSE-0001",
                                &err.to_string(),
                            )],
                            exit_code: 2,
                        };
                        print_json(&report)?;
                        return Ok(std::process::ExitCode::from(2));
                    }
                    return Err(anyhow::anyhow!("{err}"));
                }
            };

            let report = lint::lint_model(&model);

            if report_json {
                let tool_report = SvclintToolReport {
                    schema_version: SVCLINT_REPORT_SCHEMA_VERSION,
                    command: "lint",
                    ok: report.ok,
                    r#in: input.display().to_string(),
                    diagnostics_count: report.diagnostics.len(),
                    diagnostics: report.diagnostics,
                    exit_code: if report.ok { 0 } else { 1 },
                };
                print_json(&tool_report)?;
                return Ok(std::process::ExitCode::from(tool_report.exit_code));
            }

            let out = serde_json::to_string(&report)?;
            println!("{out}");
            Ok(if report.ok {
                std::process::ExitCode::SUCCESS
            } else {
                std::process::ExitCode::from(1)
            })
        }
    }
}

fn diagnostic_error(code: &str, message: &str) -> Diagnostic {
    Diagnostic {
        code: code.to_string(),
        severity: Severity::Error,
        stage: Stage::Parse,
        message: message.to_string(),
        shape: None,
        loc: None,
        notes: Vec::new(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
