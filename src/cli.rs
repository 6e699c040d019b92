//! Minimal CLI: ts-joi-gen [-s SUFFIX] INPUT [OUTPUT]
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;

use ts_joi_gen::check::{CheckError, Checker};
use ts_joi_gen::compile::{compile_ir, compile_module, Options, DEFAULT_INPUT_LABEL};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Joi schemas and type guards from TypeScript interfaces and type aliases
#[derive(Parser, Debug)]
#[command(name = "ts-joi-gen", version, about, override_usage = "ts-joi-gen [-s SUFFIX] INPUT [OUTPUT]")]
pub struct CommandLineInterface {
    /// appended to every generated schema and guard name
    #[arg(short, long, default_value = "", value_parser = parse_suffix)]
    suffix: String,

    /// input .ts file, or '-' for stdin
    input: String,

    /// output .ts file (stdout if omitted)
    output: Option<PathBuf>,

    /// print the lowered schema IR as JSON instead of generated source
    #[arg(long, conflicts_with = "check")]
    dump_ir: bool,

    /// validate the JSON document given by --value with the guard of this declaration
    #[arg(long, value_name = "TYPE", requires = "value")]
    check: Option<String>,

    /// JSON document checked by --check ('-' for stdin)
    #[arg(long, value_name = "PATH", requires = "check")]
    value: Option<String>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        // debug path
        if self.no_op {
            eprintln!("{self:#?}");
            return Ok(ExitCode::SUCCESS);
        }

        let source = read_text(&self.input)?;
        let options = Options::default()
            .with_suffix(self.suffix.as_str())
            .with_input_label(self.input_label());
        tracing::debug!(input = %self.input, bytes = source.len(), suffix = %options.suffix, "compiling");

        if let (Some(type_name), Some(value_path)) = (&self.check, &self.value) {
            return self.check_document(&source, &options, type_name, value_path);
        }

        let text = if self.dump_ir {
            let module = compile_ir(&source, &options)
                .with_context(|| format!("failed to compile {}", self.input))?;
            tracing::debug!(bindings = module.bindings.len(), "lowered declarations");
            serde_json::to_string_pretty(&module)? + "\n"
        } else {
            compile_module(&source, &options).with_context(|| format!("failed to compile {}", self.input))?
        };
        write_output(self.output.as_deref(), &text)?;
        Ok(ExitCode::SUCCESS)
    }

    fn input_label(&self) -> String {
        if self.input == "-" {
            return DEFAULT_INPUT_LABEL.to_string();
        }
        Path::new(&self.input)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_INPUT_LABEL.to_string())
    }

    fn check_document(&self, source: &str, options: &Options, type_name: &str, value_path: &str) -> Result<ExitCode> {
        let module = compile_ir(source, options).with_context(|| format!("failed to compile {}", self.input))?;
        let document = read_text(value_path)?;
        let value = serde_json::from_str::<serde_json::Value>(&document)
            .with_context(|| format!("failed to parse JSON document ({value_path})"))?;
        match Checker::new(&module).validate(type_name, &value) {
            Ok(()) => {
                println!("true");
                Ok(ExitCode::SUCCESS)
            }
            Err(CheckError::Violation(violation)) => {
                println!("false");
                eprintln!("{violation}");
                Ok(ExitCode::FAILURE)
            }
            Err(error) => Err(error.into()),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_suffix(raw: &str) -> Result<String, String> {
    static IDENTIFIER_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_$]*$").expect("valid regex"));
    if IDENTIFIER_PART.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("`{raw}` cannot be part of a JavaScript identifier"))
    }
}

/// Read a file, or stdin for `-`.
fn read_text(path: &str) -> Result<String> {
    if path == "-" {
        return std::io::read_to_string(std::io::stdin()).context("failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read source file ({path})"))
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    let Some(out) = out else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        return Ok(stdout.flush()?);
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory ({})", parent.display()))?;
        }
    }
    std::fs::write(out, text).with_context(|| format!("failed to write output file ({})", out.display()))?;
    tracing::info!(path = %out.display(), bytes = text.len(), "wrote generated module");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        CommandLineInterface::command().debug_assert();
    }

    #[test]
    fn positional_arguments() {
        let cli = CommandLineInterface::try_parse_from(["ts-joi-gen", "-s", "Schema", "types.ts", "out/schemas.ts"]).unwrap();
        assert_eq!(cli.suffix, "Schema");
        assert_eq!(cli.input, "types.ts");
        assert_eq!(cli.output.as_deref(), Some(Path::new("out/schemas.ts")));
        assert_eq!(cli.input_label(), "types.ts");

        let cli = CommandLineInterface::try_parse_from(["ts-joi-gen", "-"]).unwrap();
        assert_eq!(cli.suffix, "");
        assert_eq!(cli.input_label(), DEFAULT_INPUT_LABEL);
    }

    #[test]
    fn missing_or_extra_positionals_are_usage_errors() {
        assert!(CommandLineInterface::try_parse_from(["ts-joi-gen"]).is_err());
        assert!(CommandLineInterface::try_parse_from(["ts-joi-gen", "a.ts", "b.ts", "c.ts"]).is_err());
    }

    #[test]
    fn suffix_must_be_an_identifier_fragment() {
        assert!(CommandLineInterface::try_parse_from(["ts-joi-gen", "-s", "V2_$", "a.ts"]).is_ok());
        assert!(CommandLineInterface::try_parse_from(["ts-joi-gen", "-s", "my-suffix", "a.ts"]).is_err());
    }

    #[test]
    fn check_requires_value() {
        assert!(CommandLineInterface::try_parse_from(["ts-joi-gen", "a.ts", "--check", "Foo"]).is_err());
        assert!(CommandLineInterface::try_parse_from(["ts-joi-gen", "a.ts", "--check", "Foo", "--value", "v.json"]).is_ok());
    }
}
