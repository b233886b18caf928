use std::collections::HashSet;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jsoned_core::core_api::{EditReport, EditorOptions, Engine, Session};
use jsoned_core::store::{DataDirectory, DocumentSource, save_copy};
use jsoned_core::{LeafBinding, LengthBinding, NodePath, WidgetHost, WidgetState, WidgetValue};
use jsoned_render::{
    JsonStyle, TextRenderOptions, render_diagnostics, render_document, render_outline_json,
    render_outline_text, render_report_summary,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Document name inside the data directory, or a path to a JSON file.
    #[arg(value_name = "DOCUMENT.json")]
    document: Option<String>,
    /// Directory holding the JSON documents.
    #[arg(long, env = "JSONED_DATA_DIR", default_value = ".")]
    dir: PathBuf,
    /// List the JSON documents in the data directory.
    #[arg(long, conflicts_with = "document")]
    list: bool,
    /// Print every editable field with its widget and current value.
    #[arg(long)]
    fields: bool,
    /// Set a field, e.g. `--set gods[0].power=15`. Repeatable.
    #[arg(long = "set", value_name = "PATH=VALUE")]
    set: Vec<String>,
    /// Change the number of items in a list, e.g. `--resize tags=3`. Repeatable.
    #[arg(long = "resize", value_name = "PATH=LEN")]
    resize: Vec<String>,
    /// Print the edited document.
    #[arg(long)]
    print: bool,
    /// Print without indentation (with --print).
    #[arg(long, requires = "print")]
    compact: bool,
    /// Emit machine-readable JSON for --fields.
    #[arg(long)]
    json: bool,
    /// Save the edited document over the original.
    #[arg(long)]
    write: bool,
    /// Keep the previous file as <DOCUMENT>.backup when saving (with --write).
    #[arg(long, requires = "write")]
    backup: bool,
    /// Write the edited document to another file instead.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    #[arg(long = "float-precision", value_name = "DIGITS")]
    float_precision: Option<usize>,
    #[arg(long, short)]
    verbose: bool,
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

/// Widget state from the command line, remembering which paths the editor
/// actually bound so unknown paths can be reported.
struct FlagHost {
    state: WidgetState,
    bound: HashSet<NodePath>,
}

impl WidgetHost for FlagHost {
    fn bind_leaf(&mut self, binding: &LeafBinding) -> Option<WidgetValue> {
        let value = self.state.bind_leaf(binding)?;
        self.bound.insert(binding.path.clone());
        Some(value)
    }

    fn bind_length(&mut self, binding: &LengthBinding) -> Option<usize> {
        let len = self.state.bind_length(binding)?;
        self.bound.insert(binding.path.clone());
        Some(len)
    }
}

fn main() {
    let cli = Cli::parse();
    let store = DataDirectory::new(&cli.dir).with_backup(cli.backup);

    if cli.list {
        let names = store.list_candidates().unwrap_or_else(|e| {
            eprintln!("Error listing {}: {e}", cli.dir.display());
            process::exit(1);
        });
        if names.is_empty() && !cli.quiet {
            eprintln!("No JSON files found in {}", cli.dir.display());
        }
        for name in names {
            println!("{name}");
        }
        return;
    }

    let Some(document_name) = cli.document.as_deref() else {
        eprintln!("a DOCUMENT.json argument is required unless --list is given");
        process::exit(2);
    };

    let has_edits = !cli.set.is_empty() || !cli.resize.is_empty();
    if has_edits && !(cli.write || cli.output.is_some() || cli.print) {
        eprintln!("--set/--resize require --write, --output <PATH> or --print");
        process::exit(2);
    }

    let mut state = WidgetState::new();
    let mut requested = Vec::new();
    for raw in &cli.set {
        let (path, value) = split_assignment(raw, "--set");
        state.set(path.clone(), WidgetValue::Text(value.to_string()));
        requested.push((path, format!("set to {value}")));
    }
    for raw in &cli.resize {
        let (path, len) = split_assignment(raw, "--resize");
        let len = len.trim().parse::<usize>().unwrap_or_else(|_| {
            eprintln!("invalid --resize length '{len}' in '{raw}', expected a whole number");
            process::exit(2);
        });
        state.set_length(path.clone(), len);
        requested.push((path, format!("resized to {len}")));
    }

    let mut options = EditorOptions::default();
    if let Some(precision) = cli.float_precision {
        options.float_precision = precision;
    }

    let document = store.load(document_name).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {e}", store.path_of(document_name).display());
        process::exit(1);
    });
    let mut session = Engine::with_options(options).begin_session(&document);

    let mut host = FlagHost {
        state,
        bound: HashSet::new(),
    };
    let report = session.edit(&mut host).clone();
    report_pass(&cli, &report, &requested, &host.bound);

    if cli.fields {
        print_fields(&session, &cli);
    }

    if cli.print {
        let style = if cli.compact {
            JsonStyle::Compact
        } else {
            JsonStyle::Indented
        };
        let rendered = render_document(session.edited_value(), style).unwrap_or_else(|e| {
            eprintln!("Error rendering document: {e}");
            process::exit(1);
        });
        println!("{rendered}");
    }

    if let Some(out_path) = cli.output.as_ref() {
        save_copy(out_path, session.edited_value()).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        if !cli.quiet {
            eprintln!("Wrote edited document to {}", out_path.display());
        }
    }

    if cli.write {
        store
            .save(document_name, session.edited_value())
            .unwrap_or_else(|e| {
                eprintln!("Error saving {}: {e}", store.path_of(document_name).display());
                process::exit(1);
            });
        if !cli.quiet {
            eprintln!("Saved {}", store.path_of(document_name).display());
        }
    }

    if !(cli.fields || cli.print || cli.write || cli.output.is_some()) {
        print_fields(&session, &cli);
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_fields(session: &Session, cli: &Cli) {
    let outline = session.outline();
    if cli.json {
        let rendered = serde_json::to_string_pretty(&render_outline_json(&outline))
            .unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
        println!("{rendered}");
        return;
    }
    print!(
        "{}",
        render_outline_text(&outline, TextRenderOptions { verbose: cli.verbose })
    );
}

fn report_pass(
    cli: &Cli,
    report: &EditReport,
    requested: &[(NodePath, String)],
    bound: &HashSet<NodePath>,
) {
    if cli.quiet {
        return;
    }
    for (path, _) in requested {
        if !bound.contains(path) {
            eprintln!("warning: no field at {path}, ignored");
        }
    }
    for line in render_diagnostics(report) {
        eprintln!("{line}");
    }
    if cli.verbose {
        for (path, action) in requested {
            if bound.contains(path) && report.diagnostic_for(path).is_none() {
                eprintln!("{path} {action}");
            }
        }
        eprintln!("{}", render_report_summary(report));
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn split_assignment<'a>(raw: &'a str, flag: &str) -> (NodePath, &'a str) {
    let Some(at) = assignment_separator(raw) else {
        eprintln!("invalid {flag} '{raw}', expected PATH=VALUE");
        process::exit(2);
    };
    let (path, value) = (&raw[..at], &raw[at + 1..]);
    let path = NodePath::parse(path).unwrap_or_else(|e| {
        eprintln!("invalid {flag} '{raw}': {}", e.message);
        process::exit(2);
    });
    (path, value)
}

/// Byte offset of the first `=` that is not inside a quoted path key, so
/// `["a=b"]=1` splits after the closing bracket.
fn assignment_separator(raw: &str) -> Option<usize> {
    let mut quote = None;
    let mut escaped = false;
    for (at, c) in raw.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '=' => return Some(at),
            None => {}
        }
    }
    None
}
