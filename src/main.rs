use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use treepath::editor::EditError;
use treepath::report::{EditReport, FindReport, LocateReport, PathsReport};
use treepath::{config, LanguagePack, LanguagePackRegistry, TreeEditor};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "treepath")]
#[command(about = "Structural code navigation and editing on tree-sitter syntax trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Language to parse with (otherwise taken from the file extension)
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// TOML file of extra or overriding language packs
    #[arg(long, global = true, env = "TREEPATH_PACKS")]
    packs: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct WriteOptions {
    /// Show what would change without writing the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show a unified diff of the change
    #[arg(short, long)]
    diff: bool,

    /// Write even if the edit introduces syntax errors
    #[arg(short, long)]
    force: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every semantic path in files or directories
    Paths {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Find the structural paths of every occurrence of a text
    Locate { file: PathBuf, text: String },

    /// Resolve a semantic path
    Find { file: PathBuf, path: String },

    /// Replace the node at a semantic or structural path
    Update {
        file: PathBuf,
        path: String,
        /// New text, or `-` to read it from stdin
        content: String,
        #[command(flatten)]
        write: WriteOptions,
    },

    /// Append a member to a parent's body (empty parent appends to the file)
    Append {
        file: PathBuf,
        parent: String,
        /// New text, or `-` to read it from stdin
        content: String,
        #[command(flatten)]
        write: WriteOptions,
    },

    /// Insert a member before the first body child of the given node types
    InsertBefore {
        file: PathBuf,
        parent: String,
        /// New text, or `-` to read it from stdin
        content: String,
        /// Comma separated raw node types to insert before
        #[arg(long, value_delimiter = ',', required = true)]
        before: Vec<String>,
        #[command(flatten)]
        write: WriteOptions,
    },

    /// Delete the node at a semantic or structural path
    Delete {
        file: PathBuf,
        path: String,
        #[command(flatten)]
        write: WriteOptions,
    },

    /// Line-based edits (1-based line numbers)
    Lines {
        file: PathBuf,
        #[command(subcommand)]
        action: LineAction,
        #[command(flatten)]
        write: WriteOptions,
    },

    /// List the available languages and their extensions
    Languages,
}

#[derive(Subcommand)]
enum LineAction {
    /// Insert content after a line (0 inserts at the top)
    Add { after: usize, content: String },
    /// Remove an inclusive line range
    Remove { start: usize, end: usize },
    /// Replace one line
    Update { line: usize, content: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = match &cli.packs {
        Some(path) => config::registry_from_path(path)?,
        None => LanguagePackRegistry::builtin().clone(),
    };
    let ctx = Session {
        registry,
        language: cli.language,
        json: cli.json,
    };

    match cli.command {
        Commands::Paths { files } => cmd_paths(&ctx, &files),
        Commands::Locate { file, text } => cmd_locate(&ctx, &file, &text),
        Commands::Find { file, path } => cmd_find(&ctx, &file, &path),
        Commands::Update {
            file,
            path,
            content,
            write,
        } => {
            let content = read_content(content)?;
            cmd_edit(&ctx, &file, &path, "update", write, |editor| {
                editor.update_node(&path, &content)
            })
        }
        Commands::Append {
            file,
            parent,
            content,
            write,
        } => {
            let content = read_content(content)?;
            cmd_edit(&ctx, &file, &parent, "append", write, |editor| {
                editor.append_child(&parent, &content)
            })
        }
        Commands::InsertBefore {
            file,
            parent,
            content,
            before,
            write,
        } => {
            let content = read_content(content)?;
            let types: Vec<&str> = before.iter().map(String::as_str).collect();
            cmd_edit(&ctx, &file, &parent, "insert-before", write, |editor| {
                editor.insert_before(&parent, &content, &types)
            })
        }
        Commands::Delete { file, path, write } => {
            cmd_edit(&ctx, &file, &path, "delete", write, |editor| {
                editor.delete_node(&path)
            })
        }
        Commands::Lines {
            file,
            action,
            write,
        } => {
            let (label, action_name) = match &action {
                LineAction::Add { after, .. } => (format!("line {after}"), "add-lines"),
                LineAction::Remove { start, end } => {
                    (format!("lines {start}-{end}"), "remove-lines")
                }
                LineAction::Update { line, .. } => (format!("line {line}"), "update-line"),
            };
            cmd_edit(&ctx, &file, &label, action_name, write, |editor| match &action {
                LineAction::Add { after, content } => editor.add_lines(*after, content),
                LineAction::Remove { start, end } => editor.remove_lines(*start, *end),
                LineAction::Update { line, content } => editor.update_line(*line, content),
            })
        }
        Commands::Languages => cmd_languages(&ctx),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "treepath=debug" } else { "treepath=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct Session {
    registry: LanguagePackRegistry,
    language: Option<String>,
    json: bool,
}

impl Session {
    fn pack_for(&self, file: &Path) -> Result<std::sync::Arc<LanguagePack>> {
        let pack = match &self.language {
            Some(language) => self.registry.get(language)?,
            None => self.registry.for_path(file)?,
        };
        Ok(pack)
    }

    fn open(&self, file: &Path) -> Result<TreeEditor> {
        let pack = self.pack_for(file)?;
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let editor = TreeEditor::parse(&pack, &text)?;
        if editor.tree().is_degraded() {
            eprintln!(
                "{}",
                format!("Warning: could not parse {}", file.display()).yellow()
            );
        }
        Ok(editor)
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// `-` reads the content from stdin.
fn read_content(content: String) -> Result<String> {
    if content != "-" {
        return Ok(content);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read content from stdin")?;
    Ok(buf)
}

/// Expand directories into the files a pack is registered for.
fn collect_files(ctx: &Session, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input) {
            let entry = entry?;
            if entry.file_type().is_file() && ctx.pack_for(entry.path()).is_ok() {
                files.push(entry.path().to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}

fn cmd_paths(ctx: &Session, inputs: &[PathBuf]) -> Result<()> {
    let files = collect_files(ctx, inputs)?;
    let mut reports = Vec::new();

    for file in &files {
        let editor = match ctx.open(file) {
            Ok(editor) => editor,
            Err(err) => {
                tracing::warn!(file = %file.display(), error = %err, "skipping file");
                continue;
            }
        };
        reports.push(PathsReport::new(
            file.display().to_string(),
            editor.pack().language.clone(),
            editor.all_semantic_paths(),
        ));
    }

    if ctx.json {
        return ctx.print_json(&reports);
    }

    for report in &reports {
        println!(
            "{} {}",
            report.file.bold(),
            format!("({}, {} paths)", report.language, report.total_paths).dimmed()
        );
        for path in &report.paths {
            println!("  {path}");
        }
    }
    Ok(())
}

fn cmd_locate(ctx: &Session, file: &Path, text: &str) -> Result<()> {
    let editor = ctx.open(file)?;
    let locations = editor.find_paths_for_line(text);
    let report = LocateReport::new(
        file.display().to_string(),
        text,
        editor.pack().language.clone(),
        &locations,
    );

    if ctx.json {
        return ctx.print_json(&report);
    }

    if report.matches.is_empty() {
        println!("{}", format!("No occurrences of '{text}'").yellow());
        return Ok(());
    }
    for m in &report.matches {
        println!("{}:{} {}", m.line, m.column, m.path.cyan());
    }
    Ok(())
}

fn cmd_find(ctx: &Session, file: &Path, path: &str) -> Result<()> {
    let editor = ctx.open(file)?;
    let found = editor.find_nodes_by_semantic_path(path);
    let report = FindReport::new(
        file.display().to_string(),
        path,
        editor.pack().language.clone(),
        &found,
    );

    if ctx.json {
        return ctx.print_json(&report);
    }

    if report.matches.is_empty() {
        let suggestions = treepath::resolve::suggest(editor.tree(), path);
        eprintln!("{} {}", "✗".red(), format!("No match for '{path}'").red());
        if !suggestions.is_empty() {
            eprintln!("  Did you mean: {}", suggestions.join(", "));
        }
        std::process::exit(1);
    }
    for m in &report.matches {
        println!(
            "{}:{} {} {}",
            m.line,
            m.column,
            m.path.cyan(),
            m.description.dimmed()
        );
    }
    Ok(())
}

fn cmd_edit<F>(
    ctx: &Session,
    file: &Path,
    path: &str,
    action: &str,
    options: WriteOptions,
    edit: F,
) -> Result<()>
where
    F: FnOnce(&TreeEditor) -> Result<TreeEditor, EditError>,
{
    let editor = ctx.open(file)?;
    let file_label = file.display().to_string();

    let edited = match edit(&editor) {
        Ok(edited) => edited,
        Err(err) => {
            report_edit(ctx, EditReport::failure(&file_label, path, action, err.to_string()))?;
            std::process::exit(1);
        }
    };

    if let Err(err) = edited.validate() {
        if !options.force {
            report_edit(
                ctx,
                EditReport::failure(
                    &file_label,
                    path,
                    action,
                    format!("{err} (use --force to write anyway)"),
                ),
            )?;
            std::process::exit(1);
        }
        eprintln!("{}", format!("Warning: {err}").yellow());
    }

    if options.diff {
        display_diff(file, edited.original_text(), edited.text());
    }

    let message = if !edited.is_modified() {
        "no changes".to_string()
    } else if options.dry_run {
        format!("dry run, {} hunk(s) not written", edited.diff_hunk_count())
    } else {
        atomic_write(file, edited.text())?;
        format!("{} hunk(s) written", edited.diff_hunk_count())
    };

    report_edit(ctx, EditReport::success(&file_label, path, action, message))
}

fn report_edit(ctx: &Session, report: EditReport) -> Result<()> {
    if ctx.json {
        return ctx.print_json(&report);
    }
    if report.success {
        println!(
            "{} {} {}: {}",
            "✓".green(),
            report.action,
            report.path,
            report.message
        );
    } else {
        eprintln!(
            "{} {} {}: {}",
            "✗".red(),
            report.action,
            report.path,
            report.message
        );
    }
    Ok(())
}

fn cmd_languages(ctx: &Session) -> Result<()> {
    let mut packs: Vec<_> = ctx.registry.packs().collect();
    packs.sort_by(|a, b| a.language.cmp(&b.language));

    if ctx.json {
        let value: Vec<_> = packs
            .iter()
            .map(|pack| {
                serde_json::json!({
                    "language": pack.language,
                    "grammar": pack.grammar,
                    "extensions": pack.extensions,
                })
            })
            .collect();
        return ctx.print_json(&value);
    }

    for pack in packs {
        println!(
            "{:<12} {} {}",
            pack.language.bold(),
            pack.grammar.to_string().dimmed(),
            pack.extensions.join(", ")
        );
    }
    Ok(())
}

fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (edited)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        println!("{}", hunk.header().to_string().cyan());
        for change in hunk.iter_changes() {
            let line = match change.tag() {
                ChangeTag::Delete => format!("-{}", change).red(),
                ChangeTag::Insert => format!("+{}", change).green(),
                ChangeTag::Equal => format!(" {}", change).normal(),
            };
            print!("{}", line);
            if change.missing_newline() {
                println!();
            }
        }
    }
}

/// Replace `path` with `content` via a temp file in the same directory,
/// then bump the mtime so build tools notice the change.
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let now = filetime::FileTime::now();
    filetime::set_file_mtime(path, now)?;
    Ok(())
}
