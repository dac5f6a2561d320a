use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use gridfilter::api::{
    CmdMessage, ConfigAction, FilterApi, FilterUpdate, GridFilterPaths, MessageLevel,
};
use gridfilter::catalog::EquipmentType;
use gridfilter::commands::check::{describe, format_path};
use gridfilter::commands::{CheckReport, FieldListing, FilterSummary};
use gridfilter::config::GridFilterConfig;
use gridfilter::error::{FilterError, Result};
use gridfilter::model::{FilterRecord, GroupNode, RuleTreeNode};
use gridfilter::rules::{import_tree, ValidationMap};
use gridfilter::store::fs::FileStore;
use gridfilter::wire::WireGroup;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "GRIDFILTER_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: FilterApi<FileStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Check { file }) => handle_check(&ctx, &file),
        Some(Commands::Create {
            name,
            file,
            description,
            directory,
            equipment,
        }) => handle_create(&mut ctx, name, &file, description, directory, equipment),
        Some(Commands::Update {
            filter,
            file,
            name,
            description,
        }) => handle_update(&mut ctx, &filter, file, name, description),
        Some(Commands::Show { filter, json }) => handle_show(&ctx, &filter, json),
        Some(Commands::List { equipment }) => handle_list(&ctx, equipment),
        Some(Commands::Delete { filters }) => handle_delete(&mut ctx, filters),
        Some(Commands::RemoveRule { filter, path }) => handle_remove_rule(&mut ctx, &filter, &path),
        Some(Commands::Fields { equipment }) => handle_fields(&ctx, equipment),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, None),
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins, e.g. RUST_LOG=gridfilter::rules=debug
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("gridfilter=debug")
    } else {
        EnvFilter::new("gridfilter=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", verbose);
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let dirs = ProjectDirs::from("org", "gridfilter", "gridfilter")
        .ok_or_else(|| FilterError::Store("Could not determine data directory".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = GridFilterConfig::load(&data_dir)?;
    debug!(data_dir = %data_dir.display(), "using data directory");

    let store = FileStore::new(data_dir.clone()).with_pretty_json(config.pretty_json);
    let api = FilterApi::new(store, GridFilterPaths { data_dir });
    Ok(AppContext { api })
}

fn read_wire(path: &Path) -> Result<WireGroup> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(FilterError::Io)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(FilterError::Io)?
    };
    let wire = serde_json::from_str(&content).map_err(FilterError::Serialization)?;
    Ok(wire)
}

fn handle_check(ctx: &AppContext, file: &Path) -> Result<()> {
    let wire = read_wire(file)?;
    let result = ctx.api.check(&wire)?;
    if let Some(report) = &result.report {
        print_report(report);
    }
    print_messages(&result.messages);
    match result.report {
        Some(report) if !report.validity.is_savable() => Err(FilterError::InvalidFilter(
            report.validity.failing(),
        )),
        _ => Ok(()),
    }
}

fn handle_create(
    ctx: &mut AppContext,
    name: String,
    file: &Path,
    description: String,
    directory: Option<String>,
    equipment: Option<EquipmentType>,
) -> Result<()> {
    let tree = import_tree(&read_wire(file)?);
    let result = ctx
        .api
        .create_filter(name, description, directory, equipment, tree)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(
    ctx: &mut AppContext,
    filter: &str,
    file: Option<PathBuf>,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let tree = match file {
        Some(path) => Some(import_tree(&read_wire(&path)?)),
        None => None,
    };
    let update = FilterUpdate {
        name,
        description,
        tree,
    };
    let result = ctx.api.update_filter(filter, update)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, filter: &str, json: bool) -> Result<()> {
    let result = ctx.api.get_filter(filter)?;
    for record in &result.affected_filters {
        if json {
            let content =
                serde_json::to_string_pretty(&record.rules).map_err(FilterError::Serialization)?;
            println!("{}", content);
        } else {
            print_filter_header(record);
            if let Some(report) = &result.report {
                print_report(report);
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, equipment: Option<EquipmentType>) -> Result<()> {
    let result = ctx.api.list_filters(equipment)?;
    print_filters(&result.listed_filters);
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, filters: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_filters(&filters)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove_rule(ctx: &mut AppContext, filter: &str, path: &str) -> Result<()> {
    let result = ctx.api.remove_rule(filter, path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_fields(ctx: &AppContext, equipment: Option<EquipmentType>) -> Result<()> {
    let result = ctx.api.fields(equipment)?;
    print_fields(&result.fields);
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        for key in gridfilter::config::CONFIG_KEYS {
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_filter_header(record: &FilterRecord) {
    println!("{} {}", record.name.bold(), record.id.to_string().dimmed());
    println!(
        "{} {}  {}",
        record.equipment_type.to_string().cyan(),
        record.directory,
        format_time_ago(record.updated_at).trim_start().dimmed()
    );
    if !record.description.is_empty() {
        println!("{}", record.description);
    }
    println!("--------------------------------");
}

fn print_report(report: &CheckReport) {
    println!("{} {}", "0".dimmed(), report.tree.combinator.to_string().bold());
    print_reasons(&report.validation, report.tree.id, 1);
    print_tree(&report.tree, &report.validation, &mut vec![0]);
}

fn print_tree(group: &GroupNode, validation: &ValidationMap, path: &mut Vec<usize>) {
    for (index, node) in group.rules.iter().enumerate() {
        path.push(index);
        let indent = "  ".repeat(path.len() - 1);
        let label = match node {
            RuleTreeNode::Group(child) => child.combinator.to_string().bold().to_string(),
            other => describe(other),
        };
        println!("{}{} {}", indent, format_path(path).dimmed(), label);
        print_reasons(validation, node.id(), path.len());
        if let RuleTreeNode::Group(child) = node {
            print_tree(child, validation, path);
        }
        path.pop();
    }
}

fn print_reasons(validation: &ValidationMap, id: Uuid, depth: usize) {
    let Some(entry) = validation.get(&id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    for reason in &entry.reasons {
        println!(
            "{}{} {}",
            indent,
            format!("x {}", reason.code()).red(),
            reason.message().dimmed()
        );
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_filters(filters: &[FilterSummary]) {
    if filters.is_empty() {
        println!("No filters found.");
        return;
    }

    for summary in filters {
        let idx_str = format!("{}. ", summary.index);
        let equipment = format!("[{}] ", summary.equipment_type);
        let rules = match summary.rule_count {
            1 => "1 rule ".to_string(),
            n => format!("{} rules ", n),
        };
        let time_ago = format_time_ago(summary.updated_at);

        let fixed_width = 4 + idx_str.width() + equipment.width() + rules.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title = if summary.directory == "/" {
            summary.name.clone()
        } else {
            format!("{}/{}", summary.directory.trim_end_matches('/'), summary.name)
        };
        let title_display = truncate_to_width(&title, available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "    {}{}{}{}{}{}",
            idx_str,
            equipment.cyan(),
            title_display,
            " ".repeat(padding),
            rules.dimmed(),
            time_ago.dimmed()
        );
    }
}

fn print_fields(fields: &[FieldListing]) {
    let name_width = fields
        .iter()
        .map(|f| f.field.name().width())
        .max()
        .unwrap_or(0);
    for listing in fields {
        let descriptor = listing.field.descriptor();
        let operators = listing
            .operators
            .iter()
            .map(|op| op.custom_name())
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}  {}  {}",
            format!("{:<width$}", descriptor.name, width = name_width).bold(),
            format!("{:<11}", descriptor.data_type).cyan(),
            operators.dimmed()
        );
        for child in descriptor.children() {
            println!(
                "  {}  {}",
                format!("{:<width$}", child.name, width = name_width.saturating_sub(2)),
                format!("{:<11}", child.data_type).cyan()
            );
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
