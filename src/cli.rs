use annotator::annotation::{
    self, annotation_progress, is_single_column_variable_available, variable_options,
};
use annotator::columns::{Column, DataType};
use annotator::config::{Settings, available_configs};
use annotator::dictionary::{self, DictionarySchema, storage};
use annotator::session::Session;
use annotator::vocabulary::VocabularyRegistry;
use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "annotator",
    about = "Annotate a tabular dataset against a standardized vocabulary"
)]
pub struct Cli {
    /// Session file holding the columns and their annotations
    #[arg(
        short,
        long,
        global = true,
        env = "ANNOTATOR_SESSION",
        default_value = "annotator-session.json"
    )]
    pub session: PathBuf,

    /// Directory with vocabulary configurations (overrides the saved setting)
    #[arg(long, global = true)]
    pub vocabulary_dir: Option<PathBuf>,

    /// Show debug logs on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the vocabulary configurations that can be annotated against
    Configs {
        /// Save this configuration as the default for new sessions
        #[arg(long)]
        select: Option<String>,
    },
    /// Start a session from a tab-separated data table
    Init {
        #[arg(short, long)]
        table: PathBuf,

        /// Vocabulary configuration. Defaults to the saved setting.
        #[arg(long)]
        config: Option<String>,
    },
    /// List the standardized variables a column can be mapped to
    Variables {
        /// Column (id or name) being edited, so its own mapping is not counted as taken
        #[arg(short, long)]
        column: Option<String>,
    },
    /// Map a column to a standardized variable, or un-map it
    Map {
        #[arg(short, long)]
        column: String,

        /// Variable id, e.g. nb:Age. Omit to remove the mapping.
        #[arg(long)]
        variable: Option<String>,

        /// Only apply if the column is still at this revision
        #[arg(long)]
        if_revision: Option<u64>,
    },
    /// Set the data type of an unmapped or untyped column
    SetType {
        #[arg(short, long)]
        column: String,

        #[arg(value_enum)]
        data_type: DataTypeArg,
    },
    /// Flag or unflag a raw value as missing
    Missing {
        #[arg(short, long)]
        column: String,

        #[arg(long)]
        value: String,

        /// Remove the flag instead of adding it
        #[arg(long)]
        unset: bool,
    },
    /// Describe a column; an empty text clears the description
    Describe {
        #[arg(short, long)]
        column: String,

        text: String,
    },
    /// Annotate one categorical level
    Level {
        #[arg(short, long)]
        column: String,

        #[arg(long)]
        value: String,

        #[arg(long)]
        description: Option<String>,

        /// Standardized term id, or an empty string to clear it
        #[arg(long)]
        term: Option<String>,
    },
    /// Set units and format of a continuous column
    Units {
        #[arg(short, long)]
        column: String,

        #[arg(long)]
        units: Option<String>,

        /// Format id, or an empty string to clear it
        #[arg(long)]
        format: Option<String>,
    },
    /// Assign a multi-column measure column to a collection
    Collection {
        #[arg(short, long)]
        column: String,

        /// Collection term id. Omit to move the column back to ungrouped.
        #[arg(long)]
        term: Option<String>,
    },
    /// Show how the columns of a multi-column measure are grouped
    Groups {
        #[arg(long)]
        variable: String,
    },
    /// Summarise what is left to annotate
    Progress,
    /// Load annotations from an existing data dictionary
    Import {
        #[arg(short, long)]
        dictionary: PathBuf,
    },
    /// Write the data dictionary
    Export {
        /// Output file. Defaults to `<table>_annotated.json` in the output directory.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export even if the dictionary fails schema validation
        #[arg(long)]
        force: bool,
    },
    /// Check a data dictionary file against the schema
    Validate {
        #[arg(short, long)]
        dictionary: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DataTypeArg {
    Categorical,
    Continuous,
    None,
}

impl From<DataTypeArg> for Option<DataType> {
    fn from(arg: DataTypeArg) -> Self {
        match arg {
            DataTypeArg::Categorical => Some(DataType::Categorical),
            DataTypeArg::Continuous => Some(DataType::Continuous),
            DataTypeArg::None => None,
        }
    }
}

/// Everything a command needs besides its own arguments.
///
/// `settings` already has the `--vocabulary-dir` override applied.
struct Context {
    settings: Settings,
    session_path: PathBuf,
}

fn load_registry(dir: &Path, config: &str) -> Result<VocabularyRegistry> {
    VocabularyRegistry::load_dir(dir)
        .with_context(|| format!("Failed to load vocabulary configuration {config}"))
}

impl Context {
    fn registry(&self, config: &str) -> Result<VocabularyRegistry> {
        load_registry(&self.settings.config_dir(config), config)
    }

    fn load_session(&self) -> Result<(Session, VocabularyRegistry)> {
        let session = Session::load(&self.session_path).with_context(|| {
            format!(
                "No session at {}; run `annotator init --table <file>` first",
                self.session_path.display()
            )
        })?;
        let registry = self.registry(&session.config)?;
        Ok((session, registry))
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load()?;
    if let Some(dir) = cli.vocabulary_dir {
        settings.vocabulary_dir = dir;
    }
    let ctx = Context {
        settings,
        session_path: cli.session,
    };

    match cli.command {
        Commands::Configs { select } => handle_configs(&ctx, select),
        Commands::Init { table, config } => handle_init(&ctx, &table, config),
        Commands::Variables { column } => handle_variables(&ctx, column.as_deref()),
        Commands::Map {
            column,
            variable,
            if_revision,
        } => handle_map(&ctx, &column, variable.as_deref(), if_revision),
        Commands::SetType { column, data_type } => edit_column(&ctx, &column, |c, _| {
            annotation::apply_data_type(c, data_type.into())
        }),
        Commands::Missing {
            column,
            value,
            unset,
        } => edit_column(&ctx, &column, |c, _| {
            annotation::set_level_missing(c, &value, !unset)
        }),
        Commands::Describe { column, text } => {
            edit_column(&ctx, &column, |c, _| annotation::set_description(c, &text))
        }
        Commands::Level {
            column,
            value,
            description,
            term,
        } => handle_level(&ctx, &column, &value, description, term),
        Commands::Units {
            column,
            units,
            format,
        } => edit_column(&ctx, &column, |c, registry| {
            let c = match &units {
                Some(units) => annotation::set_units(c, units),
                None => c.clone(),
            };
            match &format {
                Some(format) => annotation::set_format(&c, non_empty(format), registry),
                None => c,
            }
        }),
        Commands::Collection { column, term } => edit_column(&ctx, &column, |c, registry| {
            annotation::set_is_part_of(c, term.as_deref(), registry)
        }),
        Commands::Groups { variable } => handle_groups(&ctx, &variable),
        Commands::Progress => handle_progress(&ctx),
        Commands::Import { dictionary } => handle_import(&ctx, &dictionary),
        Commands::Export { output, force } => handle_export(&ctx, output, force),
        Commands::Validate { dictionary } => handle_validate(&dictionary),
    }
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

fn column_id(session: &Session, column: &str) -> Result<String> {
    match session.resolve_column(column) {
        Some(id) => Ok(id.to_owned()),
        None => bail!("Unknown column: {column}"),
    }
}

/// Load the session, apply one transition to one column and save it again.
fn edit_column<F>(ctx: &Context, column: &str, transition: F) -> Result<()>
where
    F: FnOnce(&Column, &VocabularyRegistry) -> Column,
{
    let (mut session, registry) = ctx.load_session()?;
    let id = column_id(&session, column)?;
    session.columns = session.columns.update(&id, |c| transition(c, &registry));
    session.save(&ctx.session_path)?;
    print_column(session.columns.column(&id));
    Ok(())
}

fn handle_configs(ctx: &Context, select: Option<String>) -> Result<()> {
    let names = available_configs(&ctx.settings.vocabulary_dir)?;
    let selected = match select {
        Some(name) => {
            if !names.contains(&name) {
                bail!(
                    "No vocabulary configuration {name} in {}",
                    ctx.settings.vocabulary_dir.display()
                );
            }
            // Reload so a --vocabulary-dir override is not persisted.
            let mut saved = Settings::load()?;
            saved.selected_config.clone_from(&name);
            saved.save()?;
            tracing::info!("Selected vocabulary configuration {name}");
            name
        }
        None => ctx.settings.selected_config.clone(),
    };

    for name in names {
        let marker = if name == selected {
            "*"
        } else {
            " "
        };
        println!("{marker} {name}");
    }
    Ok(())
}

fn handle_init(ctx: &Context, table: &Path, config: Option<String>) -> Result<()> {
    // Fail early on a configuration that does not load.
    let config = match config {
        Some(config) => {
            ctx.registry(&config)?;
            config
        }
        None => {
            let config = ctx.settings.selected_config.clone();
            load_registry(&ctx.settings.selected_config_dir(), &config)?;
            config
        }
    };

    let session = Session::from_table(table, &config)?;
    session.save(&ctx.session_path)?;
    println!(
        "Started session for {} ({} columns) using {config}",
        session.table_file_name,
        session.columns.len()
    );
    for column in session.columns.iter() {
        println!("  {:>3}  {}", column.id, column.name);
    }
    Ok(())
}

fn handle_variables(ctx: &Context, column: Option<&str>) -> Result<()> {
    let (session, registry) = ctx.load_session()?;
    let editing = column.map(|c| column_id(&session, c)).transpose()?;
    let columns = session.columns.to_vec();

    for option in variable_options(&columns, &registry, editing.as_deref()) {
        let variable = option.variable;
        let kind = variable
            .variable_type
            .map_or("untyped", |t| t.dictionary_label());
        let status = if option.disabled { " (taken)" } else { "" };
        println!("{:<24} {:<12} {}{status}", variable.id, kind, variable.name);
    }
    Ok(())
}

fn handle_map(
    ctx: &Context,
    column: &str,
    variable: Option<&str>,
    if_revision: Option<u64>,
) -> Result<()> {
    let (mut session, registry) = ctx.load_session()?;
    let id = column_id(&session, column)?;

    if let Some(variable) = variable {
        if registry.get_variable(variable).is_none() {
            bail!("Unknown variable {variable} in configuration {}", registry.name());
        }
        let columns = session.columns.to_vec();
        if !is_single_column_variable_available(variable, &columns, &registry, Some(&id)) {
            bail!("{variable} is already mapped to another column");
        }
    }

    let transition = |c: &Column| annotation::apply_standardized_variable(c, variable, &registry);
    session.columns = match if_revision {
        Some(expected) => session.columns.update_if_revision(&id, expected, transition)?,
        None => session.columns.update(&id, transition),
    };
    session.save(&ctx.session_path)?;
    print_column(session.columns.column(&id));
    Ok(())
}

fn handle_level(
    ctx: &Context,
    column: &str,
    value: &str,
    description: Option<String>,
    term: Option<String>,
) -> Result<()> {
    edit_column(ctx, column, |c, registry| {
        let c = match &description {
            Some(description) => annotation::set_level_description(c, value, description),
            None => c.clone(),
        };
        match &term {
            Some(term) => annotation::set_level_term(&c, value, non_empty(term), registry),
            None => c,
        }
    })
}

fn handle_groups(ctx: &Context, variable: &str) -> Result<()> {
    let (session, registry) = ctx.load_session()?;
    if !registry.is_multi_column_measure(variable) {
        bail!("{variable} is not a multi-column measure");
    }
    for group in session.columns.collection_groups(variable, &registry) {
        let label = group
            .term
            .as_deref()
            .and_then(|id| registry.term(id))
            .map_or_else(|| "Ungrouped".to_owned(), |t| format!("{} ({})", t.label, t.id));
        let names: Vec<&str> = group
            .columns
            .iter()
            .filter_map(|id| session.columns.get(id))
            .map(|c| c.name.as_str())
            .collect();
        println!("{label}: {}", names.join(", "));
    }
    Ok(())
}

fn handle_progress(ctx: &Context) -> Result<()> {
    let (session, registry) = ctx.load_session()?;
    let columns = session.columns.to_vec();
    let progress = annotation_progress(&columns, &registry);

    println!(
        "{} of {} columns mapped",
        progress.mapped_columns, progress.total_columns
    );
    for variable in &progress.unmapped_required_variables {
        println!("  required variable not mapped: {variable}");
    }
    for column in &progress.untyped_columns {
        println!("  column {column}: no data type");
    }
    for level in &progress.levels_without_terms {
        println!("  column {}: level {:?} has no term", level.column, level.value);
    }
    for column in &progress.categorical_without_levels {
        println!("  column {column}: no categorical levels");
    }
    for column in &progress.continuous_without_format {
        println!("  column {column}: no format");
    }
    for column in &progress.ungrouped_columns {
        println!("  column {column}: not assigned to a collection");
    }
    if progress.is_complete() {
        println!("Annotation is complete");
    }
    Ok(())
}

fn handle_import(ctx: &Context, path: &Path) -> Result<()> {
    let (mut session, registry) = ctx.load_session()?;
    let value = storage::load_dictionary_value(path)?;

    let report = DictionarySchema::bundled()?.validate(&value);
    if !report.valid {
        tracing::warn!(
            "Imported dictionary does not pass validation: {}",
            report.errors.join(", ")
        );
    }

    let dict = dictionary::DataDictionary::from_value(value)
        .with_context(|| format!("Unexpected data dictionary shape: {}", path.display()))?;
    let before = session.columns.clone();
    session.columns = dictionary::decode(&dict, &session.columns, &registry);
    session.save(&ctx.session_path)?;

    let updated = session
        .columns
        .iter()
        .filter(|c| before.get(&c.id) != Some(c))
        .count();
    println!("Imported {}: {updated} column(s) updated", path.display());
    Ok(())
}

fn handle_export(ctx: &Context, output: Option<PathBuf>, force: bool) -> Result<()> {
    let (session, registry) = ctx.load_session()?;
    let dict = dictionary::encode(session.columns.iter(), &registry);
    let report = dictionary::schema::validate(&dict)?;

    if !report.valid {
        let columns = report.errors.join(", ");
        if ctx.settings.require_valid_export && !force {
            bail!("Annotation is incomplete for: {columns}. Use --force to export anyway.");
        }
        tracing::warn!("Exporting incomplete annotation for: {columns}");
    }

    let path = match output {
        Some(path) => {
            storage::write_dictionary(&dict, &path)?;
            path
        }
        None => storage::save_dictionary(
            &dict,
            &ctx.settings.output_dir,
            &session.table_file_name,
        )?,
    };
    println!("Wrote {}", path.display());
    Ok(())
}

fn handle_validate(path: &Path) -> Result<()> {
    let value = storage::load_dictionary_value(path)?;
    let report = DictionarySchema::bundled()?.validate(&value);
    if report.valid {
        println!("{} is valid", path.display());
        return Ok(());
    }
    for field in &report.errors {
        let field = if field.is_empty() { "<root>" } else { field };
        println!("invalid: {field}");
    }
    bail!("{} failed validation", path.display())
}

fn print_column(column: &Column) {
    let variable = column.standardized_variable.as_deref().unwrap_or("-");
    let data_type = column
        .data_type
        .map_or_else(|| "-".to_owned(), |t| format!("{t:?}").to_lowercase());
    println!("{} {}: {variable} [{data_type}]", column.id, column.name);
    if let Some(levels) = &column.levels {
        for (value, level) in levels {
            let term = level.standardized_term.as_deref().unwrap_or("-");
            println!("    {value:?} -> {term} {:?}", level.description);
        }
    }
    if let Some(units) = &column.units {
        let format = column.format.as_deref().unwrap_or("-");
        println!("    units {units:?}, format {format}");
    }
    if !column.missing_values.is_empty() {
        println!("    missing {:?}", column.missing_values);
    }
}
