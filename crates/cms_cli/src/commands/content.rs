//! Content collection commands.
//!
//! Reads need no session. Writes go through the console editor and fail
//! with "admin login required" when nobody is signed in.

use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use cms_core::model::schema::{CollectionSchema, FieldKind};
use cms_core::{
    parse_comma_list, AdminConsole, Entity, Fields, PricingPlan, RecordId, RecordStore, Service,
    SessionPersistence, Solution, TeamMember,
};
use serde_json::Value;

#[derive(Clone, Copy, ValueEnum)]
pub enum Collection {
    Services,
    Solutions,
    Team,
    Pricing,
}

/// Field edits shared by `create` and `update`.
#[derive(clap::Args)]
pub struct FieldArgs {
    /// JSON object with field values
    #[arg(long)]
    json: Option<String>,

    /// Scalar field as `field=value`; booleans and counts are parsed
    /// from the text; repeatable
    #[arg(long = "set", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Comma separated list field as `field=a,b,c`; repeatable
    #[arg(long = "list", value_parser = parse_assignment)]
    list: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum ContentAction {
    /// Print every record, newest first
    List { collection: Collection },
    /// Print one record
    Show { collection: Collection, id: RecordId },
    /// Create a record
    Create {
        collection: Collection,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change some fields of a record
    Update {
        collection: Collection,
        id: RecordId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record
    Delete { collection: Collection, id: RecordId },
}

impl ContentAction {
    fn collection(&self) -> Collection {
        match self {
            Self::List { collection }
            | Self::Show { collection, .. }
            | Self::Create { collection, .. }
            | Self::Update { collection, .. }
            | Self::Delete { collection, .. } => *collection,
        }
    }
}

pub fn run<S, P>(console: &AdminConsole<'_, S, P>, action: ContentAction) -> anyhow::Result<()>
where
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    match action.collection() {
        Collection::Services => run_for::<Service, S, P>(console, action),
        Collection::Solutions => run_for::<Solution, S, P>(console, action),
        Collection::Team => run_for::<TeamMember, S, P>(console, action),
        Collection::Pricing => run_for::<PricingPlan, S, P>(console, action),
    }
}

pub fn overview<S, P>(console: &AdminConsole<'_, S, P>) -> anyhow::Result<()>
where
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    let overview = console.overview()?;
    println!("services      {}", overview.services);
    println!("solutions     {}", overview.solutions);
    println!("team_members  {}", overview.team_members);
    println!("pricing_plans {}", overview.pricing_plans);
    Ok(())
}

fn run_for<T, S, P>(console: &AdminConsole<'_, S, P>, action: ContentAction) -> anyhow::Result<()>
where
    T: Entity,
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    match action {
        ContentAction::List { .. } => {
            let all = console.catalog::<T>().get_all()?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        ContentAction::Show { id, .. } => {
            let Some(stored) = console.catalog::<T>().get(id)? else {
                bail!("{} record not found: {id}", T::COLLECTION);
            };
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        ContentAction::Create { fields, .. } => {
            let fields = fields.into_fields(T::schema())?;
            let stored = console.editor::<T>()?.create_fields(fields)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        ContentAction::Update { id, fields, .. } => {
            let patch = fields.into_fields(T::schema())?;
            if patch.is_empty() {
                bail!("nothing to update; pass --json, --set or --list");
            }
            let stored = console.editor::<T>()?.update(id, patch)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        ContentAction::Delete { id, .. } => {
            console.editor::<T>()?.delete(id)?;
            println!("deleted {} {id}", T::COLLECTION);
        }
    }
    Ok(())
}

impl FieldArgs {
    /// Folds `--json`, `--set` and `--list` into one field map, later
    /// flags overriding earlier ones. `--set` values are typed by the
    /// field's declared kind in `schema`.
    fn into_fields(self, schema: &CollectionSchema) -> anyhow::Result<Fields> {
        let mut fields = match self.json {
            Some(raw) => match serde_json::from_str::<Value>(&raw)
                .context("--json is not valid JSON")?
            {
                Value::Object(map) => map,
                _ => bail!("--json must be a JSON object"),
            },
            None => Fields::new(),
        };
        for (name, value) in self.set {
            let value = scalar_value(schema, &name, value)?;
            fields.insert(name, value);
        }
        for (name, value) in self.list {
            let entries = parse_comma_list(&value)
                .into_iter()
                .map(Value::String)
                .collect();
            fields.insert(name, Value::Array(entries));
        }
        Ok(fields)
    }
}

fn scalar_value(schema: &CollectionSchema, name: &str, raw: String) -> anyhow::Result<Value> {
    // Undeclared names pass through as text; the schema check rejects them.
    let Some(spec) = schema.field(name) else {
        return Ok(Value::String(raw));
    };
    Ok(match spec.kind {
        FieldKind::Text => Value::String(raw),
        FieldKind::Bool => Value::Bool(
            raw.trim()
                .parse()
                .with_context(|| format!("--set {name} expects true or false, got `{raw}`"))?,
        ),
        FieldKind::Count => Value::from(
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("--set {name} expects a non-negative integer, got `{raw}`"))?,
        ),
        FieldKind::TextList | FieldKind::TextSet => {
            bail!("{name} is a list field; use --list {name}=a,b,c")
        }
        FieldKind::TextMap | FieldKind::Links(_) => {
            bail!("{name} is an object field; use --json")
        }
    })
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected `field=value`, got `{raw}`")),
    }
}
