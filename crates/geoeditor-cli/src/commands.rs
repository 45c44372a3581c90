use std::path::Path;

use anyhow::{Context, Result, bail};

use geoeditor_export::{export_dataset, import, to_json, upgrade};
use geoeditor_ingest::{parse_feature_collection, read_csv_features_from_path};
use geoeditor_model::{Dataset, Feature, ProjectId, ProjectKind};
use geoeditor_session::{AuthoringSession, ProjectAction};
use geoeditor_store::{ArtifactDir, FileSlot, StoreHandle};

use crate::cli::{
    ArtifactPutArgs, ArtifactShowArgs, ArtifactsDirArgs, ExportArgs, InspectArgs, ProfileArgs,
    ProjectsDeleteArgs, ProjectsDirArgs, UpgradeArgs,
};
use crate::summary::{print_field_table, print_profile_table, print_projects_table, print_export_summary};

fn load_features(path: &Path) -> Result<Vec<Feature>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let features = match extension.as_str() {
        "csv" | "tsv" => read_csv_features_from_path(path)
            .with_context(|| format!("could not ingest table {}", path.display()))?,
        _ => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            parse_feature_collection(&raw)
                .with_context(|| format!("could not parse feature collection {}", path.display()))?
        }
    };
    Ok(features)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let features = load_features(&args.input)?;
    let dataset = Dataset::new(
        args.input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("dataset"),
        features,
    );
    print_field_table(&dataset);
    Ok(())
}

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    let features = load_features(&args.input)?;
    let dataset = Dataset::new("profile", features);
    let Some(profile) = dataset.field_model.attributes(&args.field) else {
        bail!(
            "field {} is not qualitative (or does not exist); nothing to profile",
            args.field
        );
    };
    print_profile_table(&args.field, profile);
    Ok(())
}

fn parse_weight_arg(raw: &str) -> Result<(String, f64)> {
    let (field, value) = raw
        .split_once('=')
        .with_context(|| format!("--weight expects FIELD=FRACTION, got {raw}"))?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("not a number in --weight {raw}"))?;
    if !(0.0..=1.0).contains(&value) {
        bail!("field weights are fractions in [0, 1], got {value}");
    }
    Ok((field.trim().to_string(), value))
}

pub fn run_export(args: &ExportArgs) -> Result<()> {
    let features = load_features(&args.input)?;
    if features.is_empty() {
        bail!("{} holds no features", args.input.display());
    }

    // The session enforces the same step gating the page walks through.
    let store_dir = args
        .store_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let mut store = StoreHandle::load(Box::new(FileSlot::in_dir(&store_dir)), None);
    let mut session = AuthoringSession::new(ProjectKind::Dataset, ProjectAction::Create);
    session.advance()?;
    let id = session.load_dataset(&mut store, &args.name, features)?;
    session.advance()?;

    store.update_dataset(&id, |dataset| {
        dataset.description = args.description.clone();
        let fields: Vec<String> = if args.select.is_empty() {
            dataset.field_model.fields.keys().cloned().collect()
        } else {
            args.select.clone()
        };
        for field in &fields {
            dataset.field_model.select(field, true)?;
        }
        Ok(())
    })?;
    session.advance()?;

    if args.equal {
        store.update_dataset(&id, |dataset| {
            dataset.field_model.set_equal_weights();
            Ok(())
        })?;
    }
    for raw in &args.weights {
        let (field, value) = parse_weight_arg(raw)?;
        store.update_dataset(&id, |dataset| {
            Ok(dataset.field_model.update_weight(&field, value)?)
        })?;
    }
    session.advance()?;

    let dataset = store
        .store()
        .dataset(&id)
        .context("dataset vanished from the store")?;
    let record = export_dataset(dataset, session.action());
    let body = to_json(&record)?;
    std::fs::write(&args.output, body)
        .with_context(|| format!("could not write {}", args.output.display()))?;
    print_export_summary(&record, &args.output);
    Ok(())
}

pub fn run_upgrade(args: &UpgradeArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("could not read {}", args.input.display()))?;
    let record = upgrade(import(&raw)?);
    let target = args.output.as_ref().unwrap_or(&args.input);
    std::fs::write(target, to_json(&record)?)
        .with_context(|| format!("could not write {}", target.display()))?;
    println!("upgraded to v{} -> {}", record.version, target.display());
    Ok(())
}

pub fn run_projects_list(args: &ProjectsDirArgs) -> Result<()> {
    let store = StoreHandle::load(Box::new(FileSlot::in_dir(&args.store_dir)), None);
    print_projects_table(store.store());
    Ok(())
}

pub fn run_projects_delete(args: &ProjectsDeleteArgs) -> Result<()> {
    let mut store = StoreHandle::load(Box::new(FileSlot::in_dir(&args.store_dir)), None);
    let id = ProjectId::new(args.id.clone())?;
    store.delete(&id)?;
    println!("deleted {id}");
    Ok(())
}

pub fn run_artifacts_list(args: &ArtifactsDirArgs) -> Result<()> {
    for name in ArtifactDir::new(&args.dir).list()? {
        println!("{name}");
    }
    Ok(())
}

pub fn run_artifacts_show(args: &ArtifactShowArgs) -> Result<()> {
    let body = ArtifactDir::new(&args.dir).load(&args.name)?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

pub fn run_artifacts_put(args: &ArtifactPutArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("could not read {}", args.file.display()))?;
    let body: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not well-formed JSON", args.file.display()))?;
    ArtifactDir::new(&args.dir).save(&args.name, &body)?;
    println!("stored {}", args.name);
    Ok(())
}
