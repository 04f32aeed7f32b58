#![allow(clippy::module_name_repetitions)]

//! Interactive prompts for exploring the dashboard.
//!
//! Uses `dialoguer` to edit the [`Selection`] and reprints the text report
//! after every change. The dataset is loaded once and reused for each
//! rebuild.

use std::collections::BTreeSet;

use dialoguer::{MultiSelect, Select};
use velo_dash_accident_models::{AccidentRecord, Attribute, Label};
use velo_dash_pipeline::labels_present;

use crate::DashboardError;
use crate::config::DashboardConfig;
use crate::report::render_text;
use crate::sections::Dashboard;
use crate::selection::{Dimension, Selection};

/// Actions offered after each report.
enum DashboardAction {
    Filters,
    Condition,
    Quit,
}

impl DashboardAction {
    const ALL: &[Self] = &[Self::Filters, Self::Condition, Self::Quit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Filters => "Changer les filtres de gravité et de sexe",
            Self::Condition => "Changer la condition étudiée",
            Self::Quit => "Quitter",
        }
    }
}

/// Runs the prompt loop until the user quits.
///
/// # Errors
///
/// Returns [`DashboardError::Prompt`] if a prompt fails, for example when
/// the terminal is closed.
pub fn run(
    records: &[AccidentRecord],
    config: &DashboardConfig,
    mut selection: Selection,
) -> Result<(), DashboardError> {
    let labels: Vec<&str> = DashboardAction::ALL
        .iter()
        .map(DashboardAction::label)
        .collect();

    loop {
        let dashboard = Dashboard::build(records, &selection, config);
        println!("{}", render_text(&dashboard));

        let idx = Select::new()
            .with_prompt("Que voulez-vous faire ?")
            .items(&labels)
            .default(0)
            .interact()?;

        match DashboardAction::ALL[idx] {
            DashboardAction::Filters => {
                selection.severities = pick_labels(
                    "Sélectionne la gravité (espace=cocher, entrée=valider)",
                    records,
                    Attribute::Severity,
                    &selection.severities,
                )?;
                selection.sexes = pick_labels(
                    "Sélectionne le sexe (espace=cocher, entrée=valider)",
                    records,
                    Attribute::Sex,
                    &selection.sexes,
                )?;
            }
            DashboardAction::Condition => pick_condition(records, &mut selection)?,
            DashboardAction::Quit => break,
        }

        log::debug!("Selection changed: {selection:?}");
    }

    Ok(())
}

/// Checkbox prompt over the labels of `attribute` found in the data, with
/// the current selection pre-checked.
fn pick_labels(
    prompt: &str,
    records: &[AccidentRecord],
    attribute: Attribute,
    current: &BTreeSet<Label>,
) -> Result<BTreeSet<Label>, DashboardError> {
    let options = labels_present(records, attribute);
    let names: Vec<&str> = options.iter().map(|l| l.as_str()).collect();
    let checked: Vec<bool> = options.iter().map(|l| current.contains(l)).collect();

    let picked = MultiSelect::new()
        .with_prompt(prompt)
        .items(&names)
        .defaults(&checked)
        .max_length(20)
        .interact()?;

    if picked.is_empty() {
        println!("Aucune valeur sélectionnée, les sections filtrées seront vides.");
    }

    Ok(picked.into_iter().map(|i| options[i]).collect())
}

/// Prompts for a dimension, then for one of its categories present in the
/// data.
fn pick_condition(
    records: &[AccidentRecord],
    selection: &mut Selection,
) -> Result<(), DashboardError> {
    let titles: Vec<&str> = Dimension::ALL.iter().map(|d| d.title()).collect();
    let current = Dimension::ALL
        .iter()
        .position(|&d| d == selection.dimension)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Choisis une condition")
        .items(&titles)
        .default(current)
        .interact()?;
    selection.switch_dimension(Dimension::ALL[idx], records);

    let categories = labels_present(records, selection.dimension.attribute());
    if categories.is_empty() {
        println!("Aucune catégorie disponible.");
        return Ok(());
    }

    let names: Vec<&str> = categories.iter().map(|l| l.as_str()).collect();
    let current = selection
        .category
        .and_then(|c| categories.iter().position(|&l| l == c))
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Choisis une variable à étudier")
        .items(&names)
        .default(current)
        .interact()?;
    selection.category = Some(categories[idx]);

    Ok(())
}
